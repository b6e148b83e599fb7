//! Conversion of device readings into exposition text.
//!
//! Each device yields a `temperature` gauge and, when the hub reports one, a
//! `battery_level` gauge:
//!
//! ```text
//! # HELP
//! # TYPE my_probe_temperature gauge
//! my_probe_temperature 21.5
//! ```
//!
//! The `# HELP` line carries no text; scrapers of the existing output rely on
//! this exact line layout.

use serde_json::Number;

use crate::device::{DeviceReading, DevicesResponse};
use crate::naming::normalize;

const TEMPERATURE_SUFFIX: &str = "temperature";
const BATTERY_LEVEL_SUFFIX: &str = "battery_level";

/// Renders a full device listing. Lines are joined with `\n` without a
/// trailing newline; an empty listing renders as an empty string.
pub fn render_devices(response: &DevicesResponse) -> String {
    render_readings(&response.result)
}

/// Renders readings in the order given.
pub fn render_readings(readings: &[DeviceReading]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(readings.len() * 6);

    for reading in readings {
        let prefix = format!("{}_", normalize(&reading.name));

        push_gauge(
            &mut lines,
            &prefix,
            TEMPERATURE_SUFFIX,
            as_given(&reading.temp),
        );

        if let Some(level) = &reading.battery_level {
            push_gauge(&mut lines, &prefix, BATTERY_LEVEL_SUFFIX, widen(level));
        }
    }

    lines.join("\n")
}

fn push_gauge(lines: &mut Vec<String>, prefix: &str, suffix: &str, value: String) {
    lines.push("# HELP".to_string());
    lines.push(format!("# TYPE {prefix}{suffix} gauge"));
    lines.push(format!("{prefix}{suffix} {value}"));
}

/// Integers stay integers; floats use the float layout below.
fn as_given(value: &Number) -> String {
    match value.as_f64() {
        Some(f) if value.is_f64() => format_float(f),
        _ => value.to_string(),
    }
}

/// Renders a number as floating point, so `100` becomes `100.0`.
fn widen(value: &Number) -> String {
    value
        .as_f64()
        .map(format_float)
        .unwrap_or_else(|| value.to_string())
}

/// Shortest round-trip digits, positional for decimal exponents in
/// `-4..16` (always with a fractional part), scientific with a signed
/// two-digit exponent otherwise: `26.0`, `1e-05`, `1.5e+16`.
fn format_float(value: f64) -> String {
    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if (-4..16).contains(&exponent) {
        let (int_part, frac_part) = if exponent >= 0 {
            let int_len = exponent as usize + 1;
            if digits.len() <= int_len {
                (
                    format!("{digits}{}", "0".repeat(int_len - digits.len())),
                    "0".to_string(),
                )
            } else {
                (digits[..int_len].to_string(), digits[int_len..].to_string())
            }
        } else {
            let zeros = "0".repeat((-exponent - 1) as usize);
            ("0".to_string(), format!("{zeros}{digits}"))
        };
        format!("{sign}{int_part}.{frac_part}")
    } else {
        let mantissa = if digits.len() > 1 {
            format!("{}.{}", &digits[..1], &digits[1..])
        } else {
            digits
        };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        format!("{sign}{mantissa}e{exp_sign}{:02}", exponent.abs())
    }
}
