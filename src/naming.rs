//! Device name normalization.
//!
//! Turns the free-form display name of a Domoticz device into the stem used
//! for its metric names: spaces become underscores, camelCase and PascalCase
//! boundaries are split, everything is lowercased and doubled underscores are
//! collapsed once.
//!
//! The output must stay stable for existing dashboards, so the scan below
//! mirrors the historical substitution rules character for character,
//! including the single-pass collapse (`"a   b"` becomes `"a__b"`).

/// Character categories the boundary scan cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Lower,
    Digit,
    Upper,
    Newline,
    Other,
}

impl CharClass {
    fn of(c: char) -> Self {
        match c {
            'a'..='z' => CharClass::Lower,
            '0'..='9' => CharClass::Digit,
            'A'..='Z' => CharClass::Upper,
            '\n' => CharClass::Newline,
            _ => CharClass::Other,
        }
    }
}

fn class_at(chars: &[char], i: usize) -> Option<CharClass> {
    chars.get(i).copied().map(CharClass::of)
}

/// Converts a device display name into a metric prefix.
///
/// Total over all inputs; the empty string maps to the empty string.
///
/// ```
/// use domoticz_exporter::naming::normalize;
///
/// assert_eq!(normalize("My own probe"), "my_own_probe");
/// assert_eq!(normalize("MyOwnProbe"), "my_own_probe");
/// ```
pub fn normalize(name: &str) -> String {
    let spaced: Vec<char> = name.chars().map(|c| if c == ' ' { '_' } else { c }).collect();
    let words = split_words(&spaced);
    let split = split_case_transitions(&words);
    let lowered = split.into_iter().collect::<String>().to_lowercase();
    lowered.replace("__", "_")
}

/// Inserts `_` between any character (except a newline) and a following
/// capitalized word, i.e. one ASCII uppercase letter followed by at least one
/// ASCII lowercase letter. The lowercase run is consumed with the match, so
/// scanning resumes after it.
fn split_words(chars: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len() + chars.len() / 2);
    let mut i = 0;

    while i < chars.len() {
        let starts_word = class_at(chars, i) != Some(CharClass::Newline)
            && class_at(chars, i + 1) == Some(CharClass::Upper)
            && class_at(chars, i + 2) == Some(CharClass::Lower);

        if !starts_word {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        out.push(chars[i]);
        out.push('_');
        out.push(chars[i + 1]);

        let mut j = i + 2;
        while class_at(chars, j) == Some(CharClass::Lower) {
            out.push(chars[j]);
            j += 1;
        }
        i = j;
    }

    out
}

/// Inserts `_` between an ASCII lowercase letter or digit and an immediately
/// following ASCII uppercase letter.
fn split_case_transitions(chars: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len() + chars.len() / 2);
    let mut i = 0;

    while i < chars.len() {
        let lower_or_digit = matches!(
            class_at(chars, i),
            Some(CharClass::Lower) | Some(CharClass::Digit)
        );

        if lower_or_digit && class_at(chars, i + 1) == Some(CharClass::Upper) {
            out.push(chars[i]);
            out.push('_');
            out.push(chars[i + 1]);
            i += 2;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    out
}
