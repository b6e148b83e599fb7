//! Test command implementation.
//!
//! Fetches the device listing once and prints the rendered metrics.

use std::time::Instant;

use crate::config::Config;
use crate::upstream::HubClient;

/// Queries the hub once and prints what a scrape would return.
pub async fn command_test(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🧪 Domoticz Exporter - Test Mode");
    println!("================================");

    let hub = HubClient::new(config.hub_url(), config.timeout())?;
    println!("\n🔗 Querying {}", hub.devices_url());

    let start = Instant::now();
    let devices = match hub.fetch_devices().await {
        Ok(devices) => devices,
        Err(e) => {
            println!("   ❌ {}", e);
            std::process::exit(1);
        }
    };

    let batteries = devices
        .result
        .iter()
        .filter(|d| d.battery_level.is_some())
        .count();

    println!(
        "   ⏱️  Fetch duration: {:.2}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );
    println!(
        "   📊 {} devices ({} with battery level)",
        devices.result.len(),
        batteries
    );

    println!("\n{}", crate::render::render_devices(&devices));
    println!("\n✅ Test completed successfully");
    Ok(())
}
