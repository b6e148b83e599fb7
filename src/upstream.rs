//! Client for the Domoticz device-status endpoint.
//!
//! Every call to [`HubClient::fetch_and_render`] performs exactly one GET
//! against the hub. There is no retry and no caching; a scrape always sees
//! the hub's current readings or an error.

use std::time::{Duration, Instant};

use reqwest::{Client, Url};
use tracing::{debug, instrument};

use crate::device::DevicesResponse;
use crate::error::{ExporterError, HubUrlError};
use crate::render::render_devices;

/// Path and fixed query selecting all used temperature devices, ordered by
/// name.
pub const DEVICES_QUERY: &str =
    "json.htm?type=devices&filter=all&used=true&order=Name&type=temp";

/// Builds the full device-listing URL from the hub base URL.
///
/// Any path on the base URL is kept, so a hub behind a reverse proxy at
/// `http://proxy/domoticz` is queried at `http://proxy/domoticz/json.htm?...`.
pub fn devices_url(hub_url: &str) -> Result<Url, HubUrlError> {
    let mut base = Url::parse(hub_url).map_err(|e| HubUrlError(e.to_string()))?;

    if base.cannot_be_a_base() {
        return Err(HubUrlError("URL cannot be a base".into()));
    }
    if !matches!(base.scheme(), "http" | "https") {
        return Err(HubUrlError(format!(
            "unsupported scheme '{}'",
            base.scheme()
        )));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(DEVICES_QUERY)
        .map_err(|e| HubUrlError(e.to_string()))
}

/// HTTP client bound to one hub.
#[derive(Debug, Clone)]
pub struct HubClient {
    client: Client,
    devices_url: Url,
}

impl HubClient {
    /// Creates a client for `hub_url` whose requests give up after `timeout`.
    pub fn new(hub_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let devices_url = devices_url(hub_url)?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            devices_url,
        })
    }

    /// The URL queried on every fetch.
    pub fn devices_url(&self) -> &Url {
        &self.devices_url
    }

    /// Fetches and parses the current device listing.
    #[instrument(skip(self), fields(url = %self.devices_url))]
    pub async fn fetch_devices(&self) -> Result<DevicesResponse, ExporterError> {
        let start = Instant::now();

        let response = self.client.get(self.devices_url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExporterError::UpstreamStatus(status));
        }

        let body = response.bytes().await?;
        let devices = DevicesResponse::from_slice(&body)?;

        debug!(
            devices = devices.result.len(),
            bytes = body.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Fetched device listing"
        );

        Ok(devices)
    }

    /// Fetches the device listing and renders it as exposition text.
    pub async fn fetch_and_render(&self) -> Result<String, ExporterError> {
        let devices = self.fetch_devices().await?;
        Ok(render_devices(&devices))
    }
}
