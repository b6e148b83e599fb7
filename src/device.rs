//! Device records as returned by the Domoticz `json.htm?type=devices` API.
//!
//! Only the fields the exporter renders are modelled; everything else in the
//! payload (`idx`, `HardwareName`, `LastUpdate`, ...) is ignored by serde.

use serde::Deserialize;
use serde_json::Number;

/// Top-level object of a device listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DevicesResponse {
    pub result: Vec<DeviceReading>,
}

/// One temperature device out of the `result` array.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceReading {
    /// Display name as configured in Domoticz.
    #[serde(rename = "Name")]
    pub name: String,

    /// Temperature as sent by the hub. Kept as a JSON number so it is
    /// rendered exactly as given (`26`, `26.0` and `26.5` stay distinct).
    #[serde(rename = "Temp")]
    pub temp: Number,

    /// Battery level, usually an integer 0-100. `null` counts as absent.
    #[serde(rename = "BatteryLevel", default)]
    pub battery_level: Option<Number>,
}

impl DevicesResponse {
    /// Parses a raw response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_full_device_record() {
        let body = br#"{
            "title": "Devices",
            "status": "OK",
            "result": [{
                "idx": "1",
                "Name": "My beautiful probe",
                "Temp": 26.5,
                "BatteryLevel": 100,
                "HardwareName": "RFXCom",
                "LastUpdate": "2018-07-16 19:40:15"
            }]
        }"#;

        let parsed = DevicesResponse::from_slice(body).unwrap();
        assert_eq!(parsed.result.len(), 1);

        let device = &parsed.result[0];
        assert_eq!(device.name, "My beautiful probe");
        assert_eq!(device.temp.to_string(), "26.5");
        assert_eq!(device.battery_level.as_ref().map(Number::to_string), Some("100".into()));
    }

    #[test]
    fn test_battery_level_is_optional() {
        let body = br#"{"result": [{"Name": "Cellar", "Temp": 12.1}]}"#;
        let parsed = DevicesResponse::from_slice(body).unwrap();
        assert!(parsed.result[0].battery_level.is_none());
    }

    #[test]
    fn test_null_battery_level_is_absent() {
        let body = br#"{"result": [{"Name": "Cellar", "Temp": 12.1, "BatteryLevel": null}]}"#;
        let parsed = DevicesResponse::from_slice(body).unwrap();
        assert!(parsed.result[0].battery_level.is_none());
    }

    #[test]
    fn test_missing_result_is_rejected() {
        let body = br#"{"status": "ERR", "title": "Devices"}"#;
        assert!(DevicesResponse::from_slice(body).is_err());
    }

    #[test]
    fn test_missing_temp_is_rejected() {
        let body = br#"{"result": [{"Name": "Cellar"}]}"#;
        assert!(DevicesResponse::from_slice(body).is_err());
    }

    #[test]
    fn test_non_json_is_rejected() {
        assert!(DevicesResponse::from_slice(b"<html>Unauthorized</html>").is_err());
    }

    #[test]
    fn test_top_level_array_is_rejected() {
        assert!(DevicesResponse::from_slice(br#"[{"Name": "x", "Temp": 1}]"#).is_err());
    }
}
