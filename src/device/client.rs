/// HTTP transport to the sensor device endpoints
use async_trait::async_trait;
use log::warn;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::device::error::DeviceError;
use crate::models::RawSnapshot;

// The firmware serves slowly while an ADC conversion is running; anything
// past 5 seconds means the device is gone.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const CALIBRATION_SUCCESS_SENTINEL: &str = "Calibration Success";

/// Seam between the acquisition loop and the device. The HTTP implementation
/// talks to the real firmware; tests and offline runs swap in scripted or
/// simulated implementations.
#[async_trait]
pub trait DeviceLink: Send + Sync {
    /// Fetch one snapshot of readings from the device.
    async fn fetch_snapshot(&self) -> Result<RawSnapshot, DeviceError>;

    /// Ask the device to recalibrate one sensor. The device's verdict is in
    /// the error on rejection.
    async fn calibrate(&self, target: &str) -> Result<(), DeviceError>;
}

/// Client for the ESP32's plain-HTTP endpoints.
pub struct HttpDevice {
    http: Client,
    base_url: Url,
}

impl HttpDevice {
    pub fn new(base_url: Url) -> Result<Self, DeviceError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(HttpDevice { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }
}

#[async_trait]
impl DeviceLink for HttpDevice {
    async fn fetch_snapshot(&self) -> Result<RawSnapshot, DeviceError> {
        let response = self.http.get(self.endpoint("/data")).send().await?;
        if !response.status().is_success() {
            return Err(DeviceError::Status(response.status()));
        }

        let body = response.text().await?;
        // A body that is not JSON degrades to an empty snapshot (all fields
        // NaN downstream) rather than failing the poll.
        match serde_json::from_str(&body) {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                warn!("Malformed JSON from device, degrading all fields: {}", e);
                Ok(RawSnapshot::default())
            }
        }
    }

    async fn calibrate(&self, target: &str) -> Result<(), DeviceError> {
        let mut url = self.endpoint("/calibrate");
        url.query_pairs_mut().append_pair("target", target);

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(DeviceError::Status(response.status()));
        }

        let body = response.text().await?;
        // The firmware prints a human-readable page; only the sentinel
        // substring marks success.
        if body.contains(CALIBRATION_SUCCESS_SENTINEL) {
            Ok(())
        } else {
            Err(DeviceError::Calibration(body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_replaces_path_and_keeps_host() {
        let device =
            HttpDevice::new(Url::parse("http://10.103.72.192").unwrap()).unwrap();
        assert_eq!(device.endpoint("/data").as_str(), "http://10.103.72.192/data");
    }

    #[test]
    fn calibration_sentinel_is_a_substring_match() {
        let body = "<html>OK - Calibration Success (ph)</html>";
        assert!(body.contains(CALIBRATION_SUCCESS_SENTINEL));
        assert!(!"Calibration Failed: probe dry".contains(CALIBRATION_SUCCESS_SENTINEL));
    }
}
