use thiserror::Error;

/// Failures at the device boundary, split by how they are handled: transport
/// and HTTP-status failures feed the acquisition loop's retry counter, while
/// calibration rejections go straight to the operator. A body that fails to
/// parse is not an error at all; it degrades fields to NaN instead.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("device returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("calibration rejected by device: {0}")]
    Calibration(String),
}
