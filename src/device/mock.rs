/// Random-reading stand-in for the real device, for running without hardware
use async_trait::async_trait;
use rand::Rng;
use serde_json::json;

use crate::device::client::DeviceLink;
use crate::device::error::DeviceError;
use crate::models::RawSnapshot;

/// Produces plausible readings in the same number-or-string shapes the
/// firmware uses, including the occasional DIRTY turbidity flip.
pub struct MockDevice;

fn random_snapshot() -> RawSnapshot {
    let mut rng = rand::thread_rng();
    let dirty = rng.gen_bool(0.2);
    RawSnapshot {
        ph: Some(json!(format!("{:.1}", rng.gen_range(6.0..8.0)))),
        tds: Some(json!(rng.gen_range(50..350))),
        temp: Some(json!(format!("{:.1}", rng.gen_range(20.0..25.0)))),
        turb: Some(if dirty { "DIRTY" } else { "CLEAR" }.to_string()),
    }
}

#[async_trait]
impl DeviceLink for MockDevice {
    async fn fetch_snapshot(&self) -> Result<RawSnapshot, DeviceError> {
        Ok(random_snapshot())
    }

    async fn calibrate(&self, _target: &str) -> Result<(), DeviceError> {
        Ok(())
    }
}
