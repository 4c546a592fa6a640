use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_RETRY_DELAY_SECS: u64 = 3;
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Base URL of the device. None only in mock mode.
    pub device_url: Option<Url>,
    /// Poll simulated readings instead of real hardware.
    pub mock_device: bool,
    /// Steady-state polling period.
    pub poll_interval: Duration,
    /// Delay before a retry after a failed poll.
    pub retry_delay: Duration,
    /// Consecutive failures tolerated before retries stop.
    pub max_attempts: u32,
    /// Directory CSV reports are written into.
    pub report_dir: PathBuf,
}

impl MonitorConfig {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Load environment variables
        dotenv::dotenv().ok();

        let mock_device = env::var("MOCK_DEVICE")
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let device_url = match env::var("DEVICE_URL") {
            Ok(raw) => {
                let url = Url::parse(raw.trim())
                    .map_err(|e| format!("Invalid DEVICE_URL '{}': {}", raw, e))?;
                Some(url)
            }
            Err(_) if mock_device => None,
            Err(_) => {
                return Err(
                    "DEVICE_URL environment variable not set (set MOCK_DEVICE=1 to run without hardware)"
                        .into(),
                )
            }
        };

        let poll_interval =
            Duration::from_secs(env_u64("POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?);
        let retry_delay =
            Duration::from_secs(env_u64("RETRY_DELAY_SECS", DEFAULT_RETRY_DELAY_SECS)?);
        let max_attempts = env_u64("MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS as u64)? as u32;

        let report_dir = env::var("REPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        Ok(MonitorConfig {
            device_url,
            mock_device,
            poll_interval,
            retry_delay,
            max_attempts,
            report_dir,
        })
    }
}

fn env_u64(key: &str, default: u64) -> Result<u64, Box<dyn std::error::Error>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("{} must be a positive integer, got '{}'", key, raw).into()),
        Err(_) => Ok(default),
    }
}
