mod acquisition;
mod buffer;
mod config;
mod device;
mod models;
mod report;
mod scoring;
mod utils;

use log::{error, info};

use acquisition::Monitor;
use config::MonitorConfig;
use device::{DeviceLink, HttpDevice, MockDevice};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match MonitorConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    // One-shot calibration mode: `droplet-monitor calibrate <sensor>`
    let mut args = std::env::args().skip(1);
    if let Some(command) = args.next() {
        return match command.as_str() {
            "calibrate" => {
                let target = args
                    .next()
                    .ok_or("Usage: droplet-monitor calibrate <ph|tds|turbidity|temperature>")?;
                run_calibration(&config, &target).await
            }
            other => Err(format!("Unknown command: {}", other).into()),
        };
    }

    info!("Starting water quality monitoring service");
    let mut monitor = Monitor::new(build_device(&config)?, config.clone());

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        let _ = tx.send(());
    });

    // Poll until the shutdown signal arrives
    tokio::select! {
        _ = monitor.run() => {}
        _ = &mut rx => {
            info!("Program terminated by user. Exiting gracefully.");
        }
    }

    // Leave a CSV report of whatever the window holds
    if monitor.buffer().is_empty() {
        info!("No samples buffered, skipping report");
    } else {
        match report::write_report(monitor.buffer(), &config.report_dir) {
            Ok(path) => info!("Report written to {}", path.display()),
            Err(e) => error!("Failed to write report: {}", e),
        }
    }

    Ok(())
}

fn build_device(config: &MonitorConfig) -> Result<Box<dyn DeviceLink>, Box<dyn std::error::Error>> {
    if config.mock_device {
        info!("MOCK_DEVICE set, polling simulated readings");
        return Ok(Box::new(MockDevice));
    }

    let url = config
        .device_url
        .clone()
        .ok_or("DEVICE_URL environment variable not set")?;
    info!("Polling device at {}", url);
    Ok(Box::new(HttpDevice::new(url)?))
}

async fn run_calibration(
    config: &MonitorConfig,
    target: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let device = build_device(config)?;
    info!("Requesting calibration of the {} sensor", target);

    match device.calibrate(target).await {
        Ok(()) => {
            info!("Calibration succeeded");
            Ok(())
        }
        Err(e) => {
            error!("Calibration failed: {}", e);
            Err(e.into())
        }
    }
}
