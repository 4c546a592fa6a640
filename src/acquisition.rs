/// Acquisition loop: fetch, score, append, schedule the next attempt
use log::{debug, error, info, warn};
use time::OffsetDateTime;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};

use crate::buffer::RollingBuffer;
use crate::config::MonitorConfig;
use crate::device::DeviceLink;
use crate::models::{ConnectionState, Sample};
use crate::scoring;
use crate::utils::time_label;

/// Outcome of one poll cycle, as seen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Snapshot fetched and appended to the window.
    Sampled,
    /// Fetch failed; a retry is due after the retry delay.
    RetryScheduled,
    /// Fetch failed and the consecutive-failure budget is spent. Only the
    /// steady ticker (or an operator-driven poll) will try again.
    RetriesExhausted,
}

/// Owns everything the poll loop mutates: the device link, the rolling
/// window, the connection state and the failure counter. Constructed once
/// per process, torn down on exit.
pub struct Monitor {
    device: Box<dyn DeviceLink>,
    config: MonitorConfig,
    buffer: RollingBuffer,
    state: ConnectionState,
    consecutive_failures: u32,
}

impl Monitor {
    pub fn new(device: Box<dyn DeviceLink>, config: MonitorConfig) -> Self {
        Monitor {
            device,
            config,
            buffer: RollingBuffer::new(),
            state: ConnectionState::Offline,
            consecutive_failures: 0,
        }
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn buffer(&self) -> &RollingBuffer {
        &self.buffer
    }

    /// One acquisition cycle. Never returns an error: every failure is
    /// folded into the connection state, the counter and the outcome, so
    /// nothing here can take the monitor down.
    pub async fn poll(&mut self) -> PollOutcome {
        self.set_state(ConnectionState::Connecting);

        let raw = match self.device.fetch_snapshot().await {
            Ok(raw) => raw,
            Err(e) => {
                self.consecutive_failures += 1;
                self.set_state(ConnectionState::Offline);
                error!("Connection failed: {}", e);

                return if self.consecutive_failures < self.config.max_attempts {
                    info!(
                        "Retrying in {} seconds (attempt {}/{})",
                        self.config.retry_delay.as_secs(),
                        self.consecutive_failures,
                        self.config.max_attempts
                    );
                    PollOutcome::RetryScheduled
                } else {
                    error!("Max connection attempts reached, check the device connection");
                    PollOutcome::RetriesExhausted
                };
            }
        };

        self.consecutive_failures = 0;
        self.set_state(ConnectionState::Online);

        let now = OffsetDateTime::now_utc();
        let sample = Sample::from_raw(&raw, now);
        if sample.has_missing_readings() {
            warn!("Snapshot has unparseable fields, keeping NaN sentinels: {:?}", raw);
        }

        self.buffer.append(&sample, time_label(&now));
        self.report(&sample);
        PollOutcome::Sampled
    }

    /// Drive the loop until the future is dropped. The steady ticker fires
    /// every poll interval for the life of the process; a failed poll arms
    /// an additional retry deadline while the failure budget lasts. Both
    /// timers run through this one task, so polls are single-flight: a retry
    /// can never overlap an in-flight poll or race it on the window.
    pub async fn run(&mut self) {
        let mut ticker = interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut retry_at: Option<Instant> = None;

        loop {
            match retry_at.take() {
                Some(deadline) => {
                    tokio::select! {
                        _ = ticker.tick() => {}
                        _ = sleep_until(deadline) => {}
                    }
                }
                None => {
                    ticker.tick().await;
                }
            }

            if self.poll().await == PollOutcome::RetryScheduled {
                retry_at = Some(Instant::now() + self.config.retry_delay);
            }
        }
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state != state {
            debug!("Connection state: {:?} -> {:?}", self.state, state);
        }
        self.state = state;
    }

    /// Downstream consumption of a fresh sample: scores, band and insights
    /// go to the log, this service's stand-in for the dashboard widgets.
    fn report(&self, sample: &Sample) {
        let scores = scoring::dashboard_scores(sample);
        let overall = scoring::overall_score(&scores);
        let band = scoring::quality_band(overall);

        info!(
            "Sample: pH={:.1} ({:?}), TDS={:.0} PPM ({:?}), turbidity={:.1} NTU ({:?}), temp={:.1}°C ({:?})",
            sample.ph,
            scoring::classify_ph(sample.ph),
            sample.tds,
            scoring::classify_tds(sample.tds),
            sample.turbidity,
            scoring::classify_turbidity(sample.turbidity, &sample.turbidity_status),
            sample.temperature,
            scoring::classify_temperature(sample.temperature),
        );
        info!(
            "Overall quality score: {:.0}/100 ({:?}), {} samples buffered",
            overall,
            band,
            self.buffer.len()
        );

        debug!(
            "Bands: pH {:?}, TDS {:?}, turbidity {:?}, temp {:?} (insights-path mean {:.1})",
            scoring::band_optimal_in_middle(sample.ph, scoring::PH_WINDOW),
            scoring::band_lower_is_better(sample.tds, scoring::TDS_INSIGHTS_WINDOW),
            scoring::band_lower_is_better(sample.turbidity, scoring::TURBIDITY_WINDOW),
            scoring::band_optimal_in_middle(sample.temperature, scoring::TEMPERATURE_WINDOW),
            scoring::insights_score(sample),
        );

        for insight in scoring::generate_insights(sample, overall) {
            match insight.severity {
                scoring::Severity::Danger => warn!("{}", insight.message),
                _ => info!("{}", insight.message),
            }
        }
    }
}
