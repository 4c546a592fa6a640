/// Score and classification rules for the four water-quality metrics
use crate::models::Sample;

/// Value window a metric is scored against.
#[derive(Debug, Clone, Copy)]
pub struct Window {
    pub min: f64,
    pub max: f64,
}

pub const PH_WINDOW: Window = Window { min: 6.5, max: 8.5 };
/// TDS window used by the dashboard score path.
pub const TDS_DASHBOARD_WINDOW: Window = Window {
    min: 50.0,
    max: 500.0,
};
/// TDS window used by the insights score path. Diverges from the dashboard
/// window on the lower bound; the two paths are kept separate on purpose
/// until the firmware team settles on one.
pub const TDS_INSIGHTS_WINDOW: Window = Window { min: 0.0, max: 500.0 };
pub const TURBIDITY_WINDOW: Window = Window { min: 0.0, max: 5.0 };
pub const TEMPERATURE_WINDOW: Window = Window {
    min: 10.0,
    max: 30.0,
};

/// Score a metric whose optimal value sits in the middle of its window
/// (pH, temperature). 100 at the midpoint, degrading linearly to 0 at the
/// window edges; never negative. NaN readings propagate as NaN.
pub fn score_optimal_in_middle(value: f64, window: Window) -> f64 {
    let mid = (window.min + window.max) / 2.0;
    let half_range = (window.max - window.min) / 2.0;
    let distance = (value - mid).abs();
    let score = 100.0 - (distance / half_range) * 100.0;
    // Comparison form rather than f64::max so NaN stays NaN.
    if score < 0.0 {
        0.0
    } else {
        score
    }
}

/// Score a metric where lower readings are better (TDS, turbidity).
///
/// Carried over verbatim from the dashboard: the formula is *increasing* in
/// `value`, so a reading at the top of the window scores 100 even though
/// lower is supposed to be better. Suspect, but the displayed scores depend
/// on it; do not "fix" without changing the consumers too.
pub fn score_lower_is_better(value: f64, window: Window) -> f64 {
    (((value - window.min) / (window.max - window.min)) * 100.0).clamp(0.0, 100.0)
}

/// Per-metric scores for one sample.
#[derive(Debug, Clone, Copy)]
pub struct MetricScores {
    pub ph: f64,
    pub tds: f64,
    pub turbidity: f64,
    pub temperature: f64,
}

/// Dashboard scoring policy: TDS scored against [50,500].
pub fn dashboard_scores(sample: &Sample) -> MetricScores {
    MetricScores {
        ph: score_optimal_in_middle(sample.ph, PH_WINDOW),
        tds: score_lower_is_better(sample.tds, TDS_DASHBOARD_WINDOW),
        turbidity: score_lower_is_better(sample.turbidity, TURBIDITY_WINDOW),
        temperature: score_optimal_in_middle(sample.temperature, TEMPERATURE_WINDOW),
    }
}

/// Weighted overall score for the quality droplet, rounded to the nearest
/// integer. Weights: pH 0.3, TDS 0.2, turbidity 0.3, temperature 0.2.
pub fn overall_score(scores: &MetricScores) -> f64 {
    (scores.ph * 0.3 + scores.tds * 0.2 + scores.turbidity * 0.3 + scores.temperature * 0.2).round()
}

/// Insights scoring policy: unweighted mean with TDS scored against [0,500].
pub fn insights_score(sample: &Sample) -> f64 {
    let ph = score_optimal_in_middle(sample.ph, PH_WINDOW);
    let tds = score_lower_is_better(sample.tds, TDS_INSIGHTS_WINDOW);
    let turbidity = score_lower_is_better(sample.turbidity, TURBIDITY_WINDOW);
    let temperature = score_optimal_in_middle(sample.temperature, TEMPERATURE_WINDOW);
    (ph + tds + turbidity + temperature) / 4.0
}

/// Hard safety verdict shown on the sensor cards. Independent of the 0-100
/// scores. A reading that failed to parse is Unknown rather than being
/// mislabeled safe or unsafe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricStatus {
    Safe,
    Unsafe,
    Unknown,
}

pub fn classify_ph(value: f64) -> MetricStatus {
    if value.is_nan() {
        MetricStatus::Unknown
    } else if (6.5..=8.5).contains(&value) {
        MetricStatus::Safe
    } else {
        MetricStatus::Unsafe
    }
}

pub fn classify_tds(value: f64) -> MetricStatus {
    if value.is_nan() {
        MetricStatus::Unknown
    } else if value <= 500.0 {
        MetricStatus::Safe
    } else {
        MetricStatus::Unsafe
    }
}

/// Turbidity is safe below 5 NTU, or whenever the device itself reports
/// CLEAR regardless of the quantized value.
pub fn classify_turbidity(value: f64, status: &str) -> MetricStatus {
    if value < 5.0 || status == "CLEAR" {
        MetricStatus::Safe
    } else {
        MetricStatus::Unsafe
    }
}

pub fn classify_temperature(value: f64) -> MetricStatus {
    if value.is_nan() {
        MetricStatus::Unknown
    } else if value <= 30.0 {
        MetricStatus::Safe
    } else {
        MetricStatus::Unsafe
    }
}

/// Three-level band for the science cards, with the star rating the cards
/// display next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Safe,
    Warning,
    Unsafe,
}

impl Band {
    pub fn stars(self) -> u8 {
        match self {
            Band::Safe => 5,
            Band::Warning => 3,
            Band::Unsafe => 1,
        }
    }
}

/// Band an optimal-in-middle metric on distance from the window midpoint:
/// safe within 30% of the half-range, warning within 70%.
pub fn band_optimal_in_middle(value: f64, window: Window) -> Band {
    let mid = (window.min + window.max) / 2.0;
    let half_range = (window.max - window.min) / 2.0;
    let distance = (value - mid).abs();
    if distance <= half_range * 0.3 {
        Band::Safe
    } else if distance <= half_range * 0.7 {
        Band::Warning
    } else {
        Band::Unsafe
    }
}

/// Band a lower-is-better metric on position in the window: safe up to 70%
/// of the span, warning up to 90%.
pub fn band_lower_is_better(value: f64, window: Window) -> Band {
    let safe_threshold = window.min + (window.max - window.min) * 0.7;
    let warning_threshold = window.min + (window.max - window.min) * 0.9;
    if value <= safe_threshold {
        Band::Safe
    } else if value <= warning_threshold {
        Band::Warning
    } else {
        Band::Unsafe
    }
}

/// Overall quality band for the droplet widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityBand {
    Poor,
    Fair,
    Good,
}

pub fn quality_band(overall: f64) -> QualityBand {
    if overall < 40.0 {
        QualityBand::Poor
    } else if overall < 70.0 {
        QualityBand::Fair
    } else {
        QualityBand::Good
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Danger,
}

/// One operator-facing insight message.
#[derive(Debug, Clone)]
pub struct Insight {
    pub severity: Severity,
    pub message: String,
}

impl Insight {
    fn new(severity: Severity, message: String) -> Self {
        Insight { severity, message }
    }
}

/// Derive insight messages from a sample and its overall score. The overall
/// verdict, when one applies, comes first.
pub fn generate_insights(sample: &Sample, overall: f64) -> Vec<Insight> {
    let mut insights = Vec::new();

    if sample.ph < 6.5 {
        insights.push(Insight::new(
            Severity::Warning,
            format!("pH too low (acidic): {:.1}", sample.ph),
        ));
    } else if sample.ph > 8.5 {
        insights.push(Insight::new(
            Severity::Warning,
            format!("pH too high (alkaline): {:.1}", sample.ph),
        ));
    }

    if sample.tds > 500.0 {
        insights.push(Insight::new(
            Severity::Warning,
            format!("High TDS levels detected: {:.0} PPM", sample.tds),
        ));
    }

    if sample.turbidity > 5.0 {
        insights.push(Insight::new(
            Severity::Danger,
            format!("Water is cloudy (high turbidity): {:.1} NTU", sample.turbidity),
        ));
    }

    if overall > 80.0 {
        insights.insert(
            0,
            Insight::new(Severity::Info, "Water quality is excellent".to_string()),
        );
    } else if overall < 50.0 {
        insights.insert(
            0,
            Insight::new(Severity::Danger, "Water quality is poor".to_string()),
        );
    }

    insights
}
