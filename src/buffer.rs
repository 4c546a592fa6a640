/// Bounded window of recent samples feeding the chart series and CSV report
use crate::models::Sample;

/// How many samples the live chart keeps.
pub const WINDOW_CAPACITY: usize = 20;

const CSV_HEADER: &str = "Time,pH,TDS (PPM),Turbidity,Temp (°C)";

/// Fixed-capacity FIFO of the most recent samples, kept as parallel series.
///
/// Chart consumers index labels and metric series by position, so all five
/// sequences must stay the same length at all times. Eviction removes
/// index 0 from every sequence before a new point is appended; there is no
/// other mutation path.
#[derive(Debug, Default)]
pub struct RollingBuffer {
    labels: Vec<String>,
    ph: Vec<f64>,
    tds: Vec<f64>,
    turbidity: Vec<f64>,
    temperature: Vec<f64>,
}

impl RollingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Append one sample and its display label, evicting the oldest point
    /// first when the window is full.
    pub fn append(&mut self, sample: &Sample, label: String) {
        if self.labels.len() >= WINDOW_CAPACITY {
            self.labels.remove(0);
            self.ph.remove(0);
            self.tds.remove(0);
            self.turbidity.remove(0);
            self.temperature.remove(0);
        }
        self.labels.push(label);
        self.ph.push(sample.ph);
        self.tds.push(sample.tds);
        self.turbidity.push(sample.turbidity);
        self.temperature.push(sample.temperature);
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn ph_series(&self) -> &[f64] {
        &self.ph
    }

    pub fn tds_series(&self) -> &[f64] {
        &self.tds
    }

    pub fn turbidity_series(&self) -> &[f64] {
        &self.turbidity
    }

    pub fn temperature_series(&self) -> &[f64] {
        &self.temperature
    }

    /// Render the buffered window as CSV, one row per sample. Matches the
    /// dashboard export format: only the time field is quoted.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(CSV_HEADER);
        out.push('\n');
        for i in 0..self.labels.len() {
            out.push_str(&format!(
                "\"{}\",{},{},{},{}\n",
                self.labels[i], self.ph[i], self.tds[i], self.turbidity[i], self.temperature[i]
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn sample(ph: f64) -> Sample {
        Sample {
            ph,
            tds: 120.0,
            turbidity: 0.5,
            turbidity_status: "CLEAR".to_string(),
            temperature: 22.5,
            timestamp: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn series_lengths(buffer: &RollingBuffer) -> [usize; 5] {
        [
            buffer.labels().len(),
            buffer.ph_series().len(),
            buffer.tds_series().len(),
            buffer.turbidity_series().len(),
            buffer.temperature_series().len(),
        ]
    }

    #[test]
    fn grows_until_capacity() {
        let mut buffer = RollingBuffer::new();
        for i in 0..WINDOW_CAPACITY {
            buffer.append(&sample(i as f64), format!("{}", i));
            assert_eq!(buffer.len(), i + 1);
        }
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut buffer = RollingBuffer::new();
        for i in 0..25 {
            buffer.append(&sample(i as f64), format!("{}", i));
        }
        assert_eq!(buffer.len(), WINDOW_CAPACITY);
        // The last 20 appends survive in original relative order.
        let expected: Vec<String> = (5..25).map(|i| format!("{}", i)).collect();
        assert_eq!(buffer.labels(), expected.as_slice());
        assert_eq!(buffer.ph_series()[0], 5.0);
        assert_eq!(buffer.ph_series()[19], 24.0);
    }

    #[test]
    fn parallel_series_stay_aligned() {
        let mut buffer = RollingBuffer::new();
        for i in 0..37 {
            buffer.append(&sample(i as f64), format!("{}", i));
            let lengths = series_lengths(&buffer);
            assert!(lengths.iter().all(|&l| l == lengths[0]), "{:?}", lengths);
        }
    }

    #[test]
    fn csv_has_header_and_quoted_time() {
        let mut buffer = RollingBuffer::new();
        buffer.append(&sample(7.0), "09:15".to_string());
        buffer.append(&sample(7.2), "09:20".to_string());

        let csv = buffer.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Time,pH,TDS (PPM),Turbidity,Temp (°C)");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "\"09:15\",7,120,0.5,22.5");
        assert_eq!(lines[2], "\"09:20\",7.2,120,0.5,22.5");
    }
}
