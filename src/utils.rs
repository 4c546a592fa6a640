/// Formatting helpers for chart labels and report filenames
use time::{format_description, OffsetDateTime};

/// HH:MM label for a sample on the live chart's time axis.
///
/// Falls back to the default string representation if formatting fails.
pub fn time_label(dt: &OffsetDateTime) -> String {
    let format =
        format_description::parse("[hour]:[minute]").expect("Failed to create format description");
    dt.format(&format).unwrap_or_else(|_| dt.to_string())
}

/// Filename for a CSV report stamped with the export time.
pub fn report_filename(dt: &OffsetDateTime) -> String {
    let format =
        format_description::parse("[year]-[month]-[day]_[hour]-[minute]-[second]")
            .expect("Failed to create format description");
    let stamp = dt.format(&format).unwrap_or_else(|_| dt.unix_timestamp().to_string());
    format!("Droplet_Water_Report_{}.csv", stamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_label_is_hour_minute() {
        // 2021-03-04 05:06:07 UTC
        let dt = OffsetDateTime::from_unix_timestamp(1_614_834_367).unwrap();
        assert_eq!(time_label(&dt), "05:06");
    }

    #[test]
    fn report_filename_is_stamped() {
        let dt = OffsetDateTime::from_unix_timestamp(1_614_834_367).unwrap();
        assert_eq!(
            report_filename(&dt),
            "Droplet_Water_Report_2021-03-04_05-06-07.csv"
        );
    }
}
