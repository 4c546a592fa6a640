/// CSV report export for the buffered sample window
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use time::OffsetDateTime;

use crate::buffer::RollingBuffer;
use crate::utils::report_filename;

/// Write the buffered window as a timestamped CSV report under `dir`.
/// Returns the path of the written file.
pub fn write_report(buffer: &RollingBuffer, dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join(report_filename(&OffsetDateTime::now_utc()));
    fs::write(&path, buffer.to_csv())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sample;

    #[test]
    fn writes_csv_to_the_given_directory() {
        let dir = std::env::temp_dir().join(format!("droplet-report-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let mut buffer = RollingBuffer::new();
        buffer.append(
            &Sample {
                ph: 7.0,
                tds: 120.0,
                turbidity: 0.5,
                turbidity_status: "CLEAR".to_string(),
                temperature: 22.5,
                timestamp: OffsetDateTime::UNIX_EPOCH,
            },
            "09:15".to_string(),
        );

        let path = write_report(&buffer, &dir).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Time,pH,TDS (PPM),Turbidity,Temp (°C)\n"));
        assert!(contents.contains("\"09:15\",7,120,0.5,22.5"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
