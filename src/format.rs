/// Display formatting helpers for file sizes and timestamps

use chrono::{DateTime, Utc};

/// Unit used when rendering a byte count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeUnit {
    /// Raw byte count with `.` as the thousands separator
    Bytes,
    /// Mebibytes with three decimals
    #[default]
    Mb,
}

/// Format a byte count for display.
///
/// `Bytes` groups thousands with dots (`1234567` → `1.234.567 Bytes`),
/// `Mb` divides by 1,048,576 and keeps three decimals (`1.000 MB`).
pub fn format_file_size(bytes: u64, unit: SizeUnit) -> String {
    match unit {
        SizeUnit::Bytes => format!("{} Bytes", group_thousands(bytes)),
        SizeUnit::Mb => {
            let size_in_mb = bytes as f64 / (1024.0 * 1024.0);
            format!("{:.3} MB", size_in_mb)
        }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    grouped
}

/// Format a timestamp the way the upload notification shows it,
/// e.g. `October 19, 2026 at 03:04:05 PM` (UTC).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y at %I:%M:%S %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_megabytes() {
        assert_eq!(format_file_size(1_048_576, SizeUnit::Mb), "1.000 MB");
        assert_eq!(format_file_size(0, SizeUnit::Mb), "0.000 MB");
        assert_eq!(format_file_size(2_621_440, SizeUnit::Mb), "2.500 MB");
        assert_eq!(format_file_size(1_500, SizeUnit::default()), "0.001 MB");
    }

    #[test]
    fn test_bytes_grouping() {
        assert_eq!(format_file_size(0, SizeUnit::Bytes), "0 Bytes");
        assert_eq!(format_file_size(999, SizeUnit::Bytes), "999 Bytes");
        assert_eq!(format_file_size(1_000, SizeUnit::Bytes), "1.000 Bytes");
        assert_eq!(format_file_size(1_234_567, SizeUnit::Bytes), "1.234.567 Bytes");
    }

    #[test]
    fn test_timestamp() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 15, 4, 5).unwrap();
        assert_eq!(format_timestamp(at), "October 19, 2026 at 03:04:05 PM");

        let morning = Utc.with_ymd_and_hms(2024, 1, 2, 0, 30, 0).unwrap();
        assert_eq!(format_timestamp(morning), "January 2, 2024 at 12:30:00 AM");
    }
}
