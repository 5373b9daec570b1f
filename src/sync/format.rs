//! Human-readable sizes.

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format a byte count with base-1024 units and at most one decimal.
///
/// Trailing `.0` is dropped, so 1024 bytes is `1 KB` and 1536 is `1.5 KB`.
/// Sizes beyond the gigabyte range stay in GB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 10.0).round() / 10.0;
    format!("{} {}", rounded, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(format_bytes(0), "0 B");
    }

    #[test]
    fn test_bytes() {
        assert_eq!(format_bytes(1), "1 B");
        assert_eq!(format_bytes(1023), "1023 B");
    }

    #[test]
    fn test_units() {
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(10 * 1024 * 1024), "10 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024 / 2), "1.5 GB");
    }

    #[test]
    fn test_rounding() {
        // 1.04 KB
        assert_eq!(format_bytes(1065), "1 KB");
        // 1.05 KB rounds up
        assert_eq!(format_bytes(1076), "1.1 KB");
    }

    #[test]
    fn test_large_stays_in_gb() {
        assert_eq!(format_bytes(2 * 1024 * 1024 * 1024 * 1024), "2048 GB");
    }
}
