const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Formats a byte count with binary units and one decimal place.
pub fn format_size(bytes: u64) -> String {
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    }
}

/// Formats a signed byte delta, used for savings that can go negative when output grows.
pub fn format_signed_size(bytes: i64) -> String {
    if bytes < 0 {
        format!("-{}", format_size(bytes.unsigned_abs()))
    } else {
        format_size(bytes as u64)
    }
}

/// Percentage of `original` saved by shrinking it to `converted`; 0 when nothing was read.
pub fn reduction_percent(original: u64, converted: u64) -> f64 {
    if original == 0 {
        0.0
    } else {
        (original as f64 - converted as f64) / original as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_boundaries() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_048_576), "1.0 MB");
        assert_eq!(format_size(1_073_741_824), "1.0 GB");
    }

    #[test]
    fn just_below_a_unit_stays_in_the_smaller_unit() {
        assert_eq!(format_size(MB - 1), "1024.0 KB");
    }

    #[test]
    fn negative_savings_keep_their_sign() {
        assert_eq!(format_signed_size(-2048), "-2.0 KB");
        assert_eq!(format_signed_size(512), "512 B");
    }

    #[test]
    fn reduction_guards_empty_originals() {
        assert_eq!(reduction_percent(0, 10), 0.0);
        assert_eq!(reduction_percent(200, 50), 75.0);
        assert!(reduction_percent(100, 150) < 0.0);
    }
}
