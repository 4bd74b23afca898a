use std::path::Path;

use crate::error::{ConfigError, ConfigResult};

/// Parse human-readable size string ("100MB") into bytes.
pub fn parse_size(s: &str) -> ConfigResult<u64> {
    let s = s.trim();
    let (num_str, multiplier) = if let Some(n) = s.strip_suffix("GB") {
        (n, 1_073_741_824u64)
    } else if let Some(n) = s.strip_suffix("gb") {
        (n, 1_073_741_824)
    } else if let Some(n) = s.strip_suffix("MB") {
        (n, 1_048_576)
    } else if let Some(n) = s.strip_suffix("mb") {
        (n, 1_048_576)
    } else if let Some(n) = s.strip_suffix("KB") {
        (n, 1_024)
    } else if let Some(n) = s.strip_suffix("kb") {
        (n, 1_024)
    } else if let Some(n) = s.strip_suffix("B") {
        (n, 1)
    } else if let Some(n) = s.strip_suffix("b") {
        (n, 1)
    } else {
        // assume bytes if no suffix
        (s, 1)
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidSize(format!("invalid number '{num_str}'")))?;

    if num < 0.0 {
        return Err(ConfigError::InvalidSize("size cannot be negative".to_string()));
    }

    Ok((num * multiplier as f64) as u64)
}

/// Format byte count as human-readable string.
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.2} GB", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.2} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1_024 {
        format!("{:.2} KB", bytes as f64 / 1_024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Like [`format_size`], with an explicit sign.
pub fn format_signed_size(bytes: i64) -> String {
    if bytes < 0 {
        format!("-{}", format_size(bytes.unsigned_abs()))
    } else {
        format!("+{}", format_size(bytes as u64))
    }
}

/// Shorten a path for display by replacing home dir with ~.
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_suffixes() {
        assert_eq!(parse_size("100MB").unwrap(), 104_857_600);
        assert_eq!(parse_size("1gb").unwrap(), 1_073_741_824);
        assert_eq!(parse_size(" 2 KB ").unwrap(), 2_048);
        assert_eq!(parse_size("512").unwrap(), 512);
        assert_eq!(parse_size("1.5KB").unwrap(), 1_536);
    }

    #[test]
    fn test_parse_size_rejects_garbage() {
        assert!(matches!(parse_size("lots"), Err(ConfigError::InvalidSize(_))));
        assert!(parse_size("-1MB").is_err());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1_536), "1.50 KB");
        assert_eq!(format_size(5 * 1_048_576), "5.00 MB");
        assert_eq!(format_size(3 * 1_073_741_824), "3.00 GB");
    }

    #[test]
    fn test_format_signed_size() {
        assert_eq!(format_signed_size(2_048), "+2.00 KB");
        assert_eq!(format_signed_size(-2_048), "-2.00 KB");
        assert_eq!(format_signed_size(0), "+0 B");
    }

    #[test]
    fn test_display_path_outside_home() {
        assert_eq!(display_path(Path::new("/var/tmp/x")), "/var/tmp/x");
    }
}
