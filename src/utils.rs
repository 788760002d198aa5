//! Utility functions for filename handling and display formatting

use std::path::Path;

/// Produce a filesystem-safe version of an uploaded filename
///
/// Strips any path components and replaces characters outside
/// `[A-Za-z0-9._-]` with underscores. An empty result falls back to
/// `"upload"` so the caller always gets a usable name.
///
/// # Examples
///
/// ```
/// use docvox::utils::sanitize_filename;
///
/// assert_eq!(sanitize_filename("My Book (final).txt"), "My_Book__final_.txt");
/// assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    // Take only the final path component, defeating traversal attempts
    let base = Path::new(name)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // Reject names that are only dots/underscores after cleaning
    if cleaned.trim_matches(|c| c == '.' || c == '_').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Format a byte count for display ("512 B", "1.5 KB", "2.0 MB")
pub fn format_file_size(size_bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    if size_bytes < KIB {
        format!("{} B", size_bytes)
    } else if size_bytes < MIB {
        format!("{:.1} KB", size_bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", size_bytes as f64 / MIB as f64)
    }
}

/// Format a duration in seconds for display ("45 sec", "1.5 min", "2.0 hours")
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        format!("{:.0} sec", seconds)
    } else if seconds < 3600.0 {
        format!("{:.1} min", seconds / 60.0)
    } else {
        format!("{:.1} hours", seconds / 3600.0)
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    // --- sanitize_filename ---

    #[test]
    fn sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_filename("report-2024_v1.txt"), "report-2024_v1.txt");
    }

    #[test]
    fn sanitize_replaces_spaces_and_punctuation() {
        assert_eq!(sanitize_filename("My Book (final).txt"), "My_Book__final_.txt");
    }

    #[test]
    fn sanitize_strips_directory_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("/absolute/path/doc.txt"), "doc.txt");
    }

    #[test]
    fn sanitize_falls_back_for_degenerate_names() {
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename("..."), "upload");
        assert_eq!(sanitize_filename("///"), "upload");
    }

    // --- format_file_size ---

    #[test]
    fn format_file_size_bytes_range() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1023), "1023 B");
    }

    #[test]
    fn format_file_size_kilobytes_range() {
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024 - 1), "1024.0 KB");
    }

    #[test]
    fn format_file_size_megabytes_range() {
        assert_eq!(format_file_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024 + 512 * 1024), "5.5 MB");
    }

    // --- format_duration ---

    #[test]
    fn format_duration_seconds_range() {
        assert_eq!(format_duration(0.0), "0 sec");
        assert_eq!(format_duration(45.4), "45 sec");
        assert_eq!(format_duration(59.4), "59 sec");
    }

    #[test]
    fn format_duration_minutes_range() {
        assert_eq!(format_duration(60.0), "1.0 min");
        assert_eq!(format_duration(90.0), "1.5 min");
        assert_eq!(format_duration(3599.0), "60.0 min");
    }

    #[test]
    fn format_duration_hours_range() {
        assert_eq!(format_duration(3600.0), "1.0 hours");
        assert_eq!(format_duration(5400.0), "1.5 hours");
    }
}
