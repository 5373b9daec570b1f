//! Stored-name rules for uploaded files.
//!
//! An upload named `my notes?.txt` at millisecond `1700000000000` is stored
//! as `uploads/1700000000000_my_notes_.txt`. The display name is recovered by
//! stripping the leading `<digits>_` run, so sanitization is one-way.

use super::UPLOAD_PREFIX;

/// Whether a character may appear in a stored name unchanged.
fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
///
/// Characters are counted in UTF-16 code units, so a character outside the
/// Basic Multilingual Plane (most emoji) becomes two underscores. This keeps
/// stored names identical to those produced by the web client's uploader.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if is_safe(c) {
            out.push(c);
        } else {
            for _ in 0..c.len_utf16() {
                out.push('_');
            }
        }
    }
    out
}

/// Build the stored name `{millis}_{sanitized}`.
pub fn stored_name(millis: i64, original: &str) -> String {
    format!("{}_{}", millis, sanitize_filename(original))
}

/// Strip a leading run of digits followed by `_`.
///
/// Names without such a prefix are returned unchanged.
pub fn display_name(stored: &str) -> &str {
    let digits = stored.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 && stored.as_bytes().get(digits) == Some(&b'_') {
        &stored[digits + 1..]
    } else {
        stored
    }
}

/// Full object path for a stored name.
pub fn object_path(stored: &str) -> String {
    format!("{UPLOAD_PREFIX}/{stored}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_safe_names() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("A-b_c.9"), "A-b_c.9");
    }

    #[test]
    fn test_sanitize_replaces_unsafe() {
        assert_eq!(sanitize_filename("my notes?.txt"), "my_notes_.txt");
        assert_eq!(sanitize_filename("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize_filename("résumé.doc"), "r_sum_.doc");
    }

    #[test]
    fn test_sanitize_counts_utf16_units() {
        // U+1F4C4 needs a surrogate pair
        assert_eq!(sanitize_filename("📄doc.pdf"), "__doc.pdf");
        assert_eq!(sanitize_filename("日本.txt"), "__.txt");
    }

    #[test]
    fn test_sanitized_names_use_safe_set_only() {
        let inputs = ["weird name (1).tar.gz", "tab\there", "quote\"s", "ünï©ødé", "..", ""];
        for input in inputs {
            let stored = stored_name(1_700_000_000_000, input);
            let (prefix, rest) = stored.split_once('_').unwrap();
            assert!(prefix.bytes().all(|b| b.is_ascii_digit()));
            assert!(rest.chars().all(is_safe), "{rest:?} from {input:?}");
        }
    }

    #[test]
    fn test_stored_name_format() {
        assert_eq!(stored_name(1_700_000_000_000, "report.pdf"), "1700000000000_report.pdf");
        assert_eq!(
            stored_name(1_700_000_000_001, "my notes?.txt"),
            "1700000000001_my_notes_.txt"
        );
    }

    #[test]
    fn test_display_name_strips_prefix() {
        assert_eq!(display_name("1700000000000_report.pdf"), "report.pdf");
        assert_eq!(display_name("1700000000001_my_notes_.txt"), "my_notes_.txt");
        // Only the first digit run is stripped
        assert_eq!(display_name("12_34_file"), "34_file");
    }

    #[test]
    fn test_display_name_without_prefix() {
        assert_eq!(display_name("report.pdf"), "report.pdf");
        assert_eq!(display_name("_report.pdf"), "_report.pdf");
        assert_eq!(display_name("123report.pdf"), "123report.pdf");
        assert_eq!(display_name("123"), "123");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn test_display_name_idempotent_on_display_names() {
        let display = display_name("1700000000000_report.pdf");
        assert_eq!(display_name(display), display);
    }

    #[test]
    fn test_round_trip_safe_names() {
        for name in ["report.pdf", "a-b_c.tar.gz", "README"] {
            assert_eq!(display_name(&stored_name(42, name)), name);
        }
    }

    #[test]
    fn test_round_trip_recovers_sanitized_form() {
        let stored = stored_name(42, "my notes?.txt");
        assert_eq!(display_name(&stored), "my_notes_.txt");
    }

    #[test]
    fn test_object_path() {
        assert_eq!(object_path("1_a.txt"), "uploads/1_a.txt");
    }
}
