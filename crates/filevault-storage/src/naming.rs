//! File name rules shared by uploads, renames, storage keys and exports.

use uuid::Uuid;

use filevault_core::error::AppError;
use filevault_core::result::AppResult;

/// Longest name portion kept in a storage key, in bytes.
///
/// A UUID plus separator is 37 bytes; common file systems cap a single
/// component at 255.
pub const MAX_KEY_NAME_BYTES: usize = 200;

/// Reduce a client-supplied name to a bare file name.
///
/// Surrounding whitespace is trimmed and everything up to the last `/` or
/// `\` is dropped. Names that end up empty, `.` or `..` are rejected.
pub fn sanitize_file_name(name: &str) -> AppResult<String> {
    let base = name
        .trim()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "." || base == ".." {
        return Err(AppError::validation("Invalid file name"));
    }
    Ok(base.to_string())
}

/// The extension of `name`: the text after the last `.`, when that dot is
/// not the first character and something follows it.
pub fn extension(name: &str) -> Option<&str> {
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) if idx + 1 == name.len() => None,
        Some(idx) => Some(&name[idx + 1..]),
    }
}

/// Split `name` into stem and extension using the [`extension`] rule.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match extension(name) {
        Some(ext) => (&name[..name.len() - ext.len() - 1], Some(ext)),
        None => (name, None),
    }
}

/// Build the storage key `"<token>_<name>"`.
///
/// Control characters in the name become `_` and the name is cut to
/// [`MAX_KEY_NAME_BYTES`] on a character boundary.
pub fn storage_key(token: Uuid, name: &str) -> String {
    let mut safe = String::with_capacity(name.len().min(MAX_KEY_NAME_BYTES));
    for c in name.chars() {
        let c = if c.is_control() { '_' } else { c };
        if safe.len() + c.len_utf8() > MAX_KEY_NAME_BYTES {
            break;
        }
        safe.push(c);
    }
    format!("{token}_{safe}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\a.txt").unwrap(), "a.txt");
        assert_eq!(sanitize_file_name("  report.pdf  ").unwrap(), "report.pdf");
        assert_eq!(sanitize_file_name("dir/ spaced.txt").unwrap(), "spaced.txt");
    }

    #[test]
    fn test_sanitize_rejects_degenerate_names() {
        for name in ["", "   ", ".", "..", "a/..", "dir/", "x\\."] {
            assert!(sanitize_file_name(name).is_err(), "{name:?} should be rejected");
        }
    }

    #[test]
    fn test_extension_rule() {
        assert_eq!(extension("report.pdf"), Some("pdf"));
        assert_eq!(extension("archive.tar.gz"), Some("gz"));
        assert_eq!(extension(".bashrc"), None);
        assert_eq!(extension("trailing."), None);
        assert_eq!(extension("summary"), None);
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("x.txt"), ("x", Some("txt")));
        assert_eq!(split_extension("README"), ("README", None));
        assert_eq!(split_extension(".env"), (".env", None));
    }

    #[test]
    fn test_storage_key_is_truncated_on_char_boundary() {
        let token = Uuid::new_v4();
        let long = "é".repeat(150);
        let key = storage_key(token, &long);
        let name = key.split_once('_').unwrap().1;
        assert!(name.len() <= MAX_KEY_NAME_BYTES);
        assert_eq!(name.chars().count(), MAX_KEY_NAME_BYTES / 2);
        assert!(key.starts_with(&token.to_string()));
    }

    #[test]
    fn test_storage_key_replaces_control_chars() {
        let key = storage_key(Uuid::nil(), "a\nb\0.txt");
        assert!(key.ends_with("_a_b_.txt"));
    }
}
