//! Common utility functions

use std::path::{Path, PathBuf};

pub const DEFAULT_LOCALE: &str = "ja";

pub fn truncate_display(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

/// `docs/README.md` -> `docs/README.ja.md`
pub fn localized_path(path: &Path, locale: &str) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let name = match path.extension() {
        Some(ext) => format!("{}.{}.{}", stem, locale, ext.to_string_lossy()),
        None => format!("{}.{}", stem, locale),
    };
    path.with_file_name(name)
}

/// Relative path with `/` separators regardless of platform
pub fn relative_slash_path(base: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_path() {
        assert_eq!(
            localized_path(Path::new("docs/README.md"), "ja"),
            PathBuf::from("docs/README.ja.md")
        );
        assert_eq!(
            localized_path(Path::new("LICENSE"), "ja"),
            PathBuf::from("LICENSE.ja")
        );
    }

    #[test]
    fn test_relative_slash_path() {
        let base = Path::new("content");
        assert_eq!(
            relative_slash_path(base, &base.join("guides").join("intro.md")),
            "guides/intro.md"
        );
    }

    #[test]
    fn test_truncate_display() {
        assert_eq!(truncate_display("はじめに", 2), "はじ...");
        assert_eq!(truncate_display("short", 10), "short");
    }
}
