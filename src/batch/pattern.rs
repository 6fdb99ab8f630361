//! Glob matching for include/exclude patterns
//!
//! `*` matches a run of non-separator characters, `**` matches anything
//! including `/`. Matching is anchored. Patterns containing `/` are tested
//! against the whole relative path, others against the file name only.

use regex::Regex;

use crate::error::{Result, TranslateError};

#[derive(Debug, Clone)]
pub struct GlobPattern {
    regex: Regex,
    match_path: bool,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&glob_to_regex(pattern)).map_err(|e| {
            TranslateError::config(format!("Invalid file pattern '{}': {}", pattern, e))
        })?;

        Ok(Self {
            regex,
            match_path: pattern.contains('/'),
        })
    }

    pub fn matches_file(&self, rel_path: &str) -> bool {
        if self.match_path {
            self.regex.is_match(rel_path)
        } else {
            self.regex.is_match(file_name(rel_path))
        }
    }

    /// `node_modules/**` also claims the `node_modules` directory itself
    pub fn matches_dir(&self, rel_path: &str) -> bool {
        if self.match_path {
            self.regex.is_match(rel_path) || self.regex.is_match(&format!("{}/", rel_path))
        } else {
            self.regex.is_match(file_name(rel_path))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<GlobPattern>,
}

impl PatternSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| GlobPattern::new(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches_file(&self, rel_path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches_file(rel_path))
    }

    pub fn matches_dir(&self, rel_path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches_dir(rel_path))
    }
}

fn file_name(rel_path: &str) -> &str {
    rel_path.rsplit('/').next().unwrap_or(rel_path)
}

pub fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::from("^");
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '*' {
            literal.push(c);
            continue;
        }
        out.push_str(&regex::escape(&literal));
        literal.clear();
        if chars.peek() == Some(&'*') {
            chars.next();
            out.push_str(".*");
        } else {
            out.push_str("[^/]*");
        }
    }

    out.push_str(&regex::escape(&literal));
    out.push('$');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_to_regex() {
        assert_eq!(glob_to_regex("*.md"), r"^[^/]*\.md$");
        assert_eq!(glob_to_regex("docs/**"), r"^docs/.*$");
    }

    #[test]
    fn test_file_name_patterns() {
        let md = GlobPattern::new("*.md").unwrap();
        assert!(md.matches_file("README.md"));
        assert!(md.matches_file("guides/intro.md"));
        assert!(!md.matches_file("README.mdx"));
        assert!(!md.matches_file("READMEmd"));
    }

    #[test]
    fn test_path_patterns() {
        let modules = GlobPattern::new("node_modules/**").unwrap();
        assert!(modules.matches_file("node_modules/pkg/README.md"));
        assert!(modules.matches_dir("node_modules"));
        assert!(!modules.matches_file("docs/node_modules/a.md"));

        let single = GlobPattern::new("docs/*.md").unwrap();
        assert!(single.matches_file("docs/a.md"));
        assert!(!single.matches_file("docs/deep/a.md"));
    }

    #[test]
    fn test_pattern_set() {
        let set = PatternSet::new(&["*.md", "*.mdx"]).unwrap();
        assert!(set.matches_file("a.mdx"));
        assert!(!set.matches_file("a.txt"));
        assert!(!PatternSet::new::<&str>(&[]).unwrap().matches_file("a.md"));
    }
}
