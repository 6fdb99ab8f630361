//! Masking of spans that must pass through translation unchanged

use regex::{Captures, Regex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanClass {
    CodeBlock,
    InlineCode,
    Url,
    Link,
    FilePath,
}

impl SpanClass {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::CodeBlock => "CODE_BLOCK",
            Self::InlineCode => "INLINE_CODE",
            Self::Url => "URL",
            Self::Link => "LINK",
            Self::FilePath => "FILE_PATH",
        }
    }
}

/// Placeholder to original text, in the order spans were masked.
#[derive(Debug, Clone, Default)]
pub struct SpanMap {
    entries: Vec<(String, String)>,
}

impl SpanMap {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == placeholder)
            .map(|(_, original)| original.as_str())
    }

    /// Put every masked span back. Newest first, so a span that swallowed an
    /// earlier placeholder is unwound before that placeholder is.
    pub fn restore(&self, text: &str) -> String {
        let mut restored = text.to_string();
        for (placeholder, original) in self.entries.iter().rev() {
            if restored.contains(placeholder.as_str()) {
                restored = restored.replace(placeholder.as_str(), original);
            }
        }
        restored
    }
}

pub struct SpanProtector {
    // Order matters: earlier classes claim text before later ones can see it
    patterns: Vec<(SpanClass, Regex)>,
}

impl Default for SpanProtector {
    fn default() -> Self {
        Self::new()
    }
}

impl SpanProtector {
    pub fn new() -> Self {
        Self {
            patterns: vec![
                (SpanClass::CodeBlock, Regex::new(r"(?s)```.*?```").unwrap()),
                (SpanClass::InlineCode, Regex::new(r"`[^`]+`").unwrap()),
                (SpanClass::Url, Regex::new(r"https?://\S+").unwrap()),
                (SpanClass::Link, Regex::new(r"\[[^\]]+\]\([^)]+\)").unwrap()),
                (
                    SpanClass::FilePath,
                    Regex::new(r"(?:\./|/)\S+\.[a-zA-Z0-9]+").unwrap(),
                ),
            ],
        }
    }

    pub fn mask(&self, text: &str) -> (String, SpanMap) {
        let mut map = SpanMap::default();
        let mut masked = text.to_string();
        let mut counter = 0usize;

        for (class, pattern) in &self.patterns {
            let input = std::mem::take(&mut masked);
            masked = pattern
                .replace_all(&input, |caps: &Captures| {
                    // A counter is unusable if `TAG_N` already appears in this pass's
                    // input: a placeholder landing next to it could complete a copy.
                    while input.contains(&format!("{}_{}", class.tag(), counter))
                        || text.contains(&format!("__{}_{}__", class.tag(), counter))
                    {
                        counter += 1;
                    }
                    let placeholder = format!("__{}_{}__", class.tag(), counter);
                    counter += 1;
                    map.entries.push((placeholder.clone(), caps[0].to_string()));
                    placeholder
                })
                .into_owned();
        }

        (masked, map)
    }

    pub fn restore(&self, text: &str, map: &SpanMap) -> String {
        map.restore(text)
    }
}
