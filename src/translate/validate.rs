//! Advisory quality checks and statistics for finished translations

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use super::translator::TranslationResult;

pub const MIN_CONFIDENCE: f64 = 0.7;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s").unwrap());
static CODE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());

/// Structural markers counted in a markdown document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownShape {
    pub headings: usize,
    pub code_blocks: usize,
}

impl MarkdownShape {
    pub fn of(text: &str) -> Self {
        Self {
            headings: HEADING_RE.find_iter(text).count(),
            code_blocks: CODE_BLOCK_RE.find_iter(text).count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Structure,
    Content,
    Formatting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

impl Severity {
    fn penalty(&self) -> u8 {
        match self {
            Self::Medium => 20,
            Self::High => 40,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
    pub suggestions: Vec<String>,
    /// 0-100
    pub quality_score: u8,
}

pub fn validate(result: &TranslationResult) -> Validation {
    let mut issues = Vec::new();
    let mut suggestions = Vec::new();

    if result.confidence < MIN_CONFIDENCE {
        issues.push(ValidationIssue {
            kind: IssueKind::Content,
            severity: Severity::High,
            description: format!("Low translation confidence ({:.2})", result.confidence),
        });
        suggestions.push("Review the translation manually".to_string());
    }

    let original = MarkdownShape::of(&result.original_text);
    let translated = MarkdownShape::of(&result.translated_text);

    if original.headings != translated.headings {
        issues.push(ValidationIssue {
            kind: IssueKind::Structure,
            severity: Severity::Medium,
            description: format!(
                "Markdown heading count changed ({} -> {})",
                original.headings, translated.headings
            ),
        });
        suggestions.push("Check heading levels".to_string());
    }

    if original.code_blocks != translated.code_blocks {
        issues.push(ValidationIssue {
            kind: IssueKind::Formatting,
            severity: Severity::High,
            description: format!(
                "Code block count changed ({} -> {})",
                original.code_blocks, translated.code_blocks
            ),
        });
        suggestions.push("Check the fences around code blocks".to_string());
    }

    let penalty: u32 = issues.iter().map(|i| i.severity.penalty() as u32).sum();
    let quality_score = 100u32.saturating_sub(penalty) as u8;

    Validation {
        is_valid: issues.is_empty(),
        issues,
        suggestions,
        quality_score,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationStats {
    pub original_word_count: usize,
    pub translated_word_count: usize,
    pub glossary_terms_used: usize,
    /// Glossary terms used per original word
    pub translation_coverage: f64,
    /// Translated length over original length, in characters
    pub text_expansion_ratio: f64,
}

pub fn stats(result: &TranslationResult) -> TranslationStats {
    let original_word_count = result.original_text.split_whitespace().count();
    let translated_word_count = result.translated_text.split_whitespace().count();
    let glossary_terms_used = result.glossary_matches.len();

    let translation_coverage = if original_word_count == 0 {
        0.0
    } else {
        glossary_terms_used as f64 / original_word_count as f64
    };

    let original_chars = result.original_text.chars().count();
    let text_expansion_ratio = if original_chars == 0 {
        1.0
    } else {
        result.translated_text.chars().count() as f64 / original_chars as f64
    };

    TranslationStats {
        original_word_count,
        translated_word_count,
        glossary_terms_used,
        translation_coverage,
        text_expansion_ratio,
    }
}
