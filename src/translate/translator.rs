//! Glossary-driven translation of markdown text

use chrono::{DateTime, Utc};
use regex::NoExpand;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use super::glossary::Glossary;
use super::phrases::PhraseTable;
use super::protect::SpanProtector;
use super::validate::MarkdownShape;
use crate::error::{Result, TranslateError};

pub const ENGINE_NAME: &str = "glossary";

const BASE_CONFIDENCE: f64 = 0.55;
const STRUCTURE_WEIGHT: f64 = 0.30;
const COVERAGE_WEIGHT: f64 = 0.15;
/// One glossary match every this many words counts as full coverage
const WORDS_PER_MATCH: f64 = 10.0;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    Casual,
    #[default]
    Technical,
}

impl Tone {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "formal" => Some(Self::Formal),
            "casual" => Some(Self::Casual),
            "technical" => Some(Self::Technical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Casual => "casual",
            Self::Technical => "technical",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationOptions {
    /// Code blocks are always masked; kept for config compatibility
    pub preserve_code_blocks: bool,
    pub preserve_urls: bool,
    /// No-op. Span masking covers code, links and paths; headings and lists
    /// get no separate protection.
    pub preserve_markdown_structure: bool,
    pub use_glossary: bool,
    /// Recorded on the result for downstream consumers, does not change output
    pub target_tone: Tone,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            preserve_code_blocks: true,
            preserve_urls: true,
            preserve_markdown_structure: true,
            use_glossary: true,
            target_tone: Tone::Technical,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub original_text: String,
    pub translated_text: String,
    /// Source terms that matched, each listed once
    pub glossary_matches: Vec<String>,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
    pub tone: Tone,
    pub engine: String,
    pub processing_time_ms: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileMetadata<'a> {
    input_file: &'a Path,
    output_file: &'a Path,
    glossary_matches: &'a [String],
    confidence: f64,
    timestamp: DateTime<Utc>,
    options: &'a TranslationOptions,
}

pub struct Translator {
    glossary: Arc<Glossary>,
    protector: SpanProtector,
    phrases: PhraseTable,
}

impl Translator {
    pub fn new(glossary: Arc<Glossary>) -> Self {
        Self {
            glossary,
            protector: SpanProtector::new(),
            phrases: PhraseTable::new(),
        }
    }

    pub fn glossary(&self) -> &Glossary {
        &self.glossary
    }

    pub fn translate(&self, text: &str, options: &TranslationOptions) -> TranslationResult {
        let started = Instant::now();

        let (masked, spans) = self.protector.mask(text);

        let (translated, glossary_matches) = if options.use_glossary {
            self.apply_glossary(&masked)
        } else {
            (masked, Vec::new())
        };

        let translated = self.phrases.apply(&translated);
        let translated = self.protector.restore(&translated, &spans);

        let confidence = estimate_confidence(text, &translated, glossary_matches.len());
        let processing_time_ms = started.elapsed().as_millis() as u64;

        tracing::debug!(
            "Translated {} chars, {} protected spans, {} glossary matches",
            text.len(),
            spans.len(),
            glossary_matches.len()
        );

        TranslationResult {
            original_text: text.to_string(),
            translated_text: translated,
            glossary_matches,
            confidence,
            timestamp: Utc::now(),
            tone: options.target_tone,
            engine: ENGINE_NAME.to_string(),
            processing_time_ms,
        }
    }

    fn apply_glossary(&self, text: &str) -> (String, Vec<String>) {
        let mut result = text.to_string();
        let mut matches = Vec::new();

        for term in self.glossary.terms() {
            if term.pattern().is_match(&result) {
                result = term
                    .pattern()
                    .replace_all(&result, NoExpand(&term.target))
                    .into_owned();
                matches.push(term.source.clone());
            }
        }

        (result, matches)
    }

    /// Translate `input` into `output`, writing a sibling metadata file.
    pub fn translate_file(
        &self,
        input: &Path,
        output: &Path,
        options: &TranslationOptions,
    ) -> Result<TranslationResult> {
        if !input.exists() {
            return Err(TranslateError::FileNotFound(input.to_path_buf()));
        }

        let content = fs::read_to_string(input).map_err(|e| TranslateError::read(input, e))?;
        let result = self.translate(&content, options);

        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| TranslateError::write(parent, e))?;
        }

        fs::write(output, &result.translated_text)
            .map_err(|e| TranslateError::write(output, e))?;

        let metadata = FileMetadata {
            input_file: input,
            output_file: output,
            glossary_matches: &result.glossary_matches,
            confidence: result.confidence,
            timestamp: result.timestamp,
            options,
        };
        let json = serde_json::to_string_pretty(&metadata).map_err(|source| {
            TranslateError::Serialize {
                what: "translation metadata",
                source,
            }
        })?;

        let meta_path = metadata_path(output);
        fs::write(&meta_path, json).map_err(|e| TranslateError::write(&meta_path, e))?;

        tracing::debug!("Wrote {} and {}", output.display(), meta_path.display());

        Ok(result)
    }
}

pub fn metadata_path(output: &Path) -> PathBuf {
    output.with_extension("translation-meta.json")
}

/// Heuristic in [0.55, 1.0]: full marks need intact markdown structure and
/// dense glossary coverage.
fn estimate_confidence(original: &str, translated: &str, matches: usize) -> f64 {
    let structure = if MarkdownShape::of(original) == MarkdownShape::of(translated) {
        1.0
    } else {
        0.0
    };

    let words = original.split_whitespace().count();
    let coverage = if words == 0 {
        0.0
    } else {
        (matches as f64 * WORDS_PER_MATCH / words as f64).min(1.0)
    };

    let score = BASE_CONFIDENCE + STRUCTURE_WEIGHT * structure + COVERAGE_WEIGHT * coverage;
    (score * 1000.0).round() / 1000.0
}
