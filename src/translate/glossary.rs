//! Glossary support for consistent term translation

use regex::{Regex, RegexBuilder};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{Result, TranslateError};

pub const DEFAULT_GLOSSARY_FILE: &str = "glossary.toml";

/// Source term to target term, in the order the file lists them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermMap(Vec<(String, String)>);

impl TermMap {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter().map(|(k, v)| (k, v))
    }
}

impl FromIterator<(String, String)> for TermMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for TermMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TermMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TermMapVisitor;

        impl<'de> Visitor<'de> for TermMapVisitor {
            type Value = TermMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a table of term translations")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<TermMap, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    entries.push((k, v));
                }
                Ok(TermMap(entries))
            }
        }

        deserializer.deserialize_map(TermMapVisitor)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextPatterns {
    #[serde(default)]
    pub development: TermMap,
    #[serde(default)]
    pub features: TermMap,
    #[serde(default)]
    pub documentation: TermMap,
}

/// On-disk glossary layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlossaryDocument {
    #[serde(default)]
    pub ai_terms: TermMap,
    #[serde(default)]
    pub dev_tools: TermMap,
    #[serde(default)]
    pub languages: TermMap,
    #[serde(default)]
    pub ui_ux: TermMap,
    #[serde(default)]
    pub business: TermMap,

    /// Terms that stay in English even when a category maps them
    #[serde(default)]
    pub keep_english: Vec<String>,

    #[serde(default)]
    pub context_patterns: ContextPatterns,

    /// Guidance for human translators, never applied to text
    #[serde(default)]
    pub translation_notes: Vec<String>,
}

impl GlossaryDocument {
    /// Term maps in merge order. Later maps win when a term is repeated.
    pub fn categories(&self) -> [(&'static str, &TermMap); 8] {
        [
            ("ai_terms", &self.ai_terms),
            ("dev_tools", &self.dev_tools),
            ("languages", &self.languages),
            ("ui_ux", &self.ui_ux),
            ("business", &self.business),
            ("context_patterns.development", &self.context_patterns.development),
            ("context_patterns.features", &self.context_patterns.features),
            ("context_patterns.documentation", &self.context_patterns.documentation),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct GlossaryTerm {
    pub source: String,
    pub target: String,
    pattern: Regex,
}

impl GlossaryTerm {
    fn compile(source: String, target: String) -> Result<Self> {
        let pattern = RegexBuilder::new(&format!(r"(?-u:\b){}(?-u:\b)", regex::escape(&source)))
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                TranslateError::config(format!("Invalid glossary term '{}': {}", source, e))
            })?;

        Ok(Self {
            source,
            target,
            pattern,
        })
    }

    /// Whole-word, case-insensitive matcher for the source term. Word
    /// boundaries are ASCII, so kana and kanji next to a term do not block it.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

/// Loaded glossary. Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Glossary {
    document: GlossaryDocument,
    terms: Vec<GlossaryTerm>,
}

impl Glossary {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TranslateError::config(format!(
                "Glossary file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            TranslateError::config(format!(
                "Failed to read glossary {}: {}",
                path.display(),
                e
            ))
        })?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let document: GlossaryDocument = if is_json {
            serde_json::from_str(&content).map_err(|e| {
                TranslateError::config(format!("Failed to parse glossary {}: {}", path.display(), e))
            })?
        } else {
            toml::from_str(&content).map_err(|e| {
                TranslateError::config(format!("Failed to parse glossary {}: {}", path.display(), e))
            })?
        };

        let glossary = Self::from_document(document)?;
        tracing::debug!(
            "Loaded {} glossary terms from {}",
            glossary.len(),
            path.display()
        );
        Ok(glossary)
    }

    pub fn from_document(document: GlossaryDocument) -> Result<Self> {
        let keep: HashSet<String> = document
            .keep_english
            .iter()
            .map(|t| t.to_lowercase())
            .collect();

        // Flatten with last-write-wins on case-insensitive key collisions
        let mut merged: Vec<(String, String)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for (category, map) in document.categories() {
            for (source, target) in map.iter() {
                if source.trim().is_empty() {
                    tracing::warn!("Ignoring empty glossary term in {}", category);
                    continue;
                }
                let key = source.to_lowercase();
                match index.get(&key) {
                    Some(&i) => merged[i] = (source.clone(), target.clone()),
                    None => {
                        index.insert(key, merged.len());
                        merged.push((source.clone(), target.clone()));
                    }
                }
            }
        }

        let mut terms = merged
            .into_iter()
            .filter(|(source, _)| !keep.contains(&source.to_lowercase()))
            .map(|(source, target)| GlossaryTerm::compile(source, target))
            .collect::<Result<Vec<_>>>()?;

        // Longer terms first to avoid partial replacements
        terms.sort_by(|a, b| b.source.chars().count().cmp(&a.source.chars().count()));

        Ok(Self { document, terms })
    }

    /// Substitution table, longest source term first
    pub fn terms(&self) -> &[GlossaryTerm] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn keep_english(&self) -> &[String] {
        &self.document.keep_english
    }

    pub fn notes(&self) -> &[String] {
        &self.document.translation_notes
    }

    pub fn category_sizes(&self) -> Vec<(&'static str, usize)> {
        self.document
            .categories()
            .iter()
            .map(|(name, map)| (*name, map.len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn doc(ai: &[(&str, &str)], dev: &[(&str, &str)], keep: &[&str]) -> GlossaryDocument {
        GlossaryDocument {
            ai_terms: ai.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            dev_tools: dev.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            keep_english: keep.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_load_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("glossary.toml");
        fs::write(
            &path,
            r#"
keep_english = ["GitHub"]
translation_notes = ["Use desu/masu form"]

[ai_terms]
"AI agent" = "AIエージェント"
"prompt" = "プロンプト"

[dev_tools]
"GitHub" = "ギットハブ"

[context_patterns.documentation]
"repository" = "リポジトリ"
"#,
        )
        .unwrap();

        let glossary = Glossary::load(&path).unwrap();
        assert_eq!(glossary.len(), 3);
        assert_eq!(glossary.terms()[0].source, "repository");
        assert_eq!(glossary.keep_english(), ["GitHub".to_string()]);
        assert!(glossary.terms().iter().all(|t| t.source != "GitHub"));
        assert_eq!(glossary.notes(), ["Use desu/masu form".to_string()]);
    }

    #[test]
    fn test_load_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("glossary.json");
        fs::write(&path, r#"{"ui_ux": {"dashboard": "ダッシュボード"}}"#).unwrap();

        let glossary = Glossary::load(&path).unwrap();
        assert_eq!(glossary.len(), 1);
        assert_eq!(glossary.terms()[0].target, "ダッシュボード");
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = Glossary::load("/nonexistent/glossary.toml").unwrap_err();
        assert!(matches!(err, TranslateError::Configuration(_)));
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("glossary.toml");
        fs::write(&path, "[ai_terms\n\"broken = ").unwrap();

        let err = Glossary::load(&path).unwrap_err();
        assert!(matches!(err, TranslateError::Configuration(_)));
    }

    #[test]
    fn test_later_category_wins() {
        let glossary = Glossary::from_document(doc(
            &[("model", "モデル")],
            &[("Model", "型")],
            &[],
        ))
        .unwrap();

        assert_eq!(glossary.len(), 1);
        assert_eq!(glossary.terms()[0].source, "Model");
        assert_eq!(glossary.terms()[0].target, "型");
    }

    #[test]
    fn test_longest_first() {
        let glossary = Glossary::from_document(doc(
            &[("AI", "人工知能"), ("AI agent", "AIエージェント"), ("LLM", "大規模言語モデル")],
            &[],
            &[],
        ))
        .unwrap();

        let sources: Vec<&str> = glossary.terms().iter().map(|t| t.source.as_str()).collect();
        assert_eq!(sources[0], "AI agent");
        assert_eq!(sources[1], "LLM");
        assert_eq!(sources[2], "AI");
    }

    #[test]
    fn test_keep_english_excluded_case_insensitive() {
        let glossary = Glossary::from_document(doc(
            &[("Claude", "クロード"), ("token", "トークン")],
            &[],
            &["CLAUDE"],
        ))
        .unwrap();

        assert_eq!(glossary.len(), 1);
        assert_eq!(glossary.terms()[0].source, "token");
    }

    #[test]
    fn test_same_category_collision_follows_file_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("glossary.toml");
        fs::write(
            &path,
            "[ai_terms]\n\"model\" = \"モデル\"\n\"Model\" = \"型\"\n\"agent\" = \"エージェント\"\n",
        )
        .unwrap();

        let glossary = Glossary::load(&path).unwrap();
        assert_eq!(glossary.len(), 2);
        let model = glossary.terms().iter().find(|t| t.source == "Model").unwrap();
        assert_eq!(model.target, "型");

        let json_path = temp_dir.path().join("glossary.json");
        fs::write(&json_path, r#"{"ai_terms": {"Model": "型", "model": "モデル"}}"#).unwrap();
        let glossary = Glossary::load(&json_path).unwrap();
        assert_eq!(glossary.terms()[0].target, "モデル");
    }

    #[test]
    fn test_equal_length_terms_keep_merge_order() {
        let glossary = Glossary::from_document(doc(
            &[("zeta", "ゼータ"), ("beta", "ベータ")],
            &[("alfa", "アルファ")],
            &[],
        ))
        .unwrap();

        let sources: Vec<&str> = glossary.terms().iter().map(|t| t.source.as_str()).collect();
        assert_eq!(sources, ["zeta", "beta", "alfa"]);
    }

    #[test]
    fn test_term_matches_next_to_japanese() {
        let glossary =
            Glossary::from_document(doc(&[("agent", "エージェント")], &[], &[])).unwrap();
        let pattern = glossary.terms()[0].pattern();
        assert!(pattern.is_match("Claudeのagent機能"));
        assert!(!pattern.is_match("subagents"));
    }

    #[test]
    fn test_term_pattern_is_whole_word() {
        let glossary = Glossary::from_document(doc(&[("API", "エーピーアイ")], &[], &[])).unwrap();
        let pattern = glossary.terms()[0].pattern();
        assert!(pattern.is_match("the api is stable"));
        assert!(!pattern.is_match("rapid iteration"));
    }
}
