//! Batch run configuration (JSON)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Result, TranslateError};
use crate::translate::translator::TranslationOptions;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchConfig {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub file_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub options: TranslationOptions,
    /// Files translated at once; values below 1 are treated as 1
    pub parallel_limit: usize,
    pub create_backup: bool,
    pub overwrite_existing: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("./content"),
            output_dir: PathBuf::from("./content/ja"),
            file_patterns: vec!["*.md".to_string(), "*.mdx".to_string()],
            exclude_patterns: vec![
                "node_modules/**".to_string(),
                ".git/**".to_string(),
                "dist/**".to_string(),
                "*.ja.md".to_string(),
                "*.ja.mdx".to_string(),
            ],
            options: TranslationOptions::default(),
            parallel_limit: 3,
            create_backup: true,
            overwrite_existing: false,
        }
    }
}

impl BatchConfig {
    /// Defaults with the persistent settings from the app config applied
    pub fn from_app_config(cfg: &Config) -> Self {
        Self {
            options: cfg.translation_options(),
            parallel_limit: cfg.batch.parallel_limit,
            create_backup: cfg.batch.create_backup,
            overwrite_existing: cfg.batch.overwrite_existing,
            ..Default::default()
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TranslateError::config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            TranslateError::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            TranslateError::config(format!("Failed to load config {}: {}", path.display(), e))
        })
    }

    pub fn write_default<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&Self::default()).map_err(|source| {
            TranslateError::Serialize {
                what: "batch config",
                source,
            }
        })?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| TranslateError::write(parent, e))?;
        }
        fs::write(path, json).map_err(|e| TranslateError::write(path, e))
    }

    pub fn effective_parallel_limit(&self) -> usize {
        self.parallel_limit.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_shape() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("translation.config.json");
        BatchConfig::write_default(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        for key in [
            "sourceDir",
            "outputDir",
            "filePatterns",
            "excludePatterns",
            "options",
            "parallelLimit",
            "createBackup",
            "overwriteExisting",
        ] {
            assert!(keys.iter().any(|k| k.as_str() == key), "missing {}", key);
        }
        assert_eq!(keys.len(), 8);
        assert_eq!(value["options"]["targetTone"], "technical");
        assert_eq!(value["excludePatterns"][3], "*.ja.md");

        let loaded = BatchConfig::load(&path).unwrap();
        assert_eq!(loaded.parallel_limit, 3);
        assert!(loaded.create_backup);
    }

    #[test]
    fn test_defaults_exclude_previous_outputs() {
        let config = BatchConfig::default();
        let excludes = crate::batch::pattern::PatternSet::new(&config.exclude_patterns).unwrap();
        assert!(excludes.matches_file("ja/guide.ja.md"));
        assert!(excludes.matches_file("ja/intro.ja.mdx"));
        assert!(!excludes.matches_file("guide.md"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("batch.json");
        fs::write(&path, r#"{"sourceDir": "docs", "parallelLimit": 0}"#).unwrap();

        let config = BatchConfig::load(&path).unwrap();
        assert_eq!(config.source_dir, PathBuf::from("docs"));
        assert_eq!(config.output_dir, PathBuf::from("./content/ja"));
        assert_eq!(config.effective_parallel_limit(), 1);
        assert!(config.options.use_glossary);
    }

    #[test]
    fn test_load_errors_are_configuration_errors() {
        let temp_dir = TempDir::new().unwrap();
        let missing = BatchConfig::load(temp_dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, TranslateError::Configuration(_)));

        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let malformed = BatchConfig::load(&path).unwrap_err();
        assert!(matches!(malformed, TranslateError::Configuration(_)));
    }
}
