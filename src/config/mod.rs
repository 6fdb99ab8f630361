//! Configuration management

pub mod commands;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::translate::glossary::DEFAULT_GLOSSARY_FILE;
use crate::translate::translator::{Tone, TranslationOptions};
use crate::utils::DEFAULT_LOCALE;

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_NAME: &str = "honyaku";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub glossary: GlossaryConfig,

    #[serde(default)]
    pub translation: TranslationConfig,

    #[serde(default)]
    pub batch: BatchDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneralConfig {
    /// Log debug output when RUST_LOG is not set
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GlossaryConfig {
    /// Glossary file (TOML or JSON)
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Default tone (formal, casual, technical)
    #[serde(default)]
    pub tone: Tone,

    #[serde(default = "default_true")]
    pub use_glossary: bool,

    /// Marker inserted before the extension of output files
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_true() -> bool {
    true
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            tone: Tone::default(),
            use_glossary: true,
            locale: default_locale(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDefaults {
    #[serde(default = "default_parallel_limit")]
    pub parallel_limit: usize,

    #[serde(default = "default_true")]
    pub create_backup: bool,

    #[serde(default)]
    pub overwrite_existing: bool,
}

fn default_parallel_limit() -> usize {
    3
}

impl Default for BatchDefaults {
    fn default() -> Self {
        Self {
            parallel_limit: default_parallel_limit(),
            create_backup: true,
            overwrite_existing: false,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_NAME))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join(CONFIG_FILE_NAME))
    }

    /// Load config from default location
    pub fn load() -> Result<Self> {
        let path = Self::config_path().context("Could not determine config path")?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save config to default location
    pub fn save(&self) -> Result<PathBuf> {
        let dir = Self::config_dir().context("Could not determine config directory")?;
        fs::create_dir_all(&dir).context("Failed to create config directory")?;

        let path = dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content).context("Failed to write config file")?;

        Ok(path)
    }

    /// Glossary to load: explicit path, then config, then `glossary.toml`
    pub fn glossary_path(&self, explicit: Option<&std::path::Path>) -> PathBuf {
        match explicit {
            Some(p) => p.to_path_buf(),
            None => self
                .glossary
                .path
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_GLOSSARY_FILE)),
        }
    }

    pub fn translation_options(&self) -> TranslationOptions {
        TranslationOptions {
            use_glossary: self.translation.use_glossary,
            target_tone: self.translation.tone,
            ..Default::default()
        }
    }
}
