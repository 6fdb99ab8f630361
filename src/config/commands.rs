//! Config command handlers

use anyhow::{Context, Result};
use colored::Colorize;

use super::Config;
use crate::cli::{ConfigAction, ConfigArgs};
use crate::translate::translator::Tone;

pub fn run(args: ConfigArgs) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(),
        ConfigAction::Init { force } => init_config(force),
        ConfigAction::Set { key, value } => set_config(&key, &value),
        ConfigAction::Get { key } => get_config(&key),
        ConfigAction::Path => show_path(),
        ConfigAction::Edit => edit_config(),
    }
}

fn show_config() -> Result<()> {
    let config = Config::load()?;
    let content = toml::to_string_pretty(&config)?;

    println!("{}", "[Config]".green());
    println!("{}", content);

    Ok(())
}

fn init_config(force: bool) -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    if path.exists() && !force {
        println!(
            "{}",
            format!("Config file already exists: {}", path.display()).yellow()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let config = Config::default();
    let saved_path = config.save()?;

    println!("{}", "[Config] Initialized".green());
    println!("  Created: {}", saved_path.display());
    println!();
    println!("Point it at your glossary with:");
    println!("  honyaku config set glossary.path ./glossary.toml");

    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;

    // Parse key path (e.g., "translation.tone")
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "verbose"] => {
            config.general.verbose = parse_bool(key, value)?;
        }
        ["glossary", "path"] => {
            config.glossary.path = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            };
        }
        ["translation", "tone"] => {
            config.translation.tone = Tone::parse(value).with_context(|| {
                format!("Invalid tone '{}' (expected formal, casual or technical)", value)
            })?;
        }
        ["translation", "use_glossary"] => {
            config.translation.use_glossary = parse_bool(key, value)?;
        }
        ["translation", "locale"] => {
            if value.is_empty() {
                anyhow::bail!("Locale cannot be empty");
            }
            config.translation.locale = value.to_string();
        }
        ["batch", "parallel_limit"] => {
            let limit: usize = value
                .parse()
                .with_context(|| format!("Invalid number for {}: {}", key, value))?;
            if limit == 0 {
                anyhow::bail!("batch.parallel_limit must be at least 1");
            }
            config.batch.parallel_limit = limit;
        }
        ["batch", "create_backup"] => {
            config.batch.create_backup = parse_bool(key, value)?;
        }
        ["batch", "overwrite_existing"] => {
            config.batch.overwrite_existing = parse_bool(key, value)?;
        }
        _ => {
            anyhow::bail!("Unknown config key: {}", key);
        }
    }

    config.save()?;
    println!("{}", format!("[Config] Set {} = {}", key, value).green());

    Ok(())
}

fn get_config(key: &str) -> Result<()> {
    let config = Config::load()?;
    let parts: Vec<&str> = key.split('.').collect();

    let value: Option<String> = match parts.as_slice() {
        ["general", "verbose"] => Some(config.general.verbose.to_string()),
        ["glossary", "path"] => config.glossary.path,
        ["translation", "tone"] => Some(config.translation.tone.to_string()),
        ["translation", "use_glossary"] => Some(config.translation.use_glossary.to_string()),
        ["translation", "locale"] => Some(config.translation.locale),
        ["batch", "parallel_limit"] => Some(config.batch.parallel_limit.to_string()),
        ["batch", "create_backup"] => Some(config.batch.create_backup.to_string()),
        ["batch", "overwrite_existing"] => Some(config.batch.overwrite_existing.to_string()),
        _ => {
            anyhow::bail!("Unknown config key: {}", key);
        }
    };

    match value {
        Some(v) => println!("{} = {}", key, v),
        None => println!("{} = (not set)", key),
    }

    Ok(())
}

fn show_path() -> Result<()> {
    match Config::config_path() {
        Some(path) => {
            println!("{}", path.display());
            if path.exists() {
                println!("{}", "(exists)".green());
            } else {
                println!("{}", "(not created)".yellow());
            }
        }
        None => {
            println!("{}", "Could not determine config path".red());
        }
    }
    Ok(())
}

fn edit_config() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    // Create default config if it doesn't exist
    if !path.exists() {
        let config = Config::default();
        config.save()?;
        println!("{}", "[Config] Created default config".green());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening config with: {}", editor);
    println!("Path: {}", path.display());

    std::process::Command::new(&editor)
        .arg(&path)
        .status()
        .context(format!("Failed to open editor: {}", editor))?;

    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => anyhow::bail!("Invalid boolean for {}: {}", key, value),
    }
}
