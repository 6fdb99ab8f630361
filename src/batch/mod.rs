pub mod config;
pub mod orchestrator;
pub mod pattern;
pub mod report;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::BatchArgs;
use crate::config::Config;
use crate::translate::load_translator;
use config::BatchConfig;
use orchestrator::BatchTranslator;

pub fn run(args: BatchArgs) -> Result<()> {
    if let Some(path) = &args.create_config {
        BatchConfig::write_default(path)
            .with_context(|| format!("Failed to create batch config {}", path.display()))?;
        println!("{}", "[Batch] Config created".green());
        println!("  {}", path.display());
        return Ok(());
    }

    let cfg = Config::load().unwrap_or_default();

    let mut batch_config = match &args.config {
        Some(path) => BatchConfig::load(path)?,
        None => BatchConfig::from_app_config(&cfg),
    };
    apply_overrides(&mut batch_config, &args);

    let translator = load_translator(args.glossary.as_deref(), &cfg)?;

    println!(
        "{}",
        format!(
            "[Batch] {} -> {}",
            batch_config.source_dir.display(),
            batch_config.output_dir.display()
        )
        .green()
    );
    println!(
        "  Patterns: {}  Parallel: {}  Glossary terms: {}",
        batch_config.file_patterns.join(", "),
        batch_config.effective_parallel_limit(),
        translator.glossary().len()
    );

    let output_dir = batch_config.output_dir.clone();
    let report = BatchTranslator::new(&translator, batch_config)
        .with_locale(cfg.translation.locale.clone())
        .with_progress(true)
        .run()
        .context("Batch translation failed")?;

    report.print_summary();
    let report_path = report.save(&output_dir)?;
    println!("\n  Report: {}", report_path.display());

    if report.failure_count > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn apply_overrides(config: &mut BatchConfig, args: &BatchArgs) {
    if let Some(source) = &args.source {
        config.source_dir = source.clone();
    }
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }
    if let Some(patterns) = &args.patterns {
        config.file_patterns = patterns
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
    }
    if let Some(parallel) = args.parallel {
        config.parallel_limit = parallel;
    }
    if args.overwrite {
        config.overwrite_existing = true;
    }
    if args.no_backup {
        config.create_backup = false;
    }
    if let Some(tone) = args.tone {
        config.options.target_tone = tone;
    }
}
