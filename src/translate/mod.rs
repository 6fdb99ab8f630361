pub mod glossary;
pub mod phrases;
pub mod protect;
pub mod translator;
pub mod validate;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;

use crate::cli::{GlossaryArgs, TranslateArgs};
use crate::config::Config;
use crate::utils::{localized_path, truncate_display};
use glossary::Glossary;
use translator::{TranslationResult, Translator};

/// Build a translator from the glossary chosen by flag, config, or the working directory
pub fn load_translator(explicit: Option<&Path>, cfg: &Config) -> Result<Translator> {
    let path = cfg.glossary_path(explicit);
    let glossary = Glossary::load(&path)
        .with_context(|| format!("Could not load glossary from {}", path.display()))?;
    Ok(Translator::new(Arc::new(glossary)))
}

pub fn run(args: TranslateArgs) -> Result<()> {
    let cfg = Config::load().unwrap_or_default();

    let mut options = cfg.translation_options();
    if let Some(tone) = args.tone {
        options.target_tone = tone;
    }
    if args.no_glossary {
        options.use_glossary = false;
    }

    let translator = load_translator(args.glossary.as_deref(), &cfg)?;

    match (args.file.as_deref(), args.text) {
        (Some([input, rest @ ..]), _) => {
            let output = match rest.first() {
                Some(out) => out.clone(),
                None => localized_path(input, &cfg.translation.locale),
            };

            println!("{}", format!("[Translate] {}", input.display()).green());
            let result = translator
                .translate_file(input, &output, &options)
                .with_context(|| format!("Failed to translate {}", input.display()))?;

            println!("  Output: {}", output.display());
            print_file_report(&result);
        }
        (_, Some(text)) => {
            let result = translator.translate(&text, &options);
            print_text_result(&result);
        }
        _ => anyhow::bail!("Nothing to translate: pass TEXT or --file <INPUT>"),
    }

    Ok(())
}

fn print_text_result(result: &TranslationResult) {
    println!("{}", "[Translate] Result".green());
    println!("  Original:   {}", truncate_display(&result.original_text, 80));
    println!("  Translated: {}", result.translated_text);
    println!("  Confidence: {:.3}", result.confidence);
    if !result.glossary_matches.is_empty() {
        println!("  Glossary:   {}", result.glossary_matches.join(", ").cyan());
    }
}

fn print_file_report(result: &TranslationResult) {
    let stats = validate::stats(result);
    let validation = validate::validate(result);

    println!("  Words:      {} -> {}", stats.original_word_count, stats.translated_word_count);
    println!("  Glossary:   {} terms", stats.glossary_terms_used);
    println!("  Coverage:   {:.1}%", stats.translation_coverage * 100.0);
    println!("  Expansion:  {:.2}x", stats.text_expansion_ratio);
    println!("  Confidence: {:.3}", result.confidence);
    println!("  Quality:    {}/100", validation.quality_score);

    if validation.is_valid {
        println!("{}", "[OK] Translation validated".green());
        return;
    }

    println!("{}", "[WARN] Validation issues:".yellow());
    for issue in &validation.issues {
        println!(
            "  - [{:?}/{:?}] {}",
            issue.kind, issue.severity, issue.description
        );
    }
    for suggestion in &validation.suggestions {
        println!("    {}", suggestion.dimmed());
    }
}

pub fn show_glossary(args: GlossaryArgs) -> Result<()> {
    let cfg = Config::load().unwrap_or_default();
    let path = cfg.glossary_path(args.glossary.as_deref());
    let glossary = Glossary::load(&path)
        .with_context(|| format!("Could not load glossary from {}", path.display()))?;

    println!("{}", format!("[Glossary] {}", path.display()).green());
    println!("  Active terms: {}", glossary.len());
    for (category, size) in glossary.category_sizes() {
        if size > 0 {
            println!("  {:<32} {}", category, size);
        }
    }

    if !glossary.keep_english().is_empty() {
        println!("\n{}", "Kept in English:".cyan());
        println!("  {}", glossary.keep_english().join(", "));
    }

    if !glossary.notes().is_empty() {
        println!("\n{}", "Notes:".cyan());
        for note in glossary.notes() {
            println!("  - {}", note);
        }
    }

    Ok(())
}
