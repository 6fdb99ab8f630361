//! Directory-wide translation with bounded, chunked concurrency

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

use super::config::BatchConfig;
use super::pattern::PatternSet;
use super::report::{BatchFileResult, BatchReport, FileSizes, FileStatus};
use crate::error::{Result, TranslateError};
use crate::translate::translator::{TranslationResult, Translator};
use crate::utils::{DEFAULT_LOCALE, localized_path, relative_slash_path};

const SKIPPED_MESSAGE: &str = "File already exists and overwrite is disabled";

enum FileOutcome {
    Translated(Box<TranslationResult>),
    Skipped,
}

/// Consecutive chunks of at most `limit` files; each chunk finishes before the next starts
pub fn plan_chunks(files: &[PathBuf], limit: usize) -> Vec<&[PathBuf]> {
    files.chunks(limit.max(1)).collect()
}

pub struct BatchTranslator<'a> {
    translator: &'a Translator,
    config: BatchConfig,
    locale: String,
    show_progress: bool,
}

impl<'a> BatchTranslator<'a> {
    pub fn new(translator: &'a Translator, config: BatchConfig) -> Self {
        Self {
            translator,
            config,
            locale: DEFAULT_LOCALE.to_string(),
            show_progress: false,
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Files under the source directory that pass the include/exclude filters, sorted by path.
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let source = &self.config.source_dir;
        if !source.is_dir() {
            return Err(TranslateError::FileNotFound(source.clone()));
        }

        let includes = PatternSet::new(&self.config.file_patterns)?;
        let excludes = PatternSet::new(&self.config.exclude_patterns)?;
        if includes.is_empty() {
            tracing::warn!("No file patterns configured, nothing will be translated");
        }

        let output_dir = normalized(&self.config.output_dir);
        let walker = WalkDir::new(source)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.depth() == 0 {
                    return true;
                }
                let rel = relative_slash_path(source, e.path());
                if e.file_type().is_dir() {
                    // Output nested in the source tree is never read back
                    normalized(e.path()) != output_dir && !excludes.matches_dir(&rel)
                } else {
                    !excludes.matches_file(&rel)
                }
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    let path = e.path().unwrap_or(source).to_path_buf();
                    return Err(TranslateError::read(path, e.into()));
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let rel = relative_slash_path(source, entry.path());
            if includes.matches_file(&rel) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Mirror the source layout under the output directory, adding the locale marker.
    pub fn output_path(&self, source_file: &Path) -> PathBuf {
        let rel = source_file
            .strip_prefix(&self.config.source_dir)
            .unwrap_or(source_file);
        let rel = match rel.file_name() {
            Some(_) => rel,
            None => Path::new(source_file.file_name().unwrap_or_default()),
        };
        localized_path(&self.config.output_dir.join(rel), &self.locale)
    }

    pub fn run(&self) -> Result<BatchReport> {
        let started = Instant::now();
        let start_time = Utc::now();

        let files = self.collect_files()?;
        tracing::info!("Found {} files to translate", files.len());

        let limit = self.config.effective_parallel_limit();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(limit)
            .build()
            .map_err(|e| TranslateError::config(format!("Failed to create worker pool: {}", e)))?;

        let pb = if self.show_progress && !files.is_empty() {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .map_err(|e| TranslateError::config(e.to_string()))?
                    .progress_chars("=>-"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        let mut results = Vec::with_capacity(files.len());
        for chunk in plan_chunks(&files, limit) {
            let chunk_results: Vec<BatchFileResult> = pool.install(|| {
                chunk
                    .par_iter()
                    .map(|file| {
                        let result = self.translate_one(file);
                        if result.status == FileStatus::Failure {
                            pb.suspend(|| {
                                tracing::warn!(
                                    "Failed to translate {}: {}",
                                    file.display(),
                                    result.error.as_deref().unwrap_or_default()
                                );
                            });
                        }
                        result
                    })
                    .collect()
            });

            results.extend(chunk_results);
            pb.set_position(results.len() as u64);
            tracing::debug!("Progress: {}/{}", results.len(), files.len());
        }
        pb.finish_and_clear();

        Ok(BatchReport::finalize(
            results,
            start_time,
            started.elapsed(),
            self.config.clone(),
        ))
    }

    fn translate_one(&self, source_file: &Path) -> BatchFileResult {
        let started = Instant::now();
        let output_file = self.output_path(source_file);

        let mut result = BatchFileResult {
            source_file: source_file.to_path_buf(),
            output_file: output_file.clone(),
            status: FileStatus::Failure,
            error: None,
            translation_result: None,
            processing_time: 0,
            file_size: None,
        };

        match self.process(source_file, &output_file) {
            Ok(FileOutcome::Translated(translation)) => {
                tracing::debug!(
                    "Translated {} -> {}",
                    source_file.display(),
                    output_file.display()
                );
                result.status = FileStatus::Success;
                result.file_size = Some(FileSizes {
                    original: translation.original_text.len() as u64,
                    translated: translation.translated_text.len() as u64,
                });
                result.translation_result = Some(*translation);
            }
            Ok(FileOutcome::Skipped) => {
                result.status = FileStatus::Skipped;
                result.error = Some(SKIPPED_MESSAGE.to_string());
            }
            Err(e) => {
                result.error = Some(e.to_string());
            }
        }

        result.processing_time = started.elapsed().as_millis() as u64;
        result
    }

    fn process(&self, source_file: &Path, output_file: &Path) -> Result<FileOutcome> {
        if output_file.exists() {
            if !self.config.overwrite_existing {
                return Ok(FileOutcome::Skipped);
            }
            if self.config.create_backup {
                let backup = backup_path(output_file);
                fs::copy(output_file, &backup).map_err(|e| TranslateError::write(&backup, e))?;
                tracing::info!("Backup created: {}", backup.display());
            }
        }

        let translation =
            self.translator
                .translate_file(source_file, output_file, &self.config.options)?;
        Ok(FileOutcome::Translated(Box::new(translation)))
    }
}

fn normalized(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn backup_path(output_file: &Path) -> PathBuf {
    let mut name = OsString::from(output_file.as_os_str());
    name.push(format!(".backup.{}", Utc::now().timestamp_millis()));
    PathBuf::from(name)
}
