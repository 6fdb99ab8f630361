//! Per-file results and the aggregated batch report

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::config::BatchConfig;
use crate::error::{Result, TranslateError};
use crate::translate::translator::TranslationResult;

pub const REPORT_FILE_NAME: &str = "translation-report.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Success,
    Failure,
    Skipped,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FileSizes {
    pub original: u64,
    pub translated: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFileResult {
    pub source_file: PathBuf,
    pub output_file: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_result: Option<TranslationResult>,
    /// Milliseconds
    pub processing_time: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<FileSizes>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub total_files: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub skipped_count: usize,
    pub results: Vec<BatchFileResult>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Milliseconds
    pub duration: u64,
    pub config: BatchConfig,
}

impl BatchReport {
    pub fn finalize(
        results: Vec<BatchFileResult>,
        start_time: DateTime<Utc>,
        elapsed: Duration,
        config: BatchConfig,
    ) -> Self {
        let count = |status: FileStatus| results.iter().filter(|r| r.status == status).count();

        Self {
            total_files: results.len(),
            success_count: count(FileStatus::Success),
            failure_count: count(FileStatus::Failure),
            skipped_count: count(FileStatus::Skipped),
            start_time,
            end_time: Utc::now(),
            duration: elapsed.as_millis() as u64,
            config,
            results,
        }
    }

    pub fn with_status(&self, status: FileStatus) -> impl Iterator<Item = &BatchFileResult> {
        self.results.iter().filter(move |r| r.status == status)
    }

    /// Write `translation-report.json` into `dir`
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|e| TranslateError::write(dir, e))?;

        let path = dir.join(REPORT_FILE_NAME);
        let json = serde_json::to_string_pretty(self).map_err(|source| {
            TranslateError::Serialize {
                what: "batch report",
                source,
            }
        })?;
        fs::write(&path, json).map_err(|e| TranslateError::write(&path, e))?;

        Ok(path)
    }

    pub fn print_summary(&self) {
        println!();
        println!("{}", "[Batch] Translation Report".green().bold());
        println!("  Total files: {}", self.total_files);
        println!("  Success:     {}", self.success_count.to_string().green());
        println!("  Failures:    {}", self.failure_count.to_string().red());
        println!("  Skipped:     {}", self.skipped_count.to_string().yellow());
        println!("  Duration:    {:.1}s", self.duration as f64 / 1000.0);

        if self.failure_count > 0 {
            println!("\n{}", "Failed files:".red());
            for r in self.with_status(FileStatus::Failure) {
                println!(
                    "  - {}: {}",
                    r.source_file.display(),
                    r.error.as_deref().unwrap_or("unknown error")
                );
            }
        }

        if self.skipped_count > 0 {
            println!("\n{}", "Skipped files:".yellow());
            for r in self.with_status(FileStatus::Skipped) {
                println!(
                    "  - {}: {}",
                    r.source_file.display(),
                    r.error.as_deref().unwrap_or("skipped")
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_result(name: &str, status: FileStatus) -> BatchFileResult {
        BatchFileResult {
            source_file: PathBuf::from(name),
            output_file: PathBuf::from(format!("out/{}", name)),
            status,
            error: (status != FileStatus::Success).then(|| "boom".to_string()),
            translation_result: None,
            processing_time: 1,
            file_size: None,
        }
    }

    #[test]
    fn test_finalize_counts() {
        let results = vec![
            file_result("a.md", FileStatus::Success),
            file_result("b.md", FileStatus::Failure),
            file_result("c.md", FileStatus::Skipped),
            file_result("d.md", FileStatus::Success),
        ];
        let report = BatchReport::finalize(
            results,
            Utc::now(),
            Duration::from_millis(42),
            BatchConfig::default(),
        );

        assert_eq!(report.total_files, 4);
        assert_eq!(report.success_count, 2);
        assert_eq!(report.failure_count, 1);
        assert_eq!(report.skipped_count, 1);
        assert_eq!(report.duration, 42);
        assert!(report.end_time >= report.start_time);
    }

    #[test]
    fn test_save_report_json() {
        let temp_dir = TempDir::new().unwrap();
        let report = BatchReport::finalize(
            vec![file_result("a.md", FileStatus::Failure)],
            Utc::now(),
            Duration::ZERO,
            BatchConfig::default(),
        );

        let path = report.save(&temp_dir.path().join("out")).unwrap();
        assert!(path.ends_with(REPORT_FILE_NAME));

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["failureCount"], 1);
        assert_eq!(value["results"][0]["status"], "failure");
        assert_eq!(value["results"][0]["error"], "boom");
        assert!(value["results"][0].get("translationResult").is_none());
    }
}
