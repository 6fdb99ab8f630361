//! Batch command tests

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const GLOSSARY: &str = r#"
[ai_terms]
"agent" = "エージェント"
"#;

fn honyaku(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_honyaku"));
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

fn write(path: &Path, content: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Source tree under `docs/`, glossary at the root
fn setup() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(&root.join("glossary.toml"), GLOSSARY.as_bytes());
    write(&root.join("docs/index.md"), b"# Overview\n\nAn agent.\n");
    write(&root.join("docs/guides/setup.mdx"), b"Run the agent.");
    write(&root.join("docs/notes.txt"), b"not markdown");
    temp_dir
}

fn run_batch(root: &Path, extra: &[&str]) -> std::process::Output {
    honyaku(root)
        .current_dir(root)
        .args(["batch", "--source", "docs", "--output", "out"])
        .args(extra)
        .output()
        .expect("Failed to run batch")
}

#[test]
fn test_create_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("translation.config.json");

    let output = honyaku(temp_dir.path())
        .arg("batch")
        .arg("--create-config")
        .arg(&path)
        .output()
        .expect("Failed to run batch");

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["sourceDir"], "./content");
    assert_eq!(value["parallelLimit"], 3);
    assert_eq!(value["createBackup"], true);
    assert_eq!(value["overwriteExisting"], false);
}

#[test]
fn test_batch_translates_tree_and_writes_report() {
    let temp_dir = setup();
    let root = temp_dir.path();

    let output = run_batch(root, &[]);
    assert!(
        output.status.success(),
        "Batch should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert_eq!(
        fs::read_to_string(root.join("out/index.ja.md")).unwrap(),
        "# 概要\n\nAn エージェント.\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("out/guides/setup.ja.mdx")).unwrap(),
        "Run the エージェント."
    );
    assert!(!root.join("out/notes.ja.txt").exists());

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join("out/translation-report.json")).unwrap())
            .unwrap();
    assert_eq!(report["totalFiles"], 2);
    assert_eq!(report["successCount"], 2);
    assert_eq!(report["failureCount"], 0);
    assert_eq!(report["results"].as_array().unwrap().len(), 2);
}

#[test]
fn test_second_run_skips_existing() {
    let temp_dir = setup();
    let root = temp_dir.path();

    assert!(run_batch(root, &[]).status.success());
    fs::write(root.join("out/index.ja.md"), "edited").unwrap();

    let output = run_batch(root, &[]);
    assert!(output.status.success());
    assert_eq!(fs::read_to_string(root.join("out/index.ja.md")).unwrap(), "edited");

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join("out/translation-report.json")).unwrap())
            .unwrap();
    assert_eq!(report["skippedCount"], 2);
}

#[test]
fn test_overwrite_without_backup() {
    let temp_dir = setup();
    let root = temp_dir.path();

    assert!(run_batch(root, &[]).status.success());
    fs::write(root.join("out/index.ja.md"), "edited").unwrap();

    let output = run_batch(root, &["--overwrite", "--no-backup"]);
    assert!(output.status.success());
    assert!(
        fs::read_to_string(root.join("out/index.ja.md"))
            .unwrap()
            .contains("エージェント")
    );

    let backups = fs::read_dir(root.join("out"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains(".backup."))
        .count();
    assert_eq!(backups, 0);
}

#[test]
fn test_failed_file_sets_exit_code() {
    let temp_dir = setup();
    let root = temp_dir.path();
    write(&root.join("docs/broken.md"), &[0xff, 0xfe, 0x00, 0xc3]);

    let output = run_batch(root, &["--parallel", "1"]);
    assert_eq!(output.status.code(), Some(1));

    // The other files are still translated and the report still written
    assert!(root.join("out/index.ja.md").exists());
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join("out/translation-report.json")).unwrap())
            .unwrap();
    assert_eq!(report["failureCount"], 1);
    assert_eq!(report["successCount"], 2);
}

#[test]
fn test_missing_source_dir_fails() {
    let temp_dir = setup();
    let root = temp_dir.path();

    let output = honyaku(root)
        .current_dir(root)
        .args(["batch", "--source", "nope", "--output", "out"])
        .output()
        .expect("Failed to run batch");

    assert!(!output.status.success());
}
