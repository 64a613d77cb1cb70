//! Integration tests for templar-cli.
//!
//! These run the compiled-in templates against their own source tree, the
//! way the binary is invoked, and check configuration handling end to end.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

use templar::{Generator, GeneratorOptions, WriteOutcome};
use templar_cli::{
    config::{require_dirs, CliArgs, ConfigManager},
    registry, CliError,
};

/// The template tree shipped with this crate.
fn templates_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/templates")
}

fn generated(root: &Path, package_path: &str, file: &str) -> PathBuf {
    root.join("kraton-base/src/generated/java")
        .join(package_path)
        .join(file)
}

const TOTAL_FILES: usize = 8 + 8 + 64;

// =============================================================================
// Template tree
// =============================================================================

#[test]
fn test_template_tree_resolves_every_unit() {
    let generator = Generator::new(registry());
    let discovery = generator.discover(&templates_path()).unwrap();

    assert!(discovery.warnings.is_empty(), "{:?}", discovery.warnings);
    let units: Vec<_> = discovery.templates.iter().map(|(unit, _)| unit.as_str()).collect();
    assert_eq!(
        units,
        vec![
            "bean.value.observable_value",
            "bean.value.writable_value",
            "util.function.from_to_function",
        ]
    );
}

#[test]
fn test_full_run_generates_all_files() {
    let output = TempDir::new().unwrap();
    let summary = Generator::new(registry())
        .run(&templates_path(), output.path())
        .unwrap();

    assert_eq!(summary.profiles, 3);
    assert_eq!(summary.created(), TOTAL_FILES);

    let observable = generated(output.path(), "io/kraton/bean/value", "ObservableIntValue.java");
    let text = fs::read_to_string(observable).unwrap();
    assert!(text.contains("public interface ObservableIntValue extends ObservableValue<Integer> {"));

    assert!(generated(output.path(), "io/kraton/bean/value", "WritableBooleanValue.java").is_file());
    assert!(generated(output.path(), "io/kraton/util/function", "DoubleToLongFunction.java").is_file());
}

#[test]
fn test_rerun_is_a_no_op() {
    let output = TempDir::new().unwrap();
    let generator = Generator::new(registry()).with_options(GeneratorOptions {
        workers: 2,
        ..GeneratorOptions::default()
    });

    generator.run(&templates_path(), output.path()).unwrap();
    let summary = generator.run(&templates_path(), output.path()).unwrap();

    assert_eq!(summary.written(), 0);
    assert!(summary
        .files
        .iter()
        .all(|f| f.outcome == WriteOutcome::Unchanged));
}

#[test]
fn test_include_limits_templates() {
    let output = TempDir::new().unwrap();
    let summary = Generator::new(registry())
        .with_options(GeneratorOptions {
            include: Some("util/**".to_string()),
            ..GeneratorOptions::default()
        })
        .run(&templates_path(), output.path())
        .unwrap();

    assert_eq!(summary.profiles, 1);
    assert_eq!(summary.created(), 64);
    assert!(!output.path().join("kraton-base/src/generated/java/io/kraton/bean").exists());
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_config_file_controls_layout_and_output() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("templar.toml");
    fs::write(
        &config_path,
        r#"
[generator]
workers = 1
include = "bean/value/writable_value.rs"

[output]
generated_dir = "gen"

[layout]
indent = "\t"
"#,
    )
    .unwrap();

    let config = ConfigManager::load(Some(&config_path)).unwrap();
    let args = CliArgs::default();
    let config = ConfigManager::merge_cli_args(config, &args);
    let options = ConfigManager::options(&config, &args).unwrap();
    let renderer = config.renderer().unwrap();

    let output = TempDir::new().unwrap();
    let summary = Generator::new(registry())
        .with_options(options)
        .with_renderer(renderer)
        .run(&templates_path(), output.path())
        .unwrap();

    assert_eq!(summary.created(), 8);
    let path = output
        .path()
        .join("kraton-base/src/gen/java/io/kraton/bean/value/WritableIntValue.java");
    let text = fs::read_to_string(path).unwrap();
    assert!(text.contains("\n\tint set(int value);\n"));
}

#[test]
fn test_dry_run_from_cli_args() {
    let args = CliArgs {
        dry_run: true,
        ..Default::default()
    };
    let config = ConfigManager::merge_cli_args(Default::default(), &args);
    let options = ConfigManager::options(&config, &args).unwrap();

    let output = TempDir::new().unwrap();
    let summary = Generator::new(registry())
        .with_options(options)
        .run(&templates_path(), output.path())
        .unwrap();

    assert_eq!(summary.written(), TOTAL_FILES);
    assert!(!output.path().join("kraton-base").exists());
}

// =============================================================================
// Positional paths
// =============================================================================

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path).unwrap().next().is_none()
}

#[test]
fn test_missing_template_dir_is_rejected() {
    let target = TempDir::new().unwrap();
    let missing = target.path().join("no-templates");

    let err = require_dirs(&missing, target.path()).unwrap_err();
    assert!(matches!(err, CliError::InvalidPath { role: "template", .. }));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_missing_target_dir_is_rejected() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("no-target");

    let err = require_dirs(&templates_path(), &missing).unwrap_err();
    assert!(matches!(err, CliError::InvalidPath { role: "target", .. }));
    assert!(!err.to_string().contains("configuration"));
}

#[test]
fn test_file_is_not_a_target_dir() {
    let root = TempDir::new().unwrap();
    let file = root.path().join("target.txt");
    fs::write(&file, "").unwrap();

    let err = require_dirs(&templates_path(), &file).unwrap_err();
    assert!(matches!(err, CliError::InvalidPath { role: "target", .. }));
}

#[test]
fn test_binary_fails_fast_on_missing_template_dir() {
    let target = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_templar"))
        .arg(target.path().join("no-templates"))
        .arg(target.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid template path"), "{stderr}");
    assert!(is_empty_dir(target.path()));
}

#[test]
fn test_binary_fails_fast_on_missing_target_dir() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("no-target");
    let output = Command::new(env!("CARGO_BIN_EXE_templar"))
        .arg(templates_path())
        .arg(&missing)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(!missing.exists());
    assert!(is_empty_dir(root.path()));
}
