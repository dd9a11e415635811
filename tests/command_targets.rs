// tests/command_targets.rs

#![cfg(unix)]

mod common;
use crate::common::builders::{ConfigFileBuilder, TargetConfigBuilder};
use crate::common::{bump_mtime, init_tracing};

use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::tempdir;

use pybuild::config::ConfigFile;
use pybuild::exec::{
    command_targets, registry_from_config, BuildOptions, BuildOutcome, CommandTarget,
};
use pybuild::fs::RealFileSystem;
use pybuild::types::ChangeDetection;

type TestResult = Result<(), Box<dyn Error>>;

/// Appends a line to `runs.log` on every execution so tests can count runs.
const COUNTING_CMD: &str = "echo run >> runs.log";

fn runs(root: &Path) -> usize {
    fs::read_to_string(root.join("runs.log"))
        .map(|s| s.lines().count())
        .unwrap_or(0)
}

fn project(root: &Path) -> std::io::Result<()> {
    fs::create_dir_all(root.join("src/tmp"))?;
    fs::write(root.join("src/main.cpp"), "int main() {}")?;
    fs::write(root.join("src/gif.cpp"), "void gif() {}")?;
    fs::write(root.join("src/gif.h"), "void gif();")?;
    fs::write(root.join("src/tmp/scratch.cpp"), "// scratch")?;
    Ok(())
}

fn single_target(cfg: &ConfigFile, root: &Path) -> CommandTarget {
    command_targets(cfg, root, Arc::new(RealFileSystem), BuildOptions::default())
        .unwrap()
        .remove(0)
}

fn hashed_config(cmd: &str) -> ConfigFile {
    ConfigFileBuilder::new()
        .with_default_change_detection(ChangeDetection::Hash)
        .with_target(
            "all",
            TargetConfigBuilder::new(cmd)
                .source("src/**/*.cpp")
                .exclude("src/tmp/**")
                .build(),
        )
        .build()
}

#[test]
fn sources_follow_include_and_exclude_patterns() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    project(dir.path())?;

    let target = single_target(&hashed_config(COUNTING_CMD), dir.path());
    let files = target.source_files()?;

    assert_eq!(
        files,
        vec![dir.path().join("src/gif.cpp"), dir.path().join("src/main.cpp")]
    );
    Ok(())
}

#[test]
fn unchanged_sources_skip_the_command() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    project(dir.path())?;
    let target = single_target(&hashed_config(COUNTING_CMD), dir.path());

    assert_eq!(target.execute()?, BuildOutcome::Built);
    assert_eq!(runs(dir.path()), 1);
    assert!(dir.path().join(".pybuild/all.hashes.pybuild").is_file());

    assert_eq!(target.execute()?, BuildOutcome::UpToDate);
    assert_eq!(runs(dir.path()), 1);

    fs::write(dir.path().join("src/gif.cpp"), "void gif() { return; }")?;
    assert_eq!(target.execute()?, BuildOutcome::Built);
    assert_eq!(runs(dir.path()), 2);
    Ok(())
}

#[test]
fn excluded_files_do_not_trigger_rebuilds() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    project(dir.path())?;
    let target = single_target(&hashed_config(COUNTING_CMD), dir.path());

    target.execute()?;
    fs::write(dir.path().join("src/tmp/scratch.cpp"), "// edited")?;

    assert_eq!(target.execute()?, BuildOutcome::UpToDate);
    Ok(())
}

#[test]
fn new_source_file_triggers_rebuild() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    project(dir.path())?;
    let target = single_target(&hashed_config(COUNTING_CMD), dir.path());

    target.execute()?;
    fs::write(dir.path().join("src/lzw.cpp"), "void lzw() {}")?;

    assert_eq!(target.execute()?, BuildOutcome::Built);
    Ok(())
}

#[test]
fn deleted_source_file_triggers_rebuild() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    project(dir.path())?;
    let target = single_target(&hashed_config(COUNTING_CMD), dir.path());

    target.execute()?;
    fs::remove_file(dir.path().join("src/gif.cpp"))?;

    assert_eq!(target.execute()?, BuildOutcome::Built);
    assert_eq!(target.execute()?, BuildOutcome::UpToDate);
    Ok(())
}

#[test]
fn targets_keep_separate_ledgers() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    project(dir.path())?;
    fs::create_dir_all(dir.path().join("docs"))?;
    fs::write(dir.path().join("docs/readme.md"), "# reader")?;
    let cfg = ConfigFileBuilder::new()
        .with_default_change_detection(ChangeDetection::Hash)
        .with_target(
            "all",
            TargetConfigBuilder::new(COUNTING_CMD).source("src/*.cpp").build(),
        )
        .with_target(
            "docs",
            TargetConfigBuilder::new(COUNTING_CMD).source("docs/*.md").build(),
        )
        .build();
    let targets = command_targets(
        &cfg,
        dir.path(),
        Arc::new(RealFileSystem),
        BuildOptions::default(),
    )?;
    let (all, docs) = (&targets[0], &targets[1]);
    assert_eq!(all.name(), "all");
    assert_ne!(all.ledger_path(), docs.ledger_path());

    assert_eq!(all.execute()?, BuildOutcome::Built);
    assert_eq!(docs.execute()?, BuildOutcome::Built);
    assert_eq!(all.execute()?, BuildOutcome::UpToDate);
    assert_eq!(docs.execute()?, BuildOutcome::UpToDate);
    assert_eq!(runs(dir.path()), 2);
    Ok(())
}

#[test]
fn sources_covering_the_root_skip_ledgers() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    project(dir.path())?;
    let cfg = ConfigFileBuilder::new()
        .with_default_change_detection(ChangeDetection::Hash)
        .with_target("all", TargetConfigBuilder::new("true").source("**").build())
        .with_target(
            "other",
            TargetConfigBuilder::new("true")
                .source("src/*.h")
                .ledger("other.hashes")
                .build(),
        )
        .build();
    let targets = command_targets(
        &cfg,
        dir.path(),
        Arc::new(RealFileSystem),
        BuildOptions::default(),
    )?;
    let (all, other) = (&targets[0], &targets[1]);

    assert_eq!(all.execute()?, BuildOutcome::Built);
    assert_eq!(other.execute()?, BuildOutcome::Built);
    assert!(dir.path().join("other.hashes").is_file());

    let files = all.source_files()?;
    assert!(!files.iter().any(|f| f.starts_with(dir.path().join(".pybuild"))));
    assert!(!files.contains(&dir.path().join("other.hashes")));

    assert_eq!(all.execute()?, BuildOutcome::UpToDate);
    assert_eq!(all.execute()?, BuildOutcome::UpToDate);
    Ok(())
}

#[test]
fn clear_dirs_empty_the_directory_before_the_command() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    fs::create_dir_all(dir.path().join("bin/keep"))?;
    fs::write(dir.path().join("bin/reader"), "elf")?;
    fs::write(dir.path().join("bin/reader.o"), "obj")?;
    let cfg = ConfigFileBuilder::new()
        .with_target(
            "clean",
            TargetConfigBuilder::without_cmd()
                .clear_dir("bin")
                .clear_dir("missing")
                .build(),
        )
        .build();
    let target = single_target(&cfg, dir.path());

    assert_eq!(target.execute()?, BuildOutcome::Built);
    assert!(dir.path().join("bin").is_dir());
    assert!(dir.path().join("bin/keep").is_dir());
    assert!(!dir.path().join("bin/reader").exists());
    assert!(!dir.path().join("bin/reader.o").exists());
    Ok(())
}

#[test]
fn change_detection_override_replaces_the_build_file_setting() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    project(dir.path())?;
    let options = BuildOptions {
        force: false,
        change_detection: Some(ChangeDetection::Off),
    };
    let cfg = hashed_config(COUNTING_CMD);
    let target = command_targets(&cfg, dir.path(), Arc::new(RealFileSystem), options)?.remove(0);

    assert_eq!(target.ledger_path(), None);
    target.execute()?;
    target.execute()?;
    assert_eq!(runs(dir.path()), 2);
    assert!(!dir.path().join(".pybuild").exists());
    Ok(())
}

#[test]
fn mtime_detection_reacts_to_touch() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    project(dir.path())?;
    let cfg = ConfigFileBuilder::new()
        .with_target(
            "all",
            TargetConfigBuilder::new(COUNTING_CMD)
                .source("src/*.cpp")
                .change_detection(ChangeDetection::Mtime)
                .build(),
        )
        .build();
    let target = single_target(&cfg, dir.path());

    assert_eq!(target.execute()?, BuildOutcome::Built);
    assert!(dir.path().join(".pybuild/all.timestamps.pybuild").is_file());
    assert_eq!(target.execute()?, BuildOutcome::UpToDate);

    bump_mtime(&dir.path().join("src/main.cpp"), 5)?;
    assert_eq!(target.execute()?, BuildOutcome::Built);
    Ok(())
}

#[test]
fn failing_command_reports_code_and_keeps_ledger() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    project(dir.path())?;

    let ok = single_target(&hashed_config(COUNTING_CMD), dir.path());
    ok.execute()?;
    let ledger_before = fs::read_to_string(dir.path().join(".pybuild/all.hashes.pybuild"))?;

    fs::write(dir.path().join("src/main.cpp"), "int main() { return 1; }")?;
    let failing = single_target(&hashed_config("exit 3"), dir.path());
    assert_eq!(failing.execute()?, BuildOutcome::Failed(3));

    let ledger_after = fs::read_to_string(dir.path().join(".pybuild/all.hashes.pybuild"))?;
    assert_eq!(ledger_before, ledger_after);

    // Still out of date, so the next run rebuilds.
    assert_eq!(ok.execute()?, BuildOutcome::Built);
    Ok(())
}

#[test]
fn force_ignores_change_detection() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    project(dir.path())?;
    let target = single_target(&hashed_config(COUNTING_CMD), dir.path()).with_force(true);

    target.execute()?;
    target.execute()?;

    assert_eq!(runs(dir.path()), 2);
    Ok(())
}

#[test]
fn targets_without_sources_always_run() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let cfg = ConfigFileBuilder::new()
        .with_default_change_detection(ChangeDetection::Hash)
        .with_target("all", TargetConfigBuilder::new(COUNTING_CMD).build())
        .build();
    let target = single_target(&cfg, dir.path());

    target.execute()?;
    target.execute()?;

    assert_eq!(runs(dir.path()), 2);
    assert!(!dir.path().join(".pybuild/all.hashes.pybuild").exists());
    Ok(())
}

#[test]
fn create_dirs_exist_before_the_command_runs() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let cfg = ConfigFileBuilder::new()
        .with_target(
            "all",
            TargetConfigBuilder::new("touch bin/reader")
                .create_dir("bin")
                .build(),
        )
        .build();
    let target = single_target(&cfg, dir.path());

    assert_eq!(target.execute()?, BuildOutcome::Built);
    assert!(dir.path().join("bin/reader").is_file());
    Ok(())
}

#[test]
fn custom_ledger_path_is_relative_to_root() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    project(dir.path())?;
    let cfg = ConfigFileBuilder::new()
        .with_target(
            "all",
            TargetConfigBuilder::new(COUNTING_CMD)
                .source("src/*.cpp")
                .change_detection(ChangeDetection::Hash)
                .ledger(".pybuild/all.hashes")
                .build(),
        )
        .build();
    let target = single_target(&cfg, dir.path());

    assert_eq!(
        target.ledger_path(),
        Some(dir.path().join(".pybuild/all.hashes").as_path())
    );
    target.execute()?;
    assert!(dir.path().join(".pybuild/all.hashes").is_file());
    Ok(())
}

#[test]
fn build_file_targets_dispatch_by_name() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let cfg = ConfigFileBuilder::new()
        .with_target("first", TargetConfigBuilder::new("echo first >> order.log").build())
        .with_target("second", TargetConfigBuilder::new("echo second >> order.log").build())
        .build();
    let registry = registry_from_config(
        &cfg,
        dir.path(),
        Arc::new(RealFileSystem),
        BuildOptions::default(),
    )?;

    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["first", "second"]);
    assert!(registry.dispatch(&["pybuild"]).is_err());
    registry.dispatch(&["pybuild", "second"])?;

    assert_eq!(fs::read_to_string(dir.path().join("order.log"))?, "second\n");
    Ok(())
}
