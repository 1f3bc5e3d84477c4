use crate::services::utils::normalize_project_name;
use anyhow::{Context, bail};
use std::process::Command;

const NEXTEST_FLAGS: [&str; 6] = [
    "--failure-output",
    "immediate-final",
    "--success-output",
    "never",
    "--status-level",
    "skip",
];

/// `--workspace` for `None`/`"all"`, otherwise `-p <crate>`.
fn target_args(project: Option<&str>) -> Vec<String> {
    match project.filter(|p| *p != "all") {
        None => vec!["--workspace".into()],
        Some(project) => vec!["-p".into(), normalize_project_name(project)],
    }
}

fn cargo(args: &[String], failure: &str) -> anyhow::Result<()> {
    let status = Command::new("cargo").args(args).status().context("Failed to execute cargo")?;
    if !status.success() {
        bail!("{failure}");
    }
    Ok(())
}

/// Runs tests in the workspace or a specific crate, through `cargo-nextest` when installed.
///
/// # Errors
/// Returns an error if cargo cannot be started or a test fails.
pub fn run_tests(project: Option<&str>) -> anyhow::Result<()> {
    let has_nextest = Command::new("cargo-nextest").arg("--version").output().is_ok();

    let mut args: Vec<String> = if has_nextest {
        vec!["nextest".into(), "run".into()]
    } else {
        vec!["test".into()]
    };
    args.extend(target_args(project));
    args.push("--all-features".into());

    if has_nextest {
        args.extend(NEXTEST_FLAGS.map(String::from));
    } else {
        args.extend(["--lib", "--bins", "--tests", "--", "-q"].map(String::from));
    }

    println!("🧪 Running tests via '{}'...", if has_nextest { "nextest" } else { "cargo test" });
    cargo(&args, "Tests failed!")
}

/// Runs doc tests in the workspace or a specific crate.
///
/// # Errors
/// Returns an error if cargo cannot be started or a doctest fails.
pub fn run_doctests(project: Option<&str>) -> anyhow::Result<()> {
    let mut args: Vec<String> = vec!["test".into(), "--doc".into()];
    args.extend(target_args(project));
    // Issuance docs only compile with every feature on.
    args.push("--all-features".into());

    println!("📚 Running doctests via 'cargo test --doc'...");
    cargo(&args, "Doc tests failed!")
}
