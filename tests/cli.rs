//! Binary-level checks run through the built executable.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

/// Run the binary in `dir` with `args`, without inherited credentials or filters.
fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_xcstrings-translate"))
        .current_dir(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("OPENAI_API_KEY")
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("GEMINI_API_KEY")
        .output()
        .expect("spawn binary")
}

/// Names of everything in `dir`.
fn entries(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect()
}

#[test]
/// What: An unsupported provider exits with failure before any file is created.
///
/// Inputs:
/// - `--provider mistral --log-file run.log` in an empty directory.
///
/// Output:
/// - Exit code 1, stderr naming `mistral`; no log file and no output catalog.
fn unsupported_provider_creates_no_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = run_in(dir.path(), &["--provider", "mistral", "--log-file", "run.log"]);

    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("mistral"), "stderr: {stderr}");
    assert!(entries(dir.path()).is_empty(), "created: {:?}", entries(dir.path()));
}

#[test]
/// What: A zero batch size is a usage error reported by argument parsing.
///
/// Inputs:
/// - `--chunk-size 0` in an empty directory.
///
/// Output:
/// - Exit code 2; the directory stays empty.
fn zero_chunk_size_is_usage_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = run_in(dir.path(), &["--chunk-size", "0"]);

    assert_eq!(out.status.code(), Some(2));
    assert!(entries(dir.path()).is_empty());
}
