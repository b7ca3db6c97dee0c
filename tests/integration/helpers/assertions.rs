//! Assertion helpers for calls output.

#![allow(dead_code)]

use std::path::Path;
use std::process::Output;

/// Splits calls output into lines.
pub fn call_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Asserts that the calls file at `path` holds exactly `expected`, in order.
///
/// # Panics
///
/// Panics if the file cannot be read or its lines differ.
pub fn assert_calls(path: &Path, expected: &[&str]) {
    let text = std::fs::read_to_string(path).expect("Failed to read calls file");
    assert_eq!(call_lines(&text), expected, "calls mismatch in {}", path.display());
}

/// Asserts that a process succeeded, printing its stderr otherwise.
///
/// # Panics
///
/// Panics if the process exited unsuccessfully.
pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Asserts that a process failed and its stderr mentions `needle`.
///
/// # Panics
///
/// Panics if the process succeeded or `needle` is not in stderr.
pub fn assert_failure_mentions(output: &Output, needle: &str) {
    assert!(!output.status.success(), "command unexpectedly succeeded");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(needle), "stderr did not mention '{needle}':\n{stderr}");
}
