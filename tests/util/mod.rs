#![allow(dead_code, unused_imports)]

/// Re-export some common utilities for system tests
pub use {
    anyhow::Result,
    assert_cmd::{prelude::*, Command},
    predicates::prelude::*,
    pretty_assertions::{assert_eq as pretty_assert_eq, assert_str_eq as pretty_assert_str_eq},
    std::{fmt::Display, process::Output},
    testresult::{TestError, TestResult},
};

pub const BIN_NAME: &str = "espurna-ota";

/// Discovery window short enough to keep the tests quick
pub const SHORT_TIMEOUT_MS: &str = "300";

mod regex_util;
pub use regex_util::*;

/// Keeps stdout and stderr apart, unlike a tuple of two Strings
pub struct StdoutStderr {
    pub stdout: String,
    pub stderr: String,
}

/// Split process output into `stdout` and `stderr` Strings, asserting the process exited successfully
/// (and printing both streams if it didn't).
pub fn process_output_to_stdio_if_success(output: Output) -> Result<StdoutStderr> {
    let Output {
        status,
        stdout,
        stderr,
    } = output;

    let stdout = String::from_utf8(stdout)?;
    let stderr = String::from_utf8(stderr)?;

    assert!(
        status.success(),
        "Command failed with status: {status}\n - stdout: {stdout}\n - stderr: {stderr}"
    );

    Ok(StdoutStderr { stdout, stderr })
}

/// Run the binary with `args` and a closed stdin
pub fn run_ota<I, S>(args: I) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let mut cmd = Command::cargo_bin(BIN_NAME)?;
    cmd.args(args).write_stdin("");
    Ok(cmd.output()?)
}
