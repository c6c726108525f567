//! Trait seam over external process execution.
//!
//! The dispatcher never touches `std::process` directly; it goes through
//! [`CommandRunner`] so tests can substitute a recording mock and the
//! tracking logic stays independent of how processes are spawned.

use std::io;
use std::process::{Command, Stdio};

/// Captured result of one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Captured standard output, trailing whitespace trimmed.
    pub stdout: String,
    /// Process exit code (`-1` when terminated without one).
    pub exit_code: i32,
}

/// Spawns a program with arguments and captures its standard output.
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` to completion.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the process cannot be spawned;
    /// a non-zero exit is not an error at this layer.
    fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput>;
}

/// The real runner used by the binary.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Creates a new system runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()?;

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout)
                .trim_end()
                .to_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}
