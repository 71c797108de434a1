//! Subprocess execution for delegate engine invocations.
//!
//! This module provides the [`CommandExecutor`] seam between the gate and
//! the host system. Invocations have a hard timeout to prevent hangs on
//! network issues, and both output streams are captured for diagnostics.

use crate::error::{GateError, Result};
use std::process::{Command, Output, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the
    /// command, or [`GateError::CommandTimedOut`] if it does not complete
    /// within `timeout`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use hashgate::exec::{CommandExecutor, SystemCommandExecutor};
    /// use std::time::Duration;
    ///
    /// let executor = SystemCommandExecutor;
    /// let output = executor.run("pip", &["--version"], Duration::from_secs(30))?;
    /// assert!(output.status.success());
    /// # Ok::<(), hashgate::error::GateError>(())
    /// ```
    fn run(&self, cmd: &str, args: &[&str], timeout: Duration) -> Result<Output>;
}

/// Executes commands on the host system with a hard timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str], timeout: Duration) -> Result<Output> {
        let mut command = Command::new(cmd);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn()?;

        match child.wait_timeout(timeout)? {
            Some(status) => {
                let stdout = child
                    .stdout
                    .take()
                    .map(std::io::read_to_string)
                    .transpose()?
                    .unwrap_or_default();
                let stderr = child
                    .stderr
                    .take()
                    .map(std::io::read_to_string)
                    .transpose()?
                    .unwrap_or_default();

                Ok(Output {
                    status,
                    stdout: stdout.into_bytes(),
                    stderr: stderr.into_bytes(),
                })
            }
            None => {
                // Timeout - kill the process before reporting
                let _ = child.kill();
                let _ = child.wait();
                Err(GateError::CommandTimedOut {
                    command: command_line(cmd, args),
                    seconds: timeout.as_secs(),
                })
            }
        }
    }
}

/// Render a command and its arguments for diagnostics.
fn command_line(cmd: &str, args: &[&str]) -> String {
    let mut line = cmd.to_owned();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
