//! Shared test utilities for the hashgate crate.

use crate::digest::DigestAlgorithm;
use crate::error::Result;
use crate::exec::CommandExecutor;
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::{ExitStatus, Output};
use std::time::Duration;

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    Output {
        status: exit_status(0),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Return the canonical digest annotation value for the given bytes.
///
/// Matches what the verifier computes for a staged artefact with the same
/// content, so tests can author manifests without hard-coded digests.
#[must_use]
pub fn sha256_urlsafe(content: &[u8]) -> String {
    DigestAlgorithm::Sha256.encode(&Sha256::digest(content))
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The command to execute (e.g., "pip").
    pub cmd: String,
    /// The arguments to pass to the command.
    pub args: Vec<String>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

/// One queued stub response, with or without argument assertions.
#[derive(Debug)]
enum Expectation {
    Exact(ExpectedCall),
    AnyArgs(Result<Output>),
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Records expected command invocations and returns predefined results,
/// allowing tests to verify command execution without side effects.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<Expectation>>,
}

impl StubExecutor {
    /// Creates a `StubExecutor` asserting each invocation's command and
    /// arguments against the given expected calls, in order.
    #[must_use]
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into_iter().map(Expectation::Exact).collect()),
        }
    }

    /// Creates a `StubExecutor` returning the given results in order without
    /// asserting the invocation's arguments.
    #[must_use]
    pub fn new_ignoring_args(results: Vec<Result<Output>>) -> Self {
        Self {
            expected: RefCell::new(results.into_iter().map(Expectation::AnyArgs).collect()),
        }
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further command invocations"
        );
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, cmd: &str, args: &[&str], _timeout: Duration) -> Result<Output> {
        let mut expected = self.expected.borrow_mut();
        let expectation = expected.pop_front().expect("unexpected command invocation");

        match expectation {
            Expectation::Exact(call) => {
                assert_eq!(call.cmd, cmd);
                let received: Vec<String> = args.iter().map(|arg| (*arg).to_owned()).collect();
                assert_eq!(call.args, received);
                call.result
            }
            Expectation::AnyArgs(result) => result,
        }
    }
}
