//! Error types for the hashgate CLI.
//!
//! This module defines semantic error variants that provide actionable guidance
//! when a gated install fails. Per-requirement verification failures are not
//! errors: they are collected into the batch report so every failing
//! requirement can be shown in one pass. Errors here are the fatal cases that
//! stop the run outright.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while running the verification gate.
#[derive(Debug, Error)]
pub enum GateError {
    /// A requirements file could not be read.
    #[error("failed to read requirements file {path}")]
    ManifestRead {
        /// Path to the unreadable file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No requirements file was supplied on the command line.
    #[error("no requirements file given; pass -r/--requirement")]
    NoRequirementFiles,

    /// The per-run staging directory could not be prepared.
    #[error("could not prepare staging directory: {reason}")]
    StagingRoot {
        /// Description of why preparation failed.
        reason: String,
    },

    /// The delegate engine failed to fetch an artefact for a requirement.
    #[error("staging failed for {specifier}: {reason}")]
    StagingFailed {
        /// The requirement specifier being staged.
        specifier: String,
        /// Description of the delegate failure.
        reason: String,
    },

    /// The delegate engine failed to install a verified artefact.
    #[error("install failed for {specifier}: {reason}")]
    InstallFailed {
        /// The requirement specifier being installed.
        specifier: String,
        /// Description of the delegate failure.
        reason: String,
    },

    /// A delegate engine invocation exceeded its hard timeout.
    #[error("{command} timed out after {seconds} seconds")]
    CommandTimedOut {
        /// The command that was killed.
        command: String,
        /// The timeout that elapsed.
        seconds: u64,
    },

    /// Failed to write output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`GateError`].
pub type Result<T> = std::result::Result<T, GateError>;
