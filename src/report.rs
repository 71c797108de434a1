//! Batch reporting and process exit-code mapping.
//!
//! The gatekeeper collects one [`RecordReport`] per requirement rather than
//! stopping at the first failure, so a single run tells the operator about
//! every problem in the manifest. The exit-code constants are part of the
//! CLI contract: calling automation distinguishes "integrity check failed"
//! from ordinary install errors by code, so the values are stable across
//! versions.

use crate::digest::VerificationState;
use crate::error::{GateError, Result};
use crate::manifest::Requirement;
use serde::Serialize;

/// Exit code when every requirement verified and installed.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for failures other than integrity: unreadable manifest,
/// delegate engine errors, environment problems.
pub const EXIT_FAILURE: i32 = 1;

/// Dedicated exit code for a failed integrity verification.
///
/// Stable across versions; CI scripts depend on this value to tell a
/// tampered or unannotated requirement apart from an ordinary install
/// error.
///
/// # Examples
///
/// ```
/// use hashgate::report::{EXIT_SUCCESS, EXIT_VERIFICATION_FAILED};
///
/// assert_eq!(EXIT_SUCCESS, 0);
/// assert_eq!(EXIT_VERIFICATION_FAILED, 2);
/// ```
pub const EXIT_VERIFICATION_FAILED: i32 = 2;

/// The verification outcome of one requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordReport {
    /// The requirement specifier as given in the manifest.
    pub specifier: String,
    /// One-based manifest line of the specifier.
    pub line: usize,
    /// The derived verification state.
    #[serde(flatten)]
    pub state: VerificationState,
}

impl RecordReport {
    /// Pair a requirement with its derived verification state.
    #[must_use]
    pub fn new(requirement: &Requirement, state: VerificationState) -> Self {
        Self {
            specifier: requirement.specifier.clone(),
            line: requirement.line,
            state,
        }
    }
}

/// The aggregated outcome of one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    records: Vec<RecordReport>,
}

impl BatchReport {
    /// Build a report from per-record outcomes, in manifest order.
    #[must_use]
    pub fn new(records: Vec<RecordReport>) -> Self {
        Self { records }
    }

    /// The per-record outcomes in manifest order.
    #[must_use]
    pub fn records(&self) -> &[RecordReport] {
        self.records.as_slice()
    }

    /// Return `true` when every record verified.
    ///
    /// Vacuously true for an empty batch; an empty manifest has nothing to
    /// gate.
    #[must_use]
    pub fn all_verified(&self) -> bool {
        self.records.iter().all(|record| record.state.is_verified())
    }

    /// The records that did not verify, in manifest order.
    pub fn failures(&self) -> impl Iterator<Item = &RecordReport> {
        self.records
            .iter()
            .filter(|record| !record.state.is_verified())
    }

    /// Map the batch outcome to its process exit code.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.all_verified() {
            EXIT_SUCCESS
        } else {
            EXIT_VERIFICATION_FAILED
        }
    }
}

/// Format a success message after a fully installed batch.
#[must_use]
pub fn success_message(count: usize) -> String {
    let plural = if count == 1 { "package" } else { "packages" };
    format!("Successfully verified and installed {count} {plural}")
}

/// Format the batch outcome for human-readable display.
///
/// On failure, every failing record is listed with its specifier, manifest
/// line, and failure kind; mismatches additionally show the expected and
/// computed digests so the operator can diagnose tampering versus a stale
/// annotation.
#[must_use]
pub fn format_human(report: &BatchReport) -> String {
    if report.all_verified() {
        return success_message(report.records().len());
    }

    let failure_count = report.failures().count();
    let mut lines = vec![format!(
        "Verification failed for {failure_count} of {} requirement(s):",
        report.records().len()
    )];
    for record in report.failures() {
        append_failure_lines(&mut lines, record);
    }
    lines.push("Nothing was installed.".to_owned());
    lines.join("\n")
}

/// Append the human-readable lines describing one failing record.
fn append_failure_lines(lines: &mut Vec<String>, record: &RecordReport) {
    let heading = format!(
        "  {} (line {}): {}",
        record.specifier,
        record.line,
        record.state.label()
    );
    match &record.state {
        VerificationState::Verified => {}
        VerificationState::MissingDigest { computed } => {
            lines.push(format!("{heading}; the downloaded artefact hashes to:"));
            lines.push(format!("      # sha256: {computed}"));
        }
        VerificationState::DigestMismatch { expected, actual } => {
            lines.push(heading);
            for digest in expected {
                lines.push(format!("      expected: {digest}"));
            }
            lines.push(format!("      computed: {actual}"));
        }
        VerificationState::StagingFailed { reason } => {
            lines.push(format!("{heading}: {reason}"));
        }
    }
}

/// Format the batch outcome as JSON for scripting.
///
/// # Errors
///
/// Returns [`GateError::WriteFailed`] if serialization fails.
pub fn format_json(report: &BatchReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| GateError::WriteFailed {
        source: std::io::Error::other(e),
    })
}
