//! Batch gatekeeping: stage, verify, and all-or-nothing install.
//!
//! The gatekeeper walks the manifest in order, staging and verifying one
//! record at a time, and only invokes the delegate install step if every
//! record verified. A single unverifiable record aborts the installs for
//! the whole batch, including records that verified: partially installing
//! a dependency set leaves an inconsistent environment that is harder to
//! diagnose than a clean refusal.

use crate::digest::{VerificationState, verify_artefact};
use crate::engine::PackageEngine;
use crate::error::{GateError, Result};
use crate::manifest::Requirement;
use crate::output::write_stderr_line;
use crate::report::{BatchReport, RecordReport, success_message};
use crate::staging::Stager;
use std::io::Write;

/// Context for one batch run.
pub struct PipelineContext<'a> {
    /// The delegate engine performing downloads and installs.
    pub engine: &'a dyn PackageEngine,
    /// Suppress progress output (failures are still reported).
    pub quiet: bool,
}

/// Stage, verify, and conditionally install every requirement.
///
/// Per-record failures are collected into the returned report rather than
/// returned as errors, so one run diagnoses the whole manifest. The install
/// phase runs only when every record verified, in manifest order.
///
/// # Errors
///
/// Returns an error if the staging root cannot be created or if the
/// delegate engine fails during the final install phase. Verification
/// failures are not errors; inspect [`BatchReport::all_verified`].
pub fn run_batch(
    requirements: &[Requirement],
    context: &PipelineContext<'_>,
    stderr: &mut dyn Write,
) -> Result<BatchReport> {
    if requirements.is_empty() {
        if !context.quiet {
            write_stderr_line(stderr, "No requirements to verify.");
        }
        return Ok(BatchReport::default());
    }

    if !context.quiet {
        write_stderr_line(
            stderr,
            format!(
                "Downloading and verifying {} requirement(s)...",
                requirements.len()
            ),
        );
    }

    let stager = Stager::create()?;
    let total = requirements.len();
    let mut records = Vec::with_capacity(total);
    let mut artefacts = Vec::with_capacity(total);

    for (index, requirement) in requirements.iter().enumerate() {
        let state = match stager.stage(index, requirement, context.engine) {
            Ok(artefact) => {
                let state = verify_artefact(requirement, &artefact);
                artefacts.push(artefact);
                state
            }
            Err(e) => VerificationState::StagingFailed {
                reason: staging_reason(&e),
            },
        };
        if !context.quiet {
            write_stderr_line(
                stderr,
                format!(
                    "  [{}/{total}] {}: {}",
                    index + 1,
                    requirement.specifier,
                    state.label()
                ),
            );
        }
        records.push(RecordReport::new(requirement, state));
    }

    let report = BatchReport::new(records);
    if !report.all_verified() {
        // All-or-nothing: no install call for any record, including the
        // ones that verified.
        return Ok(report);
    }

    if !context.quiet {
        write_stderr_line(stderr, format!("Installing {total} package(s)..."));
    }
    for (requirement, artefact) in requirements.iter().zip(artefacts.iter()) {
        context.engine.install(&requirement.specifier, artefact)?;
    }
    if !context.quiet {
        write_stderr_line(stderr, success_message(total));
    }

    Ok(report)
}

/// Extract the per-record reason from a staging error.
///
/// [`GateError::StagingFailed`] already names the specifier in its display
/// form; the record report carries the specifier itself, so only the reason
/// is kept.
fn staging_reason(error: &GateError) -> String {
    match error {
        GateError::StagingFailed { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
