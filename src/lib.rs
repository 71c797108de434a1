//! hashgate library.
//!
//! This crate provides the core functionality for installing Python
//! requirements behind a digest verification gate: parsing `# sha256:`
//! annotations out of a requirements manifest, staging each package with
//! the delegate engine's download-only mode, verifying every staged
//! artefact's digest, and only then installing. It is used by the
//! `hashgate` CLI binary and can be consumed programmatically for testing
//! or custom gating workflows.
//!
//! # Modules
//!
//! - [`cache`] - Download-cache detection and neutralization policy
//! - [`cli`] - Command-line argument definitions
//! - [`digest`] - Digest computation and staged-artefact verification
//! - [`engine`] - Delegate package-engine abstraction and pip implementation
//! - [`error`] - Semantic error types
//! - [`exec`] - Subprocess execution with hard timeouts
//! - [`manifest`] - Requirements parsing and digest-annotation extraction
//! - [`output`] - Progress output helpers
//! - [`pipeline`] - Batch gatekeeping orchestration
//! - [`report`] - Batch reporting and exit-code mapping
//! - [`staging`] - Per-run artefact staging

pub mod cache;
pub mod cli;
pub mod digest;
pub mod engine;
pub mod error;
pub mod exec;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod staging;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
