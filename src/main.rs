//! hashgate CLI entrypoint.
//!
//! This binary reads an annotated requirements manifest, verifies every
//! downloaded artefact's digest, and only installs when the whole batch
//! verified. Process exit codes are part of the contract: `0` for success,
//! `2` when integrity verification failed, `1` for anything else.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use hashgate::cache::CacheStatus;
use hashgate::cli::{Cli, Command, HashArgs, InstallArgs};
use hashgate::digest::{DigestAlgorithm, compute_digest};
use hashgate::engine::{EngineConfig, PipEngine};
use hashgate::error::{GateError, Result};
use hashgate::exec::SystemCommandExecutor;
use hashgate::manifest::{Manifest, Requirement};
use hashgate::output::write_stderr_line;
use hashgate::pipeline::PipelineContext;
use hashgate::report::{BatchReport, EXIT_FAILURE, EXIT_SUCCESS, format_human, format_json};
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let exit_code = run(&cli, &mut stdout, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> i32 {
    match &cli.command {
        Some(Command::Hash(args)) => run_hash(args, stdout, stderr),
        Some(Command::Install(args)) => run_install(args, stdout, stderr),
        None => run_install(&cli.install, stdout, stderr),
    }
}

/// Run the verification-gated install and map the outcome to an exit code.
fn run_install(args: &InstallArgs, stdout: &mut dyn Write, stderr: &mut dyn Write) -> i32 {
    match install_batch(args, stdout, stderr) {
        Ok(report) => report.exit_code(),
        Err(err) => {
            write_stderr_line(stderr, err);
            EXIT_FAILURE
        }
    }
}

/// Parse the manifests, run the batch pipeline, and emit the report.
fn install_batch(
    args: &InstallArgs,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<BatchReport> {
    let requirements = read_requirements(&args.requirement)?;

    // The environment is read once, here; everything downstream receives
    // the cache status explicitly.
    let cache = CacheStatus::from_env();
    if cache.is_configured() && !args.quiet {
        write_stderr_line(
            stderr,
            "Download cache detected; bypassing it during verification.",
        );
    }

    let executor = SystemCommandExecutor;
    let engine = PipEngine::new(engine_config(args, cache), &executor);
    let context = PipelineContext {
        engine: &engine,
        quiet: args.quiet,
    };
    let batch = hashgate::pipeline::run_batch(&requirements, &context, stderr)?;
    emit_report(args, &batch, stdout, stderr)?;
    Ok(batch)
}

/// Build the delegate engine configuration from CLI arguments.
fn engine_config(args: &InstallArgs, cache: CacheStatus) -> EngineConfig {
    EngineConfig {
        pip: args.pip.clone(),
        index_url: args.index_url.clone(),
        extra_args: args.engine_args.clone(),
        cache,
        verbosity: args.verbosity,
    }
}

/// Read and parse every requirements file, preserving file and line order.
fn read_requirements(paths: &[Utf8PathBuf]) -> Result<Vec<Requirement>> {
    if paths.is_empty() {
        return Err(GateError::NoRequirementFiles);
    }
    let mut requirements = Vec::new();
    for path in paths {
        let text = std::fs::read_to_string(path).map_err(|source| GateError::ManifestRead {
            path: path.clone(),
            source,
        })?;
        requirements.extend(Manifest::parse(&text).into_requirements());
    }
    Ok(requirements)
}

/// Emit the batch report: JSON on stdout when requested, failures on stderr.
///
/// Failures are shown even in quiet mode; the success summary was already
/// written by the pipeline's progress output.
fn emit_report(
    args: &InstallArgs,
    batch: &BatchReport,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    if args.json {
        let json = format_json(batch)?;
        writeln!(stdout, "{json}").map_err(|source| GateError::WriteFailed { source })?;
    }
    if !batch.all_verified() {
        write_stderr_line(stderr, format_human(batch));
    }
    Ok(())
}

/// Print the digest annotation line for a local artefact.
fn run_hash(args: &HashArgs, stdout: &mut dyn Write, stderr: &mut dyn Write) -> i32 {
    match annotation_line(&args.file) {
        Ok(line) => match writeln!(stdout, "{line}") {
            Ok(()) => EXIT_SUCCESS,
            Err(source) => {
                write_stderr_line(stderr, GateError::WriteFailed { source });
                EXIT_FAILURE
            }
        },
        Err(err) => {
            write_stderr_line(stderr, err);
            EXIT_FAILURE
        }
    }
}

/// Compute the annotation line ready to paste above a specifier.
fn annotation_line(file: &Utf8Path) -> Result<String> {
    let digest = compute_digest(DigestAlgorithm::Sha256, file)?;
    Ok(format!("# {}: {digest}", DigestAlgorithm::Sha256.tag()))
}
