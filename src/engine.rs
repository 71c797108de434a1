//! Delegate package-engine abstraction and its pip implementation.
//!
//! The gate never resolves, builds, or installs packages itself; it drives
//! an external engine through the [`PackageEngine`] trait. The trait has two
//! capabilities: a download-only fetch that must not execute any of the
//! package's own setup or build code, and an install step fed exclusively
//! from a local, already verified artefact. The trait seam enables
//! dependency injection so the batch pipeline is testable without a network
//! or a Python installation.

use crate::cache::CacheStatus;
use crate::error::{GateError, Result};
use crate::exec::CommandExecutor;
use camino::{Utf8Path, Utf8PathBuf};
use std::time::Duration;

/// Hard timeout for one delegate engine invocation.
const ENGINE_TIMEOUT: Duration = Duration::from_secs(300);

/// Capabilities the gate requires of the delegate package engine.
#[cfg_attr(test, mockall::automock)]
pub trait PackageEngine {
    /// Fetch the artefact for `specifier` into `dest_dir` and return its
    /// path, without running any package-provided setup or build code.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::StagingFailed`] if the engine reports a non-zero
    /// outcome or produces no unambiguous artefact.
    fn download(&self, specifier: &str, dest_dir: &Utf8Path) -> Result<Utf8PathBuf>;

    /// Install a previously staged and verified artefact.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InstallFailed`] if the engine reports a non-zero
    /// outcome.
    fn install(&self, specifier: &str, artefact: &Utf8Path) -> Result<()>;
}

/// Configuration for the pip-backed engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// The delegate executable to invoke.
    pub pip: String,
    /// Package index URL forwarded to download invocations.
    pub index_url: Option<String>,
    /// Opaque pass-through arguments appended to every invocation.
    pub extra_args: Vec<String>,
    /// Download-cache status; a configured cache is bypassed during staging.
    pub cache: CacheStatus,
    /// Verbosity level forwarded to the delegate as repeated `-v` flags.
    pub verbosity: u8,
}

impl Default for EngineConfig {
    /// A configuration that invokes `pip` from `PATH` with no index override,
    /// no pass-through arguments, and no cache configured.
    fn default() -> Self {
        Self {
            pip: "pip".to_owned(),
            index_url: None,
            extra_args: Vec::new(),
            cache: CacheStatus::Absent,
            verbosity: 0,
        }
    }
}

/// [`PackageEngine`] implementation invoking pip as a subprocess.
pub struct PipEngine<'a> {
    config: EngineConfig,
    executor: &'a dyn CommandExecutor,
}

impl<'a> PipEngine<'a> {
    /// Create an engine with the given configuration and command executor.
    #[must_use]
    pub const fn new(config: EngineConfig, executor: &'a dyn CommandExecutor) -> Self {
        Self { config, executor }
    }

    /// Build the argument vector for a download-only fetch.
    ///
    /// `--no-deps` keeps the fetch to exactly the named specifier and
    /// `--no-cache-dir` is added whenever a cache is configured so the
    /// artefact always comes from the index rather than the cache.
    fn download_args(&self, specifier: &str, dest_dir: &Utf8Path) -> Vec<String> {
        let mut args = vec![
            "download".to_owned(),
            "--no-deps".to_owned(),
            "--disable-pip-version-check".to_owned(),
            "--dest".to_owned(),
            dest_dir.to_string(),
        ];
        if self.config.cache.is_configured() {
            args.push("--no-cache-dir".to_owned());
        }
        if let Some(url) = &self.config.index_url {
            args.push("--index-url".to_owned());
            args.push(url.clone());
        }
        self.push_common_args(&mut args);
        args.push(specifier.to_owned());
        args
    }

    /// Build the argument vector for installing a staged artefact.
    ///
    /// `--no-index` forbids the engine from reaching the network at install
    /// time: the only input is the verified local file.
    fn install_args(&self, artefact: &Utf8Path) -> Vec<String> {
        let mut args = vec![
            "install".to_owned(),
            "--no-index".to_owned(),
            "--no-deps".to_owned(),
            "--disable-pip-version-check".to_owned(),
        ];
        self.push_common_args(&mut args);
        args.push(artefact.to_string());
        args
    }

    /// Append verbosity and opaque pass-through arguments.
    fn push_common_args(&self, args: &mut Vec<String>) {
        for _ in 0..self.config.verbosity {
            args.push("-v".to_owned());
        }
        args.extend(self.config.extra_args.iter().cloned());
    }

    /// Run the delegate with the given arguments under the engine timeout.
    fn run_engine(&self, args: &[String]) -> Result<std::process::Output> {
        log::debug!("{} {}", self.config.pip, args.join(" "));
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.executor.run(&self.config.pip, &arg_refs, ENGINE_TIMEOUT)
    }
}

impl PackageEngine for PipEngine<'_> {
    fn download(&self, specifier: &str, dest_dir: &Utf8Path) -> Result<Utf8PathBuf> {
        let args = self.download_args(specifier, dest_dir);
        let output = self.run_engine(&args)?;
        if !output.status.success() {
            return Err(GateError::StagingFailed {
                specifier: specifier.to_owned(),
                reason: failure_reason(&output),
            });
        }
        locate_artefact(dest_dir, specifier)
    }

    fn install(&self, specifier: &str, artefact: &Utf8Path) -> Result<()> {
        let args = self.install_args(artefact);
        let output = self.run_engine(&args)?;
        if !output.status.success() {
            return Err(GateError::InstallFailed {
                specifier: specifier.to_owned(),
                reason: failure_reason(&output),
            });
        }
        Ok(())
    }
}

/// Resolve the single artefact the delegate placed in the staging directory.
///
/// A download-only fetch of one specifier with `--no-deps` produces exactly
/// one file; zero or several files mean the staging directory cannot be
/// trusted and the record fails.
fn locate_artefact(dest_dir: &Utf8Path, specifier: &str) -> Result<Utf8PathBuf> {
    let mut files = Vec::new();
    for entry in dest_dir.read_dir_utf8()? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.into_path());
        }
    }

    if files.len() > 1 {
        return Err(GateError::StagingFailed {
            specifier: specifier.to_owned(),
            reason: format!("delegate engine produced {} artefacts", files.len()),
        });
    }
    files.pop().ok_or_else(|| GateError::StagingFailed {
        specifier: specifier.to_owned(),
        reason: "delegate engine produced no artefact".to_owned(),
    })
}

/// Summarize a failed delegate invocation for diagnostics.
fn failure_reason(output: &std::process::Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        format!("delegate engine exited with {}", output.status)
    } else {
        trimmed.to_owned()
    }
}
