//! CLI argument definitions for the hashgate binary.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Install Python requirements behind a digest verification gate.
#[derive(Parser, Debug)]
#[command(name = "hashgate")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install Python requirements behind a digest verification gate.\n\n",
    "hashgate reads a requirements file whose entries are annotated with ",
    "`# sha256: <digest>` comment lines, downloads each package with the ",
    "delegate engine's download-only mode, and verifies every artefact's ",
    "digest before anything is installed. If any requirement cannot be ",
    "verified, nothing is installed and the process exits with a dedicated ",
    "code so CI can tell integrity failures apart from ordinary errors.\n\n",
    "Arguments after `--` are forwarded opaquely to the delegate engine.",
))]
#[command(after_help = concat!(
    "EXIT CODES:\n",
    "  0  every requirement verified and installed\n",
    "  2  integrity verification failed; nothing was installed\n",
    "  1  other failure (unreadable manifest, delegate engine error)\n\n",
    "EXAMPLES:\n",
    "  Install from an annotated requirements file:\n",
    "    $ hashgate install -r requirements.txt\n\n",
    "  Use a private index and forward options to the delegate engine:\n",
    "    $ hashgate install -r requirements.txt --index-url https://pypi.example/ -- --retries 2\n\n",
    "  Print the annotation line for a downloaded artefact:\n",
    "    $ hashgate hash useless-1.0.tar.gz\n",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Install arguments (used when no subcommand is given).
    #[command(flatten)]
    pub install: InstallArgs,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Verify and install requirements (default when no subcommand given).
    Install(InstallArgs),

    /// Print the digest annotation line for a local artefact.
    Hash(HashArgs),
}

/// Arguments for the install command.
#[derive(Parser, Debug, Clone)]
pub struct InstallArgs {
    /// Annotated requirements file (can be repeated).
    #[arg(short, long, value_name = "FILE")]
    pub requirement: Vec<Utf8PathBuf>,

    /// Package index URL forwarded to the delegate engine.
    #[arg(long, value_name = "URL")]
    pub index_url: Option<String>,

    /// Delegate engine executable [default: pip from PATH].
    #[arg(long, value_name = "PATH", default_value = "pip")]
    pub pip: String,

    /// Write the batch report to stdout as JSON.
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (failures still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,

    /// Opaque arguments forwarded to every delegate engine invocation.
    #[arg(last = true, value_name = "ENGINE_ARG")]
    pub engine_args: Vec<String>,
}

/// Arguments for the hash command.
#[derive(Parser, Debug, Clone)]
pub struct HashArgs {
    /// The artefact file to hash.
    #[arg(value_name = "FILE")]
    pub file: Utf8PathBuf,
}

impl Default for InstallArgs {
    /// Creates an `InstallArgs` instance with no requirements files selected
    /// and all flags disabled.
    ///
    /// This is useful for testing or programmatic construction where only
    /// specific fields need to be set.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashgate::cli::InstallArgs;
    ///
    /// let args = InstallArgs::default();
    /// assert!(args.requirement.is_empty());
    /// assert_eq!(args.pip, "pip");
    /// assert!(!args.json);
    /// ```
    fn default() -> Self {
        Self {
            requirement: Vec::new(),
            index_url: None,
            pip: "pip".to_owned(),
            json: false,
            verbosity: 0,
            quiet: false,
            engine_args: Vec::new(),
        }
    }
}

impl Cli {
    /// Returns the effective install arguments.
    ///
    /// If an `Install` subcommand was provided, returns those arguments.
    /// Otherwise returns the flattened install arguments so that
    /// `hashgate -r reqs.txt` works without naming the subcommand.
    #[must_use]
    pub fn install_args(&self) -> &InstallArgs {
        match &self.command {
            Some(Command::Install(args)) => args,
            Some(Command::Hash(_)) | None => &self.install,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
