//! Per-run staging of downloaded artefacts.
//!
//! The stager owns one temporary directory for the lifetime of a batch run
//! and gives every requirement its own empty subdirectory to download into,
//! so records can never confuse each other's artefacts. The whole tree is
//! removed when the stager drops, which also guarantees a failed or
//! cancelled record cannot leave behind a file a later run could mistake
//! for verified.

use crate::engine::PackageEngine;
use crate::error::{GateError, Result};
use crate::manifest::Requirement;
use camino::{Utf8Path, Utf8PathBuf};

/// Owns the temporary staging tree for one batch run.
pub struct Stager {
    // Held for its RAII cleanup; the path is resolved once at creation.
    _root: tempfile::TempDir,
    root_path: Utf8PathBuf,
}

impl Stager {
    /// Create a fresh staging root for this run.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::StagingRoot`] if the temporary directory cannot
    /// be created or its path is not valid UTF-8.
    pub fn create() -> Result<Self> {
        let root = tempfile::Builder::new()
            .prefix("hashgate-")
            .tempdir()
            .map_err(|e| GateError::StagingRoot {
                reason: e.to_string(),
            })?;
        let root_path =
            Utf8PathBuf::try_from(root.path().to_path_buf()).map_err(|e| GateError::StagingRoot {
                reason: format!("staging path is not valid UTF-8: {e}"),
            })?;
        Ok(Self {
            _root: root,
            root_path,
        })
    }

    /// Return the staging root path for this run.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.root_path
    }

    /// Stage one requirement: download its artefact into a fresh
    /// subdirectory and return the staged file's path.
    ///
    /// The artefact stays owned by this stager until the whole batch has
    /// verified; the install step receives the path, not the file.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::StagingFailed`] if the delegate engine fails,
    /// or an I/O error if the subdirectory cannot be created.
    pub fn stage(
        &self,
        index: usize,
        requirement: &Requirement,
        engine: &dyn PackageEngine,
    ) -> Result<Utf8PathBuf> {
        let dest_dir = self.root_path.join(format!("req-{index}"));
        std::fs::create_dir(&dest_dir)?;
        engine.download(&requirement.specifier, &dest_dir)
    }
}
