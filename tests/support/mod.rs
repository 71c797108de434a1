//! Test support utilities for hashgate behavioural tests.
//!
//! Provides a scripted [`PackageEngine`] implementation so the full batch
//! pipeline can be exercised through the public API without a network or a
//! Python installation.

use camino::{Utf8Path, Utf8PathBuf};
use hashgate::engine::PackageEngine;
use hashgate::error::{GateError, Result};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// A delegate engine whose download results are scripted per specifier.
///
/// Downloads write a predetermined payload into the staging directory,
/// mimicking either an honest index or a poisoned cache entry; installs are
/// recorded rather than executed.
#[derive(Default)]
pub struct ScriptedEngine {
    payloads: HashMap<String, Vec<u8>>,
    failing: HashSet<String>,
    installed: RefCell<Vec<String>>,
}

impl ScriptedEngine {
    /// Script the bytes the engine stages for a specifier.
    pub fn serve(&mut self, specifier: &str, payload: &[u8]) {
        self.payloads
            .insert(specifier.to_owned(), payload.to_vec());
    }

    /// Script a download failure for a specifier.
    pub fn fail_download(&mut self, specifier: &str) {
        self.failing.insert(specifier.to_owned());
    }

    /// The specifiers installed so far, in call order.
    pub fn installed(&self) -> Vec<String> {
        self.installed.borrow().clone()
    }
}

impl PackageEngine for ScriptedEngine {
    fn download(&self, specifier: &str, dest_dir: &Utf8Path) -> Result<Utf8PathBuf> {
        if self.failing.contains(specifier) {
            return Err(GateError::StagingFailed {
                specifier: specifier.to_owned(),
                reason: "index unreachable".to_owned(),
            });
        }
        let payload = self
            .payloads
            .get(specifier)
            .ok_or_else(|| GateError::StagingFailed {
                specifier: specifier.to_owned(),
                reason: format!("no matching distribution found for {specifier}"),
            })?;
        let artefact = dest_dir.join("artefact.tar.gz");
        std::fs::write(&artefact, payload)?;
        Ok(artefact)
    }

    fn install(&self, specifier: &str, _artefact: &Utf8Path) -> Result<()> {
        self.installed.borrow_mut().push(specifier.to_owned());
        Ok(())
    }
}
