//! Digest computation and staged-artefact verification.
//!
//! The verifier reads a staged artefact as opaque bytes, computes its
//! content digest, and compares the canonical encoding against the digests
//! annotated in the manifest. A match against any annotated digest passes,
//! which is what allows a manifest to carry both an old and a new digest
//! while a package rotates. No network or install action happens here.

use crate::error::Result;
use crate::manifest::Requirement;
use camino::Utf8Path;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;

/// Digest families understood by the manifest annotation grammar.
///
/// Currently exactly one family is supported. The canonical text encoding of
/// a computed digest lives here so that a future family can carry its own
/// encoding without touching the comparison logic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// SHA-256, encoded as unpadded URL-safe base64.
    #[default]
    Sha256,
}

impl DigestAlgorithm {
    /// The annotation tag recognized in manifest comments.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }

    /// Resolve an annotation tag to an algorithm.
    ///
    /// Tags are matched exactly and case-sensitively; anything else is an
    /// unrecognized annotation and is ignored by the parser.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashgate::digest::DigestAlgorithm;
    ///
    /// assert_eq!(DigestAlgorithm::from_tag("sha256"), Some(DigestAlgorithm::Sha256));
    /// assert_eq!(DigestAlgorithm::from_tag("md5"), None);
    /// assert_eq!(DigestAlgorithm::from_tag("SHA256"), None);
    /// ```
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        (tag == Self::Sha256.tag()).then_some(Self::Sha256)
    }

    /// Encode raw digest bytes in this algorithm's canonical text form.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashgate::digest::DigestAlgorithm;
    /// use sha2::{Digest, Sha256};
    ///
    /// let digest = DigestAlgorithm::Sha256.encode(&Sha256::digest(b""));
    /// assert_eq!(digest, "47DEQpj8HBSa-_TImW-5JCeuQeRkm5NMpJWZG3hSuFU");
    /// ```
    #[must_use]
    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            Self::Sha256 => {
                base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, bytes)
            }
        }
    }
}

/// The verification outcome of one requirement, derived during the batch
/// run and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerificationState {
    /// The computed digest matched one of the annotated digests.
    Verified,
    /// The requirement carried no digest annotation at all.
    MissingDigest {
        /// Digest computed from the staged artefact, offered as the
        /// annotation to add once the operator has vetted the package.
        computed: String,
    },
    /// The computed digest matched none of the annotated digests.
    DigestMismatch {
        /// Every digest the manifest would have accepted, in file order.
        expected: Vec<String>,
        /// The digest actually computed from the staged artefact.
        actual: String,
    },
    /// The artefact never made it into staging, so nothing could be hashed.
    StagingFailed {
        /// Description of the delegate or I/O failure.
        reason: String,
    },
}

impl VerificationState {
    /// Return `true` only for [`VerificationState::Verified`].
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }

    /// A short human label for progress lines and failure summaries.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::MissingDigest { .. } => "missing digest",
            Self::DigestMismatch { .. } => "digest mismatch",
            Self::StagingFailed { .. } => "staging failed",
        }
    }
}

/// Compute the canonical digest of a file, reading it as opaque bytes.
///
/// The file is streamed in fixed-size chunks so large artefacts never load
/// into memory whole, and no decoding or newline translation is applied.
///
/// # Errors
///
/// Returns [`crate::error::GateError::Io`] if the file cannot be opened or
/// read.
pub fn compute_digest(algorithm: DigestAlgorithm, path: &Utf8Path) -> Result<String> {
    let mut file = fs::File::open(path)?;
    match algorithm {
        DigestAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            let mut buffer = [0u8; 8192];
            loop {
                let bytes_read = file.read(&mut buffer)?;
                if bytes_read == 0 {
                    break;
                }
                hasher.update(&buffer[..bytes_read]);
            }
            Ok(algorithm.encode(&hasher.finalize()))
        }
    }
}

/// Verify a staged artefact against a requirement's annotated digests.
///
/// An empty digest list is [`VerificationState::MissingDigest`], never a
/// silent pass. Annotated values were whitespace-trimmed at parse time; the
/// comparison here is exact and case-sensitive, per the canonical encoding.
#[must_use]
pub fn verify_artefact(requirement: &Requirement, artefact: &Utf8Path) -> VerificationState {
    let actual = match compute_digest(DigestAlgorithm::Sha256, artefact) {
        Ok(digest) => digest,
        Err(e) => {
            return VerificationState::StagingFailed {
                reason: format!("failed to read staged artefact: {e}"),
            };
        }
    };
    log::trace!("{artefact}: computed digest {actual}");

    if requirement.expected_digests.is_empty() {
        return VerificationState::MissingDigest { computed: actual };
    }

    if requirement
        .expected_digests
        .iter()
        .any(|expected| expected == &actual)
    {
        VerificationState::Verified
    } else {
        VerificationState::DigestMismatch {
            expected: requirement.expected_digests.clone(),
            actual,
        }
    }
}
