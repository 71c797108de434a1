//! Requirements manifest parsing and digest-annotation extraction.
//!
//! A manifest is ordinary pip requirements text. Comment lines of the form
//! `# sha256: <digest>` annotate the next specifier line with an expected
//! content digest; several such lines accumulate onto one specifier to
//! support digest rotation. Parsing is a pure function from text to an
//! ordered sequence of [`Requirement`] records, implemented as a small
//! accumulator state machine rather than regex chains so the association
//! rules are easy to test in isolation.

use crate::digest::DigestAlgorithm;

/// One manifest entry: a specifier line and the digests annotated onto it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// The dependency specifier, trimmed of surrounding whitespace, exactly
    /// as it is handed to the delegate engine.
    pub specifier: String,
    /// Every recognized digest value from the comment block preceding this
    /// specifier, in file order. Empty when no annotation was found.
    pub expected_digests: Vec<String>,
    /// One-based source line of the specifier, for diagnostics.
    pub line: usize,
}

/// An ordered sequence of [`Requirement`] records parsed from manifest text.
///
/// Order is preserved from the source text and never rearranged: the delegate
/// engine may rely on file order when installing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    requirements: Vec<Requirement>,
}

impl Manifest {
    /// Parse manifest text into an ordered sequence of requirements.
    ///
    /// Digest comments attach to the nearest following specifier line. Blank
    /// lines between a digest comment and its specifier do not break the
    /// association, and comment lines that are not recognized digest
    /// annotations neither populate nor reset the pending digests. Pending
    /// digests left over after the last specifier are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashgate::manifest::Manifest;
    ///
    /// let manifest = Manifest::parse(
    ///     "# sha256: 47DEQpj8HBSa-_TImW-5JCeuQeRkm5NMpJWZG3hSuFU\nuseless==1.0\n",
    /// );
    /// let requirement = manifest.requirements().first().expect("one requirement");
    /// assert_eq!(requirement.specifier, "useless==1.0");
    /// assert_eq!(requirement.expected_digests.len(), 1);
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut requirements = Vec::new();
        let mut pending: Vec<String> = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                // A blank line keeps the pending digests attached to the
                // next specifier.
                continue;
            }
            if let Some(comment) = line.strip_prefix('#') {
                if let Some(digest) = digest_annotation(comment) {
                    pending.push(digest);
                }
                continue;
            }
            log::trace!(
                "line {}: specifier {line:?} with {} pending digest(s)",
                index + 1,
                pending.len()
            );
            requirements.push(Requirement {
                specifier: line.to_owned(),
                expected_digests: std::mem::take(&mut pending),
                line: index + 1,
            });
        }

        Self { requirements }
    }

    /// Return the requirements in manifest order.
    #[must_use]
    pub fn requirements(&self) -> &[Requirement] {
        self.requirements.as_slice()
    }

    /// Consume the manifest and return its requirements in manifest order.
    #[must_use]
    pub fn into_requirements(self) -> Vec<Requirement> {
        self.requirements
    }

    /// Return the number of requirements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    /// Return `true` when the manifest contains no requirements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }
}

/// Extract the digest value from one comment body, if it is a recognized
/// annotation.
///
/// `comment` is the text after the leading `#`. The annotation grammar is an
/// algorithm tag, a colon, at least one whitespace character, and a digest
/// token (a run of non-whitespace, non-`#` characters). Anything after the
/// token must be whitespace or an inline `#` comment; otherwise the digest
/// contained an embedded space and the line is ignored as malformed.
fn digest_annotation(comment: &str) -> Option<String> {
    let (tag, value) = comment.trim_start().split_once(':')?;
    DigestAlgorithm::from_tag(tag)?;
    if !value.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }

    let mut token = String::new();
    let mut in_token = true;
    for c in value.trim_start().chars() {
        if c == '#' {
            break;
        }
        if c.is_whitespace() {
            in_token = false;
            continue;
        }
        if !in_token {
            // Non-whitespace after the token ended: malformed annotation.
            return None;
        }
        token.push(c);
    }

    if token.is_empty() { None } else { Some(token) }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
