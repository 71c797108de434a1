//! Download-cache detection and neutralization policy.
//!
//! A pre-existing download cache can resurrect a previously fetched artefact
//! and hand it to the install step without the index ever being contacted.
//! The attack this module defends against: a poisoned cache entry under the
//! expected cache key would be served by the delegate engine in place of the
//! real package. The rule is that every artefact to be installed must pass
//! digest verification in the current run regardless of provenance, so when
//! a cache is configured the engine is told to bypass it outright.
//!
//! The environment is read exactly once at the edge of the program; the
//! resulting [`CacheStatus`] value is passed explicitly into the engine so
//! the neutralization rule stays testable without mutating process state.

/// Environment variable naming the legacy delegate download cache.
pub const DOWNLOAD_CACHE_ENV: &str = "PIP_DOWNLOAD_CACHE";

/// Environment variable naming the delegate's wheel/HTTP cache directory.
pub const CACHE_DIR_ENV: &str = "PIP_CACHE_DIR";

/// Whether a download cache is configured for the delegate engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CacheStatus {
    /// No cache directory is configured; staging needs no neutralization.
    #[default]
    Absent,
    /// A cache directory is configured and must be bypassed during staging.
    Configured {
        /// The configured cache directory, kept for diagnostics.
        dir: String,
    },
}

impl CacheStatus {
    /// Derive the cache status from the two environment values.
    ///
    /// The legacy download-cache variable takes precedence; empty values are
    /// treated as unset, matching how shells clear a variable with `VAR=`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashgate::cache::CacheStatus;
    ///
    /// assert_eq!(CacheStatus::detect_from(None, None), CacheStatus::Absent);
    /// assert_eq!(CacheStatus::detect_from(Some(""), None), CacheStatus::Absent);
    /// assert!(CacheStatus::detect_from(None, Some("/var/cache/pip")).is_configured());
    /// ```
    #[must_use]
    pub fn detect_from(download_cache: Option<&str>, cache_dir: Option<&str>) -> Self {
        download_cache
            .into_iter()
            .chain(cache_dir)
            .find(|value| !value.is_empty())
            .map_or(Self::Absent, |dir| Self::Configured {
                dir: dir.to_owned(),
            })
    }

    /// Read the cache status from the process environment.
    ///
    /// This is the only place the gate touches ambient cache configuration;
    /// everything downstream receives the returned value explicitly.
    #[must_use]
    pub fn from_env() -> Self {
        let download_cache = std::env::var(DOWNLOAD_CACHE_ENV).ok();
        let cache_dir = std::env::var(CACHE_DIR_ENV).ok();
        Self::detect_from(download_cache.as_deref(), cache_dir.as_deref())
    }

    /// Return `true` when a cache directory is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        matches!(self, Self::Configured { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::both_unset(None, None, false)]
    #[case::download_cache_set(Some("/tmp/cache"), None, true)]
    #[case::cache_dir_set(None, Some("/tmp/cache"), true)]
    #[case::empty_values_are_unset(Some(""), Some(""), false)]
    fn detect_from_reports_configuration(
        #[case] download_cache: Option<&str>,
        #[case] cache_dir: Option<&str>,
        #[case] expected: bool,
    ) {
        let status = CacheStatus::detect_from(download_cache, cache_dir);
        assert_eq!(status.is_configured(), expected);
    }

    #[test]
    fn legacy_download_cache_takes_precedence() {
        let status = CacheStatus::detect_from(Some("/legacy"), Some("/modern"));
        assert_eq!(
            status,
            CacheStatus::Configured {
                dir: "/legacy".to_owned()
            }
        );
    }

    #[test]
    fn empty_legacy_value_falls_through_to_cache_dir() {
        let status = CacheStatus::detect_from(Some(""), Some("/modern"));
        assert_eq!(
            status,
            CacheStatus::Configured {
                dir: "/modern".to_owned()
            }
        );
    }

    #[test]
    fn from_env_sees_the_download_cache_variable() {
        temp_env::with_vars(
            [
                (DOWNLOAD_CACHE_ENV, Some("/tmp/poisoned")),
                (CACHE_DIR_ENV, None::<&str>),
            ],
            || {
                assert!(CacheStatus::from_env().is_configured());
            },
        );
    }

    #[test]
    fn from_env_defaults_to_absent() {
        temp_env::with_vars(
            [
                (DOWNLOAD_CACHE_ENV, None::<&str>),
                (CACHE_DIR_ENV, None::<&str>),
            ],
            || {
                assert_eq!(CacheStatus::from_env(), CacheStatus::Absent);
            },
        );
    }
}
