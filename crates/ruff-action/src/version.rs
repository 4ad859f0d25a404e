use core::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ActionError;

/// Accepted shape of `INPUT_VERSION`: one major digit, up to three minor and
/// patch digits, optionally prefixed with `v`. `$` matches only at the very
/// end, so a trailing newline is rejected.
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?\d\.\d{1,3}\.\d{1,3}$").expect("version pattern is a valid regex")
});

/// Which ruff release the launcher should fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VersionSpec {
    /// No constraint; the launcher picks the newest release.
    #[default]
    Latest,
    /// A validated `INPUT_VERSION`, interpolated verbatim after `==`.
    Exact(String),
    /// A PEP 508 specifier read from a version file, e.g. `>=0.14,<1.0` or a
    /// bare `0.9.3`.
    Specifier(String),
}

impl VersionSpec {
    /// Build the package requirement handed to the launcher.
    ///
    /// The leading `v` of an exact version is kept as given.
    pub fn requirement(&self, package: &str) -> String {
        match self {
            Self::Latest => package.to_string(),
            Self::Exact(version) => format!("{package}=={version}"),
            Self::Specifier(spec) if starts_with_operator(spec) => format!("{package}{spec}"),
            Self::Specifier(spec) => format!("{package}=={spec}"),
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => Ok(()),
            Self::Exact(v) | Self::Specifier(v) => f.write_str(v),
        }
    }
}

fn starts_with_operator(spec: &str) -> bool {
    spec.starts_with(['=', '<', '>', '!', '~'])
}

/// Check an explicit version pin against the accepted pattern.
///
/// # Errors
///
/// Returns [`ActionError::InvalidVersion`] if `version` does not match.
pub fn validate_version(version: &str) -> Result<VersionSpec, ActionError> {
    if VERSION_PATTERN.is_match(version) {
        Ok(VersionSpec::Exact(version.to_string()))
    } else {
        Err(ActionError::InvalidVersion {
            version: version.to_string(),
        })
    }
}
