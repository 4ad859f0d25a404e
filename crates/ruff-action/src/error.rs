use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Exit code for a malformed `INPUT_VERSION`.
pub const EXIT_INVALID_VERSION: u8 = 1;

/// Exit code for every other fatal error raised before or while launching.
pub const EXIT_FATAL: u8 = 2;

/// Errors raised by the action before the linter takes over.
///
/// A non-zero exit from the linter itself is not an error: it is passed
/// through as [`crate::Outcome::Completed`].
#[derive(Debug, Error, Diagnostic)]
pub enum ActionError {
    #[error("VERSION does not match expected pattern")]
    #[diagnostic(
        code(ruff_action::invalid_version),
        help("expected MAJOR.MINOR.PATCH with an optional leading `v`, e.g. `0.5.1`; got `{version}`")
    )]
    InvalidVersion { version: String },

    #[error("failed to split {input} into arguments: unbalanced quotes in `{value}`")]
    #[diagnostic(code(ruff_action::tokenize))]
    Tokenize { input: &'static str, value: String },

    #[error("{name} is not valid UTF-8")]
    #[diagnostic(code(ruff_action::non_utf8_input))]
    NonUtf8Input { name: &'static str },

    #[error("failed to read ruff version from {}", .path.display())]
    #[diagnostic(code(ruff_action::version_file))]
    VersionFile {
        path: PathBuf,
        #[source]
        source: VersionFileError,
    },

    #[error("failed to launch `{program}`")]
    #[diagnostic(
        code(ruff_action::spawn),
        help("make sure the launcher is installed and on PATH")
    )]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl ActionError {
    /// The process exit code this error terminates the action with.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidVersion { .. } => EXIT_INVALID_VERSION,
            Self::Tokenize { .. }
            | Self::NonUtf8Input { .. }
            | Self::VersionFile { .. }
            | Self::Spawn { .. } => EXIT_FATAL,
        }
    }
}

#[derive(Debug, Error)]
pub enum VersionFileError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
