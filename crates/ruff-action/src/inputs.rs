use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::ActionError;

pub const ACTION_PATH: &str = "GITHUB_ACTION_PATH";
pub const WORKSPACE: &str = "GITHUB_WORKSPACE";
pub const ARGS: &str = "INPUT_ARGS";
pub const MODE: &str = "INPUT_MODE";
pub const SRC: &str = "INPUT_SRC";
pub const VERSION: &str = "INPUT_VERSION";
pub const VERSION_FILE: &str = "INPUT_VERSION_FILE";
pub const CHANGED_FILES: &str = "CHANGED_FILES";
pub const IS_CHANGED_FILES_ENABLED: &str = "IS_CHANGED_FILES_ENABLED";

/// How the files handed to ruff are selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variant {
    /// Run a fixed sub-command (`check`, `format`, ...) over `src`.
    Mode { mode: String },
    /// Run over the files a diff produced, falling back to `src`.
    ChangedFiles {
        changed_files: String,
        /// When set and `changed_files` is blank, skip the run entirely.
        enabled: bool,
    },
}

/// Explicit variant choice from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    Mode,
    ChangedFiles,
}

impl core::str::FromStr for VariantKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mode" => Ok(Self::Mode),
            "changed-files" => Ok(Self::ChangedFiles),
            _ => Err(format!("expected 'mode' or 'changed-files', got '{s}'")),
        }
    }
}

/// Action inputs, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionInputs {
    pub action_path: Option<PathBuf>,
    pub workspace: Option<PathBuf>,
    pub args: String,
    pub src: String,
    pub version: String,
    pub version_file: String,
    pub variant: Variant,
}

impl ActionInputs {
    /// Read inputs from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NonUtf8Input`] if a set variable is not valid
    /// UTF-8.
    pub fn from_env(kind: Option<VariantKind>) -> Result<Self, ActionError> {
        Self::from_lookup(std::env::var_os, kind)
    }

    /// Read inputs through `lookup`, which returns `None` for unset names.
    ///
    /// Without an explicit `kind`, the changed-files variant is chosen when
    /// either `CHANGED_FILES` or `IS_CHANGED_FILES_ENABLED` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NonUtf8Input`] if a set variable is not valid
    /// UTF-8.
    pub fn from_lookup(
        lookup: impl Fn(&'static str) -> Option<OsString>,
        kind: Option<VariantKind>,
    ) -> Result<Self, ActionError> {
        let var = |name: &'static str| {
            lookup(name)
                .map(|value| {
                    value
                        .into_string()
                        .map_err(|_| ActionError::NonUtf8Input { name })
                })
                .transpose()
        };
        let get = |name: &'static str| var(name).map(Option::unwrap_or_default);

        let changed_files = var(CHANGED_FILES)?;
        let enabled = var(IS_CHANGED_FILES_ENABLED)?;
        let kind = kind.unwrap_or(if changed_files.is_some() || enabled.is_some() {
            VariantKind::ChangedFiles
        } else {
            VariantKind::Mode
        });
        let variant = match kind {
            VariantKind::Mode => Variant::Mode { mode: get(MODE)? },
            VariantKind::ChangedFiles => Variant::ChangedFiles {
                changed_files: changed_files.unwrap_or_default(),
                enabled: enabled.as_deref() == Some("true"),
            },
        };

        Ok(Self {
            action_path: lookup(ACTION_PATH).map(PathBuf::from),
            workspace: lookup(WORKSPACE)
                .filter(|w| !w.is_empty())
                .map(PathBuf::from),
            args: get(ARGS)?,
            src: get(SRC)?,
            version: get(VERSION)?,
            version_file: get(VERSION_FILE)?,
            variant,
        })
    }
}
