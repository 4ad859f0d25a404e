use std::path::Path;

use crate::error::ActionError;
use crate::inputs::{ARGS, ActionInputs, CHANGED_FILES, SRC, Variant};
use crate::launcher::{Invocation, Launcher};
use crate::version::{self, VersionSpec};
use crate::{version_file, words};

pub const PACKAGE: &str = "ruff";

/// Every mode other than this one is run with `--check`.
const CHECK_MODE: &str = "check";

/// What the action will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Changed-files filtering is on and nothing changed.
    Skip,
    Run(Invocation),
}

/// Decide which ruff release to run.
///
/// An explicit `INPUT_VERSION` wins and must match the version pattern;
/// otherwise `INPUT_VERSION_FILE`, when set, is consulted.
///
/// # Errors
///
/// Returns [`ActionError::InvalidVersion`] for a malformed pin and
/// [`ActionError::VersionFile`] if the version file cannot be read.
pub fn resolve_version(inputs: &ActionInputs) -> Result<VersionSpec, ActionError> {
    if !inputs.version.is_empty() {
        return version::validate_version(&inputs.version);
    }
    if inputs.version_file.is_empty() {
        return Ok(VersionSpec::Latest);
    }
    let spec = version_file::resolve(
        Path::new(&inputs.version_file),
        inputs.workspace.as_deref(),
    )?;
    Ok(spec.map_or(VersionSpec::Latest, VersionSpec::Specifier))
}

/// Build the command for `inputs`, or decide to skip.
///
/// The version is validated before anything else, so a bad pin fails even
/// when the run would have been skipped.
///
/// # Errors
///
/// Returns an error if the version cannot be resolved or an input has
/// unbalanced quotes.
pub fn plan(inputs: &ActionInputs, launcher: &Launcher) -> Result<Plan, ActionError> {
    let spec = resolve_version(inputs)?;
    let requirement = spec.requirement(PACKAGE);

    let mut args = launcher.args.clone();
    args.push(requirement.clone());

    match &inputs.variant {
        Variant::Mode { mode } => {
            args.push(mode.clone());
            if mode != CHECK_MODE {
                args.push("--check".to_string());
            }
            args.extend(split(ARGS, &inputs.args)?);
            args.extend(split(SRC, &inputs.src)?);
        }
        Variant::ChangedFiles {
            changed_files,
            enabled,
        } => {
            let mut files = split(CHANGED_FILES, changed_files)?;
            if files.is_empty() {
                files = split(SRC, &inputs.src)?;
            }
            if *enabled && changed_files.trim().is_empty() {
                tracing::info!("changed-files filtering is enabled and no files changed, skipping");
                return Ok(Plan::Skip);
            }
            args.extend(split(ARGS, &inputs.args)?);
            args.extend(files);
        }
    }

    Ok(Plan::Run(Invocation {
        program: launcher.program.clone(),
        args,
        requirement,
        version: spec,
    }))
}

fn split(input: &'static str, value: &str) -> Result<Vec<String>, ActionError> {
    words::split(value).ok_or_else(|| ActionError::Tokenize {
        input,
        value: value.to_string(),
    })
}
