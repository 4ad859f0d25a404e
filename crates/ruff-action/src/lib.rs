#![doc = include_str!("../README.md")]
#![allow(unused_assignments)] // thiserror/miette derive macros trigger false positives

pub mod error;
pub mod inputs;
pub mod launcher;
pub mod output;
pub mod plan;
pub mod version;
pub mod version_file;
mod words;

use std::path::Path;
use std::process::ExitCode;

pub use error::ActionError;
pub use inputs::{ActionInputs, Variant, VariantKind};
pub use launcher::{ChildExit, Invocation, Launch, Launcher, SystemLauncher};
pub use plan::{Plan, plan};
pub use version::VersionSpec;

/// Result of a completed action run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to lint; ruff was never started.
    Skipped,
    Completed(ChildExit),
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Skipped => ExitCode::SUCCESS,
            Self::Completed(exit) => exit.exit_code(),
        }
    }
}

/// Plan and run ruff for `inputs`.
///
/// `output_file` is the `GITHUB_OUTPUT` step-output file, if any.
///
/// # Errors
///
/// Returns an error if the inputs are invalid or the launcher cannot be
/// started. Lint failures are reported through [`Outcome::Completed`].
pub fn run(
    inputs: &ActionInputs,
    launcher: &Launcher,
    launch: &impl Launch,
    output_file: Option<&Path>,
) -> Result<Outcome, ActionError> {
    if let Some(action_path) = &inputs.action_path {
        tracing::debug!(path = %action_path.display(), "action path");
    }

    let invocation = match plan(inputs, launcher)? {
        Plan::Skip => return Ok(Outcome::Skipped),
        Plan::Run(invocation) => invocation,
    };

    output::write_version(output_file, &invocation.version);
    let exit = launch.launch(&invocation)?;
    if !exit.success() {
        tracing::info!(code = exit.code, "ruff reported a failure");
    }
    Ok(Outcome::Completed(exit))
}
