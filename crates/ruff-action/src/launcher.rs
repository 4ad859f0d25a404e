use std::process::{Command, ExitCode, ExitStatus};

use crate::error::ActionError;
use crate::version::VersionSpec;
use crate::words;

/// Default launcher: `pipx run` fetches ruff into a throwaway venv.
pub const DEFAULT_LAUNCHER: &str = "pipx run";

/// The program that fetches and runs a pinned ruff, plus its leading
/// arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    pub program: String,
    pub args: Vec<String>,
}

impl Launcher {
    /// Split a shell-word launcher string such as `pipx run` or
    /// `pipx run --no-cache`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Tokenize`] on unbalanced quotes or an empty
    /// string.
    pub fn parse(command: &str) -> Result<Self, ActionError> {
        let tokenize_err = || ActionError::Tokenize {
            input: "--launcher",
            value: command.to_string(),
        };
        let mut parts = words::split(command).ok_or_else(tokenize_err)?.into_iter();
        let program = parts.next().ok_or_else(tokenize_err)?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl Default for Launcher {
    fn default() -> Self {
        Self {
            program: "pipx".to_string(),
            args: vec!["run".to_string()],
        }
    }
}

/// A fully built command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// The package requirement embedded in `args`, e.g. `ruff==0.5.1`.
    pub requirement: String,
    pub version: VersionSpec,
}

impl Invocation {
    /// The command line as a single shell-quoted string.
    pub fn display(&self) -> String {
        let line =
            core::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str));
        // `try_join` only fails on NUL bytes, which environment values cannot carry.
        shlex::try_join(line).unwrap_or_else(|_| {
            core::iter::once(self.program.clone())
                .chain(self.args.iter().cloned())
                .collect::<Vec<_>>()
                .join(" ")
        })
    }
}

/// Exit status of the launched process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildExit {
    pub code: i32,
}

impl ChildExit {
    /// Map an [`ExitStatus`]; a Unix child killed by a signal reports
    /// `128 + signal`, as shells do.
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self { code };
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self { code: 128 + signal };
            }
        }
        Self { code: 1 }
    }

    pub fn success(self) -> bool {
        self.code == 0
    }

    /// The process exit code, truncated to the low 8 bits like `exit(2)`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn exit_code(self) -> ExitCode {
        ExitCode::from((self.code & 0xff) as u8)
    }
}

/// Runs an [`Invocation`] to completion.
pub trait Launch {
    /// # Errors
    ///
    /// Returns [`ActionError::Spawn`] if the program could not be started.
    fn launch(&self, invocation: &Invocation) -> Result<ChildExit, ActionError>;
}

/// Spawns the invocation as a child process sharing this process's
/// stdin, stdout and stderr, and blocks until it exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launch for SystemLauncher {
    fn launch(&self, invocation: &Invocation) -> Result<ChildExit, ActionError> {
        tracing::info!(command = %invocation.display(), "running ruff");
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .status()
            .map_err(|source| ActionError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;
        let exit = ChildExit::from_status(status);
        tracing::debug!(code = exit.code, "ruff exited");
        Ok(exit)
    }
}
