use bpaf::Bpaf;
use ruff_action::VariantKind;
use ruff_action::launcher::DEFAULT_LAUNCHER;

#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version, fallback_to_usage, generate(cli))]
#[allow(clippy::upper_case_acronyms)]
/// Run a version-pinned ruff for a GitHub Action
pub struct CLI {
    #[bpaf(external(global_options))]
    pub global: GlobalOptions,

    #[bpaf(external(commands))]
    pub command: Commands,
}

/// Global options applied to all commands
#[derive(Debug, Clone, Bpaf)]
pub struct GlobalOptions {
    /// Log at debug level unless --log-level or RUFF_ACTION_LOG says otherwise
    #[bpaf(short('v'), long("verbose"), switch, fallback(false))]
    pub verbose: bool,

    /// The level of logging. In order, from the most verbose to the least verbose:
    /// debug, info, warn, error.
    #[bpaf(
        long("log-level"),
        argument("none|debug|info|warn|error"),
        fallback(LogLevel::None),
        display_fallback
    )]
    pub log_level: LogLevel,
}

impl GlobalOptions {
    /// The effective level; `--verbose` raises an unset level to debug.
    pub fn level(&self) -> LogLevel {
        match self.log_level {
            LogLevel::None if self.verbose => LogLevel::Debug,
            level => level,
        }
    }
}

#[derive(Debug, Clone, Bpaf)]
pub struct RunArgs {
    /// Command that fetches and runs the pinned ruff
    #[bpaf(
        long("launcher"),
        argument("CMD"),
        fallback(DEFAULT_LAUNCHER.to_string()),
        display_fallback
    )]
    pub launcher: String,

    /// File selection: "mode" runs INPUT_MODE over INPUT_SRC, "changed-files"
    /// runs over CHANGED_FILES. Detected from the environment when omitted.
    #[bpaf(long("variant"), argument("mode|changed-files"))]
    pub variant: Option<VariantKind>,
}

#[derive(Debug, Clone, Bpaf)]
pub enum Commands {
    #[bpaf(command("run"))]
    /// Run ruff with the action inputs from the environment
    Run(#[bpaf(external(run_args))] RunArgs),

    #[bpaf(command("plan"))]
    /// Print the command `run` would execute without running it
    Plan(#[bpaf(external(run_args))] RunArgs),

    #[bpaf(command("version"))]
    /// Print version information
    Version,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    #[default]
    None,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `EnvFilter` directive for this level, or `None` to disable logging.
    pub fn directive(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Debug => Some("debug"),
            Self::Info => Some("info"),
            Self::Warn => Some("warn"),
            Self::Error => Some("error"),
        }
    }
}

impl core::str::FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(format!(
                "expected 'none', 'debug', 'info', 'warn', or 'error', got '{s}'"
            )),
        }
    }
}

impl core::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.directive().unwrap_or("none"))
    }
}
