use std::path::PathBuf;
use std::process::ExitCode;

use ruff_action::{ActionError, ActionInputs, Launcher, Plan, SystemLauncher};
use tracing_subscriber::prelude::*;

mod cli;

use cli::{Commands, GlobalOptions, RunArgs};

const LOG_ENV: &str = "RUFF_ACTION_LOG";

fn main() -> ExitCode {
    setup_miette();
    let cli = cli::cli().run();
    setup_tracing(&cli.global);

    let result = match cli.command {
        Commands::Run(args) => run(&args),
        Commands::Plan(args) => plan(&args),
        Commands::Version => {
            println!("ruff-action {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            let code = e.exit_code();
            eprintln!("{:?}", miette::Report::new(e));
            ExitCode::from(code)
        }
    }
}

fn run(args: &RunArgs) -> Result<ExitCode, ActionError> {
    let launcher = Launcher::parse(&args.launcher)?;
    let inputs = ActionInputs::from_env(args.variant)?;
    let output_file = std::env::var_os(ruff_action::output::GITHUB_OUTPUT)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);

    let outcome = ruff_action::run(&inputs, &launcher, &SystemLauncher, output_file.as_deref())?;
    Ok(outcome.exit_code())
}

fn plan(args: &RunArgs) -> Result<ExitCode, ActionError> {
    let launcher = Launcher::parse(&args.launcher)?;
    let inputs = ActionInputs::from_env(args.variant)?;

    match ruff_action::plan(&inputs, &launcher)? {
        Plan::Skip => println!("skip: changed-files filtering is enabled and no files changed"),
        Plan::Run(invocation) => println!("{}", invocation.display()),
    }
    Ok(ExitCode::SUCCESS)
}

/// `RUFF_ACTION_LOG` takes a full `EnvFilter` directive and wins over
/// `--log-level`.
fn setup_tracing(global: &GlobalOptions) {
    let (filter, explicit) = match tracing_subscriber::EnvFilter::try_from_env(LOG_ENV) {
        Ok(f) => (f, true),
        Err(_) => match global.level().directive() {
            Some(directive) => (tracing_subscriber::EnvFilter::new(directive), false),
            None => return,
        },
    };
    tracing_subscriber::registry()
        .with(
            tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true)
                .with_indent_lines(true)
                .with_verbose_exit(explicit)
                .with_verbose_entry(explicit)
                .with_timer(tracing_tree::time::Uptime::default())
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn setup_miette() {
    let theme = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        miette::GraphicalTheme::unicode()
    } else {
        miette::GraphicalTheme::unicode_nocolor()
    };
    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .context_lines(2)
                .graphical_theme(theme.clone())
                .build(),
        )
    }))
    .ok();
}
