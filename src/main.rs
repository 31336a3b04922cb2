use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use wolcheck::cli::{Cli, Command};
use wolcheck::compliance::{self, Mode, NegativeStatusPolicy};
use wolcheck::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mode = match cli.command {
        Command::Detect => Mode::Detect,
        Command::Remediate => Mode::Remediate,
        Command::Completions { shell } => {
            wolcheck::cli::print_completions(shell);
            return Ok(());
        }
    };

    let mut config = wolcheck::config::load(cli.config.as_ref());
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    let code = run(&cli, &config, mode)?;
    std::process::exit(code);
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli, config: &Config, mode: Mode) -> Result<i32> {
    if mode == Mode::Remediate && !is_elevated() {
        eprintln!(
            "{} not running as root; firmware and adapter writes will likely fail.",
            "Warning:".yellow().bold()
        );
    }

    let platform = wolcheck::backend::open(config.backend, cli.root.as_deref());
    let result = compliance::evaluate(platform.as_ref(), config, mode);
    let policy = config.policy.negative_status;
    let code = result.exit_code(policy);

    if cli.json {
        wolcheck::output::print_result_json(&result, code)?;
    } else {
        wolcheck::output::print_result(&result);
        if result.status.is_negative() && policy == NegativeStatusPolicy::Informational {
            wolcheck::output::print_informational(&result);
        }
    }

    Ok(code)
}

#[cfg(unix)]
fn is_elevated() -> bool {
    nix::unistd::geteuid().is_root()
}

// Elevation is checked by the vendor tools themselves on Windows.
#[cfg(not(unix))]
fn is_elevated() -> bool {
    true
}
