use crate::backend::BackendKind;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "wolcheck",
    about = "Wake-on-LAN compliance detection and remediation for vendor firmware and OS network adapters",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output as JSON instead of the text trace
    #[arg(long, global = true)]
    pub json: bool,

    /// Use only this config file instead of /etc and user config
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the configured backend
    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    /// Read sysfs from this directory instead of /
    #[arg(long, global = true, hide = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Log diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check firmware and adapter Wake-on-LAN settings (exit 1 if remediation is needed)
    Detect,

    /// Enable Wake-on-LAN in firmware and on every network adapter
    Remediate,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (auto-detected if omitted)
        shell: Option<Shell>,
    },
}

/// Print shell completions to stdout.
pub fn print_completions(shell: Option<Shell>) {
    let shell = shell.or_else(Shell::from_env).unwrap_or_else(|| {
        eprintln!(
            "Could not detect shell. Specify one: wolcheck completions bash|zsh|fish|elvish|powershell"
        );
        std::process::exit(1);
    });
    clap_complete::generate(
        shell,
        &mut Cli::command(),
        "wolcheck",
        &mut std::io::stdout(),
    );
}
