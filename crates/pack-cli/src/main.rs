//! AgentOps Pack CLI
//!
//! The command-line interface for applying managed pack files to a repository.

mod cli;
mod commands;
mod error;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use commands::PrBodyOptions;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} AgentOps Pack CLI", "agentops-pack".green().bold());
            println!();
            println!("Run {} for available commands.", "agentops-pack --help".cyan());
            Ok(())
        }
    }
}

/// `--verbose` forces debug output; otherwise `RUST_LOG` decides, and
/// nothing is logged when it is unset.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => return,
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("{} tracing subscriber already set", "warning".yellow());
    }
    tracing::debug!("Verbose mode enabled");
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Resolve {
            components,
            manifest,
            json,
        } => commands::run_resolve(&components, manifest.as_deref(), json),
        Commands::Apply(args) => commands::run_apply(&args),
        Commands::PrBody {
            run,
            run_id,
            signals,
            questions,
            previous,
        } => commands::run_pr_body(
            &run,
            &PrBodyOptions {
                run_id: &run_id,
                signals: &signals,
                questions: &questions,
                previous: previous.as_deref(),
            },
        ),
        Commands::Sections { file, json } => commands::run_sections(&file, json),
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}

fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "agentops-pack", &mut std::io::stdout());
}
