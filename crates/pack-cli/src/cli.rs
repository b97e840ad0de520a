//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use pack_core::ApplyStrategy;
use pack_fs::LineEnding;

/// AgentOps Pack - Keep managed pack files in sync with a repository
#[derive(Parser, Debug)]
#[command(name = "agentops-pack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Expand a component selection with its requirements
    ///
    /// Examples:
    ///   agentops-pack resolve skills
    ///   agentops-pack resolve --manifest pack.toml --json prompts agents
    Resolve {
        /// Components to resolve (all manifest components when omitted)
        components: Vec<String>,

        /// Component manifest (TOML, YAML or JSON); standard pack if omitted
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Apply pack files to a target repository
    ///
    /// Runs as a dry run unless --apply is given.
    ///
    /// Examples:
    ///   agentops-pack apply --repo owner/name --pack-root ../pack
    ///   agentops-pack apply --components skills --strategy safe --apply
    Apply(RunArgs),

    /// Render the pull-request body for a dry run
    PrBody {
        #[command(flatten)]
        run: RunArgs,

        /// Run identifier shown in the footer
        #[arg(long, default_value = "0")]
        run_id: String,

        /// Detected signal as KEY=VALUE (repeatable)
        #[arg(long = "signal", value_parser = parse_key_value)]
        signals: Vec<(String, String)>,

        /// Open question to list (repeatable)
        #[arg(long = "question")]
        questions: Vec<String>,

        /// Previously published body to compare against
        #[arg(long)]
        previous: Option<PathBuf>,
    },

    /// List the managed sections in a file
    Sections {
        /// File to inspect
        file: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   agentops-pack completions bash > ~/.local/share/bash-completion/completions/agentops-pack
    ///   agentops-pack completions zsh > ~/.zfunc/_agentops-pack
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Inputs shared by `apply` and `pr-body`.
///
/// Options left unset do not override the config file.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Target repository as OWNER/NAME
    #[arg(long, env = "AGENTOPS_PACK_REPO")]
    pub repo: Option<String>,

    /// Root of the pack source tree
    #[arg(long, default_value = ".")]
    pub pack_root: PathBuf,

    /// Directory of the target repository checkout
    #[arg(long, default_value = ".")]
    pub target: PathBuf,

    /// Pack version shown in the PR body (`latest` keeps the manifest's)
    #[arg(long)]
    pub pack_version: Option<String>,

    /// Comma-separated components to install
    #[arg(long, value_delimiter = ',')]
    pub components: Option<Vec<String>>,

    /// Config file (defaults to .github/agentops-pack.yml in the target)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write changes instead of reporting them
    #[arg(long)]
    pub apply: bool,

    /// Policy for files that already exist
    #[arg(long)]
    pub strategy: Option<ApplyStrategy>,

    /// Force a line ending instead of detecting it per file
    #[arg(long)]
    pub line_ending: Option<LineEnding>,

    /// Fail on unknown config fields or skipped files
    #[arg(long)]
    pub strict: bool,

    /// Component manifest (TOML, YAML or JSON); standard pack if omitted
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Output as JSON for scripting
    #[arg(long)]
    pub json: bool,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_no_command() {
        let cli = Cli::parse_from(["agentops-pack"]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_resolve_components() {
        let cli = Cli::parse_from(["agentops-pack", "resolve", "skills", "mcp", "--json"]);
        assert_eq!(
            cli.command,
            Some(Commands::Resolve {
                components: vec!["skills".to_string(), "mcp".to_string()],
                manifest: None,
                json: true,
            })
        );
    }

    #[test]
    fn parse_apply_options() {
        let cli = Cli::parse_from([
            "agentops-pack",
            "apply",
            "--repo",
            "owner/name",
            "--components",
            "skills,mcp",
            "--strategy",
            "overwrite",
            "--line-ending",
            "crlf",
            "--apply",
        ]);
        let Some(Commands::Apply(args)) = cli.command else {
            panic!("expected apply command");
        };
        assert_eq!(args.repo.as_deref(), Some("owner/name"));
        assert_eq!(
            args.components,
            Some(vec!["skills".to_string(), "mcp".to_string()])
        );
        assert_eq!(args.strategy, Some(ApplyStrategy::Overwrite));
        assert_eq!(args.line_ending, Some(LineEnding::Crlf));
        assert!(args.apply);
        assert!(!args.strict);
        assert_eq!(args.target, PathBuf::from("."));
    }

    #[test]
    fn parse_invalid_strategy_fails() {
        let result = Cli::try_parse_from(["agentops-pack", "apply", "--strategy", "merge"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_pr_body_signals() {
        let cli = Cli::parse_from([
            "agentops-pack",
            "pr-body",
            "--run-id",
            "42",
            "--signal",
            "language=rust",
            "--question",
            "Is CI required?",
        ]);
        let Some(Commands::PrBody {
            run_id,
            signals,
            questions,
            ..
        }) = cli.command
        else {
            panic!("expected pr-body command");
        };
        assert_eq!(run_id, "42");
        assert_eq!(signals, vec![("language".to_string(), "rust".to_string())]);
        assert_eq!(questions, vec!["Is CI required?"]);
    }

    #[test]
    fn parse_bad_signal_fails() {
        let result = Cli::try_parse_from(["agentops-pack", "pr-body", "--signal", "novalue"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_completions_command() {
        let cli = Cli::parse_from(["agentops-pack", "completions", "bash"]);
        assert!(matches!(cli.command, Some(Commands::Completions { .. })));
    }

    #[test]
    fn parse_verbose_is_global() {
        let cli = Cli::parse_from(["agentops-pack", "sections", "README.md", "-v"]);
        assert!(cli.verbose);
    }
}
