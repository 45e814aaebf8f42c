use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for the `faro` binary.
#[derive(Debug, Parser)]
#[command(name = "faro", version, about = "Faro - conversation insight pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full workflow for every configured data source
    Run(RunArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Only run this source label (default: all configured sources)
    #[arg(short, long)]
    pub source: Option<String>,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_parses_source_filter_and_global_flags() {
        let cli = Cli::try_parse_from(["faro", "run", "--source", "subsidio", "--verbose"])
            .expect("cli should parse");
        assert!(cli.verbose);
        let Commands::Run(args) = cli.command;
        assert_eq!(args.source.as_deref(), Some("subsidio"));
    }

    #[test]
    fn run_without_source_targets_all_sources() {
        let cli = Cli::try_parse_from(["faro", "run"]).expect("cli should parse");
        let Commands::Run(args) = cli.command;
        assert!(args.source.is_none());
    }
}
