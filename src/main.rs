use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// GitLab pre-receive hook validating pushed commits against the Eclipse Contributor Agreement.
#[derive(Debug, Parser)]
#[command(name = "eca-hook", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run as a GitLab pre-receive hook (reads `<old> <new> <ref>` from stdin)
    Hook {
        /// Path to the KDL config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Hook { config } => eca_hook::run_hook(config.as_deref()),
    };
    std::process::exit(code);
}
