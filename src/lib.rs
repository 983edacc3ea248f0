pub mod api;
pub mod config;
pub mod domain;
pub mod git;
pub mod pipeline;
pub mod protocol;
pub mod telemetry;
pub mod token;

pub(crate) mod cli;

/// Run the hook subcommand and return the process exit status.
///
/// This is the binary entry point. It exists to bridge the binary crate (`main.rs`)
/// to the library without exposing `cli` internals. Callers wanting the workflow
/// itself should use [`pipeline::validate_push`] with their own collaborators.
pub fn run_hook(config_path: Option<&std::path::Path>) -> i32 {
    telemetry::init_tracing();
    cli::hook::run(config_path)
}
