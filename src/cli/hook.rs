use std::io::Read;
use std::path::Path;

use crate::api::{EcaClient, GitlabClient};
use crate::config::Config;
use crate::git::GitCli;
use crate::pipeline::{self, HookError, Repository, Services};
use crate::protocol::{hook_error_line, PushUpdate, Report};
use crate::token::AccessToken;

/// Execute the hook subcommand and return the process exit status.
///
/// Loads config from the optional `--config` path (defaults otherwise), then
/// the access token, the repository locator, and the ref update on stdin, in
/// that order. Any failure prints a single `GL-HOOK-ERR:` line to stdout and
/// yields status 1; nothing after the failing step runs.
pub fn run(config_path: Option<&Path>) -> i32 {
    match execute(config_path) {
        Ok(report) => {
            print!("{report}");
            report.exit_code
        }
        Err(e) => {
            tracing::debug!(kind = ?e.kind(), error = %e, "hook aborted");
            println!("{}", hook_error_line(&e));
            1
        }
    }
}

fn execute(config_path: Option<&Path>) -> Result<Report, HookError> {
    let config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let token = AccessToken::load(&config.token_file)?;
    let locator = std::env::var(&config.gitlab.repository_env)
        .map_err(|_| HookError::MissingEnv(config.gitlab.repository_env.clone()))?;

    let mut stdin = String::new();
    std::io::stdin()
        .read_to_string(&mut stdin)
        .map_err(HookError::Stdin)?;
    let update = PushUpdate::parse(&stdin)?;
    let ignored = PushUpdate::ignored_updates(&stdin);
    if ignored > 0 {
        tracing::warn!(ignored, "only the first ref update is validated");
    }
    tracing::debug!(refname = ?update.refname, old = %update.old, new = %update.new, "ref update");

    let repository = Repository {
        locator,
        prefix: config.gitlab.repository_prefix.clone(),
    };
    let git = GitCli::new(config.git.program.clone());
    let projects = GitlabClient::new(config.gitlab.api_url.clone(), token, config.timeout)?;
    let compliance = EcaClient::new(config.eca.api_url.clone(), config.timeout)?;
    let services = Services {
        commits: &git,
        projects: &projects,
        compliance: &compliance,
    };
    pipeline::validate_push(&update, &repository, &services)
}
