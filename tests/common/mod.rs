// Shared test helpers for integration tests: spawning the hook binary,
// scratch git repositories, and per-test config/token files.
#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub const ZERO: &str = "0000000000000000000000000000000000000000";
pub const TOKEN: &str = "glpat-test-token";

pub fn binary_path() -> PathBuf {
    let path = PathBuf::from(env!("CARGO_BIN_EXE_eca-hook"));
    assert!(path.exists(), "binary not found at {}", path.display());
    path
}

/// Output of one hook invocation.
#[derive(Debug)]
pub struct HookRun {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl HookRun {
    pub fn lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}

/// Runs the binary's `hook` subcommand in `cwd` with the given stdin, extra
/// args and environment. `GL_REPOSITORY` is only set when passed in `env`.
pub fn run_hook_in(cwd: &Path, stdin_input: &str, extra_args: &[&str], env: &[(&str, &str)]) -> HookRun {
    let mut cmd = Command::new(binary_path());
    cmd.arg("hook").args(extra_args).current_dir(cwd);
    cmd.env_remove("GL_REPOSITORY").env_remove("ECA_HOOK_LOG");
    for (key, value) in env {
        cmd.env(key, value);
    }
    let output = cmd
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()
        .and_then(|mut child| {
            use std::io::ErrorKind;
            let write_result = child
                .stdin
                .take()
                .unwrap()
                .write_all(stdin_input.as_bytes());
            if let Err(e) = write_result {
                if e.kind() != ErrorKind::BrokenPipe {
                    return Err(e);
                }
            }
            child.wait_with_output()
        })
        .expect("failed to execute binary");

    HookRun {
        stdout: String::from_utf8(output.stdout).expect("stdout not valid UTF-8"),
        stderr: String::from_utf8(output.stderr).expect("stderr not valid UTF-8"),
        exit_code: output.status.code().unwrap_or(-1),
    }
}

/// Scratch directory holding a token file and a config file pointing the
/// hook at the given API base URLs.
pub struct HookSetup {
    pub dir: TempDir,
    pub token_path: PathBuf,
    pub config_path: PathBuf,
}

impl HookSetup {
    pub fn new(gitlab_api: &str, eca_api: &str) -> Self {
        let setup = Self::without_token(gitlab_api, eca_api);
        std::fs::write(&setup.token_path, format!("{TOKEN}\n")).expect("failed to write token");
        setup
    }

    pub fn without_token(gitlab_api: &str, eca_api: &str) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let token_path = dir.path().join("eca-access-token");
        let config_path = dir.path().join("eca-hook.kdl");
        let config = format!(
            r#"token-file "{token}"
timeout-secs 5
gitlab {{
    api-url "{gitlab_api}"
}}
eca {{
    api-url "{eca_api}"
}}
"#,
            token = token_path.display()
        );
        std::fs::write(&config_path, config).expect("failed to write config");
        HookSetup {
            dir,
            token_path,
            config_path,
        }
    }

    pub fn config_arg(&self) -> String {
        self.config_path.to_str().unwrap().to_string()
    }
}

// ---- git helpers ----

pub fn run_git(repo_dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .env("GIT_AUTHOR_NAME", "Ada Lovelace")
        .env("GIT_AUTHOR_EMAIL", "ada@example.org")
        .env("GIT_COMMITTER_NAME", "Ada Lovelace")
        .env("GIT_COMMITTER_EMAIL", "ada@example.org")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

pub fn make_git_repo() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    run_git(dir.path(), &["init", "-q", "-b", "main"]);
    run_git(dir.path(), &["config", "user.name", "test-user"]);
    run_git(dir.path(), &["config", "user.email", "test@example.com"]);
    run_git(dir.path(), &["config", "commit.gpgsign", "false"]);
    dir
}

/// Create an empty commit with `message` and return its hash.
pub fn commit(repo: &Path, message: &str) -> String {
    run_git(repo, &["commit", "-q", "--allow-empty", "-m", message]);
    run_git(repo, &["rev-parse", "HEAD"])
}
