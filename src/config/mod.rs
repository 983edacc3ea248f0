mod document;

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;

use document::{ConfigDocument, ConfigSection, ParseNode};

pub const DEFAULT_TOKEN_FILE: &str = "/etc/gitlab/eca-access-token";
pub const DEFAULT_GITLAB_API_URL: &str = "http://localhost/api/v4";
pub const DEFAULT_ECA_API_URL: &str = "https://api.eclipse.org/git/eca";
pub const DEFAULT_REPOSITORY_ENV: &str = "GL_REPOSITORY";
pub const DEFAULT_REPOSITORY_PREFIX: &str = "project-";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Top-level configuration, loaded from an optional KDL file.
///
/// Every setting has a default matching a stock GitLab installation, so the
/// hook runs without any config file at all.
#[derive(Debug, Clone)]
pub struct Config {
    /// File holding the GitLab API bearer token.
    pub token_file: PathBuf,
    /// Request timeout applied to each HTTP call.
    pub timeout: Duration,
    pub gitlab: GitlabConfig,
    pub eca: EcaConfig,
    pub git: GitConfig,
}

/// Where and how to look up the pushed-to project.
#[derive(Debug, Clone)]
pub struct GitlabConfig {
    pub api_url: Url,
    /// Environment variable carrying the repository locator (`project-42`).
    pub repository_env: String,
    /// Prefix stripped from the locator to obtain the project identifier.
    pub repository_prefix: String,
}

#[derive(Debug, Clone)]
pub struct EcaConfig {
    pub api_url: Url,
}

#[derive(Debug, Clone)]
pub struct GitConfig {
    pub program: String,
}

/// Errors that can occur when loading or parsing a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("invalid KDL syntax: {0}")]
    ParseError(String),
    #[error("invalid config: {0}")]
    ValidationError(String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            timeout: DEFAULT_TIMEOUT,
            gitlab: GitlabConfig::default(),
            eca: EcaConfig::default(),
            git: GitConfig::default(),
        }
    }
}

impl Default for GitlabConfig {
    fn default() -> Self {
        GitlabConfig {
            api_url: default_url(DEFAULT_GITLAB_API_URL),
            repository_env: DEFAULT_REPOSITORY_ENV.to_string(),
            repository_prefix: DEFAULT_REPOSITORY_PREFIX.to_string(),
        }
    }
}

impl Default for EcaConfig {
    fn default() -> Self {
        EcaConfig {
            api_url: default_url(DEFAULT_ECA_API_URL),
        }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            program: "git".to_string(),
        }
    }
}

impl Config {
    /// Load a config from a KDL file at the given path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let doc = ConfigDocument::load(path)?;
        Self::from_document(&doc)
    }

    /// Parse a KDL string into a Config.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let doc = ConfigDocument::parse(content)?;
        Self::from_document(&doc)
    }

    fn from_document(doc: &ConfigDocument) -> Result<Self, ConfigError> {
        let root = doc.root();
        reject_unknown(&root, &["token-file", "timeout-secs", "gitlab", "eca", "git"])?;

        let mut config = Config::default();
        if let Some(node) = root.setting("token-file") {
            config.token_file = PathBuf::from(non_empty(&node)?);
        }
        if let Some(node) = root.setting("timeout-secs") {
            config.timeout = parse_timeout(&node)?;
        }
        if let Some(gitlab) = root.section("gitlab") {
            reject_unknown(
                &gitlab,
                &["api-url", "repository-env", "repository-prefix"],
            )?;
            if let Some(node) = gitlab.setting("api-url") {
                config.gitlab.api_url = parse_url(&node)?;
            }
            if let Some(node) = gitlab.setting("repository-env") {
                config.gitlab.repository_env = non_empty(&node)?.to_string();
            }
            if let Some(node) = gitlab.setting("repository-prefix") {
                // An empty prefix is allowed: the locator is then the identifier.
                config.gitlab.repository_prefix = node.string_value()?.to_string();
            }
        }
        if let Some(eca) = root.section("eca") {
            reject_unknown(&eca, &["api-url"])?;
            if let Some(node) = eca.setting("api-url") {
                config.eca.api_url = parse_url(&node)?;
            }
        }
        if let Some(git) = root.section("git") {
            reject_unknown(&git, &["program"])?;
            if let Some(node) = git.setting("program") {
                config.git.program = non_empty(&node)?.to_string();
            }
        }
        Ok(config)
    }
}

fn reject_unknown(section: &ConfigSection<'_>, known: &[&str]) -> Result<(), ConfigError> {
    match section
        .node_names()
        .into_iter()
        .find(|(name, _)| !known.contains(name))
    {
        Some((name, line)) => Err(ConfigError::ValidationError(format!(
            "line {line}: unknown setting '{name}'"
        ))),
        None => Ok(()),
    }
}

fn non_empty<'a>(node: &ParseNode<'a>) -> Result<&'a str, ConfigError> {
    let value = node.string_value()?;
    if value.trim().is_empty() {
        return Err(node.invalid("value must not be empty"));
    }
    Ok(value)
}

fn parse_url(node: &ParseNode<'_>) -> Result<Url, ConfigError> {
    let raw = non_empty(node)?;
    Url::parse(raw).map_err(|e| node.invalid(&format!("invalid URL '{raw}': {e}")))
}

fn parse_timeout(node: &ParseNode<'_>) -> Result<Duration, ConfigError> {
    let secs = node.integer_value()?;
    match u64::try_from(secs) {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(node.invalid("timeout must be a positive number of seconds")),
    }
}

fn default_url(raw: &'static str) -> Url {
    Url::parse(raw).expect("built-in default URL is valid")
}
