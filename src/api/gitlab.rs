use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use super::{describe, http_client, ProjectResolver};
use crate::domain::ProjectId;
use crate::token::AccessToken;

/// Error resolving the project's URL through the GitLab API.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("GitLab API URL cannot take a path: {0}")]
    BaseUrl(Url),
    #[error("project lookup at {url} failed: {detail}")]
    Request { url: Url, detail: String },
    #[error("project lookup at {url} returned HTTP {status}")]
    Status { url: Url, status: u16 },
    #[error("project lookup returned invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("project {0} has no web_url")]
    MissingWebUrl(ProjectId),
}

/// The subset of GitLab's project record the hook needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectRecord {
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub forked_from_project: Option<UpstreamProject>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpstreamProject {
    #[serde(default)]
    pub web_url: Option<String>,
}

impl ProjectRecord {
    /// URL compliance is checked against: the upstream for forks, else the
    /// project's own.
    pub fn canonical_url(&self) -> Option<&str> {
        self.forked_from_project
            .as_ref()
            .and_then(|upstream| upstream.web_url.as_deref())
            .or(self.web_url.as_deref())
    }
}

/// [`ProjectResolver`] backed by `GET <api>/projects/<id>`.
#[derive(Debug)]
pub struct GitlabClient {
    http: reqwest::blocking::Client,
    api_url: Url,
    token: AccessToken,
}

impl GitlabClient {
    pub fn new(api_url: Url, token: AccessToken, timeout: Duration) -> Result<Self, ResolveError> {
        Ok(GitlabClient {
            http: http_client(timeout).map_err(ResolveError::Client)?,
            api_url,
            token,
        })
    }

    /// `<api>/projects/<id>`, with the id encoded as one path segment so
    /// `group/repo` becomes `group%2Frepo`.
    fn project_url(&self, id: &ProjectId) -> Result<Url, ResolveError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| ResolveError::BaseUrl(self.api_url.clone()))?
            .pop_if_empty()
            .push("projects")
            .push(id.as_str());
        Ok(url)
    }

    /// Fetch and parse the project record.
    pub fn fetch_project(&self, id: &ProjectId) -> Result<ProjectRecord, ResolveError> {
        let url = self.project_url(id)?;
        tracing::debug!(%url, "fetching project record");

        let response = self
            .http
            .get(url.clone())
            .bearer_auth(self.token.expose())
            .send()
            .map_err(|e| ResolveError::Request {
                url: url.clone(),
                detail: describe(&e),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Status {
                url,
                status: status.as_u16(),
            });
        }
        let body = response.text().map_err(|e| ResolveError::Request {
            url: url.clone(),
            detail: describe(&e),
        })?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl ProjectResolver for GitlabClient {
    fn resolve_project_url(&self, id: &ProjectId) -> Result<String, ResolveError> {
        let record = self.fetch_project(id)?;
        if let Some(upstream) = record
            .forked_from_project
            .as_ref()
            .and_then(|p| p.web_url.as_deref())
        {
            tracing::info!(project = %id, upstream, "project is a fork, validating against upstream");
        }
        record
            .canonical_url()
            .map(String::from)
            .ok_or_else(|| ResolveError::MissingWebUrl(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(value: serde_json::Value) -> ProjectRecord {
        serde_json::from_value(value).unwrap()
    }

    fn project(id: &str) -> ProjectId {
        ProjectId::from_locator(id, "").unwrap()
    }

    /// Resolve on a blocking thread: the blocking client must not run on
    /// the async test runtime.
    async fn resolve(server: &MockServer, id: &str, timeout: Duration) -> Result<String, ResolveError> {
        let api_url = Url::parse(&format!("{}/api/v4", server.uri())).unwrap();
        let id = project(id);
        tokio::task::spawn_blocking(move || {
            let client = GitlabClient::new(api_url, AccessToken::new("secret"), timeout)?;
            client.resolve_project_url(&id)
        })
        .await
        .unwrap()
    }

    // ---- ProjectRecord ----

    #[test]
    fn canonical_url_prefers_upstream() {
        let rec = record(json!({
            "web_url": "https://host/fork",
            "forked_from_project": {"web_url": "https://host/origin"}
        }));
        assert_eq!(rec.canonical_url(), Some("https://host/origin"));
    }

    #[test]
    fn canonical_url_falls_back_when_upstream_url_null() {
        let rec = record(json!({
            "web_url": "https://host/fork",
            "forked_from_project": {"web_url": null}
        }));
        assert_eq!(rec.canonical_url(), Some("https://host/fork"));
    }

    #[test]
    fn canonical_url_with_null_fork_field() {
        let rec = record(json!({"web_url": "https://host/own", "forked_from_project": null}));
        assert_eq!(rec.canonical_url(), Some("https://host/own"));
    }

    #[test]
    fn canonical_url_absent() {
        assert_eq!(record(json!({"id": 42})).canonical_url(), None);
    }

    // ---- HTTP ----

    #[tokio::test]
    async fn resolves_own_url_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/42"))
            .and(header("Authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 42,
                "web_url": "https://host/group/project"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = resolve(&server, "42", Duration::from_secs(5)).await.unwrap();
        assert_eq!(url, "https://host/group/project");
    }

    #[tokio::test]
    async fn fork_resolves_to_origin() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "web_url": "https://host/fork",
                "forked_from_project": {"id": 1, "web_url": "https://host/origin"}
            })))
            .mount(&server)
            .await;

        let url = resolve(&server, "7", Duration::from_secs(5)).await.unwrap();
        assert_eq!(url, "https://host/origin");
    }

    #[tokio::test]
    async fn path_identifier_is_encoded_as_one_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/group%2Frepo"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"web_url": "https://host/group/repo"})),
            )
            .mount(&server)
            .await;

        let url = resolve(&server, "group/repo", Duration::from_secs(5)).await.unwrap();
        assert_eq!(url, "https://host/group/repo");
    }

    #[tokio::test]
    async fn non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = resolve(&server, "42", Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, ResolveError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn malformed_json_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = resolve(&server, "42", Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, ResolveError::InvalidJson(_)));
    }

    #[tokio::test]
    async fn record_without_url_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42})))
            .mount(&server)
            .await;

        let err = resolve(&server, "42", Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, ResolveError::MissingWebUrl(_)));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"web_url": "https://host/p"}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = resolve(&server, "42", Duration::from_millis(200)).await.unwrap_err();
        match err {
            ResolveError::Request { detail, .. } => assert_eq!(detail, "request timed out"),
            other => panic!("expected Request error, got {other:?}"),
        }
    }
}
