//! Thin GitHub REST client covering the endpoints the bot needs.

use std::time::Duration;

use eip_bot_core::{HostError, PrFile};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::types::{CommentResponse, PullResponse, ReviewResponse};

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("eip-bot/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const PER_PAGE: usize = 100;
/// GitHub stops listing pull request files after 3000 entries.
const MAX_PAGES: u32 = 30;

pub struct GitHubClient {
    http: Client,
    api_url: String,
    repository: String,
    token: Option<SecretString>,
}

impl GitHubClient {
    /// `repository` is `owner/name`.
    pub fn new(
        api_url: &str,
        repository: &str,
        token: Option<SecretString>,
    ) -> Result<Self, HostError> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HostError::NetworkError(e.to_string()))?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_owned(),
            repository: repository.to_owned(),
            token,
        })
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}", self.api_url, self.repository, path)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.request_accepting(method, url, "application/vnd.github+json")
    }

    fn request_accepting(&self, method: Method, url: &str, accept: &str) -> RequestBuilder {
        let mut req = self
            .http
            .request(method, url)
            .header("accept", accept)
            .header("x-github-api-version", API_VERSION);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token.expose_secret());
        }
        req
    }

    async fn send(req: RequestBuilder) -> Result<Response, HostError> {
        let resp = req
            .send()
            .await
            .map_err(|e| HostError::NetworkError(e.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(HostError::from_status(status, body));
        }
        Ok(resp)
    }

    async fn json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, HostError> {
        Self::send(req)
            .await?
            .json()
            .await
            .map_err(|e| HostError::Decode(e.to_string()))
    }

    async fn get_all<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, HostError> {
        let mut items = Vec::new();
        for page in 1..=MAX_PAGES {
            let req = self
                .request(Method::GET, url)
                .query(&[("per_page", PER_PAGE.to_string()), ("page", page.to_string())]);
            let batch: Vec<T> = Self::json(req).await?;
            let done = batch.len() < PER_PAGE;
            items.extend(batch);
            if done {
                break;
            }
        }
        Ok(items)
    }

    #[instrument(skip(self))]
    pub async fn pull_request(&self, number: u64) -> Result<PullResponse, HostError> {
        Self::json(self.request(Method::GET, &self.repo_url(&format!("pulls/{number}")))).await
    }

    #[instrument(skip(self))]
    pub async fn pull_files(&self, number: u64) -> Result<Vec<PrFile>, HostError> {
        self.get_all(&self.repo_url(&format!("pulls/{number}/files")))
            .await
    }

    /// Raw file contents at `git_ref`, `None` if the file does not exist there.
    #[instrument(skip(self))]
    pub async fn file_content(&self, path: &str, git_ref: &str) -> Result<Option<String>, HostError> {
        let req = self
            .request_accepting(
                Method::GET,
                &self.repo_url(&format!("contents/{path}")),
                "application/vnd.github.raw",
            )
            .query(&[("ref", git_ref)]);
        let resp = req
            .send()
            .await
            .map_err(|e| HostError::NetworkError(e.to_string()))?;
        if resp.status() == StatusCode::NOT_FOUND {
            debug!(path, git_ref, "file not present at ref");
            return Ok(None);
        }
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(HostError::from_status(status, body));
        }
        resp.text()
            .await
            .map(Some)
            .map_err(|e| HostError::Decode(e.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn reviews(&self, number: u64) -> Result<Vec<ReviewResponse>, HostError> {
        self.get_all(&self.repo_url(&format!("pulls/{number}/reviews")))
            .await
    }

    #[instrument(skip(self))]
    pub async fn issue_comments(&self, number: u64) -> Result<Vec<CommentResponse>, HostError> {
        self.get_all(&self.repo_url(&format!("issues/{number}/comments")))
            .await
    }

    #[instrument(skip(self, body))]
    pub async fn create_comment(&self, number: u64, body: &str) -> Result<(), HostError> {
        let req = self
            .request(Method::POST, &self.repo_url(&format!("issues/{number}/comments")))
            .json(&serde_json::json!({ "body": body }));
        Self::send(req).await.map(|_| ())
    }

    #[instrument(skip(self, body))]
    pub async fn update_comment(&self, comment_id: u64, body: &str) -> Result<(), HostError> {
        let req = self
            .request(
                Method::PATCH,
                &self.repo_url(&format!("issues/comments/{comment_id}")),
            )
            .json(&serde_json::json!({ "body": body }));
        Self::send(req).await.map(|_| ())
    }

    /// `logins` without the leading `@`.
    #[instrument(skip(self))]
    pub async fn request_reviewers(&self, number: u64, logins: &[String]) -> Result<(), HostError> {
        let req = self
            .request(
                Method::POST,
                &self.repo_url(&format!("pulls/{number}/requested_reviewers")),
            )
            .json(&serde_json::json!({ "reviewers": logins }));
        Self::send(req).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use eip_bot_core::FileStatus;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GitHubClient {
        GitHubClient::new(
            &server.uri(),
            "ethereum/EIPs",
            Some(SecretString::from("ghp_test")),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn fetches_pull_request_with_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/ethereum/EIPs/pulls/7"))
            .and(header("authorization", "Bearer ghp_test"))
            .and(header("x-github-api-version", API_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "number": 7,
                "merged": false,
                "changed_files": 1,
                "user": { "login": "carol" },
                "base": { "sha": "b1" },
                "head": { "sha": "h1" }
            })))
            .mount(&server)
            .await;

        let pull = client(&server).pull_request(7).await.unwrap();
        assert_eq!(pull.number, 7);
        assert_eq!(pull.user.login, "carol");
    }

    #[tokio::test]
    async fn lists_files_across_pages() {
        let server = MockServer::start().await;
        let first: Vec<_> = (0..PER_PAGE)
            .map(|i| {
                serde_json::json!({ "filename": format!("EIPS/eip-{i}.md"), "status": "modified" })
            })
            .collect();
        Mock::given(method("GET"))
            .and(path("/repos/ethereum/EIPs/pulls/7/files"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(first))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/ethereum/EIPs/pulls/7/files"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "filename": "EIPS/eip-999.md", "status": "added", "patch": "@@ -0,0 +1 @@\n+---" }
            ])))
            .mount(&server)
            .await;

        let files = client(&server).pull_files(7).await.unwrap();
        assert_eq!(files.len(), PER_PAGE + 1);
        assert_eq!(files[PER_PAGE].status, FileStatus::Added);
    }

    #[tokio::test]
    async fn missing_content_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/ethereum/EIPs/contents/EIPS/eip-5.md"))
            .and(query_param("ref", "b1"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/ethereum/EIPs/contents/EIPS/eip-5.md"))
            .and(query_param("ref", "h1"))
            .and(header("accept", "application/vnd.github.raw"))
            .respond_with(ResponseTemplate::new(200).set_body_string("---\neip: 5\n---\n"))
            .mount(&server)
            .await;

        let client = client(&server);
        assert!(client.file_content("EIPS/eip-5.md", "b1").await.unwrap().is_none());
        assert_eq!(
            client.file_content("EIPS/eip-5.md", "h1").await.unwrap().as_deref(),
            Some("---\neip: 5\n---\n")
        );
    }

    #[tokio::test]
    async fn error_statuses_are_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/ethereum/EIPs/pulls/7"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/ethereum/EIPs/pulls/8"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let client = client(&server);
        assert_matches!(
            client.pull_request(7).await,
            Err(HostError::AuthenticationFailed(body)) if body == "Bad credentials"
        );
        assert_matches!(
            client.pull_request(8).await,
            Err(HostError::ServerError { status: 503, .. })
        );
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/ethereum/EIPs/pulls/7"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;
        assert_matches!(client(&server).pull_request(7).await, Err(HostError::Decode(_)));
    }

    #[tokio::test]
    async fn posts_comment_and_reviewers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/ethereum/EIPs/issues/7/comments"))
            .and(body_json(serde_json::json!({ "body": "hello" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": 1 })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/repos/ethereum/EIPs/issues/comments/99"))
            .and(body_json(serde_json::json!({ "body": "edited" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": 99 })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repos/ethereum/EIPs/pulls/7/requested_reviewers"))
            .and(body_json(serde_json::json!({ "reviewers": ["ed1", "alice"] })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        client.create_comment(7, "hello").await.unwrap();
        client.update_comment(99, "edited").await.unwrap();
        client
            .request_reviewers(7, &["ed1".to_owned(), "alice".to_owned()])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn network_failure_is_reported() {
        let client = GitHubClient::new("http://127.0.0.1:1", "ethereum/EIPs", None).unwrap();
        assert_matches!(client.pull_request(7).await, Err(HostError::NetworkError(_)));
    }
}
