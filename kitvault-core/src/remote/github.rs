//! GitHub contents API client.
//!
//! Files are read and written through `/repos/{owner}/{repo}/contents/{path}`
//! on a single branch. GitHub's blob SHA is used as the content hash, and
//! passing it on `PUT` gives the compare-and-swap behaviour of
//! [`RemoteStore::write`].

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::{Permissions, RemoteError, RemoteFile, RemoteStore, WriteReceipt};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_BRANCH: &str = "main";
const RAW_BASE_URL: &str = "https://raw.githubusercontent.com";
const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const CLIENT_USER_AGENT: &str = concat!("kitvault/", env!("CARGO_PKG_VERSION"));

/// Repository coordinates and credential.
///
/// Remote sync is enabled only when token, owner and repo are all set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitHubSettings {
    pub token: Option<String>,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub api_url: Option<String>,
}

impl GitHubSettings {
    pub fn is_configured(&self) -> bool {
        [&self.token, &self.owner, &self.repo]
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }

    pub fn branch(&self) -> &str {
        self.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Non-fatal problems worth reporting at startup.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.is_configured() {
            let missing: Vec<&str> = [
                ("token", &self.token),
                ("owner", &self.owner),
                ("repo", &self.repo),
            ]
            .iter()
            .filter(|(_, v)| v.as_deref().map_or(true, |s| s.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect();
            warnings.push(format!(
                "GitHub configuration incomplete (missing {}); running in local-only mode",
                missing.join(", ")
            ));
        }

        if let Some(token) = &self.token {
            if !token.is_empty() && !token.starts_with("ghp_") && !token.starts_with("github_pat_")
            {
                warnings.push(
                    "GitHub token format looks unusual; expected a 'ghp_' or 'github_pat_' prefix"
                        .to_string(),
                );
            }
        }

        warnings
    }
}

/// Repository metadata shown in status output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryInfo {
    pub name: String,
    pub full_name: String,
    pub default_branch: String,
    pub html_url: String,
}

/// Client for one repository branch.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
    owner: String,
    repo: String,
    branch: String,
}

// Wire types

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct DeleteContentsRequest<'a> {
    message: &'a str,
    sha: &'a str,
    branch: &'a str,
}

#[derive(Debug, Deserialize)]
struct PutContentsResponse {
    content: ShaRef,
    commit: ShaRef,
}

#[derive(Debug, Deserialize)]
struct ShaRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    name: String,
    full_name: String,
    default_branch: String,
    html_url: String,
    #[serde(default)]
    permissions: Option<RepoPermissions>,
}

#[derive(Debug, Deserialize)]
struct RepoPermissions {
    #[serde(default)]
    push: bool,
    #[serde(default)]
    admin: bool,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

impl GitHubClient {
    pub fn new(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
        }
    }

    /// Builds a client from settings, or `None` when sync is not configured.
    pub fn from_settings(settings: &GitHubSettings) -> Option<Self> {
        if !settings.is_configured() {
            return None;
        }
        let client = Self::new(
            settings.token.clone()?,
            settings.owner.clone()?,
            settings.repo.clone()?,
            settings.branch(),
        )
        .with_api_url(settings.api_url());
        Some(client)
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// `owner/repo`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Fetches repository metadata.
    pub async fn repository_info(&self) -> Result<RepositoryInfo, RemoteError> {
        let repo = self.fetch_repo().await?;
        Ok(RepositoryInfo {
            name: repo.name,
            full_name: repo.full_name,
            default_branch: repo.default_branch,
            html_url: repo.html_url,
        })
    }

    fn repo_url(&self) -> String {
        format!("{}/repos/{}/{}", self.api_url, self.owner, self.repo)
    }

    fn contents_url(&self, path: &str) -> String {
        format!("{}/contents/{}", self.repo_url(), path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(ACCEPT, ACCEPT_HEADER)
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(USER_AGENT, CLIENT_USER_AGENT)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        request
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))
    }

    async fn fetch_repo(&self) -> Result<RepoResponse, RemoteError> {
        let url = self.repo_url();
        let response = self.send(self.request(Method::GET, &url)).await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))
    }
}

impl RemoteStore for GitHubClient {
    async fn read(&self, path: &str) -> Result<Option<RemoteFile>, RemoteError> {
        let url = self.contents_url(path);
        tracing::debug!("GET {} (ref {})", url, self.branch);

        let request = self
            .request(Method::GET, &url)
            .query(&[("ref", self.branch.as_str())]);
        let response = self.send(request).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body: ContentsResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;
        decode_contents(body).map(Some)
    }

    async fn write(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        expected_sha: Option<&str>,
    ) -> Result<WriteReceipt, RemoteError> {
        let url = self.contents_url(path);
        tracing::debug!("PUT {} ({} bytes)", url, content.len());

        let body = PutContentsRequest {
            message,
            content: STANDARD.encode(content),
            branch: &self.branch,
            sha: expected_sha,
        };
        let response = self
            .send(self.request(Method::PUT, &url).json(&body))
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body: PutContentsResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;
        Ok(WriteReceipt {
            sha: body.content.sha,
            commit_sha: Some(body.commit.sha),
        })
    }

    async fn delete(&self, path: &str, sha: &str, message: &str) -> Result<(), RemoteError> {
        let url = self.contents_url(path);
        tracing::debug!("DELETE {}", url);

        let body = DeleteContentsRequest {
            message,
            sha,
            branch: &self.branch,
        };
        let response = self
            .send(self.request(Method::DELETE, &url).json(&body))
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }

    async fn permissions(&self) -> Result<Permissions, RemoteError> {
        let repo = self.fetch_repo().await?;
        Ok(permissions_of(&repo))
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            RAW_BASE_URL,
            self.owner,
            self.repo,
            self.branch,
            path.trim_start_matches('/')
        )
    }
}

fn permissions_of(repo: &RepoResponse) -> Permissions {
    Permissions {
        can_write: repo
            .permissions
            .as_ref()
            .is_some_and(|p| p.push || p.admin),
    }
}

/// Decodes the base64 payload of a contents response. GitHub wraps the
/// encoded text at 60 columns, so whitespace is stripped first.
fn decode_contents(body: ContentsResponse) -> Result<RemoteFile, RemoteError> {
    match body.encoding.as_deref() {
        None | Some("base64") => {}
        Some(other) => {
            return Err(RemoteError::InvalidResponse(format!(
                "unsupported content encoding '{}'",
                other
            )))
        }
    }

    let compact: String = body
        .content
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let content = STANDARD
        .decode(compact)
        .map_err(|e| RemoteError::InvalidResponse(format!("invalid base64 content: {}", e)))?;

    Ok(RemoteFile {
        content,
        sha: body.sha,
    })
}

async fn error_from_response(response: Response) -> RemoteError {
    let status = response.status();
    let message = response
        .json::<ApiErrorBody>()
        .await
        .ok()
        .and_then(|b| b.message);
    classify_error(status.as_u16(), message)
}

fn classify_error(status: u16, message: Option<String>) -> RemoteError {
    let message = message.unwrap_or_else(|| match status {
        401 => "Bad credentials".to_string(),
        403 => "Forbidden".to_string(),
        404 => "Not Found".to_string(),
        _ => format!("GitHub request failed with status {}", status),
    });
    match status {
        409 => RemoteError::Conflict(message),
        _ => RemoteError::Api { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GitHubClient {
        GitHubClient::new("ghp_test", "octo", "kits", "main")
    }

    fn settings() -> GitHubSettings {
        GitHubSettings {
            token: Some("ghp_abc".to_string()),
            owner: Some("octo".to_string()),
            repo: Some("kits".to_string()),
            branch: None,
            api_url: None,
        }
    }

    #[test]
    fn test_contents_url() {
        assert_eq!(
            client().contents_url("data/data.json"),
            "https://api.github.com/repos/octo/kits/contents/data/data.json"
        );
        assert_eq!(
            client().contents_url("/assets/images/a.png"),
            "https://api.github.com/repos/octo/kits/contents/assets/images/a.png"
        );
    }

    #[test]
    fn test_custom_api_url_trailing_slash() {
        let client = client().with_api_url("https://ghe.example.com/api/v3/");
        assert_eq!(client.repo_url(), "https://ghe.example.com/api/v3/repos/octo/kits");
    }

    #[test]
    fn test_public_url_points_at_raw_branch() {
        assert_eq!(
            client().public_url("assets/images/logo.png"),
            "https://raw.githubusercontent.com/octo/kits/main/assets/images/logo.png"
        );
    }

    #[test]
    fn test_settings_configured_requires_token_owner_repo() {
        assert!(settings().is_configured());
        assert_eq!(settings().branch(), "main");

        let mut missing_repo = settings();
        missing_repo.repo = None;
        assert!(!missing_repo.is_configured());
        assert!(GitHubClient::from_settings(&missing_repo).is_none());

        let mut blank_token = settings();
        blank_token.token = Some("  ".to_string());
        assert!(!blank_token.is_configured());
    }

    #[test]
    fn test_from_settings_uses_branch_and_api_url() {
        let mut s = settings();
        s.branch = Some("gh-pages".to_string());
        s.api_url = Some("http://localhost:9000".to_string());

        let client = GitHubClient::from_settings(&s).unwrap();
        assert_eq!(client.branch(), "gh-pages");
        assert_eq!(client.full_name(), "octo/kits");
        assert_eq!(client.repo_url(), "http://localhost:9000/repos/octo/kits");
    }

    #[test]
    fn test_settings_warnings() {
        assert!(settings().warnings().is_empty());

        let empty = GitHubSettings::default();
        let warnings = empty.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("token, owner, repo"));

        let mut odd_token = settings();
        odd_token.token = Some("abc123".to_string());
        assert!(odd_token.warnings()[0].contains("token format"));
    }

    #[test]
    fn test_decode_contents_strips_line_wrapping() {
        let encoded = STANDARD.encode(br#"{"leagues": []}"#);
        let (head, tail) = encoded.split_at(8);
        let body = ContentsResponse {
            sha: "abc".to_string(),
            content: format!("{}\n{}\n", head, tail),
            encoding: Some("base64".to_string()),
        };

        let file = decode_contents(body).unwrap();
        assert_eq!(file.content, br#"{"leagues": []}"#);
        assert_eq!(file.sha, "abc");
    }

    #[test]
    fn test_decode_contents_rejects_unknown_encoding() {
        let body = ContentsResponse {
            sha: "abc".to_string(),
            content: String::new(),
            encoding: Some("none".to_string()),
        };
        assert!(matches!(
            decode_contents(body),
            Err(RemoteError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_contents_response_parses_github_payload() {
        let json = r#"{
            "type": "file",
            "encoding": "base64",
            "size": 2,
            "name": "data.json",
            "path": "data/data.json",
            "content": "e30=\n",
            "sha": "3d21ec53a331a6f037a91c368710b99387d012c1"
        }"#;
        let body: ContentsResponse = serde_json::from_str(json).unwrap();
        let file = decode_contents(body).unwrap();
        assert_eq!(file.content, b"{}");
    }

    #[test]
    fn test_put_request_body_includes_sha_only_when_given() {
        let with_sha = PutContentsRequest {
            message: "Update",
            content: STANDARD.encode(b"{}"),
            branch: "main",
            sha: Some("abc"),
        };
        let json = serde_json::to_value(&with_sha).unwrap();
        assert_eq!(json["sha"], "abc");
        assert_eq!(json["content"], "e30=");

        let without_sha = PutContentsRequest { sha: None, ..with_sha };
        let json = serde_json::to_value(&without_sha).unwrap();
        assert!(json.get("sha").is_none());
    }

    #[test]
    fn test_put_response_parses_content_and_commit_sha() {
        let json = r#"{"content": {"sha": "new-blob", "path": "data/data.json"},
                       "commit": {"sha": "commit-1", "message": "Update"}}"#;
        let body: PutContentsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.content.sha, "new-blob");
        assert_eq!(body.commit.sha, "commit-1");
    }

    #[test]
    fn test_permissions_from_repo_payload() {
        let json = r#"{"name": "kits", "full_name": "octo/kits", "default_branch": "main",
                       "html_url": "https://github.com/octo/kits",
                       "permissions": {"admin": false, "push": true, "pull": true}}"#;
        let repo: RepoResponse = serde_json::from_str(json).unwrap();
        assert!(permissions_of(&repo).can_write);

        let json = r#"{"name": "kits", "full_name": "octo/kits", "default_branch": "main",
                       "html_url": "https://github.com/octo/kits"}"#;
        let repo: RepoResponse = serde_json::from_str(json).unwrap();
        assert!(!permissions_of(&repo).can_write);
    }

    #[test]
    fn test_classify_error() {
        assert_eq!(
            classify_error(409, Some("data/data.json does not match abc".to_string())),
            RemoteError::Conflict("data/data.json does not match abc".to_string())
        );
        assert_eq!(
            classify_error(401, None),
            RemoteError::Api {
                status: 401,
                message: "Bad credentials".to_string()
            }
        );
        assert_eq!(
            classify_error(500, None).to_string(),
            "GitHub request failed with status 500 (status 500)"
        );
    }
}
