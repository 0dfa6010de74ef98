use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{ChangebotError, Result};
use crate::host::{
    CommitInfo, CreatedRelease, FileCommit, FileUpdate, NewRelease, ReleaseInfo, RepositoryHost,
};

const API_VERSION: &str = "2022-11-28";

/// GitHub REST v3 client scoped to one repository
pub struct GitHubClient {
    http: Client,
    api_url: String,
    owner: String,
    repo: String,
}

#[derive(Deserialize)]
struct GitCommitResponse {
    sha: String,
    message: String,
    committer: GitActor,
}

#[derive(Deserialize)]
struct GitActor {
    name: String,
}

#[derive(Serialize)]
struct PutContentsBody<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Deserialize)]
struct PutContentsResponse {
    content: Option<ShaRef>,
    commit: ShaRef,
}

#[derive(Deserialize)]
struct ShaRef {
    sha: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GitHubClient {
    /// Creates a client for the repository named in `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.access_token))
            .map_err(|_| ChangebotError::config("access token contains invalid characters"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let http = Client::builder()
            .user_agent(concat!("changebot/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(GitHubClient {
            http,
            api_url: config.settings.api_url.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
        })
    }

    fn repo_url(&self, tail: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url,
            self.owner,
            self.repo,
            tail.trim_start_matches('/')
        )
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ChangebotError::api(status.as_u16(), api_message(&body)));
        }
        Ok(response.json::<T>()?)
    }
}

/// Pulls GitHub's `message` field out of an error body, falling back to the raw text.
fn api_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

impl RepositoryHost for GitHubClient {
    fn get_commit(&self, sha: &str) -> Result<CommitInfo> {
        let url = self.repo_url(&format!("git/commits/{}", sha));
        debug!(%url, "fetching commit");
        let commit: GitCommitResponse = self.send(self.http.get(&url))?;

        Ok(CommitInfo {
            sha: commit.sha,
            author: commit.committer.name,
            message: commit.message,
        })
    }

    fn list_releases(&self) -> Result<Vec<ReleaseInfo>> {
        let url = self.repo_url("releases");
        debug!(%url, "listing releases");
        self.send(self.http.get(&url))
    }

    fn put_file(&self, update: &FileUpdate) -> Result<FileCommit> {
        let url = self.repo_url(&format!("contents/{}", update.path));
        debug!(%url, update = update.sha.is_some(), "writing file");
        let body = PutContentsBody {
            message: &update.message,
            content: STANDARD.encode(update.content.as_bytes()),
            branch: &update.branch,
            sha: update.sha.as_deref(),
        };
        let response: PutContentsResponse = self.send(self.http.put(&url).json(&body))?;

        Ok(FileCommit {
            commit_sha: response.commit.sha,
            content_sha: response.content.map(|c| c.sha),
        })
    }

    fn create_release(&self, release: &NewRelease) -> Result<CreatedRelease> {
        let url = self.repo_url("releases");
        debug!(%url, tag = %release.tag_name, "creating release");
        self.send(self.http.post(&url).json(release))
    }
}
