//! GitHub REST implementation of [`RepoClient`].
//!
//! Tree listings, directory listings, and all writes go through the
//! authenticated v3 API. Raw manifest bytes are fetched from the raw host
//! instead, which keeps bulk content retrieval off the API quota.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::config::HarvestConfig;
use crate::model::RepoRef;
use crate::traits::{ApiError, DirEntry, RemoteFile, RepoClient, RepoInfo, TreeEntry};

const API_BASE: &str = "https://api.github.com";
const RAW_BASE: &str = "https://raw.githubusercontent.com";
const USER_AGENT: &str = concat!("catalog-harvester/", env!("CARGO_PKG_VERSION"));

pub struct GithubClient {
    http: reqwest::Client,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(config: &HarvestConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            token: config.token.clone(),
        })
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, ApiError> {
        let context = url.clone();
        match self.get_json_opt(url).await? {
            Some(value) => Ok(value),
            None => Err(ApiError::Status {
                status: 404,
                context,
            }),
        }
    }

    /// GET with 404 mapped to `Ok(None)`.
    async fn get_json_opt<T: DeserializeOwned>(&self, url: String) -> Result<Option<T>, ApiError> {
        let response = self.authed(self.http.get(&url)).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                context: url,
            });
        }
        Ok(Some(response.json::<T>().await?))
    }

    async fn put_contents(
        &self,
        repo: &RepoRef,
        path: &str,
        body: serde_json::Value,
        conflict_is_cas_failure: bool,
    ) -> Result<(), ApiError> {
        let url = format!("{API_BASE}/repos/{repo}/contents/{path}");
        let response = self.authed(self.http.put(&url)).json(&body).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if conflict_is_cas_failure
            && (status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY)
        {
            return Err(ApiError::Conflict);
        }
        Err(ApiError::Status {
            status: status.as_u16(),
            context: url,
        })
    }
}

#[derive(Deserialize)]
struct RepoDto {
    id: u64,
    default_branch: String,
}

#[derive(Deserialize)]
struct TreeDto {
    tree: Vec<TreeEntryDto>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct TreeEntryDto {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct ContentEntryDto {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct FileDto {
    sha: String,
    content: Option<String>,
}

#[derive(Deserialize)]
struct RefDto {
    object: RefObjectDto,
}

#[derive(Deserialize)]
struct RefObjectDto {
    sha: String,
}

#[async_trait]
impl RepoClient for GithubClient {
    async fn repo_info(&self, repo: &RepoRef) -> Result<RepoInfo, ApiError> {
        let dto: RepoDto = self.get_json(format!("{API_BASE}/repos/{repo}")).await?;
        Ok(RepoInfo {
            id: dto.id,
            default_branch: dto.default_branch,
        })
    }

    async fn recursive_tree(
        &self,
        repo: &RepoRef,
        revision: &str,
    ) -> Result<Vec<TreeEntry>, ApiError> {
        let dto: TreeDto = self
            .get_json(format!(
                "{API_BASE}/repos/{repo}/git/trees/{revision}?recursive=1"
            ))
            .await?;
        if dto.truncated {
            warn!(%repo, "tree listing truncated by the API, deep entries may be missing");
        }
        Ok(dto
            .tree
            .into_iter()
            .map(|e| TreeEntry {
                path: e.path,
                is_blob: e.kind == "blob",
            })
            .collect())
    }

    async fn raw_file(
        &self,
        repo: &RepoRef,
        revision: &str,
        path: &str,
    ) -> Result<Vec<u8>, ApiError> {
        // Deliberately unauthenticated: raw content does not count against
        // the API quota shared with the tree calls.
        let url = format!("{RAW_BASE}/{repo}/{revision}/{path}");
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                context: url,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn list_dir(
        &self,
        repo: &RepoRef,
        revision: &str,
        path: &str,
    ) -> Result<Vec<DirEntry>, ApiError> {
        let entries: Vec<ContentEntryDto> = self
            .get_json(format!(
                "{API_BASE}/repos/{repo}/contents/{path}?ref={revision}"
            ))
            .await?;
        Ok(entries
            .into_iter()
            .map(|e| DirEntry {
                name: e.name,
                path: e.path,
                is_file: e.kind == "file",
            })
            .collect())
    }

    async fn branch_tip(&self, repo: &RepoRef, branch: &str) -> Result<Option<String>, ApiError> {
        let dto: Option<RefDto> = self
            .get_json_opt(format!("{API_BASE}/repos/{repo}/git/ref/heads/{branch}"))
            .await?;
        Ok(dto.map(|r| r.object.sha))
    }

    async fn create_branch(
        &self,
        repo: &RepoRef,
        branch: &str,
        sha: &str,
    ) -> Result<(), ApiError> {
        let url = format!("{API_BASE}/repos/{repo}/git/refs");
        let body = json!({ "ref": format!("refs/heads/{branch}"), "sha": sha });
        let response = self.authed(self.http.post(&url)).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                context: url,
            });
        }
        Ok(())
    }

    async fn file_on_branch(
        &self,
        repo: &RepoRef,
        branch: &str,
        path: &str,
    ) -> Result<Option<RemoteFile>, ApiError> {
        let dto: Option<FileDto> = self
            .get_json_opt(format!(
                "{API_BASE}/repos/{repo}/contents/{path}?ref={branch}"
            ))
            .await?;
        let Some(dto) = dto else {
            return Ok(None);
        };
        let encoded = dto
            .content
            .ok_or_else(|| ApiError::Decode(format!("no inline content for '{path}'")))?;
        let cleaned: String = encoded.split_whitespace().collect();
        let content = BASE64
            .decode(cleaned)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(Some(RemoteFile {
            content,
            token: dto.sha,
        }))
    }

    async fn create_file(
        &self,
        repo: &RepoRef,
        branch: &str,
        path: &str,
        content: &[u8],
        message: &str,
    ) -> Result<(), ApiError> {
        let body = json!({
            "message": message,
            "content": BASE64.encode(content),
            "branch": branch,
        });
        self.put_contents(repo, path, body, false).await
    }

    async fn update_file(
        &self,
        repo: &RepoRef,
        branch: &str,
        path: &str,
        content: &[u8],
        message: &str,
        token: &str,
    ) -> Result<(), ApiError> {
        let body = json!({
            "message": message,
            "content": BASE64.encode(content),
            "branch": branch,
            "sha": token,
        });
        self.put_contents(repo, path, body, true).await
    }
}
