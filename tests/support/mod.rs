#![allow(dead_code)] // each test binary uses a different slice of the mock

//! In-memory [`RepoClient`] used by the integration suites.
//!
//! Read-side state (trees, file contents) is fixed at construction; the
//! write side (branches, published files, write counter) lives behind
//! mutexes so publish flows can be exercised end to end.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use catalog_harvester::{
    ApiError, DirEntry, RemoteFile, RepoClient, RepoInfo, RepoRef, TreeEntry,
};

#[derive(Default)]
pub struct MockRepo {
    pub id: u64,
    pub default_branch: String,
    pub tree: Vec<TreeEntry>,
    /// Raw file contents on the default branch, keyed by path.
    pub files: HashMap<String, Vec<u8>>,
    pub fail_info: bool,
    pub fail_tree: bool,
    /// Paths whose raw fetch fails.
    pub fail_raw: Vec<String>,
    /// Directories whose listing fails.
    pub fail_list: Vec<String>,
}

impl MockRepo {
    pub fn blob(&mut self, path: &str, content: &[u8]) {
        self.tree.push(TreeEntry {
            path: path.to_string(),
            is_blob: true,
        });
        self.files.insert(path.to_string(), content.to_vec());
    }
}

#[derive(Clone)]
pub struct StoredFile {
    pub content: Vec<u8>,
    pub token: String,
}

#[derive(Default)]
pub struct MockClient {
    pub repos: HashMap<String, MockRepo>,
    /// (repo, branch) -> tip sha.
    pub branches: Mutex<HashMap<(String, String), String>>,
    /// (repo, branch, path) -> stored file.
    pub branch_files: Mutex<HashMap<(String, String, String), StoredFile>>,
    pub writes: Mutex<usize>,
    /// When set, `file_on_branch` hands out stale tokens so every update
    /// hits the compare-and-swap mismatch path.
    pub stale_reads: bool,
    token_counter: Mutex<u64>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_repo(&mut self, owner: &str, name: &str, id: u64) -> &mut MockRepo {
        let repo = MockRepo {
            id,
            default_branch: "main".to_string(),
            ..MockRepo::default()
        };
        self.repos.entry(format!("{owner}/{name}")).or_insert(repo)
    }

    pub fn set_branch(&self, repo: &RepoRef, branch: &str, sha: &str) {
        self.branches
            .lock()
            .unwrap()
            .insert((repo.to_string(), branch.to_string()), sha.to_string());
    }

    pub fn put_branch_file(&self, repo: &RepoRef, branch: &str, path: &str, content: &[u8]) {
        let token = self.next_token();
        self.branch_files.lock().unwrap().insert(
            (repo.to_string(), branch.to_string(), path.to_string()),
            StoredFile {
                content: content.to_vec(),
                token,
            },
        );
    }

    pub fn branch_file(&self, repo: &RepoRef, branch: &str, path: &str) -> Option<StoredFile> {
        self.branch_files
            .lock()
            .unwrap()
            .get(&(repo.to_string(), branch.to_string(), path.to_string()))
            .cloned()
    }

    pub fn branch_tip_sync(&self, repo: &RepoRef, branch: &str) -> Option<String> {
        self.branches
            .lock()
            .unwrap()
            .get(&(repo.to_string(), branch.to_string()))
            .cloned()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    fn next_token(&self) -> String {
        let mut counter = self.token_counter.lock().unwrap();
        *counter += 1;
        format!("token-{counter}")
    }

    fn repo(&self, repo: &RepoRef) -> Result<&MockRepo, ApiError> {
        self.repos.get(&repo.to_string()).ok_or(ApiError::Status {
            status: 404,
            context: repo.to_string(),
        })
    }
}

fn unavailable(context: &str) -> ApiError {
    ApiError::Status {
        status: 500,
        context: context.to_string(),
    }
}

#[async_trait]
impl RepoClient for MockClient {
    async fn repo_info(&self, repo: &RepoRef) -> Result<RepoInfo, ApiError> {
        let mock = self.repo(repo)?;
        if mock.fail_info {
            return Err(unavailable(&repo.to_string()));
        }
        Ok(RepoInfo {
            id: mock.id,
            default_branch: mock.default_branch.clone(),
        })
    }

    async fn recursive_tree(
        &self,
        repo: &RepoRef,
        _revision: &str,
    ) -> Result<Vec<TreeEntry>, ApiError> {
        let mock = self.repo(repo)?;
        if mock.fail_tree {
            return Err(unavailable(&repo.to_string()));
        }
        Ok(mock.tree.clone())
    }

    async fn raw_file(
        &self,
        repo: &RepoRef,
        _revision: &str,
        path: &str,
    ) -> Result<Vec<u8>, ApiError> {
        let mock = self.repo(repo)?;
        if mock.fail_raw.iter().any(|p| p == path) {
            return Err(unavailable(path));
        }
        mock.files.get(path).cloned().ok_or(ApiError::Status {
            status: 404,
            context: path.to_string(),
        })
    }

    async fn list_dir(
        &self,
        repo: &RepoRef,
        _revision: &str,
        path: &str,
    ) -> Result<Vec<DirEntry>, ApiError> {
        let mock = self.repo(repo)?;
        if mock.fail_list.iter().any(|p| p == path) {
            return Err(unavailable(path));
        }
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };
        Ok(mock
            .tree
            .iter()
            .filter(|entry| {
                entry.path.starts_with(&prefix)
                    && !entry.path[prefix.len()..].contains('/')
                    && !entry.path[prefix.len()..].is_empty()
            })
            .map(|entry| DirEntry {
                name: entry.path[prefix.len()..].to_string(),
                path: entry.path.clone(),
                is_file: entry.is_blob,
            })
            .collect())
    }

    async fn branch_tip(&self, repo: &RepoRef, branch: &str) -> Result<Option<String>, ApiError> {
        Ok(self
            .branches
            .lock()
            .unwrap()
            .get(&(repo.to_string(), branch.to_string()))
            .cloned())
    }

    async fn create_branch(
        &self,
        repo: &RepoRef,
        branch: &str,
        sha: &str,
    ) -> Result<(), ApiError> {
        self.branches
            .lock()
            .unwrap()
            .insert((repo.to_string(), branch.to_string()), sha.to_string());
        Ok(())
    }

    async fn file_on_branch(
        &self,
        repo: &RepoRef,
        branch: &str,
        path: &str,
    ) -> Result<Option<RemoteFile>, ApiError> {
        let stored = self.branch_file(repo, branch, path);
        Ok(stored.map(|file| RemoteFile {
            content: file.content,
            token: if self.stale_reads {
                format!("{}-stale", file.token)
            } else {
                file.token
            },
        }))
    }

    async fn create_file(
        &self,
        repo: &RepoRef,
        branch: &str,
        path: &str,
        content: &[u8],
        _message: &str,
    ) -> Result<(), ApiError> {
        let key = (repo.to_string(), branch.to_string(), path.to_string());
        let mut files = self.branch_files.lock().unwrap();
        if files.contains_key(&key) {
            return Err(ApiError::Status {
                status: 422,
                context: path.to_string(),
            });
        }
        let token = self.next_token();
        files.insert(
            key,
            StoredFile {
                content: content.to_vec(),
                token,
            },
        );
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }

    async fn update_file(
        &self,
        repo: &RepoRef,
        branch: &str,
        path: &str,
        content: &[u8],
        _message: &str,
        token: &str,
    ) -> Result<(), ApiError> {
        let key = (repo.to_string(), branch.to_string(), path.to_string());
        let mut files = self.branch_files.lock().unwrap();
        let Some(existing) = files.get(&key) else {
            return Err(ApiError::Status {
                status: 404,
                context: path.to_string(),
            });
        };
        if existing.token != token {
            return Err(ApiError::Conflict);
        }
        let token = self.next_token();
        files.insert(
            key,
            StoredFile {
                content: content.to_vec(),
                token,
            },
        );
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

/// Minimal well-formed manifest with the given name.
pub fn manifest(name: &str) -> Vec<u8> {
    format!(
        "<ModMetaData><name>{name}</name><packageId>test.{}</packageId>\
         <supportedVersions><li>1.5</li></supportedVersions></ModMetaData>",
        name.to_lowercase()
    )
    .into_bytes()
}
