// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Hosting-forge adapter: locator parsing and per-commit diff stats

use crate::config::RemoteConfig;
use crate::error::{LoreError, Result};
use crate::types::{ChangeType, FileChange};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Source of the files a commit touched, with line counts
pub trait DiffSource: Send + Sync {
    /// Changed files of one commit; `token` overrides any configured credential
    fn commit_file_changes(&self, owner: &str, repo: &str, commit_id: &str, token: Option<&str>) -> Result<Vec<FileChange>>;
}

/// Split a GitHub locator into `(owner, repo)`
///
/// Accepts `https://github.com/<owner>/<repo>` with optional `http`, `www.`,
/// trailing slash, `.git` suffix and extra path segments, and the SSH form
/// `git@github.com:<owner>/<repo>.git`.
pub fn owner_and_repo(locator: &str) -> Result<(String, String)> {
    let invalid = || LoreError::InvalidLocator(locator.to_string());
    let trimmed = locator.trim();

    let rest = match trimmed.strip_prefix("git@github.com:") {
        Some(rest) => rest,
        None => {
            let no_scheme = trimmed
                .strip_prefix("https://")
                .or_else(|| trimmed.strip_prefix("http://"))
                .ok_or_else(invalid)?;
            let host_path = no_scheme.strip_prefix("www.").unwrap_or(no_scheme);
            host_path.strip_prefix("github.com/").ok_or_else(invalid)?
        }
    };

    let mut segments = rest.split('/').filter(|s| !s.is_empty());
    let owner = segments.next().ok_or_else(invalid)?;
    let repo = segments.next().ok_or_else(invalid)?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() {
        return Err(invalid());
    }
    Ok((owner.to_string(), repo.to_string()))
}

#[derive(Deserialize)]
struct CommitResponse {
    #[serde(default)]
    files: Vec<CommitFile>,
}

#[derive(Deserialize)]
struct CommitFile {
    filename: String,
    status: ChangeType,
    #[serde(default)]
    additions: u64,
    #[serde(default)]
    deletions: u64,
}

impl From<CommitFile> for FileChange {
    fn from(file: CommitFile) -> Self {
        Self {
            path: file.filename,
            status: file.status,
            additions: file.additions,
            deletions: file.deletions,
        }
    }
}

/// GitHub REST client for commit details
pub struct GitHubClient {
    client: Client,
    api_base: String,
    user_agent: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Build a client from the remote settings
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LoreError::RemoteUnavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            token: config.token.clone(),
        })
    }
}

impl DiffSource for GitHubClient {
    fn commit_file_changes(&self, owner: &str, repo: &str, commit_id: &str, token: Option<&str>) -> Result<Vec<FileChange>> {
        let url = format!("{}/repos/{owner}/{repo}/commits/{commit_id}", self.api_base);
        debug!("GET {}", url);

        let mut request = self
            .client
            .get(&url)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, &self.user_agent);
        if let Some(token) = token.or(self.token.as_deref()) {
            request = request.header(AUTHORIZATION, format!("token {token}"));
        }

        let response = request
            .send()
            .map_err(|e| LoreError::RemoteUnavailable(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoreError::RemoteUnavailable(format!("{url} returned {}", status.as_u16())));
        }

        let body: CommitResponse = response
            .json()
            .map_err(|e| LoreError::RemoteUnavailable(format!("failed to decode {url}: {e}")))?;

        Ok(body.files.into_iter().map(FileChange::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(locator: &str) -> (String, String) {
        owner_and_repo(locator).unwrap()
    }

    #[test]
    fn test_https_locators() {
        let expected = ("octo".to_string(), "lore".to_string());
        assert_eq!(parsed("https://github.com/octo/lore"), expected);
        assert_eq!(parsed("https://github.com/octo/lore/"), expected);
        assert_eq!(parsed("https://github.com/octo/lore.git"), expected);
        assert_eq!(parsed("http://www.github.com/octo/lore"), expected);
        assert_eq!(parsed("https://github.com/octo/lore/tree/main/src"), expected);
    }

    #[test]
    fn test_ssh_locator() {
        assert_eq!(parsed("git@github.com:octo/lore.git"), ("octo".into(), "lore".into()));
    }

    #[test]
    fn test_invalid_locators() {
        for bad in ["", "github.com/octo/lore", "https://gitlab.com/octo/lore", "https://github.com/octo", "https://github.com//"] {
            assert!(
                matches!(owner_and_repo(bad), Err(LoreError::InvalidLocator(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_commit_file_decoding() {
        let body = r#"{"sha":"c1","files":[
            {"filename":"x.py","status":"added","additions":10,"deletions":0,"patch":"@@"},
            {"filename":"y.py","status":"something-new"}
        ]}"#;
        let response: CommitResponse = serde_json::from_str(body).unwrap();
        let changes: Vec<FileChange> = response.files.into_iter().map(FileChange::from).collect();
        assert_eq!(changes[0].path, "x.py");
        assert_eq!(changes[0].status, ChangeType::Added);
        assert_eq!(changes[0].additions, 10);
        assert_eq!(changes[1].status, ChangeType::Other);
        assert_eq!(changes[1].deletions, 0);
    }

    #[test]
    fn test_unreachable_api_is_remote_unavailable() {
        let config = RemoteConfig {
            api_base: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..RemoteConfig::default()
        };
        let client = GitHubClient::new(&config).unwrap();
        let err = client.commit_file_changes("o", "r", "abc", None).unwrap_err();
        assert!(matches!(err, LoreError::RemoteUnavailable(_)));
    }
}
