// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Git collaborator: local clones and commit logs via the `git` executable

use crate::error::{LoreError, Result};
use crate::types::CommitRecord;
use chrono::DateTime;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

const RECORD_SEPARATOR: char = '\u{1e}';
const FIELD_SEPARATOR: char = '\u{1f}';
const LOG_FORMAT: &str = "--pretty=format:%x1e%H%x1f%an%x1f%aI%x1f%B%x1f";

/// Source of a repository's commits
pub trait CommitLog {
    /// Every commit reachable from HEAD, oldest first
    fn commit_log(&self, repo: &Path) -> Result<Vec<CommitRecord>>;
}

/// `git` command-line adapter
#[derive(Debug, Clone)]
pub struct GitCli {
    cache_dir: PathBuf,
}

impl GitCli {
    /// Create an adapter that clones into `cache_dir`
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Local working copy for a locator, cloning on first use
    ///
    /// An existing local directory is used as is. Remote locators map to
    /// `<cache_dir>/<name>-<hash>`, so the same locator always yields the
    /// same path and later calls reuse the clone.
    pub fn ensure_local_copy(&self, locator: &str) -> Result<PathBuf> {
        let local = Path::new(locator);
        if local.is_dir() {
            debug!("Using local directory {}", local.display());
            return Ok(local.to_path_buf());
        }

        let target = self.clone_path(locator);
        if target.join(".git").exists() {
            debug!("Reusing clone at {}", target.display());
            return Ok(target);
        }

        fs::create_dir_all(&self.cache_dir)?;
        info!("Cloning {} into {}", locator, target.display());
        let target_arg = target.to_string_lossy().into_owned();
        run_git(&self.cache_dir, &["clone", "--quiet", locator, &target_arg])?;
        Ok(target)
    }

    /// Deterministic clone location for a locator
    #[must_use]
    pub fn clone_path(&self, locator: &str) -> PathBuf {
        let digest = hex::encode(Sha256::digest(locator.as_bytes()));
        self.cache_dir.join(format!("{}-{}", repo_name(locator), &digest[..12]))
    }

    /// URL of the `origin` remote, if any
    pub fn remote_url(&self, repo: &Path) -> Option<String> {
        run_git(repo, &["config", "--get", "remote.origin.url"])
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
    }
}

impl CommitLog for GitCli {
    fn commit_log(&self, repo: &Path) -> Result<Vec<CommitRecord>> {
        if !repo.is_dir() {
            return Err(LoreError::FileNotFound(repo.to_path_buf()));
        }
        let output = run_git(
            repo,
            &["-c", "core.quotepath=off", "log", "--reverse", "--name-only", LOG_FORMAT],
        )?;
        let commits = parse_log(&output)?;
        debug!("{} commits in {}", commits.len(), repo.display());
        Ok(commits)
    }
}

/// Last path segment of a locator without `.git`, reduced to safe characters
fn repo_name(locator: &str) -> String {
    let last = locator
        .trim_end_matches('/')
        .rsplit(|c: char| c == '/' || c == ':')
        .next()
        .unwrap_or_default();
    let last = last.strip_suffix(".git").unwrap_or(last);
    let name: String = last
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect();
    if name.is_empty() || name.chars().all(|c| c == '.') {
        "repo".to_string()
    } else {
        name
    }
}

fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git").args(args).current_dir(dir).output()?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        Err(LoreError::Git(String::from_utf8_lossy(&output.stderr).trim().to_string()))
    }
}

fn parse_log(output: &str) -> Result<Vec<CommitRecord>> {
    output
        .split(RECORD_SEPARATOR)
        .filter(|record| !record.trim().is_empty())
        .map(parse_record)
        .collect()
}

fn parse_record(record: &str) -> Result<CommitRecord> {
    let mut fields = record.splitn(5, FIELD_SEPARATOR);
    let mut next = |name: &str| {
        fields
            .next()
            .ok_or_else(|| LoreError::Git(format!("malformed log record, missing {name}")))
    };

    let id = next("hash")?.trim().to_string();
    let author = next("author")?.to_string();
    let date = next("date")?.trim();
    let message = next("message")?.trim().to_string();
    let files = next("paths")?;

    let timestamp = DateTime::parse_from_rfc3339(date)
        .map_err(|e| LoreError::Git(format!("bad author date {date:?} for {id}: {e}")))?;

    Ok(CommitRecord {
        id,
        message,
        author,
        timestamp,
        touched_paths: files
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
    })
}
