// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Per-file change history built from commits and their diff stats

use crate::forge::DiffSource;
use crate::types::{CommitRecord, FileChange, FileChangeEvent, FileEvolution, LifecycleStats};
use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Build the evolution map, fetching diff stats for each commit
///
/// Events are appended in commit order. A failed fetch is logged and
/// contributes nothing. With `concurrency > 1` fetches run on a pool of that
/// size; results are still accumulated in commit order.
pub fn build_evolution(
    source: &dyn DiffSource,
    owner: &str,
    repo: &str,
    commits: &[CommitRecord],
    token: Option<&str>,
    concurrency: usize,
) -> FileEvolution {
    info!("Fetching diff stats for {} commits of {}/{}", commits.len(), owner, repo);

    let fetch = |commit: &CommitRecord| -> Vec<FileChange> {
        match source.commit_file_changes(owner, repo, &commit.id, token) {
            Ok(changes) => {
                debug!("{}: {} files changed", commit.id, changes.len());
                changes
            }
            Err(e) => {
                warn!("Skipping commit {}: {}", commit.id, e);
                Vec::new()
            }
        }
    };

    let fetched: Vec<Vec<FileChange>> = if concurrency > 1 && commits.len() > 1 {
        match rayon::ThreadPoolBuilder::new().num_threads(concurrency).build() {
            Ok(pool) => pool.install(|| commits.par_iter().map(&fetch).collect()),
            Err(e) => {
                warn!("Falling back to sequential fetching: {}", e);
                commits.iter().map(&fetch).collect()
            }
        }
    } else {
        commits.iter().map(&fetch).collect()
    };

    let mut evolution = FileEvolution::new();
    for (commit, changes) in commits.iter().zip(fetched) {
        for change in changes {
            evolution.entry(change.path).or_default().push(FileChangeEvent {
                commit_id: commit.id.clone(),
                timestamp: commit.timestamp,
                change_type: change.status,
                additions: change.additions,
                deletions: change.deletions,
                author: commit.author.clone(),
                message: commit.message.clone(),
            });
        }
    }
    evolution
}

/// Lifecycle statistics of every file with at least one event
#[must_use]
pub fn lifecycle_stats(evolution: &FileEvolution) -> IndexMap<String, LifecycleStats> {
    evolution
        .iter()
        .filter_map(|(path, events)| {
            let first = events.first()?;
            let last = events.last()?;
            let total_additions: u64 = events.iter().map(|e| e.additions).sum();
            let total_deletions: u64 = events.iter().map(|e| e.deletions).sum();
            let net_changes = i64::try_from(total_additions).unwrap_or(i64::MAX)
                - i64::try_from(total_deletions).unwrap_or(i64::MAX);

            Some((
                path.clone(),
                LifecycleStats {
                    created_at: first.timestamp,
                    last_modified_at: last.timestamp,
                    total_commits: events.len(),
                    total_additions,
                    total_deletions,
                    net_changes,
                    distinct_change_types: events.iter().map(|e| e.change_type).collect(),
                },
            ))
        })
        .collect()
}

/// Events of one file, empty if it was never touched
#[must_use]
pub fn file_history<'a>(evolution: &'a FileEvolution, path: &str) -> &'a [FileChangeEvent] {
    evolution.get(path).map(Vec::as_slice).unwrap_or_default()
}
