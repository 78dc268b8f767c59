// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Evolution command - per-file change statistics across the early commits

use super::{open, Output};
use crate::config::Config;
use anyhow::{Context, Result};
use tracing::info;

/// Run the evolution command
pub fn run(out: &Output, config: Config, locator: &str, token: Option<&str>) -> Result<()> {
    info!("Tracing file evolution: {}", locator);
    let (analyzer, repo) = open(config, locator)?;
    let view = analyzer
        .evolution(&repo, token)
        .with_context(|| format!("Failed to trace the evolution of {locator}"))?;

    if out.is_json() {
        return out.print_json(&view);
    }

    println!(
        "{}",
        out.heading(&format!("{}/{}: {} files tracked", view.owner, view.repo_name, view.total_files_tracked))
    );
    for (path, stats) in &view.lifecycle_stats {
        let kinds: Vec<String> = stats
            .distinct_change_types
            .iter()
            .map(|kind| format!("{kind:?}").to_lowercase())
            .collect();
        println!(
            "  {:<48} {:>3} commits  +{:<6} -{:<6} net {:>+6}  {}",
            out.accent(path),
            stats.total_commits,
            stats.total_additions,
            stats.total_deletions,
            stats.net_changes,
            out.muted(&kinds.join(","))
        );
    }

    Ok(())
}
