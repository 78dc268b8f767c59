// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Profile command - the dashboard view of a repository

use super::{open, Output};
use crate::config::Config;
use anyhow::{Context, Result};

/// Run the profile command
pub fn run(out: &Output, config: Config, locator: &str, token: Option<&str>) -> Result<()> {
    let (analyzer, repo) = open(config, locator)?;
    let dashboard = analyzer
        .profile(&repo, token)
        .with_context(|| format!("Failed to profile {locator}"))?;

    if out.is_json() {
        return out.print_json(&dashboard);
    }

    println!("{}", dashboard.summary);
    println!(
        "{}",
        out.muted(&format!(
            "{} files, {} commits, {} imports",
            dashboard.stats.total_files, dashboard.stats.total_commits, dashboard.stats.total_connections
        ))
    );

    for file in &dashboard.files {
        println!();
        println!("{} {}", out.accent(&file.path), out.muted(&format!("({} changes)", file.commit_history.len())));
        println!("  {}", file.role);
        if !file.connections.is_empty() {
            println!("  {} {}", out.muted("imports"), file.connections.join(", "));
        }
    }

    Ok(())
}
