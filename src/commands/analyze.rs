// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Analyze command - recent commits, module counts and a file preview

use super::{open, short_id, subject, Output};
use crate::config::Config;
use anyhow::{Context, Result};
use tracing::info;

/// Run the analyze command
pub fn run(out: &Output, config: Config, locator: &str) -> Result<()> {
    info!("Analyzing: {}", locator);
    let (analyzer, repo) = open(config, locator)?;
    let overview = analyzer
        .overview(&repo)
        .with_context(|| format!("Failed to analyze {locator}"))?;

    if out.is_json() {
        return out.print_json(&overview);
    }

    println!("{}", out.heading(&format!("Commits ({})", overview.commits.len())));
    for commit in &overview.commits {
        println!(
            "  {} {} {}",
            out.muted(short_id(&commit.id)),
            commit.timestamp.format("%Y-%m-%d"),
            subject(&commit.message)
        );
    }

    println!();
    println!("{}", out.heading("Modules"));
    for module in &overview.modules {
        println!("  {:<24} {} files", out.accent(&module.module), module.file_count);
    }

    println!();
    println!("{}", out.heading("Files"));
    for entry in &overview.files {
        println!("  {}", entry.path);
    }

    Ok(())
}
