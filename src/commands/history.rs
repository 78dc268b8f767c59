// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! History command - timeline of one file

use super::{open, short_id, subject, Output};
use crate::config::Config;
use anyhow::{Context, Result};

/// Run the history command
pub fn run(out: &Output, config: Config, locator: &str, file: &str, token: Option<&str>) -> Result<()> {
    let (analyzer, repo) = open(config, locator)?;
    let view = analyzer
        .history(&repo, file, token)
        .with_context(|| format!("Failed to read the history of {file}"))?;

    if out.is_json() {
        return out.print_json(&view);
    }

    if view.history.is_empty() {
        println!("No changes to {file} in the inspected commits");
        return Ok(());
    }

    println!("{}", out.heading(&format!("{} ({} changes)", view.filename, view.total_changes)));
    for event in &view.history {
        let kind = format!("{:?}", event.change_type).to_lowercase();
        println!(
            "  {} {} {:<9} +{:<5} -{:<5} {} {}",
            out.muted(short_id(&event.commit_id)),
            event.timestamp.format("%Y-%m-%d"),
            kind,
            event.additions,
            event.deletions,
            subject(&event.message),
            out.muted(&format!("({})", event.author))
        );
    }

    Ok(())
}
