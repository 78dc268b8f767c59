// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Summarize command - prose description of each symbol of one file

use super::{open, Output};
use crate::config::Config;
use crate::llm::ChatSummarizer;
use anyhow::{Context, Result};

/// Run the summarize command
pub fn run(out: &Output, config: Config, locator: &str, file: &str) -> Result<()> {
    let summarizer = ChatSummarizer::new(&config.summarizer, config.remote.timeout_secs)
        .context("Failed to set up the summarizer")?;
    let (analyzer, repo) = open(config, locator)?;
    let view = analyzer
        .summaries(&repo, file, &summarizer)
        .with_context(|| format!("Failed to summarize {file}"))?;

    if out.is_json() {
        return out.print_json(&view);
    }

    for entry in &view.summaries {
        println!("{}", out.heading(&entry.name));
        match (&entry.summary, &entry.error) {
            (Some(text), _) => println!("  {text}"),
            (None, Some(error)) => println!("  {}", out.muted(&format!("no summary: {error}"))),
            (None, None) => {}
        }
    }

    Ok(())
}
