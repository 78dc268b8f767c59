// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Summary command - what the project is and what it is built with

use super::{open, Output};
use crate::config::Config;
use anyhow::{Context, Result};

/// Run the summary command
pub fn run(out: &Output, config: Config, locator: &str) -> Result<()> {
    let (analyzer, repo) = open(config, locator)?;
    let view = analyzer
        .project(&repo)
        .with_context(|| format!("Failed to summarize {locator}"))?;

    if out.is_json() {
        return out.print_json(&view);
    }

    let details = &view.details;
    println!("{}", view.summary);
    println!();
    println!("  {:<14} {}", out.heading("Type"), details.inferred_type);
    if !details.tech_stack.is_empty() {
        println!("  {:<14} {}", out.heading("Stack"), details.tech_stack.join(", "));
    }
    if !details.key_features.is_empty() {
        println!("  {:<14} {}", out.heading("Features"), details.key_features.join(", "));
    }

    let folders = &details.folder_structure;
    println!();
    for (label, files) in [
        ("frontend", &folders.frontend),
        ("backend", &folders.backend),
        ("config", &folders.config),
        ("docs", &folders.docs),
        ("tests", &folders.tests),
        ("other", &folders.other),
    ] {
        println!("  {:<10} {}", out.accent(label), files.len());
    }

    Ok(())
}
