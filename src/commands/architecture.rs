// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Architecture command - layers, key files and the dependency diagram

use super::{open, Output};
use crate::config::Config;
use anyhow::{Context, Result};

/// Run the architecture command
pub fn run(out: &Output, config: Config, locator: &str, token: Option<&str>) -> Result<()> {
    let (analyzer, repo) = open(config, locator)?;
    let view = analyzer
        .architecture(&repo, token)
        .with_context(|| format!("Failed to build the architecture overview of {locator}"))?;

    if out.is_json() {
        return out.print_json(&view);
    }

    let stats = &view.architecture_stats;
    println!("{}", view.project_summary);
    println!(
        "{}",
        out.muted(&format!(
            "{} files ({} frontend, {} backend), {} imports, {} exports",
            stats.total_files, stats.frontend_files, stats.backend_files, stats.total_imports, stats.total_exports
        ))
    );

    println!();
    println!("{}", out.heading("Key files"));
    for (path, profile) in &view.key_files {
        println!("  {:<48} {}", out.accent(path), profile.role_sentence);
    }

    println!();
    println!("{}", out.heading("Diagram"));
    print!("{}", view.mermaid_diagram);

    Ok(())
}
