// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Deps command - static import graph of the repository

use super::{open, Output};
use crate::config::Config;
use anyhow::{Context, Result};

/// Run the deps command
pub fn run(out: &Output, config: Config, locator: &str) -> Result<()> {
    let (analyzer, repo) = open(config, locator)?;
    let view = analyzer
        .dependencies(&repo)
        .with_context(|| format!("Failed to build the dependency graph of {locator}"))?;

    if out.is_json() {
        return out.print_json(&view);
    }

    println!(
        "{} files, {} imports ({} internal, {} external), {} exports",
        view.total_files, view.total_imports, view.internal_imports, view.external_imports, view.total_exports
    );

    if view.edges.is_empty() {
        println!("No internal dependencies resolved");
        return Ok(());
    }

    println!();
    println!("{}", out.heading("Dependencies"));
    for edge in &view.edges {
        println!("  {} {} {}", out.accent(&edge.from), out.muted("->"), edge.to);
    }

    Ok(())
}
