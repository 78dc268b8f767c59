// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Roles command - purpose of every file touched by the early commits

use super::{open, Output};
use crate::config::Config;
use anyhow::{Context, Result};

/// Run the roles command
pub fn run(out: &Output, config: Config, locator: &str, token: Option<&str>) -> Result<()> {
    let (analyzer, repo) = open(config, locator)?;
    let view = analyzer
        .file_roles(&repo, token)
        .with_context(|| format!("Failed to classify the files of {locator}"))?;

    if out.is_json() {
        return out.print_json(&view);
    }

    if view.file_roles.is_empty() {
        println!("No tracked files found in the inspected commits");
        return Ok(());
    }

    println!("{}", out.heading(&format!("File roles ({})", view.total_files_analyzed)));
    for (path, profile) in &view.file_roles {
        println!("  {}", out.accent(path));
        println!(
            "    {} {}",
            profile.role_sentence,
            out.muted(&format!("[{}, {:?} complexity]", profile.category, profile.complexity).to_lowercase())
        );
        if !profile.key_symbols.is_empty() {
            println!("    {}", out.muted(&format!("defines {}", profile.key_symbols.join(", "))));
        }
    }

    Ok(())
}
