// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Symbols command - functions and classes of one file

use super::{open, Output};
use crate::config::Config;
use crate::types::SymbolKind;
use anyhow::{Context, Result};

/// Run the symbols command
pub fn run(out: &Output, config: Config, locator: &str, file: &str) -> Result<()> {
    let (analyzer, repo) = open(config, locator)?;
    let view = analyzer
        .symbols(&repo, file)
        .with_context(|| format!("Failed to extract symbols from {file}"))?;

    if out.is_json() {
        return out.print_json(&view);
    }

    if view.symbols.is_empty() {
        println!("No functions or classes found in {file}");
        return Ok(());
    }

    for symbol in &view.symbols {
        let kind = match symbol.kind {
            SymbolKind::Function => "fn",
            SymbolKind::Class => "class",
        };
        println!("{:>5}  {:<5} {}", symbol.start_line, out.muted(kind), out.accent(&symbol.name));
        if let Some(doc) = symbol.docstring.as_deref().and_then(|d| d.lines().next()) {
            println!("{:>5}  {}", "", out.muted(doc));
        }
    }

    Ok(())
}
