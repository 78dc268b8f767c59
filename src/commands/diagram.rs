// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Diagram command - renders the dependency graph as Mermaid or DOT

use super::{open, Output};
use crate::config::Config;
use crate::diagram::{DiagramFormat, DiagramOptions};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Serialize)]
struct DiagramPayload<'a> {
    format: DiagramFormat,
    diagram: &'a str,
}

/// Run the diagram command
pub fn run(
    out: &Output,
    config: Config,
    locator: &str,
    format: &str,
    max_nodes: Option<usize>,
    max_edges: Option<usize>,
    output: Option<PathBuf>,
) -> Result<()> {
    let format = DiagramFormat::parse(format)
        .ok_or_else(|| anyhow!("Unknown diagram format: {format} (expected mermaid or dot)"))?;
    let options = DiagramOptions {
        max_nodes: max_nodes.unwrap_or(config.analysis.diagram_max_nodes),
        max_edges: max_edges.unwrap_or(config.analysis.diagram_max_edges),
        format,
    };

    let (analyzer, repo) = open(config, locator)?;
    let diagram = analyzer
        .diagram(&repo, &options)
        .with_context(|| format!("Failed to render the diagram of {locator}"))?;

    match output {
        Some(path) => {
            fs::write(&path, &diagram).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} diagram to {}", format.extension(), path.display());
            Ok(())
        }
        None if out.is_json() => out.print_json(&DiagramPayload {
            format,
            diagram: &diagram,
        }),
        None => {
            print!("{diagram}");
            Ok(())
        }
    }
}
