// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Diagram rendering of the dependency graph

use crate::graph::{resolve_import, DependencyGraph};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Supported diagram formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramFormat {
    /// Mermaid flowchart
    #[default]
    Mermaid,
    /// Graphviz DOT format
    Dot,
}

impl DiagramFormat {
    /// Parse format from string
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mermaid" | "mmd" => Some(Self::Mermaid),
            "dot" | "graphviz" => Some(Self::Dot),
            _ => None,
        }
    }

    /// Get file extension for format
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mermaid => "mmd",
            Self::Dot => "dot",
        }
    }
}

/// Bounds and format of a rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramOptions {
    /// Maximum node declarations
    pub max_nodes: usize,
    /// Maximum edge declarations
    pub max_edges: usize,
    /// Output format
    pub format: DiagramFormat,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            max_nodes: 20,
            max_edges: 30,
            format: DiagramFormat::Mermaid,
        }
    }
}

/// Identifier-safe node id for a path
#[must_use]
pub fn node_id(path: &str) -> String {
    path.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Render the first `max_nodes` files and up to `max_edges` edges among them
#[must_use]
pub fn render(graph: &DependencyGraph, options: &DiagramOptions) -> String {
    let nodes: Vec<&str> = graph.paths().take(options.max_nodes).collect();
    let edges = select_edges(graph, &nodes, options.max_edges);

    match options.format {
        DiagramFormat::Mermaid => to_mermaid(&nodes, &edges),
        DiagramFormat::Dot => to_dot(&nodes, &edges),
    }
}

fn select_edges<'a>(graph: &DependencyGraph, nodes: &[&'a str], max_edges: usize) -> Vec<(&'a str, &'a str)> {
    let mut edges = Vec::new();
    if max_edges == 0 {
        return edges;
    }

    for &source in nodes {
        let Some(node) = graph.get(source) else {
            continue;
        };
        for import in node.imports.iter().filter(|i| i.is_internal()) {
            let Some(target) = resolve_import(&import.module, nodes.iter().copied()) else {
                continue;
            };
            if target == source {
                continue;
            }
            edges.push((source, target));
            if edges.len() >= max_edges {
                return edges;
            }
        }
    }
    edges
}

/// Mermaid has no backslash escapes inside labels, only entity codes
fn mermaid_label(path: &str) -> String {
    path.replace('"', "#quot;")
}

fn dot_label(path: &str) -> String {
    path.replace('\\', "\\\\").replace('"', "\\\"")
}

fn to_mermaid(nodes: &[&str], edges: &[(&str, &str)]) -> String {
    let mut out = String::from("graph TD\n");
    for path in nodes {
        let _ = writeln!(out, "    {}[\"{}\"]", node_id(path), mermaid_label(path));
    }
    for (from, to) in edges {
        let _ = writeln!(out, "    {} --> {}", node_id(from), node_id(to));
    }
    out
}

fn to_dot(nodes: &[&str], edges: &[(&str, &str)]) -> String {
    let mut dot = String::from("digraph dependencies {\n");
    dot.push_str("  rankdir=LR;\n");
    dot.push_str("  node [shape=box, style=rounded];\n\n");

    for path in nodes {
        let _ = writeln!(dot, "  {} [label=\"{}\"];", node_id(path), dot_label(path));
    }

    dot.push('\n');

    for (from, to) in edges {
        let _ = writeln!(dot, "  {} -> {};", node_id(from), node_id(to));
    }

    dot.push_str("}\n");
    dot
}
