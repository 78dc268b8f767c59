// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Static dependency graph of a repository's code files

use crate::classifier::categorize;
use crate::error::{LoreError, Result};
use crate::extract::{extract_exports, extract_imports};
use crate::language::{extension_of, LanguageFamily};
use crate::scanner::{discover_code_files, ScanConfig};
use crate::types::{CodeFile, DependencyEdge, ImportRecord};
use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Extensions stripped from import references before matching
const RESOLVABLE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "py"];

/// Imports, exports and importers of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileNode {
    /// File metadata
    pub file: CodeFile,
    /// Import statements in source order per pattern
    pub imports: Vec<ImportRecord>,
    /// Export-like names
    pub exports: Vec<String>,
    /// Files recorded as importing this one by the compatibility heuristic
    pub imported_by: Vec<String>,
}

/// Global import and export counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tallies {
    /// All import records
    pub imports: usize,
    /// All export names
    pub exports: usize,
    /// Relative imports
    pub internal: usize,
    /// Package imports
    pub external: usize,
}

/// The dependency graph with petgraph backing for resolved edges
#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyGraph {
    /// Files in discovery order
    pub files: IndexMap<String, FileNode>,
    /// Global counts
    pub tallies: Tallies,
    /// Resolved file-to-file edges
    #[serde(skip)]
    graph: DiGraph<String, ()>,
    /// Map from path to node index
    #[serde(skip)]
    node_indices: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Create a new empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discover, read and link every code file below `root`
    ///
    /// A file that cannot be read is logged and skipped.
    pub fn build(root: &Path, config: &ScanConfig) -> Result<Self> {
        info!("Building dependency graph for {}", root.display());
        if !root.is_dir() {
            return Err(LoreError::FileNotFound(root.to_path_buf()));
        }

        let mut graph = Self::new();
        for path in discover_code_files(root, config)? {
            match fs::read_to_string(root.join(&path)) {
                Ok(content) => graph.insert_source(&path, &content),
                Err(e) => warn!("Error reading {}: {}", path, e),
            }
        }
        graph.link();

        info!(
            "Graph has {} files, {} imports, {} resolved edges",
            graph.node_count(),
            graph.tallies.imports,
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Build from in-memory `(path, content)` pairs, in the given order
    pub fn from_sources<P, C>(sources: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: AsRef<str>,
        C: AsRef<str>,
    {
        let mut graph = Self::new();
        for (path, content) in sources {
            graph.insert_source(path.as_ref(), content.as_ref());
        }
        graph.link();
        graph
    }

    /// Add one file; call [`Self::link`] once all files are in
    fn insert_source(&mut self, path: &str, content: &str) {
        let family = LanguageFamily::from_path(path);
        let imports = extract_imports(content, family);
        let exports = extract_exports(content, family);

        let internal = imports.iter().filter(|i| i.is_internal()).count();
        self.tallies.imports += imports.len();
        self.tallies.internal += internal;
        self.tallies.external += imports.len() - internal;
        self.tallies.exports += exports.len();

        debug!("{}: {} imports, {} exports", path, imports.len(), exports.len());

        let file = CodeFile {
            path: path.to_string(),
            extension: extension_of(path),
            category: categorize(path),
            line_count: content.split('\n').count(),
        };
        self.files.insert(
            path.to_string(),
            FileNode {
                file,
                imports,
                exports,
                imported_by: Vec::new(),
            },
        );
    }

    /// Run the reverse-dependency pass and resolve edges
    fn link(&mut self) {
        self.build_reverse_dependencies();
        self.rebuild_graph();
    }

    /// Fill `imported_by` with the compatibility heuristic
    ///
    /// For every internal import of a file F, each other file G is recorded
    /// as an importer of F when any of G's import references is a substring
    /// of F's path. G is appended once per internal import of F. This does
    /// not resolve anything; [`Self::dependents_of`] gives resolved importers.
    fn build_reverse_dependencies(&mut self) {
        let mut recorded: Vec<(usize, Vec<String>)> = Vec::new();

        for (index, (path, node)) in self.files.iter().enumerate() {
            let internal = node.imports.iter().filter(|i| i.is_internal()).count();
            if internal == 0 {
                continue;
            }
            let importers: Vec<String> = self
                .files
                .iter()
                .filter(|(other, other_node)| {
                    *other != path && other_node.imports.iter().any(|imp| path.contains(imp.module.as_str()))
                })
                .map(|(other, _)| other.clone())
                .collect();

            let mut imported_by = Vec::with_capacity(importers.len() * internal);
            for _ in 0..internal {
                imported_by.extend(importers.iter().cloned());
            }
            recorded.push((index, imported_by));
        }

        for (index, imported_by) in recorded {
            if let Some((_, node)) = self.files.get_index_mut(index) {
                node.imported_by = imported_by;
            }
        }
    }

    /// Rebuild the petgraph from resolved internal imports
    fn rebuild_graph(&mut self) {
        self.graph.clear();
        self.node_indices.clear();

        for path in self.files.keys() {
            let idx = self.graph.add_node(path.clone());
            self.node_indices.insert(path.clone(), idx);
        }

        for (path, node) in &self.files {
            let from_idx = self.node_indices[path];
            for import in node.imports.iter().filter(|i| i.is_internal()) {
                let Some(target) = resolve_import(&import.module, self.files.keys().map(String::as_str)) else {
                    continue;
                };
                if target == path {
                    continue;
                }
                let to_idx = self.node_indices[target];
                self.graph.update_edge(from_idx, to_idx, ());
            }
        }
    }

    /// Get a file by path
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&FileNode> {
        self.files.get(path)
    }

    /// Paths in discovery order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Every resolved edge, grouped by importing file in discovery order
    #[must_use]
    pub fn edges(&self) -> Vec<DependencyEdge> {
        self.files
            .keys()
            .flat_map(|path| {
                self.dependencies_of(path).into_iter().map(move |to| DependencyEdge {
                    from: path.clone(),
                    to: to.to_string(),
                })
            })
            .collect()
    }

    /// Files this file imports (resolved)
    #[must_use]
    pub fn dependencies_of(&self, path: &str) -> Vec<&str> {
        self.neighbors(path, Direction::Outgoing)
    }

    /// Files importing this file (resolved)
    #[must_use]
    pub fn dependents_of(&self, path: &str) -> Vec<&str> {
        self.neighbors(path, Direction::Incoming)
    }

    fn neighbors(&self, path: &str, direction: Direction) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(path) else {
            return Vec::new();
        };
        let mut found: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        found.sort();
        found.into_iter().map(|n| self.graph[n].as_str()).collect()
    }

    /// Get node count
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.files.len()
    }

    /// Get resolved edge count
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check if the graph is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Export to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Match an import reference to the first candidate path it plausibly names
///
/// Leading dots and a trailing source extension are stripped from the
/// reference; a candidate matches if the cleaned reference is a substring of
/// it or it ends with `/<cleaned>.<ext>`. Ambiguous references resolve to the
/// first candidate.
pub fn resolve_import<'a>(module: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let cleaned = clean_reference(module);
    if cleaned.is_empty() || cleaned == "/" {
        return None;
    }
    candidates.into_iter().find(|path| {
        path.contains(cleaned)
            || RESOLVABLE_EXTENSIONS
                .iter()
                .any(|ext| path.ends_with(&format!("/{cleaned}.{ext}")))
    })
}

fn clean_reference(module: &str) -> &str {
    let stripped = module.trim_start_matches('.');
    RESOLVABLE_EXTENSIONS
        .iter()
        .find_map(|ext| stripped.strip_suffix(ext).and_then(|s| s.strip_suffix('.')))
        .unwrap_or(stripped)
}
