// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Repolore library - explainable profiles of unfamiliar repositories
//!
//! This crate turns a cloned repository into a project summary, per-file
//! role classifications, a static dependency graph with a renderable diagram,
//! and a per-file evolution timeline derived from commit metadata.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classifier;
pub mod commands;
pub mod config;
pub mod diagram;
pub mod error;
pub mod evolution;
pub mod extract;
pub mod forge;
pub mod graph;
pub mod language;
pub mod llm;
pub mod pipeline;
pub mod project;
pub mod scanner;
pub mod symbols;
pub mod vcs;

/// Core data types shared by every analysis stage
pub mod types {
    use chrono::{DateTime, FixedOffset};
    use indexmap::IndexMap;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeSet;
    use std::fmt;

    // =========================================================================
    // Code Files
    // =========================================================================

    /// Structural role of a file, decided from its extension and directory
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub enum FileCategory {
        /// Rendered UI (components, pages, views)
        #[serde(rename = "UI Component")]
        UiComponent,
        /// Frontend hooks and helpers
        #[serde(rename = "Frontend Utility")]
        FrontendUtility,
        /// Stores, reducers, shared state
        #[serde(rename = "State Management")]
        StateManagement,
        /// Any other frontend source
        #[serde(rename = "Frontend Logic")]
        FrontendLogic,
        /// Request handlers and routes
        #[serde(rename = "API Endpoint")]
        ApiEndpoint,
        /// Models and schemas
        #[serde(rename = "Data Model")]
        DataModel,
        /// Services and domain logic
        #[serde(rename = "Business Logic")]
        BusinessLogic,
        /// Backend helpers
        #[serde(rename = "Backend Utility")]
        BackendUtility,
        /// Any other backend source
        #[serde(rename = "Backend Logic")]
        BackendLogic,
        /// Settings and manifests
        #[serde(rename = "Configuration")]
        Configuration,
        /// Prose
        #[serde(rename = "Documentation")]
        Documentation,
        /// Tests
        #[serde(rename = "Test")]
        Test,
        /// Stylesheets
        #[serde(rename = "Styling")]
        Styling,
        /// Everything else
        #[serde(rename = "Other")]
        Other,
    }

    impl FileCategory {
        /// Every category, in declaration order
        pub const ALL: [Self; 14] = [
            Self::UiComponent,
            Self::FrontendUtility,
            Self::StateManagement,
            Self::FrontendLogic,
            Self::ApiEndpoint,
            Self::DataModel,
            Self::BusinessLogic,
            Self::BackendUtility,
            Self::BackendLogic,
            Self::Configuration,
            Self::Documentation,
            Self::Test,
            Self::Styling,
            Self::Other,
        ];

        /// Human-readable label, identical to the serialized form
        #[must_use]
        pub fn label(&self) -> &'static str {
            match self {
                Self::UiComponent => "UI Component",
                Self::FrontendUtility => "Frontend Utility",
                Self::StateManagement => "State Management",
                Self::FrontendLogic => "Frontend Logic",
                Self::ApiEndpoint => "API Endpoint",
                Self::DataModel => "Data Model",
                Self::BusinessLogic => "Business Logic",
                Self::BackendUtility => "Backend Utility",
                Self::BackendLogic => "Backend Logic",
                Self::Configuration => "Configuration",
                Self::Documentation => "Documentation",
                Self::Test => "Test",
                Self::Styling => "Styling",
                Self::Other => "Other",
            }
        }

        /// Categories counted as frontend in architecture stats
        #[must_use]
        pub fn is_frontend(&self) -> bool {
            matches!(self, Self::UiComponent | Self::FrontendUtility | Self::StateManagement | Self::FrontendLogic)
        }

        /// Categories counted as backend in architecture stats
        #[must_use]
        pub fn is_backend(&self) -> bool {
            matches!(self, Self::ApiEndpoint | Self::DataModel | Self::BusinessLogic | Self::BackendUtility | Self::BackendLogic)
        }
    }

    impl fmt::Display for FileCategory {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.label())
        }
    }

    /// A discovered source file
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CodeFile {
        /// Repo-relative path with forward slashes
        pub path: String,
        /// Lowercase extension without the dot
        pub extension: String,
        /// Structural category
        pub category: FileCategory,
        /// Number of newline-separated segments in the content
        pub line_count: usize,
    }

    // =========================================================================
    // Imports
    // =========================================================================

    /// Whether an import points inside the repository
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ImportKind {
        /// Third-party or standard-library module
        External,
        /// Relative reference into the same repository
        Internal,
    }

    /// How an import reference was written
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ImportResolution {
        /// Bare module name, origin unknown
        Unknown,
        /// Path-relative reference (leading dot)
        Relative,
    }

    /// One import statement found in a file
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ImportRecord {
        /// External or internal
        pub kind: ImportKind,
        /// Module reference exactly as written in source
        pub module: String,
        /// How the reference resolves
        pub resolution: ImportResolution,
    }

    impl ImportRecord {
        /// Classify a raw module reference: a leading dot means internal/relative
        #[must_use]
        pub fn classify(module: &str) -> Self {
            if module.starts_with('.') {
                Self {
                    kind: ImportKind::Internal,
                    module: module.to_string(),
                    resolution: ImportResolution::Relative,
                }
            } else {
                Self {
                    kind: ImportKind::External,
                    module: module.to_string(),
                    resolution: ImportResolution::Unknown,
                }
            }
        }

        /// True for relative imports
        #[must_use]
        pub fn is_internal(&self) -> bool {
            self.kind == ImportKind::Internal
        }
    }

    /// Resolved file-to-file dependency
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct DependencyEdge {
        /// Importing file
        pub from: String,
        /// Imported file
        pub to: String,
    }

    // =========================================================================
    // Commits and Evolution
    // =========================================================================

    /// One commit from the commit-log collaborator
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CommitRecord {
        /// Commit hash
        pub id: String,
        /// Full commit message
        pub message: String,
        /// Author name
        pub author: String,
        /// Author date
        pub timestamp: DateTime<FixedOffset>,
        /// Paths changed by the commit
        #[serde(default)]
        pub touched_paths: BTreeSet<String>,
    }

    /// Change status reported by the hosting API
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ChangeType {
        /// File created
        Added,
        /// File edited
        Modified,
        /// File deleted
        Removed,
        /// File moved
        Renamed,
        /// File copied
        Copied,
        /// Mode or metadata change
        Changed,
        /// Listed without content change
        Unchanged,
        /// Any status this crate does not know
        #[serde(other)]
        Other,
    }

    /// Per-file change record for one commit, as returned by the diff collaborator
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FileChange {
        /// Repo-relative path
        pub path: String,
        /// Change status
        pub status: ChangeType,
        /// Lines added
        pub additions: u64,
        /// Lines deleted
        pub deletions: u64,
    }

    /// One entry of a file's timeline
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FileChangeEvent {
        /// Commit hash
        pub commit_id: String,
        /// Commit author date
        pub timestamp: DateTime<FixedOffset>,
        /// Change status
        pub change_type: ChangeType,
        /// Lines added
        pub additions: u64,
        /// Lines deleted
        pub deletions: u64,
        /// Commit author
        pub author: String,
        /// Commit message
        pub message: String,
    }

    /// Path to ordered change events, oldest commit first
    pub type FileEvolution = IndexMap<String, Vec<FileChangeEvent>>;

    /// Aggregated change metrics for one file
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LifecycleStats {
        /// Timestamp of the first event
        pub created_at: DateTime<FixedOffset>,
        /// Timestamp of the last event
        pub last_modified_at: DateTime<FixedOffset>,
        /// Number of events
        pub total_commits: usize,
        /// Sum of additions
        pub total_additions: u64,
        /// Sum of deletions
        pub total_deletions: u64,
        /// Additions minus deletions
        pub net_changes: i64,
        /// Every change type seen
        pub distinct_change_types: BTreeSet<ChangeType>,
    }

    // =========================================================================
    // File Roles
    // =========================================================================

    /// Size bucket of a file
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Complexity {
        /// Fewer than 50 non-blank lines
        Low,
        /// Fewer than 200 non-blank lines
        Medium,
        /// Everything larger
        High,
    }

    impl Complexity {
        /// Bucket a non-blank line count
        #[must_use]
        pub fn from_non_blank_lines(lines: usize) -> Self {
            if lines < 50 {
                Self::Low
            } else if lines < 200 {
                Self::Medium
            } else {
                Self::High
            }
        }
    }

    /// Role and purpose of one file
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RoleProfile {
        /// Structural category
        pub category: FileCategory,
        /// Purpose sentence from the keyword decision table
        pub role_sentence: String,
        /// Size bucket
        pub complexity: Complexity,
        /// Imported module names (deduplicated, at most 10)
        pub dependencies: Vec<String>,
        /// Function and class names (deduplicated, at most 5)
        pub key_symbols: Vec<String>,
        /// One display line
        pub summary: String,
    }

    // =========================================================================
    // Project Summary
    // =========================================================================

    /// Repository files bucketed by area
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FolderStructure {
        /// Frontend sources
        pub frontend: Vec<String>,
        /// Backend sources
        pub backend: Vec<String>,
        /// Configuration files
        pub config: Vec<String>,
        /// Documentation
        pub docs: Vec<String>,
        /// Tests
        pub tests: Vec<String>,
        /// Everything else
        pub other: Vec<String>,
    }

    /// Project-level overview
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ProjectSummary {
        /// Headline description (may be empty)
        pub description: String,
        /// Ecosystem or shape of the project
        pub inferred_type: String,
        /// Declared dependency names (at most 5)
        pub tech_stack: Vec<String>,
        /// Features from the checklist (at most 5)
        pub key_features: Vec<String>,
        /// Bucketed file lists
        pub folder_structure: FolderStructure,
    }

    // =========================================================================
    // Symbols and Modules
    // =========================================================================

    /// Kind of a source symbol
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum SymbolKind {
        /// Function or method
        Function,
        /// Class
        Class,
    }

    /// Function or class extracted from a source file
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Symbol {
        /// Function or class
        #[serde(rename = "type")]
        pub kind: SymbolKind,
        /// Declared name
        pub name: String,
        /// 1-based line of the declaration
        pub start_line: usize,
        /// Docstring, if the body starts with one
        pub docstring: Option<String>,
        /// Source text of the declaration
        pub code: String,
    }

    /// File count of one top-level directory
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ModuleCount {
        /// Top-level directory name
        pub module: String,
        /// Source files below it
        pub file_count: usize,
    }

    /// Entry of the directory tree preview
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TreeEntry {
        /// Repo-relative path
        pub path: String,
        /// Lowercase extension without the dot (empty when absent)
        pub ext: String,
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{LoreError, Result};
    pub use crate::types::*;
}
