// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invariant tests for the analysis pipeline
//!
//! These tests verify critical invariants:
//! 1. Determinism - categories and role profiles are stable
//! 2. Bounds - diagrams respect their node and edge caps at any graph size
//! 3. Accounting - lifecycle totals are sums of the underlying events
//! 4. Robustness - symbol extraction never panics and reports real lines

use chrono::{DateTime, Duration, FixedOffset};
use proptest::prelude::*;
use repolore::classifier::{categorize, classify, classify_content};
use repolore::diagram::{render, DiagramFormat, DiagramOptions};
use repolore::error::{LoreError, Result};
use repolore::evolution::{build_evolution, lifecycle_stats};
use repolore::forge::DiffSource;
use repolore::graph::DependencyGraph;
use repolore::language::LanguageFamily;
use repolore::project::{summarize, summary_sentence};
use repolore::symbols::extract_symbols_from_source;
use repolore::types::{
    ChangeType, CommitRecord, Complexity, FileCategory, FileChange, ImportKind, ImportRecord, ImportResolution,
};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

fn epoch() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap()
}

fn make_commit(id: &str, minutes: i64) -> CommitRecord {
    CommitRecord {
        id: id.to_string(),
        message: format!("commit {id}"),
        author: "ada".to_string(),
        timestamp: epoch() + Duration::minutes(minutes),
        touched_paths: BTreeSet::new(),
    }
}

fn change(path: &str, status: ChangeType, additions: u64, deletions: u64) -> FileChange {
    FileChange {
        path: path.to_string(),
        status,
        additions,
        deletions,
    }
}

/// Diff source answering from a fixed table
struct TableForge(HashMap<String, Vec<FileChange>>);

impl DiffSource for TableForge {
    fn commit_file_changes(&self, _owner: &str, _repo: &str, id: &str, _token: Option<&str>) -> Result<Vec<FileChange>> {
        self.0
            .get(id)
            .cloned()
            .ok_or_else(|| LoreError::RemoteUnavailable(format!("no such commit {id}")))
    }
}

/// `n` JS files, each importing its successor
fn chain(n: usize) -> DependencyGraph {
    let sources: Vec<(String, String)> = (0..n)
        .map(|i| {
            let content = if i + 1 < n {
                format!("import next from './mod{:04}';\nexport const v{i} = {i};\n", i + 1)
            } else {
                format!("export const v{i} = {i};\n")
            };
            (format!("src/mod{i:04}.js"), content)
        })
        .collect();
    DependencyGraph::from_sources(sources)
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

// =============================================================================
// Determinism Tests
// =============================================================================

proptest! {
    #[test]
    fn prop_category_is_deterministic(path in "[a-z_/]{0,24}(\\.(py|js|jsx|ts|json|md|css|txt|rs))?") {
        let first = categorize(&path);
        prop_assert_eq!(first, categorize(&path));
        prop_assert!(FileCategory::ALL.contains(&first));
    }
}

#[test]
fn test_classifier_is_repeatable() {
    let content = "import os\nfrom flask import Flask\n\nclass Api:\n    pass\n\ndef handler():\n    return 1\n";
    let first = classify_content("app/api/routes.py", Some(content), &[]);
    let second = classify_content("app/api/routes.py", Some(content), &[]);
    assert_eq!(first, second);
    assert_eq!(first.category, FileCategory::ApiEndpoint);
}

#[test]
fn test_files_without_internal_imports_have_no_edges() {
    let graph = DependencyGraph::from_sources([
        ("app/main.py", "import os\nimport json\n"),
        ("app/util.py", "def helper():\n    pass\n"),
    ]);
    assert_eq!(graph.edge_count(), 0);
    for path in ["app/main.py", "app/util.py"] {
        assert!(graph.get(path).unwrap().imported_by.is_empty());
        assert!(graph.dependencies_of(path).is_empty());
    }
}

// =============================================================================
// Diagram Bounds
// =============================================================================

fn node_lines(text: &str, format: DiagramFormat) -> usize {
    match format {
        DiagramFormat::Mermaid => text.lines().filter(|l| l.contains("[\"")).count(),
        DiagramFormat::Dot => text.lines().filter(|l| l.contains("[label=")).count(),
    }
}

fn edge_lines(text: &str, format: DiagramFormat) -> usize {
    let arrow = match format {
        DiagramFormat::Mermaid => " --> ",
        DiagramFormat::Dot => " -> ",
    };
    text.lines().filter(|l| l.contains(arrow)).count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_diagram_respects_caps(
        n in 0usize..120,
        max_nodes in 0usize..40,
        max_edges in 0usize..40,
        dot in any::<bool>(),
    ) {
        let format = if dot { DiagramFormat::Dot } else { DiagramFormat::Mermaid };
        let text = render(&chain(n), &DiagramOptions { max_nodes, max_edges, format });
        prop_assert!(node_lines(&text, format) <= max_nodes);
        prop_assert!(edge_lines(&text, format) <= max_edges);
        prop_assert_eq!(node_lines(&text, format), n.min(max_nodes));
    }
}

#[test]
fn test_diagram_caps_on_large_graph() {
    let graph = chain(1200);
    let text = render(&graph, &DiagramOptions::default());
    assert_eq!(node_lines(&text, DiagramFormat::Mermaid), 20);
    assert_eq!(edge_lines(&text, DiagramFormat::Mermaid), 19);
}

#[test]
fn test_mermaid_snapshot() {
    let graph = DependencyGraph::from_sources([
        ("src/app.js", "import api from './api';\nimport React from 'react';\n"),
        ("src/api.js", "export const get = () => fetch('/');\n"),
    ]);
    let text = render(&graph, &DiagramOptions::default());
    insta::assert_snapshot!(text.trim_end(), @r###"
    graph TD
        src_app_js["src/app.js"]
        src_api_js["src/api.js"]
        src_app_js --> src_api_js
    "###);
}

// =============================================================================
// Lifecycle Accounting
// =============================================================================

#[test]
fn test_lifecycle_of_two_commits() {
    let mut table = HashMap::new();
    table.insert("c1".to_string(), vec![change("x.py", ChangeType::Added, 10, 0)]);
    table.insert("c2".to_string(), vec![change("x.py", ChangeType::Modified, 3, 2)]);
    let commits = vec![make_commit("c1", 0), make_commit("c2", 5)];

    let evolution = build_evolution(&TableForge(table), "octo", "lore", &commits, None, 1);
    let stats = &lifecycle_stats(&evolution)["x.py"];

    assert_eq!(stats.created_at, commits[0].timestamp);
    assert_eq!(stats.last_modified_at, commits[1].timestamp);
    assert_eq!(stats.total_commits, 2);
    assert_eq!(stats.total_additions, 13);
    assert_eq!(stats.total_deletions, 2);
    assert_eq!(stats.net_changes, 11);
    assert_eq!(
        stats.distinct_change_types,
        BTreeSet::from([ChangeType::Added, ChangeType::Modified])
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_lifecycle_totals_are_sums(
        changes in prop::collection::vec((0u64..500, 0u64..500, any::<bool>()), 0..20),
        concurrency in 1usize..4,
    ) {
        let mut table = HashMap::new();
        let mut commits = Vec::new();
        for (i, (additions, deletions, touched)) in changes.iter().enumerate() {
            let id = format!("c{i}");
            let files = if *touched {
                vec![change("x.py", ChangeType::Modified, *additions, *deletions)]
            } else {
                vec![change("y.py", ChangeType::Modified, *additions, *deletions)]
            };
            table.insert(id.clone(), files);
            commits.push(make_commit(&id, i64::try_from(i).unwrap()));
        }

        let evolution = build_evolution(&TableForge(table), "o", "r", &commits, None, concurrency);
        let stats = lifecycle_stats(&evolution);

        for (path, touched) in [("x.py", true), ("y.py", false)] {
            let selected: Vec<_> = changes.iter().filter(|c| c.2 == touched).collect();
            match stats.get(path) {
                None => prop_assert!(selected.is_empty()),
                Some(s) => {
                    let additions: u64 = selected.iter().map(|c| c.0).sum();
                    let deletions: u64 = selected.iter().map(|c| c.1).sum();
                    prop_assert_eq!(s.total_commits, selected.len());
                    prop_assert_eq!(s.total_additions, additions);
                    prop_assert_eq!(s.total_deletions, deletions);
                    prop_assert_eq!(s.net_changes, i64::try_from(additions).unwrap() - i64::try_from(deletions).unwrap());
                    prop_assert!(s.created_at <= s.last_modified_at);
                }
            }
        }
    }
}

#[test]
fn test_failed_commit_contributes_nothing() {
    let mut table = HashMap::new();
    table.insert("c1".to_string(), vec![change("x.py", ChangeType::Added, 1, 0)]);
    let commits = vec![make_commit("c1", 0), make_commit("lost", 1)];

    let evolution = build_evolution(&TableForge(table), "o", "r", &commits, None, 1);
    assert_eq!(evolution.len(), 1);
    assert_eq!(evolution["x.py"].len(), 1);
}

// =============================================================================
// Symbol Extraction
// =============================================================================

/// Python-ish lines mixing docstring quotes with non-ASCII whitespace
fn pythonish_source() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        Just("def f():".to_string()),
        Just("class C:".to_string()),
        Just("    def m(self):".to_string()),
        Just("    \"\"\"Doc".to_string()),
        Just(" \"\"\"".to_string()),
        Just("\u{a0}".to_string()),
        Just("  \u{3000}x".to_string()),
        Just("\t'''".to_string()),
        Just("export function g() {}".to_string()),
        "\\PC{0,8}",
    ];
    prop::collection::vec(line, 0..12).prop_map(|lines| lines.join("\n"))
}

fn assert_symbols_within(source: &str) -> std::result::Result<(), TestCaseError> {
    let line_count = source.lines().count();
    for family in [LanguageFamily::PyLike, LanguageFamily::JsLike] {
        for symbol in extract_symbols_from_source(source, family) {
            prop_assert!(!symbol.name.is_empty());
            prop_assert!(symbol.start_line >= 1);
            prop_assert!(symbol.start_line <= line_count);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_symbols_on_arbitrary_text(source in "\\PC*") {
        assert_symbols_within(&source)?;
    }

    #[test]
    fn prop_symbols_on_pythonish_text(source in pythonish_source()) {
        assert_symbols_within(&source)?;
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_auth_service_profile() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "services/auth.py", "def login(): ...\n");

    let profile = classify(dir.path(), "services/auth.py", &[]);
    assert_eq!(profile.category, FileCategory::BusinessLogic);
    assert_eq!(profile.role_sentence, "Handles user authentication and authorization");
    assert_eq!(profile.complexity, Complexity::Low);
    assert_eq!(profile.key_symbols, vec!["login"]);
}

#[test]
fn test_manifest_description() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "package.json", r#"{"name": "tracker", "description": "A task tracker"}"#);

    let summary = summarize(dir.path()).unwrap();
    assert_eq!(summary.description, "A task tracker");
    assert_eq!(summary.inferred_type, "Node.js/JavaScript");
    assert!(summary_sentence(&summary).starts_with("A task tracker"));
}

#[test]
fn test_import_classification() {
    assert_eq!(
        ImportRecord::classify(".utils"),
        ImportRecord {
            kind: ImportKind::Internal,
            module: ".utils".into(),
            resolution: ImportResolution::Relative,
        }
    );
    assert_eq!(ImportRecord::classify("os").kind, ImportKind::External);
    assert_eq!(ImportRecord::classify("os").resolution, ImportResolution::Unknown);

    let graph = DependencyGraph::from_sources([("pkg/a.py", "from .utils import helper\nimport os\n")]);
    let imports = &graph.get("pkg/a.py").unwrap().imports;
    assert_eq!(imports.len(), 2);
    assert!(imports.iter().any(|i| i.module == ".utils" && i.is_internal()));
    assert!(imports.iter().any(|i| i.module == "os" && !i.is_internal()));
}

#[test]
fn test_missing_root_is_reported() {
    let err = summarize(Path::new("/definitely/not/a/repo")).unwrap_err();
    assert!(matches!(err, LoreError::FileNotFound(_)));
}
