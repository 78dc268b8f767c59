// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Project-level summary from manifests, readme and folder layout

use crate::error::{LoreError, Result};
use crate::language::extension_of;
use crate::scanner::{walk_files, ScanConfig};
use crate::types::{FolderStructure, ProjectSummary};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const MAX_TECH_STACK: usize = 5;
const MAX_FEATURES: usize = 5;
const README_SCAN_LINES: usize = 10;
const DESCRIPTION_CHARS: usize = 200;

/// What a manifest file told us
#[derive(Debug, Default)]
struct Manifest {
    ecosystem: &'static str,
    description: String,
    dependencies: Vec<String>,
}

type ManifestParser = fn(&str) -> Result<Manifest>;

/// Manifests in precedence order
const MANIFESTS: &[(&str, ManifestParser)] = &[
    ("package.json", parse_package_json),
    ("Cargo.toml", parse_cargo_toml),
    ("pyproject.toml", parse_pyproject),
];

/// Summarize the repository at `root` with default walk settings
pub fn summarize(root: &Path) -> Result<ProjectSummary> {
    summarize_with(root, &ScanConfig::default())
}

/// Summarize the repository at `root`
pub fn summarize_with(root: &Path, config: &ScanConfig) -> Result<ProjectSummary> {
    if !root.is_dir() {
        return Err(LoreError::FileNotFound(root.to_path_buf()));
    }

    let manifest = read_manifest(root);
    let folder_structure = folder_structure(root, config)?;

    let description = manifest
        .as_ref()
        .map(|m| m.description.trim().to_string())
        .filter(|d| !d.is_empty())
        .or_else(|| readme_description(root))
        .unwrap_or_default();

    let inferred_type = match &manifest {
        Some(m) => m.ecosystem.to_string(),
        None => infer_type(&folder_structure).to_string(),
    };

    Ok(ProjectSummary {
        description,
        inferred_type,
        tech_stack: manifest.map(|m| m.dependencies).unwrap_or_default(),
        key_features: key_features(&folder_structure),
        folder_structure,
    })
}

/// One-sentence rendering of a summary
#[must_use]
pub fn summary_sentence(summary: &ProjectSummary) -> String {
    let base = if summary.description.is_empty() {
        format!("This is a {}", summary.inferred_type.to_lowercase())
    } else {
        summary.description.clone()
    };

    match summary.key_features.split_last() {
        None => format!("{base}."),
        Some((last, [])) => format!("{base} that includes {last}."),
        Some((last, rest)) => format!("{base} that includes {} and {last}.", rest.join(", ")),
    }
}

/// Bucket every non-root file of the repository
pub fn folder_structure(root: &Path, config: &ScanConfig) -> Result<FolderStructure> {
    let mut structure = FolderStructure::default();
    for path in walk_files(root, config)? {
        let Some((dir, name)) = path.rsplit_once('/') else {
            continue;
        };
        let bucket = match bucket_of(&dir.to_lowercase(), &name.to_lowercase()) {
            Bucket::Tests => &mut structure.tests,
            Bucket::Frontend => &mut structure.frontend,
            Bucket::Backend => &mut structure.backend,
            Bucket::Config => &mut structure.config,
            Bucket::Docs => &mut structure.docs,
            Bucket::Other => &mut structure.other,
        };
        bucket.push(path);
    }
    Ok(structure)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Tests,
    Frontend,
    Backend,
    Config,
    Docs,
    Other,
}

fn bucket_of(dir: &str, name: &str) -> Bucket {
    let ext = extension_of(name);
    let in_test_dir = dir.split('/').any(|seg| matches!(seg, "test" | "tests" | "__tests__"));

    if name.starts_with("test_") || name.contains(".test.") || name.contains(".spec.") || in_test_dir {
        return Bucket::Tests;
    }

    match ext.as_str() {
        "jsx" | "tsx" | "js" | "ts" | "vue" | "svelte" => {
            if ["src", "app", "components", "pages"].iter().any(|d| dir.contains(d)) {
                Bucket::Frontend
            } else {
                Bucket::Backend
            }
        }
        "py" | "java" | "go" | "rb" | "php" => Bucket::Backend,
        "json" | "yaml" | "yml" | "toml" | "env" => Bucket::Config,
        _ if name.starts_with("dockerfile") || name.contains("docker-compose") || ext == "dockerfile" => Bucket::Config,
        "md" | "txt" | "rst" => Bucket::Docs,
        _ => Bucket::Other,
    }
}

fn infer_type(structure: &FolderStructure) -> &'static str {
    match (
        structure.frontend.is_empty(),
        structure.backend.is_empty(),
        structure.config.is_empty(),
    ) {
        (false, false, _) => "Full-stack application",
        (false, true, _) => "Frontend application",
        (true, false, _) => "Backend application",
        (true, true, false) => "Configuration/Infrastructure",
        (true, true, true) => "Documentation/Other",
    }
}

fn key_features(structure: &FolderStructure) -> Vec<String> {
    let any = |paths: &[String], needles: &[&str]| {
        paths
            .iter()
            .map(|p| p.to_lowercase())
            .any(|p| needles.iter().any(|n| p.contains(n)))
    };

    let checklist = [
        (
            "User Authentication",
            any(&structure.frontend, &["auth"]) || any(&structure.backend, &["auth"]),
        ),
        ("REST API", any(&structure.backend, &["api"])),
        ("Database Integration", any(&structure.backend, &["db", "model"])),
        ("Testing", any(&structure.tests, &["test"])),
        ("Containerization", any(&structure.config, &["docker"])),
        ("Rich UI Components", structure.frontend.len() > 5),
        ("Complex Backend Logic", structure.backend.len() > 5),
    ];

    checklist
        .into_iter()
        .filter(|(_, present)| *present)
        .map(|(feature, _)| feature.to_string())
        .take(MAX_FEATURES)
        .collect()
}

fn read_manifest(root: &Path) -> Option<Manifest> {
    for (file, parse) in MANIFESTS {
        let path = root.join(file);
        if !path.is_file() {
            continue;
        }
        let parsed = fs::read_to_string(&path).map_err(LoreError::from).and_then(|s| parse(&s));
        match parsed {
            Ok(manifest) => {
                debug!("Using manifest {}", file);
                return Some(manifest);
            }
            Err(e) => warn!("Ignoring unparsable {}: {}", path.display(), e),
        }
    }
    None
}

fn parse_package_json(content: &str) -> Result<Manifest> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    Ok(Manifest {
        ecosystem: "Node.js/JavaScript",
        description: value
            .get("description")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string(),
        dependencies: value
            .get("dependencies")
            .and_then(serde_json::Value::as_object)
            .map(|deps| deps.keys().take(MAX_TECH_STACK).cloned().collect())
            .unwrap_or_default(),
    })
}

fn parse_cargo_toml(content: &str) -> Result<Manifest> {
    let value: toml::Table = toml::from_str(content)?;
    Ok(Manifest {
        ecosystem: "Rust",
        description: value
            .get("package")
            .and_then(|p| p.get("description"))
            .and_then(toml::Value::as_str)
            .unwrap_or_default()
            .to_string(),
        dependencies: value
            .get("dependencies")
            .and_then(toml::Value::as_table)
            .map(|deps| deps.keys().take(MAX_TECH_STACK).cloned().collect())
            .unwrap_or_default(),
    })
}

fn parse_pyproject(content: &str) -> Result<Manifest> {
    let value: toml::Table = toml::from_str(content)?;
    let project = value.get("project");
    let poetry = value.get("tool").and_then(|t| t.get("poetry"));

    let description = project
        .and_then(|p| p.get("description"))
        .or_else(|| poetry.and_then(|p| p.get("description")))
        .and_then(toml::Value::as_str)
        .unwrap_or_default()
        .to_string();

    let from_project = project
        .and_then(|p| p.get("dependencies"))
        .and_then(toml::Value::as_array)
        .map(|reqs| {
            reqs.iter()
                .filter_map(toml::Value::as_str)
                .map(requirement_name)
                .filter(|name| !name.is_empty())
                .collect::<Vec<_>>()
        });
    let dependencies = from_project
        .or_else(|| {
            poetry
                .and_then(|p| p.get("dependencies"))
                .and_then(toml::Value::as_table)
                .map(|deps| deps.keys().filter(|k| *k != "python").cloned().collect())
        })
        .unwrap_or_default()
        .into_iter()
        .take(MAX_TECH_STACK)
        .collect();

    Ok(Manifest {
        ecosystem: "Python",
        description,
        dependencies,
    })
}

/// Distribution name of a PEP 508 requirement string
fn requirement_name(requirement: &str) -> String {
    requirement
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect()
}

fn readme_description(root: &Path) -> Option<String> {
    let mut readmes: Vec<_> = fs::read_dir(root)
        .ok()?
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|e| {
            Path::new(&e.file_name())
                .file_stem()
                .is_some_and(|stem| stem.to_string_lossy().eq_ignore_ascii_case("readme"))
        })
        .map(|e| e.path())
        .collect();
    readmes.sort();

    let content = fs::read_to_string(readmes.first()?)
        .map_err(|e| warn!("Could not read readme: {}", e))
        .ok()?;

    content
        .lines()
        .take(README_SCAN_LINES)
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('[') && !line.starts_with("!["))
        .map(|line| line.chars().take(DESCRIPTION_CHARS).collect())
}
