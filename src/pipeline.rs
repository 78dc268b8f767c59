// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Composition of the analysis stages into the views served by the CLI

use crate::classifier::classify;
use crate::config::Config;
use crate::diagram::{render, DiagramFormat, DiagramOptions};
use crate::error::{LoreError, Result};
use crate::evolution::{build_evolution, file_history, lifecycle_stats};
use crate::forge::{owner_and_repo, DiffSource, GitHubClient};
use crate::graph::{DependencyGraph, FileNode};
use crate::llm::{summarize_all, SymbolSummarizer, SymbolSummary};
use crate::project::{summarize_with, summary_sentence};
use crate::scanner::{detect_modules, directory_tree, ScanConfig};
use crate::symbols::extract_symbols;
use crate::types::{
    CommitRecord, DependencyEdge, FileChangeEvent, FileEvolution, LifecycleStats, ModuleCount, ProjectSummary,
    RoleProfile, Symbol, TreeEntry,
};
use crate::vcs::{CommitLog, GitCli};
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

const OVERVIEW_COMMITS: usize = 10;
const OVERVIEW_FILES: usize = 20;
const ARCHITECTURE_KEY_FILES: usize = 10;
const DASHBOARD_HISTORY: usize = 10;

/// A repository ready for analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// What the user asked for
    pub locator: String,
    /// Local working copy
    pub path: PathBuf,
    /// Hosting owner, when known
    pub owner: Option<String>,
    /// Hosting repository name, when known
    pub name: Option<String>,
}

impl Repository {
    /// Owner and name, required by views that query the hosting API
    pub fn coordinates(&self) -> Result<(&str, &str)> {
        match (&self.owner, &self.name) {
            (Some(owner), Some(name)) => Ok((owner.as_str(), name.as_str())),
            _ => Err(LoreError::InvalidLocator(self.locator.clone())),
        }
    }
}

/// `analyze` view
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    /// Locator
    pub repo: String,
    /// Oldest commits
    pub commits: Vec<CommitRecord>,
    /// Source files per top-level directory
    pub modules: Vec<ModuleCount>,
    /// Directory tree preview
    pub files: Vec<TreeEntry>,
}

/// `summary` view
#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    /// Locator
    pub repo: String,
    /// One-sentence rendering
    pub summary: String,
    /// Structured summary
    pub details: ProjectSummary,
}

/// `deps` view
#[derive(Debug, Clone, Serialize)]
pub struct DependencyView {
    /// Locator
    pub repo: String,
    /// Code files
    pub total_files: usize,
    /// Import records
    pub total_imports: usize,
    /// Export names
    pub total_exports: usize,
    /// Relative imports
    pub internal_imports: usize,
    /// Package imports
    pub external_imports: usize,
    /// Per-file imports, exports and importers
    pub files: IndexMap<String, FileNode>,
    /// Resolved file-to-file edges
    pub edges: Vec<DependencyEdge>,
    /// Mermaid rendering
    pub mermaid_diagram: String,
}

/// `evolution` view
#[derive(Debug, Clone, Serialize)]
pub struct EvolutionView {
    /// Locator
    pub repo: String,
    /// Hosting owner
    pub owner: String,
    /// Hosting repository name
    pub repo_name: String,
    /// Files with at least one event
    pub total_files_tracked: usize,
    /// Per-file events
    pub file_evolution: FileEvolution,
    /// Per-file statistics
    pub lifecycle_stats: IndexMap<String, LifecycleStats>,
}

/// `history` view
#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    /// Locator
    pub repo: String,
    /// Tracked file
    pub filename: String,
    /// Number of events
    pub total_changes: usize,
    /// Events in commit order
    pub history: Vec<FileChangeEvent>,
}

/// `symbols` view
#[derive(Debug, Clone, Serialize)]
pub struct SymbolsView {
    /// Repo-relative file
    pub file: String,
    /// Functions and classes
    pub symbols: Vec<Symbol>,
}

/// `summarize` view
#[derive(Debug, Clone, Serialize)]
pub struct SummariesView {
    /// Repo-relative file
    pub file: String,
    /// One entry per symbol
    pub summaries: Vec<SymbolSummary>,
}

/// `roles` view
#[derive(Debug, Clone, Serialize)]
pub struct RolesView {
    /// Locator
    pub repo: String,
    /// Number of profiled files
    pub total_files_analyzed: usize,
    /// Profiles of files touched by the inspected commits
    pub file_roles: IndexMap<String, RoleProfile>,
}

/// Timeline entry of a dashboard file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// Commit hash
    pub commit_id: String,
    /// Commit date
    pub timestamp: DateTime<FixedOffset>,
    /// Commit message
    pub message: String,
    /// Lines added
    pub additions: u64,
    /// Lines deleted
    pub deletions: u64,
}

impl From<&FileChangeEvent> for HistoryEntry {
    fn from(event: &FileChangeEvent) -> Self {
        Self {
            commit_id: event.commit_id.clone(),
            timestamp: event.timestamp,
            message: event.message.clone(),
            additions: event.additions,
            deletions: event.deletions,
        }
    }
}

/// One file of the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardFile {
    /// File name
    pub name: String,
    /// Repo-relative path
    pub path: String,
    /// Role sentence
    pub role: String,
    /// Names of files it imports
    pub connections: Vec<String>,
    /// First events of its timeline
    pub commit_history: Vec<HistoryEntry>,
    /// Summary line
    pub summary: String,
}

/// Dashboard counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Files listed
    pub total_files: usize,
    /// Commits in the log
    pub total_commits: usize,
    /// Import records
    pub total_connections: usize,
}

/// `profile` view
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    /// Project sentence
    pub summary: String,
    /// Per-file entries
    pub files: Vec<DashboardFile>,
    /// Mermaid rendering
    pub architecture: String,
    /// Counters
    pub stats: DashboardStats,
}

/// Architecture counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArchitectureStats {
    /// Code files
    pub total_files: usize,
    /// Files in frontend categories
    pub frontend_files: usize,
    /// Files in backend categories
    pub backend_files: usize,
    /// Import records
    pub total_imports: usize,
    /// Export names
    pub total_exports: usize,
}

/// `architecture` view
#[derive(Debug, Clone, Serialize)]
pub struct ArchitectureView {
    /// Locator
    pub repo: String,
    /// Project sentence
    pub project_summary: String,
    /// Structured summary
    pub project_details: ProjectSummary,
    /// Profiles of the first files in discovery order
    pub key_files: IndexMap<String, RoleProfile>,
    /// Resolved dependencies per file
    pub dependency_graph: IndexMap<String, Vec<String>>,
    /// Mermaid rendering
    pub mermaid_diagram: String,
    /// Counters
    pub architecture_stats: ArchitectureStats,
}

/// Runs analyses against repositories using the configured collaborators
pub struct Analyzer {
    config: Config,
    git: GitCli,
    log: Box<dyn CommitLog>,
    diffs: Box<dyn DiffSource>,
}

impl Analyzer {
    /// Analyzer backed by `git` and the GitHub API
    pub fn new(config: Config) -> Result<Self> {
        let git = GitCli::new(&config.cache_dir);
        let diffs = GitHubClient::new(&config.remote)?;
        Ok(Self {
            log: Box::new(git.clone()),
            diffs: Box::new(diffs),
            git,
            config,
        })
    }

    /// Analyzer with substitute commit-log and diff collaborators
    pub fn with_collaborators(config: Config, log: Box<dyn CommitLog>, diffs: Box<dyn DiffSource>) -> Self {
        Self {
            git: GitCli::new(&config.cache_dir),
            config,
            log,
            diffs,
        }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn scan_config(&self) -> ScanConfig {
        self.config.analysis.scan_config()
    }

    fn diagram_options(&self) -> DiagramOptions {
        DiagramOptions {
            max_nodes: self.config.analysis.diagram_max_nodes,
            max_edges: self.config.analysis.diagram_max_edges,
            format: DiagramFormat::Mermaid,
        }
    }

    /// Resolve a locator to a local working copy and hosting coordinates
    pub fn open(&self, locator: &str) -> Result<Repository> {
        let path = self.git.ensure_local_copy(locator)?;
        let coordinates = owner_and_repo(locator).ok().or_else(|| {
            self.git
                .remote_url(&path)
                .and_then(|url| owner_and_repo(&url).ok())
        });
        let (owner, name) = coordinates.map_or((None, None), |(o, r)| (Some(o), Some(r)));
        Ok(Repository {
            locator: locator.to_string(),
            path,
            owner,
            name,
        })
    }

    fn commits(&self, repo: &Repository, limit: Option<usize>) -> Result<Vec<CommitRecord>> {
        let mut commits = self.log.commit_log(&repo.path)?;
        if let Some(limit) = limit {
            commits.truncate(limit);
        }
        Ok(commits)
    }

    fn evolution_of(&self, repo: &Repository, commits: &[CommitRecord], token: Option<&str>) -> Result<FileEvolution> {
        let (owner, name) = repo.coordinates()?;
        Ok(build_evolution(
            self.diffs.as_ref(),
            owner,
            name,
            commits,
            token,
            self.config.analysis.fetch_concurrency,
        ))
    }

    /// Commit log and evolution used as context; failures degrade to empty
    fn history_context(&self, repo: &Repository, limit: usize, token: Option<&str>) -> (usize, FileEvolution) {
        let commits = match self.commits(repo, None) {
            Ok(commits) => commits,
            Err(e) => {
                warn!("No commit history for {}: {}", repo.locator, e);
                return (0, FileEvolution::new());
            }
        };
        let total = commits.len();
        let prefix = &commits[..limit.min(total)];
        match self.evolution_of(repo, prefix, token) {
            Ok(evolution) => (total, evolution),
            Err(e) => {
                warn!("No file evolution for {}: {}", repo.locator, e);
                (total, FileEvolution::new())
            }
        }
    }

    /// Commits, module counts and a tree preview
    pub fn overview(&self, repo: &Repository) -> Result<Overview> {
        let commits = self.commits(repo, Some(OVERVIEW_COMMITS))?;
        let mut tree = directory_tree(&repo.path, &self.scan_config())?;
        let modules = detect_modules(&tree);
        tree.truncate(OVERVIEW_FILES);
        Ok(Overview {
            repo: repo.locator.clone(),
            commits,
            modules,
            files: tree,
        })
    }

    /// Project summary and its sentence
    pub fn project(&self, repo: &Repository) -> Result<ProjectView> {
        let details = summarize_with(&repo.path, &self.scan_config())?;
        Ok(ProjectView {
            repo: repo.locator.clone(),
            summary: summary_sentence(&details),
            details,
        })
    }

    /// Dependency graph of the working copy
    pub fn graph(&self, repo: &Repository) -> Result<DependencyGraph> {
        DependencyGraph::build(&repo.path, &self.scan_config())
    }

    /// Dependency graph with counts and diagram
    pub fn dependencies(&self, repo: &Repository) -> Result<DependencyView> {
        let graph = self.graph(repo)?;
        let mermaid_diagram = render(&graph, &self.diagram_options());
        Ok(DependencyView {
            repo: repo.locator.clone(),
            total_files: graph.node_count(),
            total_imports: graph.tallies.imports,
            total_exports: graph.tallies.exports,
            internal_imports: graph.tallies.internal,
            external_imports: graph.tallies.external,
            edges: graph.edges(),
            files: graph.files,
            mermaid_diagram,
        })
    }

    /// Diagram text with explicit options
    pub fn diagram(&self, repo: &Repository, options: &DiagramOptions) -> Result<String> {
        Ok(render(&self.graph(repo)?, options))
    }

    /// Evolution map and lifecycle statistics of the first commits
    pub fn evolution(&self, repo: &Repository, token: Option<&str>) -> Result<EvolutionView> {
        let (owner, name) = repo.coordinates()?;
        let commits = self.commits(repo, Some(self.config.analysis.evolution_commit_limit))?;
        let file_evolution = self.evolution_of(repo, &commits, token)?;
        Ok(EvolutionView {
            repo: repo.locator.clone(),
            owner: owner.to_string(),
            repo_name: name.to_string(),
            total_files_tracked: file_evolution.len(),
            lifecycle_stats: lifecycle_stats(&file_evolution),
            file_evolution,
        })
    }

    /// Timeline of one file
    pub fn history(&self, repo: &Repository, filename: &str, token: Option<&str>) -> Result<HistoryView> {
        let commits = self.commits(repo, Some(self.config.analysis.evolution_commit_limit))?;
        let evolution = self.evolution_of(repo, &commits, token)?;
        let history = file_history(&evolution, filename).to_vec();
        Ok(HistoryView {
            repo: repo.locator.clone(),
            filename: filename.to_string(),
            total_changes: history.len(),
            history,
        })
    }

    /// Symbols of one file
    pub fn symbols(&self, repo: &Repository, file: &str) -> Result<SymbolsView> {
        let path = resolve_in(&repo.path, file)?;
        Ok(SymbolsView {
            file: file.to_string(),
            symbols: extract_symbols(&path)?,
        })
    }

    /// Prose summaries of one file's symbols
    pub fn summaries(&self, repo: &Repository, file: &str, summarizer: &dyn SymbolSummarizer) -> Result<SummariesView> {
        let view = self.symbols(repo, file)?;
        Ok(SummariesView {
            summaries: summarize_all(summarizer, &view.symbols),
            file: view.file,
        })
    }

    /// Role profiles of the files touched by the first commits
    pub fn file_roles(&self, repo: &Repository, token: Option<&str>) -> Result<RolesView> {
        let commits = self.commits(repo, Some(self.config.analysis.roles_commit_limit))?;
        let evolution = self.evolution_of(repo, &commits, token)?;

        let file_roles: IndexMap<String, RoleProfile> = evolution
            .iter()
            .filter(|(path, _)| repo.path.join(path.as_str()).is_file())
            .map(|(path, events)| (path.clone(), classify(&repo.path, path, events)))
            .collect();

        Ok(RolesView {
            repo: repo.locator.clone(),
            total_files_analyzed: file_roles.len(),
            file_roles,
        })
    }

    /// Dashboard payload: summary, per-file entries, diagram and counters
    pub fn profile(&self, repo: &Repository, token: Option<&str>) -> Result<Dashboard> {
        info!("Profiling {}", repo.locator);
        let details = summarize_with(&repo.path, &self.scan_config())?;
        let graph = self.graph(repo)?;
        let (total_commits, evolution) = self.history_context(repo, self.config.analysis.profile_commit_limit, token);

        let files: Vec<DashboardFile> = graph
            .paths()
            .map(|path| {
                let events = file_history(&evolution, path);
                let profile = classify(&repo.path, path, events);
                DashboardFile {
                    name: file_name(path).to_string(),
                    path: path.to_string(),
                    role: profile.role_sentence,
                    connections: graph
                        .dependencies_of(path)
                        .into_iter()
                        .map(|dep| file_name(dep).to_string())
                        .collect(),
                    commit_history: events.iter().take(DASHBOARD_HISTORY).map(HistoryEntry::from).collect(),
                    summary: profile.summary,
                }
            })
            .collect();

        Ok(Dashboard {
            summary: summary_sentence(&details),
            stats: DashboardStats {
                total_files: files.len(),
                total_commits,
                total_connections: graph.tallies.imports,
            },
            architecture: render(&graph, &self.diagram_options()),
            files,
        })
    }

    /// Architecture overview: summary, key file roles, graph and counters
    pub fn architecture(&self, repo: &Repository, token: Option<&str>) -> Result<ArchitectureView> {
        info!("Building architecture overview of {}", repo.locator);
        let details = summarize_with(&repo.path, &self.scan_config())?;
        let graph = self.graph(repo)?;
        let (_, evolution) = self.history_context(repo, self.config.analysis.roles_commit_limit, token);

        let key_files = graph
            .paths()
            .take(ARCHITECTURE_KEY_FILES)
            .map(|path| (path.to_string(), classify(&repo.path, path, file_history(&evolution, path))))
            .collect();

        let dependency_graph = graph
            .paths()
            .map(|path| {
                let deps = graph.dependencies_of(path).into_iter().map(str::to_string).collect();
                (path.to_string(), deps)
            })
            .collect();

        let categories = || graph.files.values().map(|node| node.file.category);
        Ok(ArchitectureView {
            repo: repo.locator.clone(),
            project_summary: summary_sentence(&details),
            project_details: details,
            key_files,
            dependency_graph,
            mermaid_diagram: render(&graph, &self.diagram_options()),
            architecture_stats: ArchitectureStats {
                total_files: graph.node_count(),
                frontend_files: categories().filter(|c| c.is_frontend()).count(),
                backend_files: categories().filter(|c| c.is_backend()).count(),
                total_imports: graph.tallies.imports,
                total_exports: graph.tallies.exports,
            },
        })
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Join a repo-relative path, refusing anything that is not an existing file
/// inside `root` (no `..`, absolute paths or symlinks leading out)
fn resolve_in(root: &Path, rel: &str) -> Result<PathBuf> {
    let path = root.join(rel);
    let relative = Path::new(rel)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    let contained = relative
        && match (root.canonicalize(), path.canonicalize()) {
            (Ok(root), Ok(target)) => target.starts_with(root),
            _ => false,
        };
    if contained && path.is_file() {
        Ok(path)
    } else {
        Err(LoreError::FileNotFound(path))
    }
}
