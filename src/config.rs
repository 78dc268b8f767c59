// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Layers, lowest first: built-in defaults, a TOML file (the `--config` path,
//! or `config.toml` in the platform config directory when present), then
//! `REPOLORE__SECTION__KEY` environment variables. `GITHUB_TOKEN` and
//! `OPENAI_API_KEY` fill the credentials when nothing else set them.

use crate::error::Result;
use crate::scanner::ScanConfig;
use ::config::{Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory that remote repositories are cloned into
    pub cache_dir: PathBuf,
    /// Hosting API used for per-commit diff stats
    pub remote: RemoteConfig,
    /// Chat completion endpoint used for symbol summaries
    pub summarizer: SummarizerConfig,
    /// Limits and filters of the analysis views
    pub analysis: AnalysisConfig,
}

/// Hosting API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// API base URL
    pub api_base: String,
    /// Access token for higher rate limits
    pub token: Option<String>,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Summarizer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Base URL of an OpenAI-compatible API
    pub endpoint: String,
    /// Bearer key
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
}

/// Analysis limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Commits fetched for the evolution and history views
    pub evolution_commit_limit: usize,
    /// Commits fetched for the dashboard profile
    pub profile_commit_limit: usize,
    /// Commits fetched for the file-roles view
    pub roles_commit_limit: usize,
    /// Parallel diff fetches (1 = sequential)
    pub fetch_concurrency: usize,
    /// Node cap of rendered diagrams
    pub diagram_max_nodes: usize,
    /// Edge cap of rendered diagrams
    pub diagram_max_edges: usize,
    /// Extra exclusion globs for file discovery
    pub exclude: Vec<String>,
    /// Discovery depth below the repository root (0 = unlimited)
    pub max_depth: usize,
    /// Follow symbolic links during discovery
    pub follow_symlinks: bool,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "hyperpolymath", "repolore")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: project_dirs()
                .map(|d| d.cache_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".repolore-cache")),
            remote: RemoteConfig::default(),
            summarizer: SummarizerConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            token: None,
            user_agent: concat!("repolore/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4-turbo".to_string(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            evolution_commit_limit: 50,
            profile_commit_limit: 30,
            roles_commit_limit: 20,
            fetch_concurrency: 1,
            diagram_max_nodes: 20,
            diagram_max_edges: 30,
            exclude: Vec::new(),
            max_depth: 0,
            follow_symlinks: false,
        }
    }
}

impl AnalysisConfig {
    /// Walk settings for file discovery
    #[must_use]
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            max_depth: self.max_depth,
            follow_symlinks: self.follow_symlinks,
            exclude: self.exclude.clone(),
        }
    }
}

/// Default location of the config file
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.toml"))
}

/// Load configuration from defaults, an optional file and the environment
pub fn load(path: Option<&Path>) -> Result<Config> {
    let mut builder = ::config::Config::builder().add_source(::config::Config::try_from(&Config::default())?);

    match path {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }
        None => {
            if let Some(default) = default_config_path() {
                builder = builder.add_source(File::from(default).required(false));
            }
        }
    }

    let mut config: Config = builder
        .add_source(Environment::with_prefix("REPOLORE").separator("__").try_parsing(true))
        .build()?
        .try_deserialize()?;

    config.apply_env_fallbacks(|key| std::env::var(key).ok());
    Ok(config)
}

impl Config {
    /// Fill unset credentials from the conventional environment variables
    fn apply_env_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.remote.token.is_none() {
            self.remote.token = lookup("GITHUB_TOKEN").filter(|t| !t.is_empty());
        }
        if self.summarizer.api_key.is_none() {
            self.summarizer.api_key = lookup("OPENAI_API_KEY").filter(|k| !k.is_empty());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.analysis.evolution_commit_limit, 50);
        assert_eq!(config.analysis.profile_commit_limit, 30);
        assert_eq!(config.analysis.roles_commit_limit, 20);
        assert_eq!(config.analysis.fetch_concurrency, 1);
        assert_eq!(config.analysis.diagram_max_nodes, 20);
        assert_eq!(config.analysis.diagram_max_edges, 30);
        assert_eq!(config.remote.api_base, "https://api.github.com");

        let scan = config.analysis.scan_config();
        assert_eq!(scan.max_depth, 0);
        assert!(!scan.follow_symlinks);
    }

    #[test]
    fn test_walk_settings_reach_scan_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("repolore.toml");
        fs::write(&path, "[analysis]\nmax_depth = 2\nfollow_symlinks = true\n").unwrap();

        let scan = load(Some(&path)).unwrap().analysis.scan_config();
        assert_eq!(scan.max_depth, 2);
        assert!(scan.follow_symlinks);
        assert!(scan.exclude.is_empty());
    }

    #[test]
    fn test_load_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("repolore.toml");
        fs::write(
            &path,
            "cache_dir = \"/tmp/lore\"\n\n[analysis]\nfetch_concurrency = 4\nexclude = [\"**/gen/**\"]\n",
        )
        .unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/lore"));
        assert_eq!(config.analysis.fetch_concurrency, 4);
        assert_eq!(config.analysis.diagram_max_nodes, 20);
        assert_eq!(config.analysis.scan_config().exclude, vec!["**/gen/**"]);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(load(Some(Path::new("/definitely/not/here.toml"))).is_err());
    }

    #[test]
    fn test_env_fallbacks() {
        let mut config = Config::default();
        config.apply_env_fallbacks(|key| match key {
            "GITHUB_TOKEN" => Some("gh".to_string()),
            "OPENAI_API_KEY" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.remote.token.as_deref(), Some("gh"));
        assert_eq!(config.summarizer.api_key, None);

        config.remote.token = Some("explicit".to_string());
        config.apply_env_fallbacks(|_| Some("other".to_string()));
        assert_eq!(config.remote.token.as_deref(), Some("explicit"));
    }
}
