// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error type for the analysis library

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the analysis pipeline and its collaborators
#[derive(Error, Debug)]
pub enum LoreError {
    /// The locator is not a recognized hosted-repository URL
    #[error("invalid repository locator: {0}")]
    InvalidLocator(String),

    /// A path supplied by the caller does not exist
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The forge API or summarizer could not be reached or answered badly
    #[error("remote service unavailable: {0}")]
    RemoteUnavailable(String),

    /// The git collaborator failed
    #[error("git error: {0}")]
    Git(String),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML decoding failure
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading failure
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

/// Result alias for library operations
pub type Result<T> = std::result::Result<T, LoreError>;
