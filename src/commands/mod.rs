// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod analyze;
pub mod architecture;
pub mod completions;
pub mod config;
pub mod deps;
pub mod diagram;
pub mod evolution;
pub mod history;
pub mod profile;
pub mod roles;
pub mod summarize;
pub mod summary;
pub mod symbols;

use crate::config::Config;
use crate::pipeline::{Analyzer, Repository};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;

/// How command results are printed
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
    color: bool,
}

impl Output {
    /// Output mode from the global flags
    #[must_use]
    pub fn new(json: bool, color: bool) -> Self {
        Self { json, color }
    }

    /// True when payloads are printed as JSON
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Print a payload as pretty JSON
    pub fn print_json<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        println!("{text}");
        Ok(())
    }

    /// Section title
    #[must_use]
    pub fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().cyan().to_string()
        } else {
            text.to_string()
        }
    }

    /// Paths and names
    #[must_use]
    pub fn accent(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    /// Secondary details
    #[must_use]
    pub fn muted(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Build the analyzer and resolve the locator
pub(crate) fn open(config: Config, locator: &str) -> Result<(Analyzer, Repository)> {
    let analyzer = Analyzer::new(config).context("Failed to set up the analyzer")?;
    let repo = analyzer
        .open(locator)
        .with_context(|| format!("Failed to open {locator}"))?;
    Ok((analyzer, repo))
}

/// First line of a commit message
pub(crate) fn subject(message: &str) -> &str {
    message.lines().next().unwrap_or_default()
}

/// Abbreviated commit hash
pub(crate) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
