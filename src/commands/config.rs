// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config command - prints the effective configuration

use super::Output;
use crate::config::{default_config_path, Config};
use anyhow::{Context, Result};

const REDACTED: &str = "<redacted>";

/// Print the effective configuration, credentials masked
pub fn run(out: &Output, config: &Config, show_path: bool) -> Result<()> {
    if show_path {
        match default_config_path() {
            Some(path) => println!("{}", path.display()),
            None => println!("No config directory available on this platform"),
        }
        return Ok(());
    }

    let masked = redacted(config);
    if out.is_json() {
        return out.print_json(&masked);
    }

    let text = toml::to_string_pretty(&masked).context("Failed to render configuration")?;
    print!("{text}");
    Ok(())
}

fn redacted(config: &Config) -> Config {
    let mut masked = config.clone();
    if masked.remote.token.is_some() {
        masked.remote.token = Some(REDACTED.to_string());
    }
    if masked.summarizer.api_key.is_some() {
        masked.summarizer.api_key = Some(REDACTED.to_string());
    }
    masked
}
