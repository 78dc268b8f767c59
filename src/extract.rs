// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Import and export extraction
//!
//! Matching is regex based over raw text, not grammar aware. Imports inside
//! comments or strings may be reported, and unusual constructs may be missed.
//! Every function here is total: empty or garbled input yields empty lists.

use crate::language::{Capture, LanguageFamily, Pattern};
use crate::types::ImportRecord;
use std::collections::HashSet;

/// Import records of a file, pattern by pattern in table order
#[must_use]
pub fn extract_imports(content: &str, family: LanguageFamily) -> Vec<ImportRecord> {
    let Some(table) = family.patterns() else {
        return Vec::new();
    };

    table
        .imports
        .iter()
        .flat_map(|pattern| captures(pattern, content))
        .map(|module| ImportRecord::classify(&module))
        .collect()
}

/// Export-like names: explicit exports for JS/TS, top-level `def`/`class` for Python
#[must_use]
pub fn extract_exports(content: &str, family: LanguageFamily) -> Vec<String> {
    let Some(table) = family.patterns() else {
        return Vec::new();
    };

    table
        .exports
        .iter()
        .flat_map(|pattern| {
            captures(pattern, content)
                .into_iter()
                .filter(move |name| pattern.capture != Capture::Single || !table.export_stopwords.contains(&name.as_str()))
        })
        .collect()
}

/// Bare imported module names, deduplicated in first-seen order, at most `cap`
#[must_use]
pub fn extract_dependency_names(content: &str, family: LanguageFamily, cap: usize) -> Vec<String> {
    let Some(table) = family.patterns() else {
        return Vec::new();
    };

    let names = table
        .dependencies
        .iter()
        .flat_map(|re| re.captures_iter(content).filter_map(|c| c.get(1)).map(|m| m.as_str().to_string()));
    dedup_capped(names, cap)
}

/// Function names followed by class names, deduplicated, at most `cap`
#[must_use]
pub fn extract_key_symbols(content: &str, family: LanguageFamily, cap: usize) -> Vec<String> {
    let Some(table) = family.patterns() else {
        return Vec::new();
    };

    let names = table
        .functions
        .iter()
        .chain(table.classes.iter())
        .flat_map(|re| re.captures_iter(content).filter_map(|c| c.get(1)).map(|m| m.as_str().to_string()));
    dedup_capped(names, cap)
}

fn captures(pattern: &Pattern, content: &str) -> Vec<String> {
    let mut out = Vec::new();
    for caps in pattern.regex.captures_iter(content) {
        let Some(raw) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };
        match pattern.capture {
            Capture::Single => {
                let value = raw.trim();
                if !value.is_empty() {
                    out.push(value.to_string());
                }
            }
            Capture::ImportList => out.extend(split_list(raw, false)),
            Capture::ExportList => out.extend(split_list(raw, true)),
        }
    }
    out
}

/// Split `a, b as c` lists; `keep_alias` picks the name after `as`
fn split_list(raw: &str, keep_alias: bool) -> Vec<String> {
    raw.split(',')
        .filter_map(|item| {
            let mut words = item.split_whitespace();
            let first = words.next()?;
            let name = match (words.next(), words.next()) {
                (Some("as"), Some(alias)) if keep_alias => alias,
                _ => first,
            };
            Some(name.to_string())
        })
        .collect()
}

fn dedup_capped(names: impl Iterator<Item = String>, cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    names.filter(|n| seen.insert(n.clone())).take(cap).collect()
}
