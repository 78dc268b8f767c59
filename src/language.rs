// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Language families and their source pattern tables
//!
//! Behaviour that depends on the language of a file is selected by
//! [`LanguageFamily`]. Each family owns one [`PatternTable`]; adding a family
//! means adding a variant and a table, nothing else.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Language family of a source file, derived from its extension only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageFamily {
    /// JavaScript and TypeScript
    JsLike,
    /// Python
    PyLike,
    /// Discovered, but no extraction is attempted
    Other,
}

impl LanguageFamily {
    /// Family for a lowercase extension without the dot
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "js" | "jsx" | "ts" | "tsx" => Self::JsLike,
            "py" => Self::PyLike,
            _ => Self::Other,
        }
    }

    /// Family for a path
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        Self::from_extension(&extension_of(path))
    }

    /// Pattern table, `None` for [`LanguageFamily::Other`]
    pub(crate) fn patterns(self) -> Option<&'static PatternTable> {
        match self {
            Self::JsLike => Some(&JS_PATTERNS),
            Self::PyLike => Some(&PY_PATTERNS),
            Self::Other => None,
        }
    }
}

/// Lowercase extension of a path, without the dot
#[must_use]
pub fn extension_of(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// What capture group 1 of a pattern holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Capture {
    /// One name or module reference
    Single,
    /// Comma separated modules, `a as b` keeps `a`
    ImportList,
    /// Comma separated names, `a as b` keeps `b`
    ExportList,
}

pub(crate) struct Pattern {
    pub regex: Regex,
    pub capture: Capture,
}

impl Pattern {
    fn new(re: &str, capture: Capture) -> Self {
        Self {
            regex: Regex::new(re).expect("static source pattern must compile"),
            capture,
        }
    }
}

/// Regex tables for one language family
pub(crate) struct PatternTable {
    /// Import statements, evaluated pattern by pattern
    pub imports: Vec<Pattern>,
    /// Export-like declarations
    pub exports: Vec<Pattern>,
    /// Keywords a `Single` export capture must not be
    pub export_stopwords: &'static [&'static str],
    /// Bare module names for role profiles
    pub dependencies: Vec<Regex>,
    /// Function names for role profiles
    pub functions: Vec<Regex>,
    /// Class names for role profiles
    pub classes: Vec<Regex>,
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static source pattern must compile")
}

static JS_PATTERNS: Lazy<PatternTable> = Lazy::new(|| PatternTable {
    imports: vec![
        Pattern::new(r#"\bimport\s+[\w*{}\s,$]+?\s+from\s+['"]([^'"]+)['"]"#, Capture::Single),
        Pattern::new(r#"\bexport\s+[\w*{}\s,$]+?\s+from\s+['"]([^'"]+)['"]"#, Capture::Single),
        Pattern::new(r#"\brequire\s*\(\s*['"]([^'"]+)['"]\s*\)"#, Capture::Single),
        Pattern::new(r#"\bimport\s+['"]([^'"]+)['"]"#, Capture::Single),
        Pattern::new(r#"\bimport\s*\(\s*['"]([^'"]+)['"]\s*\)"#, Capture::Single),
    ],
    exports: vec![
        Pattern::new(
            r"\bexport\s+(?:default\s+)?(?:async\s+)?(?:function\*?|class|const|let|var|interface|type|enum)\s+([A-Za-z_$][\w$]*)",
            Capture::Single,
        ),
        Pattern::new(r"\bexport\s*\{([^}]*)\}", Capture::ExportList),
        Pattern::new(r"\bexport\s+default\s+([A-Za-z_$][\w$]*)", Capture::Single),
    ],
    export_stopwords: &["function", "class", "async", "const", "let", "var", "interface", "type", "enum", "new"],
    dependencies: vec![
        re(r#"\bimport\s+(?:\{[^}]*\}|\*\s+as\s+\w+|\w+)\s+from\s+['"]([^'"]+)['"]"#),
        re(r#"\brequire\s*\(\s*['"]([^'"]+)['"]"#),
    ],
    functions: vec![re(r"\b(?:function|const|let|var)\s+(\w+)\s*[=(]")],
    classes: vec![re(r"\bclass\s+(\w+)")],
});

static PY_PATTERNS: Lazy<PatternTable> = Lazy::new(|| PatternTable {
    imports: vec![
        Pattern::new(r"(?m)^[ \t]*from[ \t]+(\.*[A-Za-z_][\w.]*|\.+)[ \t]+import\b", Capture::Single),
        Pattern::new(r"(?m)^[ \t]*import[ \t]+([^\n#;]+)", Capture::ImportList),
    ],
    exports: vec![
        Pattern::new(r"(?m)^class\s+(\w+)", Capture::Single),
        Pattern::new(r"(?m)^(?:async\s+)?def\s+(\w+)", Capture::Single),
    ],
    export_stopwords: &[],
    dependencies: vec![re(r"\b(?:from|import)\s+([a-zA-Z_][a-zA-Z0-9_.]*)")],
    functions: vec![re(r"\bdef\s+(\w+)")],
    classes: vec![re(r"\bclass\s+(\w+)")],
});
