// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! File role classification
//!
//! A file's role combines four signals: its extension and directory
//! (category), keyword tables over its name, directory and first commit
//! message (role sentence), its non-blank line count (complexity), and a
//! regex pass over its content (dependencies and key symbols).

use crate::extract::{extract_dependency_names, extract_key_symbols};
use crate::language::{extension_of, LanguageFamily};
use crate::types::{Complexity, FileCategory, FileChangeEvent, RoleProfile};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Role sentence used when no rule matches
pub const FALLBACK_ROLE: &str = "Contains application logic and functionality";

/// Maximum number of dependencies in a role profile
pub const MAX_DEPENDENCIES: usize = 10;

/// Maximum number of key symbols in a role profile
pub const MAX_KEY_SYMBOLS: usize = 5;

/// A keyword test against a lowercase string
#[derive(Debug, Clone, Copy)]
enum Token {
    Contains(&'static str),
    Prefix(&'static str),
    Suffix(&'static str),
    Exact(&'static str),
}

impl Token {
    fn matches(self, haystack: &str) -> bool {
        match self {
            Self::Contains(t) => haystack.contains(t),
            Self::Prefix(t) => haystack.starts_with(t),
            Self::Suffix(t) => haystack.ends_with(t),
            Self::Exact(t) => haystack == t,
        }
    }
}

/// Any token matching selects the sentence
struct Rule {
    tokens: &'static [Token],
    sentence: &'static str,
}

impl Rule {
    fn matches(&self, haystack: &str) -> bool {
        self.tokens.iter().any(|t| t.matches(haystack))
    }
}

use Token::{Contains as C, Exact as E, Prefix as P, Suffix as S};

/// Filename rules: specific tokens first, then general ones
const FILENAME_RULES: &[Rule] = &[
    Rule {
        tokens: &[C("gnn"), C("model"), C("ml"), C("nn"), C("cnn"), C("rnn"), C("lstm"), C("bert"), C("transformer")],
        sentence: "Implements machine learning or neural network model",
    },
    Rule { tokens: &[C("train")], sentence: "Training script for machine learning models" },
    Rule { tokens: &[C("predict"), C("inference")], sentence: "Performs prediction or inference using models" },
    Rule { tokens: &[C("data"), C("dataset")], sentence: "Processes or loads datasets" },
    Rule { tokens: &[C("graph")], sentence: "Processes graph structures or graph data" },
    Rule { tokens: &[C("utils"), C("helper")], sentence: "Provides utility functions and helpers" },
    Rule {
        tokens: &[C("config"), S(".yaml"), S(".yml"), S(".json")],
        sentence: "Configuration file for project settings",
    },
    Rule { tokens: &[E("main.py"), E("app.py"), E("run.py")], sentence: "Runs the main application or server" },
    Rule { tokens: &[S(".sh"), S(".bat")], sentence: "Shell or batch script for automation" },
    Rule { tokens: &[S(".md")], sentence: "Documentation file" },
    Rule { tokens: &[S(".ipynb")], sentence: "Jupyter notebook for experiments or analysis" },
    Rule { tokens: &[S(".test.py"), P("test_")], sentence: "Test file for validating code functionality" },
    Rule {
        tokens: &[C("auth"), C("login"), C("register"), C("jwt"), C("token")],
        sentence: "Handles user authentication and authorization",
    },
    Rule {
        tokens: &[C("schema"), C("database"), C("db"), C("orm")],
        sentence: "Defines data models and database schema",
    },
    Rule {
        tokens: &[C("api"), C("route"), C("endpoint"), C("controller")],
        sentence: "Exposes API endpoints and handles requests",
    },
    Rule {
        tokens: &[C("button"), C("form"), C("modal"), C("card"), C("header"), C("footer")],
        sentence: "Renders UI component for user interaction",
    },
    Rule { tokens: &[C("settings"), C("env")], sentence: "Manages application configuration and settings" },
    Rule { tokens: &[C("common"), C("shared")], sentence: "Provides utility functions and shared logic" },
    Rule {
        tokens: &[C("store"), C("state"), C("redux"), C("context")],
        sentence: "Manages application state and data flow",
    },
    Rule { tokens: &[C("test"), C("spec")], sentence: "Contains tests for application functionality" },
    Rule {
        tokens: &[C("readme"), C("docs"), C("guide")],
        sentence: "Provides documentation and usage instructions",
    },
];

const DIRECTORY_RULES: &[Rule] = &[
    Rule { tokens: &[C("auth")], sentence: "Handles authentication and user management" },
    Rule { tokens: &[C("api")], sentence: "Exposes REST API endpoints" },
    Rule { tokens: &[C("components")], sentence: "Renders reusable UI components" },
    Rule { tokens: &[C("pages")], sentence: "Defines application pages and views" },
    Rule { tokens: &[C("services")], sentence: "Contains business logic and external service integrations" },
    Rule { tokens: &[C("utils")], sentence: "Provides utility functions and helpers" },
];

const COMMIT_RULES: &[Rule] = &[
    Rule {
        tokens: &[C("add auth"), C("login"), C("authentication")],
        sentence: "Handles user authentication",
    },
    Rule { tokens: &[C("add api"), C("endpoint"), C("route")], sentence: "Exposes API functionality" },
    Rule {
        tokens: &[C("add component"), C("ui"), C("interface")],
        sentence: "Renders user interface elements",
    },
];

/// Category from extension and directory, first matching rule wins
#[must_use]
pub fn categorize(path: &str) -> FileCategory {
    let ext = extension_of(path);
    let dir = parent_dir(path).to_lowercase();
    let dir_has = |needles: &[&str]| needles.iter().any(|n| dir.contains(n));

    match ext.as_str() {
        "jsx" | "tsx" | "js" | "ts" | "vue" | "svelte" => {
            if dir_has(&["components", "pages", "views", "ui"]) {
                FileCategory::UiComponent
            } else if dir_has(&["hooks", "utils", "helpers"]) {
                FileCategory::FrontendUtility
            } else if dir_has(&["store", "state", "redux"]) {
                FileCategory::StateManagement
            } else {
                FileCategory::FrontendLogic
            }
        }
        "py" => {
            if dir_has(&["api", "routes", "endpoints"]) {
                FileCategory::ApiEndpoint
            } else if dir_has(&["models", "schemas"]) {
                FileCategory::DataModel
            } else if dir_has(&["services", "business"]) {
                FileCategory::BusinessLogic
            } else if dir_has(&["utils", "helpers"]) {
                FileCategory::BackendUtility
            } else {
                FileCategory::BackendLogic
            }
        }
        "json" | "yaml" | "yml" | "toml" | "env" => FileCategory::Configuration,
        "md" | "txt" | "rst" => FileCategory::Documentation,
        _ if ["test_", ".test.", ".spec."].iter().any(|m| path.to_lowercase().contains(m)) => FileCategory::Test,
        "css" | "scss" | "sass" | "less" => FileCategory::Styling,
        _ => FileCategory::Other,
    }
}

/// Role sentence from filename, directory and the first commit message
#[must_use]
pub fn role_sentence(path: &str, history: &[FileChangeEvent]) -> &'static str {
    let filename = file_name(path).to_lowercase();
    let dir = parent_dir(path).to_lowercase();

    if let Some(rule) = FILENAME_RULES.iter().find(|r| r.matches(&filename)) {
        return rule.sentence;
    }
    if let Some(rule) = DIRECTORY_RULES.iter().find(|r| r.matches(&dir)) {
        return rule.sentence;
    }
    if let Some(first) = history.first() {
        let message = first.message.to_lowercase();
        if let Some(rule) = COMMIT_RULES.iter().find(|r| r.matches(&message)) {
            return rule.sentence;
        }
    }
    FALLBACK_ROLE
}

/// Classify a file from its path and (optional) content
#[must_use]
pub fn classify_content(path: &str, content: Option<&str>, history: &[FileChangeEvent]) -> RoleProfile {
    let category = categorize(path);
    let role = role_sentence(path, history);
    let family = LanguageFamily::from_path(path);

    let (complexity, dependencies, key_symbols) = match content {
        Some(text) => (
            Complexity::from_non_blank_lines(text.lines().filter(|l| !l.trim().is_empty()).count()),
            extract_dependency_names(text, family, MAX_DEPENDENCIES),
            extract_key_symbols(text, family, MAX_KEY_SYMBOLS),
        ),
        None => (Complexity::Low, Vec::new(), Vec::new()),
    };

    let filename = file_name(path);
    let summary = if role == FALLBACK_ROLE {
        format!("{filename} – {category}")
    } else {
        format!("{filename} – {role}")
    };

    RoleProfile {
        category,
        role_sentence: role.to_string(),
        complexity,
        dependencies,
        key_symbols,
        summary,
    }
}

/// Classify the file at `root/rel_path`; unreadable content degrades to path-only signals
#[must_use]
pub fn classify(root: &Path, rel_path: &str, history: &[FileChangeEvent]) -> RoleProfile {
    let content = match fs::read_to_string(root.join(rel_path)) {
        Ok(content) => Some(content),
        Err(e) => {
            debug!("Classifying {} from its path only: {}", rel_path, e);
            None
        }
    };
    classify_content(rel_path, content.as_deref(), history)
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}
