// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Function and class symbols of one source file
//!
//! Python blocks are delimited by indentation: a symbol's code runs from its
//! `def`/`class` line through every following line that is blank or indented
//! deeper. Signatures spanning several lines are followed through their
//! brackets. JS/TS symbols carry only their declaring line.

use crate::error::{LoreError, Result};
use crate::language::LanguageFamily;
use crate::types::{Symbol, SymbolKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

static PY_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([ \t]*)(?:async[ \t]+)?(def|class)[ \t]+([A-Za-z_]\w*)").expect("static symbol pattern must compile")
});

static JS_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?(?:function\*?\s+([A-Za-z_$][\w$]*)|(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*(?:async\s+)?(?:function\b|\([^)]*\)\s*=>|[A-Za-z_$][\w$]*\s*=>))",
    )
    .expect("static symbol pattern must compile")
});

static JS_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:default\s+)?class\s+([A-Za-z_$][\w$]*)").expect("static symbol pattern must compile")
});

/// Extract symbols from a file on disk
pub fn extract_symbols(path: &Path) -> Result<Vec<Symbol>> {
    if !path.is_file() {
        return Err(LoreError::FileNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    Ok(extract_symbols_from_source(&content, LanguageFamily::from_path(&path.to_string_lossy())))
}

/// Extract symbols from source text, in source order
#[must_use]
pub fn extract_symbols_from_source(content: &str, family: LanguageFamily) -> Vec<Symbol> {
    match family {
        LanguageFamily::PyLike => python_symbols(content),
        LanguageFamily::JsLike => js_symbols(content),
        LanguageFamily::Other => Vec::new(),
    }
}

fn python_symbols(content: &str) -> Vec<Symbol> {
    let lines: Vec<&str> = content.lines().collect();
    let mut symbols = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let Some(caps) = PY_HEADER.captures(line) else {
            continue;
        };
        let indent = indentation(line);
        let kind = if &caps[2] == "class" { SymbolKind::Class } else { SymbolKind::Function };
        let header_end = header_end(&lines, index);
        let block_end = block_end(&lines, header_end, indent);

        let mut code = lines[index].trim_start().to_string();
        for body_line in &lines[index + 1..=block_end] {
            code.push('\n');
            code.push_str(body_line);
        }

        symbols.push(Symbol {
            kind,
            name: caps[3].to_string(),
            start_line: index + 1,
            docstring: docstring(&lines, header_end, block_end),
            code,
        });
    }
    symbols
}

fn js_symbols(content: &str) -> Vec<Symbol> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let (kind, name) = if let Some(caps) = JS_CLASS.captures(line) {
                (SymbolKind::Class, caps.get(1)?.as_str())
            } else {
                let caps = JS_FUNCTION.captures(line)?;
                (SymbolKind::Function, caps.get(1).or_else(|| caps.get(2))?.as_str())
            };
            Some(Symbol {
                kind,
                name: name.to_string(),
                start_line: index + 1,
                docstring: None,
                code: line.trim().to_string(),
            })
        })
        .collect()
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Last line of a header whose brackets may span several lines
fn header_end(lines: &[&str], start: usize) -> usize {
    let mut depth: i32 = 0;
    for (index, line) in lines.iter().enumerate().skip(start) {
        for c in line.chars() {
            match c {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                '#' => break,
                _ => {}
            }
        }
        if depth <= 0 {
            return index;
        }
    }
    lines.len().saturating_sub(1)
}

/// Last non-blank line indented deeper than `indent` after the header
fn block_end(lines: &[&str], header_end: usize, indent: usize) -> usize {
    let mut end = header_end;
    for (index, line) in lines.iter().enumerate().skip(header_end + 1) {
        if line.trim().is_empty() {
            continue;
        }
        if indentation(line) <= indent {
            break;
        }
        end = index;
    }
    end
}

fn docstring(lines: &[&str], header_end: usize, block_end: usize) -> Option<String> {
    let (offset, first) = lines
        .iter()
        .enumerate()
        .take(block_end + 1)
        .skip(header_end + 1)
        .find(|(_, l)| !l.trim().is_empty())?;

    let trimmed = first.trim_start();
    let unprefixed = trimmed.trim_start_matches(['r', 'R', 'u', 'U']);
    let quote = ["\"\"\"", "'''", "\"", "'"].into_iter().find(|q| unprefixed.starts_with(q))?;
    let opened = &unprefixed[quote.len()..];

    if let Some(close) = opened.find(quote) {
        return Some(clean_docstring(&opened[..close]));
    }
    if quote.len() == 1 {
        return None;
    }

    let mut raw = opened.to_string();
    for line in &lines[offset + 1..=block_end] {
        raw.push('\n');
        if let Some(close) = line.find(quote) {
            raw.push_str(&line[..close]);
            return Some(clean_docstring(&raw));
        }
        raw.push_str(line);
    }
    None
}

/// Strip the common margin and surrounding blank lines of a docstring
fn clean_docstring(raw: &str) -> String {
    let expanded = raw.replace('\t', "        ");
    let lines: Vec<&str> = expanded.lines().collect();
    let margin = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| indentation(l))
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, l)| {
            if i == 0 {
                l.trim_start()
            } else {
                // only ASCII indentation is cut, so the slice stays on a char boundary
                &l[indentation(l).min(margin)..]
            }
        })
        .map(str::trim_end)
        .collect();

    while cleaned.first().is_some_and(|l| l.is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|l| l.is_empty()) {
        cleaned.pop();
    }
    cleaned.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICE: &str = r#"import os


class AuthService:
    """Handles logins.

    Tokens are cached.
    """

    def login(self, user):
        '''Log a user in.'''
        return token(user)


async def refresh(
    token,
    ttl=30,
):
    return token


def bare():
    pass
"#;

    #[test]
    fn test_python_symbols_in_source_order() {
        let symbols = extract_symbols_from_source(SERVICE, LanguageFamily::PyLike);
        let names: Vec<_> = symbols.iter().map(|s| (s.kind, s.name.as_str(), s.start_line)).collect();
        assert_eq!(
            names,
            vec![
                (SymbolKind::Class, "AuthService", 4),
                (SymbolKind::Function, "login", 10),
                (SymbolKind::Function, "refresh", 15),
                (SymbolKind::Function, "bare", 22),
            ]
        );
    }

    #[test]
    fn test_python_docstrings() {
        let symbols = extract_symbols_from_source(SERVICE, LanguageFamily::PyLike);
        assert_eq!(symbols[0].docstring.as_deref(), Some("Handles logins.\n\nTokens are cached."));
        assert_eq!(symbols[1].docstring.as_deref(), Some("Log a user in."));
        assert_eq!(symbols[2].docstring, None);
    }

    #[test]
    fn test_python_code_segments() {
        let symbols = extract_symbols_from_source(SERVICE, LanguageFamily::PyLike);
        assert_eq!(
            symbols[1].code,
            "def login(self, user):\n        '''Log a user in.'''\n        return token(user)"
        );
        assert!(symbols[0].code.ends_with("return token(user)"));
        assert_eq!(symbols[2].code, "async def refresh(\n    token,\n    ttl=30,\n):\n    return token");
        assert_eq!(symbols[3].code, "def bare():\n    pass");
    }

    #[test]
    fn test_docstring_with_unicode_blank_line() {
        let src = "def f():\n    \"\"\"Doc\n x\n\u{a0}\n \"\"\"\n    return 1\n";
        let symbols = extract_symbols_from_source(src, LanguageFamily::PyLike);
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "f");
        assert_eq!(symbols[0].docstring.as_deref(), Some("Doc\nx"));
    }

    #[test]
    fn test_docstring_keeps_unicode_indented_text() {
        assert_eq!(clean_docstring("Doc\n    a\n  \u{3000}b"), "Doc\n  a\n\u{3000}b");
    }

    #[test]
    fn test_js_symbols() {
        let src = "export default function App() {}\nconst handler = async (req) => {};\nclass Store {}\nlet x = 5;\n";
        let symbols = extract_symbols_from_source(src, LanguageFamily::JsLike);
        let names: Vec<_> = symbols.iter().map(|s| (s.kind, s.name.as_str())).collect();
        assert_eq!(
            names,
            vec![
                (SymbolKind::Function, "App"),
                (SymbolKind::Function, "handler"),
                (SymbolKind::Class, "Store"),
            ]
        );
        assert_eq!(symbols[2].start_line, 3);
    }

    #[test]
    fn test_other_family_is_empty() {
        assert!(extract_symbols_from_source("fn main() {}", LanguageFamily::Other).is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = extract_symbols(Path::new("/definitely/not/here.py")).unwrap_err();
        assert!(matches!(err, LoreError::FileNotFound(_)));
    }

    #[test]
    fn test_extract_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("auth.py");
        fs::write(&path, "def login():\n    return True\n").unwrap();
        let symbols = extract_symbols(&path).unwrap();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "login");
    }
}
