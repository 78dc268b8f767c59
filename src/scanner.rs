// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Repository file discovery

use crate::error::{LoreError, Result};
use crate::language::extension_of;
use crate::types::{ModuleCount, TreeEntry};
use globset::{Glob, GlobSet, GlobSetBuilder};
use indexmap::IndexMap;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into (hidden directories are skipped as well)
pub const EXCLUDED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    "venv",
    ".venv",
    "dist",
    "build",
    "target",
];

/// Extensions that make a file a code file
pub const CODE_EXTENSIONS: &[&str] = &[
    // JavaScript/TypeScript
    "js", "jsx", "ts", "tsx", "vue", "svelte",
    // Python
    "py", "pyx", "pyi",
    // JVM
    "java", "kt", "scala",
    // Systems
    "go", "rs", "swift", "cs", "cpp", "cc", "cxx", "h", "hpp",
    // Scripting
    "rb", "php",
];

/// Extensions counted by module detection
const MODULE_EXTENSIONS: &[&str] = &["py", "js", "ts", "java", "cpp", "c", "go", "rs"];

/// Walk configuration
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Maximum depth below the root (0 = unlimited)
    pub max_depth: usize,
    /// Follow symbolic links
    pub follow_symlinks: bool,
    /// Extra glob patterns, matched against repo-relative paths
    pub exclude: Vec<String>,
}

impl ScanConfig {
    fn exclusion_set(&self) -> GlobSet {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => warn!("Ignoring invalid exclude pattern {}: {}", pattern, e),
            }
        }
        builder.build().unwrap_or_else(|e| {
            warn!("Ignoring exclude patterns: {}", e);
            GlobSet::empty()
        })
    }
}

/// True if the file name has an allow-listed code extension
#[must_use]
pub fn is_code_file(name: &str) -> bool {
    CODE_EXTENSIONS.contains(&extension_of(name).as_str())
}

/// Every non-excluded file below `root`, as sorted repo-relative paths
pub fn walk_files(root: &Path, config: &ScanConfig) -> Result<Vec<String>> {
    if !root.is_dir() {
        return Err(LoreError::FileNotFound(root.to_path_buf()));
    }

    let excluded = config.exclusion_set();
    let mut walker = WalkDir::new(root)
        .follow_links(config.follow_symlinks)
        .sort_by_file_name();
    if config.max_depth > 0 {
        walker = walker.max_depth(config.max_depth);
    }

    let mut files = Vec::new();
    for entry in walker.into_iter().filter_entry(|e| e.depth() == 0 || !is_skipped(e)) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(rel) = relative_path(root, entry.path()) else {
            continue;
        };
        if excluded.is_match(&rel) {
            debug!("Excluded by pattern: {}", rel);
            continue;
        }
        files.push(rel);
    }

    Ok(files)
}

/// Code files below `root`, in deterministic discovery order
pub fn discover_code_files(root: &Path, config: &ScanConfig) -> Result<Vec<String>> {
    let files: Vec<String> = walk_files(root, config)?
        .into_iter()
        .filter(|path| is_code_file(path))
        .collect();
    debug!("Discovered {} code files in {}", files.len(), root.display());
    Ok(files)
}

/// Flat listing of every file with its extension
pub fn directory_tree(root: &Path, config: &ScanConfig) -> Result<Vec<TreeEntry>> {
    Ok(walk_files(root, config)?
        .into_iter()
        .map(|path| TreeEntry {
            ext: extension_of(&path),
            path,
        })
        .collect())
}

/// Source file counts per top-level directory, in first-seen order
#[must_use]
pub fn detect_modules(tree: &[TreeEntry]) -> Vec<ModuleCount> {
    let mut modules: IndexMap<&str, usize> = IndexMap::new();
    for entry in tree.iter().filter(|e| MODULE_EXTENSIONS.contains(&e.ext.as_str())) {
        let top = entry.path.split('/').next().unwrap_or(entry.path.as_str());
        *modules.entry(top).or_insert(0) += 1;
    }
    modules
        .into_iter()
        .map(|(module, file_count)| ModuleCount {
            module: module.to_string(),
            file_count,
        })
        .collect()
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return true;
    }
    entry.file_type().is_dir() && EXCLUDED_DIRS.contains(&name.as_ref())
}

/// Repo-relative path with forward slashes
pub(crate) fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    (!joined.is_empty()).then_some(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x\n").unwrap();
    }

    #[test]
    fn test_discovery_skips_excluded_and_hidden() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/app.js");
        touch(dir.path(), "src/.hidden.js");
        touch(dir.path(), "node_modules/lib/index.js");
        touch(dir.path(), ".github/workflows/ci.py");
        touch(dir.path(), "venv/lib/site.py");
        touch(dir.path(), "README.md");
        touch(dir.path(), "server/main.py");

        let files = discover_code_files(dir.path(), &ScanConfig::default()).unwrap();
        assert_eq!(files, vec!["server/main.py", "src/app.js"]);
    }

    #[test]
    fn test_discovery_order_is_deterministic() {
        let dir = TempDir::new().unwrap();
        for name in ["b.py", "a.py", "c/d.ts", "c/a.ts"] {
            touch(dir.path(), name);
        }
        let first = discover_code_files(dir.path(), &ScanConfig::default()).unwrap();
        let second = discover_code_files(dir.path(), &ScanConfig::default()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec!["a.py", "b.py", "c/a.ts", "c/d.ts"]);
    }

    #[test]
    fn test_exclude_globs() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/gen/schema.py");
        touch(dir.path(), "src/app.py");
        let config = ScanConfig {
            exclude: vec!["**/gen/**".into(), "[".into()],
            ..Default::default()
        };
        let files = discover_code_files(dir.path(), &config).unwrap();
        assert_eq!(files, vec!["src/app.py"]);
    }

    #[test]
    fn test_missing_root() {
        let err = discover_code_files(Path::new("/definitely/not/here"), &ScanConfig::default()).unwrap_err();
        assert!(matches!(err, LoreError::FileNotFound(_)));
    }

    #[test]
    fn test_detect_modules() {
        let tree = vec![
            TreeEntry { path: "api/a.py".into(), ext: "py".into() },
            TreeEntry { path: "web/x.ts".into(), ext: "ts".into() },
            TreeEntry { path: "api/b.py".into(), ext: "py".into() },
            TreeEntry { path: "api/notes.md".into(), ext: "md".into() },
            TreeEntry { path: "setup.py".into(), ext: "py".into() },
        ];
        let modules = detect_modules(&tree);
        assert_eq!(modules.len(), 3);
        assert_eq!(modules[0], ModuleCount { module: "api".into(), file_count: 2 });
        assert_eq!(modules[1].module, "web");
        assert_eq!(modules[2].module, "setup.py");
    }
}
