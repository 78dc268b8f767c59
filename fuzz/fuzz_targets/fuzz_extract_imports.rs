// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use repolore::extract::{extract_exports, extract_imports};
use repolore::graph::DependencyGraph;
use repolore::language::LanguageFamily;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    python: bool,
    source: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    let (family, path) = if input.python {
        (LanguageFamily::PyLike, "pkg/mod.py")
    } else {
        (LanguageFamily::JsLike, "src/mod.js")
    };

    let imports = extract_imports(input.source, family);
    for import in &imports {
        assert_eq!(import.is_internal(), import.module.starts_with('.'));
    }
    let _ = extract_exports(input.source, family);

    let graph = DependencyGraph::from_sources([(path, input.source), ("pkg/other.py", input.source)]);
    assert_eq!(graph.tallies.imports, graph.tallies.internal + graph.tallies.external);
});
