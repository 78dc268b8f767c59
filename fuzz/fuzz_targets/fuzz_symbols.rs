// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use libfuzzer_sys::fuzz_target;
use repolore::language::LanguageFamily;
use repolore::symbols::extract_symbols_from_source;

fuzz_target!(|source: &str| {
    let line_count = source.lines().count();
    for symbol in extract_symbols_from_source(source, LanguageFamily::PyLike) {
        assert!(symbol.start_line >= 1 && symbol.start_line <= line_count);
        assert!(!symbol.name.is_empty());
    }
});
