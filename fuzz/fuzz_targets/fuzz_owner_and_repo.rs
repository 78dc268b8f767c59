// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use libfuzzer_sys::fuzz_target;
use repolore::forge::owner_and_repo;

fuzz_target!(|data: &[u8]| {
    if let Ok(locator) = std::str::from_utf8(data) {
        if let Ok((owner, repo)) = owner_and_repo(locator) {
            assert!(!owner.is_empty());
            assert!(!repo.is_empty());
        }
    }
});
