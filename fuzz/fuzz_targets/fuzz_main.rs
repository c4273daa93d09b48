// SPDX-License-Identifier: AGPL-3.0-or-later
#![no_main]

use libfuzzer_sys::fuzz_target;
use texfill_core::line::text_width;
use texfill_core::{format_str, FormatConfig, Settings};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let settings = Settings {
        text: FormatConfig {
            text_width: 20,
            ..FormatConfig::default()
        },
        ..Settings::default()
    };
    let formatted = match format_str(input, &settings) {
        Ok(formatted) => formatted,
        Err(e) => panic!("in-memory formatting failed: {e}"),
    };

    // Without commands nothing can change the width or turn fill off
    if !input.contains('\\') {
        for line in formatted.output.lines() {
            let body = line.trim_start_matches(' ');
            if body.contains(' ') {
                assert!(text_width(body) <= 20, "overfull line {line:?}");
            }
        }
    }
});
