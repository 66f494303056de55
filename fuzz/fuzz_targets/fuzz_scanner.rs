#![no_main]

use jspat_core::parser::plugin::PluginSet;
use jspat_core::parser::scanner::{Scanner, TokenKind};
use jspat_core::plugins::capture::CapturePlugin;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    for plugins in [PluginSet::default(), PluginSet::default().with(CapturePlugin)] {
        let mut scanner = Scanner::with_plugins(source, plugins);
        let mut last_end = 0;
        // Errors are fine; panics and non-advancing tokens are not.
        while let Ok(token) = scanner.next_token() {
            if token.kind == TokenKind::Eof {
                break;
            }
            assert!(token.span.start.offset >= last_end, "tokens overlap");
            assert!(token.span.end.offset > token.span.start.offset, "empty token");
            assert!(source.is_char_boundary(token.span.end.offset));
            last_end = token.span.end.offset;
        }
    }
});
