#![no_main]

use jspat_core::ParserOptions;
use jspat_core::parser::ast::SourceType;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the configuration, the rest is source text.
    let Some((&mode, rest)) = data.split_first() else {
        return;
    };
    let Ok(source) = std::str::from_utf8(rest) else {
        return;
    };

    let mut options = ParserOptions::default();
    if mode & 1 == 1 {
        options = options.with_source_type(SourceType::Module);
    }
    if mode & 2 == 2 {
        options = options.with_plugin_names(&["capture"]).unwrap();
    }

    // Any input must produce a tree or an error, never a panic.
    if let Ok(program) = jspat_core::parse(source, &options) {
        assert!(program.loc.end.offset <= source.len());
    }
    let _ = jspat_core::parse_expression(source, &options);
});
