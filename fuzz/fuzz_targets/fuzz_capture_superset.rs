#![no_main]

use jspat_core::ParserOptions;
use jspat_core::plugins::capture::CapturePlugin;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    // Capture syntax is the one place the two grammars may disagree.
    if source.contains("{{") {
        return;
    }

    // Only code the base grammar accepts has to parse the same way.
    let Ok(plain) = jspat_core::parse(source, &ParserOptions::default()) else {
        return;
    };
    let options = ParserOptions::default().with_plugin(CapturePlugin);
    match jspat_core::parse(source, &options) {
        Ok(extended) => assert_eq!(format!("{plain:?}"), format!("{extended:?}")),
        Err(err) => panic!("capture plugin rejected valid code: {err}"),
    }
});
