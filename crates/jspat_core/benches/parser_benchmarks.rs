use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use jspat_core::ParserOptions;
use jspat_core::parser::plugin::PluginSet;
use jspat_core::parser::scanner::Scanner;
use jspat_core::plugins::capture::CapturePlugin;

const PLAIN: &str = r#"
"use strict";
function fib(n) {
    if (n < 2) { return n; }
    return fib(n - 1) + fib(n - 2);
}
const cache = new Map();
class Counter extends Base {
    #count = 0;
    static create(...args) { return new Counter(...args); }
    get value() { return this.#count; }
    increment(by = 1) { this.#count += by; return this; }
}
for (const [key, { value, label = `item ${key}` }] of entries) {
    cache.set(key, value ?? label);
}
const total = items.filter((x) => x.active).map(({ price }) => price).reduce((a, b) => a + b, 0);
"#;

const TEMPLATE: &str = r#"
function {{name}}({{...params}}) {
    {{...body}}
}
const {{result}} = {{callee}}({{...args}});
if ({{test}}) { {{consequent}}; } else { {{...alternate}} }
const { {{key}}: {{value}} } = {{object}};
let [{{...elements}}] = {{source}}, {{...rest}};
"#;

fn large(source: &str) -> String {
    source.repeat(64)
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

fn bench_scanner(c: &mut Criterion) {
    let plain = large(PLAIN);
    let template = large(TEMPLATE);
    let mut group = c.benchmark_group("scan");
    group.throughput(Throughput::Bytes(plain.len() as u64));

    group.bench_function("plain_base", |b| {
        b.iter(|| Scanner::new(black_box(&plain)).collect_tokens());
    });
    group.bench_function("plain_with_capture", |b| {
        b.iter(|| {
            Scanner::with_plugins(black_box(&plain), PluginSet::default().with(CapturePlugin))
                .collect_tokens()
        });
    });
    group.throughput(Throughput::Bytes(template.len() as u64));
    group.bench_function("template_with_capture", |b| {
        b.iter(|| {
            Scanner::with_plugins(black_box(&template), PluginSet::default().with(CapturePlugin))
                .collect_tokens()
        });
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn bench_parser(c: &mut Criterion) {
    let plain = large(PLAIN);
    let template = large(TEMPLATE);
    let base = ParserOptions::default();
    let capture = ParserOptions::default().with_plugin(CapturePlugin);
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(plain.len() as u64));

    group.bench_function("plain_base", |b| {
        b.iter(|| jspat_core::parse(black_box(&plain), &base));
    });
    // Hook dispatch overhead on code that never takes a capture branch.
    group.bench_function("plain_with_capture", |b| {
        b.iter(|| jspat_core::parse(black_box(&plain), &capture));
    });
    group.throughput(Throughput::Bytes(template.len() as u64));
    group.bench_function("template_with_capture", |b| {
        b.iter(|| jspat_core::parse(black_box(&template), &capture));
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// Group & main
// ---------------------------------------------------------------------------

criterion_group!(benches, bench_scanner, bench_parser);
criterion_main!(benches);
