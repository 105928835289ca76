//! Benchmarks for block extraction.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use incipit::document::{Placeholders, extract_code_blocks, extract_headings};

fn bench_extract_simple(c: &mut Criterion) {
    let md = "# Hello\n\n```go\nfmt.Println(1)\n```\n\nWorld";
    let tags = Placeholders::for_source(md);
    c.bench_function("extract_simple", |b| {
        b.iter(|| {
            let (prose, _) = extract_code_blocks(black_box(md), &tags.code);
            extract_headings(&prose, &tags.heading)
        })
    });
}

fn bench_extract_medium(c: &mut Criterion) {
    let md = include_str!("../tests/fixtures/sample.md");
    c.bench_function("extract_medium", |b| {
        b.iter(|| {
            let tags = Placeholders::for_source(black_box(md));
            let (prose, _) = extract_code_blocks(md, &tags.code);
            extract_headings(&prose, &tags.heading)
        })
    });
}

criterion_group!(benches, bench_extract_simple, bench_extract_medium);
criterion_main!(benches);
