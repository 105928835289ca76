//! Benchmarks for document rendering.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use incipit::document::render_markdown;
use incipit::theme::Theme;

fn bench_render_dark(c: &mut Criterion) {
    let md = include_str!("../tests/fixtures/sample.md");
    c.bench_function("render_dark", |b| {
        b.iter(|| render_markdown(black_box(md), Theme::Dark, black_box(80)))
    });
}

fn bench_render_notty(c: &mut Criterion) {
    let md = include_str!("../tests/fixtures/sample.md");
    c.bench_function("render_notty", |b| {
        b.iter(|| render_markdown(black_box(md), Theme::NoTty, black_box(80)))
    });
}

criterion_group!(benches, bench_render_dark, bench_render_notty);
criterion_main!(benches);
