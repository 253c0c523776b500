//! Benchmarks for the render pipeline and section reconciliation
//!
//! Run with: `cargo bench -p pagedigest-core`
//!
//! - Markdown → blocks for a large generated summary
//! - Chunking of one oversized paragraph
//! - Re-publishing a section into the in-memory store

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagedigest_core::markdown::{markdown_to_blocks, split_paragraph, DEFAULT_MAX_CHUNK_CHARS};
use pagedigest_core::{ContainerKind, InMemoryTreeStore, SummaryPublisher};
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Generate summary-style markdown with roughly `unit_count` logical units
fn generate_summary_markdown(unit_count: usize) -> String {
    let mut md = String::new();
    let sections = unit_count / 4;

    for i in 0..sections {
        let depth = (i % 4) + 1;
        md.push_str(&format!("{} 議題 {}\n\n", "#".repeat(depth), i + 1));
        md.push_str(&format!(
            "**担当:** 山田 *確認中* の項目 {}。詳細は `notes-{}` を参照。\n\n",
            i + 1,
            i + 1
        ));
        md.push_str(&format!("- 要点 {}\n", i + 1));
        md.push_str(&format!("1. 次のステップ {}\n\n", i + 1));
    }

    md
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let markdown = generate_summary_markdown(1000);
    group.bench_function("1000_units", |b| {
        b.iter(|| black_box(markdown_to_blocks(black_box(&markdown), DEFAULT_MAX_CHUNK_CHARS)))
    });

    let paragraph = "これは長い議事録の一文です。".repeat(2000);
    group.bench_function("split_28k_char_paragraph", |b| {
        b.iter(|| black_box(split_paragraph(black_box(&paragraph), DEFAULT_MAX_CHUNK_CHARS)))
    });

    group.finish();
}

fn bench_republish(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let markdown = generate_summary_markdown(200);

    let store = InMemoryTreeStore::with_root("page");
    let publisher = SummaryPublisher::new(Arc::new(store), DEFAULT_MAX_CHUNK_CHARS);

    let mut group = c.benchmark_group("publish");
    group.sample_size(20);

    group.bench_function("republish_200_units", |b| {
        b.iter(|| {
            rt.block_on(async {
                let report = publisher
                    .publish("page", ContainerKind::Callout, "Summary", &markdown)
                    .await
                    .unwrap();
                black_box(report)
            })
        })
    });

    group.finish();
}

criterion_group!(benches, bench_render, bench_republish);
criterion_main!(benches);
