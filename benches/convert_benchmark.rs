//! Benchmarks for structmd analysis and conversion.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic documents mixing headings, lists and
//! paragraphs.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use structmd::{Converter, StructureAnalyzer};

/// Creates a synthetic document with the given number of chapters.
fn create_test_text(chapters: usize) -> String {
    let mut text = String::new();
    for i in 1..=chapters {
        text.push_str(&format!("第{}章 概述\n", i));
        text.push_str("本章介绍系统的整体设计思路，以及各模块之间的关系和约束条件。\n");
        text.push_str(&format!("{}.1 背景介绍\n", i));
        text.push_str("- 数据量持续增长\n- 响应时间要求更高\n  - 峰值\n");
        text.push_str("1. 收集需求\n2. 设计方案\n3. 实施验证\n\n");
    }
    text
}

/// Benchmark uncached structure analysis at various sizes.
fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");

    for chapters in [1, 10, 100].iter() {
        let text = create_test_text(*chapters);
        let lines: Vec<&str> = text.split('\n').collect();

        group.bench_function(format!("{}_chapters", chapters), |b| {
            b.iter_batched(
                StructureAnalyzer::new,
                |analyzer| analyzer.analyze(black_box(&lines)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark cold and warm conversion.
fn bench_conversion(c: &mut Criterion) {
    let text = create_test_text(10);

    c.bench_function("convert_cold", |b| {
        b.iter_batched(
            Converter::new,
            |converter| converter.convert_format(black_box(&text), "markdown"),
            BatchSize::SmallInput,
        );
    });

    let converter = Converter::new();
    let _ = converter.convert_format(&text, "markdown");
    c.bench_function("convert_cached", |b| {
        b.iter(|| converter.convert_format(black_box(&text), "markdown"));
    });
}

criterion_group!(benches, bench_analysis, bench_conversion);
criterion_main!(benches);
