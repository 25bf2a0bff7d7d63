//! Compilation benchmarks.
//!
//! The truth table doubles with every literal, so compile time is dominated
//! by the number of distinct integers rather than by the expression length.
//!
//! Run with:
//! ```bash
//! cargo bench --bench compile
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use qint_rs::compile::Compiler;
use qint_rs::limits::Limits;

/// `1 & 2 | 3 & 4 | ...` over `n` literals.
fn alternating(n: u32) -> String {
    (1..=n)
        .map(|i| i.to_string())
        .enumerate()
        .fold(String::new(), |mut acc, (i, lit)| {
            if i > 0 {
                acc.push_str(if i % 2 == 1 { " & " } else { " | " });
            }
            acc.push_str(&lit);
            acc
        })
}

fn bench_literal_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/literals");
    let compiler = Compiler::new(Limits::permissive());

    for n in [2u32, 4, 8, 12, 16] {
        let expr = alternating(n);
        group.throughput(Throughput::Elements(1 << n));
        group.bench_with_input(BenchmarkId::new("alternating", n), &expr, |b, expr| {
            b.iter(|| compiler.compile(expr, false, false));
        });
    }

    group.finish();
}

fn bench_parse_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/parse");
    let compiler = Compiler::new(Limits::permissive());

    for depth in [16usize, 64, 256] {
        let expr = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        group.bench_with_input(BenchmarkId::new("nested", depth), &expr, |b, expr| {
            b.iter(|| compiler.parse(expr).map(|result| result.symbols.len()));
        });
    }

    for n in [16u32, 256, 1024] {
        let expr = alternating(n);
        group.bench_with_input(BenchmarkId::new("wide", n), &expr, |b, expr| {
            b.iter(|| compiler.parse(expr).map(|result| result.symbols.len()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_literal_count, bench_parse_only);
criterion_main!(benches);
