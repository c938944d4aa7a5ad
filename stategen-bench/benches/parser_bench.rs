//! Structural parser benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use stategen_core::{Formatter, GrammarPolicy, OutputMode, Parser};

fn flat_input(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            if i % 10 == 9 {
                format!("broken line {}", i)
            } else {
                format!("S{} --> S{} : step {}", i, i + 1, i)
            }
        })
        .collect()
}

fn nested_input(depth: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(depth * 3);
    for i in 0..depth {
        lines.push("{".to_string());
        lines.push(format!("S{} --> S{}", i, i + 1));
    }
    for _ in 0..depth {
        lines.push("}".to_string());
    }
    lines
}

fn bench_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_flat");
    let parser = Parser::new(GrammarPolicy::permissive()).unwrap();

    for size in [100, 1_000, 10_000] {
        let input = flat_input(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| black_box(parser.parse(input)))
        });
    }

    group.finish();
}

fn bench_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_nested");
    let parser = Parser::new(GrammarPolicy::permissive()).unwrap();

    for depth in [8, 256, 5_000, 50_000] {
        let input = nested_input(depth);
        group.throughput(Throughput::Elements(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &input, |b, input| {
            b.iter(|| black_box(parser.parse(input)))
        });
    }

    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");
    let parser = Parser::new(GrammarPolicy::permissive()).unwrap();
    let report = parser.parse(&flat_input(1_000));

    for mode in [OutputMode::Text, OutputMode::Csv, OutputMode::Json] {
        let formatter = Formatter::new(mode);
        group.bench_function(mode.to_string(), |b| {
            b.iter(|| black_box(formatter.format_report(&report).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_flat, bench_nested, bench_format);
criterion_main!(benches);
