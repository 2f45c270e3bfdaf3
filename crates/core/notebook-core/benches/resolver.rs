//! Resolver benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use notebook_core::*;

fn benchmark_resolve(c: &mut Criterion) {
    let resolver = ResponseResolver::builtin();

    c.bench_function("resolve_first_entry", |b| {
        let query = ChatQuery::new("What is machine learning?");
        b.iter(|| resolver.resolve(black_box(&query)))
    });

    c.bench_function("resolve_fallback", |b| {
        let query = ChatQuery::new("Tell me about quantum gravity and string theory");
        b.iter(|| resolver.resolve(black_box(&query)))
    });
}

fn benchmark_query_length(c: &mut Criterion) {
    let resolver = ResponseResolver::builtin();
    let mut group = c.benchmark_group("lookup_by_query_length");

    for words in [4, 64, 512].iter() {
        let text = "zebra ".repeat(*words);
        let query = ChatQuery::new(text);
        group.bench_with_input(BenchmarkId::from_parameter(words), &query, |b, query| {
            b.iter(|| resolver.lookup(black_box(query)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_resolve, benchmark_query_length);
criterion_main!(benches);
