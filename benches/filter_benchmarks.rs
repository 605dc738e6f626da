//! Benchmarks for filter evaluation over large cached snapshots.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use file_discovery::discovery::filter::CompiledFilters;
use file_discovery::discovery::types::{Filter, Resource};

fn create_resources(n: usize) -> Vec<Resource> {
    (0..n)
        .map(|i| Resource {
            name: format!("host-{i}"),
            ip: "10.1.1.1".to_string(),
            port: 80,
            labels: [("index".to_string(), i.to_string())].into_iter().collect(),
        })
        .collect()
}

/// Scan cost of a compiled filter list across snapshot sizes.
fn bench_filter_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_matching");
    group.sample_size(10);

    for num_resources in [100, 10_000, 1_000_000] {
        let resources = create_resources(num_resources);
        let filters = [Filter {
            key: "name".to_string(),
            value: "host-1.*".to_string(),
        }];
        let compiled = CompiledFilters::compile(&filters).unwrap();

        group.throughput(Throughput::Elements(num_resources as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_resources),
            &resources,
            |b, resources| {
                b.iter(|| {
                    let matched = resources.iter().filter(|r| compiled.matches(r)).count();
                    black_box(matched)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_filter_matching);
criterion_main!(benches);
