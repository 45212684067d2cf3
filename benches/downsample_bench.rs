//! Throughput of the downsampling loop over an in-memory stream.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use readcap::{downsample, Alignment, CoverageProfile, DownsampleConfig, MemorySource};

fn deep_stream(depth: usize) -> Vec<Alignment> {
    let mut records = Vec::with_capacity(depth * 1_000);
    for start in 0..1_000i64 {
        for _ in 0..depth {
            records.push(Alignment::new("r", 0, "chr1", start * 10, start * 10 + 150));
        }
    }
    records
}

fn benchmark_downsample(c: &mut Criterion) {
    let records = deep_stream(50);

    c.bench_function("fixed_coverage_50x_to_30x", |b| {
        b.iter(|| {
            let mut source = MemorySource::new(records.clone());
            let mut sink = Vec::new();
            let summary =
                downsample(&mut source, &mut sink, DownsampleConfig::fixed(30, 7)).unwrap();
            black_box(summary);
        });
    });

    let mut profile = CoverageProfile::new();
    profile.insert("chr1", 0, 5_000, 10).unwrap();
    profile.insert("chr1", 5_000, 10_000, 40).unwrap();
    let profile_config = DownsampleConfig::with_profile(profile, 7);

    c.bench_function("profile_coverage_50x", |b| {
        b.iter(|| {
            let mut source = MemorySource::new(records.clone());
            let mut sink = Vec::new();
            let summary = downsample(&mut source, &mut sink, profile_config.clone()).unwrap();
            black_box(summary);
        });
    });
}

criterion_group!(benches, benchmark_downsample);
criterion_main!(benches);
