//! Builders shared by the integration tests.

#![allow(dead_code)]

use readcap::{
    downsample, Alignment, CoverageTarget, DownsampleConfig, DownsampleError, DownsampleSummary,
    MemorySource, SamFlags,
};

/// Mapped read of length 100 on reference `reference_id` (named `chr{id+1}`).
pub fn read(name: &str, reference_id: i32, start: i64) -> Alignment {
    let chrom = format!("chr{}", reference_id + 1);
    Alignment::new(name, reference_id, chrom, start, start + 100)
}

/// Same as [`read`] with the given flag bits.
pub fn flagged(name: &str, reference_id: i32, start: i64, bits: u16) -> Alignment {
    read(name, reference_id, start).with_flags(SamFlags(bits))
}

/// `count` reads named `{prefix}{i}` all starting at `start`.
pub fn stack(prefix: &str, reference_id: i32, start: i64, count: usize) -> Vec<Alignment> {
    (0..count)
        .map(|i| read(&format!("{prefix}{i}"), reference_id, start))
        .collect()
}

/// Constant-coverage configuration.
pub fn fixed_config(
    coverage: u32,
    window_size: u32,
    read_length: u32,
    seed: u64,
) -> DownsampleConfig {
    DownsampleConfig::new(read_length, window_size, CoverageTarget::Fixed(coverage), seed)
        .expect("valid configuration")
}

/// Downsample `records` into memory.
pub fn run(
    records: Vec<Alignment>,
    config: DownsampleConfig,
) -> Result<(Vec<Alignment>, DownsampleSummary), DownsampleError> {
    let mut source = MemorySource::new(records);
    let mut sink = Vec::new();
    let summary = downsample(&mut source, &mut sink, config)?;
    Ok((sink, summary))
}

/// Output read names, sorted for order-insensitive comparisons.
pub fn sorted_names(records: &[Alignment]) -> Vec<String> {
    let mut names: Vec<String> = records.iter().map(|r| r.name.to_string()).collect();
    names.sort();
    names
}
