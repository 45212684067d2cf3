//! Position-dependent coverage targets.
//!
//! A profile maps each chromosome to a dense array of target coverages,
//! expanded from an interval file (see [`CoverageProfile::from_reader`]).
//! Positions no interval covered carry no constraint.

mod parser;

pub use parser::ProfileError;

use std::collections::HashMap;

use thiserror::Error;

/// Coverage used where the profile imposes no constraint.
pub const UNCONSTRAINED_COVERAGE: u32 = 10_000_000;

/// Value of positions never covered by an interval. A zero coverage from the
/// file is indistinguishable from it, and both mean "no constraint".
const UNSET: u32 = 0;

/// An interval end too large to allocate a coverage array for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("interval end {end} is too large to allocate")]
pub struct IntervalTooLarge {
    /// Requested interval end.
    pub end: usize,
}

/// Per-chromosome target coverage arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageProfile {
    chromosomes: HashMap<String, Vec<u32>>,
    intervals: usize,
}

impl CoverageProfile {
    /// Create an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `[start, end)` on `chrom` to `coverage`, overwriting earlier values.
    ///
    /// The backing array doubles to `2 * end` whenever it is too short. Fails
    /// when that array cannot be allocated.
    pub fn insert(
        &mut self,
        chrom: &str,
        start: usize,
        end: usize,
        coverage: u32,
    ) -> Result<(), IntervalTooLarge> {
        let positions = self.chromosomes.entry(chrom.to_owned()).or_default();
        if positions.len() < end {
            let grown = end.checked_mul(2).ok_or(IntervalTooLarge { end })?;
            positions
                .try_reserve_exact(grown - positions.len())
                .map_err(|_| IntervalTooLarge { end })?;
            positions.resize(grown, UNSET);
        }
        positions[start..end].fill(coverage);
        self.intervals += 1;
        Ok(())
    }

    /// Target coverage at `pos`, or `None` where the profile is silent.
    ///
    /// Zero-valued positions are reported as `None` as well.
    pub fn coverage_at(&self, chrom: &str, pos: usize) -> Option<u32> {
        let value = *self.chromosomes.get(chrom)?.get(pos)?;
        (value != UNSET).then_some(value)
    }

    /// Target coverage at `pos`, falling back to [`UNCONSTRAINED_COVERAGE`].
    pub fn target_coverage(&self, chrom: &str, pos: usize) -> u32 {
        self.coverage_at(chrom, pos).unwrap_or(UNCONSTRAINED_COVERAGE)
    }

    /// Whether any interval was loaded for `chrom`.
    pub fn contains_chromosome(&self, chrom: &str) -> bool {
        self.chromosomes.contains_key(chrom)
    }

    /// Number of chromosomes with at least one interval.
    pub fn num_chromosomes(&self) -> usize {
        self.chromosomes.len()
    }

    /// Number of intervals applied.
    pub fn num_intervals(&self) -> usize {
        self.intervals
    }

    /// Allocated array length for `chrom`.
    pub fn allocated_len(&self, chrom: &str) -> Option<usize> {
        self.chromosomes.get(chrom).map(Vec::len)
    }
}
