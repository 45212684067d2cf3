//! Downsampling parameters.

use std::sync::Arc;

use crate::profile::CoverageProfile;

use super::DownsampleError;

/// Default read length used to convert coverage into a read count.
pub const DEFAULT_READ_LENGTH: u32 = 200;
/// Default window size in bases.
pub const DEFAULT_WINDOW_SIZE: u32 = 200;
/// Default constant target coverage.
pub const DEFAULT_COVERAGE: u32 = 100;

/// Where the per-window target coverage comes from.
#[derive(Debug, Clone)]
pub enum CoverageTarget {
    /// Same target everywhere.
    Fixed(u32),
    /// Target looked up at each window start.
    Profile(Arc<CoverageProfile>),
}

impl CoverageTarget {
    /// Target coverage for a window opening at `window_start` on `chrom`.
    pub fn coverage_at(&self, chrom: &str, window_start: i64) -> u32 {
        match self {
            CoverageTarget::Fixed(coverage) => *coverage,
            CoverageTarget::Profile(profile) => {
                // Negative starts only occur on unplaced records, which never
                // reach a reservoir; treat them like any silent position.
                let pos = usize::try_from(window_start).unwrap_or(usize::MAX);
                profile.target_coverage(chrom, pos)
            }
        }
    }
}

/// Parameters for one downsampling run.
#[derive(Debug, Clone)]
pub struct DownsampleConfig {
    /// Expected read length in bases.
    pub read_length: u32,
    /// Window size in bases.
    pub window_size: u32,
    /// Target coverage source.
    pub target: CoverageTarget,
    /// Seed for the sampling random generator.
    pub seed: u64,
}

impl DownsampleConfig {
    /// Validate and build a configuration.
    pub fn new(
        read_length: u32,
        window_size: u32,
        target: CoverageTarget,
        seed: u64,
    ) -> Result<Self, DownsampleError> {
        if read_length == 0 {
            return Err(DownsampleError::InvalidConfig(
                "read length must be positive".to_string(),
            ));
        }
        if window_size == 0 {
            return Err(DownsampleError::InvalidConfig(
                "window size must be positive".to_string(),
            ));
        }
        Ok(Self {
            read_length,
            window_size,
            target,
            seed,
        })
    }

    /// Constant-coverage configuration with default read length and window.
    pub fn fixed(coverage: u32, seed: u64) -> Self {
        Self {
            read_length: DEFAULT_READ_LENGTH,
            window_size: DEFAULT_WINDOW_SIZE,
            target: CoverageTarget::Fixed(coverage),
            seed,
        }
    }

    /// Profile-driven configuration with default read length and window.
    pub fn with_profile(profile: CoverageProfile, seed: u64) -> Self {
        Self {
            read_length: DEFAULT_READ_LENGTH,
            window_size: DEFAULT_WINDOW_SIZE,
            target: CoverageTarget::Profile(Arc::new(profile)),
            seed,
        }
    }

    /// Reads kept per window for a given target coverage:
    /// `floor(coverage * window_size / read_length)`.
    pub fn capacity_for(&self, coverage: u32) -> usize {
        let reads = u64::from(coverage) * u64::from(self.window_size)
            / u64::from(self.read_length.max(1));
        usize::try_from(reads).unwrap_or(usize::MAX)
    }

    /// Capacity of a window opening at `window_start` on `chrom`.
    pub fn window_capacity(&self, chrom: &str, window_start: i64) -> usize {
        self.capacity_for(self.target.coverage_at(chrom, window_start))
    }
}

impl Default for DownsampleConfig {
    fn default() -> Self {
        Self::fixed(DEFAULT_COVERAGE, 0)
    }
}
