//! # Coverage capping for coordinate-sorted BAM files
//!
//! This library downsamples alignments so that output coverage never exceeds
//! a target, either constant or read from a per-position coverage profile.
//!
//! ## Core Algorithm
//!
//! 1. **Windowing**: each reference is cut into windows of `window_size`
//!    bases; a window opens at the first record past the previous one
//! 2. **Capacity**: a window keeps at most
//!    `coverage * window_size / read_length` records
//! 3. **Reservoir sampling**: records in a window are sampled uniformly into
//!    a fixed-size reservoir, so memory is bounded by the capacity
//! 4. **Flush**: the reservoir is written out on every window or reference
//!    change and at end of stream
//!
//! Unmapped, secondary, supplementary and QC-fail records are dropped.
//!
//! ## Usage Example
//!
//! ```ignore
//! use readcap::{downsample, BamSource, DownsampleConfig, open_bam_sink};
//!
//! let mut source = BamSource::open("sorted.bam")?;
//! let mut sink = open_bam_sink("capped.bam", source.header())?;
//! let summary = downsample(&mut source, &mut sink, DownsampleConfig::fixed(30, 7))?;
//! assert!(summary.records_written <= summary.records_read);
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod alignment; // Record model and BAM streams
pub mod profile; // Coverage profile loading
pub mod sampling; // Windowed reservoir downsampling

pub use alignment::{
    open_bam_sink, Alignment, AlignmentIoError, AlignmentRecord, AlignmentSink, AlignmentSource,
    BamAlignment, BamSink, BamSource, MemorySource, SamFlags,
};
pub use profile::{CoverageProfile, ProfileError, UNCONSTRAINED_COVERAGE};
pub use sampling::{
    downsample, CoverageTarget, DownsampleConfig, DownsampleError, DownsampleSummary, Downsampler,
    SortOrderViolation, WindowReservoir, WindowState,
};
