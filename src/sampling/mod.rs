//! Coverage capping by windowed reservoir sampling.
//!
//! [`Downsampler`] walks a coordinate-sorted alignment stream, splits each
//! reference into windows and keeps a uniformly sampled, capacity-bounded
//! subset of the records falling in each window.

mod config;
mod downsampler;
mod reservoir;
mod sort_order;

pub use config::{
    CoverageTarget, DownsampleConfig, DEFAULT_COVERAGE, DEFAULT_READ_LENGTH, DEFAULT_WINDOW_SIZE,
};
pub use downsampler::{downsample, Downsampler, DownsampleSummary, WindowState};
pub use reservoir::WindowReservoir;
pub use sort_order::{SortOrderValidator, SortOrderViolation};

use thiserror::Error;

use crate::alignment::AlignmentIoError;

/// Errors that abort a downsampling run.
#[derive(Debug, Error)]
pub enum DownsampleError {
    /// Input violated the coordinate-sorted precondition.
    #[error(transparent)]
    Unsorted(#[from] SortOrderViolation),

    /// Reading or writing alignments failed.
    #[error("alignment I/O failed: {0}")]
    Io(#[from] AlignmentIoError),

    /// Parameters cannot produce a window capacity.
    #[error("invalid downsampling configuration: {0}")]
    InvalidConfig(String),
}
