//! Alignment stream abstractions consumed and produced by the downsampler.
//!
//! The sampler only needs a handful of record fields and two narrow stream
//! interfaces; the BAM backend and the in-memory types below both plug into
//! them.

mod bam;
mod types;

pub use bam::{open_bam_sink, BamAlignment, BamSink, BamSource};
pub use types::Alignment;

use std::collections::VecDeque;

use thiserror::Error;

/// SAM flag bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SamFlags(pub u16);

impl SamFlags {
    /// Segment unmapped (0x4).
    pub const UNMAPPED: u16 = 0x4;
    /// Secondary alignment (0x100).
    pub const SECONDARY: u16 = 0x100;
    /// Not passing quality controls (0x200).
    pub const QC_FAIL: u16 = 0x200;
    /// Supplementary alignment (0x800).
    pub const SUPPLEMENTARY: u16 = 0x800;

    const SAMPLING_EXCLUDED: u16 =
        Self::UNMAPPED | Self::SECONDARY | Self::QC_FAIL | Self::SUPPLEMENTARY;

    /// Whether every bit of `mask` is set.
    pub fn contains(self, mask: u16) -> bool {
        self.0 & mask == mask
    }

    /// Unmapped bit set.
    pub fn is_unmapped(self) -> bool {
        self.contains(Self::UNMAPPED)
    }

    /// Secondary bit set.
    pub fn is_secondary(self) -> bool {
        self.contains(Self::SECONDARY)
    }

    /// Supplementary bit set.
    pub fn is_supplementary(self) -> bool {
        self.contains(Self::SUPPLEMENTARY)
    }

    /// QC-fail bit set.
    pub fn is_qc_fail(self) -> bool {
        self.contains(Self::QC_FAIL)
    }

    /// Records with any of these bits never take part in coverage capping
    /// and are dropped from the output.
    pub fn is_excluded_from_sampling(self) -> bool {
        self.0 & Self::SAMPLING_EXCLUDED != 0
    }
}

/// Fields of an alignment record inspected while downsampling.
pub trait AlignmentRecord {
    /// Reference index, stable for all records of one reference.
    fn reference_id(&self) -> i32;
    /// Reference (chromosome) name.
    fn reference_name(&self) -> &str;
    /// 0-based inclusive start.
    fn start(&self) -> i64;
    /// 0-based exclusive end.
    fn end(&self) -> i64;
    /// Flag bits.
    fn flags(&self) -> SamFlags;
}

/// Errors raised by alignment readers and writers.
#[derive(Debug, Error)]
pub enum AlignmentIoError {
    /// Failure reported by htslib.
    #[error("htslib error: {0}")]
    Htslib(#[from] rust_htslib::errors::Error),

    /// Plain I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pull-based stream of alignment records.
pub trait AlignmentSource {
    /// Record type yielded by the source.
    type Record: AlignmentRecord;

    /// Next record, or `None` at end of stream.
    fn next_record(&mut self) -> Result<Option<Self::Record>, AlignmentIoError>;
}

/// Destination for records that survive downsampling.
pub trait AlignmentSink<R> {
    /// Write one record.
    fn write(&mut self, record: R) -> Result<(), AlignmentIoError>;

    /// Flush and release the destination.
    fn close(&mut self) -> Result<(), AlignmentIoError> {
        Ok(())
    }
}

impl<R> AlignmentSink<R> for Vec<R> {
    fn write(&mut self, record: R) -> Result<(), AlignmentIoError> {
        self.push(record);
        Ok(())
    }
}

/// Source replaying a prepared sequence of records.
#[derive(Debug, Clone)]
pub struct MemorySource<R> {
    records: VecDeque<R>,
}

impl<R> MemorySource<R> {
    /// Wrap the records in the order they should be yielded.
    pub fn new(records: impl IntoIterator<Item = R>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    /// Records not yet yielded.
    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

impl<R: AlignmentRecord> AlignmentSource for MemorySource<R> {
    type Record = R;

    fn next_record(&mut self) -> Result<Option<R>, AlignmentIoError> {
        Ok(self.records.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excluded_flags_cover_all_four_bits() {
        for bit in [
            SamFlags::UNMAPPED,
            SamFlags::SECONDARY,
            SamFlags::QC_FAIL,
            SamFlags::SUPPLEMENTARY,
        ] {
            assert!(SamFlags(bit).is_excluded_from_sampling(), "{bit:#x}");
        }
        // paired + proper pair + reverse + first in pair
        assert!(!SamFlags(0x1 | 0x2 | 0x10 | 0x40).is_excluded_from_sampling());
        assert!(SamFlags(0x1 | SamFlags::SUPPLEMENTARY).is_supplementary());
    }

    #[test]
    fn memory_source_yields_in_order() {
        let mut source = MemorySource::new(vec![
            Alignment::new("a", 0, "chr1", 10, 20),
            Alignment::new("b", 0, "chr1", 15, 25),
        ]);
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.next_record().unwrap().unwrap().name.as_ref(), "a");
        assert_eq!(source.next_record().unwrap().unwrap().name.as_ref(), "b");
        assert!(source.next_record().unwrap().is_none());
    }
}
