use std::sync::Arc;

use super::{AlignmentRecord, SamFlags};

/// Alignment record held entirely in memory.
///
/// Carries only the fields the downsampler inspects plus the read name, which
/// makes it convenient for tests and for embedding the sampler behind a
/// non-BAM reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    /// Read name (QNAME).
    pub name: Arc<str>,
    /// Reference index in the header, `-1` when the record has none.
    pub reference_id: i32,
    /// Reference contig/chromosome name.
    pub reference_name: Arc<str>,
    /// 0-based leftmost reference coordinate.
    pub start: i64,
    /// 0-based exclusive end coordinate.
    pub end: i64,
    /// SAM flag bits.
    pub flags: SamFlags,
}

impl Alignment {
    /// Construct a mapped record without any flag bits set.
    pub fn new(
        name: impl Into<Arc<str>>,
        reference_id: i32,
        reference_name: impl Into<Arc<str>>,
        start: i64,
        end: i64,
    ) -> Self {
        Self {
            name: name.into(),
            reference_id,
            reference_name: reference_name.into(),
            start,
            end,
            flags: SamFlags::default(),
        }
    }

    /// Replace the flag bits.
    pub fn with_flags(mut self, flags: SamFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Aligned span on the reference.
    pub fn len(&self) -> i64 {
        self.end - self.start
    }

    /// Whether the record spans no reference bases.
    pub fn is_empty(&self) -> bool {
        self.len() <= 0
    }
}

impl AlignmentRecord for Alignment {
    fn reference_id(&self) -> i32 {
        self.reference_id
    }

    fn reference_name(&self) -> &str {
        &self.reference_name
    }

    fn start(&self) -> i64 {
        self.start
    }

    fn end(&self) -> i64 {
        self.end
    }

    fn flags(&self) -> SamFlags {
        self.flags
    }
}
