use std::path::Path;
use std::sync::Arc;

use rust_htslib::bam::{self, header::Header, HeaderView, Read, Writer};
use tracing::debug;

use super::{AlignmentIoError, AlignmentRecord, AlignmentSink, AlignmentSource, SamFlags};

/// Path arguments meaning "use the standard stream".
fn is_stdin(path: &str) -> bool {
    path == "-" || path == "stdin"
}

fn is_stdout(path: &str) -> bool {
    path == "-" || path == "stdout"
}

/// Reference name used for records without a reference.
const NO_REFERENCE: &str = "*";

/// BAM record paired with the reference name resolved from the header.
#[derive(Debug, Clone)]
pub struct BamAlignment {
    record: bam::Record,
    reference_name: Arc<str>,
    end: i64,
}

impl BamAlignment {
    /// Underlying htslib record.
    pub fn record(&self) -> &bam::Record {
        &self.record
    }
}

impl AlignmentRecord for BamAlignment {
    fn reference_id(&self) -> i32 {
        self.record.tid()
    }

    fn reference_name(&self) -> &str {
        &self.reference_name
    }

    fn start(&self) -> i64 {
        self.record.pos()
    }

    fn end(&self) -> i64 {
        self.end
    }

    fn flags(&self) -> SamFlags {
        SamFlags(self.record.flags())
    }
}

/// Alignment source reading BAM from a file or standard input.
pub struct BamSource {
    reader: bam::Reader,
    reference_names: Vec<Arc<str>>,
    unplaced: Arc<str>,
}

impl std::fmt::Debug for BamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BamSource")
            .field("references", &self.reference_names.len())
            .finish()
    }
}

impl BamSource {
    /// Open `path`, or standard input when `path` is `-` or `stdin`.
    pub fn open(path: &str) -> Result<Self, AlignmentIoError> {
        let reader = if is_stdin(path) {
            bam::Reader::from_stdin()?
        } else {
            bam::Reader::from_path(Path::new(path))?
        };

        let reference_names: Vec<Arc<str>> = reader
            .header()
            .target_names()
            .into_iter()
            .map(|name| Arc::from(String::from_utf8_lossy(name).as_ref()))
            .collect();
        debug!(input = path, references = reference_names.len(), "opened BAM input");

        Ok(Self {
            reader,
            reference_names,
            unplaced: Arc::from(NO_REFERENCE),
        })
    }

    /// Header of the input, used as the template for the output header.
    pub fn header(&self) -> &HeaderView {
        self.reader.header()
    }

    fn reference_name(&self, tid: i32) -> Arc<str> {
        usize::try_from(tid)
            .ok()
            .and_then(|idx| self.reference_names.get(idx))
            .map_or_else(|| Arc::clone(&self.unplaced), Arc::clone)
    }
}

impl AlignmentSource for BamSource {
    type Record = BamAlignment;

    fn next_record(&mut self) -> Result<Option<BamAlignment>, AlignmentIoError> {
        let mut record = bam::Record::new();
        match self.reader.read(&mut record) {
            None => Ok(None),
            Some(Err(err)) => Err(err.into()),
            Some(Ok(())) => {
                let end = record.cigar().end_pos();
                let reference_name = self.reference_name(record.tid());
                Ok(Some(BamAlignment {
                    record,
                    reference_name,
                    end,
                }))
            }
        }
    }
}

/// Alignment sink writing BAM to a file or standard output.
pub struct BamSink {
    writer: Option<Writer>,
}

impl std::fmt::Debug for BamSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BamSink")
            .field("open", &self.writer.is_some())
            .finish()
    }
}

/// Create a BAM writer whose header is copied from the input header.
///
/// `path` of `-` or `stdout` writes to standard output.
pub fn open_bam_sink(path: &str, template: &HeaderView) -> Result<BamSink, AlignmentIoError> {
    let header = Header::from_template(template);
    let writer = if is_stdout(path) {
        Writer::from_stdout(&header, bam::Format::Bam)?
    } else {
        Writer::from_path(Path::new(path), &header, bam::Format::Bam)?
    };
    debug!(output = path, "opened BAM output");
    Ok(BamSink {
        writer: Some(writer),
    })
}

impl AlignmentSink<BamAlignment> for BamSink {
    fn write(&mut self, record: BamAlignment) -> Result<(), AlignmentIoError> {
        match self.writer.as_mut() {
            Some(writer) => Ok(writer.write(record.record())?),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "BAM writer already closed",
            )
            .into()),
        }
    }

    fn close(&mut self) -> Result<(), AlignmentIoError> {
        // htslib flushes and writes the EOF block when the writer is dropped.
        self.writer.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_stream_aliases() {
        assert!(is_stdin("-"));
        assert!(is_stdin("stdin"));
        assert!(!is_stdin("reads.bam"));
        assert!(is_stdout("stdout"));
        assert!(!is_stdout("stdin"));
    }
}
