use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::alignment::{AlignmentRecord, AlignmentSink, AlignmentSource};

use super::{
    CoverageTarget, DownsampleConfig, DownsampleError, SortOrderValidator, WindowReservoir,
};

/// Counters describing one downsampling run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownsampleSummary {
    /// Records pulled from the source.
    pub records_read: u64,
    /// Unmapped, secondary, supplementary or QC-fail records dropped.
    pub records_filtered: u64,
    /// Records offered to a reservoir.
    pub records_offered: u64,
    /// Records that opened a new window and were therefore not sampled.
    pub records_skipped: u64,
    /// Records written to the sink.
    pub records_written: u64,
    /// Windows flushed, including empty ones.
    pub windows_flushed: u64,
    /// Reference transitions seen (including the first reference).
    pub references: u64,
}

impl fmt::Display for DownsampleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "read={} filtered={} offered={} skipped={} written={} windows={} references={}",
            self.records_read,
            self.records_filtered,
            self.records_offered,
            self.records_skipped,
            self.records_written,
            self.windows_flushed,
            self.references
        )
    }
}

/// Snapshot of the live window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowState {
    /// Reference the window lies on.
    pub reference_id: i32,
    /// First coordinate of the window.
    pub start: i64,
    /// Reservoir capacity of the window.
    pub capacity: usize,
    /// Records offered to the window so far.
    pub window_elements: usize,
}

#[derive(Debug)]
struct Window<R> {
    reference_id: i32,
    reference_name: String,
    start: i64,
    reservoir: WindowReservoir<R>,
}

#[derive(Debug, Clone, Copy)]
enum FlushReason {
    Reference,
    Window,
    EndOfStream,
}

impl fmt::Display for FlushReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlushReason::Reference => "reference change",
            FlushReason::Window => "window change",
            FlushReason::EndOfStream => "end of stream",
        })
    }
}

/// Streaming coverage capper.
///
/// Feed records with [`Downsampler::process`] in input order and call
/// [`Downsampler::finish`] once the stream is exhausted. Surviving records go
/// to the sink window by window; within a window they come out in reservoir
/// slot order, so the output is not guaranteed to be coordinate-sorted.
pub struct Downsampler<R> {
    config: DownsampleConfig,
    rng: StdRng,
    validator: SortOrderValidator,
    window: Option<Window<R>>,
    summary: DownsampleSummary,
}

impl<R> fmt::Debug for Downsampler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downsampler")
            .field("config", &self.config)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

impl<R: AlignmentRecord> Downsampler<R> {
    /// Create a downsampler; the random generator is seeded from the config.
    pub fn new(config: DownsampleConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            validator: SortOrderValidator::new(),
            window: None,
            summary: DownsampleSummary::default(),
        }
    }

    /// Configuration of this run.
    pub fn config(&self) -> &DownsampleConfig {
        &self.config
    }

    /// Counters accumulated so far.
    pub fn summary(&self) -> &DownsampleSummary {
        &self.summary
    }

    /// Live window, if any record has been seen.
    pub fn window(&self) -> Option<WindowState> {
        self.window.as_ref().map(|window| WindowState {
            reference_id: window.reference_id,
            start: window.start,
            capacity: window.reservoir.capacity(),
            window_elements: window.reservoir.window_elements(),
        })
    }

    /// Route one record.
    pub fn process<S>(&mut self, record: R, sink: &mut S) -> Result<(), DownsampleError>
    where
        S: AlignmentSink<R> + ?Sized,
    {
        self.summary.records_read += 1;
        let reference_id = record.reference_id();
        let start = record.start();

        self.validator.check(reference_id, start)?;

        if self.window.as_ref().map(|w| w.reference_id) != Some(reference_id) {
            self.flush(sink, FlushReason::Reference)?;
            self.open_window(reference_id, record.reference_name(), 0);
            self.summary.references += 1;
        }

        if record.flags().is_excluded_from_sampling() {
            self.summary.records_filtered += 1;
            return Ok(());
        }
        self.validator.advance(reference_id, start);

        let window_end = self
            .window
            .as_ref()
            .map_or(i64::MIN, |w| w.start + i64::from(self.config.window_size));

        if start >= window_end {
            self.flush(sink, FlushReason::Window)?;
            self.open_window(reference_id, record.reference_name(), start);
            self.summary.records_skipped += 1;
        } else if let Some(window) = self.window.as_mut() {
            window.reservoir.offer(record, &mut self.rng);
            self.summary.records_offered += 1;
        }
        Ok(())
    }

    /// Flush the final window and return the run counters.
    pub fn finish<S>(mut self, sink: &mut S) -> Result<DownsampleSummary, DownsampleError>
    where
        S: AlignmentSink<R> + ?Sized,
    {
        self.flush(sink, FlushReason::EndOfStream)?;
        info!(summary = %self.summary, "downsampling finished");
        Ok(self.summary)
    }

    fn open_window(&mut self, reference_id: i32, reference_name: &str, start: i64) {
        let is_new_reference = self
            .window
            .as_ref()
            .map_or(true, |w| w.reference_id != reference_id);
        if is_new_reference && self.missing_from_profile(reference_id, reference_name) {
            warn!(
                reference = reference_name,
                "reference absent from coverage profile, coverage left unconstrained"
            );
        }

        let capacity = self.config.window_capacity(reference_name, start);
        self.window = Some(Window {
            reference_id,
            reference_name: reference_name.to_owned(),
            start,
            reservoir: WindowReservoir::new(capacity),
        });
    }

    /// Placed reference the profile has no intervals for. Unplaced records
    /// (`reference_id < 0`) are never reported.
    fn missing_from_profile(&self, reference_id: i32, reference_name: &str) -> bool {
        match &self.config.target {
            CoverageTarget::Profile(profile) => {
                reference_id >= 0 && !profile.contains_chromosome(reference_name)
            }
            CoverageTarget::Fixed(_) => false,
        }
    }

    fn flush<S>(&mut self, sink: &mut S, reason: FlushReason) -> Result<(), DownsampleError>
    where
        S: AlignmentSink<R> + ?Sized,
    {
        let Some(window) = self.window.as_mut() else {
            return Ok(());
        };

        debug!(
            %reason,
            reference = %window.reference_name,
            window_start = window.start,
            capacity = window.reservoir.capacity(),
            window_elements = window.reservoir.window_elements(),
            "flushing window"
        );
        let written = window.reservoir.flush(sink)?;
        self.summary.records_written += written as u64;
        self.summary.windows_flushed += 1;
        Ok(())
    }
}

/// Downsample every record of `source` into `sink`, then close the sink.
pub fn downsample<Src, Snk>(
    source: &mut Src,
    sink: &mut Snk,
    config: DownsampleConfig,
) -> Result<DownsampleSummary, DownsampleError>
where
    Src: AlignmentSource,
    Snk: AlignmentSink<Src::Record> + ?Sized,
{
    let mut downsampler = Downsampler::new(config);
    while let Some(record) = source.next_record()? {
        downsampler.process(record, sink)?;
    }
    let summary = downsampler.finish(sink)?;
    sink.close()?;
    Ok(summary)
}
