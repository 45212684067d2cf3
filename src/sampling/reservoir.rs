use rand::Rng;

use crate::alignment::{AlignmentIoError, AlignmentSink};

/// Fixed-capacity reservoir sampling buffer for one genomic window.
///
/// Slots are filled lazily, so memory follows the number of records actually
/// offered rather than the nominal capacity.
#[derive(Debug, Clone)]
pub struct WindowReservoir<R> {
    capacity: usize,
    slots: Vec<R>,
    seen: usize,
}

impl<R> WindowReservoir<R> {
    /// Create an empty reservoir holding at most `capacity` records.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Vec::new(),
            seen: 0,
        }
    }

    /// Maximum number of records kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records offered since the window opened (may exceed the capacity).
    pub fn window_elements(&self) -> usize {
        self.seen
    }

    /// Records currently held, `min(window_elements, capacity)`.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no record is held.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Held records in slot order.
    pub fn records(&self) -> &[R] {
        &self.slots
    }

    /// Offer a record to the window.
    ///
    /// While the reservoir has free slots the record is stored at slot `n`.
    /// Afterwards an index is drawn uniformly from `[0, n)` over the records
    /// already seen, and the record replaces that slot when the index falls
    /// below the capacity.
    pub fn offer<G: Rng + ?Sized>(&mut self, record: R, rng: &mut G) {
        if self.seen < self.capacity {
            self.slots.push(record);
        } else if self.capacity > 0 {
            let slot = rng.gen_range(0..self.seen);
            if slot < self.capacity {
                self.slots[slot] = record;
            }
        }
        self.seen += 1;
    }

    /// Write the held records to `sink` in slot order, returning how many
    /// were written. The reservoir is left empty with the same capacity.
    pub fn flush<S>(&mut self, sink: &mut S) -> Result<usize, AlignmentIoError>
    where
        S: AlignmentSink<R> + ?Sized,
    {
        let written = self.slots.len();
        for record in self.slots.drain(..) {
            sink.write(record)?;
        }
        self.seen = 0;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn keeps_everything_below_capacity() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut reservoir = WindowReservoir::new(5);
        for value in 0..4 {
            reservoir.offer(value, &mut rng);
        }
        assert_eq!(reservoir.records(), &[0, 1, 2, 3]);
        assert_eq!(reservoir.window_elements(), 4);
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut reservoir = WindowReservoir::new(3);
        for value in 0..1000 {
            reservoir.offer(value, &mut rng);
            assert!(reservoir.len() <= 3);
        }
        assert_eq!(reservoir.len(), 3);
        assert_eq!(reservoir.window_elements(), 1000);

        let mut sink = Vec::new();
        assert_eq!(reservoir.flush(&mut sink).unwrap(), 3);
        assert_eq!(sink.len(), 3);
        assert!(reservoir.is_empty());
        assert_eq!(reservoir.window_elements(), 0);
    }

    #[test]
    fn first_replacement_draw_excludes_current_index() {
        // With capacity 1 the second record is drawn over [0, 1), which always
        // yields slot 0, so it must replace the first.
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut reservoir = WindowReservoir::new(1);
            reservoir.offer("first", &mut rng);
            reservoir.offer("second", &mut rng);
            assert_eq!(reservoir.records(), &["second"]);
        }
    }

    #[test]
    fn zero_capacity_drops_everything() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut reservoir = WindowReservoir::new(0);
        for value in 0..10 {
            reservoir.offer(value, &mut rng);
        }
        assert!(reservoir.is_empty());
        assert_eq!(reservoir.window_elements(), 10);

        let mut sink: Vec<i32> = Vec::new();
        assert_eq!(reservoir.flush(&mut sink).unwrap(), 0);
        assert!(sink.is_empty());
    }
}
