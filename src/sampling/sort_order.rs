use thiserror::Error;

/// Input records went backwards within a reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "input is not sorted by coordinate: start {current} follows {previous} on reference {reference_id}, please sort it first (e.g. samtools sort)"
)]
pub struct SortOrderViolation {
    /// Reference on which the violation occurred.
    pub reference_id: i32,
    /// Start of the preceding record.
    pub previous: i64,
    /// Start of the offending record.
    pub current: i64,
}

/// Checks that starts never decrease on a reference.
///
/// Every record is checked against the last record passed to
/// [`SortOrderValidator::advance`]; records dropped by the flag filter are
/// checked but never become the reference point.
#[derive(Debug, Clone, Default)]
pub struct SortOrderValidator {
    last: Option<(i32, i64)>,
}

impl SortOrderValidator {
    /// Validator that has seen no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify `(reference_id, start)` against the last advanced position.
    pub fn check(&self, reference_id: i32, start: i64) -> Result<(), SortOrderViolation> {
        if let Some((prev_ref, prev_start)) = self.last {
            if prev_ref == reference_id && prev_start > start {
                return Err(SortOrderViolation {
                    reference_id,
                    previous: prev_start,
                    current: start,
                });
            }
        }
        Ok(())
    }

    /// Make `(reference_id, start)` the position later records are checked
    /// against.
    pub fn advance(&mut self, reference_id: i32, start: i64) {
        self.last = Some((reference_id, start));
    }

    /// [`check`](Self::check) then [`advance`](Self::advance).
    pub fn check_and_advance(
        &mut self,
        reference_id: i32,
        start: i64,
    ) -> Result<(), SortOrderViolation> {
        self.check(reference_id, start)?;
        self.advance(reference_id, start);
        Ok(())
    }
}
