//! Append-only split registry.
//!
//! Split `n` lives at arena index `n - 1`. The next identifier is always
//! `len + 1`, so ids are handed out sequentially from 1, never reused, and
//! never decremented.

use splitpay_types::{Result, SplitError, SplitId, SplitRecord};

/// Indexed table of every split ever created.
pub struct SplitRegistry {
    /// Records in id order.
    records: Vec<SplitRecord>,
}

impl SplitRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Identifier the next inserted split will receive.
    #[must_use]
    pub fn next_id(&self) -> SplitId {
        SplitId(self.records.len() as u64 + 1)
    }

    /// Append a freshly created record.
    ///
    /// # Errors
    /// Returns `Internal` if `record.id` is not [`Self::next_id`].
    pub fn insert(&mut self, record: SplitRecord) -> Result<SplitId> {
        let expected = self.next_id();
        if record.id != expected {
            return Err(SplitError::Internal(format!(
                "registry expected {expected}, got {}",
                record.id
            )));
        }
        tracing::debug!(split = %record.id, creator = %record.creator, "Split registered");
        self.records.push(record);
        Ok(expected)
    }

    /// Look up a split. Absent ids yield `None`, never an error.
    #[must_use]
    pub fn get(&self, id: SplitId) -> Option<&SplitRecord> {
        Self::index(id).and_then(|i| self.records.get(i))
    }

    /// Replace a stored record with an updated copy of itself.
    ///
    /// Used by the engine to commit a staged mutation in one step.
    ///
    /// # Errors
    /// Returns `SplitNotFound` if the id was never allocated.
    pub fn commit(&mut self, record: SplitRecord) -> Result<()> {
        let slot = Self::index(record.id)
            .and_then(|i| self.records.get_mut(i))
            .ok_or(SplitError::SplitNotFound(record.id))?;
        *slot = record;
        Ok(())
    }

    /// Number of splits ever created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn index(id: SplitId) -> Option<usize> {
        id.0.checked_sub(1).and_then(|i| usize::try_from(i).ok())
    }
}

impl Default for SplitRegistry {
    fn default() -> Self {
        Self::new()
    }
}
