//! Tube catalog
//!
//! Maps tube uids to their records for one image. Entries are never removed
//! individually; the whole catalog goes away with its session.

use std::collections::BTreeMap;

use crate::error::TubeError;
use crate::tube::TubeRecord;
use crate::Result;

#[derive(Debug)]
pub struct TubeCatalog<T> {
    tubes: BTreeMap<u64, TubeRecord<T>>,
}

impl<T> TubeCatalog<T> {
    pub fn new() -> Self {
        Self {
            tubes: BTreeMap::new(),
        }
    }

    /// Insert a record under its uid. Recording the same uid twice is an
    /// invariant violation and is rejected without touching the catalog.
    pub fn record(&mut self, record: TubeRecord<T>) -> Result<()> {
        let uid = record.uid();
        self.ensure_vacant(uid)?;
        self.tubes.insert(uid, record);

        tracing::debug!(uid = uid, tube_count = self.tubes.len(), "Recorded tube");

        Ok(())
    }

    pub fn ensure_vacant(&self, uid: u64) -> Result<()> {
        if self.tubes.contains_key(&uid) {
            return Err(TubeError::DuplicateUid(uid));
        }
        Ok(())
    }

    pub fn get(&self, uid: u64) -> Result<&TubeRecord<T>> {
        self.tubes.get(&uid).ok_or(TubeError::NotFound(uid))
    }

    pub fn len(&self) -> usize {
        self.tubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tubes.is_empty()
    }

    /// Recorded uids in ascending order
    pub fn uids(&self) -> Vec<u64> {
        self.tubes.keys().copied().collect()
    }
}

impl<T> Default for TubeCatalog<T> {
    fn default() -> Self {
        Self::new()
    }
}
