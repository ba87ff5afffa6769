use std::collections::HashMap;

use khata_core::{Entity, ExpectedVersion, Versioned};

use crate::error::{StoreError, StoreResult};

/// Keyed document collection.
///
/// Plain map wrapper with no lock of its own; the owning store serializes
/// access, so a multi-collection batch stays atomic under one write lock.
#[derive(Debug, Clone)]
pub struct Collection<T: Entity> {
    docs: HashMap<T::Id, T>,
}

impl<T: Entity> Default for Collection<T> {
    fn default() -> Self {
        Self {
            docs: HashMap::new(),
        }
    }
}

impl<T: Entity + Clone> Collection<T> {
    pub fn new() -> Self {
        Self {
            docs: HashMap::new(),
        }
    }

    pub fn insert(&mut self, doc: T) {
        self.docs.insert(doc.id().clone(), doc);
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.docs.get(id)
    }

    pub fn list(&self) -> Vec<T> {
        self.docs.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl<T: Versioned + Clone> Collection<T>
where
    T::Id: core::fmt::Display,
{
    /// Check a document's version without mutating.
    pub fn check_version(&self, id: &T::Id, expected: u64) -> StoreResult<&T> {
        let doc = self
            .docs
            .get(id)
            .ok_or_else(|| StoreError::MissingDocument(id.to_string()))?;
        if !ExpectedVersion::Exact(expected).matches(doc.version()) {
            return Err(StoreError::Concurrency(format!(
                "document {id} at version {}, expected {expected}",
                doc.version()
            )));
        }
        Ok(doc)
    }

    /// Optimistic mutation: version-checked, then applied, then bumped.
    pub fn update_versioned(
        &mut self,
        id: &T::Id,
        expected: u64,
        mutate: impl FnOnce(&mut T) -> StoreResult<()>,
    ) -> StoreResult<()> {
        self.check_version(id, expected)?;
        let doc = self
            .docs
            .get_mut(id)
            .ok_or_else(|| StoreError::MissingDocument(id.to_string()))?;
        mutate(doc)?;
        doc.bump_version();
        Ok(())
    }
}
