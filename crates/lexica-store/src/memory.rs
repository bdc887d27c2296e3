use std::collections::HashMap;
use std::sync::RwLock;

use lexica_types::{Category, ComponentId, ComponentRecord};

use crate::error::StoreResult;
use crate::traits::ComponentStore;

/// In-memory, HashMap-based component store.
///
/// Intended for tests and embedding. All records are held in memory behind a
/// `RwLock` for safe concurrent access. Records are cloned on read.
pub struct InMemoryComponentStore {
    inner: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    /// All versions of each record identity, in submission order.
    versions: HashMap<ComponentId, Vec<ComponentRecord>>,
    /// Record identities registered per subject, in first-submission order.
    subjects: HashMap<ComponentId, Vec<(Category, ComponentId)>>,
}

impl InMemoryComponentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreState::default()),
        }
    }

    /// Number of distinct record identities currently stored.
    pub fn record_count(&self) -> usize {
        self.inner.read().expect("lock poisoned").versions.len()
    }

    /// Total number of versions across all record identities.
    pub fn version_count(&self) -> usize {
        self.inner
            .read()
            .expect("lock poisoned")
            .versions
            .values()
            .map(Vec::len)
            .sum()
    }

    /// Number of distinct subjects with at least one record.
    pub fn subject_count(&self) -> usize {
        self.inner.read().expect("lock poisoned").subjects.len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("lock poisoned").versions.is_empty()
    }

    /// Remove all records from the store.
    pub fn clear(&self) {
        let mut state = self.inner.write().expect("lock poisoned");
        state.versions.clear();
        state.subjects.clear();
    }
}

impl Default for InMemoryComponentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentStore for InMemoryComponentStore {
    fn put(&self, record: ComponentRecord) -> StoreResult<()> {
        let mut state = self.inner.write().expect("lock poisoned");

        let registration = (record.category, record.id);
        let listed = state.subjects.entry(record.subject).or_default();
        if !listed.contains(&registration) {
            listed.push(registration);
        }

        let versions = state.versions.entry(record.id).or_default();
        // Same identity + same stamp replaces that version (idempotent
        // re-import); a new stamp appends a new version.
        match versions
            .iter_mut()
            .find(|v| v.stamp.id() == record.stamp.id())
        {
            Some(existing) => *existing = record,
            None => versions.push(record),
        }
        Ok(())
    }

    fn for_each_for_subject_of_category(
        &self,
        subject: &ComponentId,
        category: Category,
        visitor: &mut dyn FnMut(&ComponentRecord),
    ) -> StoreResult<()> {
        // Snapshot outside the lock: visitors are allowed to call back into
        // the store (e.g. to resolve latest versions).
        let matching: Vec<ComponentRecord> = {
            let state = self.inner.read().expect("lock poisoned");
            let Some(listed) = state.subjects.get(subject) else {
                return Ok(());
            };
            listed
                .iter()
                .filter(|(cat, _)| *cat == category)
                .filter_map(|(_, id)| state.versions.get(id).and_then(|v| v.last()).cloned())
                .collect()
        };
        for record in &matching {
            visitor(record);
        }
        Ok(())
    }

    fn for_each_subject(&self, visitor: &mut dyn FnMut(&ComponentId)) -> StoreResult<()> {
        let subjects: Vec<ComponentId> = {
            let state = self.inner.read().expect("lock poisoned");
            state.subjects.keys().copied().collect()
        };
        for subject in &subjects {
            visitor(subject);
        }
        Ok(())
    }

    fn resolve_subject(&self, id: &ComponentId) -> StoreResult<Option<ComponentId>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.subjects.contains_key(id).then_some(*id))
    }

    fn latest(&self, id: &ComponentId) -> StoreResult<Option<ComponentRecord>> {
        let state = self.inner.read().expect("lock poisoned");
        let Some(versions) = state.versions.get(id) else {
            return Ok(None);
        };
        let latest = versions
            .iter()
            .enumerate()
            .max_by_key(|(index, v)| (v.stamp.time(), *index))
            .map(|(_, v)| v.clone());
        Ok(latest)
    }
}

impl std::fmt::Debug for InMemoryComponentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryComponentStore")
            .field("record_count", &self.record_count())
            .field("subject_count", &self.subject_count())
            .finish()
    }
}
