use lexica_types::{Category, ComponentId, ComponentRecord};

use crate::error::StoreResult;

/// Versioned component record store.
///
/// All implementations must satisfy these invariants:
/// - Records are immutable once written. A new version of the same logical
///   content is a new record with the same identity and a different stamp.
/// - A record is visible to readers only once `put` has returned.
/// - Visitation order is backend-defined and carries no meaning; callers
///   must not rely on it for correctness.
/// - The store never interprets payload text; it is opaque field data.
/// - All I/O errors are propagated, never silently ignored.
pub trait ComponentStore: Send + Sync {
    /// Submit a record. Returns once the record is durably accepted.
    ///
    /// Submitting a record whose identity and stamp both match an existing
    /// version replaces that version (idempotent re-import); a matching
    /// identity with a new stamp appends a new version.
    fn put(&self, record: ComponentRecord) -> StoreResult<()>;

    /// Visit every record of `category` attached to `subject`, one call per
    /// record identity, in backend-defined order.
    fn for_each_for_subject_of_category(
        &self,
        subject: &ComponentId,
        category: Category,
        visitor: &mut dyn FnMut(&ComponentRecord),
    ) -> StoreResult<()>;

    /// Visit every subject the store knows about, in backend-defined order.
    fn for_each_subject(&self, visitor: &mut dyn FnMut(&ComponentId)) -> StoreResult<()>;

    /// Resolve a canonical identifier to the store's subject handle.
    ///
    /// Returns `Ok(None)` if the subject is unknown. The handle is opaque to
    /// callers; backends may intern.
    fn resolve_subject(&self, id: &ComponentId) -> StoreResult<Option<ComponentId>>;

    /// Resolve the latest version of a record identity, or `Ok(None)` if the
    /// identity has no versions. "Latest" is the version with the greatest
    /// effective time, ties broken by submission order.
    fn latest(&self, id: &ComponentId) -> StoreResult<Option<ComponentRecord>>;
}
