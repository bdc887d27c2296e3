use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use lexica_types::{Stamp, StampKey};

/// The scope of one import run.
///
/// A transaction owns the stamp cache: within the transaction, repeated
/// requests for an equal [`StampKey`] return the same shared [`Stamp`], so
/// the many records created in one pass share version contexts instead of
/// growing the version table. The cache is discarded with the transaction
/// and never leaks across runs.
///
/// Committing is the only consistency boundary. Records already submitted to
/// the store stay submitted if a run aborts; there is no automatic rollback.
pub struct Transaction {
    stamps: Mutex<HashMap<StampKey, Arc<Stamp>>>,
    committed: AtomicBool,
}

impl Transaction {
    /// Open a new transaction with an empty stamp cache.
    pub fn new() -> Self {
        Self {
            stamps: Mutex::new(HashMap::new()),
            committed: AtomicBool::new(false),
        }
    }

    /// Issue the stamp for `key`, reusing the stamp issued for an equal key
    /// earlier in this transaction.
    pub fn stamp_for(&self, key: StampKey) -> Arc<Stamp> {
        let mut stamps = self.stamps.lock().expect("lock poisoned");
        Arc::clone(
            stamps
                .entry(key)
                .or_insert_with(|| Arc::new(Stamp::for_key(key))),
        )
    }

    /// Number of distinct stamps issued so far.
    pub fn stamp_count(&self) -> usize {
        self.stamps.lock().expect("lock poisoned").len()
    }

    /// Commit the transaction, ending its scope and discarding the stamp
    /// cache. Returns the number of distinct stamps the run used.
    pub fn commit(self) -> usize {
        let count = self.stamp_count();
        self.committed.store(true, Ordering::Relaxed);
        debug!(stamps = count, "transaction committed");
        count
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.committed.load(Ordering::Relaxed) {
            warn!("transaction dropped without commit; submitted records remain in storage");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexica_types::{wellknown, ComponentId, EffectiveTime, Lifecycle};

    fn key(state: Lifecycle, compressed: &str) -> StampKey {
        StampKey {
            state,
            time: EffectiveTime::parse_compressed(compressed).unwrap(),
            author: wellknown::IMPORT_AUTHOR,
            module: ComponentId::from_legacy("900000000000207008"),
            path: wellknown::DEVELOPMENT_PATH,
        }
    }

    #[test]
    fn equal_keys_share_one_stamp() {
        let txn = Transaction::new();
        let a = txn.stamp_for(key(Lifecycle::Active, "20190731"));
        let b = txn.stamp_for(key(Lifecycle::Active, "20190731"));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(txn.stamp_count(), 1);
    }

    #[test]
    fn distinct_keys_get_distinct_stamps() {
        let txn = Transaction::new();
        let active = txn.stamp_for(key(Lifecycle::Active, "20190731"));
        let inactive = txn.stamp_for(key(Lifecycle::Inactive, "20190731"));
        assert!(!Arc::ptr_eq(&active, &inactive));
        assert_ne!(active.id(), inactive.id());
        assert_eq!(txn.stamp_count(), 2);
    }

    #[test]
    fn cache_does_not_leak_across_transactions() {
        let first = Transaction::new();
        let a = first.stamp_for(key(Lifecycle::Active, "20190731"));
        first.commit();

        let second = Transaction::new();
        assert_eq!(second.stamp_count(), 0);
        let b = second.stamp_for(key(Lifecycle::Active, "20190731"));
        // Same tuple derives the same stamp value, but the handle is owned
        // by the new transaction, not shared with the old one.
        assert_eq!(a.id(), b.id());
        assert!(!Arc::ptr_eq(&a, &b));
        second.commit();
    }

    #[test]
    fn commit_reports_stamp_count() {
        let txn = Transaction::new();
        txn.stamp_for(key(Lifecycle::Active, "20190731"));
        txn.stamp_for(key(Lifecycle::Active, "20190731"));
        txn.stamp_for(key(Lifecycle::Inactive, "20240901"));
        assert_eq!(txn.commit(), 2);
    }
}
