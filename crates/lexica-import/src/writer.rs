use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use lexica_store::{ComponentStore, StoreResult};
use lexica_types::{Category, ComponentId, ComponentRecord, Stamp};

/// Number of leading records echoed to the log as a spot check.
const LOGGED_RECORDS: u64 = 25;

/// Builds versioned component records and submits them to the store.
///
/// Submission is immediate; there is no local buffering beyond what the
/// store itself does, and a record is visible to readers once
/// [`write_record`](Self::write_record) returns. The running count covers
/// everything written through this writer in the current run and is never
/// reset.
pub struct ImportWriter<'a> {
    store: &'a dyn ComponentStore,
    written: AtomicU64,
}

impl<'a> ImportWriter<'a> {
    pub fn new(store: &'a dyn ComponentStore) -> Self {
        Self {
            store,
            written: AtomicU64::new(0),
        }
    }

    /// Build one record and submit it. Store failures propagate unchanged.
    pub fn write_record(
        &self,
        id: ComponentId,
        subject: ComponentId,
        category: Category,
        stamp: &Stamp,
        payload: Vec<String>,
    ) -> StoreResult<()> {
        let record = ComponentRecord {
            id,
            subject,
            category,
            stamp: stamp.clone(),
            payload,
        };
        if self.written.load(Ordering::Relaxed) < LOGGED_RECORDS {
            debug!(%record, "created component record");
        }
        self.store.put(record)?;
        self.written.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Records written so far in this run.
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexica_store::InMemoryComponentStore;
    use lexica_types::{wellknown, EffectiveTime, Lifecycle, StampKey};

    fn stamp() -> Stamp {
        Stamp::for_key(StampKey {
            state: Lifecycle::Active,
            time: EffectiveTime::parse_compressed("20190731").unwrap(),
            author: wellknown::IMPORT_AUTHOR,
            module: ComponentId::from_legacy("900000000000207008"),
            path: wellknown::DEVELOPMENT_PATH,
        })
    }

    #[test]
    fn writes_are_visible_immediately_and_counted() {
        let store = InMemoryComponentStore::new();
        let writer = ImportWriter::new(&store);
        assert_eq!(writer.written(), 0);

        let id = ComponentId::from_legacy("1001");
        let stamp = stamp();
        writer
            .write_record(
                id,
                ComponentId::from_legacy("42061009"),
                Category::AxiomAnnotation,
                &stamp,
                vec!["SubClassOf(:42061009 :398334008)".into()],
            )
            .unwrap();

        assert_eq!(writer.written(), 1);
        let latest = store.latest(&id).unwrap().expect("visible after write");
        assert_eq!(latest.expression(), Some("SubClassOf(:42061009 :398334008)"));
    }

    #[test]
    fn count_is_monotonic_across_categories() {
        let store = InMemoryComponentStore::new();
        let writer = ImportWriter::new(&store);
        let stamp = stamp();
        for n in 0..5 {
            writer
                .write_record(
                    ComponentId::from_legacy(&format!("{n}")),
                    ComponentId::from_legacy("42061009"),
                    if n % 2 == 0 {
                        Category::AxiomAnnotation
                    } else {
                        Category::StatedAxiom
                    },
                    &stamp,
                    vec![],
                )
                .unwrap();
            assert_eq!(writer.written(), n + 1);
        }
    }
}
