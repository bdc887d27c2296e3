use tracing::{debug, info};

use lexica_source::ContentSource;
use lexica_store::{ComponentStore, Transaction};
use lexica_types::{wellknown, Category, ComponentId, EffectiveTime, Lifecycle, StampKey};

use crate::aggregate::ExpressionAggregator;
use crate::error::{ImportError, ImportResult};
use crate::parser::ReleaseReader;
use crate::schema::ReleaseField;
use crate::writer::ImportWriter;

/// One-shot import run: a single logical thread of control from release
/// source to store, with aggregation passes over selected subjects.
///
/// The run shares one [`ImportWriter`], so the running record count covers
/// raw imports and derived records alike. Nothing here is cancellable
/// mid-record; an aborted run leaves already-submitted records in storage.
pub struct ImportRun<'a> {
    store: &'a dyn ComponentStore,
    writer: ImportWriter<'a>,
}

impl<'a> ImportRun<'a> {
    pub fn new(store: &'a dyn ComponentStore) -> Self {
        Self {
            store,
            writer: ImportWriter::new(store),
        }
    }

    /// The run's shared writer, for progress reporting.
    pub fn writer(&self) -> &ImportWriter<'a> {
        &self.writer
    }

    /// Import every row of a release into the store as axiom annotation
    /// records. Returns the number of rows imported.
    ///
    /// Any failure aborts the run: a malformed line, an unknown state
    /// flag, or a store rejection all propagate. Rows already written stay
    /// written.
    pub fn import_release(
        &self,
        txn: &Transaction,
        source: &ContentSource,
    ) -> ImportResult<u64> {
        let label = source.label();
        info!(source = %label, "importing release");
        let stream = source.open()?;
        let reader = ReleaseReader::open(stream, label.clone())?;

        let before = self.writer.written();
        for row in reader {
            let row = row?;
            let id: ComponentId = row
                .field(ReleaseField::Id)
                .parse()
                .map_err(|e| ImportError::bad_row(&label, row.line(), e))?;
            let state = Lifecycle::from_flag(row.field(ReleaseField::Active))
                .map_err(|e| ImportError::bad_row(&label, row.line(), e))?;
            let time = EffectiveTime::parse_compressed(row.field(ReleaseField::EffectiveTime))
                .map_err(|e| ImportError::bad_row(&label, row.line(), e))?;
            let module = ComponentId::from_legacy(row.field(ReleaseField::ModuleId));
            let subject = ComponentId::from_legacy(row.field(ReleaseField::ReferencedComponentId));

            let stamp = txn.stamp_for(StampKey {
                state,
                time,
                author: wellknown::IMPORT_AUTHOR,
                module,
                path: wellknown::DEVELOPMENT_PATH,
            });
            self.writer.write_record(
                id,
                subject,
                Category::AxiomAnnotation,
                &stamp,
                vec![row.field(ReleaseField::Expression).to_owned()],
            )?;
        }
        let imported = self.writer.written() - before;
        info!(records = imported, source = %label, "imported axiom annotation records");
        Ok(imported)
    }

    /// Run the aggregation pass for an explicit set of subjects.
    pub fn aggregate_subjects(
        &self,
        txn: &Transaction,
        aggregator: &ExpressionAggregator<'_>,
        subjects: &[ComponentId],
    ) -> ImportResult<()> {
        for subject in subjects {
            let compiled = aggregator.aggregate_subject(txn, &self.writer, subject)?;
            info!(subject = %subject.short_id(), "wrote derived stated axiom");
            debug!(subject = %subject.short_id(), %compiled, "compiled expression");
        }
        Ok(())
    }

    /// Run the aggregation pass for every subject the store knows about.
    /// Returns the number of subjects aggregated.
    pub fn aggregate_all(
        &self,
        txn: &Transaction,
        aggregator: &ExpressionAggregator<'_>,
    ) -> ImportResult<u64> {
        let mut subjects = Vec::new();
        self.store.for_each_subject(&mut |s| subjects.push(*s))?;
        self.aggregate_subjects(txn, aggregator, &subjects)?;
        Ok(subjects.len() as u64)
    }
}
