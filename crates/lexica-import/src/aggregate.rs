use std::fmt;

use thiserror::Error;
use tracing::debug;

use lexica_store::{ComponentStore, StoreError, Transaction};
use lexica_types::{
    wellknown, Category, ComponentId, EffectiveTime, Lifecycle, StampKey,
};

use crate::error::{ImportError, ImportResult};
use crate::writer::ImportWriter;

/// Structured logical expression produced by an [`ExpressionCompiler`].
///
/// Only the canonical textual form travels through this pipeline; the
/// compiler's internal representation stays on its side of the boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledExpression {
    text: String,
}

impl CompiledExpression {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Canonical textual form, used as the derived record's payload.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Parse failure surfaced by an expression compiler implementation.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CompileError(pub String);

/// External collaborator turning combined class/property expression text
/// into a structured logical expression.
pub trait ExpressionCompiler {
    fn compile(
        &self,
        class_expressions: &str,
        property_expressions: &str,
    ) -> Result<CompiledExpression, CompileError>;
}

/// External collaborator rewriting legacy numeric identifiers embedded in
/// expression text into canonical identifiers.
pub trait IdentifierRewriter {
    fn rewrite_legacy_ids(&self, text: &str) -> String;
}

/// Transient per-subject class/property concatenations.
///
/// Fragment order within a bucket follows store visitation order, which is
/// unspecified; callers may rely on fragment membership only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpressionBuckets {
    pub class: String,
    pub property: String,
}

impl ExpressionBuckets {
    /// Classify one canonicalized fragment and append it, each fragment
    /// prefixed by a single space.
    ///
    /// A fragment mentioning "property" (case-insensitive) lands in the
    /// property bucket; unless it mentions "objectpropertychain", a
    /// lower-cased copy with "subobjectpropertyof" and "subdatapropertyof"
    /// each replaced by " subclassof" also lands in the class bucket. A
    /// fragment without "property" lands in the class bucket with its
    /// original casing. The rule order and the asymmetric case-folding are
    /// load-bearing: changing them changes the merged expression.
    pub fn append(&mut self, fragment: &str) {
        let folded = fragment.to_lowercase();
        if folded.contains("property") {
            self.property.push(' ');
            self.property.push_str(fragment);
            if !folded.contains("objectpropertychain") {
                let rewritten = folded
                    .replace("subobjectpropertyof", " subclassof")
                    .replace("subdatapropertyof", " subclassof");
                self.class.push(' ');
                self.class.push_str(&rewritten);
            }
        } else {
            self.class.push(' ');
            self.class.push_str(fragment);
        }
    }
}

/// Merges a subject's active axiom fragments into one compiled expression
/// and writes it back as a derived record.
pub struct ExpressionAggregator<'a> {
    store: &'a dyn ComponentStore,
    rewriter: &'a dyn IdentifierRewriter,
    compiler: &'a dyn ExpressionCompiler,
}

impl<'a> ExpressionAggregator<'a> {
    pub fn new(
        store: &'a dyn ComponentStore,
        rewriter: &'a dyn IdentifierRewriter,
        compiler: &'a dyn ExpressionCompiler,
    ) -> Self {
        Self {
            store,
            rewriter,
            compiler,
        }
    }

    /// Collect the class/property buckets for one subject.
    ///
    /// Visits every axiom-annotation record attached to the subject, keeps
    /// only those whose latest version is active (inactive and
    /// absent-latest records are silently excluded; that is policy), and
    /// classifies each canonicalized fragment.
    pub fn collect(&self, subject: &ComponentId) -> ImportResult<ExpressionBuckets> {
        let mut buckets = ExpressionBuckets::default();
        let mut deferred: Option<StoreError> = None;
        self.store.for_each_for_subject_of_category(
            subject,
            Category::AxiomAnnotation,
            &mut |record| {
                if deferred.is_some() {
                    return;
                }
                match self.store.latest(&record.id) {
                    Ok(Some(latest)) if latest.stamp.state().is_active() => {
                        if let Some(raw) = latest.expression() {
                            let canonical = self.rewriter.rewrite_legacy_ids(raw);
                            buckets.append(&canonical);
                        }
                    }
                    Ok(_) => {}
                    Err(e) => deferred = Some(e),
                }
            },
        )?;
        if let Some(e) = deferred {
            return Err(e.into());
        }
        Ok(buckets)
    }

    /// Aggregate one subject: collect, compile, and write the derived
    /// stated-axiom record.
    ///
    /// The compiler is invoked even when both buckets are empty. The
    /// derived record's identity is a pure function of the stated-axiom
    /// pattern and the subject, so re-running overwrites rather than
    /// duplicates.
    pub fn aggregate_subject(
        &self,
        txn: &Transaction,
        writer: &ImportWriter<'_>,
        subject: &ComponentId,
    ) -> ImportResult<CompiledExpression> {
        let buckets = self.collect(subject)?;
        debug!(
            subject = %subject.short_id(),
            class_len = buckets.class.len(),
            property_len = buckets.property.len(),
            "collected expression buckets"
        );
        let compiled = self
            .compiler
            .compile(&buckets.class, &buckets.property)
            .map_err(|source| ImportError::ExpressionCompilationFailed {
                subject: *subject,
                source,
            })?;

        let id = ComponentId::of_pattern_member(Category::StatedAxiom.pattern(), *subject);
        let stamp = txn.stamp_for(StampKey {
            state: Lifecycle::Active,
            time: EffectiveTime::now(),
            author: wellknown::IMPORT_AUTHOR,
            module: wellknown::CORE_MODULE,
            path: wellknown::DEVELOPMENT_PATH,
        });
        writer.write_record(
            id,
            *subject,
            Category::StatedAxiom,
            &stamp,
            vec![compiled.text().to_owned()],
        )?;
        Ok(compiled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{EchoCompiler, PassthroughRewriter};
    use lexica_store::InMemoryComponentStore;
    use lexica_types::{ComponentRecord, Stamp};

    fn stamp(state: Lifecycle, compressed: &str) -> Stamp {
        Stamp::for_key(StampKey {
            state,
            time: EffectiveTime::parse_compressed(compressed).unwrap(),
            author: wellknown::IMPORT_AUTHOR,
            module: ComponentId::from_legacy("900000000000207008"),
            path: wellknown::DEVELOPMENT_PATH,
        })
    }

    fn put_annotation(
        store: &InMemoryComponentStore,
        row: &str,
        subject: &ComponentId,
        state: Lifecycle,
        date: &str,
        expression: &str,
    ) {
        store
            .put(ComponentRecord {
                id: ComponentId::from_legacy(row),
                subject: *subject,
                category: Category::AxiomAnnotation,
                stamp: stamp(state, date),
                payload: vec![expression.to_owned()],
            })
            .unwrap();
    }

    // -----------------------------------------------------------------------
    // Bucket classification rules
    // -----------------------------------------------------------------------

    #[test]
    fn plain_class_fragment_keeps_its_casing() {
        let mut buckets = ExpressionBuckets::default();
        buckets.append("SubClassOf(:42061009 :398334008)");
        assert_eq!(buckets.class, " SubClassOf(:42061009 :398334008)");
        assert_eq!(buckets.property, "");
    }

    #[test]
    fn sub_object_property_is_rewritten_lowercased_into_class_bucket() {
        let mut buckets = ExpressionBuckets::default();
        buckets.append("SubObjectPropertyOf(:363701004 :762705008)");
        assert_eq!(buckets.property, " SubObjectPropertyOf(:363701004 :762705008)");
        assert_eq!(buckets.class, "  subclassof(:363701004 :762705008)");
    }

    #[test]
    fn sub_data_property_is_rewritten_lowercased_into_class_bucket() {
        let mut buckets = ExpressionBuckets::default();
        buckets.append("SubDataPropertyOf(:1148793005 :1148792000)");
        assert_eq!(buckets.property, " SubDataPropertyOf(:1148793005 :1148792000)");
        assert_eq!(buckets.class, "  subclassof(:1148793005 :1148792000)");
    }

    #[test]
    fn object_property_chain_stays_out_of_the_class_bucket() {
        let mut buckets = ExpressionBuckets::default();
        buckets.append(
            "SubObjectPropertyOf(ObjectPropertyChain(:363701004 :738774007) :363701004)",
        );
        assert!(buckets.property.contains("ObjectPropertyChain"));
        assert_eq!(buckets.class, "");
    }

    #[test]
    fn chain_detection_is_case_insensitive() {
        let mut buckets = ExpressionBuckets::default();
        buckets.append("subobjectpropertyof(OBJECTPROPERTYCHAIN(:a :b) :c)");
        assert_eq!(buckets.class, "");
        assert!(!buckets.property.is_empty());
    }

    #[test]
    fn fragments_accumulate_with_one_leading_space_each() {
        let mut buckets = ExpressionBuckets::default();
        buckets.append("SubClassOf(:1 :2)");
        buckets.append("SubClassOf(:3 :4)");
        assert_eq!(buckets.class, " SubClassOf(:1 :2) SubClassOf(:3 :4)");
    }

    // -----------------------------------------------------------------------
    // Collection policy
    // -----------------------------------------------------------------------

    #[test]
    fn inactive_latest_versions_are_silently_excluded() {
        let store = InMemoryComponentStore::new();
        let subject = ComponentId::from_legacy("42061009");
        put_annotation(
            &store,
            "1001",
            &subject,
            Lifecycle::Active,
            "20190731",
            "SubClassOf(:42061009 :398334008)",
        );
        put_annotation(
            &store,
            "1002",
            &subject,
            Lifecycle::Inactive,
            "20190731",
            "SubClassOf(:42061009 :64572001)",
        );
        // 1003 was active once, then retired by a later version.
        put_annotation(
            &store,
            "1003",
            &subject,
            Lifecycle::Active,
            "20190731",
            "SubClassOf(:42061009 :118234003)",
        );
        put_annotation(
            &store,
            "1003",
            &subject,
            Lifecycle::Inactive,
            "20240901",
            "SubClassOf(:42061009 :118234003)",
        );

        let rewriter = PassthroughRewriter;
        let compiler = EchoCompiler;
        let aggregator = ExpressionAggregator::new(&store, &rewriter, &compiler);
        let buckets = aggregator.collect(&subject).unwrap();
        assert_eq!(buckets.class, " SubClassOf(:42061009 :398334008)");
    }

    #[test]
    fn subject_with_no_records_yields_empty_buckets_and_still_compiles() {
        let store = InMemoryComponentStore::new();
        let rewriter = PassthroughRewriter;

        struct CountingCompiler(std::sync::atomic::AtomicU64);
        impl ExpressionCompiler for CountingCompiler {
            fn compile(
                &self,
                class_expressions: &str,
                property_expressions: &str,
            ) -> Result<CompiledExpression, CompileError> {
                assert_eq!(class_expressions, "");
                assert_eq!(property_expressions, "");
                self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                Ok(CompiledExpression::new(""))
            }
        }

        let compiler = CountingCompiler(std::sync::atomic::AtomicU64::new(0));
        let aggregator = ExpressionAggregator::new(&store, &rewriter, &compiler);
        let writer = ImportWriter::new(&store);
        let txn = Transaction::new();
        let subject = ComponentId::from_legacy("42061009");

        aggregator
            .aggregate_subject(&txn, &writer, &subject)
            .unwrap();
        assert_eq!(compiler.0.load(std::sync::atomic::Ordering::Relaxed), 1);
        txn.commit();
    }

    // -----------------------------------------------------------------------
    // Derived record write-back
    // -----------------------------------------------------------------------

    #[test]
    fn derived_record_identity_is_deterministic_and_rerun_overwrites() {
        let store = InMemoryComponentStore::new();
        let subject = ComponentId::from_legacy("42061009");
        put_annotation(
            &store,
            "1001",
            &subject,
            Lifecycle::Active,
            "20190731",
            "SubClassOf(:42061009 :398334008)",
        );

        let rewriter = PassthroughRewriter;
        let compiler = EchoCompiler;
        let aggregator = ExpressionAggregator::new(&store, &rewriter, &compiler);
        let writer = ImportWriter::new(&store);

        let txn = Transaction::new();
        let first = aggregator
            .aggregate_subject(&txn, &writer, &subject)
            .unwrap();
        txn.commit();

        let txn = Transaction::new();
        let second = aggregator
            .aggregate_subject(&txn, &writer, &subject)
            .unwrap();
        txn.commit();

        assert_eq!(first, second);

        let derived_id =
            ComponentId::of_pattern_member(Category::StatedAxiom.pattern(), subject);
        let latest = store.latest(&derived_id).unwrap().expect("derived record");
        assert_eq!(latest.expression(), Some(first.text()));
        assert_eq!(latest.category, Category::StatedAxiom);
        assert_eq!(store.record_count(), 2); // one annotation + one derived identity
    }

    #[test]
    fn compiler_failure_is_wrapped_with_the_subject() {
        let store = InMemoryComponentStore::new();
        let subject = ComponentId::from_legacy("42061009");
        put_annotation(
            &store,
            "1001",
            &subject,
            Lifecycle::Active,
            "20190731",
            "SubClassOf(:42061009 :398334008", // unbalanced
        );

        let rewriter = PassthroughRewriter;
        let compiler = EchoCompiler;
        let aggregator = ExpressionAggregator::new(&store, &rewriter, &compiler);
        let writer = ImportWriter::new(&store);
        let txn = Transaction::new();

        let err = aggregator
            .aggregate_subject(&txn, &writer, &subject)
            .unwrap_err();
        assert!(matches!(
            err,
            ImportError::ExpressionCompilationFailed { subject: s, .. } if s == subject
        ));
        txn.commit();
    }
}
