use serde::Serialize;
use tracing::info;

use lexica_store::{ComponentStore, StoreResult};
use lexica_types::{Category, ComponentId};

/// Distribution of axiom-annotation counts across subjects.
///
/// A post-import spot check: most subjects carry a handful of axiom
/// records; subjects with six or more are unusual enough to be worth
/// listing individually.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationCensus {
    /// Total subjects inspected.
    pub subjects: u64,
    /// Subjects with exactly 0..=5 annotation records, by count.
    pub by_count: [u64; 6],
    /// Subjects with six or more annotation records.
    pub six_or_more: u64,
    /// The identities of those crowded subjects.
    pub crowded: Vec<ComponentId>,
}

impl AnnotationCensus {
    /// Walk every subject and bucket it by its annotation-record count.
    pub fn collect(store: &dyn ComponentStore) -> StoreResult<Self> {
        let mut subjects = Vec::new();
        store.for_each_subject(&mut |s| subjects.push(*s))?;

        let mut census = Self::default();
        for subject in subjects {
            let mut count: u64 = 0;
            store.for_each_for_subject_of_category(
                &subject,
                Category::AxiomAnnotation,
                &mut |_| count += 1,
            )?;
            census.subjects += 1;
            if count < 6 {
                census.by_count[count as usize] += 1;
            } else {
                census.six_or_more += 1;
                census.crowded.push(subject);
            }
        }
        Ok(census)
    }

    /// Log the histogram, and dump every record of each crowded subject.
    pub fn log(&self, store: &dyn ComponentStore) -> StoreResult<()> {
        info!("total subject count: {}", self.subjects);
        for (count, subjects) in self.by_count.iter().enumerate() {
            info!("subjects with {count} axiom records: {subjects}");
        }
        info!("subjects with six or more axiom records: {}", self.six_or_more);

        for subject in &self.crowded {
            let mut lines = format!("records for crowded subject {subject}:");
            store.for_each_for_subject_of_category(
                subject,
                Category::AxiomAnnotation,
                &mut |record| {
                    lines.push_str("\n  ");
                    lines.push_str(&record.to_string());
                },
            )?;
            info!("{lines}");
        }
        Ok(())
    }
}
