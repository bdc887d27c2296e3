use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::{wellknown, ComponentId};
use crate::stamp::Stamp;

/// The categories of content record the importer produces.
///
/// Each category corresponds to a fixed well-known pattern identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Raw axiom annotation, one per release row.
    AxiomAnnotation,
    /// Derived stated-axiom record written back by the aggregator.
    StatedAxiom,
}

impl Category {
    /// The pattern identity this category instantiates.
    pub const fn pattern(self) -> ComponentId {
        match self {
            Self::AxiomAnnotation => wellknown::AXIOM_ANNOTATION_PATTERN,
            Self::StatedAxiom => wellknown::STATED_AXIOM_PATTERN,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AxiomAnnotation => write!(f, "axiom-annotation"),
            Self::StatedAxiom => write!(f, "stated-axiom"),
        }
    }
}

/// A versioned unit of content attached to a subject.
///
/// Records are immutable once submitted to a store. A new version of the
/// same logical content is a new record with the same `id` and a different
/// stamp, never an in-place edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// Identity of this record (stable across versions).
    pub id: ComponentId,
    /// The subject this record annotates.
    pub subject: ComponentId,
    /// Which pattern the record instantiates.
    pub category: Category,
    /// Version context under which this version was created.
    pub stamp: Stamp,
    /// Ordered opaque field values. The import pipeline writes a single
    /// expression string.
    pub payload: Vec<String>,
}

impl ComponentRecord {
    /// The first payload field, if any. The importer's records carry exactly
    /// one: the expression text.
    pub fn expression(&self) -> Option<&str> {
        self.payload.first().map(String::as_str)
    }
}

impl fmt::Display for ComponentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] subject={} stamp={}",
            self.id.short_id(),
            self.category,
            self.subject.short_id(),
            self.stamp
        )
    }
}
