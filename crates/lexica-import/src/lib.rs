//! Release import pipeline for Lexica.
//!
//! This crate is the heart of the system. It turns a terminology release
//! file into versioned component records and aggregates per-subject axiom
//! text into a single compiled logical expression:
//!
//! - [`ReleaseReader`] — header-then-data tab-delimited parsing against the
//!   fixed seven-column schema
//! - [`ImportWriter`] — builds one record per row and submits it
//!   immediately, keeping a running count
//! - [`ExpressionAggregator`] — collects a subject's active axiom
//!   fragments, applies the class/property rewrite rules, and hands the
//!   result to the expression compiler
//! - [`ImportRun`] — one-shot wiring of source, parser, writer, and
//!   aggregator under a single transaction
//! - [`AnnotationCensus`] — per-subject annotation statistics report
//!
//! Every failure in this pipeline is fatal to the run: a malformed line
//! aborts the whole import. Records already submitted stay submitted; the
//! transaction commit boundary is the only consistency guarantee.

pub mod aggregate;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod reference;
pub mod report;
pub mod schema;
pub mod writer;

pub use aggregate::{
    CompileError, CompiledExpression, ExpressionAggregator, ExpressionBuckets,
    ExpressionCompiler, IdentifierRewriter,
};
pub use error::{ImportError, ImportResult};
pub use parser::{ReleaseReader, ReleaseRecord};
pub use pipeline::ImportRun;
pub use reference::{CanonicalRewriter, EchoCompiler, PassthroughRewriter};
pub use report::AnnotationCensus;
pub use schema::ReleaseField;
pub use writer::ImportWriter;
