//! Content locators and close-safe byte streams for Lexica.
//!
//! A release file may sit on the file system directly, inside a zip archive,
//! or inside a zip archive that is itself an entry of another zip archive.
//! This crate hides that from the rest of the pipeline:
//!
//! - [`ContentLocator`] — where a byte sequence lives (one of three shapes)
//! - [`ContentSource`] — opens a locator, optionally serving pre-extracted
//!   bytes instead of re-walking the archive chain
//! - [`ContentStream`] — a scoped read of one source; dropping it releases
//!   every underlying handle and severs any retained byte buffer
//!
//! Nested entries are found by scanning the embedded archive in stored
//! order; no random access into the inner archive is assumed.

pub mod error;
pub mod locator;
pub mod stream;

pub use error::{SourceError, SourceResult};
pub use locator::ContentLocator;
pub use stream::{ContentSource, ContentStream};
