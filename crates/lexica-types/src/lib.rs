//! Foundation types for Lexica.
//!
//! This crate provides the identity, temporal, and structural types used
//! throughout the Lexica system. Every other Lexica crate depends on
//! `lexica-types`.
//!
//! # Key Types
//!
//! - [`ComponentId`] — Stable identifier derived deterministically from a
//!   legacy numeric identifier (version-5 UUID under a fixed namespace)
//! - [`EffectiveTime`] — Instant at which a component version takes effect
//! - [`Lifecycle`] — Active/inactive state of a component version
//! - [`StampKey`] / [`Stamp`] — Version-context tuple attached to every record
//! - [`Category`] — The fixed set of record categories the importer produces
//! - [`ComponentRecord`] — A versioned unit of content attached to a subject

pub mod error;
pub mod identity;
pub mod record;
pub mod stamp;
pub mod temporal;

pub use error::TypeError;
pub use identity::{wellknown, ComponentId};
pub use record::{Category, ComponentRecord};
pub use stamp::{Lifecycle, Stamp, StampKey};
pub use temporal::EffectiveTime;
