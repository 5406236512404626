//! Core domain entities.
//!
//! - [`Mapping`] - A persisted short code → long URL record
//! - [`MappingDraft`] - The validated data of a mapping before its code is known

pub mod mapping;

pub use mapping::{Mapping, MappingDraft};
