//! Domain layer containing the mapping model and store contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Mapping records and the values needed to create them
//! - [`repositories`] - Store traits with their atomicity contracts
//!
//! The domain layer has no dependency on HTTP or on a concrete storage engine.
//! All shared state (mappings and the code counter) lives behind the
//! repository traits; nothing here holds mutable state between requests.

pub mod entities;
pub mod repositories;
