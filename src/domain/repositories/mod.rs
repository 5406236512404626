//! Store trait definitions for the domain layer.
//!
//! These traits are the only capability the allocation core depends on: a
//! key-value store with single-key atomic operations. Implementations live in
//! `crate::infrastructure::persistence`.
//!
//! # Available Repositories
//!
//! - [`MappingRepository`] - Conditional and unconditional mapping writes, lookups
//! - [`CounterRepository`] - Lazily created, atomically incremented counters
//!
//! Mock implementations are generated via `mockall` for testing.

pub mod counter_repository;
pub mod mapping_repository;
pub mod store_error;

pub use counter_repository::{CounterRepository, URL_COUNTER_ID};
pub use mapping_repository::MappingRepository;
pub use store_error::StoreError;

#[cfg(test)]
pub use counter_repository::MockCounterRepository;
#[cfg(test)]
pub use mapping_repository::MockMappingRepository;
