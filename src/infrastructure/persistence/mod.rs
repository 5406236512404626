//! Store implementations.
//!
//! # Repositories
//!
//! - [`PgMappingRepository`] - Mapping storage in PostgreSQL
//! - [`PgCounterRepository`] - Counter storage in PostgreSQL
//! - [`MemoryStore`] - Both repositories over concurrent in-process maps
//!
//! PostgreSQL operations retry transient failures per [`RetryPolicy`].

pub mod memory_store;
pub mod pg_counter_repository;
pub mod pg_error;
pub mod pg_mapping_repository;
pub mod retry;

pub use memory_store::MemoryStore;
pub use pg_counter_repository::PgCounterRepository;
pub use pg_mapping_repository::PgMappingRepository;
pub use retry::RetryPolicy;
