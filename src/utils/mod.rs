//! Utility functions for code encoding, input validation, and request handling.
//!
//! - [`base62`] - Base-62 encoding of counter values into short codes
//! - [`validation`] - URL, custom alias and expiration date checks
//! - [`host_context`] - Public base URL resolution from HTTP headers

pub mod base62;
pub mod host_context;
pub mod validation;
