//! Application layer services implementing the shortening core.
//!
//! Services consume repository traits and provide a transport-free API for
//! HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::allocator::Allocator`] - Short code allocation and alias reservation
//! - [`services::shorten_service::ShortenService`] - Input validation and link creation
//! - [`services::redirect_service::RedirectService`] - Lookup with read-time expiration

pub mod services;
