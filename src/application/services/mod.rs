//! Business logic services for the application layer.

pub mod allocator;
pub mod redirect_service;
pub mod shorten_service;

pub use allocator::{AllocationError, Allocator};
pub use redirect_service::{RedirectService, RedirectTarget};
pub use shorten_service::{ShortenService, ShortenedLink};
