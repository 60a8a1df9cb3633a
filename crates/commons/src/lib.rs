//! Shared building blocks for the quarry repository toolkit.
//!
//! - **page**: sorts, page requests and pages of items
//! - **resource**: table mapping traits and sort resolution
//! - **error**: centralized error handling
//!
//! The sync and async repository crates build on these types; consumers
//! usually only need them to describe their tables (via [`Resource`] and
//! [`IdentifiableResource`]) and to drive pagination.

pub mod error;
pub mod page;
pub mod resource;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use page::{Direction, Page, PageRequest, Sort};
pub use resource::{IdentifiableResource, Resource};
