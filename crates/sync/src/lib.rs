//! Blocking repositories for the quarry toolkit.
//!
//! [`SqlRepository`] executes sea-query statements on a shared rusqlite
//! connection. Predicate-level operations come from [`BaseRepository`];
//! id-level CRUD (including batched upserts) from [`CrudRepository`],
//! available whenever the resource declares an identifier.

pub mod repository;
pub mod sql;

pub use repository::{BaseRepository, CrudRepository};
pub use sql::SqlRepository;
