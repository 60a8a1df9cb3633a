//! Asynchronous repositories for the quarry toolkit.
//!
//! Same operations as `quarry-sync`, returned as futures. Each call
//! clones the blocking repository and runs it on tokio's blocking thread
//! pool; there is no async driver underneath.

pub mod repository;

pub use repository::{AsyncBaseRepository, AsyncCrudRepository, AsyncSqlRepository};
