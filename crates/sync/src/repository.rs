//! Repository traits.
//!
//! Split in two so a table without a usable identifier still gets the
//! predicate-level operations: [`BaseRepository`] works on any table,
//! [`CrudRepository`] adds id-level operations on top.

use quarry_commons::{Page, PageRequest, Result};
use sea_query::SimpleExpr;

/// Predicate-level read and delete operations.
pub trait BaseRepository<R>: Send + Sync {
    /// Finds at most one row matching the predicate.
    fn find_one_where(&self, predicate: SimpleExpr) -> Result<Option<R>>;

    /// Finds every row matching the predicate.
    fn find_where(&self, predicate: SimpleExpr) -> Result<Vec<R>>;

    /// Finds every row of the table.
    fn find_all(&self) -> Result<Vec<R>>;

    /// Finds a page of the table.
    fn find_page(&self, request: &PageRequest) -> Result<Page<R>>;

    /// Finds a page of the rows matching the predicate.
    fn find_page_where(&self, predicate: SimpleExpr, request: &PageRequest) -> Result<Page<R>>;

    /// Counts every row of the table.
    fn count(&self) -> Result<u64>;

    /// Counts the rows matching the predicate.
    fn count_where(&self, predicate: SimpleExpr) -> Result<u64>;

    /// Deletes the rows matching the predicate, true if any were deleted.
    ///
    /// Deleting the whole table takes the explicit
    /// [`delete_all`](BaseRepository::delete_all) instead of a catch-all
    /// predicate.
    fn delete_where(&self, predicate: SimpleExpr) -> Result<bool>;

    /// Deletes every row of the table, true if any were deleted.
    fn delete_all(&self) -> Result<bool>;
}

/// Id-level CRUD operations on top of [`BaseRepository`].
pub trait CrudRepository<R, Id>: BaseRepository<R> {
    /// Inserts the row, or updates it when its id already exists, and
    /// returns the row as read back from the table.
    fn save(&self, row: &R) -> Result<R>;

    /// Saves every row, batching inserts and updates.
    ///
    /// Rows whose id already exists are updated, the others are inserted
    /// with a single multi-row statement. Returns the rows as read back.
    fn save_all(&self, rows: &[R]) -> Result<Vec<R>>;

    /// Finds a row by id.
    fn find_by_id(&self, id: &Id) -> Result<Option<R>>;

    /// Finds every row whose id is in the given set.
    fn find_by_ids(&self, ids: &[Id]) -> Result<Vec<R>>;

    /// Whether a row with the given id exists.
    fn exists(&self, id: &Id) -> Result<bool>;

    /// Deletes a row by id, true if exactly one row was deleted.
    fn delete_by_id(&self, id: &Id) -> Result<bool>;

    /// Deletes rows by id, true if every requested id was deleted.
    fn delete_by_ids(&self, ids: &[Id]) -> Result<bool>;
}
