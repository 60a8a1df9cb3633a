//! SQL-backed repository implementation.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

use quarry_commons::page::total_pages;
use quarry_commons::resource::sort_orders;
use quarry_commons::{Error, IdentifiableResource, Page, PageRequest, Resource, Result};
use rusqlite::Connection;
use sea_query::{
    Asterisk, Expr, Func, Query, SelectStatement, SimpleExpr, SqliteQueryBuilder, Value,
};
use sea_query_rusqlite::RusqliteBinder;

use crate::repository::{BaseRepository, CrudRepository};

/// A repository executing sea-query statements on a shared connection.
///
/// The connection sits behind an `Arc<Mutex<_>>` so clones of the
/// repository (and the async wrapper) can share it across threads.
pub struct SqlRepository<T: Resource> {
    conn: Arc<Mutex<Connection>>,
    _resource: PhantomData<fn() -> T>,
}

impl<T: Resource> SqlRepository<T> {
    pub fn new(conn: Connection) -> Self {
        Self::from_shared(Arc::new(Mutex::new(conn)))
    }

    /// Builds a repository over an already shared connection, so several
    /// repositories can target different tables of the same database.
    pub fn from_shared(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            conn,
            _resource: PhantomData,
        }
    }

    /// Shared handle to the underlying connection.
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::ConnectionPoisoned)
    }

    fn select() -> SelectStatement {
        let mut select = Query::select();
        select.columns(T::columns()).from(T::table());
        select
    }

    fn fetch(conn: &Connection, select: &SelectStatement) -> Result<Vec<T::Row>> {
        let (sql, values) = select.build_rusqlite(SqliteQueryBuilder);
        tracing::debug!(%sql, "select");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(&*values.as_params(), T::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    fn count_matching(&self, predicate: Option<SimpleExpr>) -> Result<u64> {
        let conn = self.lock()?;

        let mut select = Query::select();
        select
            .expr(Func::count(Expr::col(Asterisk)))
            .from(T::table());
        if let Some(predicate) = predicate {
            select.and_where(predicate);
        }

        let (sql, values) = select.build_rusqlite(SqliteQueryBuilder);
        tracing::debug!(%sql, "count");

        Ok(conn.query_row(&sql, &*values.as_params(), |row| row.get(0))?)
    }

    fn page(&self, predicate: Option<SimpleExpr>, request: &PageRequest) -> Result<Page<T::Row>> {
        let total_items = self.count_matching(predicate.clone())?;
        let pages = total_pages(total_items, request.size());

        let conn = self.lock()?;
        let mut select = Self::select();
        if let Some(predicate) = predicate {
            select.and_where(predicate);
        }
        for (column, order) in sort_orders::<T>(request) {
            select.order_by(column, order);
        }
        select.limit(request.size()).offset(request.offset());

        let items = Self::fetch(&conn, &select)?;

        Ok(Page::new(items, total_items, pages))
    }
}

impl<T: Resource> Clone for SqlRepository<T> {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
            _resource: PhantomData,
        }
    }
}

impl<T: Resource> BaseRepository<T::Row> for SqlRepository<T> {
    fn find_one_where(&self, predicate: SimpleExpr) -> Result<Option<T::Row>> {
        let conn = self.lock()?;
        let mut select = Self::select();
        select.and_where(predicate).limit(1);

        Ok(Self::fetch(&conn, &select)?.into_iter().next())
    }

    fn find_where(&self, predicate: SimpleExpr) -> Result<Vec<T::Row>> {
        let conn = self.lock()?;
        let mut select = Self::select();
        select.and_where(predicate);

        Self::fetch(&conn, &select)
    }

    fn find_all(&self) -> Result<Vec<T::Row>> {
        let conn = self.lock()?;

        Self::fetch(&conn, &Self::select())
    }

    fn find_page(&self, request: &PageRequest) -> Result<Page<T::Row>> {
        self.page(None, request)
    }

    fn find_page_where(
        &self,
        predicate: SimpleExpr,
        request: &PageRequest,
    ) -> Result<Page<T::Row>> {
        self.page(Some(predicate), request)
    }

    fn count(&self) -> Result<u64> {
        self.count_matching(None)
    }

    fn count_where(&self, predicate: SimpleExpr) -> Result<u64> {
        self.count_matching(Some(predicate))
    }

    fn delete_where(&self, predicate: SimpleExpr) -> Result<bool> {
        let conn = self.lock()?;
        let mut delete = Query::delete();
        delete.from_table(T::table()).and_where(predicate);

        let (sql, values) = delete.build_rusqlite(SqliteQueryBuilder);
        tracing::debug!(%sql, "delete");

        Ok(conn.execute(&sql, &*values.as_params())? > 0)
    }

    fn delete_all(&self) -> Result<bool> {
        let conn = self.lock()?;
        let mut delete = Query::delete();
        delete.from_table(T::table());

        let (sql, values) = delete.build_rusqlite(SqliteQueryBuilder);
        tracing::debug!(%sql, "delete all");

        Ok(conn.execute(&sql, &*values.as_params())? > 0)
    }
}

impl<T: IdentifiableResource> SqlRepository<T> {
    fn id_predicate(id: &T::Id) -> SimpleExpr {
        let value: Value = id.clone().into();
        Expr::col(T::id_column()).eq(value)
    }

    fn ids_predicate(ids: &[T::Id]) -> SimpleExpr {
        Expr::col(T::id_column()).is_in(ids.iter().cloned().map(Into::<Value>::into))
    }

    /// Ids from the given set that already exist in the table.
    fn existing_ids(&self, ids: &[T::Id]) -> Result<Vec<T::Id>> {
        let conn = self.lock()?;

        let mut select = Query::select();
        select
            .column(T::id_column())
            .from(T::table())
            .and_where(Self::ids_predicate(ids));

        let (sql, values) = select.build_rusqlite(SqliteQueryBuilder);
        tracing::debug!(%sql, "existing ids");

        let mut stmt = conn.prepare(&sql)?;
        let found = stmt
            .query_map(&*values.as_params(), |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(found)
    }

    /// Inserts the given rows with a single multi-row statement.
    fn insert_rows(&self, rows: &[&T::Row]) -> Result<()> {
        let conn = self.lock()?;

        let mut insert = Query::insert();
        insert.into_table(T::table()).columns(T::columns());
        for row in rows {
            insert.values(
                T::values(row)
                    .into_iter()
                    .map(|(_, value)| SimpleExpr::from(value)),
            )?;
        }

        let (sql, values) = insert.build_rusqlite(SqliteQueryBuilder);
        tracing::debug!(%sql, rows = rows.len(), "insert batch");

        conn.execute(&sql, &*values.as_params())?;
        Ok(())
    }

    fn update_row(conn: &Connection, row: &T::Row, id: &T::Id) -> Result<()> {
        let mut update = Query::update();
        update.table(T::table());
        for (column, value) in T::values(row) {
            update.value(column, value);
        }
        update.and_where(Self::id_predicate(id));

        let (sql, values) = update.build_rusqlite(SqliteQueryBuilder);
        tracing::debug!(%sql, "update");

        conn.execute(&sql, &*values.as_params())?;
        Ok(())
    }
}

impl<T: IdentifiableResource> CrudRepository<T::Row, T::Id> for SqlRepository<T> {
    fn save(&self, row: &T::Row) -> Result<T::Row> {
        let id = T::id(row);

        if self.exists(&id)? {
            let conn = self.lock()?;
            Self::update_row(&conn, row, &id)?;
        } else {
            self.insert_rows(&[row])?;
        }

        self.find_by_id(&id)?.ok_or(Error::SavedRowMissing)
    }

    fn save_all(&self, rows: &[T::Row]) -> Result<Vec<T::Row>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<T::Id> = rows.iter().map(T::id).collect();
        let existing = self.existing_ids(&ids)?;

        let (to_update, to_insert): (Vec<&T::Row>, Vec<&T::Row>) = rows
            .iter()
            .partition(|row| existing.contains(&T::id(row)));

        if !to_insert.is_empty() {
            self.insert_rows(&to_insert)?;
        }

        if !to_update.is_empty() {
            let conn = self.lock()?;
            tracing::debug!(rows = to_update.len(), "update batch");
            for row in &to_update {
                Self::update_row(&conn, row, &T::id(row))?;
            }
        }

        self.find_by_ids(&ids)
    }

    fn find_by_id(&self, id: &T::Id) -> Result<Option<T::Row>> {
        self.find_one_where(Self::id_predicate(id))
    }

    fn find_by_ids(&self, ids: &[T::Id]) -> Result<Vec<T::Row>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.find_where(Self::ids_predicate(ids))
    }

    fn exists(&self, id: &T::Id) -> Result<bool> {
        let conn = self.lock()?;

        let mut select = Query::select();
        select
            .column(T::id_column())
            .from(T::table())
            .and_where(Self::id_predicate(id))
            .limit(1);

        let (sql, values) = select.build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare(&sql)?;
        Ok(stmt.exists(&*values.as_params())?)
    }

    fn delete_by_id(&self, id: &T::Id) -> Result<bool> {
        let conn = self.lock()?;
        let mut delete = Query::delete();
        delete.from_table(T::table()).and_where(Self::id_predicate(id));

        let (sql, values) = delete.build_rusqlite(SqliteQueryBuilder);
        tracing::debug!(%sql, "delete by id");

        Ok(conn.execute(&sql, &*values.as_params())? == 1)
    }

    fn delete_by_ids(&self, ids: &[T::Id]) -> Result<bool> {
        if ids.is_empty() {
            return Ok(false);
        }

        let conn = self.lock()?;
        let mut delete = Query::delete();
        delete
            .from_table(T::table())
            .and_where(Self::ids_predicate(ids));

        let (sql, values) = delete.build_rusqlite(SqliteQueryBuilder);
        tracing::debug!(%sql, ids = ids.len(), "delete by ids");

        Ok(conn.execute(&sql, &*values.as_params())? == ids.len())
    }
}
