//! Asynchronous repository traits and the thread-pool-backed wrapper.

use async_trait::async_trait;
use quarry_commons::{Error, IdentifiableResource, Page, PageRequest, Resource, Result};
use quarry_sync::{BaseRepository, CrudRepository, SqlRepository};
use sea_query::SimpleExpr;

/// Predicate-level operations, as futures.
///
/// Arguments are taken by value; every call moves them onto the blocking
/// thread pool.
#[async_trait]
pub trait AsyncBaseRepository<R>: Send + Sync {
    async fn find_one_where(&self, predicate: SimpleExpr) -> Result<Option<R>>;

    async fn find_where(&self, predicate: SimpleExpr) -> Result<Vec<R>>;

    async fn find_all(&self) -> Result<Vec<R>>;

    async fn find_page(&self, request: PageRequest) -> Result<Page<R>>;

    async fn find_page_where(&self, predicate: SimpleExpr, request: PageRequest)
        -> Result<Page<R>>;

    async fn count(&self) -> Result<u64>;

    async fn count_where(&self, predicate: SimpleExpr) -> Result<u64>;

    async fn delete_where(&self, predicate: SimpleExpr) -> Result<bool>;

    async fn delete_all(&self) -> Result<bool>;
}

/// Id-level CRUD operations, as futures.
#[async_trait]
pub trait AsyncCrudRepository<R, Id>: AsyncBaseRepository<R> {
    async fn save(&self, row: R) -> Result<R>;

    async fn save_all(&self, rows: Vec<R>) -> Result<Vec<R>>;

    async fn find_by_id(&self, id: Id) -> Result<Option<R>>;

    async fn find_by_ids(&self, ids: Vec<Id>) -> Result<Vec<R>>;

    async fn exists(&self, id: Id) -> Result<bool>;

    async fn delete_by_id(&self, id: Id) -> Result<bool>;

    async fn delete_by_ids(&self, ids: Vec<Id>) -> Result<bool>;
}

/// Runs a [`SqlRepository`] on tokio's blocking thread pool.
///
/// Must be used from within a tokio runtime.
pub struct AsyncSqlRepository<T: Resource> {
    inner: SqlRepository<T>,
}

impl<T: Resource> AsyncSqlRepository<T> {
    pub fn new(inner: SqlRepository<T>) -> Self {
        Self { inner }
    }

    pub fn from_connection(conn: rusqlite::Connection) -> Self {
        Self::new(SqlRepository::new(conn))
    }

    /// The wrapped blocking repository.
    pub fn blocking(&self) -> &SqlRepository<T> {
        &self.inner
    }

    async fn run<F, U>(&self, op: F) -> Result<U>
    where
        F: FnOnce(SqlRepository<T>) -> Result<U> + Send + 'static,
        U: Send + 'static,
    {
        let repo = self.inner.clone();
        tokio::task::spawn_blocking(move || op(repo))
            .await
            .map_err(|err| Error::Background(err.to_string()))?
    }
}

impl<T: Resource> Clone for AsyncSqlRepository<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[async_trait]
impl<T: Resource> AsyncBaseRepository<T::Row> for AsyncSqlRepository<T> {
    async fn find_one_where(&self, predicate: SimpleExpr) -> Result<Option<T::Row>> {
        self.run(move |repo| repo.find_one_where(predicate)).await
    }

    async fn find_where(&self, predicate: SimpleExpr) -> Result<Vec<T::Row>> {
        self.run(move |repo| repo.find_where(predicate)).await
    }

    async fn find_all(&self) -> Result<Vec<T::Row>> {
        self.run(move |repo| repo.find_all()).await
    }

    async fn find_page(&self, request: PageRequest) -> Result<Page<T::Row>> {
        self.run(move |repo| repo.find_page(&request)).await
    }

    async fn find_page_where(
        &self,
        predicate: SimpleExpr,
        request: PageRequest,
    ) -> Result<Page<T::Row>> {
        self.run(move |repo| repo.find_page_where(predicate, &request))
            .await
    }

    async fn count(&self) -> Result<u64> {
        self.run(move |repo| repo.count()).await
    }

    async fn count_where(&self, predicate: SimpleExpr) -> Result<u64> {
        self.run(move |repo| repo.count_where(predicate)).await
    }

    async fn delete_where(&self, predicate: SimpleExpr) -> Result<bool> {
        self.run(move |repo| repo.delete_where(predicate)).await
    }

    async fn delete_all(&self) -> Result<bool> {
        self.run(move |repo| repo.delete_all()).await
    }
}

#[async_trait]
impl<T: IdentifiableResource> AsyncCrudRepository<T::Row, T::Id> for AsyncSqlRepository<T> {
    async fn save(&self, row: T::Row) -> Result<T::Row> {
        self.run(move |repo| repo.save(&row)).await
    }

    async fn save_all(&self, rows: Vec<T::Row>) -> Result<Vec<T::Row>> {
        self.run(move |repo| repo.save_all(&rows)).await
    }

    async fn find_by_id(&self, id: T::Id) -> Result<Option<T::Row>> {
        self.run(move |repo| repo.find_by_id(&id)).await
    }

    async fn find_by_ids(&self, ids: Vec<T::Id>) -> Result<Vec<T::Row>> {
        self.run(move |repo| repo.find_by_ids(&ids)).await
    }

    async fn exists(&self, id: T::Id) -> Result<bool> {
        self.run(move |repo| repo.exists(&id)).await
    }

    async fn delete_by_id(&self, id: T::Id) -> Result<bool> {
        self.run(move |repo| repo.delete_by_id(&id)).await
    }

    async fn delete_by_ids(&self, ids: Vec<T::Id>) -> Result<bool> {
        self.run(move |repo| repo.delete_by_ids(&ids)).await
    }
}
