use crate::{Cursor, Result, Statement};
use std::future::Future;

/// Metadata about modify operations (INSERT/UPDATE/DELETE).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected {
    /// Total number of rows impacted.
    pub rows_affected: u64,
    /// Backend-specific last inserted / affected identifier when available.
    pub last_affected_id: Option<i64>,
}

impl Extend<RowsAffected> for RowsAffected {
    fn extend<T: IntoIterator<Item = RowsAffected>>(&mut self, iter: T) {
        for elem in iter {
            self.rows_affected += elem.rows_affected;
            if elem.last_affected_id.is_some() {
                self.last_affected_id = elem.last_affected_id;
            }
        }
    }
}

/// Runs statements against a database.
///
/// This is the boundary with the driver: the mapping engine only produces
/// [`Statement`]s and consumes [`Cursor`]s. The cursor returned by `query`
/// owns its rows and does not borrow the executor.
pub trait Executor: Send {
    type Cursor: Cursor + Send;

    /// Execute the query and return the rows.
    fn query(&mut self, statement: Statement)
    -> impl Future<Output = Result<Self::Cursor>> + Send;

    /// Execute the statement and return the total number of rows affected.
    fn execute(&mut self, statement: Statement)
    -> impl Future<Output = Result<RowsAffected>> + Send;
}

impl<E: Executor> Executor for &mut E {
    type Cursor = E::Cursor;

    fn query(
        &mut self,
        statement: Statement,
    ) -> impl Future<Output = Result<Self::Cursor>> + Send {
        (**self).query(statement)
    }

    fn execute(
        &mut self,
        statement: Statement,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        (**self).execute(statement)
    }
}

/// Executor whose statements are applied atomically once committed.
///
/// The transaction is an explicit value handed by the caller to whatever runs
/// inside it, it is never bound to the current thread.
pub trait Transaction: Executor {
    fn commit(self) -> impl Future<Output = Result<()>> + Send;
    fn rollback(self) -> impl Future<Output = Result<()>> + Send;
}

/// Source of connections, usually a pool.
pub trait ConnectionProvider: Send + Sync {
    type Connection: Executor;

    fn acquire(&self) -> impl Future<Output = Result<Self::Connection>> + Send;

    fn release(&self, connection: Self::Connection) -> impl Future<Output = Result<()>> + Send;
}

/// Executor acquiring a connection for every statement and releasing it right after.
#[derive(Debug, Clone)]
pub struct Pooled<P> {
    provider: P,
}

impl<P: ConnectionProvider> Pooled<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn into_inner(self) -> P {
        self.provider
    }
}

impl<P: ConnectionProvider> Executor for Pooled<P> {
    type Cursor = <P::Connection as Executor>::Cursor;

    fn query(
        &mut self,
        statement: Statement,
    ) -> impl Future<Output = Result<Self::Cursor>> + Send {
        async move {
            let mut connection = self.provider.acquire().await?;
            let result = connection.query(statement).await;
            let released = self.provider.release(connection).await;
            let cursor = result?;
            released?;
            Ok(cursor)
        }
    }

    fn execute(
        &mut self,
        statement: Statement,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        async move {
            let mut connection = self.provider.acquire().await?;
            let result = connection.execute(statement).await;
            let released = self.provider.release(connection).await;
            let affected = result?;
            released?;
            Ok(affected)
        }
    }
}
