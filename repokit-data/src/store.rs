//! The execution contract a storage backend fulfils.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::DataResult;
use crate::query::{Dialect, Statement};

/// Executes rendered statements and maps rows to `T`.
///
/// Every call takes the caller's cancellation scope. A backend should abort
/// the in-flight statement and return [`DataError::Cancelled`] once the token
/// fires.
///
/// Uses RPITIT (return-position `impl Trait` in traits), no `async-trait`.
///
/// [`DataError::Cancelled`]: crate::error::DataError::Cancelled
pub trait Store<T>: Send + Sync
where
    T: Send + 'static,
{
    /// Placeholder and quoting style the backend expects.
    fn dialect(&self) -> Dialect;

    fn fetch_all(
        &self,
        cancel: &CancellationToken,
        stmt: Statement,
    ) -> impl Future<Output = DataResult<Vec<T>>> + Send;

    /// First row of the result. Zero rows is [`DataError::NotFound`].
    ///
    /// [`DataError::NotFound`]: crate::error::DataError::NotFound
    fn fetch_one(
        &self,
        cancel: &CancellationToken,
        stmt: Statement,
    ) -> impl Future<Output = DataResult<T>> + Send;

    /// Scalar result of a `SELECT COUNT(*)` statement.
    fn fetch_count(
        &self,
        cancel: &CancellationToken,
        stmt: Statement,
    ) -> impl Future<Output = DataResult<i64>> + Send;

    /// Run a mutating statement inside a transaction; returns rows affected.
    /// The transaction commits only when the statement succeeds.
    fn execute(
        &self,
        cancel: &CancellationToken,
        stmt: Statement,
    ) -> impl Future<Output = DataResult<u64>> + Send;

    /// Run a mutating `... RETURNING *` statement inside a transaction and
    /// return the stored row.
    fn execute_returning(
        &self,
        cancel: &CancellationToken,
        stmt: Statement,
    ) -> impl Future<Output = DataResult<T>> + Send;

    /// Load associations of freshly fetched rows. Called only by eager
    /// repositories; the default does nothing.
    fn preload(
        &self,
        _cancel: &CancellationToken,
        _rows: &mut [T],
    ) -> impl Future<Output = DataResult<()>> + Send {
        async { Ok(()) }
    }
}
