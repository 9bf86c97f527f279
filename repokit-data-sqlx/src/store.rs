//! [`Store`] implementation over an `sqlx::Pool`.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use repokit_data::{DataError, DataResult, Dialect, Statement, Store};
use sqlx::{Database, Pool};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::error::SqlxErrorExt;

/// Loads associations into freshly fetched rows.
pub type Preloader<T, DB> = Arc<
    dyn for<'a> Fn(&'a Pool<DB>, &'a mut [T]) -> BoxFuture<'a, Result<(), sqlx::Error>>
        + Send
        + Sync,
>;

/// A generic SQL store wrapping an `sqlx::Pool<DB>` for a given row type.
///
/// Reads go straight to the pool. Mutations run in their own transaction:
/// committed when the statement succeeds, rolled back (dropped) otherwise.
/// Every statement is raced against the caller's cancellation token.
///
/// # Example
///
/// ```ignore
/// let store = SqlxStore::<User, Sqlite>::new(pool.clone());
/// let repo = UltimateRepository::<User, i64, _>::new(store);
/// ```
pub struct SqlxStore<T, DB: Database> {
    pool: Pool<DB>,
    preloader: Option<Preloader<T, DB>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T, DB: Database> SqlxStore<T, DB> {
    pub fn new(pool: Pool<DB>) -> Self {
        Self {
            pool,
            preloader: None,
            _marker: PhantomData,
        }
    }

    /// Install the hook eager repositories call after every fetch.
    ///
    /// ```ignore
    /// let store = SqlxStore::<Post, Sqlite>::new(pool).with_preloader(|pool, posts| {
    ///     Box::pin(async move {
    ///         for post in posts.iter_mut() {
    ///             post.author = sqlx::query_as("SELECT * FROM users WHERE id = ?")
    ///                 .bind(post.author_id)
    ///                 .fetch_optional(pool)
    ///                 .await?;
    ///         }
    ///         Ok(())
    ///     })
    /// });
    /// ```
    pub fn with_preloader<F>(mut self, preloader: F) -> Self
    where
        F: for<'a> Fn(&'a Pool<DB>, &'a mut [T]) -> BoxFuture<'a, Result<(), sqlx::Error>>
            + Send
            + Sync
            + 'static,
    {
        self.preloader = Some(Arc::new(preloader));
        self
    }

    /// Get the underlying pool reference.
    pub fn pool(&self) -> &Pool<DB> {
        &self.pool
    }
}

impl<T, DB: Database> Clone for SqlxStore<T, DB> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            preloader: self.preloader.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, DB: Database> fmt::Debug for SqlxStore<T, DB> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlxStore")
            .field("database", &DB::NAME)
            .field("preloader", &self.preloader.is_some())
            .finish()
    }
}

/// Run `fut` unless `cancel` fires first.
async fn guard<F, R>(cancel: &CancellationToken, sql: &str, fut: F) -> DataResult<R>
where
    F: Future<Output = Result<R, sqlx::Error>>,
{
    if cancel.is_cancelled() {
        warn!(sql, "statement skipped: scope already cancelled");
        return Err(DataError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            warn!(sql, "statement abandoned: scope cancelled");
            Err(DataError::Cancelled)
        }
        result = fut => result.map_err(SqlxErrorExt::into_data_error),
    }
}

fn trace(stmt: &Statement) {
    debug!(sql = %stmt.sql, params = stmt.params.len(), "executing statement");
}

macro_rules! impl_store {
    ($db:ty) => {
        impl<T> Store<T> for SqlxStore<T, $db>
        where
            T: for<'r> sqlx::FromRow<'r, <$db as Database>::Row> + Send + Unpin + 'static,
        {
            fn dialect(&self) -> Dialect {
                <$db as Backend>::DIALECT
            }

            async fn fetch_all(
                &self,
                cancel: &CancellationToken,
                stmt: Statement,
            ) -> DataResult<Vec<T>> {
                trace(&stmt);
                let args = <$db as Backend>::arguments(stmt.params).map_err(DataError::Database)?;
                let query = sqlx::query_as_with::<$db, T, _>(&stmt.sql, args);
                guard(cancel, &stmt.sql, query.fetch_all(&self.pool)).await
            }

            async fn fetch_one(&self, cancel: &CancellationToken, stmt: Statement) -> DataResult<T> {
                trace(&stmt);
                let args = <$db as Backend>::arguments(stmt.params).map_err(DataError::Database)?;
                let query = sqlx::query_as_with::<$db, T, _>(&stmt.sql, args);
                guard(cancel, &stmt.sql, query.fetch_one(&self.pool)).await
            }

            async fn fetch_count(
                &self,
                cancel: &CancellationToken,
                stmt: Statement,
            ) -> DataResult<i64> {
                trace(&stmt);
                let args = <$db as Backend>::arguments(stmt.params).map_err(DataError::Database)?;
                let query = sqlx::query_scalar_with::<$db, i64, _>(&stmt.sql, args);
                guard(cancel, &stmt.sql, query.fetch_one(&self.pool)).await
            }

            async fn execute(&self, cancel: &CancellationToken, stmt: Statement) -> DataResult<u64> {
                trace(&stmt);
                let args = <$db as Backend>::arguments(stmt.params).map_err(DataError::Database)?;
                let sql = stmt.sql.as_str();
                guard(cancel, sql, async {
                    let mut tx = self.pool.begin().await?;
                    let result = sqlx::query_with::<$db, _>(sql, args)
                        .execute(&mut *tx)
                        .await?;
                    tx.commit().await?;
                    Ok::<_, sqlx::Error>(<$db as Backend>::rows_affected(&result))
                })
                .await
            }

            async fn execute_returning(
                &self,
                cancel: &CancellationToken,
                stmt: Statement,
            ) -> DataResult<T> {
                trace(&stmt);
                let args = <$db as Backend>::arguments(stmt.params).map_err(DataError::Database)?;
                let sql = stmt.sql.as_str();
                guard(cancel, sql, async {
                    let mut tx = self.pool.begin().await?;
                    let row = sqlx::query_as_with::<$db, T, _>(sql, args)
                        .fetch_one(&mut *tx)
                        .await?;
                    tx.commit().await?;
                    Ok::<_, sqlx::Error>(row)
                })
                .await
            }

            async fn preload(&self, cancel: &CancellationToken, rows: &mut [T]) -> DataResult<()> {
                let Some(preloader) = &self.preloader else {
                    return Ok(());
                };
                debug!(rows = rows.len(), "preloading associations");
                guard(cancel, "preload", preloader(&self.pool, rows)).await
            }
        }
    };
}

#[cfg(feature = "sqlite")]
impl_store!(sqlx::Sqlite);

#[cfg(feature = "postgres")]
impl_store!(sqlx::Postgres);
