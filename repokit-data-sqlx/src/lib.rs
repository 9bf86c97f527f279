//! # repokit-data-sqlx: SQLx backend for repokit
//!
//! This crate provides the [SQLx](https://github.com/launchbadge/sqlx)-backed
//! [`Store`](repokit_data::Store) for repokit's generic repositories. It
//! depends on [`repokit-data`] for the abstract traits and types, and adds
//! parameter binding, transactional execution, cancellation, error bridging
//! and pool configuration.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SqlxStore`] | `Store` implementation holding an `sqlx::Pool<DB>` |
//! | [`Preloader`] | Association-loading hook run by eager repositories |
//! | [`Backend`] | Per-driver dialect and argument binding |
//! | [`DataConfig`] | Pool settings from YAML / `.env` / environment |
//! | [`SqlxErrorExt`] | Extension trait to convert `sqlx::Error` into `DataError` (`.into_data_error()`) |
//! | [`SqlxResult<T>`] | Type alias for `Result<T, DataError>` |
//!
//! # Feature flags
//!
//! | Feature    | Driver |
//! |------------|--------|
//! | `sqlite`   | SQLite via `sqlx/sqlite` (default) |
//! | `postgres` | PostgreSQL via `sqlx/postgres` |
//!
//! # Quick start
//!
//! ```ignore
//! use repokit_data::prelude::*;
//! use repokit_data_sqlx::{DataConfig, SqlxStore};
//! use sqlx::Sqlite;
//!
//! let config = DataConfig::load("application.yaml")?;
//! let store: SqlxStore<User, Sqlite> = config.connect().await?;
//! let users = config.repository::<User, i64, _>(store);
//!
//! let cancel = CancellationToken::new();
//! let adults = users
//!     .find_compare(&cancel, &User { age: 1, ..Default::default() }, 18u8, Operator::Gte, -1)
//!     .await?;
//! ```
//!
//! # Transactions
//!
//! Every `execute` / `execute_returning` call begins a transaction, runs the
//! statement, and commits. On error or cancellation the transaction is dropped,
//! which rolls it back.
//!
//! # Error bridging
//!
//! Due to Rust's orphan rules, `From<sqlx::Error> for DataError` can't be
//! implemented here. Use the [`SqlxErrorExt`] trait instead:
//!
//! ```ignore
//! use repokit_data_sqlx::SqlxErrorExt;
//!
//! let user = sqlx::query_as("SELECT ...")
//!     .fetch_one(&pool)
//!     .await
//!     .map_err(|e| e.into_data_error())?;
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod store;

pub use sqlx;

pub use backend::Backend;
pub use config::{ConfigError, DataConfig};
pub use error::{SqlxErrorExt, SqlxResult};
pub use store::{Preloader, SqlxStore};

/// Re-exports of the most commonly used types from both `repokit-data` and this crate.
pub mod prelude {
    pub use crate::{DataConfig, SqlxErrorExt, SqlxStore};
    pub use repokit_data::prelude::*;
}
