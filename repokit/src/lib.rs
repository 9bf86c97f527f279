//! repokit: generic repositories over record types.
//!
//! This facade crate re-exports the repokit sub-crates through a single
//! dependency with feature flags. Import everything you need with:
//!
//! ```ignore
//! use repokit::prelude::*;
//! ```
//!
//! # Feature flags
//!
//! | Feature    | Default | Crate                          |
//! |------------|---------|--------------------------------|
//! | `data-sqlx`| **yes** | `repokit-data-sqlx`            |
//! | `sqlite`   | **yes** | `repokit-data-sqlx/sqlite`     |
//! | `postgres` | no      | `repokit-data-sqlx/postgres`   |
//!
//! # Example
//!
//! ```ignore
//! use repokit::prelude::*;
//!
//! #[derive(Debug, Default, Record, Entity, sqlx::FromRow)]
//! pub struct User {
//!     #[orm(embedded)]
//!     #[sqlx(flatten)]
//!     pub model: Model,
//!     pub username: String,
//!     pub age: i32,
//! }
//!
//! repokit::init_tracing();
//! let config = DataConfig::load("application.yaml")?;
//! let users = config.repository::<User, i64, _>(config.connect::<User, Sqlite>().await?);
//! let page = users.p_find_all(&CancellationToken::new(), Pageable::new(1, 20)).await?;
//! ```

// The derive macros use `proc-macro-crate` to detect whether the user depends
// on `repokit` or `repokit-data` directly, and generate the matching paths.
pub extern crate repokit_data;
pub extern crate repokit_macros;

pub use repokit_data::*;

#[cfg(feature = "data-sqlx")]
pub use repokit_data_sqlx;

/// Initialise the global `tracing` subscriber with a standard `fmt` layer.
///
/// Respects the `RUST_LOG` environment variable. Falls back to
/// `info,repokit=debug` when `RUST_LOG` is not set. Calling it again, or after
/// another subscriber was installed, is a no-op.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,repokit=debug"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Unified prelude: import everything with `use repokit::prelude::*`.
pub mod prelude {
    pub use repokit_data::prelude::*;

    #[cfg(feature = "data-sqlx")]
    pub use repokit_data_sqlx::prelude::*;

    #[cfg(feature = "sqlite")]
    pub use repokit_data_sqlx::sqlx::Sqlite;

    #[cfg(feature = "postgres")]
    pub use repokit_data_sqlx::sqlx::Postgres;
}
