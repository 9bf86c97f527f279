//! # repokit-data
//!
//! Generic repositories for record types: field introspection, filter
//! construction, statement rendering and pagination, independent of any
//! database driver. A backend plugs in by implementing [`Store`]; see
//! `repokit-data-sqlx` for the sqlx one.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`naming`] | identifier to column-name translation |
//! | [`value`] | [`Value`], [`ValueKind`], [`DeletedAt`] and the field traits |
//! | [`record`] | [`Record`] / [`Entity`] and struct flattening |
//! | [`introspect`] | non-default fields and target-field resolution |
//! | [`dynamic`] | JSON-backed records |
//! | [`filter`] | [`QueryMap`] and [`Filter`] builders |
//! | [`query`] | [`QueryBuilder`] rendering [`Statement`]s |
//! | [`page`] | [`Pageable`] and [`Pagination`] |
//! | [`store`] | the [`Store`] contract |
//! | [`repository`] | [`Basic`], [`Paginated`], [`Ultimate`] and their generic implementations |

pub mod dynamic;
pub mod error;
pub mod filter;
pub mod introspect;
pub mod mark;
pub mod model;
pub mod naming;
pub mod page;
pub mod query;
pub mod record;
pub mod repository;
pub mod store;
pub mod value;

pub use dynamic::DynamicRecord;
pub use error::{DataError, DataResult};
pub use filter::{Filter, QueryMap};
pub use introspect::{non_default_fields, resolve_target_field, FieldInformation};
pub use model::Model;
pub use naming::to_column_name;
pub use page::{Pageable, Pagination};
pub use query::{Dialect, IdentifierPolicy, Operator, QueryBuilder, QueryError, Statement};
pub use record::{flatten, ColumnTag, Entity, FieldDescriptor, FlatField, Record};
pub use repokit_macros::{Entity, Record};
pub use repository::{
    Basic, BasicRepository, Paginated, PaginationRepository, Ultimate, UltimateRepository,
};
pub use store::Store;
pub use value::{DeletedAt, FieldValue, Identifier, Number, Timestamp, Value, ValueKind};

/// Re-exports of the most commonly used data types.
pub mod prelude {
    pub use crate::{
        mark, Basic, BasicRepository, DataError, DataResult, DeletedAt, Dialect, DynamicRecord,
        Entity, Filter, Model, Operator, Pageable, Paginated, Pagination, PaginationRepository,
        QueryMap, Record, Statement, Store, Timestamp, Ultimate, UltimateRepository, Value,
        ValueKind,
    };
    pub use tokio_util::sync::CancellationToken;
}

#[doc(hidden)]
pub mod __private {
    //! Paths used by the derive macros.
    pub use crate::naming::default_table_name;
    pub use crate::record::{Entity, FieldDescriptor, FlatField, Record};
    pub use crate::value::{FieldValue, ValueKind};
}
