extern crate proc_macro;
use proc_macro::TokenStream;

pub(crate) mod crate_path;
pub(crate) mod entity_derive;
pub(crate) mod record_derive;

/// Derive macro for `Record`: lists the struct's fields at compile time.
///
/// Fields are visited in declaration order. Private fields (no `pub`) are
/// skipped, like `#[orm(skip)]` ones.
///
/// # Field attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `#[orm(column = "name")]` | Explicit column name instead of the snake-case field name |
/// | `#[orm(primary_key)]` | Marks the primary key (defaults to the `id` column) |
/// | `#[orm(embedded)]` | Field is itself a `Record`; its fields are flattened in place |
/// | `#[orm(skip)]` | Field is not a column |
///
/// Every other field must implement `FieldValue` (scalars, `String`,
/// `Timestamp`, `DeletedAt`, and `Option` of those).
///
/// # Example
///
/// ```ignore
/// use repokit::prelude::*;
///
/// #[derive(Debug, Default, Record, Entity, sqlx::FromRow)]
/// #[orm(table = "users")]
/// pub struct User {
///     #[orm(embedded)]
///     #[sqlx(flatten)]
///     pub model: Model,
///     pub username: String,
///     #[orm(column = "mail")]
///     #[sqlx(rename = "mail")]
///     pub email: String,
///     pub age: i32,
///     pub birthday: Option<Timestamp>,
/// }
/// ```
#[proc_macro_derive(Record, attributes(orm))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record_derive::expand(input)
}

/// Derive macro for `Entity`: binds a `Record` to a table.
///
/// `#[orm(table = "name")]` sets the table; without it the table is the
/// snake-case type name plus `s` (`OrderItem` -> `order_items`).
#[proc_macro_derive(Entity, attributes(orm))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity_derive::expand(input)
}
