//! Record introspection: field descriptors and struct flattening.
//!
//! A [`Record`] lists its fields explicitly instead of being inspected at
//! runtime. `#[derive(Record)]` generates the implementation; hand-written
//! impls are fine too.
//!
//! # Example
//!
//! ```ignore
//! #[derive(Record, Entity, sqlx::FromRow)]
//! #[orm(table = "users")]
//! pub struct User {
//!     #[orm(embedded)]
//!     #[sqlx(flatten)]
//!     pub model: Model,
//!     pub username: String,
//!     #[orm(column = "mail")]
//!     pub email: String,
//!     pub age: i32,
//!     pub birthday: Timestamp,
//! }
//! ```

use std::borrow::Cow;

use crate::naming::to_column_name;
use crate::value::{FieldValue, Value, ValueKind};

/// Column override parsed from a comma-separated tag such as
/// `"column:user_name,not null"`.
///
/// Only `column:<name>` and `primaryKey` / `primary_key` are meaningful here;
/// every other attribute is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnTag {
    pub column: Option<String>,
    pub primary_key: bool,
}

impl ColumnTag {
    pub fn parse(tag: &str) -> Self {
        let mut out = ColumnTag::default();
        for attr in tag.split(',') {
            let attr = attr.trim();
            let (key, value) = match attr.split_once(':') {
                Some((k, v)) => (k.trim(), Some(v.trim())),
                None => (attr, None),
            };
            match key {
                "column" => {
                    out.column = value.filter(|v| !v.is_empty()).map(str::to_string);
                }
                "primaryKey" | "primary_key" => out.primary_key = true,
                _ => {}
            }
        }
        out
    }
}

/// Static description of one flattened field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name as declared on the struct.
    pub name: Cow<'static, str>,
    /// Explicit column name, if one was given.
    pub column: Option<Cow<'static, str>>,
    pub kind: ValueKind,
    pub primary_key: bool,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name: Cow::Borrowed(name),
            column: None,
            kind,
            primary_key: false,
        }
    }

    /// Build a descriptor from a struct-tag string.
    pub fn tagged(name: &'static str, kind: ValueKind, tag: &str) -> Self {
        let tag = ColumnTag::parse(tag);
        Self {
            name: Cow::Borrowed(name),
            column: tag.column.map(Cow::Owned),
            kind,
            primary_key: tag.primary_key,
        }
    }

    pub fn column(mut self, column: &'static str) -> Self {
        self.column = Some(Cow::Borrowed(column));
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// The effective column: explicit override, otherwise the snake-case name.
    pub fn column_name(&self) -> String {
        match &self.column {
            Some(column) => column.to_string(),
            None => to_column_name(&self.name),
        }
    }
}

/// One flattened field together with its current value.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatField {
    pub descriptor: FieldDescriptor,
    pub value: Value,
    /// Whether the field holds its type's zero value.
    pub zero: bool,
}

impl FlatField {
    pub fn new(descriptor: FieldDescriptor, value: &impl FieldValue) -> Self {
        Self {
            descriptor,
            value: value.to_value(),
            zero: value.is_zero(),
        }
    }
}

/// A value whose fields can be enumerated.
///
/// Both methods must list fields in the same order: declaration order, depth
/// first through embedded records.
pub trait Record: Send + Sync {
    /// Push the descriptors of every field, without values.
    fn describe(out: &mut Vec<FieldDescriptor>)
    where
        Self: Sized;

    /// Push every field with its current value.
    fn flatten_into(&self, out: &mut Vec<FlatField>);
}

/// A record stored in a table.
pub trait Entity: Record + Sized {
    fn table_name() -> &'static str;
}

/// Flatten a record into its fields, declaration order, depth first.
pub fn flatten<R: Record + ?Sized>(record: &R) -> Vec<FlatField> {
    let mut out = Vec::new();
    record.flatten_into(&mut out);
    out
}

/// All field descriptors of a record type.
pub fn describe<R: Record>() -> Vec<FieldDescriptor> {
    let mut out = Vec::new();
    R::describe(&mut out);
    out
}

/// Descriptor of the primary key of `R`, if one is flagged.
pub fn primary_key_descriptor<R: Record>() -> Option<FieldDescriptor> {
    describe::<R>().into_iter().find(|d| d.primary_key)
}

/// Column of the primary key of `R`, defaulting to `id`.
pub fn primary_key_column<R: Record>() -> String {
    primary_key_descriptor::<R>()
        .map(|d| d.column_name())
        .unwrap_or_else(|| "id".to_string())
}

/// Column of the soft-delete marker of `R`, if it has one.
pub fn soft_delete_column<R: Record>() -> Option<String> {
    describe::<R>()
        .into_iter()
        .find(|d| d.kind == ValueKind::DeletedAt)
        .map(|d| d.column_name())
}
