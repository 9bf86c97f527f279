//! Scalar values carried by record fields.
//!
//! Every field a record exposes is converted into a [`Value`], tagged with a
//! [`ValueKind`]. Kinds are matched exactly: an `i32` field is never a match
//! for an `i64` target.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp type used for time-valued fields.
pub type Timestamp = DateTime<Utc>;

/// The kind of a field value. Used to look up "the field of this type".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Text,
    Timestamp,
    DeletedAt,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "bool",
            ValueKind::I8 => "i8",
            ValueKind::I16 => "i16",
            ValueKind::I32 => "i32",
            ValueKind::I64 => "i64",
            ValueKind::U8 => "u8",
            ValueKind::U16 => "u16",
            ValueKind::U32 => "u32",
            ValueKind::U64 => "u64",
            ValueKind::F32 => "f32",
            ValueKind::F64 => "f64",
            ValueKind::Text => "text",
            ValueKind::Timestamp => "timestamp",
            ValueKind::DeletedAt => "deleted_at",
        };
        f.write_str(name)
    }
}

/// Soft-delete marker. `None` means the row is live.
///
/// Treated as an opaque leaf: it is never decomposed into its inner
/// timestamp, and it is zero exactly when it holds no timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeletedAt(pub Option<Timestamp>);

impl DeletedAt {
    pub fn at(ts: Timestamp) -> Self {
        DeletedAt(Some(ts))
    }

    pub fn now() -> Self {
        DeletedAt(Some(Utc::now()))
    }

    pub fn is_deleted(&self) -> bool {
        self.0.is_some()
    }
}

impl<DB> sqlx::Type<DB> for DeletedAt
where
    DB: sqlx::Database,
    Timestamp: sqlx::Type<DB>,
{
    fn type_info() -> DB::TypeInfo {
        <Timestamp as sqlx::Type<DB>>::type_info()
    }

    fn compatible(ty: &DB::TypeInfo) -> bool {
        <Timestamp as sqlx::Type<DB>>::compatible(ty)
    }
}

impl<'r, DB> sqlx::Decode<'r, DB> for DeletedAt
where
    DB: sqlx::Database,
    Option<Timestamp>: sqlx::Decode<'r, DB>,
{
    fn decode(value: DB::ValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        Ok(DeletedAt(<Option<Timestamp> as sqlx::Decode<'r, DB>>::decode(value)?))
    }
}

/// A scalar field value.
///
/// `Null` carries the kind of the value that is absent so backends can bind a
/// correctly typed `NULL`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Text(String),
    Timestamp(Timestamp),
    DeletedAt(Option<Timestamp>),
    Null(ValueKind),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::I8(_) => ValueKind::I8,
            Value::I16(_) => ValueKind::I16,
            Value::I32(_) => ValueKind::I32,
            Value::I64(_) => ValueKind::I64,
            Value::U8(_) => ValueKind::U8,
            Value::U16(_) => ValueKind::U16,
            Value::U32(_) => ValueKind::U32,
            Value::U64(_) => ValueKind::U64,
            Value::F32(_) => ValueKind::F32,
            Value::F64(_) => ValueKind::F64,
            Value::Text(_) => ValueKind::Text,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::DeletedAt(_) => ValueKind::DeletedAt,
            Value::Null(kind) => *kind,
        }
    }

    /// Whether this is the zero value of its kind.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Bool(v) => !*v,
            Value::I8(v) => *v == 0,
            Value::I16(v) => *v == 0,
            Value::I32(v) => *v == 0,
            Value::I64(v) => *v == 0,
            Value::U8(v) => *v == 0,
            Value::U16(v) => *v == 0,
            Value::U32(v) => *v == 0,
            Value::U64(v) => *v == 0,
            Value::F32(v) => *v == 0.0,
            Value::F64(v) => *v == 0.0,
            Value::Text(v) => v.is_empty(),
            Value::Timestamp(v) => *v == DateTime::<Utc>::UNIX_EPOCH,
            Value::DeletedAt(v) => v.is_none(),
            Value::Null(_) => true,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            Value::DeletedAt(ts) => *ts,
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::I8(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::U16(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v:?}"),
            Value::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
            Value::DeletedAt(Some(v)) => write!(f, "{}", v.to_rfc3339()),
            Value::DeletedAt(None) | Value::Null(_) => f.write_str("NULL"),
        }
    }
}

/// A Rust type that can be stored in a record field.
///
/// Implemented for the supported scalars, [`Timestamp`], [`DeletedAt`] and
/// `Option<T>` of any of them. `Option` behaves like a nullable pointer:
/// `None` is the default, `Some(v)` is non-default even when `v` is zero.
pub trait FieldValue {
    const KIND: ValueKind;

    fn to_value(&self) -> Value;

    fn is_zero(&self) -> bool {
        self.to_value().is_zero()
    }
}

macro_rules! scalar_field_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                const KIND: ValueKind = ValueKind::$variant;

                fn to_value(&self) -> Value {
                    Value::$variant(*self)
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

scalar_field_value! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Timestamp => Timestamp,
}

impl FieldValue for String {
    const KIND: ValueKind = ValueKind::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl FieldValue for DeletedAt {
    const KIND: ValueKind = ValueKind::DeletedAt;

    fn to_value(&self) -> Value {
        Value::DeletedAt(self.0)
    }

    fn is_zero(&self) -> bool {
        self.0.is_none()
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null(T::KIND),
        }
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Numeric kinds usable in comparison queries.
pub trait Number: FieldValue + Copy + Send + Sync + sealed::Sealed + 'static {}

macro_rules! number {
    ($($ty:ty),*) => {
        $(
            impl sealed::Sealed for $ty {}
            impl Number for $ty {}
        )*
    };
}

number!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

/// Types usable as primary-key identifiers in `get_by_id` / `delete_by_id`.
pub trait Identifier: FieldValue + Send + Sync + 'static {}

impl Identifier for i16 {}
impl Identifier for i32 {}
impl Identifier for i64 {}
impl Identifier for u8 {}
impl Identifier for u16 {}
impl Identifier for u32 {}
impl Identifier for u64 {}
impl Identifier for String {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_scalar_zero() {
        assert!(0i32.is_zero());
        assert!(!7i32.is_zero());
        assert!(String::new().is_zero());
        assert!(!"a".to_string().is_zero());
        assert!(0.0f64.is_zero());
    }

    #[test]
    fn test_timestamp_zero_is_epoch() {
        assert!(DateTime::<Utc>::UNIX_EPOCH.is_zero());
        let ts = Utc.with_ymd_and_hms(2000, 3, 3, 0, 0, 0).unwrap();
        assert!(!ts.is_zero());
    }

    #[test]
    fn test_deleted_at_zero() {
        assert!(DeletedAt::default().is_zero());
        assert!(!DeletedAt::now().is_zero());
        assert_eq!(DeletedAt::default().to_value().kind(), ValueKind::DeletedAt);
    }

    #[test]
    fn test_option_behaves_like_pointer() {
        let none: Option<i32> = None;
        assert!(none.is_zero());
        assert_eq!(none.to_value(), Value::Null(ValueKind::I32));

        let some_zero: Option<i32> = Some(0);
        assert!(!some_zero.is_zero());
        assert_eq!(some_zero.to_value(), Value::I32(0));
        assert_eq!(<Option<i32> as FieldValue>::KIND, ValueKind::I32);
    }

    #[test]
    fn test_kinds_are_exact() {
        assert_ne!(5i32.to_value().kind(), 5i64.to_value().kind());
        assert_ne!(5u32.to_value().kind(), 5i32.to_value().kind());
        assert_ne!(1.0f32.to_value().kind(), 1.0f64.to_value().kind());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::I32(3).to_string(), "3");
        assert_eq!(Value::Text("x".into()).to_string(), "\"x\"");
        assert_eq!(Value::Null(ValueKind::Text).to_string(), "NULL");
    }
}
