//! Per-driver glue: placeholder dialect and parameter binding.

use repokit_data::{Dialect, Value};
use sqlx::error::BoxDynError;
use sqlx::Database;

/// A sqlx database the store can drive.
pub trait Backend: Database {
    const DIALECT: Dialect;

    /// Bind rendered parameters in order.
    fn arguments<'q>(params: Vec<Value>) -> Result<Self::Arguments<'q>, BoxDynError>;

    fn rows_affected(result: &Self::QueryResult) -> u64;
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use repokit_data::{Timestamp, ValueKind};
    use sqlx::sqlite::{SqliteArguments, SqliteQueryResult};
    use sqlx::{Arguments, Sqlite};

    impl Backend for Sqlite {
        const DIALECT: Dialect = Dialect::Sqlite;

        fn arguments<'q>(params: Vec<Value>) -> Result<SqliteArguments<'q>, BoxDynError> {
            let mut args = SqliteArguments::default();
            for param in params {
                match param {
                    Value::Bool(v) => args.add(v)?,
                    Value::I8(v) => args.add(v)?,
                    Value::I16(v) => args.add(v)?,
                    Value::I32(v) => args.add(v)?,
                    Value::I64(v) => args.add(v)?,
                    Value::U8(v) => args.add(v)?,
                    Value::U16(v) => args.add(v)?,
                    Value::U32(v) => args.add(v)?,
                    // SQLite integers are signed 64-bit
                    Value::U64(v) => args.add(i64::try_from(v)?)?,
                    Value::F32(v) => args.add(v)?,
                    Value::F64(v) => args.add(v)?,
                    Value::Text(v) => args.add(v)?,
                    Value::Timestamp(v) => args.add(v)?,
                    Value::DeletedAt(v) => args.add(v)?,
                    Value::Null(kind) => match kind {
                        ValueKind::Bool => args.add(None::<bool>)?,
                        ValueKind::F32 | ValueKind::F64 => args.add(None::<f64>)?,
                        ValueKind::Text => args.add(None::<String>)?,
                        ValueKind::Timestamp | ValueKind::DeletedAt => {
                            args.add(None::<Timestamp>)?
                        }
                        _ => args.add(None::<i64>)?,
                    },
                }
            }
            Ok(args)
        }

        fn rows_affected(result: &SqliteQueryResult) -> u64 {
            result.rows_affected()
        }
    }
}

#[cfg(feature = "postgres")]
mod postgres {
    use super::*;
    use repokit_data::{Timestamp, ValueKind};
    use sqlx::postgres::{PgArguments, PgQueryResult};
    use sqlx::{Arguments, Postgres};

    impl Backend for Postgres {
        const DIALECT: Dialect = Dialect::Postgres;

        /// Postgres has no unsigned integers; each is widened to the next
        /// signed type (`u64` must fit in `BIGINT`).
        fn arguments<'q>(params: Vec<Value>) -> Result<PgArguments, BoxDynError> {
            let mut args = PgArguments::default();
            for param in params {
                match param {
                    Value::Bool(v) => args.add(v)?,
                    Value::I8(v) => args.add(i16::from(v))?,
                    Value::I16(v) => args.add(v)?,
                    Value::I32(v) => args.add(v)?,
                    Value::I64(v) => args.add(v)?,
                    Value::U8(v) => args.add(i16::from(v))?,
                    Value::U16(v) => args.add(i32::from(v))?,
                    Value::U32(v) => args.add(i64::from(v))?,
                    Value::U64(v) => args.add(i64::try_from(v)?)?,
                    Value::F32(v) => args.add(v)?,
                    Value::F64(v) => args.add(v)?,
                    Value::Text(v) => args.add(v)?,
                    Value::Timestamp(v) => args.add(v)?,
                    Value::DeletedAt(v) => args.add(v)?,
                    Value::Null(kind) => match kind {
                        ValueKind::Bool => args.add(None::<bool>)?,
                        ValueKind::I8 | ValueKind::I16 | ValueKind::U8 => args.add(None::<i16>)?,
                        ValueKind::I32 | ValueKind::U16 => args.add(None::<i32>)?,
                        ValueKind::I64 | ValueKind::U32 | ValueKind::U64 => {
                            args.add(None::<i64>)?
                        }
                        ValueKind::F32 => args.add(None::<f32>)?,
                        ValueKind::F64 => args.add(None::<f64>)?,
                        ValueKind::Text => args.add(None::<String>)?,
                        ValueKind::Timestamp | ValueKind::DeletedAt => {
                            args.add(None::<Timestamp>)?
                        }
                    },
                }
            }
            Ok(args)
        }

        fn rows_affected(result: &PgQueryResult) -> u64 {
            result.rows_affected()
        }
    }
}
