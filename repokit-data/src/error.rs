use crate::query::QueryError;
use crate::value::ValueKind;

/// Errors that can occur in the data layer.
#[derive(Debug)]
pub enum DataError {
    /// Dynamic input was not a record (a JSON object).
    Shape(String),
    /// No non-default field of the required kind on the condition entity.
    /// `expected` is `None` when the entity had no non-default field at all.
    NoTargetField { expected: Option<ValueKind> },
    /// More than one non-default field of the required kind.
    AmbiguousTargetField { kind: ValueKind, fields: Vec<String> },
    /// A delete was requested for an entity whose primary key is unset.
    MissingPrimaryKey { table: String },
    NotFound(String),
    Database(Box<dyn std::error::Error + Send + Sync>),
    Query(QueryError),
    /// The call scope was cancelled before the store finished.
    Cancelled,
    Other(String),
}

impl DataError {
    /// Construct a `Database` variant from any error type.
    ///
    /// Used by backend crates (e.g. `repokit-data-sqlx`) to wrap
    /// driver-specific errors.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Database(Box::new(err))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::NotFound(_))
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::Shape(msg) => write!(f, "Input is not a record: {msg}"),
            DataError::NoTargetField { expected: None } => {
                write!(f, "No target field specified")
            }
            DataError::NoTargetField {
                expected: Some(kind),
            } => write!(f, "No target field found, expected a field of type {kind}"),
            DataError::AmbiguousTargetField { kind, fields } => write!(
                f,
                "Ambiguous target field: {} fields of type {kind} are set ({}), at most one is allowed",
                fields.len(),
                fields.join(", ")
            ),
            DataError::MissingPrimaryKey { table } => {
                write!(f, "Missing primary key for delete on {table}")
            }
            DataError::NotFound(msg) => write!(f, "Not found: {msg}"),
            DataError::Database(err) => write!(f, "Database error: {err}"),
            DataError::Query(err) => write!(f, "Query error: {err}"),
            DataError::Cancelled => write!(f, "Operation cancelled"),
            DataError::Other(msg) => write!(f, "Data error: {msg}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Database(err) => Some(err.as_ref()),
            DataError::Query(err) => Some(err),
            _ => None,
        }
    }
}

impl From<QueryError> for DataError {
    fn from(err: QueryError) -> Self {
        DataError::Query(err)
    }
}

/// Convenience alias for data-layer results.
pub type DataResult<T> = Result<T, DataError>;
