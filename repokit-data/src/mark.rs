//! Sentinel values for condition records.
//!
//! Range and comparison queries locate their column by finding the single
//! non-default field of the right kind. When the caller only needs to point
//! at a field, these values set it without meaning anything as data.
//!
//! ```
//! use repokit_data::mark;
//! use repokit_data::value::FieldValue;
//!
//! assert!(!mark::target_time().is_zero());
//! assert!(mark::target_deleted_at().is_deleted());
//! ```

use chrono::{DateTime, Duration, Utc};

use crate::value::{DeletedAt, Timestamp};

/// One nanosecond past the zero timestamp.
pub fn target_time() -> Timestamp {
    DateTime::<Utc>::UNIX_EPOCH + Duration::nanoseconds(1)
}

/// A soft-delete marker holding [`target_time`].
pub fn target_deleted_at() -> DeletedAt {
    DeletedAt::at(target_time())
}
