//! Reusable base record.

use serde::{Deserialize, Serialize};

use crate::record::{FieldDescriptor, FlatField, Record};
use crate::value::{DeletedAt, Timestamp, ValueKind};

/// Identity, audit timestamps and soft-delete marker.
///
/// Embed it with `#[orm(embedded)]` (and `#[sqlx(flatten)]` for row mapping):
/// creates stamp `created_at`/`updated_at`, updates refresh `updated_at`, and
/// deletes become soft deletes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Model {
    pub id: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: DeletedAt,
}

const ID: FieldDescriptor = FieldDescriptor::new("id", ValueKind::I64);
const CREATED_AT: FieldDescriptor = FieldDescriptor::new("created_at", ValueKind::Timestamp);
const UPDATED_AT: FieldDescriptor = FieldDescriptor::new("updated_at", ValueKind::Timestamp);
const DELETED_AT: FieldDescriptor = FieldDescriptor::new("deleted_at", ValueKind::DeletedAt);

impl Record for Model {
    fn describe(out: &mut Vec<FieldDescriptor>) {
        out.push(ID.primary_key());
        out.push(CREATED_AT);
        out.push(UPDATED_AT);
        out.push(DELETED_AT);
    }

    fn flatten_into(&self, out: &mut Vec<FlatField>) {
        out.push(FlatField::new(ID.primary_key(), &self.id));
        out.push(FlatField::new(CREATED_AT, &self.created_at));
        out.push(FlatField::new(UPDATED_AT, &self.updated_at));
        out.push(FlatField::new(DELETED_AT, &self.deleted_at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::{non_default_fields, resolve_primary_key};
    use crate::record::{primary_key_column, soft_delete_column};

    #[test]
    fn test_default_model_is_empty() {
        assert!(non_default_fields(&Model::default()).is_empty());
    }

    #[test]
    fn test_schema() {
        assert_eq!(primary_key_column::<Model>(), "id");
        assert_eq!(soft_delete_column::<Model>().as_deref(), Some("deleted_at"));
        let pk = resolve_primary_key(&Model {
            id: 4,
            ..Default::default()
        })
        .unwrap();
        assert!(!pk.zero);
    }
}
