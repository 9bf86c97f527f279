//! Field introspection and target-field resolution.

use crate::error::{DataError, DataResult};
use crate::record::{flatten, Record};
use crate::value::{Value, ValueKind};

/// A non-default field of a record, with its resolved column name.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInformation {
    pub name: String,
    pub column_name: String,
    pub value: Value,
    pub kind: ValueKind,
}

/// Every field of `record` whose value is not its type's zero value.
pub fn non_default_fields<R: Record + ?Sized>(record: &R) -> Vec<FieldInformation> {
    flatten(record)
        .into_iter()
        .filter(|field| !field.zero)
        .map(|field| FieldInformation {
            name: field.descriptor.name.to_string(),
            column_name: field.descriptor.column_name(),
            kind: field.value.kind(),
            value: field.value,
        })
        .collect()
}

/// The single non-default field of exactly `kind`.
///
/// Fails with [`DataError::NoTargetField`] when there is none and with
/// [`DataError::AmbiguousTargetField`] when there are several; it never picks
/// one of several candidates.
pub fn resolve_target_field<R: Record + ?Sized>(
    record: &R,
    kind: ValueKind,
) -> DataResult<FieldInformation> {
    let fields = non_default_fields(record);
    if fields.is_empty() {
        return Err(DataError::NoTargetField { expected: None });
    }

    let mut matches: Vec<FieldInformation> =
        fields.into_iter().filter(|f| f.kind == kind).collect();
    match matches.len() {
        0 => Err(DataError::NoTargetField {
            expected: Some(kind),
        }),
        1 => Ok(matches.remove(0)),
        _ => Err(DataError::AmbiguousTargetField {
            kind,
            fields: matches.into_iter().map(|f| f.name).collect(),
        }),
    }
}

/// The primary-key field of a record instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryKey {
    pub column_name: String,
    pub value: Value,
    pub zero: bool,
}

/// Locate the field flagged as primary key, falling back to a field whose
/// column is `id`.
pub fn resolve_primary_key<R: Record + ?Sized>(record: &R) -> Option<PrimaryKey> {
    let fields = flatten(record);
    let field = fields
        .iter()
        .find(|f| f.descriptor.primary_key)
        .or_else(|| fields.iter().find(|f| f.descriptor.column_name() == "id"))?;
    Some(PrimaryKey {
        column_name: field.descriptor.column_name(),
        value: field.value.clone(),
        zero: field.zero,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FieldDescriptor, FlatField};
    use crate::value::{DeletedAt, Timestamp};
    use chrono::{DateTime, TimeZone, Utc};

    #[derive(Default)]
    struct Person {
        id: u32,
        name: String,
        age: i32,
        score: i32,
        nickname: Option<String>,
        born: Option<Timestamp>,
        seen_at: Option<Timestamp>,
        deleted_at: DeletedAt,
    }

    impl Record for Person {
        fn describe(out: &mut Vec<FieldDescriptor>) {
            out.push(FieldDescriptor::new("id", ValueKind::U32).primary_key());
            out.push(FieldDescriptor::new("name", ValueKind::Text).column("full_name"));
            out.push(FieldDescriptor::new("age", ValueKind::I32));
            out.push(FieldDescriptor::new("score", ValueKind::I32));
            out.push(FieldDescriptor::new("nickname", ValueKind::Text));
            out.push(FieldDescriptor::new("born", ValueKind::Timestamp));
            out.push(FieldDescriptor::new("SeenAt", ValueKind::Timestamp));
            out.push(FieldDescriptor::new("deleted_at", ValueKind::DeletedAt));
        }

        fn flatten_into(&self, out: &mut Vec<FlatField>) {
            let mut descriptors = Vec::new();
            Self::describe(&mut descriptors);
            let mut d = descriptors.into_iter();
            let mut next = || d.next().expect("descriptor");
            out.push(FlatField::new(next(), &self.id));
            out.push(FlatField::new(next(), &self.name));
            out.push(FlatField::new(next(), &self.age));
            out.push(FlatField::new(next(), &self.score));
            out.push(FlatField::new(next(), &self.nickname));
            out.push(FlatField::new(next(), &self.born));
            out.push(FlatField::new(next(), &self.seen_at));
            out.push(FlatField::new(next(), &self.deleted_at));
        }
    }

    fn ts(y: i32, m: u32, d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_non_default_fields_skip_zero() {
        let p = Person {
            name: "ann".into(),
            age: 20,
            ..Default::default()
        };
        let fields = non_default_fields(&p);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].column_name, "full_name");
        assert_eq!(fields[0].value, Value::Text("ann".into()));
        assert_eq!(fields[1].column_name, "age");
        assert_eq!(fields[1].kind, ValueKind::I32);
    }

    #[test]
    fn test_empty_record_has_no_fields() {
        assert!(non_default_fields(&Person::default()).is_empty());
    }

    #[test]
    fn test_some_zero_counts_as_set() {
        let p = Person {
            nickname: Some(String::new()),
            ..Default::default()
        };
        let fields = non_default_fields(&p);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].kind, ValueKind::Text);
        assert_eq!(fields[0].value, Value::Text(String::new()));
    }

    #[test]
    fn test_resolve_single_match() {
        let p = Person {
            age: 23,
            name: "x".into(),
            born: Some(ts(2000, 1, 1)),
            ..Default::default()
        };
        let field = resolve_target_field(&p, ValueKind::Timestamp).unwrap();
        assert_eq!(field.column_name, "born");
        assert_eq!(field.value, Value::Timestamp(ts(2000, 1, 1)));

        let field = resolve_target_field(&p, ValueKind::I32).unwrap();
        assert_eq!(field.name, "age");
    }

    #[test]
    fn test_resolve_none_set() {
        let err = resolve_target_field(&Person::default(), ValueKind::I32).unwrap_err();
        assert!(matches!(err, DataError::NoTargetField { expected: None }));
    }

    #[test]
    fn test_resolve_no_field_of_kind() {
        let p = Person {
            name: "x".into(),
            ..Default::default()
        };
        let err = resolve_target_field(&p, ValueKind::Timestamp).unwrap_err();
        assert!(matches!(
            err,
            DataError::NoTargetField {
                expected: Some(ValueKind::Timestamp)
            }
        ));
    }

    #[test]
    fn test_resolve_exact_kind_only() {
        let p = Person {
            id: 7,
            ..Default::default()
        };
        // u32 id is not an i32 candidate
        assert!(resolve_target_field(&p, ValueKind::I32).is_err());
        assert_eq!(
            resolve_target_field(&p, ValueKind::U32).unwrap().column_name,
            "id"
        );
    }

    #[test]
    fn test_resolve_ambiguous() {
        let p = Person {
            born: Some(ts(2000, 1, 1)),
            seen_at: Some(ts(2020, 1, 1)),
            ..Default::default()
        };
        let err = resolve_target_field(&p, ValueKind::Timestamp).unwrap_err();
        match err {
            DataError::AmbiguousTargetField { kind, fields } => {
                assert_eq!(kind, ValueKind::Timestamp);
                assert_eq!(fields, vec!["born", "SeenAt"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_deleted_at_is_not_a_timestamp() {
        let p = Person {
            born: Some(ts(2000, 1, 1)),
            deleted_at: DeletedAt::at(ts(2001, 1, 1)),
            ..Default::default()
        };
        let field = resolve_target_field(&p, ValueKind::Timestamp).unwrap();
        assert_eq!(field.name, "born");
        let field = resolve_target_field(&p, ValueKind::DeletedAt).unwrap();
        assert_eq!(field.column_name, "deleted_at");
    }

    #[test]
    fn test_some_epoch_is_not_default() {
        let p = Person {
            born: Some(DateTime::<Utc>::UNIX_EPOCH),
            ..Default::default()
        };
        // Some(epoch) is set: the option is the pointer, not the pointee
        assert_eq!(non_default_fields(&p).len(), 1);
    }

    #[test]
    fn test_resolve_primary_key() {
        let p = Person {
            id: 3,
            ..Default::default()
        };
        let pk = resolve_primary_key(&p).unwrap();
        assert_eq!(pk.column_name, "id");
        assert_eq!(pk.value, Value::U32(3));
        assert!(!pk.zero);
        assert!(resolve_primary_key(&Person::default()).unwrap().zero);
    }
}
