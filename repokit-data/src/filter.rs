//! Predicate construction from sparse condition records.

use std::collections::BTreeMap;

use crate::error::DataResult;
use crate::introspect::{non_default_fields, resolve_target_field};
use crate::query::{Condition, Operator};
use crate::record::Record;
use crate::value::{Number, Timestamp, Value, ValueKind};

/// Column name to value, read as an AND of equalities.
///
/// Ordered by column so rendered SQL is stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryMap(BTreeMap<String, Value>);

impl QueryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every non-default field of `record`, keyed by resolved column.
    pub fn from_record<R: Record + ?Sized>(record: &R) -> Self {
        non_default_fields(record)
            .into_iter()
            .map(|f| (f.column_name, f.value))
            .collect()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(column.into(), value.into())
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for QueryMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        QueryMap(iter.into_iter().collect())
    }
}

impl IntoIterator for QueryMap {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A conjunction of conditions built from a condition record.
///
/// Builders that resolve a target field fail before anything is rendered, so
/// a resolver error never reaches the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Matches everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// `column = value` for every non-default field.
    pub fn equality<R: Record + ?Sized>(record: &R) -> Self {
        Self::from_map(QueryMap::from_record(record))
    }

    pub fn from_map(map: QueryMap) -> Self {
        Self {
            conditions: map
                .into_iter()
                .map(|(column, value)| Condition::Eq(column, value))
                .collect(),
        }
    }

    /// `column LIKE value` for every non-default text field. The caller
    /// supplies the wildcards; other kinds are ignored.
    pub fn pattern<R: Record + ?Sized>(record: &R) -> Self {
        Self {
            conditions: non_default_fields(record)
                .into_iter()
                .filter(|f| f.kind == ValueKind::Text)
                .map(|f| Condition::Like(f.column_name, f.value))
                .collect(),
        }
    }

    /// `column <op> value` on the single non-default field of `N`'s kind.
    pub fn compare<R: Record + ?Sized, N: Number>(
        record: &R,
        value: N,
        op: Operator,
    ) -> DataResult<Self> {
        let field = resolve_target_field(record, N::KIND)?;
        Ok(Self {
            conditions: vec![Condition::Compare(field.column_name, op, value.to_value())],
        })
    }

    /// Rows whose timestamp field is strictly before `ts`.
    pub fn before<R: Record + ?Sized>(record: &R, ts: Timestamp) -> DataResult<Self> {
        let column = resolve_time_column(record)?;
        Ok(Self {
            conditions: vec![Condition::Compare(column, Operator::Lt, Value::Timestamp(ts))],
        })
    }

    /// Rows whose timestamp field is strictly after `ts`.
    pub fn after<R: Record + ?Sized>(record: &R, ts: Timestamp) -> DataResult<Self> {
        let column = resolve_time_column(record)?;
        Ok(Self {
            conditions: vec![Condition::Compare(column, Operator::Gt, Value::Timestamp(ts))],
        })
    }

    /// Rows strictly between `start` and `end`; both bounds exclusive.
    pub fn between<R: Record + ?Sized>(
        record: &R,
        start: Timestamp,
        end: Timestamp,
    ) -> DataResult<Self> {
        let column = resolve_time_column(record)?;
        Ok(Self {
            conditions: vec![
                Condition::Compare(column.clone(), Operator::Gt, Value::Timestamp(start)),
                Condition::Compare(column, Operator::Lt, Value::Timestamp(end)),
            ],
        })
    }

    /// Add a condition.
    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

fn resolve_time_column<R: Record + ?Sized>(record: &R) -> DataResult<String> {
    Ok(resolve_target_field(record, ValueKind::Timestamp)?.column_name)
}
