//! SQL statement rendering.
//!
//! # Example
//!
//! ```
//! use repokit_data::query::{Dialect, Operator, QueryBuilder};
//!
//! let stmt = QueryBuilder::new("users")
//!     .dialect(Dialect::Postgres)
//!     .where_eq("username", "alice")
//!     .where_cmp("age", Operator::Lte, 23)
//!     .order_by("id", true)
//!     .limit(10)
//!     .build_select(&["*"])
//!     .unwrap();
//! assert_eq!(
//!     stmt.sql,
//!     "SELECT * FROM users WHERE username = $1 AND age <= $2 ORDER BY id ASC LIMIT 10"
//! );
//! assert_eq!(stmt.params.len(), 2);
//! ```

use std::fmt;

use crate::filter::Filter;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Generic SQL using `?` placeholders (default).
    #[default]
    Generic,
    /// SQLite-style `?` placeholders.
    Sqlite,
    /// MySQL-style `?` placeholders with backtick quoting.
    MySql,
    /// Postgres-style `$1, $2, ...` placeholders.
    Postgres,
}

impl Dialect {
    fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Generic | Dialect::Sqlite | Dialect::MySql => "?".to_string(),
        }
    }

    fn quote_char(self) -> char {
        match self {
            Dialect::MySql => '`',
            Dialect::Generic | Dialect::Sqlite | Dialect::Postgres => '"',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierPolicy {
    /// Do not validate or quote identifiers.
    Raw,
    /// Validate identifiers against a conservative pattern.
    #[default]
    Validate,
    /// Validate and quote identifiers using the dialect quoting style.
    Quote,
}

/// Comparison operator for numeric and time predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Operator {
    pub fn as_sql(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One predicate of a conjunction.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(String, Value),
    Like(String, Value),
    Compare(String, Operator, Value),
    IsNull(String),
}

/// Rendered SQL with its positional bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    conditions: Vec<Condition>,
    order: Vec<(String, bool)>,
    limit_val: Option<i64>,
    offset_val: Option<i64>,
    dialect: Dialect,
    identifier_policy: IdentifierPolicy,
}

impl QueryBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            conditions: Vec::new(),
            order: Vec::new(),
            limit_val: None,
            offset_val: None,
            dialect: Dialect::Generic,
            identifier_policy: IdentifierPolicy::Validate,
        }
    }

    /// Create a new builder with an explicit SQL dialect.
    pub fn new_with_dialect(table: &str, dialect: Dialect) -> Self {
        Self::new(table).dialect(dialect)
    }

    /// Set the SQL dialect (affects placeholder style and quoting).
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Configure identifier validation/quoting behavior.
    pub fn identifier_policy(mut self, policy: IdentifierPolicy) -> Self {
        self.identifier_policy = policy;
        self
    }

    pub fn where_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Eq(column.to_string(), value.into()));
        self
    }

    pub fn where_like(mut self, column: &str, pattern: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Like(column.to_string(), pattern.into()));
        self
    }

    pub fn where_cmp(mut self, column: &str, op: Operator, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Compare(column.to_string(), op, value.into()));
        self
    }

    pub fn where_null(mut self, column: &str) -> Self {
        self.conditions.push(Condition::IsNull(column.to_string()));
        self
    }

    /// Append every condition of `filter`.
    pub fn filter(mut self, filter: &Filter) -> Self {
        self.conditions.extend(filter.conditions().iter().cloned());
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order.push((column.to_string(), ascending));
        self
    }

    /// Row limit. A negative limit means unbounded.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit_val = Some(limit);
        self
    }

    /// Row offset. Zero or negative offsets are not rendered.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset_val = Some(offset);
        self
    }

    /// Build a SELECT statement for `columns` (e.g. `&["*"]`).
    pub fn build_select(&self, columns: &[&str]) -> Result<Statement, QueryError> {
        let table = self.format_identifier(&self.table, false, "table")?;
        let columns = self.format_column_list(columns)?;

        let mut sql = format!("SELECT {columns} FROM {table}");
        let mut params = Vec::new();
        self.append_where(&mut sql, &mut params)?;
        self.append_order(&mut sql)?;
        self.append_limit_offset(&mut sql);
        Ok(Statement { sql, params })
    }

    /// Build a COUNT statement over the same conditions.
    pub fn build_count(&self) -> Result<Statement, QueryError> {
        let table = self.format_identifier(&self.table, false, "table")?;
        let mut sql = format!("SELECT COUNT(*) FROM {table}");
        let mut params = Vec::new();
        self.append_where(&mut sql, &mut params)?;
        Ok(Statement { sql, params })
    }

    /// Build `INSERT ... RETURNING *` for the given column/value pairs.
    pub fn build_insert(&self, values: &[(String, Value)]) -> Result<Statement, QueryError> {
        let table = self.format_identifier(&self.table, false, "table")?;
        if values.is_empty() {
            return Ok(Statement {
                sql: format!("INSERT INTO {table} DEFAULT VALUES RETURNING *"),
                params: Vec::new(),
            });
        }

        let mut columns = Vec::with_capacity(values.len());
        let mut placeholders = Vec::with_capacity(values.len());
        let mut params = Vec::with_capacity(values.len());
        for (column, value) in values {
            columns.push(self.format_identifier(column, false, "column")?);
            params.push(value.clone());
            placeholders.push(self.dialect.placeholder(params.len()));
        }
        Ok(Statement {
            sql: format!(
                "INSERT INTO {table} ({}) VALUES ({}) RETURNING *",
                columns.join(", "),
                placeholders.join(", ")
            ),
            params,
        })
    }

    /// Build `UPDATE ... SET ... WHERE ...`. The conditions are required: an
    /// unconditioned update is rejected.
    pub fn build_update(&self, assignments: &[(String, Value)]) -> Result<Statement, QueryError> {
        self.render_update(assignments, false)
    }

    /// Same as [`build_update`](Self::build_update) with `RETURNING *`.
    pub fn build_update_returning(
        &self,
        assignments: &[(String, Value)],
    ) -> Result<Statement, QueryError> {
        self.render_update(assignments, true)
    }

    fn render_update(
        &self,
        assignments: &[(String, Value)],
        returning: bool,
    ) -> Result<Statement, QueryError> {
        let table = self.format_identifier(&self.table, false, "table")?;
        if assignments.is_empty() {
            return Err(QueryError::EmptyAssignment {
                table: self.table.clone(),
            });
        }
        if self.conditions.is_empty() {
            return Err(QueryError::MissingCondition {
                table: self.table.clone(),
            });
        }

        let mut params = Vec::with_capacity(assignments.len());
        let mut sets = Vec::with_capacity(assignments.len());
        for (column, value) in assignments {
            let column = self.format_identifier(column, false, "column")?;
            params.push(value.clone());
            sets.push(format!(
                "{column} = {}",
                self.dialect.placeholder(params.len())
            ));
        }
        let mut sql = format!("UPDATE {table} SET {}", sets.join(", "));
        self.append_where(&mut sql, &mut params)?;
        if returning {
            sql.push_str(" RETURNING *");
        }
        Ok(Statement { sql, params })
    }

    /// Build `DELETE FROM ... WHERE ...`. Like updates, requires conditions.
    pub fn build_delete(&self) -> Result<Statement, QueryError> {
        let table = self.format_identifier(&self.table, false, "table")?;
        if self.conditions.is_empty() {
            return Err(QueryError::MissingCondition {
                table: self.table.clone(),
            });
        }
        let mut sql = format!("DELETE FROM {table}");
        let mut params = Vec::new();
        self.append_where(&mut sql, &mut params)?;
        Ok(Statement { sql, params })
    }

    fn append_where(&self, sql: &mut String, params: &mut Vec<Value>) -> Result<(), QueryError> {
        if self.conditions.is_empty() {
            return Ok(());
        }
        sql.push_str(" WHERE ");
        let mut first = true;
        for cond in &self.conditions {
            if !first {
                sql.push_str(" AND ");
            }
            first = false;
            match cond {
                Condition::Eq(col, val) => {
                    let col = self.format_identifier(col, false, "column")?;
                    params.push(val.clone());
                    let placeholder = self.dialect.placeholder(params.len());
                    sql.push_str(&format!("{col} = {placeholder}"));
                }
                Condition::Like(col, pat) => {
                    let col = self.format_identifier(col, false, "column")?;
                    params.push(pat.clone());
                    let placeholder = self.dialect.placeholder(params.len());
                    sql.push_str(&format!("{col} LIKE {placeholder}"));
                }
                Condition::Compare(col, op, val) => {
                    let col = self.format_identifier(col, false, "column")?;
                    params.push(val.clone());
                    let placeholder = self.dialect.placeholder(params.len());
                    sql.push_str(&format!("{col} {op} {placeholder}"));
                }
                Condition::IsNull(col) => {
                    let col = self.format_identifier(col, false, "column")?;
                    sql.push_str(&format!("{col} IS NULL"));
                }
            }
        }
        Ok(())
    }

    fn append_order(&self, sql: &mut String) -> Result<(), QueryError> {
        if self.order.is_empty() {
            return Ok(());
        }
        sql.push_str(" ORDER BY ");
        let mut clauses = Vec::with_capacity(self.order.len());
        for (col, asc) in &self.order {
            let col = self.format_identifier(col, false, "column")?;
            if *asc {
                clauses.push(format!("{col} ASC"));
            } else {
                clauses.push(format!("{col} DESC"));
            }
        }
        sql.push_str(&clauses.join(", "));
        Ok(())
    }

    fn append_limit_offset(&self, sql: &mut String) {
        if let Some(limit) = self.limit_val.filter(|l| *l >= 0) {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset_val.filter(|o| *o > 0) {
            // SQLite and MySQL only accept OFFSET after a LIMIT
            if self.limit_val.map_or(true, |l| l < 0) {
                match self.dialect {
                    Dialect::Generic | Dialect::Sqlite => sql.push_str(" LIMIT -1"),
                    Dialect::MySql => sql.push_str(" LIMIT 18446744073709551615"),
                    Dialect::Postgres => {}
                }
            }
            sql.push_str(&format!(" OFFSET {offset}"));
        }
    }

    fn format_column_list(&self, columns: &[&str]) -> Result<String, QueryError> {
        let mut out = Vec::with_capacity(columns.len());
        for col in columns {
            out.push(self.format_identifier(col, true, "column")?);
        }
        Ok(out.join(", "))
    }

    fn format_identifier(
        &self,
        ident: &str,
        allow_star: bool,
        kind: &'static str,
    ) -> Result<String, QueryError> {
        match self.identifier_policy {
            IdentifierPolicy::Raw => Ok(ident.to_string()),
            IdentifierPolicy::Validate | IdentifierPolicy::Quote => {
                if !is_valid_identifier(ident, allow_star) {
                    return Err(QueryError::InvalidIdentifier {
                        kind,
                        ident: ident.to_string(),
                    });
                }
                if self.identifier_policy == IdentifierPolicy::Quote {
                    Ok(quote_identifier(ident, self.dialect, allow_star))
                } else {
                    Ok(ident.to_string())
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    InvalidIdentifier { kind: &'static str, ident: String },
    /// An UPDATE with nothing to set.
    EmptyAssignment { table: String },
    /// An UPDATE or DELETE without a WHERE clause.
    MissingCondition { table: String },
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::InvalidIdentifier { kind, ident } => {
                write!(f, "Invalid {kind} identifier: {ident}")
            }
            QueryError::EmptyAssignment { table } => {
                write!(f, "Update on {table} has no columns to set")
            }
            QueryError::MissingCondition { table } => {
                write!(f, "Refusing unconditioned write on {table}")
            }
        }
    }
}

impl std::error::Error for QueryError {}

fn is_valid_identifier(ident: &str, allow_star: bool) -> bool {
    if ident.is_empty() {
        return false;
    }
    let parts: Vec<&str> = ident.split('.').collect();
    for (idx, part) in parts.iter().enumerate() {
        if allow_star && *part == "*" {
            return idx + 1 == parts.len();
        }
        if !is_valid_segment(part) {
            return false;
        }
    }
    true
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn quote_identifier(ident: &str, dialect: Dialect, allow_star: bool) -> String {
    let quote = dialect.quote_char();
    let parts: Vec<&str> = ident.split('.').collect();
    let last_idx = parts.len().saturating_sub(1);
    parts
        .into_iter()
        .enumerate()
        .map(|(idx, part)| {
            if allow_star && part == "*" && idx == last_idx {
                part.to_string()
            } else {
                format!("{quote}{part}{quote}")
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}
