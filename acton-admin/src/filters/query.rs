//! Query abstraction that filters extend
//!
//! Filters never build SQL strings themselves. They hand a [`Predicate`] to a
//! [`Query`] implementation and get a new query back. [`SelectQuery`] is the
//! stock implementation: it renders to a bound `sqlx` statement for
//! `PostgreSQL` and can also be evaluated against in-memory [`Record`]s.

use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;

use super::like::like_matches;
use super::value::FilterValue;

/// Read-only handle to a queryable column, supplied by the schema layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    type_name: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    enum_values: Vec<String>,
}

impl Column {
    /// Create a column handle from its name and declared type name
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            label: None,
            enum_values: Vec::new(),
        }
    }

    /// Set the display label used for the column's filters
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Declare the legal values of an enum column, in declaration order
    #[must_use]
    pub fn with_enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Column name as used in queries, optionally `table.column`
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type name
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Declared enum values
    #[must_use]
    pub fn enum_values(&self) -> &[String] {
        &self.enum_values
    }

    /// Display label, derived from the name when none was set
    ///
    /// `created_at` becomes `Created At`.
    #[must_use]
    pub fn label(&self) -> String {
        self.label.clone().unwrap_or_else(|| {
            let base = self.name.rsplit('.').next().unwrap_or(&self.name);
            base.split('_')
                .filter(|word| !word.is_empty())
                .map(|word| {
                    let mut chars = word.chars();
                    chars.next().map_or_else(String::new, |first| {
                        first.to_uppercase().chain(chars).collect()
                    })
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
    }
}

/// Comparison operator of a [`Predicate::Compare`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `<`
    Lt,
}

impl CompareOp {
    const fn sql(self) -> &'static str {
        match self {
            Self::Eq => " = ",
            Self::Ne => " != ",
            Self::Gt => " > ",
            Self::Lt => " < ",
        }
    }
}

/// Boolean expression over one column
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column <op> value`, or `column::text <op> value` when `text_cast` is set
    Compare {
        /// Column name
        column: String,
        /// Operator
        op: CompareOp,
        /// Right-hand operand
        value: FilterValue,
        /// Compare the column's text form, as needed for native enum types
        text_cast: bool,
    },
    /// `column BETWEEN low AND high`, inclusive of both bounds
    Between {
        /// Column name
        column: String,
        /// Lower bound
        low: FilterValue,
        /// Upper bound
        high: FilterValue,
    },
    /// `column ILIKE pattern ESCAPE '\'`
    ILike {
        /// Column name
        column: String,
        /// Escaped pattern
        pattern: String,
    },
    /// `NOT (predicate)`
    Not(Box<Predicate>),
}

impl Predicate {
    fn compare(column: &str, op: CompareOp, value: FilterValue) -> Self {
        Self::Compare {
            column: column.to_string(),
            op,
            value,
            text_cast: false,
        }
    }

    /// `column = value`
    #[must_use]
    pub fn equals(column: &str, value: FilterValue) -> Self {
        Self::compare(column, CompareOp::Eq, value)
    }

    /// `column != value`
    #[must_use]
    pub fn not_equals(column: &str, value: FilterValue) -> Self {
        Self::compare(column, CompareOp::Ne, value)
    }

    /// `column > value`
    #[must_use]
    pub fn greater(column: &str, value: FilterValue) -> Self {
        Self::compare(column, CompareOp::Gt, value)
    }

    /// `column < value`
    #[must_use]
    pub fn smaller(column: &str, value: FilterValue) -> Self {
        Self::compare(column, CompareOp::Lt, value)
    }

    /// `column BETWEEN low AND high`
    #[must_use]
    pub fn between(column: &str, low: FilterValue, high: FilterValue) -> Self {
        Self::Between {
            column: column.to_string(),
            low,
            high,
        }
    }

    /// Case-insensitive pattern match with an already escaped pattern
    #[must_use]
    pub fn ilike(column: &str, pattern: impl Into<String>) -> Self {
        Self::ILike {
            column: column.to_string(),
            pattern: pattern.into(),
        }
    }

    /// Compare against the column cast to `text`
    ///
    /// Postgres has no implicit `text` to enum cast, so a bound string can
    /// only be compared with an enum column through its text form.
    #[must_use]
    pub fn cast_to_text(self) -> Self {
        match self {
            Self::Compare {
                column, op, value, ..
            } => Self::Compare {
                column,
                op,
                value,
                text_cast: true,
            },
            Self::Not(inner) => Self::Not(Box::new(inner.cast_to_text())),
            other => other,
        }
    }

    /// Wrap in `NOT`
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Evaluate with SQL three-valued logic
    ///
    /// `None` stands for SQL `NULL`: a missing field or an incomparable
    /// operand. Neither a predicate nor its negation holds for such a row.
    #[must_use]
    pub fn evaluate(&self, record: &Record) -> Option<bool> {
        match self {
            Self::Compare {
                column, op, value, ..
            } => {
                let ordering = record.get(column)?.compare(value)?;
                Some(match op {
                    CompareOp::Eq => ordering.is_eq(),
                    CompareOp::Ne => ordering.is_ne(),
                    CompareOp::Gt => ordering.is_gt(),
                    CompareOp::Lt => ordering.is_lt(),
                })
            }
            Self::Between { column, low, high } => {
                let field = record.get(column)?;
                Some(field.compare(low)?.is_ge() && field.compare(high)?.is_le())
            }
            Self::ILike { column, pattern } => {
                let text = record.get(column)?.as_text()?;
                Some(like_matches(pattern, text))
            }
            Self::Not(inner) => inner.evaluate(record).map(|holds| !holds),
        }
    }

    fn push_sql(&self, builder: &mut QueryBuilder<'static, Postgres>) {
        match self {
            Self::Compare {
                column,
                op,
                value,
                text_cast,
            } => {
                builder.push(quote_ident(column));
                if *text_cast {
                    builder.push("::text");
                }
                builder.push(op.sql());
                push_value(builder, value);
            }
            Self::Between { column, low, high } => {
                builder.push(quote_ident(column)).push(" BETWEEN ");
                push_value(builder, low);
                builder.push(" AND ");
                push_value(builder, high);
            }
            Self::ILike { column, pattern } => {
                builder
                    .push(quote_ident(column))
                    .push(" ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" ESCAPE '\\'");
            }
            Self::Not(inner) => {
                builder.push("NOT (");
                inner.push_sql(builder);
                builder.push(")");
            }
        }
    }
}

impl std::ops::Not for Predicate {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

fn quote_ident(name: &str) -> String {
    name.split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

fn push_value(builder: &mut QueryBuilder<'static, Postgres>, value: &FilterValue) {
    match value {
        FilterValue::Text(text) => builder.push_bind(text.clone()),
        FilterValue::Integer(integer) => builder.push_bind(*integer),
        FilterValue::Float(float) => builder.push_bind(*float),
        FilterValue::Boolean(flag) => builder.push_bind(*flag),
        FilterValue::Date(date) => builder.push_bind(*date),
        FilterValue::DateTime(datetime) => builder.push_bind(*datetime),
        FilterValue::Time(time) => builder.push_bind(*time),
    };
}

/// Chainable query expression that filters narrow
pub trait Query: Sized {
    /// Return a new query additionally constrained by `predicate`
    #[must_use]
    fn filter(self, predicate: Predicate) -> Self;
}

/// Row of named values for in-memory evaluation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: HashMap<String, FilterValue>,
}

impl Record {
    /// Create an empty record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    /// Look up a field; missing fields behave as SQL `NULL`
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&FilterValue> {
        self.fields.get(column)
    }
}

/// `SELECT *` over one table with AND-ed predicates
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    table: String,
    predicates: Vec<Predicate>,
}

impl SelectQuery {
    /// Start an unfiltered query over `table`
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            predicates: Vec::new(),
        }
    }

    /// Predicates applied so far, in application order
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Whether `record` satisfies every predicate
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.predicates
            .iter()
            .all(|predicate| predicate.evaluate(record) == Some(true))
    }

    /// Records from `records` that satisfy the query, in input order
    #[must_use]
    pub fn filter_records<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|record| self.matches(record)).collect()
    }

    /// Render the statement with bound parameters
    #[must_use]
    pub fn to_sql(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT * FROM ");
        builder.push(quote_ident(&self.table));

        for (index, predicate) in self.predicates.iter().enumerate() {
            builder.push(if index == 0 { " WHERE (" } else { " AND (" });
            predicate.push_sql(&mut builder);
            builder.push(")");
        }

        builder
    }

    /// Execute against a pool
    ///
    /// # Errors
    ///
    /// Returns the database error if the statement fails.
    pub async fn fetch_all(&self, pool: &PgPool) -> Result<Vec<PgRow>, sqlx::Error> {
        let mut builder = self.to_sql();
        tracing::debug!(sql = builder.sql(), "Running filtered list query");
        builder.build().fetch_all(pool).await
    }
}

impl Query for SelectQuery {
    fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }
}
