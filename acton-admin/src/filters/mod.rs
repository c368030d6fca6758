//! Typed list filters for admin views
//!
//! A column's declared type name is turned into an ordered list of
//! [`Filter`]s by a [`FilterConverter`]. Each filter cleans the raw text a
//! user typed into a typed [`CleanedValue`] and applies it to a [`Query`].
//!
//! # Example
//!
//! ```rust
//! use acton_admin::filters::{Column, FilterConverter, SelectQuery};
//! use std::sync::Arc;
//!
//! let converter = FilterConverter::new();
//! let column = Arc::new(Column::new("published", "date"));
//! let filters = converter.convert("DATE", &column, "Published", &Default::default()).unwrap();
//!
//! let in_range = &filters[2];
//! let value = in_range.clean("2020-01-01 to 2020-01-31").unwrap();
//! let query = in_range.apply(SelectQuery::new("posts"), &value).unwrap();
//!
//! assert_eq!(
//!     query.to_sql().sql(),
//!     "SELECT * FROM \"posts\" WHERE (\"published\" BETWEEN $1 AND $2)"
//! );
//! ```

mod args;
mod convert;
mod like;
mod query;
mod value;

pub use args::{ActiveFilter, FilterArgError, FilterGroup, FilterOperation, ParsedFilters};
pub use convert::{ConvertOptions, ConverterFn, FilterConverter, DEFAULT_CONVERTER};
pub use like::{escape_like, like_matches, parse_like_term, LIKE_ESCAPE};
pub use query::{Column, CompareOp, Predicate, Query, Record, SelectQuery};
pub use value::{
    CleanedValue, FilterValue, DATETIME_FORMAT, DATE_FORMAT, RANGE_SEPARATOR, TIME_FORMAT,
};

use std::sync::Arc;
use thiserror::Error;

use crate::i18n::Translator;

/// Errors raised while cleaning or applying a filter value
///
/// All of these are user-facing: the listing should be re-rendered with the
/// message next to the offending filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Value could not be parsed into the column's type
    #[error("invalid value '{value}': expected {expected}")]
    InvalidValue {
        /// Raw input
        value: String,
        /// Description of the accepted format
        expected: &'static str,
    },

    /// Range value was not two endpoints joined by `" to "`
    #[error("invalid range '{value}': expected two values separated by ' to '")]
    InvalidRange {
        /// Raw input
        value: String,
    },

    /// Value is not one of the filter's fixed options
    #[error("'{value}' is not one of the allowed choices")]
    InvalidChoice {
        /// Raw input
        value: String,
    },

    /// A cleaned value of the wrong shape was passed to `apply`
    #[error("filter '{filter}' ({operation}) cannot be applied to this value")]
    ValueShape {
        /// Filter display name
        filter: String,
        /// Operation message id
        operation: &'static str,
    },

    /// Filter argument key is not `flt<pos>_<index>`
    #[error("malformed filter argument '{0}'")]
    MalformedArgument(String),

    /// Filter argument references a filter that does not exist
    #[error("unknown filter index {0}")]
    UnknownFilter(usize),
}

impl FilterError {
    pub(crate) fn invalid_value(value: &str, expected: &'static str) -> Self {
        Self::InvalidValue {
            value: value.to_string(),
            expected,
        }
    }
}

/// Operator family of a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Column equals value
    Equal,
    /// Column differs from value
    NotEqual,
    /// Column contains the term, ignoring case
    Like,
    /// Column does not contain the term
    NotLike,
    /// Column is greater than value
    Greater,
    /// Column is smaller than value
    Smaller,
    /// Column lies between two bounds, inclusive
    InRange,
    /// Column lies outside two bounds
    NotInRange,
}

impl FilterKind {
    /// Untranslated operation name
    #[must_use]
    pub const fn operation(self) -> &'static str {
        match self {
            Self::Equal => "equals",
            Self::NotEqual => "not equal",
            Self::Like => "contains",
            Self::NotLike => "not contains",
            Self::Greater => "greater than",
            Self::Smaller => "smaller than",
            Self::InRange => "in range",
            Self::NotInRange => "not in range",
        }
    }

    /// Whether values are `low to high` ranges
    #[must_use]
    pub const fn is_range(self) -> bool {
        matches!(self, Self::InRange | Self::NotInRange)
    }
}

/// Value type a filter cleans its input into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Free text
    String,
    /// Integer or floating point
    Numeric,
    /// Boolean flag
    Boolean,
    /// One of a fixed set of strings
    Enum,
    /// `YYYY-MM-DD`
    Date,
    /// `YYYY-MM-DD HH:MM:SS`
    DateTime,
    /// `HH:MM:SS`
    Time,
}

impl ColumnKind {
    /// Default client widget hint for a filter of `kind` over this column type
    #[must_use]
    pub const fn data_type(self, kind: FilterKind) -> Option<&'static str> {
        match (self, kind.is_range()) {
            (Self::Date, false) => Some("datepicker"),
            (Self::Date, true) => Some("daterangepicker"),
            (Self::DateTime, false) => Some("datetimepicker"),
            (Self::DateTime, true) => Some("datetimerangepicker"),
            (Self::Time, false) => Some("timepicker"),
            (Self::Time, true) => Some("timerangepicker"),
            _ => None,
        }
    }
}

/// Fixed choice offered by enum and boolean filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    /// Submitted value
    pub value: String,
    /// Display label (translated at read time)
    pub label: String,
}

impl FilterOption {
    /// Create an option
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A named predicate transformer bound to one column
#[derive(Debug, Clone)]
pub struct Filter {
    column: Arc<Column>,
    name: String,
    kind: FilterKind,
    column_kind: ColumnKind,
    options: Option<Vec<FilterOption>>,
    data_type: Option<String>,
}

impl Filter {
    /// Create a filter with the default widget hint and options for its types
    #[must_use]
    pub fn new(
        column: Arc<Column>,
        name: impl Into<String>,
        kind: FilterKind,
        column_kind: ColumnKind,
    ) -> Self {
        let options = (column_kind == ColumnKind::Boolean)
            .then(|| vec![FilterOption::new("1", "Yes"), FilterOption::new("0", "No")]);

        Self {
            column,
            name: name.into(),
            kind,
            column_kind,
            options,
            data_type: column_kind.data_type(kind).map(str::to_string),
        }
    }

    /// Replace the fixed option set
    #[must_use]
    pub fn with_options(mut self, options: Vec<FilterOption>) -> Self {
        self.options = Some(options);
        self
    }

    /// Replace the client widget hint
    #[must_use]
    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    /// Column the filter reads
    #[must_use]
    pub fn column(&self) -> &Column {
        &self.column
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Operator family
    #[must_use]
    pub const fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Value type
    #[must_use]
    pub const fn column_kind(&self) -> ColumnKind {
        self.column_kind
    }

    /// Client widget hint
    #[must_use]
    pub fn data_type(&self) -> Option<&str> {
        self.data_type.as_deref()
    }

    /// Untranslated fixed options
    #[must_use]
    pub fn options(&self) -> Option<&[FilterOption]> {
        self.options.as_deref()
    }

    /// Fixed options as translated `(value, label)` pairs
    #[must_use]
    pub fn translated_options(&self, translator: &dyn Translator) -> Option<Vec<(String, String)>> {
        self.options.as_ref().map(|options| {
            options
                .iter()
                .map(|option| (option.value.clone(), translator.gettext(&option.label)))
                .collect()
        })
    }

    /// Human-readable verb, e.g. "equals"
    #[must_use]
    pub fn operation(&self, translator: &dyn Translator) -> String {
        translator.gettext(self.kind.operation())
    }

    /// Whether `raw` would clean successfully
    #[must_use]
    pub fn validate(&self, raw: &str) -> bool {
        self.clean(raw).is_ok()
    }

    /// Parse raw user input into a typed value
    ///
    /// # Errors
    ///
    /// Returns a [`FilterError`] describing the accepted format when the
    /// input does not parse.
    pub fn clean(&self, raw: &str) -> Result<CleanedValue, FilterError> {
        if self.kind.is_range() {
            let (low, high) = value::split_range(raw)?;
            return Ok(CleanedValue::Range(
                self.clean_scalar(low)?,
                self.clean_scalar(high)?,
            ));
        }
        self.clean_scalar(raw).map(CleanedValue::Single)
    }

    fn clean_scalar(&self, raw: &str) -> Result<FilterValue, FilterError> {
        match self.column_kind {
            ColumnKind::String => Ok(FilterValue::Text(raw.to_string())),
            ColumnKind::Numeric => value::parse_number(raw),
            ColumnKind::Boolean => value::parse_bool(raw),
            ColumnKind::Enum => match self.options.as_deref() {
                Some(options)
                    if !options.is_empty() && !options.iter().any(|option| option.value == raw) =>
                {
                    Err(FilterError::InvalidChoice {
                        value: raw.to_string(),
                    })
                }
                _ => Ok(FilterValue::Text(raw.to_string())),
            },
            ColumnKind::Date => value::parse_date(raw),
            ColumnKind::DateTime => value::parse_datetime(raw),
            ColumnKind::Time => value::parse_time(raw),
        }
    }

    /// Narrow `query` by this filter
    ///
    /// Pure: the same query and value always yield the same result.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::ValueShape`] if `value` was not produced by
    /// this filter's [`clean`](Self::clean).
    pub fn apply<Q: Query>(&self, query: Q, value: &CleanedValue) -> Result<Q, FilterError> {
        let column = self.column.name();
        let predicate = match (self.kind, value) {
            (FilterKind::Equal, CleanedValue::Single(value)) => {
                Predicate::equals(column, value.clone())
            }
            (FilterKind::NotEqual, CleanedValue::Single(value)) => {
                Predicate::not_equals(column, value.clone())
            }
            (FilterKind::Greater, CleanedValue::Single(value)) => {
                Predicate::greater(column, value.clone())
            }
            (FilterKind::Smaller, CleanedValue::Single(value)) => {
                Predicate::smaller(column, value.clone())
            }
            (FilterKind::Like, CleanedValue::Single(FilterValue::Text(term))) => {
                Predicate::ilike(column, parse_like_term(term))
            }
            (FilterKind::NotLike, CleanedValue::Single(FilterValue::Text(term))) => {
                !Predicate::ilike(column, parse_like_term(term))
            }
            (FilterKind::InRange, CleanedValue::Range(low, high)) => {
                Predicate::between(column, low.clone(), high.clone())
            }
            (FilterKind::NotInRange, CleanedValue::Range(low, high)) => {
                !Predicate::between(column, low.clone(), high.clone())
            }
            _ => {
                return Err(FilterError::ValueShape {
                    filter: self.name.clone(),
                    operation: self.kind.operation(),
                })
            }
        };

        if self.column_kind == ColumnKind::Enum {
            return Ok(query.filter(predicate.cast_to_text()));
        }
        Ok(query.filter(predicate))
    }

    /// Clean `raw` and apply it in one step
    ///
    /// # Errors
    ///
    /// Returns the cleaning error for malformed input.
    pub fn clean_and_apply<Q: Query>(&self, query: Q, raw: &str) -> Result<Q, FilterError> {
        let value = self.clean(raw)?;
        self.apply(query, &value)
    }
}

/// All filters offered by one view, built once at view construction
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    /// Convert every column that has a known type, skipping the rest
    #[must_use]
    pub fn build(columns: &[Arc<Column>], converter: &FilterConverter) -> Self {
        let mut filters = Vec::new();
        for column in columns {
            let label = column.label();
            match converter.convert(column.type_name(), column, &label, &ConvertOptions::default())
            {
                Some(converted) => filters.extend(converted),
                None => tracing::debug!(
                    column = column.name(),
                    type_name = column.type_name(),
                    "Column type has no filters"
                ),
            }
        }
        tracing::debug!(filters = filters.len(), "Built filter set");
        Self { filters }
    }

    /// Wrap an explicit filter list
    #[must_use]
    pub const fn from_filters(filters: Vec<Filter>) -> Self {
        Self { filters }
    }

    /// Filter by argument index
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Filter> {
        self.filters.get(index)
    }

    /// Number of filters
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the view offers no filters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Iterate in argument index order
    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.filters.iter()
    }

    /// Apply active filters in order
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownFilter`] for an index outside the set,
    /// or the filter's own error for a mismatched value.
    pub fn apply<Q: Query>(&self, query: Q, active: &[ActiveFilter]) -> Result<Q, FilterError> {
        active.iter().try_fold(query, |query, active| {
            self.get(active.index)
                .ok_or(FilterError::UnknownFilter(active.index))?
                .apply(query, &active.value)
        })
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}
