//! Column type name → filter list conversion

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

use super::{Column, ColumnKind, Filter, FilterKind, FilterOption};

/// Keyword options forwarded to a converter
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Explicit fixed option set
    pub options: Option<Vec<FilterOption>>,
    /// Client widget hint override
    pub data_type: Option<String>,
}

/// Builds the filters for one column
pub type ConverterFn = fn(&Arc<Column>, &str, &ConvertOptions) -> Vec<Filter>;

const STRING_FILTERS: [FilterKind; 4] = [
    FilterKind::Equal,
    FilterKind::NotEqual,
    FilterKind::Like,
    FilterKind::NotLike,
];

const NUMERIC_FILTERS: [FilterKind; 4] = [
    FilterKind::Equal,
    FilterKind::NotEqual,
    FilterKind::Greater,
    FilterKind::Smaller,
];

const EQUALITY_FILTERS: [FilterKind; 2] = [FilterKind::Equal, FilterKind::NotEqual];

const TEMPORAL_FILTERS: [FilterKind; 4] = [
    FilterKind::Equal,
    FilterKind::NotEqual,
    FilterKind::InRange,
    FilterKind::NotInRange,
];

const DEFAULT_CONVERTERS: &[(&[&str], ConverterFn)] = &[
    (
        &["string", "unicode", "text", "unicodetext", "varchar"],
        conv_string,
    ),
    (&["boolean", "tinyint"], conv_bool),
    (
        &["integer", "smallinteger", "numeric", "float", "biginteger"],
        conv_numeric,
    ),
    (&["date"], conv_date),
    (&["datetime"], conv_datetime),
    (&["time"], conv_time),
    (&["enum"], conv_enum),
];

/// Shared converter with the built-in type table
pub static DEFAULT_CONVERTER: Lazy<FilterConverter> = Lazy::new(FilterConverter::new);

fn build(
    column: &Arc<Column>,
    name: &str,
    kinds: &[FilterKind],
    column_kind: ColumnKind,
    opts: &ConvertOptions,
) -> Vec<Filter> {
    kinds
        .iter()
        .map(|kind| {
            let mut filter = Filter::new(Arc::clone(column), name, *kind, column_kind);
            if let Some(options) = &opts.options {
                filter = filter.with_options(options.clone());
            }
            if let Some(data_type) = &opts.data_type {
                filter = filter.with_data_type(data_type.clone());
            }
            filter
        })
        .collect()
}

fn conv_string(column: &Arc<Column>, name: &str, opts: &ConvertOptions) -> Vec<Filter> {
    build(column, name, &STRING_FILTERS, ColumnKind::String, opts)
}

fn conv_bool(column: &Arc<Column>, name: &str, opts: &ConvertOptions) -> Vec<Filter> {
    build(column, name, &EQUALITY_FILTERS, ColumnKind::Boolean, opts)
}

fn conv_numeric(column: &Arc<Column>, name: &str, opts: &ConvertOptions) -> Vec<Filter> {
    build(column, name, &NUMERIC_FILTERS, ColumnKind::Numeric, opts)
}

fn conv_date(column: &Arc<Column>, name: &str, opts: &ConvertOptions) -> Vec<Filter> {
    build(column, name, &TEMPORAL_FILTERS, ColumnKind::Date, opts)
}

fn conv_datetime(column: &Arc<Column>, name: &str, opts: &ConvertOptions) -> Vec<Filter> {
    build(column, name, &TEMPORAL_FILTERS, ColumnKind::DateTime, opts)
}

fn conv_time(column: &Arc<Column>, name: &str, opts: &ConvertOptions) -> Vec<Filter> {
    build(column, name, &TEMPORAL_FILTERS, ColumnKind::Time, opts)
}

fn conv_enum(column: &Arc<Column>, name: &str, opts: &ConvertOptions) -> Vec<Filter> {
    let mut opts = opts.clone();
    if opts.options.as_ref().is_none_or(Vec::is_empty) {
        opts.options = Some(
            column
                .enum_values()
                .iter()
                .map(|value| FilterOption::new(value.clone(), value.clone()))
                .collect(),
        );
    }
    build(column, name, &EQUALITY_FILTERS, ColumnKind::Enum, &opts)
}

/// Maps normalized type names to converters
///
/// Lookups are case-insensitive. Unknown types produce no filters rather
/// than an error: the column simply isn't filterable.
#[derive(Debug, Clone)]
pub struct FilterConverter {
    converters: HashMap<String, ConverterFn>,
}

impl Default for FilterConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterConverter {
    /// Converter with the built-in type aliases
    #[must_use]
    pub fn new() -> Self {
        let mut converter = Self::empty();
        for (aliases, conv) in DEFAULT_CONVERTERS {
            converter.register(aliases, *conv);
        }
        converter
    }

    /// Converter with no registered types
    #[must_use]
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Register `converter` under each alias, replacing earlier registrations
    pub fn register(&mut self, aliases: &[&str], converter: ConverterFn) -> &mut Self {
        for alias in aliases {
            self.converters.insert(alias.to_lowercase(), converter);
        }
        self
    }

    /// Whether `type_name` has a converter
    #[must_use]
    pub fn supports(&self, type_name: &str) -> bool {
        self.converters.contains_key(&type_name.to_lowercase())
    }

    /// Filters for a column of `type_name`, or `None` if the type is unknown
    #[must_use]
    pub fn convert(
        &self,
        type_name: &str,
        column: &Arc<Column>,
        name: &str,
        opts: &ConvertOptions,
    ) -> Option<Vec<Filter>> {
        self.converters
            .get(&type_name.to_lowercase())
            .map(|convert| convert(column, name, opts))
    }
}
