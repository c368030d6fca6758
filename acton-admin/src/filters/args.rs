//! Filter arguments carried in list URLs and the descriptors the filter
//! widget is built from
//!
//! A listing URL carries each active filter as `flt<pos>_<index>=<value>`,
//! where `pos` orders the filters on screen and `index` selects a filter
//! from the view's [`FilterSet`].

use serde::Serialize;

use super::{CleanedValue, FilterError, FilterSet};
use crate::i18n::Translator;

const ARG_PREFIX: &str = "flt";

/// One filter the user has switched on
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveFilter {
    /// Display position
    pub position: usize,
    /// Index into the view's filter set
    pub index: usize,
    /// Text as submitted, for re-rendering the form
    pub raw: String,
    /// Cleaned value
    pub value: CleanedValue,
}

impl ActiveFilter {
    /// Query argument name, e.g. `flt0_3`
    #[must_use]
    pub fn arg_name(&self) -> String {
        format!("{ARG_PREFIX}{}_{}", self.position, self.index)
    }
}

/// A submitted filter argument that could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterArgError {
    /// Argument name as submitted
    pub arg: String,
    /// Raw value as submitted
    pub raw: String,
    /// Why it was rejected
    pub error: FilterError,
}

/// Outcome of reading filter arguments from a request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFilters {
    /// Usable filters ordered by position
    pub active: Vec<ActiveFilter>,
    /// Rejected arguments, to show next to the filter form
    pub errors: Vec<FilterArgError>,
}

impl ParsedFilters {
    /// Whether every submitted argument was usable
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

fn parse_arg_name(name: &str) -> Option<Result<(usize, usize), FilterError>> {
    let rest = name.strip_prefix(ARG_PREFIX)?;
    let parsed = rest
        .split_once('_')
        .and_then(|(pos, index)| Some((pos.parse::<usize>().ok()?, index.parse::<usize>().ok()?)))
        .ok_or_else(|| FilterError::MalformedArgument(name.to_string()));
    Some(parsed)
}

impl FilterSet {
    /// Read `flt<pos>_<index>` arguments out of query pairs
    ///
    /// Unrelated arguments are ignored. Bad arguments are collected in
    /// [`ParsedFilters::errors`] instead of failing the whole listing.
    pub fn parse_args<'a, I>(&self, args: I) -> ParsedFilters
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut parsed = ParsedFilters::default();

        for (name, raw) in args {
            let Some(position_and_index) = parse_arg_name(name) else {
                continue;
            };

            let cleaned = position_and_index.and_then(|(position, index)| {
                let filter = self.get(index).ok_or(FilterError::UnknownFilter(index))?;
                let value = filter.clean(raw)?;
                Ok(ActiveFilter {
                    position,
                    index,
                    raw: raw.to_string(),
                    value,
                })
            });

            match cleaned {
                Ok(active) => parsed.active.push(active),
                Err(error) => {
                    tracing::debug!(arg = name, %error, "Rejected filter argument");
                    parsed.errors.push(FilterArgError {
                        arg: name.to_string(),
                        raw: raw.to_string(),
                        error,
                    });
                }
            }
        }

        parsed.active.sort_by_key(|active| active.position);
        parsed
    }

    /// Filters grouped by display name for the filter widget
    ///
    /// Groups keep the order in which their first filter appears; `arg`
    /// is the index to submit in `flt<pos>_<arg>`.
    #[must_use]
    pub fn groups(&self, translator: &dyn Translator) -> Vec<FilterGroup> {
        let mut groups: Vec<FilterGroup> = Vec::new();

        for (arg, filter) in self.iter().enumerate() {
            let operation = FilterOperation {
                arg,
                operation: filter.operation(translator),
                options: filter.translated_options(translator),
                data_type: filter.data_type().map(str::to_string),
            };

            let name = translator.gettext(filter.name());
            match groups.iter_mut().find(|group| group.name == name) {
                Some(group) => group.operations.push(operation),
                None => groups.push(FilterGroup {
                    name,
                    operations: vec![operation],
                }),
            }
        }

        groups
    }
}

/// Filters sharing a display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterGroup {
    /// Display name
    pub name: String,
    /// One entry per filter
    pub operations: Vec<FilterOperation>,
}

/// Widget descriptor of a single filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOperation {
    /// Filter index
    pub arg: usize,
    /// Translated operation name
    pub operation: String,
    /// Fixed `(value, label)` choices
    pub options: Option<Vec<(String, String)>>,
    /// Widget hint
    #[serde(rename = "type")]
    pub data_type: Option<String>,
}
