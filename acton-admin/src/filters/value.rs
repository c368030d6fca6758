//! Typed filter values and the text formats they are parsed from

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::cmp::Ordering;

use super::FilterError;

/// Format accepted by date filters
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format accepted by datetime filters
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format accepted by time filters
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Literal separating the two endpoints of a range value
pub const RANGE_SEPARATOR: &str = " to ";

/// A single typed value compared against a column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Text, also used for enum choices
    Text(String),
    /// Whole number
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Boolean flag
    Boolean(bool),
    /// Calendar date
    Date(NaiveDate),
    /// Date and time without zone
    DateTime(NaiveDateTime),
    /// Time of day
    Time(NaiveTime),
}

impl FilterValue {
    /// Order two values of compatible types
    ///
    /// Integers and floats compare numerically; any other mix of variants
    /// is incomparable and yields `None`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Integer(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            (Self::Time(a), Self::Time(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Borrow the text of a `Text` value
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for FilterValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<NaiveTime> for FilterValue {
    fn from(value: NaiveTime) -> Self {
        Self::Time(value)
    }
}

/// Result of cleaning the raw text a user typed into a filter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CleanedValue {
    /// One operand
    Single(FilterValue),
    /// Inclusive lower and upper bound
    Range(FilterValue, FilterValue),
}

pub(crate) fn parse_date(raw: &str) -> Result<FilterValue, FilterError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map(FilterValue::Date)
        .map_err(|_| FilterError::invalid_value(raw, "a date formatted as YYYY-MM-DD"))
}

pub(crate) fn parse_datetime(raw: &str) -> Result<FilterValue, FilterError> {
    NaiveDateTime::parse_from_str(raw.trim(), DATETIME_FORMAT)
        .map(FilterValue::DateTime)
        .map_err(|_| {
            FilterError::invalid_value(raw, "a date and time formatted as YYYY-MM-DD HH:MM:SS")
        })
}

pub(crate) fn parse_time(raw: &str) -> Result<FilterValue, FilterError> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT)
        .map(FilterValue::Time)
        .map_err(|_| FilterError::invalid_value(raw, "a time formatted as HH:MM:SS"))
}

pub(crate) fn parse_number(raw: &str) -> Result<FilterValue, FilterError> {
    let trimmed = raw.trim();
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Ok(FilterValue::Integer(integer));
    }
    match trimmed.parse::<f64>() {
        Ok(float) if float.is_finite() => Ok(FilterValue::Float(float)),
        _ => Err(FilterError::invalid_value(raw, "a number")),
    }
}

pub(crate) fn parse_bool(raw: &str) -> Result<FilterValue, FilterError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(FilterValue::Boolean(true)),
        "0" | "false" => Ok(FilterValue::Boolean(false)),
        _ => Err(FilterError::invalid_value(raw, "1 or 0")),
    }
}

/// Split `"<low> to <high>"` into its two endpoints
pub(crate) fn split_range(raw: &str) -> Result<(&str, &str), FilterError> {
    let mut parts = raw.split(RANGE_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(low), Some(high), None) if !low.trim().is_empty() && !high.trim().is_empty() => {
            Ok((low, high))
        }
        _ => Err(FilterError::InvalidRange {
            value: raw.to_string(),
        }),
    }
}
