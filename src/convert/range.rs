//! Generic range converter over any ordered bound type.
//!
//! The stored shape is the search engine's range fragment
//! `{gte?, gt?, lte?, lt?}`; the typed shape is [`Range<T>`], two
//! independently inclusive/exclusive/unbounded limits. One converter
//! algorithm serves every bound type that can parse and format itself.

use std::marker::PhantomData;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::document::{Document, Value};
use crate::{Error, Result};

use super::PropertyValueConverter;

// ============================================================================
// Range model
// ============================================================================

/// One limit of a range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Bound<T> {
    Unbounded,
    Inclusive(T),
    Exclusive(T),
}

impl<T> Bound<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Bound::Unbounded => None,
            Bound::Inclusive(v) | Bound::Exclusive(v) => Some(v),
        }
    }

    pub fn is_inclusive(&self) -> bool {
        matches!(self, Bound::Inclusive(_))
    }
}

/// An ordered interval with two independent limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range<T> {
    pub lower: Bound<T>,
    pub upper: Bound<T>,
}

impl<T> Range<T> {
    pub fn new(lower: Bound<T>, upper: Bound<T>) -> Self {
        Self { lower, upper }
    }

    pub fn unbounded() -> Self {
        Self { lower: Bound::Unbounded, upper: Bound::Unbounded }
    }

    /// Closed interval `[from, to]`.
    pub fn closed(from: T, to: T) -> Self {
        Self { lower: Bound::Inclusive(from), upper: Bound::Inclusive(to) }
    }

    /// Open interval `(from, to)`.
    pub fn open(from: T, to: T) -> Self {
        Self { lower: Bound::Exclusive(from), upper: Bound::Exclusive(to) }
    }
}

// ============================================================================
// Bound types
// ============================================================================

/// A type usable as a range limit: totally ordered, parseable from and
/// formattable to the stored string form. `parse(format(x))` must equal `x`.
pub trait RangeBound: PartialOrd + Sized {
    fn parse(s: &str) -> std::result::Result<Self, String>;
    fn format(&self) -> String;
}

impl RangeBound for i64 {
    fn parse(s: &str) -> std::result::Result<Self, String> {
        s.parse().map_err(|e| format!("invalid integer: {e}"))
    }

    fn format(&self) -> String {
        self.to_string()
    }
}

impl RangeBound for f64 {
    fn parse(s: &str) -> std::result::Result<Self, String> {
        s.parse().map_err(|e| format!("invalid float: {e}"))
    }

    fn format(&self) -> String {
        self.to_string()
    }
}

impl RangeBound for String {
    fn parse(s: &str) -> std::result::Result<Self, String> {
        Ok(s.to_owned())
    }

    fn format(&self) -> String {
        self.clone()
    }
}

impl RangeBound for NaiveDate {
    fn parse(s: &str) -> std::result::Result<Self, String> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date: {e}"))
    }

    fn format(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

impl RangeBound for DateTime<Utc> {
    fn parse(s: &str) -> std::result::Result<Self, String> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| format!("invalid datetime: {e}"))
    }

    fn format(&self) -> String {
        self.to_rfc3339()
    }
}

// ============================================================================
// Converter
// ============================================================================

/// Converts between [`Range<T>`] and the stored `{gte, gt, lte, lt}` fragment.
///
/// Read prefers the inclusive key when a fragment carries both keys for the
/// same limit (`gte` over `gt`, `lte` over `lt`). Write omits absent bounds
/// entirely rather than emitting `null`. A write input that is not actually
/// a range falls back to its string rendering — legacy callers pass
/// pre-formatted strings through range-mapped properties.
pub struct RangeConverter<T> {
    _bound: PhantomData<fn() -> T>,
}

impl<T> RangeConverter<T> {
    pub fn new() -> Self {
        Self { _bound: PhantomData }
    }
}

impl<T> Default for RangeConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn bound_text(property: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Int(_) | Value::Float(_) => Ok(value.to_string()),
        other => Err(Error::conversion(
            property,
            other,
            "range bound must be a string or number",
        )),
    }
}

impl<T> RangeConverter<T>
where
    T: RangeBound + Serialize + DeserializeOwned,
{
    /// Resolve one limit from a fragment, preferring the inclusive key.
    fn resolve_bound(
        property: &str,
        fragment: &Document,
        inclusive_key: &str,
        exclusive_key: &str,
    ) -> Result<Bound<T>> {
        let (raw, inclusive) = match fragment.get(inclusive_key) {
            Some(v) => (v, true),
            None => match fragment.get(exclusive_key) {
                Some(v) => (v, false),
                None => return Ok(Bound::Unbounded),
            },
        };
        let text = bound_text(property, raw)?;
        let parsed = T::parse(&text).map_err(|msg| Error::conversion(property, raw, msg))?;
        Ok(if inclusive { Bound::Inclusive(parsed) } else { Bound::Exclusive(parsed) })
    }
}

impl<T> PropertyValueConverter for RangeConverter<T>
where
    T: RangeBound + Serialize + DeserializeOwned,
{
    fn read(&self, property: &str, value: &Value) -> Result<Value> {
        let fragment = value.as_object().ok_or_else(|| {
            Error::conversion(property, value, "expected a range fragment object")
        })?;

        let range = Range::new(
            Self::resolve_bound(property, fragment, "gte", "gt")?,
            Self::resolve_bound(property, fragment, "lte", "lt")?,
        );

        let typed = serde_json::to_value(&range)
            .map_err(|e| Error::conversion(property, value, e.to_string()))?;
        Ok(Value::from(typed))
    }

    fn write(&self, _property: &str, value: &Value) -> Result<Value> {
        let json = serde_json::Value::from(value.clone());
        let range: Range<T> = match serde_json::from_value(json) {
            Ok(range) => range,
            // Legacy path: not a range at all, pass the raw rendering through.
            Err(_) => return Ok(Value::String(value.to_query_string())),
        };

        let mut fragment = Document::new();
        match &range.lower {
            Bound::Inclusive(v) => { fragment.insert("gte", v.format()); }
            Bound::Exclusive(v) => { fragment.insert("gt", v.format()); }
            Bound::Unbounded => {}
        }
        match &range.upper {
            Bound::Inclusive(v) => { fragment.insert("lte", v.format()); }
            Bound::Exclusive(v) => { fragment.insert("lt", v.format()); }
            Bound::Unbounded => {}
        }
        Ok(Value::Object(fragment))
    }
}
