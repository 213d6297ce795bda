// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use indexmap::IndexMap;

/// Current value of every field of a form, keyed by field name.
pub type FieldValues = IndexMap<String, FieldValue>;

/// Validation message of every field of a form, [None] when the field is valid.
pub type FieldErrors = IndexMap<String, Option<String>>;

/// Whether the user has visited (focused and left) each field.
pub type EditedFields = IndexMap<String, bool>;

/// The value held by one field. Which variants a field accepts depends on its
/// [`crate::DataType`], see [`crate::FieldKind::accepts`]. Numeric and date fields hold
/// either a typed value, or the raw `Text` the user typed, which the validator and the
/// serializer parse with the locale rules.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum FieldValue {
    /// Never set.
    #[default]
    Undefined,
    /// Explicitly nothing (nullable fields, cleared dates).
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(DateTime<Utc>),
    /// Rows of a list field. Each row is validated by its own form.
    List(Vec<FieldValues>),
}

impl FieldValue {
    pub fn text(it: impl Into<String>) -> Self { FieldValue::Text(it.into()) }

    #[must_use]
    pub fn empty_text() -> Self { FieldValue::Text(String::new()) }

    /// `Undefined`, `Null`, and the empty string count as "nothing entered".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Undefined | FieldValue::Null => true,
            FieldValue::Text(it) => it.is_empty(),
            FieldValue::Integer(_)
            | FieldValue::Float(_)
            | FieldValue::Boolean(_)
            | FieldValue::Date(_)
            | FieldValue::Time(_)
            | FieldValue::DateTime(_)
            | FieldValue::List(_) => false,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(it) => Some(it),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(it) => Some(*it),
            _ => None,
        }
    }

    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        match self {
            FieldValue::Undefined => "Undefined",
            FieldValue::Null => "Null",
            FieldValue::Text(_) => "Text",
            FieldValue::Integer(_) => "Integer",
            FieldValue::Float(_) => "Float",
            FieldValue::Boolean(_) => "Boolean",
            FieldValue::Date(_) => "Date",
            FieldValue::Time(_) => "Time",
            FieldValue::DateTime(_) => "DateTime",
            FieldValue::List(_) => "List",
        }
    }
}

/// Plain, locale independent rendering. Used for the `{value}` message token and for
/// diagnostics.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Undefined | FieldValue::Null => Ok(()),
            FieldValue::Text(it) => write!(f, "{it}"),
            FieldValue::Integer(it) => write!(f, "{it}"),
            FieldValue::Float(it) => write!(f, "{it}"),
            FieldValue::Boolean(it) => write!(f, "{it}"),
            FieldValue::Date(it) => write!(f, "{}", it.format("%Y-%m-%d")),
            FieldValue::Time(it) => write!(f, "{}", it.format("%H:%M:%S")),
            FieldValue::DateTime(it) => {
                write!(f, "{}", it.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            FieldValue::List(rows) => write!(f, "[{} rows]", rows.len()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(it: &str) -> Self { FieldValue::Text(it.to_string()) }
}

impl From<String> for FieldValue {
    fn from(it: String) -> Self { FieldValue::Text(it) }
}

impl From<i64> for FieldValue {
    fn from(it: i64) -> Self { FieldValue::Integer(it) }
}

impl From<f64> for FieldValue {
    fn from(it: f64) -> Self { FieldValue::Float(it) }
}

impl From<bool> for FieldValue {
    fn from(it: bool) -> Self { FieldValue::Boolean(it) }
}

impl From<NaiveDate> for FieldValue {
    fn from(it: NaiveDate) -> Self { FieldValue::Date(it) }
}

impl From<NaiveTime> for FieldValue {
    fn from(it: NaiveTime) -> Self { FieldValue::Time(it) }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(it: DateTime<Utc>) -> Self { FieldValue::DateTime(it) }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(it: Option<T>) -> Self { it.map_or(FieldValue::Null, Into::into) }
}
