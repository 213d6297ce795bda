// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Per [`FieldKind`] conversion between a JSON data model value and a [`FieldValue`].
//! Dates and times travel in their wire formats (ISO date, ISO time, UTC RFC 3339),
//! numbers as JSON numbers. Raw text typed by the user is parsed with the locale rules
//! on the way out.

use chrono::DateTime;
use serde_json::{Number, Value};

use super::{deserialize_list, serialize_list};
use crate::{DateRules, DateTimeRules, FieldDefinition, FieldKind, FieldValue, FloatRules,
            FormError, FormResult, LocaleContext, TimeRules,
            round_half_away_from_zero};

/// Stored by some backends for "no date".
pub const SENTINEL_DATE: &str = "0001-01-01";

static NULL_VALUE: Value = Value::Null;

/// Decode the model value of one field. `raw` is [None] when the data path is absent.
///
/// # Errors
///
/// [`FormError::ValueTypeMismatch`] if `raw` has a JSON shape the field can't hold, eg:
/// an object for a text field.
pub fn decode_field(
    field_name: &str,
    definition: &FieldDefinition,
    raw: Option<&Value>,
    locale: &LocaleContext,
) -> FormResult<FieldValue> {
    let raw = raw.unwrap_or(&NULL_VALUE);
    let formatter = locale.formatter();
    let shape_error = || mismatch(field_name, definition, raw);

    Ok(match &definition.kind {
        FieldKind::Text(_) | FieldKind::RichText(_) | FieldKind::Dropdown(_) => match raw {
            Value::Null => FieldValue::empty_text(),
            Value::String(text) => FieldValue::Text(text.clone()),
            Value::Number(_) | Value::Bool(_) => FieldValue::Text(raw.to_string()),
            Value::Array(_) | Value::Object(_) => return Err(shape_error()),
        },

        FieldKind::Date(_) => match raw {
            Value::Null => FieldValue::Undefined,
            Value::String(text) if text.is_empty() || text == SENTINEL_DATE => {
                FieldValue::Undefined
            }
            Value::String(text) => formatter
                .parse_iso_date(text)
                .map_or_else(|| FieldValue::Text(text.clone()), FieldValue::Date),
            _ => return Err(shape_error()),
        },

        FieldKind::Time(_) => match raw {
            Value::Null => FieldValue::Undefined,
            Value::String(text) if text.is_empty() => FieldValue::Undefined,
            Value::String(text) => formatter
                .parse_iso_time(text)
                .map_or_else(|| FieldValue::Text(text.clone()), FieldValue::Time),
            _ => return Err(shape_error()),
        },

        FieldKind::DateTime(rules) => match raw {
            Value::Null => FieldValue::empty_text(),
            Value::String(text) if text.is_empty() => FieldValue::empty_text(),
            Value::String(text) => formatter
                .parse_any_date_time(text, rules.time_zone)
                .map_or_else(|| FieldValue::Text(text.clone()), FieldValue::DateTime),
            // Epoch milliseconds.
            Value::Number(number) => number
                .as_i64()
                .and_then(DateTime::from_timestamp_millis)
                .map(FieldValue::DateTime)
                .ok_or_else(shape_error)?,
            _ => return Err(shape_error()),
        },

        FieldKind::Integer(rules) => FieldValue::Integer(
            decode_integer(raw, locale, rules.is_blank_when_zero)
                .map_err(|()| shape_error())?
                .unwrap_or(0),
        ),
        FieldKind::NullableInteger(_) => decode_integer(raw, locale, false)
            .map_err(|()| shape_error())?
            .map_or(FieldValue::Null, FieldValue::Integer),

        FieldKind::Float(rules) => FieldValue::Float(
            decode_float(raw, rules, locale, rules.is_blank_when_zero)
                .map_err(|()| shape_error())?
                .unwrap_or(0.0),
        ),
        FieldKind::NullableFloat(rules) => decode_float(raw, rules, locale, false)
            .map_err(|()| shape_error())?
            .map_or(FieldValue::Null, FieldValue::Float),

        FieldKind::Boolean => FieldValue::Boolean(is_truthy(raw)),
        FieldKind::NullableBoolean => match raw {
            Value::Null => FieldValue::Null,
            _ => FieldValue::Boolean(is_truthy(raw)),
        },

        FieldKind::List(rules) => match raw {
            Value::Null => FieldValue::List(vec![]),
            Value::Array(rows) => {
                FieldValue::List(deserialize_list(rows, &rules.row_fields, locale)?)
            }
            _ => return Err(shape_error()),
        },
    })
}

/// Encode one field value for the data model. Text the locale can't parse (the form
/// would show a validation error for it) encodes as `null`.
///
/// # Errors
///
/// Only list fields fail, when a row holds a value its row field can't hold.
pub fn encode_field(
    definition: &FieldDefinition,
    value: &FieldValue,
    locale: &LocaleContext,
) -> FormResult<Value> {
    let formatter = locale.formatter();

    Ok(match &definition.kind {
        FieldKind::Text(_) | FieldKind::RichText(_) => encode_text(value),
        FieldKind::Dropdown(rules) => match value {
            FieldValue::Text(text) if text.is_empty() && rules.is_null_when_empty => {
                Value::Null
            }
            _ => encode_text(value),
        },

        FieldKind::Date(rules) => encode_date(value, rules, locale),
        FieldKind::Time(rules) => encode_time(value, rules, locale),
        FieldKind::DateTime(rules) => encode_date_time(value, rules, locale),

        FieldKind::Integer(_) | FieldKind::NullableInteger(_) => match value {
            FieldValue::Integer(it) => Value::from(*it),
            FieldValue::Text(text) if !text.is_empty() => formatter
                .parse_integer(text, false)
                .map_or(Value::Null, Value::from),
            _ => Value::Null,
        },

        FieldKind::Float(rules) | FieldKind::NullableFloat(rules) => {
            let precision = rules
                .precision
                .unwrap_or(locale.culture().currency_decimal_places);
            #[allow(clippy::cast_precision_loss)]
            let number = match value {
                FieldValue::Float(it) => Some(round_half_away_from_zero(*it, precision)),
                FieldValue::Integer(it) => Some(*it as f64),
                FieldValue::Text(text) if !text.is_empty() => {
                    formatter.parse_float(text, Some(precision), false)
                }
                _ => None,
            };
            number
                .and_then(Number::from_f64)
                .map_or(Value::Null, Value::Number)
        }

        FieldKind::Boolean => Value::Bool(value.as_bool().unwrap_or(false)),
        FieldKind::NullableBoolean => value.as_bool().map_or(Value::Null, Value::Bool),

        FieldKind::List(rules) => match value {
            FieldValue::List(rows) => serialize_list(rows, &rules.row_fields, locale)?,
            _ => Value::Array(vec![]),
        },
    })
}

fn mismatch(field_name: &str, definition: &FieldDefinition, raw: &Value) -> FormError {
    FormError::ValueTypeMismatch {
        field_name: field_name.to_string(),
        data_type: definition.data_type().to_string(),
        value: raw.to_string(),
    }
    .logged()
}

/// Falsy: `null`, `false`, `0`, `""`, and the string `"false"`.
fn is_truthy(raw: &Value) -> bool {
    match raw {
        Value::Null => false,
        Value::Bool(it) => *it,
        Value::Number(number) => number.as_f64().is_some_and(|it| it != 0.0),
        Value::String(text) => !text.is_empty() && text != "false",
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `Ok(None)` when absent or unparseable, `Err(())` for a JSON shape that can't be a
/// number.
#[allow(clippy::cast_possible_truncation)]
fn decode_integer(
    raw: &Value,
    locale: &LocaleContext,
    blank_is_zero: bool,
) -> Result<Option<i64>, ()> {
    match raw {
        Value::Null => Ok(None),
        Value::Number(number) => Ok(number
            .as_i64()
            .or_else(|| number.as_f64().map(|it| it.round() as i64))),
        Value::String(text) => Ok(locale.formatter().parse_integer(text, blank_is_zero)),
        _ => Err(()),
    }
}

fn decode_float(
    raw: &Value,
    rules: &FloatRules,
    locale: &LocaleContext,
    blank_is_zero: bool,
) -> Result<Option<f64>, ()> {
    let precision = rules
        .precision
        .unwrap_or(locale.culture().currency_decimal_places);
    match raw {
        Value::Null => Ok(None),
        Value::Number(number) => Ok(number
            .as_f64()
            .map(|it| round_half_away_from_zero(it, precision))),
        Value::String(text) => Ok(locale.formatter().parse_float(
            text,
            Some(precision),
            blank_is_zero,
        )),
        _ => Err(()),
    }
}

fn encode_text(value: &FieldValue) -> Value {
    match value {
        FieldValue::Undefined | FieldValue::Null => Value::Null,
        FieldValue::Text(text) => Value::String(text.clone()),
        other => Value::String(other.to_string()),
    }
}

fn encode_date(value: &FieldValue, rules: &DateRules, locale: &LocaleContext) -> Value {
    let formatter = locale.formatter();
    let date = match value {
        FieldValue::Date(it) => Some(*it),
        FieldValue::Text(text) if !text.is_empty() => formatter
            .parse_date(text, rules.format.as_deref())
            .or_else(|| formatter.parse_iso_date(text)),
        _ => None,
    };
    date.map_or(Value::Null, |it| Value::String(formatter.format_iso_date(it)))
}

fn encode_time(value: &FieldValue, rules: &TimeRules, locale: &LocaleContext) -> Value {
    let formatter = locale.formatter();
    let time = match value {
        FieldValue::Time(it) => Some(*it),
        FieldValue::Text(text) if !text.is_empty() => formatter
            .parse_time(text, rules.format.as_deref())
            .or_else(|| formatter.parse_iso_time(text)),
        _ => None,
    };
    time.map_or(Value::Null, |it| Value::String(formatter.format_iso_time(it)))
}

fn encode_date_time(
    value: &FieldValue,
    rules: &DateTimeRules,
    locale: &LocaleContext,
) -> Value {
    let formatter = locale.formatter();
    let date_time = match value {
        FieldValue::DateTime(it) => Some(*it),
        FieldValue::Text(text) if !text.is_empty() => formatter
            .parse_date_time(text, rules.format.as_deref(), rules.time_zone)
            .or_else(|| formatter.parse_any_date_time(text, rules.time_zone)),
        _ => None,
    };
    date_time.map_or(Value::Null, |it| {
        Value::String(formatter.format_iso_date_time(it))
    })
}
