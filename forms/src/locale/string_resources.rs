// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::HashMap, fmt::Debug};

use indexmap::IndexMap;
use miette::{Context, IntoDiagnostic};
use serde_json::Value;

use crate::{FormError, FormResult};

/// Values substituted into `{token}` placeholders of a resource string or a message
/// template. Scalars are rendered to text by the caller.
pub type Interpolation = IndexMap<String, String>;

/// Keys of the string resource table that the engine reads.
pub mod resource_keys {
    pub const LOCALE: &str = "culture.locale";
    pub const DATE_FORMAT: &str = "culture.dateFormat";
    pub const DATE_TIME_FORMAT: &str = "culture.dateTimeFormat";
    pub const TIME_FORMAT: &str = "culture.timeFormat";
    pub const THOUSANDS_DELIMITER: &str = "culture.thousandsDelimeter";
    pub const DECIMAL_POINT: &str = "culture.decimalPoint";
    pub const INTEGER_REG_EXP: &str = "culture.integerRegExp";
    pub const FLOAT_REG_EXP: &str = "culture.floatRegExp";
    pub const CURRENCY_SYMBOL: &str = "culture.currencySymbol";
    pub const CURRENCY_CODE: &str = "culture.currencyCode";
    pub const CURRENCY_DECIMAL_PLACES: &str = "culture.currencyDecimalPlaces";

    /// Must be present when a [`crate::LocaleContext`] is created.
    pub const REQUIRED: [&str; 10] = [
        LOCALE,
        DATE_FORMAT,
        DATE_TIME_FORMAT,
        THOUSANDS_DELIMITER,
        DECIMAL_POINT,
        INTEGER_REG_EXP,
        FLOAT_REG_EXP,
        CURRENCY_SYMBOL,
        CURRENCY_CODE,
        CURRENCY_DECIMAL_PLACES,
    ];

    pub const IS_REQUIRED_ERROR: &str = "validation.isRequiredError";
    pub const MIN_LENGTH_ERROR: &str = "validation.minLengthError";
    pub const MAX_LENGTH_ERROR: &str = "validation.maxLengthError";
    pub const PATTERN_ERROR: &str = "validation.patternError";
    pub const MIN_ERROR: &str = "validation.minError";
    pub const MAX_ERROR: &str = "validation.maxError";
    pub const MIN_DATE_ERROR: &str = "validation.minDateError";
    pub const MAX_DATE_ERROR: &str = "validation.maxDateError";
    pub const INVALID_INTEGER_ERROR: &str = "validation.invalidIntegerError";
    pub const INVALID_FLOAT_ERROR: &str = "validation.invalidFloatError";
    pub const INVALID_DATE_ERROR: &str = "validation.invalidDateError";
    pub const INVALID_TIME_ERROR: &str = "validation.invalidTimeError";
    pub const INVALID_DATE_TIME_ERROR: &str = "validation.invalidDateTimeError";
}

/// The string resource lookup the host application supplies. Returning [None] means the
/// key is not in the table.
pub trait StringResources: Debug + Send + Sync {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Replace every `{token}` in `template` that has an entry in `interpolation`. Unknown
/// tokens and unbalanced braces are copied verbatim.
#[must_use]
pub fn interpolate(template: &str, interpolation: &Interpolation) -> String {
    if interpolation.is_empty() || !template.contains('{') {
        return template.to_string();
    }

    let mut acc = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        acc.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('}') else {
            acc.push_str(&rest[open..]);
            return acc;
        };
        let token = &after_open[..close];
        match interpolation.get(token) {
            Some(value) => acc.push_str(value),
            None => {
                acc.push('{');
                acc.push_str(token);
                acc.push('}');
            }
        }
        rest = &after_open[close + 1..];
    }
    acc.push_str(rest);
    acc
}

/// In memory [`StringResources`] implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable {
    entries: HashMap<String, String>,
}

impl StringResources for StringTable {
    fn lookup(&self, key: &str) -> Option<String> { self.entries.get(key).cloned() }
}

impl StringTable {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn without(mut self, key: &str) -> Self {
        self.entries.remove(key);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Load a table from a JSON document. Nested objects flatten into dot separated
    /// keys, so `{"culture": {"decimalPoint": "."}}` yields `culture.decimalPoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON, or the top level is not an object.
    pub fn try_from_json_str(json: &str) -> miette::Result<Self> {
        let value: Value = serde_json::from_str(json)
            .into_diagnostic()
            .wrap_err("Could not parse string resource table as JSON")?;
        Self::try_from_json_value(&value)
            .into_diagnostic()
            .wrap_err("Could not load string resource table")
    }

    /// # Errors
    ///
    /// Returns [`FormError::InvalidLocaleResource`] if the top level is not an object.
    pub fn try_from_json_value(value: &Value) -> FormResult<Self> {
        let Value::Object(_) = value else {
            return Err(FormError::InvalidLocaleResource {
                key: String::new(),
                value: value.to_string(),
                reason: "a string resource table must be a JSON object".into(),
            });
        };
        let mut table = Self::new();
        flatten_into(&mut table, "", value);
        Ok(table)
    }

    /// Complete English (United States) table, with every culture and validation key
    /// the engine reads.
    #[must_use]
    pub fn en_us() -> Self {
        use resource_keys::*;
        Self::new()
            .with(LOCALE, "en-US")
            .with(DATE_FORMAT, "MM/dd/yyyy")
            .with(DATE_TIME_FORMAT, "MM/dd/yyyy h:mm a")
            .with(TIME_FORMAT, "h:mm a")
            .with(THOUSANDS_DELIMITER, ",")
            .with(DECIMAL_POINT, ".")
            .with(INTEGER_REG_EXP, r"^\s*-?[\d,\s]+$")
            .with(FLOAT_REG_EXP, r"^\s*-?[\d,\s]*\.?\d*\s*$")
            .with(CURRENCY_SYMBOL, "$")
            .with(CURRENCY_CODE, "USD")
            .with(CURRENCY_DECIMAL_PLACES, "2")
            .with(IS_REQUIRED_ERROR, "Required")
            .with(MIN_LENGTH_ERROR, "Must be at least {minLength} characters")
            .with(MAX_LENGTH_ERROR, "Must be at most {maxLength} characters")
            .with(PATTERN_ERROR, "Invalid format")
            .with(MIN_ERROR, "Must be at least {min}")
            .with(MAX_ERROR, "Must be at most {max}")
            .with(MIN_DATE_ERROR, "Must be on or after {minDate}")
            .with(MAX_DATE_ERROR, "Must be on or before {maxDate}")
            .with(INVALID_INTEGER_ERROR, "Must be a whole number")
            .with(INVALID_FLOAT_ERROR, "Must be a number")
            .with(INVALID_DATE_ERROR, "Invalid date")
            .with(INVALID_TIME_ERROR, "Invalid time")
            .with(INVALID_DATE_TIME_ERROR, "Invalid date and time")
    }
}

fn flatten_into(table: &mut StringTable, prefix: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_prefix = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(table, &child_prefix, child);
            }
        }
        Value::String(text) => table.insert(prefix, text.as_str()),
        Value::Null => {}
        other => table.insert(prefix, other.to_string()),
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StringTable {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (key, value) in iter {
            table.insert(key, value);
        }
        table
    }
}
