// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Field definitions declared in JSON. A catalogue is an object keyed by field name, each
//! entry tagged by `"dataType"`:
//!
//! ```json
//! {
//!   "name":  { "dataType": "Text", "label": "Name", "dataPath": "person.name",
//!              "isRequired": true, "maxLength": 40 },
//!   "born":  { "dataType": "Date", "label": "Born", "dataPath": "person.born",
//!              "min": "1900-01-01" },
//!   "phones": { "dataType": "List", "label": "Phones", "dataPath": "person.phones",
//!               "rowFields": { "number": { "dataType": "Text", "label": "Number",
//!                                          "dataPath": "number" } } }
//! }
//! ```
//!
//! Requiredness predicates and custom validators are code, attach them after loading.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use miette::{IntoDiagnostic, WrapErr};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{DataType, FieldDefinition, FieldDefinitions, FieldKind, FieldValue, ListRules};
use crate::{DataPath, FormError, FormResult, ISO_DATE_FORMAT, PatternKind, check_strftime,
            to_strftime};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogueEntry {
    data_type: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    data_path: Option<String>,
    #[serde(default)]
    placeholder: Option<String>,
    #[serde(default)]
    initial_value: Option<Value>,
    #[serde(default)]
    is_read_only: bool,
    #[serde(default)]
    is_required: bool,
    #[serde(default)]
    is_required_error: Option<String>,
    #[serde(default)]
    row_fields: Option<Value>,
    /// Everything else belongs to the variant's rules.
    #[serde(flatten)]
    rules: Map<String, Value>,
}

impl FieldDefinition {
    /// Parse a JSON field catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON, or an entry is malformed (see
    /// [`FieldDefinition::try_parse_catalogue_value`]).
    pub fn try_parse_catalogue(json: &str) -> miette::Result<FieldDefinitions> {
        let value: Value = serde_json::from_str(json)
            .into_diagnostic()
            .wrap_err("Could not parse field catalogue as JSON")?;
        Self::try_parse_catalogue_value(&value)
            .into_diagnostic()
            .wrap_err("Could not load field catalogue")
    }

    /// # Errors
    ///
    /// - [`FormError::UnknownDataType`] if an entry's `dataType` is not a [`DataType`].
    /// - [`FormError::ValueTypeMismatch`] if an `initialValue` can't belong to its field.
    /// - [`FormError::InvalidFieldCatalogue`] for any other malformed entry.
    pub fn try_parse_catalogue_value(value: &Value) -> FormResult<FieldDefinitions> {
        let Value::Object(entries) = value else {
            return Err(invalid("a field catalogue must be a JSON object"));
        };

        let mut acc = FieldDefinitions::with_capacity(entries.len());
        for (field_name, entry) in entries {
            let definition = parse_entry(field_name, entry)?;
            acc.insert(field_name.clone(), definition);
        }

        // % is Display, ? is Debug.
        tracing::debug!(message = "📋 field catalogue loaded", fields = %acc.len());

        Ok(acc)
    }
}

fn parse_entry(field_name: &str, entry: &Value) -> FormResult<FieldDefinition> {
    let entry = CatalogueEntry::deserialize(entry)
        .map_err(|error| invalid(format!("field '{field_name}': {error}")))?;

    let data_type = DataType::try_parse(&entry.data_type)?;
    let rules = Value::Object(entry.rules);
    let kind = match data_type {
        DataType::Text => FieldKind::Text(parse_rules(field_name, rules)?),
        DataType::RichText => FieldKind::RichText(parse_rules(field_name, rules)?),
        DataType::Dropdown => FieldKind::Dropdown(parse_rules(field_name, rules)?),
        DataType::Date => FieldKind::Date(parse_rules(field_name, rules)?),
        DataType::Time => FieldKind::Time(parse_rules(field_name, rules)?),
        DataType::DateTime => FieldKind::DateTime(parse_rules(field_name, rules)?),
        DataType::Integer => FieldKind::Integer(parse_rules(field_name, rules)?),
        DataType::NullableInteger => {
            FieldKind::NullableInteger(parse_rules(field_name, rules)?)
        }
        DataType::Float => FieldKind::Float(parse_rules(field_name, rules)?),
        DataType::NullableFloat => FieldKind::NullableFloat(parse_rules(field_name, rules)?),
        DataType::Boolean => FieldKind::Boolean,
        DataType::NullableBoolean => FieldKind::NullableBoolean,
        DataType::List => {
            let row_fields = match &entry.row_fields {
                Some(it) => FieldDefinition::try_parse_catalogue_value(it)?,
                None => FieldDefinitions::new(),
            };
            FieldKind::List(ListRules {
                row_fields: Arc::new(row_fields),
            })
        }
    };

    let format = match &kind {
        FieldKind::Date(rules) => Some((rules.format.as_deref(), PatternKind::Date)),
        FieldKind::Time(rules) => Some((rules.format.as_deref(), PatternKind::Time)),
        FieldKind::DateTime(rules) => {
            Some((rules.format.as_deref(), PatternKind::DateTime))
        }
        _ => None,
    };
    if let Some((Some(pattern), pattern_kind)) = format {
        check_strftime(&to_strftime(pattern), pattern_kind)
            .map_err(|reason| invalid(format!("field '{field_name}': format {reason}")))?;
    }

    let mut definition = FieldDefinition::new(entry.label, kind);
    definition.data_path = entry.data_path.map(DataPath::new);
    definition.placeholder = entry.placeholder;
    definition.is_read_only = entry.is_read_only;
    definition.is_required = entry.is_required.into();
    definition.is_required_error = entry.is_required_error;

    if let Some(raw) = &entry.initial_value {
        let value = decode_initial_value(field_name, data_type, raw)?;
        definition.check_value(field_name, &value)?;
        definition.initial_value = Some(value);
    }

    Ok(definition)
}

fn parse_rules<T: DeserializeOwned>(field_name: &str, rules: Value) -> FormResult<T> {
    serde_json::from_value(rules)
        .map_err(|error| invalid(format!("field '{field_name}': {error}")))
}

/// Strings of date and time fields are read in their wire format (ISO date, ISO time,
/// RFC 3339).
fn decode_initial_value(
    field_name: &str,
    data_type: DataType,
    raw: &Value,
) -> FormResult<FieldValue> {
    let unreadable = || {
        invalid(format!(
            "field '{field_name}': initial value {raw} is not a valid {data_type}"
        ))
    };

    Ok(match raw {
        Value::Null => FieldValue::Null,
        Value::Bool(it) => FieldValue::Boolean(*it),
        Value::Number(number) => match number.as_i64() {
            Some(it) => FieldValue::Integer(it),
            None => FieldValue::Float(number.as_f64().ok_or_else(unreadable)?),
        },
        Value::String(text) if text.is_empty() => FieldValue::empty_text(),
        Value::String(text) => match data_type {
            DataType::Date => FieldValue::Date(
                NaiveDate::parse_from_str(text, ISO_DATE_FORMAT).map_err(|_| unreadable())?,
            ),
            DataType::Time => FieldValue::Time(
                NaiveTime::parse_from_str(text, "%H:%M:%S")
                    .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
                    .map_err(|_| unreadable())?,
            ),
            DataType::DateTime => FieldValue::DateTime(
                DateTime::parse_from_rfc3339(text)
                    .map(|it| it.with_timezone(&Utc))
                    .map_err(|_| unreadable())?,
            ),
            _ => FieldValue::Text(text.clone()),
        },
        Value::Array(_) | Value::Object(_) => return Err(unreadable()),
    })
}

fn invalid(reason: impl Into<String>) -> FormError {
    FormError::InvalidFieldCatalogue {
        reason: reason.into(),
    }
    .logged()
}
