// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt, sync::Arc};

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Deserializer, de};

use super::{DataType, FieldValue, FieldValues};
use crate::{DataPath, FormError, FormResult, LocaleContext};

/// Field definitions of one form, keyed by field name. The order is the display order.
pub type FieldDefinitions = IndexMap<String, FieldDefinition>;

/// Cross field requiredness, eg: "zip code is required when the country is US".
pub type RequiredPredicate = Arc<dyn Fn(&FieldValues) -> bool + Send + Sync>;

/// `(field_name, value, all_values, locale) -> error message`. Runs after the built in
/// rules passed, and its message (if any) is what the user sees.
pub type CustomValidatorFn =
    dyn Fn(&str, &FieldValue, &FieldValues, &LocaleContext) -> Option<String> + Send + Sync;

#[derive(Clone, Default)]
pub enum Required {
    #[default]
    No,
    Yes,
    When(RequiredPredicate),
}

impl Required {
    #[must_use]
    pub fn resolve(&self, all_values: &FieldValues) -> bool {
        match self {
            Required::No => false,
            Required::Yes => true,
            Required::When(predicate) => predicate(all_values),
        }
    }
}

impl fmt::Debug for Required {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Required::No => write!(f, "No"),
            Required::Yes => write!(f, "Yes"),
            Required::When(_) => write!(f, "When(<predicate>)"),
        }
    }
}

impl From<bool> for Required {
    fn from(it: bool) -> Self { if it { Required::Yes } else { Required::No } }
}

#[derive(Clone)]
pub struct CustomValidator(pub Arc<CustomValidatorFn>);

impl CustomValidator {
    pub fn new(
        f: impl Fn(&str, &FieldValue, &FieldValues, &LocaleContext) -> Option<String>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    #[must_use]
    pub fn call(
        &self,
        field_name: &str,
        value: &FieldValue,
        all_values: &FieldValues,
        locale: &LocaleContext,
    ) -> Option<String> {
        (self.0)(field_name, value, all_values, locale)
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomValidator(<fn>)")
    }
}

/// A compiled regular expression that can be read from a field catalogue.
#[derive(Clone, Debug)]
pub struct Pattern(pub Regex);

impl Pattern {
    /// # Errors
    ///
    /// [`FormError::InvalidFieldCatalogue`] if `it` doesn't compile.
    pub fn try_new(it: &str) -> FormResult<Self> {
        Regex::new(it).map(Self).map_err(|error| FormError::InvalidFieldCatalogue {
            reason: format!("pattern `{it}`: {error}"),
        })
    }

    #[must_use]
    pub fn is_match(&self, text: &str) -> bool { self.0.is_match(text) }

    #[must_use]
    pub fn as_str(&self) -> &str { self.0.as_str() }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool { self.as_str() == other.as_str() }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Regex::new(&text).map(Self).map_err(de::Error::custom)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextRules {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Pattern>,
    pub min_length_error: Option<String>,
    pub max_length_error: Option<String>,
    pub pattern_error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DropdownRules {
    pub options: Vec<DropdownOption>,
    /// Serialize an empty selection as JSON `null` instead of `""`.
    pub is_null_when_empty: bool,
}

/// `format` overrides `culture.dateFormat` (Unicode pattern, eg: `dd.MM.yyyy`).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateRules {
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
    pub format: Option<String>,
    pub min_date_error: Option<String>,
    pub max_date_error: Option<String>,
    pub invalid_error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeRules {
    pub format: Option<String>,
    pub invalid_error: Option<String>,
}

/// `time_zone` overrides the locale context's time zone for this field.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateTimeRules {
    pub min: Option<DateTime<Utc>>,
    pub max: Option<DateTime<Utc>>,
    pub format: Option<String>,
    pub time_zone: Option<Tz>,
    pub min_date_error: Option<String>,
    pub max_date_error: Option<String>,
    pub invalid_error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntegerRules {
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub is_blank_when_zero: bool,
    pub min_error: Option<String>,
    pub max_error: Option<String>,
    pub invalid_error: Option<String>,
}

/// `precision` defaults to `culture.currencyDecimalPlaces`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FloatRules {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub precision: Option<u32>,
    pub is_blank_when_zero: bool,
    pub min_error: Option<String>,
    pub max_error: Option<String>,
    pub invalid_error: Option<String>,
}

/// Each row of a list field is a small form of its own.
#[derive(Clone, Debug, Default)]
pub struct ListRules {
    pub row_fields: Arc<FieldDefinitions>,
}

/// The variant specific part of a [`FieldDefinition`]. Exactly one [`DataType`] per
/// variant.
#[derive(Clone, Debug)]
pub enum FieldKind {
    Text(TextRules),
    RichText(TextRules),
    Dropdown(DropdownRules),
    Date(DateRules),
    Time(TimeRules),
    DateTime(DateTimeRules),
    Integer(IntegerRules),
    NullableInteger(IntegerRules),
    Float(FloatRules),
    NullableFloat(FloatRules),
    Boolean,
    NullableBoolean,
    List(ListRules),
}

impl FieldKind {
    #[must_use]
    pub fn text() -> Self { FieldKind::Text(TextRules::default()) }

    #[must_use]
    pub fn rich_text() -> Self { FieldKind::RichText(TextRules::default()) }

    #[must_use]
    pub fn dropdown(options: Vec<DropdownOption>) -> Self {
        FieldKind::Dropdown(DropdownRules {
            options,
            is_null_when_empty: false,
        })
    }

    #[must_use]
    pub fn date() -> Self { FieldKind::Date(DateRules::default()) }

    #[must_use]
    pub fn time() -> Self { FieldKind::Time(TimeRules::default()) }

    #[must_use]
    pub fn date_time() -> Self { FieldKind::DateTime(DateTimeRules::default()) }

    #[must_use]
    pub fn integer() -> Self { FieldKind::Integer(IntegerRules::default()) }

    #[must_use]
    pub fn nullable_integer() -> Self { FieldKind::NullableInteger(IntegerRules::default()) }

    #[must_use]
    pub fn float() -> Self { FieldKind::Float(FloatRules::default()) }

    #[must_use]
    pub fn nullable_float() -> Self { FieldKind::NullableFloat(FloatRules::default()) }

    #[must_use]
    pub fn list(row_fields: FieldDefinitions) -> Self {
        FieldKind::List(ListRules {
            row_fields: Arc::new(row_fields),
        })
    }

    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            FieldKind::Text(_) => DataType::Text,
            FieldKind::RichText(_) => DataType::RichText,
            FieldKind::Dropdown(_) => DataType::Dropdown,
            FieldKind::Date(_) => DataType::Date,
            FieldKind::Time(_) => DataType::Time,
            FieldKind::DateTime(_) => DataType::DateTime,
            FieldKind::Integer(_) => DataType::Integer,
            FieldKind::NullableInteger(_) => DataType::NullableInteger,
            FieldKind::Float(_) => DataType::Float,
            FieldKind::NullableFloat(_) => DataType::NullableFloat,
            FieldKind::Boolean => DataType::Boolean,
            FieldKind::NullableBoolean => DataType::NullableBoolean,
            FieldKind::List(_) => DataType::List,
        }
    }

    /// Whether `value` can belong to a field of this kind. Empty values (see
    /// [`FieldValue::is_empty`]) always can. Numeric and date kinds also hold the raw
    /// text the user typed.
    #[must_use]
    pub fn accepts(&self, value: &FieldValue) -> bool {
        if value.is_empty() {
            return true;
        }
        match self {
            FieldKind::Text(_) | FieldKind::RichText(_) | FieldKind::Dropdown(_) => {
                matches!(value, FieldValue::Text(_))
            }
            FieldKind::Date(_) => {
                matches!(value, FieldValue::Date(_) | FieldValue::Text(_))
            }
            FieldKind::Time(_) => {
                matches!(value, FieldValue::Time(_) | FieldValue::Text(_))
            }
            FieldKind::DateTime(_) => {
                matches!(value, FieldValue::DateTime(_) | FieldValue::Text(_))
            }
            FieldKind::Integer(_) | FieldKind::NullableInteger(_) => {
                matches!(value, FieldValue::Integer(_) | FieldValue::Text(_))
            }
            FieldKind::Float(_) | FieldKind::NullableFloat(_) => matches!(
                value,
                FieldValue::Float(_) | FieldValue::Integer(_) | FieldValue::Text(_)
            ),
            FieldKind::Boolean | FieldKind::NullableBoolean => {
                matches!(value, FieldValue::Boolean(_))
            }
            FieldKind::List(_) => matches!(value, FieldValue::List(_)),
        }
    }
}

/// Declarative description of one form field.
///
/// ```
/// use r3bl_forms::{FieldDefinition, FieldKind, IntegerRules};
///
/// let age = FieldDefinition::new(
///     "Age",
///     FieldKind::Integer(IntegerRules { min: Some(18), ..Default::default() }),
/// )
/// .with_data_path("person.age")
/// .required();
/// assert!(age.data_path.is_some());
/// ```
#[derive(Clone, Debug)]
pub struct FieldDefinition {
    /// [None] makes the field UI only: it is neither read from nor written to the data
    /// model.
    pub data_path: Option<DataPath>,
    pub label: String,
    pub placeholder: Option<String>,
    pub initial_value: Option<FieldValue>,
    pub is_read_only: bool,
    pub is_required: Required,
    pub is_required_error: Option<String>,
    pub on_validate: Option<CustomValidator>,
    pub kind: FieldKind,
}

impl FieldDefinition {
    pub fn new(label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            data_path: None,
            label: label.into(),
            placeholder: None,
            initial_value: None,
            is_read_only: false,
            is_required: Required::No,
            is_required_error: None,
            on_validate: None,
            kind,
        }
    }

    #[must_use]
    pub fn with_data_path(mut self, data_path: impl Into<DataPath>) -> Self {
        self.data_path = Some(data_path.into());
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn with_initial_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.is_read_only = true;
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.is_required = Required::Yes;
        self
    }

    #[must_use]
    pub fn required_when(
        mut self,
        predicate: impl Fn(&FieldValues) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.is_required = Required::When(Arc::new(predicate));
        self
    }

    #[must_use]
    pub fn with_required_error(mut self, template: impl Into<String>) -> Self {
        self.is_required_error = Some(template.into());
        self
    }

    #[must_use]
    pub fn with_validator(
        mut self,
        f: impl Fn(&str, &FieldValue, &FieldValues, &LocaleContext) -> Option<String>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.on_validate = Some(CustomValidator::new(f));
        self
    }

    #[must_use]
    pub fn data_type(&self) -> DataType { self.kind.data_type() }

    /// The value a fresh form starts with: the declared initial value, else `false` for
    /// [`DataType::Boolean`], an empty list for [`DataType::List`], and the empty string
    /// for everything else.
    #[must_use]
    pub fn resolved_initial_value(&self) -> FieldValue {
        if let Some(it) = &self.initial_value {
            return it.clone();
        }
        match self.kind {
            FieldKind::Boolean => FieldValue::Boolean(false),
            FieldKind::List(_) => FieldValue::List(vec![]),
            _ => FieldValue::empty_text(),
        }
    }

    /// # Errors
    ///
    /// [`FormError::ValueTypeMismatch`] if `value` can't belong to this field.
    pub fn check_value(&self, field_name: &str, value: &FieldValue) -> FormResult<()> {
        if self.kind.accepts(value) {
            return Ok(());
        }
        Err(FormError::ValueTypeMismatch {
            field_name: field_name.to_string(),
            data_type: self.data_type().to_string(),
            value: format!("{value:?}"),
        }
        .logged())
    }
}

/// Checks that every key of `values` is a declared field and holds an acceptable value.
///
/// # Errors
///
/// - [`FormError::UnknownField`] for an undeclared name.
/// - [`FormError::ValueTypeMismatch`] for a value of the wrong type.
pub fn check_values(
    values: &FieldValues,
    field_definitions: &FieldDefinitions,
) -> FormResult<()> {
    for (field_name, value) in values {
        let Some(definition) = field_definitions.get(field_name) else {
            return Err(FormError::UnknownField {
                field_name: field_name.clone(),
            }
            .logged());
        };
        definition.check_value(field_name, value)?;
    }
    Ok(())
}
