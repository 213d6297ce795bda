// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Per field validation. Order for one field, stopping at the first failure:
//!
//! 1. Required check: the resolved requiredness is true and the value is empty.
//! 2. Rules of the field's [`FieldKind`]. Raw text in numeric and date fields is parsed
//!    with the [`crate::LocaleFormatter`] first, a parse failure is an "invalid ..."
//!    message.
//! 3. The custom validator, which gets the parsed value.
//!
//! Empty values that are not required skip step 2.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use super::ValidationMessage;
use crate::{DateRules, DateTimeRules, FieldDefinition, FieldDefinitions, FieldErrors,
            FieldKind, FieldValue, FieldValues, FloatRules, IntegerRules, LocaleContext,
            TextRules, TimeRules, resource_keys};

/// Outcome of the rules of one kind: the parsed value, or the message to show.
type RuleResult = Result<FieldValue, String>;

/// Validate `fields_to_validate` (every field in `field_definitions` when [None]). The
/// result has an entry for each validated field, [None] meaning valid. Names that have no
/// definition are skipped. A field missing from `values` is validated as
/// [`FieldValue::Undefined`].
#[must_use]
pub fn validate_fields(
    values: &FieldValues,
    field_definitions: &FieldDefinitions,
    fields_to_validate: Option<&[String]>,
    locale: &LocaleContext,
) -> FieldErrors {
    let undefined = FieldValue::Undefined;
    let mut acc = FieldErrors::new();

    let mut validate_one = |field_name: &str, definition: &FieldDefinition| {
        let value = values.get(field_name).unwrap_or(&undefined);
        let error = validate_field(field_name, value, definition, values, locale);
        acc.insert(field_name.to_string(), error);
    };

    match fields_to_validate {
        Some(names) => {
            for field_name in names {
                if let Some(definition) = field_definitions.get(field_name) {
                    validate_one(field_name, definition);
                }
            }
        }
        None => {
            for (field_name, definition) in field_definitions {
                validate_one(field_name, definition);
            }
        }
    }

    // % is Display, ? is Debug.
    tracing::trace!(
        message = "🔎 validated fields",
        validated = %acc.len(),
        invalid = %acc.values().filter(|it| it.is_some()).count()
    );

    acc
}

/// Validate one field. Returns the message to show, or [None] if the value is valid.
/// List fields are never validated here: each row is validated by its own form.
#[must_use]
pub fn validate_field(
    field_name: &str,
    value: &FieldValue,
    definition: &FieldDefinition,
    all_values: &FieldValues,
    locale: &LocaleContext,
) -> Option<String> {
    if let FieldKind::List(_) = definition.kind {
        return None;
    }

    if value.is_empty() && definition.is_required.resolve(all_values) {
        return Some(
            ValidationMessage::new(
                locale,
                definition,
                value,
                resource_keys::IS_REQUIRED_ERROR,
                definition.is_required_error.as_deref(),
            )
            .render(),
        );
    }

    let parsed = if value.is_empty() {
        value.clone()
    } else {
        let rules = KindRules {
            definition,
            value,
            locale,
        };
        match rules.check() {
            Ok(parsed) => parsed,
            Err(message) => return Some(message),
        }
    };

    definition
        .on_validate
        .as_ref()
        .and_then(|it| it.call(field_name, &parsed, all_values, locale))
}

struct KindRules<'a> {
    definition: &'a FieldDefinition,
    value: &'a FieldValue,
    locale: &'a LocaleContext,
}

impl<'a> KindRules<'a> {
    fn check(&self) -> RuleResult {
        match &self.definition.kind {
            FieldKind::Text(rules) | FieldKind::RichText(rules) => self.check_text(rules),
            FieldKind::Dropdown(_)
            | FieldKind::Boolean
            | FieldKind::NullableBoolean
            | FieldKind::List(_) => Ok(self.value.clone()),
            FieldKind::Date(rules) => self.check_date(rules),
            FieldKind::Time(rules) => self.check_time(rules),
            FieldKind::DateTime(rules) => self.check_date_time(rules),
            FieldKind::Integer(rules) | FieldKind::NullableInteger(rules) => {
                self.check_integer(rules)
            }
            FieldKind::Float(rules) | FieldKind::NullableFloat(rules) => {
                self.check_float(rules)
            }
        }
    }

    fn message(
        &self,
        key: &'static str,
        template_override: Option<&'a str>,
    ) -> ValidationMessage<'a> {
        ValidationMessage::new(
            self.locale,
            self.definition,
            self.value,
            key,
            template_override,
        )
    }

    fn check_text(&self, rules: &'a TextRules) -> RuleResult {
        let text = match self.value {
            FieldValue::Text(it) => it.clone(),
            other => other.to_string(),
        };
        let length = text.chars().count();

        if let Some(min_length) = rules.min_length
            && length < min_length
        {
            return Err(self
                .message(
                    resource_keys::MIN_LENGTH_ERROR,
                    rules.min_length_error.as_deref(),
                )
                .token("minLength", min_length.to_string())
                .render());
        }

        if let Some(max_length) = rules.max_length
            && length > max_length
        {
            return Err(self
                .message(
                    resource_keys::MAX_LENGTH_ERROR,
                    rules.max_length_error.as_deref(),
                )
                .token("maxLength", max_length.to_string())
                .render());
        }

        if let Some(pattern) = &rules.pattern
            && !pattern.is_match(&text)
        {
            return Err(self
                .message(resource_keys::PATTERN_ERROR, rules.pattern_error.as_deref())
                .render());
        }

        Ok(FieldValue::Text(text))
    }

    fn check_date(&self, rules: &'a DateRules) -> RuleResult {
        let formatter = self.locale.formatter();
        let format = rules.format.as_deref();

        let parsed: Option<NaiveDate> = match self.value {
            FieldValue::Date(it) => Some(*it),
            FieldValue::Text(text) => formatter.parse_date(text, format),
            _ => None,
        };
        let Some(date) = parsed else {
            return Err(self
                .message(
                    resource_keys::INVALID_DATE_ERROR,
                    rules.invalid_error.as_deref(),
                )
                .render());
        };

        if let Some(min) = rules.min
            && date < min
        {
            return Err(self
                .message(resource_keys::MIN_DATE_ERROR, rules.min_date_error.as_deref())
                .token("minDate", formatter.format_date(min, format))
                .render());
        }

        if let Some(max) = rules.max
            && date > max
        {
            return Err(self
                .message(resource_keys::MAX_DATE_ERROR, rules.max_date_error.as_deref())
                .token("maxDate", formatter.format_date(max, format))
                .render());
        }

        Ok(FieldValue::Date(date))
    }

    fn check_time(&self, rules: &'a TimeRules) -> RuleResult {
        let parsed: Option<NaiveTime> = match self.value {
            FieldValue::Time(it) => Some(*it),
            FieldValue::Text(text) => {
                self.locale.formatter().parse_time(text, rules.format.as_deref())
            }
            _ => None,
        };
        parsed.map(FieldValue::Time).ok_or_else(|| {
            self.message(
                resource_keys::INVALID_TIME_ERROR,
                rules.invalid_error.as_deref(),
            )
            .render()
        })
    }

    fn check_date_time(&self, rules: &'a DateTimeRules) -> RuleResult {
        let formatter = self.locale.formatter();
        let format = rules.format.as_deref();

        let parsed: Option<DateTime<Utc>> = match self.value {
            FieldValue::DateTime(it) => Some(*it),
            FieldValue::Text(text) => {
                formatter.parse_date_time(text, format, rules.time_zone)
            }
            _ => None,
        };
        let Some(date_time) = parsed else {
            return Err(self
                .message(
                    resource_keys::INVALID_DATE_TIME_ERROR,
                    rules.invalid_error.as_deref(),
                )
                .render());
        };

        if let Some(min) = rules.min
            && date_time < min
        {
            return Err(self
                .message(resource_keys::MIN_DATE_ERROR, rules.min_date_error.as_deref())
                .token(
                    "minDate",
                    formatter.format_date_time(min, format, rules.time_zone),
                )
                .render());
        }

        if let Some(max) = rules.max
            && date_time > max
        {
            return Err(self
                .message(resource_keys::MAX_DATE_ERROR, rules.max_date_error.as_deref())
                .token(
                    "maxDate",
                    formatter.format_date_time(max, format, rules.time_zone),
                )
                .render());
        }

        Ok(FieldValue::DateTime(date_time))
    }

    fn check_integer(&self, rules: &'a IntegerRules) -> RuleResult {
        let formatter = self.locale.formatter();

        let parsed: Option<i64> = match self.value {
            FieldValue::Integer(it) => Some(*it),
            FieldValue::Text(text) => formatter.parse_integer(text, false),
            _ => None,
        };
        let Some(number) = parsed else {
            return Err(self
                .message(
                    resource_keys::INVALID_INTEGER_ERROR,
                    rules.invalid_error.as_deref(),
                )
                .render());
        };

        if let Some(min) = rules.min
            && number < min
        {
            return Err(self
                .message(resource_keys::MIN_ERROR, rules.min_error.as_deref())
                .token("min", formatter.format_integer(min, false))
                .render());
        }

        if let Some(max) = rules.max
            && number > max
        {
            return Err(self
                .message(resource_keys::MAX_ERROR, rules.max_error.as_deref())
                .token("max", formatter.format_integer(max, false))
                .render());
        }

        Ok(FieldValue::Integer(number))
    }

    #[allow(clippy::cast_precision_loss)]
    fn check_float(&self, rules: &'a FloatRules) -> RuleResult {
        let formatter = self.locale.formatter();

        let parsed: Option<f64> = match self.value {
            FieldValue::Float(it) => Some(*it),
            FieldValue::Integer(it) => Some(*it as f64),
            FieldValue::Text(text) => formatter.parse_float(text, rules.precision, false),
            _ => None,
        };
        let Some(number) = parsed else {
            return Err(self
                .message(
                    resource_keys::INVALID_FLOAT_ERROR,
                    rules.invalid_error.as_deref(),
                )
                .render());
        };

        if let Some(min) = rules.min
            && number < min
        {
            return Err(self
                .message(resource_keys::MIN_ERROR, rules.min_error.as_deref())
                .token("min", formatter.format_float(min, rules.precision, false))
                .render());
        }

        if let Some(max) = rules.max
            && number > max
        {
            return Err(self
                .message(resource_keys::MAX_ERROR, rules.max_error.as_deref())
                .token("max", formatter.format_float(max, rules.precision, false))
                .render());
        }

        Ok(FieldValue::Float(number))
    }
}
