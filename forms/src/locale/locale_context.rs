// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt, sync::Arc};

use chrono_tz::Tz;
use regex::Regex;

use super::{Interpolation, LocaleFormatter, PatternKind, StringResources, check_strftime,
            interpolate, resource_keys, to_strftime};
use crate::{FormError, FormResult};

/// Time pattern used when the table has no `culture.timeFormat`.
pub const DEFAULT_TIME_FORMAT: &str = "HH:mm";

/// The culture keys, read once and validated when the [`LocaleContext`] is created.
/// Date and time patterns are stored already translated to strftime.
#[derive(Debug, Clone)]
pub struct CultureSettings {
    pub locale: String,
    pub date_format: String,
    pub date_time_format: String,
    pub time_format: String,
    pub thousands_delimiter: String,
    pub decimal_point: String,
    pub integer_reg_exp: Regex,
    pub float_reg_exp: Regex,
    pub currency_symbol: String,
    pub currency_code: String,
    pub currency_decimal_places: u32,
}

impl PartialEq for CultureSettings {
    fn eq(&self, other: &Self) -> bool {
        self.locale == other.locale
            && self.date_format == other.date_format
            && self.date_time_format == other.date_time_format
            && self.time_format == other.time_format
            && self.thousands_delimiter == other.thousands_delimiter
            && self.decimal_point == other.decimal_point
            && self.integer_reg_exp.as_str() == other.integer_reg_exp.as_str()
            && self.float_reg_exp.as_str() == other.float_reg_exp.as_str()
            && self.currency_symbol == other.currency_symbol
            && self.currency_code == other.currency_code
            && self.currency_decimal_places == other.currency_decimal_places
    }
}

impl CultureSettings {
    /// # Errors
    ///
    /// - [`FormError::MissingLocaleResource`] if a required key is absent.
    /// - [`FormError::InvalidLocaleResource`] if a regular expression doesn't compile, a
    ///   date or time pattern uses fields its value doesn't have, or the currency decimal
    ///   places isn't a small non negative integer.
    pub fn try_from_resources(resources: &dyn StringResources) -> FormResult<Self> {
        for key in resource_keys::REQUIRED {
            if resources.lookup(key).is_none() {
                return Err(FormError::MissingLocaleResource { key: key.into() }.logged());
            }
        }

        let get = |key: &str| resources.lookup(key).unwrap_or_default();

        let compile = |key: &str| -> FormResult<Regex> {
            let value = get(key);
            Regex::new(&value).map_err(|error| {
                FormError::InvalidLocaleResource {
                    key: key.into(),
                    value: value.clone(),
                    reason: error.to_string(),
                }
                .logged()
            })
        };

        let translate =
            |key: &str, value: String, kind: PatternKind| -> FormResult<String> {
                let strftime = to_strftime(&value);
                check_strftime(&strftime, kind).map_err(|reason| {
                    FormError::InvalidLocaleResource {
                        key: key.into(),
                        value,
                        reason,
                    }
                    .logged()
                })?;
                Ok(strftime)
            };

        let currency_decimal_places = {
            let value = get(resource_keys::CURRENCY_DECIMAL_PLACES);
            match value.trim().parse::<u32>() {
                Ok(it) if it <= 15 => it,
                _ => {
                    return Err(FormError::InvalidLocaleResource {
                        key: resource_keys::CURRENCY_DECIMAL_PLACES.into(),
                        value,
                        reason: "expected an integer between 0 and 15".into(),
                    }
                    .logged());
                }
            }
        };

        Ok(Self {
            locale: get(resource_keys::LOCALE),
            date_format: translate(
                resource_keys::DATE_FORMAT,
                get(resource_keys::DATE_FORMAT),
                PatternKind::Date,
            )?,
            date_time_format: translate(
                resource_keys::DATE_TIME_FORMAT,
                get(resource_keys::DATE_TIME_FORMAT),
                PatternKind::DateTime,
            )?,
            time_format: translate(
                resource_keys::TIME_FORMAT,
                resources
                    .lookup(resource_keys::TIME_FORMAT)
                    .unwrap_or_else(|| DEFAULT_TIME_FORMAT.to_string()),
                PatternKind::Time,
            )?,
            thousands_delimiter: get(resource_keys::THOUSANDS_DELIMITER),
            decimal_point: get(resource_keys::DECIMAL_POINT),
            integer_reg_exp: compile(resource_keys::INTEGER_REG_EXP)?,
            float_reg_exp: compile(resource_keys::FLOAT_REG_EXP)?,
            currency_symbol: get(resource_keys::CURRENCY_SYMBOL),
            currency_code: get(resource_keys::CURRENCY_CODE),
            currency_decimal_places,
        })
    }
}

/// The string resource table plus the current time zone. Every parse / format operation
/// of the engine goes through one of these. Cloning is cheap (the table and the culture
/// settings are shared).
#[derive(Clone)]
pub struct LocaleContext {
    resources: Arc<dyn StringResources>,
    culture: Arc<CultureSettings>,
    time_zone: Tz,
}

impl LocaleContext {
    /// # Errors
    ///
    /// Fails fast if a required culture key is missing or unusable, see
    /// [`CultureSettings::try_from_resources`].
    pub fn try_new(
        resources: impl StringResources + 'static,
        time_zone: Tz,
    ) -> FormResult<Self> {
        Self::try_from_shared(Arc::new(resources), time_zone)
    }

    /// # Errors
    ///
    /// See [`LocaleContext::try_new`].
    pub fn try_from_shared(
        resources: Arc<dyn StringResources>,
        time_zone: Tz,
    ) -> FormResult<Self> {
        let culture = CultureSettings::try_from_resources(resources.as_ref())?;

        // % is Display, ? is Debug.
        tracing::debug!(
            message = "🌐 locale context created",
            locale = %culture.locale,
            time_zone = %time_zone
        );

        Ok(Self {
            resources,
            culture: Arc::new(culture),
            time_zone,
        })
    }

    /// Look up `key` and substitute `{token}` placeholders. A missing key yields the key
    /// itself, so that a gap in a translation table is visible rather than blank.
    #[must_use]
    pub fn str(&self, key: &str, interpolation: Option<&Interpolation>) -> String {
        let template = self
            .resources
            .lookup(key)
            .unwrap_or_else(|| key.to_string());
        match interpolation {
            Some(interpolation) => interpolate(&template, interpolation),
            None => template,
        }
    }

    #[must_use]
    pub fn culture(&self) -> &CultureSettings { &self.culture }

    #[must_use]
    pub fn time_zone(&self) -> Tz { self.time_zone }

    pub fn set_time_zone(&mut self, time_zone: Tz) { self.time_zone = time_zone; }

    #[must_use]
    pub fn with_time_zone(mut self, time_zone: Tz) -> Self {
        self.set_time_zone(time_zone);
        self
    }

    #[must_use]
    pub fn formatter(&self) -> LocaleFormatter<'_> { LocaleFormatter::new(self) }
}

impl PartialEq for LocaleContext {
    fn eq(&self, other: &Self) -> bool {
        self.time_zone == other.time_zone
            && (Arc::ptr_eq(&self.culture, &other.culture) || self.culture == other.culture)
    }
}

impl fmt::Debug for LocaleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleContext")
            .field("locale", &self.culture.locale)
            .field("time_zone", &self.time_zone)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::StringTable;

    #[test]
    fn test_missing_required_key_fails_fast() {
        let table = StringTable::en_us().without(resource_keys::DECIMAL_POINT);
        let error = LocaleContext::try_new(table, chrono_tz::UTC).unwrap_err();
        assert_eq!(
            error,
            FormError::MissingLocaleResource {
                key: resource_keys::DECIMAL_POINT.into()
            }
        );
    }

    #[test]
    fn test_bad_regex_fails_fast() {
        let table = StringTable::en_us().with(resource_keys::FLOAT_REG_EXP, "([");
        let error = LocaleContext::try_new(table, chrono_tz::UTC).unwrap_err();
        assert!(matches!(
            error,
            FormError::InvalidLocaleResource { ref key, .. }
                if key == resource_keys::FLOAT_REG_EXP
        ));
    }

    #[test]
    fn test_bad_decimal_places_fails_fast() {
        let table = StringTable::en_us().with(resource_keys::CURRENCY_DECIMAL_PLACES, "two");
        assert!(LocaleContext::try_new(table, chrono_tz::UTC).is_err());
    }

    #[test]
    fn test_date_pattern_with_time_fields_fails_fast() {
        let table = StringTable::en_us().with(resource_keys::DATE_FORMAT, "MM/dd/yyyy HH:mm");
        let error = LocaleContext::try_new(table, chrono_tz::UTC).unwrap_err();
        assert!(matches!(
            error,
            FormError::InvalidLocaleResource { ref key, ref value, .. }
                if key == resource_keys::DATE_FORMAT && value == "MM/dd/yyyy HH:mm"
        ));
    }

    #[test]
    fn test_time_pattern_with_date_fields_fails_fast() {
        let table = StringTable::en_us().with(resource_keys::TIME_FORMAT, "yyyy HH:mm");
        assert!(matches!(
            LocaleContext::try_new(table, chrono_tz::UTC),
            Err(FormError::InvalidLocaleResource { ref key, .. })
                if key == resource_keys::TIME_FORMAT
        ));
    }

    #[test]
    fn test_malformed_strftime_fails_fast() {
        let table = StringTable::en_us().with(resource_keys::DATE_TIME_FORMAT, "%Y %Q");
        assert!(LocaleContext::try_new(table, chrono_tz::UTC).is_err());
    }

    #[test]
    fn test_time_format_is_optional() {
        let table = StringTable::en_us().without(resource_keys::TIME_FORMAT);
        let context = LocaleContext::try_new(table, chrono_tz::UTC).unwrap();
        assert_eq!(context.culture().time_format, "%H:%M");
    }

    #[test]
    fn test_str_interpolates_and_falls_back_to_key() {
        let context = LocaleContext::try_new(StringTable::en_us(), chrono_tz::UTC).unwrap();
        let interpolation: Interpolation =
            [("min".to_string(), "5".to_string())].into_iter().collect();
        assert_eq!(
            context.str(resource_keys::MIN_ERROR, Some(&interpolation)),
            "Must be at least 5"
        );
        assert_eq!(context.str("no.such.key", None), "no.such.key");
    }

    #[test]
    fn test_time_zone_is_independent_of_locale() {
        let context = LocaleContext::try_new(StringTable::en_us(), chrono_tz::UTC).unwrap();
        let shifted = context.clone().with_time_zone(chrono_tz::Europe::Oslo);
        assert_eq!(shifted.time_zone(), chrono_tz::Europe::Oslo);
        assert_eq!(shifted.culture(), context.culture());
        assert_ne!(shifted, context);
    }
}
