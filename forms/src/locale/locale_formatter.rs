// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Conversion between text (as typed by the user, or shown to them) and canonical values.
//!
//! - Numbers: the locale integer / float regular expressions gate what may be parsed, the
//!   thousands delimiter is stripped, and floats are rounded half away from zero.
//! - Dates, times, and date-times: parsed and formatted with the locale patterns (or an
//!   explicit override). Date-times resolve a time zone, which defaults to the context
//!   time zone.
//! - ISO: [`LocaleFormatter::format_iso_date`] and [`LocaleFormatter::format_iso_date_time`]
//!   are the locale independent wire formats used by the serializer.
//!
//! Parse functions return [None] for text that doesn't parse, they never fail. Format
//! functions never panic: a pattern override that doesn't fit the value falls back to the
//! locale pattern.

use std::fmt::{self, Write as _};

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat,
             TimeZone, Utc};
use chrono_tz::Tz;

use super::{LocaleContext, PatternKind, format_grouped, group_digits,
            round_half_away_from_zero, to_strftime};

/// Wire format of a date.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
/// Wire format of a time of day.
pub const ISO_TIME_FORMAT: &str = "%H:%M:%S";

/// Borrowed view over a [`LocaleContext`] that parses and formats values. Stateless
/// apart from the context, so it is fine to create one per call.
#[derive(Debug, Clone, Copy)]
pub struct LocaleFormatter<'a> {
    context: &'a LocaleContext,
}

impl<'a> LocaleFormatter<'a> {
    #[must_use]
    pub fn new(context: &'a LocaleContext) -> Self { Self { context } }

    #[must_use]
    pub fn context(&self) -> &'a LocaleContext { self.context }

    fn fall_back(pattern: &str, kind: PatternKind) {
        // % is Display, ? is Debug.
        tracing::warn!(
            message = "🌐 pattern doesn't fit the value, using the locale pattern",
            pattern = %pattern,
            kind = %kind
        );
    }

    /// Remove the thousands delimiter and all whitespace.
    fn strip_delimiters(&self, text: &str) -> String {
        let delimiter = self.context.culture().thousands_delimiter.as_str();
        let without_delimiter = if delimiter.is_empty() {
            text.to_string()
        } else {
            text.replace(delimiter, "")
        };
        without_delimiter
            .chars()
            .filter(|it| !it.is_whitespace())
            .collect()
    }
}

// Numbers.
impl LocaleFormatter<'_> {
    #[must_use]
    pub fn parse_integer(&self, text: &str, blank_is_zero: bool) -> Option<i64> {
        if blank_is_zero && text.trim().is_empty() {
            return Some(0);
        }
        if !self.context.culture().integer_reg_exp.is_match(text) {
            return None;
        }
        self.strip_delimiters(text).parse::<i64>().ok()
    }

    /// `precision` defaults to `culture.currencyDecimalPlaces`.
    #[must_use]
    pub fn parse_float(
        &self,
        text: &str,
        precision: Option<u32>,
        blank_is_zero: bool,
    ) -> Option<f64> {
        if blank_is_zero && text.trim().is_empty() {
            return Some(0.0);
        }
        let culture = self.context.culture();
        if !culture.float_reg_exp.is_match(text) {
            return None;
        }
        let stripped = self.strip_delimiters(text);
        let normalized = if culture.decimal_point == "." {
            stripped
        } else {
            stripped.replace(culture.decimal_point.as_str(), ".")
        };
        // Rust accepts "inf" / "NaN", the locale patterns are not supposed to.
        let value = normalized.parse::<f64>().ok().filter(|it| it.is_finite())?;
        Some(round_half_away_from_zero(
            value,
            precision.unwrap_or(culture.currency_decimal_places),
        ))
    }

    #[must_use]
    pub fn format_integer(&self, value: i64, is_blank_when_zero: bool) -> String {
        if is_blank_when_zero && value == 0 {
            return String::new();
        }
        let digits = group_digits(
            &value.unsigned_abs().to_string(),
            &self.context.culture().thousands_delimiter,
        );
        if value < 0 { format!("-{digits}") } else { digits }
    }

    /// `precision` defaults to `culture.currencyDecimalPlaces`.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn format_float(
        &self,
        value: f64,
        precision: Option<u32>,
        is_blank_when_zero: bool,
    ) -> String {
        if is_blank_when_zero && value == 0.0 {
            return String::new();
        }
        let culture = self.context.culture();
        format_grouped(
            value,
            precision.unwrap_or(culture.currency_decimal_places),
            &culture.thousands_delimiter,
            &culture.decimal_point,
        )
    }

    /// Strips the currency symbol and code, then parses at
    /// `culture.currencyDecimalPlaces`.
    #[must_use]
    pub fn parse_currency(&self, text: &str, blank_is_zero: bool) -> Option<f64> {
        let culture = self.context.culture();
        let mut stripped = text.to_string();
        for marker in [&culture.currency_code, &culture.currency_symbol] {
            if !marker.is_empty() {
                stripped = stripped.replace(marker.as_str(), "");
            }
        }
        self.parse_float(stripped.trim(), None, blank_is_zero)
    }

    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn format_currency(&self, value: f64, is_blank_when_zero: bool) -> String {
        if is_blank_when_zero && value == 0.0 {
            return String::new();
        }
        let formatted = self.format_float(value.abs(), None, false);
        let symbol = &self.context.culture().currency_symbol;
        let is_negative = round_half_away_from_zero(
            value,
            self.context.culture().currency_decimal_places,
        ) < 0.0;
        if is_negative {
            format!("-{symbol}{formatted}")
        } else {
            format!("{symbol}{formatted}")
        }
    }
}

// Dates and times.
impl LocaleFormatter<'_> {
    fn date_pattern(&self, format: Option<&str>) -> String {
        format.map_or_else(|| self.context.culture().date_format.clone(), to_strftime)
    }

    fn date_time_pattern(&self, format: Option<&str>) -> String {
        format.map_or_else(
            || self.context.culture().date_time_format.clone(),
            to_strftime,
        )
    }

    fn time_pattern(&self, format: Option<&str>) -> String {
        format.map_or_else(|| self.context.culture().time_format.clone(), to_strftime)
    }

    /// `format` is a Unicode pattern that overrides `culture.dateFormat`.
    #[must_use]
    pub fn parse_date(&self, text: &str, format: Option<&str>) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(text.trim(), &self.date_pattern(format)).ok()
    }

    #[must_use]
    pub fn format_date(&self, date: NaiveDate, format: Option<&str>) -> String {
        let pattern = self.date_pattern(format);
        try_render(date.format(&pattern))
            .or_else(|| {
                Self::fall_back(&pattern, PatternKind::Date);
                try_render(date.format(&self.context.culture().date_format))
            })
            .unwrap_or_else(|| self.format_iso_date(date))
    }

    #[must_use]
    pub fn parse_time(&self, text: &str, format: Option<&str>) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(text.trim(), &self.time_pattern(format)).ok()
    }

    #[must_use]
    pub fn format_time(&self, time: NaiveTime, format: Option<&str>) -> String {
        let pattern = self.time_pattern(format);
        try_render(time.format(&pattern))
            .or_else(|| {
                Self::fall_back(&pattern, PatternKind::Time);
                try_render(time.format(&self.context.culture().time_format))
            })
            .unwrap_or_else(|| self.format_iso_time(time))
    }

    /// The wall clock text is read in `time_zone` (default: the context time zone). In a
    /// DST fold the earlier instant wins, in a DST gap there is no such wall clock time
    /// and [None] is returned.
    #[must_use]
    pub fn parse_date_time(
        &self,
        text: &str,
        format: Option<&str>,
        time_zone: Option<Tz>,
    ) -> Option<DateTime<Utc>> {
        let naive =
            NaiveDateTime::parse_from_str(text.trim(), &self.date_time_pattern(format))
                .ok()?;
        self.resolve_local(naive, time_zone)
    }

    #[must_use]
    pub fn format_date_time(
        &self,
        date_time: DateTime<Utc>,
        format: Option<&str>,
        time_zone: Option<Tz>,
    ) -> String {
        let time_zone = time_zone.unwrap_or(self.context.time_zone());
        let local = date_time.with_timezone(&time_zone);
        let pattern = self.date_time_pattern(format);
        try_render(local.format(&pattern))
            .or_else(|| {
                Self::fall_back(&pattern, PatternKind::DateTime);
                try_render(local.format(&self.context.culture().date_time_format))
            })
            .unwrap_or_else(|| self.format_iso_date_time(date_time))
    }

    fn resolve_local(
        &self,
        naive: NaiveDateTime,
        time_zone: Option<Tz>,
    ) -> Option<DateTime<Utc>> {
        let time_zone = time_zone.unwrap_or(self.context.time_zone());
        match time_zone.from_local_datetime(&naive) {
            LocalResult::Single(it) => Some(it.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
            LocalResult::None => None,
        }
    }
}

// Wire formats.
impl LocaleFormatter<'_> {
    /// `yyyy-MM-dd`.
    #[must_use]
    pub fn format_iso_date(&self, date: NaiveDate) -> String {
        date.format(ISO_DATE_FORMAT).to_string()
    }

    /// Accepts `yyyy-MM-dd`, and also the date part of an ISO date-time
    /// (`yyyy-MM-ddTHH:mm:ss...`).
    #[must_use]
    pub fn parse_iso_date(&self, text: &str) -> Option<NaiveDate> {
        let text = text.trim();
        NaiveDate::parse_from_str(text, ISO_DATE_FORMAT).ok().or_else(|| {
            match text.split_once('T') {
                Some((date_part, _)) => {
                    NaiveDate::parse_from_str(date_part, ISO_DATE_FORMAT).ok()
                }
                None => None,
            }
        })
    }

    /// UTC instant with millisecond precision, eg: `2024-03-01T09:30:00.000Z`.
    #[must_use]
    pub fn format_iso_date_time(&self, date_time: DateTime<Utc>) -> String {
        date_time.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    #[must_use]
    pub fn format_iso_time(&self, time: NaiveTime) -> String {
        time.format(ISO_TIME_FORMAT).to_string()
    }

    /// Accepts `HH:mm:ss` and `HH:mm` (with optional fractional seconds).
    #[must_use]
    pub fn parse_iso_time(&self, text: &str) -> Option<NaiveTime> {
        let text = text.trim();
        ["%H:%M:%S%.f", "%H:%M"]
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
    }

    /// Lenient date-time reading used when decoding a data model. Accepts:
    /// - RFC 3339 (`2024-03-01T09:30:00+01:00`, `2024-03-01T08:30:00Z`).
    /// - RFC 2822 (`Fri, 01 Mar 2024 09:30:00 GMT`).
    /// - ISO local date-time, with `T` or a space, read in `time_zone` (default: the
    ///   context time zone).
    /// - A bare ISO date, read as midnight in the same zone.
    #[must_use]
    pub fn parse_any_date_time(
        &self,
        text: &str,
        time_zone: Option<Tz>,
    ) -> Option<DateTime<Utc>> {
        let text = text.trim();
        if let Ok(it) = DateTime::parse_from_rfc3339(text)
            .or_else(|_| DateTime::parse_from_rfc2822(text))
        {
            return Some(it.with_timezone(&Utc));
        }
        let local_formats = [
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M",
        ];
        if let Some(naive) = local_formats
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        {
            return self.resolve_local(naive, time_zone);
        }
        NaiveDate::parse_from_str(text, ISO_DATE_FORMAT)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .and_then(|naive| self.resolve_local(naive, time_zone))
    }
}

// Date picker helpers.
impl LocaleFormatter<'_> {
    /// A zone naive date picker shows whatever wall clock time its value carries. To
    /// make it show `instant` as seen in `time_zone` (default: the context time zone),
    /// format the instant in that zone and read the text back as a naive value.
    #[must_use]
    pub fn to_picker_date_time(
        &self,
        instant: DateTime<Utc>,
        time_zone: Option<Tz>,
    ) -> Option<NaiveDateTime> {
        let time_zone = time_zone.unwrap_or(self.context.time_zone());
        let text = instant
            .with_timezone(&time_zone)
            .format("%Y-%m-%dT%H:%M:%S%.f")
            .to_string();
        NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }

    /// The inverse of [`LocaleFormatter::to_picker_date_time`]: the picker's wall clock
    /// value is read in `time_zone` and turned back into an instant.
    #[must_use]
    pub fn from_picker_date_time(
        &self,
        picked: NaiveDateTime,
        time_zone: Option<Tz>,
    ) -> Option<DateTime<Utc>> {
        self.resolve_local(picked, time_zone)
    }
}

/// chrono reports a field the value doesn't have as a [`fmt::Error`], which
/// `to_string` turns into a panic.
fn try_render(formatted: impl fmt::Display) -> Option<String> {
    let mut acc = String::new();
    write!(acc, "{formatted}").ok()?;
    Some(acc)
}
