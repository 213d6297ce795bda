// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Locale tables spell date and time patterns with Unicode (date-fns) tokens, like
//! `dd/MM/yyyy HH:mm`. [chrono] wants strftime items, like `%d/%m/%Y %H:%M`. This module
//! translates the former into the latter.
//!
//! | Token         | strftime | Meaning                          |
//! |---------------|----------|----------------------------------|
//! | `yyyy`, `y`   | `%Y`     | full year                        |
//! | `yy`          | `%y`     | two digit year                   |
//! | `MMMM`        | `%B`     | full month name                  |
//! | `MMM`         | `%b`     | abbreviated month name           |
//! | `MM` / `M`    | `%m` / `%-m` | month number                 |
//! | `dd` / `d`    | `%d` / `%-d` | day of month                 |
//! | `EEEE`        | `%A`     | full weekday name                |
//! | `E`..`EEE`    | `%a`     | abbreviated weekday name         |
//! | `HH` / `H`    | `%H` / `%-H` | hour, 24 hour clock          |
//! | `hh` / `h`    | `%I` / `%-I` | hour, 12 hour clock          |
//! | `mm` / `m`    | `%M` / `%-M` | minute                       |
//! | `ss` / `s`    | `%S` / `%-S` | second                       |
//! | `SSS`         | `%3f`    | milliseconds                     |
//! | `a`           | `%p`     | AM / PM                          |
//! | `XXX`, `xxx`  | `%:z`    | offset, eg `+02:00`              |
//! | `'text'`      | `text`   | quoted literal (`''` is a quote) |
//!
//! A pattern that already contains `%` is assumed to be strftime and is returned as is.
//!
//! [`check_strftime`] makes sure a translated pattern only uses fields that the value it
//! formats actually has. chrono's formatter fails on an hour in a date pattern, a year in
//! a time pattern, or a malformed `%` item.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc,
             format::{Item, StrftimeItems}};

/// The kind of value a pattern formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum PatternKind {
    #[strum(serialize = "date")]
    Date,
    #[strum(serialize = "time")]
    Time,
    #[strum(serialize = "date-time")]
    DateTime,
}

/// Translate a Unicode date pattern into a [chrono] strftime format string.
#[must_use]
pub fn to_strftime(pattern: &str) -> String {
    if pattern.contains('%') {
        return pattern.to_string();
    }

    let chars: Vec<char> = pattern.chars().collect();
    let mut acc = String::with_capacity(pattern.len() * 2);
    let mut index = 0;

    while index < chars.len() {
        let current = chars[index];

        // Quoted literal.
        if current == '\'' {
            index += 1;
            let literal_start = index;
            while index < chars.len() {
                if chars[index] == '\'' {
                    if chars.get(index + 1) == Some(&'\'') {
                        acc.push('\'');
                        index += 2;
                        continue;
                    }
                    break;
                }
                push_literal(&mut acc, chars[index]);
                index += 1;
            }
            // An empty quote pair `''` is a quote.
            if index == literal_start {
                acc.push('\'');
            }
            // Skip the closing quote.
            index += 1;
            continue;
        }

        // Run of the same letter.
        let run_start = index;
        while index < chars.len() && chars[index] == current {
            index += 1;
        }
        let run = index - run_start;

        match translate_run(current, run) {
            Some(items) => acc.push_str(items),
            None => {
                for _ in 0..run {
                    push_literal(&mut acc, current);
                }
            }
        }
    }

    acc
}

/// Format a sample value of `kind` with `strftime`.
///
/// # Errors
///
/// Returns the reason the pattern is unusable for `kind`.
pub fn check_strftime(strftime: &str, kind: PatternKind) -> Result<(), String> {
    if StrftimeItems::new(strftime).any(|item| matches!(item, Item::Error)) {
        return Err(format!("'{strftime}' is not a valid {kind} pattern"));
    }
    let mut acc = String::new();
    let written = match kind {
        PatternKind::Date => write!(acc, "{}", NaiveDate::default().format(strftime)),
        PatternKind::Time => write!(acc, "{}", NaiveTime::default().format(strftime)),
        PatternKind::DateTime => {
            write!(acc, "{}", DateTime::<Utc>::default().format(strftime))
        }
    };
    written.map_err(|_| format!("'{strftime}' uses fields that a {kind} doesn't have"))
}

fn translate_run(letter: char, run: usize) -> Option<&'static str> {
    let it = match (letter, run) {
        ('y', 2) => "%y",
        ('y', _) => "%Y",
        ('M', 1) => "%-m",
        ('M', 2) => "%m",
        ('M', 3) => "%b",
        ('M', _) => "%B",
        ('d', 1) => "%-d",
        ('d', _) => "%d",
        ('E', 4..) => "%A",
        ('E', _) => "%a",
        ('H', 1) => "%-H",
        ('H', _) => "%H",
        ('h', 1) => "%-I",
        ('h', _) => "%I",
        ('m', 1) => "%-M",
        ('m', _) => "%M",
        ('s', 1) => "%-S",
        ('s', _) => "%S",
        ('S', _) => "%3f",
        ('a', _) => "%p",
        ('X' | 'x', _) => "%:z",
        _ => return None,
    };
    Some(it)
}

fn push_literal(acc: &mut String, it: char) {
    if it == '%' {
        acc.push_str("%%");
    } else {
        acc.push(it);
    }
}
