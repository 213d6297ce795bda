// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Round half away from zero to `precision` decimal places.
///
/// The decimal point is moved by rewriting the exponent of the textual representation
/// (`"1.005"` → `"1.005e2"` → `100.5`) instead of multiplying by a power of ten, so that
/// binary artifacts like `1.005 * 100 == 100.49999999999999` don't leak into the result.
#[must_use]
pub fn round_half_away_from_zero(value: f64, precision: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let Ok(shifted) = format!("{value}e{precision}").parse::<f64>() else {
        return value;
    };
    let rounded = shifted.round();
    format!("{rounded}e-{precision}")
        .parse::<f64>()
        .unwrap_or(value)
}

/// Insert `delimiter` between every group of three digits of an unsigned digit string.
#[must_use]
pub fn group_digits(digits: &str, delimiter: &str) -> String {
    if delimiter.is_empty() || digits.len() <= 3 {
        return digits.to_string();
    }
    let mut acc = String::with_capacity(digits.len() + digits.len() / 3 * delimiter.len());
    let first_group_len = match digits.len() % 3 {
        0 => 3,
        it => it,
    };
    let (head, tail) = digits.split_at(first_group_len);
    acc.push_str(head);
    for (index, digit) in tail.chars().enumerate() {
        if index % 3 == 0 {
            acc.push_str(delimiter);
        }
        acc.push(digit);
    }
    acc
}

/// Render `value` with `precision` fraction digits, grouping the integer part with
/// `thousands_delimiter` and separating the fraction with `decimal_point`.
#[must_use]
pub fn format_grouped(
    value: f64,
    precision: u32,
    thousands_delimiter: &str,
    decimal_point: &str,
) -> String {
    let rounded = round_half_away_from_zero(value, precision);
    let plain = format!("{:.*}", precision as usize, rounded.abs());
    let (integer_part, fraction_part) = match plain.split_once('.') {
        Some((integer_part, fraction_part)) => (integer_part, Some(fraction_part)),
        None => (plain.as_str(), None),
    };

    let mut acc = String::new();
    // `-0.00` renders as `0.00`.
    if rounded < 0.0 {
        acc.push('-');
    }
    acc.push_str(&group_digits(integer_part, thousands_delimiter));
    if let Some(fraction_part) = fraction_part {
        acc.push_str(decimal_point);
        acc.push_str(fraction_part);
    }
    acc
}
