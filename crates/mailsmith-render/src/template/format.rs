//! Numeric presentation shared by every template variant.
//!
//! The helpers are plain functions so variants can call them while building a
//! context, and they are also registered as MiniJinja filters (`currency`,
//! `percent`, `number`, `change`) for use inside template sources. Their
//! output only ever contains digits, separators, signs, `$` and `%`, so it is
//! safe to place in markup without escaping.

use minijinja::{Environment, Value};

fn group_thousands(whole: u64) -> String {
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats an amount as whole dollars with thousands separators.
///
/// ```rust
/// use mailsmith_render::template::format::format_currency;
///
/// assert_eq!(format_currency(143343.4), "$143,343");
/// assert_eq!(format_currency(-1250.0), "-$1,250");
/// ```
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(rounded.abs() as u64))
}

/// Formats a count with thousands separators and no decimals.
pub fn format_number(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}{}", sign, group_thousands(rounded.abs() as u64))
}

/// Brings a rate onto the 0-100 scale.
///
/// Values with magnitude at most 1 are read as fractions (`0.42` is 42%);
/// larger values are taken as already scaled.
pub fn normalize_percent(value: f64) -> f64 {
    if value.abs() <= 1.0 {
        value * 100.0
    } else {
        value
    }
}

/// Formats a percentage already on the 0-100 scale with one decimal.
pub fn format_percent_points(points: f64) -> String {
    format!("{:.1}%", points)
}

/// Formats a rate given on either the 0-1 or the 0-100 scale.
///
/// ```rust
/// use mailsmith_render::template::format::format_percent;
///
/// assert_eq!(format_percent(0.896), "89.6%");
/// assert_eq!(format_percent(89.6), "89.6%");
/// ```
pub fn format_percent(value: f64) -> String {
    format_percent_points(normalize_percent(value))
}

/// Attainment of `value` against `goal` on the 0-100 scale.
///
/// A zero goal yields `None` rather than infinity.
pub fn percent_of(value: f64, goal: f64) -> Option<f64> {
    if goal == 0.0 {
        None
    } else {
        Some(value / goal * 100.0)
    }
}

/// Formats a period-over-period change with an explicit sign.
pub fn format_change(value: f64) -> String {
    let points = normalize_percent(value);
    if points > 0.0 {
        format!("+{:.1}%", points)
    } else {
        format_percent_points(points)
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    f64::try_from(value.clone()).ok()
}

/// Registers the formatting filters on a MiniJinja environment.
///
/// Non-numeric input renders as an empty string rather than failing the
/// template, since validation has already rejected malformed numbers.
pub fn register_filters(env: &mut Environment<'static>) {
    env.add_filter("currency", |value: Value| -> String {
        as_f64(&value).map(format_currency).unwrap_or_default()
    });
    env.add_filter("number", |value: Value| -> String {
        as_f64(&value).map(format_number).unwrap_or_default()
    });
    env.add_filter("percent", |value: Value| -> String {
        as_f64(&value).map(format_percent).unwrap_or_default()
    });
    env.add_filter("change", |value: Value| -> String {
        as_f64(&value).map(format_change).unwrap_or_default()
    });
}
