//! The `::format::width` suffix shared by basic and script placeholders.
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use platen_escp::{align_center, align_left, align_right};
use platen_jpath::value_to_string;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueFormat {
    #[default]
    Plain,
    /// Digit grouping, up to three fraction digits.
    Number,
    /// Digit grouping, rounded to a whole number.
    Integer,
    /// Currency symbol, digit grouping, two fraction digits.
    Currency,
    /// `Sunday, January 5, 2014`
    DateFull,
    /// `January 5, 2014`
    DateLong,
    /// `Jan 5, 2014`
    DateMedium,
    /// `1/5/14`
    DateShort,
}

/// Reducers applied when the resolved value is a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Right,
    Center,
}

impl Alignment {
    pub fn apply(self, text: &str, width: usize) -> String {
        match self {
            Alignment::Left => align_left(text, width),
            Alignment::Right => align_right(text, width),
            Alignment::Center => align_center(text, width),
        }
    }
}

/// How a resolved placeholder value turns into text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormatSpec {
    pub format: ValueFormat,
    pub aggregate: Option<Aggregate>,
    pub alignment: Alignment,
    /// Fixed output width; longer text is truncated, shorter text padded.
    pub width: Option<usize>,
}

impl FormatSpec {
    /// Reads format keywords in any order. Unknown keywords are ignored.
    pub fn parse<'a>(keywords: impl IntoIterator<Item = &'a str>) -> Self {
        let mut spec = FormatSpec::default();
        for keyword in keywords.into_iter().map(str::trim).filter(|k| !k.is_empty()) {
            match keyword.to_lowercase().as_str() {
                "number" => spec.format = ValueFormat::Number,
                "integer" => spec.format = ValueFormat::Integer,
                "currency" => spec.format = ValueFormat::Currency,
                "date_full" => spec.format = ValueFormat::DateFull,
                "date_long" => spec.format = ValueFormat::DateLong,
                "date_medium" => spec.format = ValueFormat::DateMedium,
                "date_short" => spec.format = ValueFormat::DateShort,
                "sum" => spec.aggregate = Some(Aggregate::Sum),
                "count" => spec.aggregate = Some(Aggregate::Count),
                "left" => spec.alignment = Alignment::Left,
                "right" => spec.alignment = Alignment::Right,
                "center" => spec.alignment = Alignment::Center,
                other => match other.parse::<usize>() {
                    Ok(width) => spec.width = Some(width),
                    Err(_) => log::warn!("Ignoring unknown format keyword [{}]", keyword),
                },
            }
        }
        spec
    }

    /// Formats `value`. `null` renders as empty text, padded when a width is set.
    pub fn format(&self, value: &Value, currency_symbol: &str) -> String {
        let reduced;
        let value = match self.aggregate {
            Some(aggregate) => {
                reduced = reduce(aggregate, value);
                &reduced
            }
            None => value,
        };
        let text = if value.is_null() {
            String::new()
        } else {
            self.format_value(value, currency_symbol)
        };
        match self.width {
            Some(width) => self.alignment.apply(&text, width),
            None => text,
        }
    }

    fn format_value(&self, value: &Value, currency_symbol: &str) -> String {
        let formatted = match self.format {
            ValueFormat::Plain => return value_to_string(value),
            ValueFormat::Number => as_f64(value).map(|n| decimal(n, 0, 3)),
            ValueFormat::Integer => as_f64(value).map(|n| decimal(n, 0, 0)),
            ValueFormat::Currency => as_f64(value).map(|n| {
                let sign = if decimal(n, 2, 2).starts_with('-') { "-" } else { "" };
                format!("{}{}{}", sign, currency_symbol, decimal(n.abs(), 2, 2))
            }),
            ValueFormat::DateFull => as_date(value).map(|d| d.format("%A, %B %-d, %Y").to_string()),
            ValueFormat::DateLong => as_date(value).map(|d| d.format("%B %-d, %Y").to_string()),
            ValueFormat::DateMedium => as_date(value).map(|d| d.format("%b %-d, %Y").to_string()),
            ValueFormat::DateShort => as_date(value).map(|d| d.format("%-m/%-d/%y").to_string()),
        };
        formatted.unwrap_or_else(|| {
            log::warn!("Can't apply {:?} to [{}], printing it as is", self.format, value);
            value_to_string(value)
        })
    }
}

fn reduce(aggregate: Aggregate, value: &Value) -> Value {
    match (aggregate, value) {
        (Aggregate::Count, Value::Array(items)) => Value::from(items.len()),
        (Aggregate::Count, Value::Null) => Value::from(0),
        (Aggregate::Count, _) => Value::from(1),
        (Aggregate::Sum, Value::Array(items)) => {
            let integers = items.iter().map(Value::as_i64).try_fold(0i64, |total, n| total.checked_add(n?));
            match integers {
                Some(total) => Value::from(total),
                None => Value::from(items.iter().filter_map(as_f64).sum::<f64>()),
            }
        }
        (Aggregate::Sum, other) => other.clone(),
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Accepts `2014-01-05`, RFC 3339 date-times and zone-less `2014-01-05T10:00:00`.
fn as_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|d| d.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|d| d.date())
        })
}

/// Grouped decimal text with between `min_fraction` and `max_fraction` digits.
fn decimal(n: f64, min_fraction: usize, max_fraction: usize) -> String {
    let rounded = format!("{:.*}", max_fraction, n.abs());
    let (integer, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let mut fraction = fraction.to_string();
    while fraction.len() > min_fraction && fraction.ends_with('0') {
        fraction.pop();
    }
    let is_zero = integer.chars().chain(fraction.chars()).all(|c| c == '0');
    let mut out = String::new();
    if n.is_sign_negative() && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(integer));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(&fraction);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fmt(keywords: &str, value: Value) -> String {
        FormatSpec::parse(keywords.split("::")).format(&value, "$")
    }

    #[test]
    fn test_parse_keywords() {
        let spec = FormatSpec::parse(["currency", "right", "12"]);
        assert_eq!(spec.format, ValueFormat::Currency);
        assert_eq!(spec.alignment, Alignment::Right);
        assert_eq!(spec.width, Some(12));
        assert_eq!(spec.aggregate, None);
        assert_eq!(FormatSpec::parse(["bogus"]), FormatSpec::default());
    }

    #[test]
    fn test_width_pads_and_truncates() {
        assert_eq!(fmt("10", json!("Jocki")), "Jocki     ");
        assert_eq!(fmt("5", json!("Hendry")), "Hendr");
        assert_eq!(fmt("right::6", json!("abc")), "   abc");
        assert_eq!(fmt("center::7", json!("abc")), "  abc  ");
    }

    #[test]
    fn test_null_is_empty() {
        assert_eq!(fmt("", Value::Null), "");
        assert_eq!(fmt("4", Value::Null), "    ");
        assert_eq!(fmt("number", Value::Null), "");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(fmt("number", json!(1234567.891)), "1,234,567.891");
        assert_eq!(fmt("number", json!(1234.5)), "1,234.5");
        assert_eq!(fmt("number", json!(12)), "12");
        assert_eq!(fmt("number", json!("-9876.54321")), "-9,876.543");
        assert_eq!(fmt("integer", json!(1234.7)), "1,235");
        assert_eq!(fmt("integer", json!(-0.2)), "0");
    }

    #[test]
    fn test_currency() {
        assert_eq!(fmt("currency", json!(1234.5)), "$1,234.50");
        assert_eq!(fmt("currency", json!(-3)), "-$3.00");
        assert_eq!(FormatSpec::parse(["currency"]).format(&json!(7), "Rp "), "Rp 7.00");
    }

    #[test]
    fn test_dates() {
        assert_eq!(fmt("date_full", json!("2014-01-05")), "Sunday, January 5, 2014");
        assert_eq!(fmt("date_long", json!("2014-01-05")), "January 5, 2014");
        assert_eq!(fmt("date_medium", json!("2014-01-05T10:30:00")), "Jan 5, 2014");
        assert_eq!(fmt("date_short", json!("2014-01-05T10:30:00+07:00")), "1/5/14");
    }

    #[test]
    fn test_unformattable_values_print_as_is() {
        assert_eq!(fmt("number", json!("n/a")), "n/a");
        assert_eq!(fmt("date_long", json!("yesterday")), "yesterday");
    }

    #[test]
    fn test_aggregates() {
        assert_eq!(fmt("sum", json!([1, 2, 3])), "6");
        assert_eq!(fmt("sum::currency", json!([1.5, 2.25])), "$3.75");
        assert_eq!(fmt("count", json!([1, 2, 3])), "3");
        assert_eq!(fmt("count", Value::Null), "0");
    }

    #[test]
    fn test_sum_beyond_integer_range() {
        assert!(fmt("sum", json!([i64::MAX, 1])).starts_with("922337"));
        assert_eq!(fmt("sum", json!([1, 2.5])), "3.5");
    }
}
