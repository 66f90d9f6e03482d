//! Cell value formatting for the exported table

use chrono::{NaiveDate, NaiveDateTime};

use crate::column::ColumnDescriptor;
use crate::field::{FieldMetadata, FieldType};
use crate::html::strip_html;
use crate::i18n::{IdentityTranslator, Translator};
use crate::value::{RawValue, RecordRef};

/// Output pattern for date columns
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Output pattern for datetime columns
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Turns raw field values into display strings.
///
/// Formatting is total: every value of every field type yields a string.
pub struct CellFormatter<'t> {
    translator: &'t dyn Translator,
}

impl Default for CellFormatter<'static> {
    fn default() -> Self {
        Self {
            translator: &IdentityTranslator,
        }
    }
}

impl<'t> CellFormatter<'t> {
    pub fn new(translator: &'t dyn Translator) -> Self {
        Self { translator }
    }

    /// Format one cell.
    ///
    /// `field` supplies selection options; it may be omitted for other types.
    pub fn format(
        &self,
        value: &RawValue,
        column: &ColumnDescriptor,
        field: Option<&FieldMetadata>,
    ) -> String {
        let field_type = column.field_type;

        if value.is_absent() {
            return if field_type == FieldType::Boolean {
                self.translator.translate("False").into_owned()
            } else {
                String::new()
            };
        }

        match field_type {
            FieldType::Boolean => {
                let literal = if value.is_truthy() { "True" } else { "False" };
                self.translator.translate(literal).into_owned()
            }
            FieldType::Many2one => match value {
                RawValue::Reference(r) => r.name().to_string(),
                _ => String::new(),
            },
            FieldType::Many2many | FieldType::One2many => match value {
                RawValue::Ids(ids) if ids.is_empty() => String::new(),
                RawValue::Ids(ids) => format!("{} record(s)", ids.len()),
                RawValue::Records(records) | RawValue::Collection(records) => {
                    join_names(records)
                }
                _ => String::new(),
            },
            FieldType::Date => match value {
                RawValue::Date(d) => format_date(d),
                RawValue::DateTime(dt) => format_date(&dt.date()),
                other => stringify(other),
            },
            FieldType::Datetime => match value {
                RawValue::DateTime(dt) => format_datetime(dt),
                RawValue::Date(d) => d
                    .and_hms_opt(0, 0, 0)
                    .map(|dt| format_datetime(&dt))
                    .unwrap_or_default(),
                other => stringify(other),
            },
            FieldType::Selection => {
                let key = stringify(value);
                field
                    .and_then(|f| f.selection_label(&key))
                    .map(str::to_string)
                    .unwrap_or(key)
            }
            FieldType::Integer | FieldType::Float | FieldType::Monetary => {
                format_number(coerce_number(value))
            }
            FieldType::Html => match value {
                RawValue::Text(s) => strip_html(s),
                other => stringify(other),
            },
            FieldType::String => stringify(value),
        }
    }

    /// Format every column of one record, in column order.
    pub fn format_row<'f, F>(&self, columns: &[ColumnDescriptor], mut value_of: F) -> Vec<String>
    where
        F: FnMut(&ColumnDescriptor) -> (RawValue, Option<&'f FieldMetadata>),
    {
        columns
            .iter()
            .map(|column| {
                let (value, field) = value_of(column);
                self.format(&value, column, field)
            })
            .collect()
    }
}

fn join_names(records: &[RecordRef]) -> String {
    records
        .iter()
        .map(RecordRef::name)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_date(d: &NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Coerce a value to a number; anything non-numeric becomes `0`.
///
/// Strings are read like a lenient float parser: the longest numeric prefix
/// wins (`"12.5kg"` is `12.5`).
pub fn coerce_number(value: &RawValue) -> f64 {
    let n = match value {
        RawValue::Number(n) => *n,
        RawValue::Text(s) => parse_float_prefix(s).unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Shortest decimal rendering: `3`, `12.5`, `0`
pub fn format_number(n: f64) -> String {
    if n == 0.0 || !n.is_finite() {
        return "0".to_string();
    }
    n.to_string()
}

fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse().ok()
}

/// Plain string form of a value
pub fn stringify(value: &RawValue) -> String {
    match value {
        RawValue::Absent => String::new(),
        RawValue::Bool(b) => b.to_string(),
        RawValue::Number(n) => format_number(*n),
        RawValue::Text(s) => s.clone(),
        RawValue::Date(d) => format_date(d),
        RawValue::DateTime(dt) => format_datetime(dt),
        RawValue::Reference(r) => match (&r.display_name, r.id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => id.to_string(),
            (None, None) => String::new(),
        },
        RawValue::Ids(ids) => ids
            .iter()
            .flatten()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(","),
        RawValue::Records(records) | RawValue::Collection(records) => join_names(records),
        RawValue::Json(v) => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Catalog;
    use serde_json::json;

    fn col(ty: FieldType) -> ColumnDescriptor {
        ColumnDescriptor::new("f", "F", ty)
    }

    fn fmt(value: serde_json::Value, ty: FieldType) -> String {
        CellFormatter::default().format(&RawValue::from_json(&value, ty), &col(ty), None)
    }

    #[test]
    fn test_boolean() {
        assert_eq!(fmt(json!(true), FieldType::Boolean), "True");
        assert_eq!(fmt(json!(false), FieldType::Boolean), "False");
        assert_eq!(fmt(json!(null), FieldType::Boolean), "False");
        let f = CellFormatter::default();
        assert_eq!(f.format(&RawValue::Absent, &col(FieldType::Boolean), None), "False");
    }

    #[test]
    fn test_boolean_is_localized() {
        let catalog = Catalog::new().with("True", "Ya").with("False", "Tidak");
        let f = CellFormatter::new(&catalog);
        let c = col(FieldType::Boolean);
        assert_eq!(f.format(&RawValue::Bool(true), &c, None), "Ya");
        assert_eq!(f.format(&RawValue::Absent, &c, None), "Tidak");
    }

    #[test]
    fn test_absent_values_are_empty() {
        for ty in [
            FieldType::Many2one,
            FieldType::Many2many,
            FieldType::Date,
            FieldType::Selection,
            FieldType::Integer,
            FieldType::Html,
            FieldType::String,
        ] {
            assert_eq!(fmt(json!(null), ty), "", "{ty:?}");
            assert_eq!(fmt(json!(false), ty), "", "{ty:?}");
        }
    }

    #[test]
    fn test_many2one() {
        assert_eq!(fmt(json!([5, "Acme Corp"]), FieldType::Many2one), "Acme Corp");
        assert_eq!(fmt(json!([5, false]), FieldType::Many2one), "");
        assert_eq!(fmt(json!({"display_name": "Bob"}), FieldType::Many2one), "Bob");
        assert_eq!(fmt(json!({"name": "Alice"}), FieldType::Many2one), "Alice");
        assert_eq!(fmt(json!(12), FieldType::Many2one), "");
    }

    #[test]
    fn test_x2many() {
        assert_eq!(fmt(json!([]), FieldType::Many2many), "");
        assert_eq!(fmt(json!([3, 4, 9]), FieldType::Many2many), "3 record(s)");
        assert_eq!(fmt(json!([1, null, 3]), FieldType::One2many), "3 record(s)");
        assert_eq!(
            fmt(
                json!([{"display_name": "Red"}, {"name": "Blue"}]),
                FieldType::Many2many
            ),
            "Red, Blue"
        );
        assert_eq!(
            fmt(
                json!({"records": [{"data": {"display_name": "L1"}}, {"data": {"name": "L2"}}]}),
                FieldType::One2many
            ),
            "L1, L2"
        );
        assert_eq!(fmt(json!("weird"), FieldType::One2many), "");
    }

    #[test]
    fn test_dates() {
        assert_eq!(fmt(json!("2024-02-29"), FieldType::Date), "2024-02-29");
        assert_eq!(fmt(json!("2024-02-29 08:30:00"), FieldType::Date), "2024-02-29");
        assert_eq!(
            fmt(json!("2024-02-29T08:30:05"), FieldType::Datetime),
            "2024-02-29 08:30:05"
        );
        assert_eq!(
            fmt(json!("2024-02-29"), FieldType::Datetime),
            "2024-02-29 00:00:00"
        );
        assert_eq!(fmt(json!("next week"), FieldType::Date), "next week");
    }

    #[test]
    fn test_selection_label_lookup() {
        let field = FieldMetadata::new(FieldType::Selection)
            .with_selection([("a", "Alpha"), ("b", "Beta")]);
        let f = CellFormatter::default();
        let c = col(FieldType::Selection);
        assert_eq!(f.format(&RawValue::from("a"), &c, Some(&field)), "Alpha");
        assert_eq!(f.format(&RawValue::from("z"), &c, Some(&field)), "z");
        assert_eq!(f.format(&RawValue::from("b"), &c, None), "b");
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(fmt(json!("12.5"), FieldType::Float), "12.5");
        assert_eq!(fmt(json!("abc"), FieldType::Float), "0");
        assert_eq!(fmt(json!(42), FieldType::Integer), "42");
        assert_eq!(fmt(json!(1999.99), FieldType::Monetary), "1999.99");
        assert_eq!(fmt(json!("  7kg"), FieldType::Integer), "7");
        assert_eq!(fmt(json!("-.5"), FieldType::Float), "-0.5");
        assert_eq!(fmt(json!("1e3"), FieldType::Float), "1000");
        assert_eq!(fmt(json!(true), FieldType::Float), "0");
        assert_eq!(fmt(json!([1]), FieldType::Float), "0");
    }

    #[test]
    fn test_html_and_default() {
        assert_eq!(
            fmt(json!("<p>Hello <b>world</b> &amp; co</p>"), FieldType::Html),
            "Hello world & co"
        );
        assert_eq!(fmt(json!("<p>a < b</p>"), FieldType::Html), "a < b");
        assert_eq!(fmt(json!("1 < 2 &eacute;t&eacute;"), FieldType::Html), "1 < 2 \u{e9}t\u{e9}");
        assert_eq!(fmt(json!("plain"), FieldType::String), "plain");
        assert_eq!(fmt(json!(3.0), FieldType::String), "3");
        assert_eq!(fmt(json!(true), FieldType::String), "true");
        assert_eq!(fmt(json!({"k": 1}), FieldType::String), r#"{"k":1}"#);
    }

    #[test]
    fn test_formatter_is_total() {
        let samples = [
            json!(null),
            json!(true),
            json!(false),
            json!(0),
            json!(-3.25),
            json!(""),
            json!("text"),
            json!("2024-01-01"),
            json!([]),
            json!([1, "x"]),
            json!([{"a": 1}]),
            json!({"records": []}),
            json!({"records": "nope"}),
            json!({}),
            json!("<b"),
        ];
        let types = [
            FieldType::Boolean,
            FieldType::Many2one,
            FieldType::Many2many,
            FieldType::One2many,
            FieldType::Date,
            FieldType::Datetime,
            FieldType::Selection,
            FieldType::Integer,
            FieldType::Float,
            FieldType::Monetary,
            FieldType::Html,
            FieldType::String,
        ];
        for value in &samples {
            for ty in types {
                let _ = fmt(value.clone(), ty);
            }
        }
    }
}
