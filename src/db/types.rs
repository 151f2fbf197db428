//! MySQL row decoding.
//!
//! Every row, whether it comes from a catalog lookup or a client query, is
//! turned into an insertion-ordered map of column name to JSON value. The
//! column's reported type picks a [`TypeCategory`], and the category picks the
//! decoder.

use crate::models::Row as JsonRow;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Number, Value as JsonValue};
use sqlx::mysql::{MySqlRow, MySqlTypeInfo, MySqlValueRef};
use sqlx::{Column, Decode, MySql, Row, Type, TypeInfo};

/// How a column's values are rendered as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Integer,
    Float,
    /// Exact text, never routed through `f64`
    Decimal,
    Boolean,
    Text,
    /// UTF-8 text when possible, base64 otherwise
    Binary,
    Json,
    Temporal,
}

impl TypeCategory {
    /// Classify a type name as reported by the MySQL driver.
    pub fn of(type_name: &str) -> Self {
        let lower = type_name.to_ascii_lowercase();
        // strip modifiers such as "UNSIGNED" or "(1)"
        let base = lower
            .split(|c: char| c == ' ' || c == '(')
            .next()
            .unwrap_or_default();

        match base {
            "decimal" | "numeric" => Self::Decimal,
            "bool" | "boolean" => Self::Boolean,
            "year" => Self::Integer,
            "float" | "double" | "real" => Self::Float,
            "json" => Self::Json,
            "bit" => Self::Binary,
            "date" | "datetime" | "timestamp" | "time" => Self::Temporal,
            b if b.ends_with("int") => Self::Integer,
            b if b.ends_with("blob") || b.ends_with("binary") => Self::Binary,
            // char, varchar, text, enum, set, geometry
            _ => Self::Text,
        }
    }
}

/// DECIMAL column value kept in its textual wire form.
#[derive(Debug)]
pub struct RawDecimal(pub String);

impl Type<MySql> for RawDecimal {
    fn type_info() -> MySqlTypeInfo {
        <String as Type<MySql>>::type_info()
    }

    fn compatible(ty: &MySqlTypeInfo) -> bool {
        matches!(TypeCategory::of(ty.name()), TypeCategory::Decimal)
    }
}

impl<'r> Decode<'r, MySql> for RawDecimal {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        <&str as Decode<MySql>>::decode(value).map(|s| RawDecimal(s.to_owned()))
    }
}

/// Bytes as a JSON string: the text itself if valid UTF-8, base64 otherwise.
pub fn bytes_to_json(bytes: &[u8]) -> JsonValue {
    match std::str::from_utf8(bytes) {
        Ok(text) => JsonValue::String(text.to_owned()),
        Err(_) => JsonValue::String(STANDARD.encode(bytes)),
    }
}

fn float_to_json(v: f64) -> JsonValue {
    Number::from_f64(v)
        .map(JsonValue::Number)
        .unwrap_or_else(|| JsonValue::String(v.to_string()))
}

/// Conversion of a driver row into a JSON object.
pub trait RowToJson {
    fn to_json_map(&self) -> JsonRow;
}

impl RowToJson for MySqlRow {
    fn to_json_map(&self) -> JsonRow {
        self.columns()
            .iter()
            .map(|col| {
                let idx = col.ordinal();
                let value = decode_column(self, idx, TypeCategory::of(col.type_info().name()));
                (col.name().to_owned(), value)
            })
            .collect()
    }
}

fn decode_column(row: &MySqlRow, idx: usize, category: TypeCategory) -> JsonValue {
    let value = match category {
        TypeCategory::Decimal => decode_decimal(row, idx),
        TypeCategory::Integer => decode_integer(row, idx),
        TypeCategory::Boolean => get::<bool>(row, idx).map(JsonValue::Bool),
        TypeCategory::Float => get::<f64>(row, idx)
            .or_else(|| get::<f32>(row, idx).map(f64::from))
            .map(float_to_json),
        TypeCategory::Binary => get::<Vec<u8>>(row, idx).map(|b| bytes_to_json(&b)),
        TypeCategory::Json => get::<JsonValue>(row, idx),
        TypeCategory::Temporal => decode_temporal(row, idx).or_else(|| decode_text(row, idx)),
        TypeCategory::Text => decode_text(row, idx),
    };
    value.unwrap_or(JsonValue::Null)
}

/// `None` for SQL NULL and for values the requested type cannot decode.
fn get<'r, T>(row: &'r MySqlRow, idx: usize) -> Option<T>
where
    T: Decode<'r, MySql> + Type<MySql>,
{
    row.try_get::<Option<T>, _>(idx).ok().flatten()
}

fn decode_decimal(row: &MySqlRow, idx: usize) -> Option<JsonValue> {
    match row.try_get::<Option<RawDecimal>, _>(idx) {
        Ok(value) => value.map(|d| JsonValue::String(d.0)),
        Err(e) => {
            tracing::error!(column = idx, error = %e, "Failed to decode DECIMAL");
            None
        }
    }
}

fn decode_integer(row: &MySqlRow, idx: usize) -> Option<JsonValue> {
    get::<i64>(row, idx)
        .map(JsonValue::from)
        .or_else(|| get::<u64>(row, idx).map(JsonValue::from))
        .or_else(|| get::<i32>(row, idx).map(JsonValue::from))
        .or_else(|| get::<u32>(row, idx).map(JsonValue::from))
        .or_else(|| get::<i16>(row, idx).map(JsonValue::from))
        .or_else(|| get::<u16>(row, idx).map(JsonValue::from))
        .or_else(|| get::<i8>(row, idx).map(JsonValue::from))
        .or_else(|| get::<u8>(row, idx).map(JsonValue::from))
}

fn decode_temporal(row: &MySqlRow, idx: usize) -> Option<JsonValue> {
    let text = get::<DateTime<Utc>>(row, idx)
        .map(|v| v.to_rfc3339())
        .or_else(|| {
            get::<NaiveDateTime>(row, idx).map(|v| v.format("%Y-%m-%d %H:%M:%S%.f").to_string())
        })
        .or_else(|| get::<NaiveDate>(row, idx).map(|v| v.to_string()))
        .or_else(|| get::<NaiveTime>(row, idx).map(|v| v.to_string()))?;
    Some(JsonValue::String(text))
}

fn decode_text(row: &MySqlRow, idx: usize) -> Option<JsonValue> {
    if let Some(text) = get::<String>(row, idx) {
        return Some(JsonValue::String(text));
    }
    // binary collations and out-of-range temporals arrive as raw bytes
    row.try_get_unchecked::<Option<Vec<u8>>, _>(idx)
        .ok()
        .flatten()
        .map(|b| bytes_to_json(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_types() {
        for name in ["INT", "BIGINT UNSIGNED", "TINYINT", "SMALLINT", "MEDIUMINT", "YEAR"] {
            assert_eq!(TypeCategory::of(name), TypeCategory::Integer, "{name}");
        }
    }

    #[test]
    fn test_decimal_is_exact() {
        assert_eq!(TypeCategory::of("DECIMAL"), TypeCategory::Decimal);
        assert_eq!(TypeCategory::of("NUMERIC"), TypeCategory::Decimal);
        assert_eq!(TypeCategory::of("decimal(10,2)"), TypeCategory::Decimal);
    }

    #[test]
    fn test_boolean_is_not_integer() {
        assert_eq!(TypeCategory::of("BOOLEAN"), TypeCategory::Boolean);
        assert_eq!(TypeCategory::of("bool"), TypeCategory::Boolean);
    }

    #[test]
    fn test_temporal_types() {
        for name in ["DATETIME", "TIMESTAMP", "DATE", "TIME"] {
            assert_eq!(TypeCategory::of(name), TypeCategory::Temporal, "{name}");
        }
    }

    #[test]
    fn test_remaining_types() {
        assert_eq!(TypeCategory::of("JSON"), TypeCategory::Json);
        assert_eq!(TypeCategory::of("VARBINARY"), TypeCategory::Binary);
        assert_eq!(TypeCategory::of("LONGBLOB"), TypeCategory::Binary);
        assert_eq!(TypeCategory::of("BIT"), TypeCategory::Binary);
        assert_eq!(TypeCategory::of("DOUBLE"), TypeCategory::Float);
        assert_eq!(TypeCategory::of("FLOAT"), TypeCategory::Float);
        assert_eq!(TypeCategory::of("VARCHAR"), TypeCategory::Text);
        assert_eq!(TypeCategory::of("ENUM"), TypeCategory::Text);
        assert_eq!(TypeCategory::of("GEOMETRY"), TypeCategory::Text);
    }

    #[test]
    fn test_utf8_bytes_stay_text() {
        assert_eq!(bytes_to_json(b"hello world"), JsonValue::from("hello world"));
    }

    #[test]
    fn test_non_utf8_bytes_are_base64() {
        assert_eq!(bytes_to_json(&[0xFF, 0xFE, 0x00, 0x01]), JsonValue::from("//4AAQ=="));
    }

    #[test]
    fn test_non_finite_float_becomes_string() {
        assert_eq!(float_to_json(f64::NAN), JsonValue::from("NaN"));
        assert_eq!(float_to_json(1.5), JsonValue::from(1.5));
    }
}
