//! Dynamic database-native values.

use serde::{Deserialize, Serialize};

use crate::types::SqlType;

/// A database-native value as read from or written to a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// SQL NULL
    Null,
    /// Boolean value
    Bool(bool),
    /// 16-bit integer
    SmallInt(i16),
    /// 32-bit integer
    Int(i32),
    /// 64-bit integer
    BigInt(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// Text
    Text(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// Microseconds since the Unix epoch (UTC)
    Timestamp(i64),
    /// JSON document
    Json(serde_json::Value),
}

impl Value {
    /// Check whether this is SQL NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the variant, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "BOOLEAN",
            Value::SmallInt(_) => "SMALLINT",
            Value::Int(_) => "INTEGER",
            Value::BigInt(_) => "BIGINT",
            Value::Float(_) => "REAL",
            Value::Double(_) => "DOUBLE PRECISION",
            Value::Text(_) => "TEXT",
            Value::Bytes(_) => "BLOB",
            Value::Timestamp(_) => "TIMESTAMP",
            Value::Json(_) => "JSON",
        }
    }

    /// The SQL type this value naturally belongs to, or `None` for NULL.
    #[must_use]
    pub const fn sql_type(&self) -> Option<SqlType> {
        Some(match self {
            Value::Null => return None,
            Value::Bool(_) => SqlType::Boolean,
            Value::SmallInt(_) => SqlType::SmallInt,
            Value::Int(_) => SqlType::Integer,
            Value::BigInt(_) => SqlType::BigInt,
            Value::Float(_) => SqlType::Real,
            Value::Double(_) => SqlType::Double,
            Value::Text(_) => SqlType::Text,
            Value::Bytes(_) => SqlType::Blob,
            Value::Timestamp(_) => SqlType::Timestamp,
            Value::Json(_) => SqlType::Json,
        })
    }

    /// Integer content widened to `i128`, if this is an integer variant.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i128> {
        match self {
            Value::SmallInt(v) => Some(*v as i128),
            Value::Int(v) => Some(*v as i128),
            Value::BigInt(v) => Some(*v as i128),
            _ => None,
        }
    }

    /// Numeric content widened to `f64`, if this is any numeric variant.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::SmallInt(v) => Some(f64::from(*v)),
            Value::Int(v) => Some(f64::from(*v)),
            Value::BigInt(v) => Some(*v as f64),
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Text content, if this is a text value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Compare two values, widening mismatched numeric variants.
    ///
    /// Integers compare exactly at `i128`; as soon as one side is a float,
    /// both sides compare as `f64`. Non-numeric values use plain equality.
    #[must_use]
    pub fn widening_eq(&self, other: &Value) -> bool {
        if let (Some(a), Some(b)) = (self.as_integer(), other.as_integer()) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) {
            return a == b;
        }
        self == other
    }

    /// Render a short human-readable form, used in diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::SmallInt(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::BigInt(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Double(v) => v.to_string(),
            Value::Text(s) => format!("{s:?}"),
            Value::Bytes(b) => format!("<{} bytes>", b.len()),
            Value::Timestamp(us) => Timestamp(*us).to_iso8601(),
            Value::Json(j) => j.to_string(),
        }
    }
}

/// A UTC timestamp stored as microseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    const MICROS_PER_SECOND: i64 = 1_000_000;
    const SECONDS_PER_DAY: i64 = 86_400;

    /// Build a timestamp from whole seconds since the epoch.
    #[must_use]
    pub const fn from_unix_seconds(seconds: i64) -> Self {
        Self(seconds * Self::MICROS_PER_SECOND)
    }

    /// Microseconds since the epoch.
    #[must_use]
    pub const fn micros(&self) -> i64 {
        self.0
    }

    /// Format as `YYYY-MM-DD HH:MM:SS[.ffffff]`.
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        let secs = self.0.div_euclid(Self::MICROS_PER_SECOND);
        let micros = self.0.rem_euclid(Self::MICROS_PER_SECOND);
        let days = secs.div_euclid(Self::SECONDS_PER_DAY);
        let sod = secs.rem_euclid(Self::SECONDS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        let base = format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            year,
            month,
            day,
            sod / 3600,
            (sod % 3600) / 60,
            sod % 60
        );
        if micros == 0 {
            base
        } else {
            format!("{base}.{micros:06}")
        }
    }
}

// Proleptic Gregorian date from days since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
