//! Traits for the values a cell can hold.
//!
//! Two levels exist:
//!
//! - [`CellValue`] is the minimum any cell literal needs. Domain types (enums,
//!   newtypes, anything user-declared) satisfy it automatically and can live in
//!   *external-shape* cells.
//! - [`Literal`] adds the database mapping: a declared [`SqlType`] and a
//!   conversion to and from [`Value`]. Only `Literal` cells render SQL, read
//!   rows, or evaluate predicates in memory.

use std::fmt::Debug;

use crate::error::{Error, Result};
use crate::types::SqlType;
use crate::value::{Timestamp, Value};

/// Anything that can be stored in a cell.
pub trait CellValue: Clone + PartialEq + Debug {}

impl<T: Clone + PartialEq + Debug> CellValue for T {}

/// A database-native literal type.
pub trait Literal: CellValue + PartialOrd {
    /// The SQL type a column of this literal is declared with.
    const SQL_TYPE: SqlType;

    /// Convert into a dynamic value for rendering or storage.
    fn to_value(&self) -> Value;

    /// Read from a dynamic value. Integer widths widen (and narrow when in
    /// range); `Value::Null` is always a type mismatch since nulls are
    /// tracked by the cell, not the literal.
    fn from_value(value: &Value) -> Result<Self>;
}

fn mismatch<T: Literal>(value: &Value) -> Error {
    Error::TypeMismatch {
        expected: T::SQL_TYPE.sql_name(),
        actual: value.type_name(),
    }
}

fn integer<T>(value: &Value) -> Result<T>
where
    T: Literal + TryFrom<i128>,
{
    value
        .as_integer()
        .and_then(|v| T::try_from(v).ok())
        .ok_or_else(|| mismatch::<T>(value))
}

impl Literal for bool {
    const SQL_TYPE: SqlType = SqlType::Boolean;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            // SQLite stores booleans as 0/1 integers
            other => match other.as_integer() {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(mismatch::<Self>(other)),
            },
        }
    }
}

impl Literal for i16 {
    const SQL_TYPE: SqlType = SqlType::SmallInt;

    fn to_value(&self) -> Value {
        Value::SmallInt(*self)
    }

    fn from_value(value: &Value) -> Result<Self> {
        integer(value)
    }
}

impl Literal for i32 {
    const SQL_TYPE: SqlType = SqlType::Integer;

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn from_value(value: &Value) -> Result<Self> {
        integer(value)
    }
}

impl Literal for i64 {
    const SQL_TYPE: SqlType = SqlType::BigInt;

    fn to_value(&self) -> Value {
        Value::BigInt(*self)
    }

    fn from_value(value: &Value) -> Result<Self> {
        integer(value)
    }
}

impl Literal for f32 {
    const SQL_TYPE: SqlType = SqlType::Real;

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_f64()
            .map(|v| v as f32)
            .ok_or_else(|| mismatch::<Self>(value))
    }
}

impl Literal for f64 {
    const SQL_TYPE: SqlType = SqlType::Double;

    fn to_value(&self) -> Value {
        Value::Double(*self)
    }

    fn from_value(value: &Value) -> Result<Self> {
        value.as_f64().ok_or_else(|| mismatch::<Self>(value))
    }
}

impl Literal for String {
    const SQL_TYPE: SqlType = SqlType::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch::<Self>(value))
    }
}

impl Literal for Vec<u8> {
    const SQL_TYPE: SqlType = SqlType::Blob;

    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }

    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Bytes(b) => Ok(b.clone()),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl Literal for Timestamp {
    const SQL_TYPE: SqlType = SqlType::Timestamp;

    fn to_value(&self) -> Value {
        Value::Timestamp(self.0)
    }

    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Timestamp(us) | Value::BigInt(us) => Ok(Timestamp(*us)),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_widening_and_narrowing() {
        assert_eq!(i64::from_value(&Value::SmallInt(4)), Ok(4));
        assert_eq!(i16::from_value(&Value::BigInt(300)), Ok(300));
        assert_eq!(
            i16::from_value(&Value::BigInt(70_000)),
            Err(Error::TypeMismatch {
                expected: "SMALLINT",
                actual: "BIGINT"
            })
        );
    }

    #[test]
    fn test_null_is_never_a_literal() {
        assert!(String::from_value(&Value::Null).is_err());
        assert!(i64::from_value(&Value::Null).is_err());
    }

    #[test]
    fn test_bool_from_sqlite_integers() {
        assert_eq!(bool::from_value(&Value::Int(1)), Ok(true));
        assert_eq!(bool::from_value(&Value::BigInt(0)), Ok(false));
        assert!(bool::from_value(&Value::Int(2)).is_err());
    }

    #[test]
    fn test_float_reads_integers() {
        assert_eq!(f64::from_value(&Value::Int(3)), Ok(3.0));
        assert!(f64::from_value(&Value::Text("3".into())).is_err());
    }

    #[test]
    fn test_timestamp_round_trip_through_bigint() {
        assert_eq!(Timestamp::from_value(&Value::BigInt(42)), Ok(Timestamp(42)));
        assert_eq!(Timestamp(42).to_value(), Value::Timestamp(42));
    }
}
