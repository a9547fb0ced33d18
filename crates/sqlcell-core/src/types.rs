//! Declared SQL types of cell columns.

use serde::{Deserialize, Serialize};

/// The SQL type a column is declared with.
///
/// The declared type decides which operators make sense for a cell (for
/// example, pattern matching is only available on textual columns) and
/// how the dialect delimits literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    /// BOOLEAN
    Boolean,
    /// SMALLINT (16-bit)
    SmallInt,
    /// INTEGER (32-bit)
    Integer,
    /// BIGINT (64-bit)
    BigInt,
    /// REAL (32-bit float)
    Real,
    /// DOUBLE PRECISION (64-bit float)
    Double,
    /// TEXT / VARCHAR
    Text,
    /// BLOB / BYTEA
    Blob,
    /// TIMESTAMP (microsecond precision)
    Timestamp,
    /// JSON document
    Json,
}

impl SqlType {
    /// Get the SQL type name used for this column type.
    #[must_use]
    pub const fn sql_name(&self) -> &'static str {
        match self {
            SqlType::Boolean => "BOOLEAN",
            SqlType::SmallInt => "SMALLINT",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Real => "REAL",
            SqlType::Double => "DOUBLE PRECISION",
            SqlType::Text => "TEXT",
            SqlType::Blob => "BLOB",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Json => "JSON",
        }
    }

    /// True for integer and floating-point types.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            SqlType::SmallInt | SqlType::Integer | SqlType::BigInt | SqlType::Real | SqlType::Double
        )
    }

    /// True for types that accept pattern (`LIKE`) predicates.
    #[must_use]
    pub const fn is_textual(&self) -> bool {
        matches!(self, SqlType::Text)
    }
}
