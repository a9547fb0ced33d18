//! The SQL dialect collaborator.
//!
//! Cells and operators never build SQL punctuation themselves beyond the
//! predicate keywords (`=`, `IN`, `AND`, `NOT`, ...). Literal text, quoting
//! and delimiters all come from a [`Dialect`].

use serde::{Deserialize, Serialize};

use crate::identifiers::{quote_ident, quote_ident_mysql};
use crate::types::SqlType;
use crate::value::{Timestamp, Value};

/// Renders literals and identifiers for one SQL dialect.
///
/// Every method has an ANSI-flavoured default, so an implementation only
/// overrides what differs.
pub trait Dialect {
    /// Short dialect name, used in logs.
    fn name(&self) -> &'static str;

    /// The SQL NULL literal.
    fn null_literal(&self) -> &str {
        "NULL"
    }

    fn begin_string_delimiter(&self) -> &str {
        "'"
    }

    fn end_string_delimiter(&self) -> &str {
        "'"
    }

    fn begin_numeric_delimiter(&self) -> &str {
        ""
    }

    fn end_numeric_delimiter(&self) -> &str {
        ""
    }

    /// Escape the contents of a string literal (without delimiters).
    fn escape_string(&self, s: &str) -> String {
        s.replace('\'', "''")
    }

    /// Quote a column or table identifier.
    fn quote_identifier(&self, name: &str) -> String {
        quote_ident(name)
    }

    /// The pattern-matching keyword used by `Pattern` operators.
    fn pattern_operator(&self) -> &str {
        "LIKE"
    }

    /// A predicate that is always true.
    fn true_predicate(&self) -> &str {
        "1=1"
    }

    /// A predicate that is always false.
    fn false_predicate(&self) -> &str {
        "1=0"
    }

    fn boolean_literal(&self, value: bool) -> String {
        if value { "TRUE" } else { "FALSE" }.to_string()
    }

    fn bytes_literal(&self, bytes: &[u8]) -> String {
        format!("X'{}'", hex(bytes))
    }

    /// Render a string literal with delimiters and escaping.
    fn string_literal(&self, s: &str) -> String {
        format!(
            "{}{}{}",
            self.begin_string_delimiter(),
            self.escape_string(s),
            self.end_string_delimiter()
        )
    }

    /// Render a value as a literal of the declared column type.
    fn render_literal(&self, value: &Value, sql_type: SqlType) -> String {
        let numeric = |text: String| {
            if sql_type.is_textual() {
                self.string_literal(&text)
            } else {
                format!(
                    "{}{}{}",
                    self.begin_numeric_delimiter(),
                    text,
                    self.end_numeric_delimiter()
                )
            }
        };
        match value {
            Value::Null => self.null_literal().to_string(),
            Value::Bool(b) => self.boolean_literal(*b),
            Value::SmallInt(v) => numeric(v.to_string()),
            Value::Int(v) => numeric(v.to_string()),
            Value::BigInt(v) => numeric(v.to_string()),
            Value::Float(v) => numeric(v.to_string()),
            Value::Double(v) => numeric(v.to_string()),
            Value::Text(s) => self.string_literal(s),
            Value::Bytes(b) => self.bytes_literal(b),
            Value::Timestamp(us) => self.string_literal(&Timestamp(*us).to_iso8601()),
            Value::Json(j) => self.string_literal(&j.to_string()),
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02X}");
    }
    out
}

/// The built-in dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StandardDialect {
    /// PostgreSQL
    #[default]
    Postgres,
    /// SQLite
    Sqlite,
    /// MySQL / MariaDB
    Mysql,
}

impl Dialect for StandardDialect {
    fn name(&self) -> &'static str {
        match self {
            StandardDialect::Postgres => "postgres",
            StandardDialect::Sqlite => "sqlite",
            StandardDialect::Mysql => "mysql",
        }
    }

    fn escape_string(&self, s: &str) -> String {
        match self {
            StandardDialect::Mysql => s.replace('\\', "\\\\").replace('\'', "''"),
            _ => s.replace('\'', "''"),
        }
    }

    fn quote_identifier(&self, name: &str) -> String {
        match self {
            StandardDialect::Mysql => quote_ident_mysql(name),
            _ => quote_ident(name),
        }
    }

    fn boolean_literal(&self, value: bool) -> String {
        match self {
            StandardDialect::Sqlite => if value { "1" } else { "0" }.to_string(),
            _ => if value { "TRUE" } else { "FALSE" }.to_string(),
        }
    }

    fn bytes_literal(&self, bytes: &[u8]) -> String {
        match self {
            StandardDialect::Postgres => format!("'\\x{}'", hex(bytes)),
            _ => format!("X'{}'", hex(bytes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_escaping() {
        let d = StandardDialect::Postgres;
        assert_eq!(
            d.render_literal(&Value::Text("O'Brien".into()), SqlType::Text),
            "'O''Brien'"
        );
        assert_eq!(
            StandardDialect::Mysql.render_literal(&Value::Text("a\\b".into()), SqlType::Text),
            "'a\\\\b'"
        );
    }

    #[test]
    fn test_numeric_literals() {
        let d = StandardDialect::default();
        assert_eq!(d.render_literal(&Value::BigInt(-12), SqlType::BigInt), "-12");
        assert_eq!(d.render_literal(&Value::Double(2.5), SqlType::Double), "2.5");
        // numbers stored in a text column are quoted
        assert_eq!(d.render_literal(&Value::Int(7), SqlType::Text), "'7'");
    }

    #[test]
    fn test_null_bool_bytes() {
        assert_eq!(
            StandardDialect::Sqlite.render_literal(&Value::Null, SqlType::Text),
            "NULL"
        );
        assert_eq!(
            StandardDialect::Sqlite.render_literal(&Value::Bool(true), SqlType::Boolean),
            "1"
        );
        assert_eq!(
            StandardDialect::Postgres.render_literal(&Value::Bool(false), SqlType::Boolean),
            "FALSE"
        );
        assert_eq!(
            StandardDialect::Sqlite.render_literal(&Value::Bytes(vec![0xde, 0xad]), SqlType::Blob),
            "X'DEAD'"
        );
        assert_eq!(
            StandardDialect::Postgres.render_literal(&Value::Bytes(vec![0x01]), SqlType::Blob),
            "'\\x01'"
        );
    }

    #[test]
    fn test_timestamp_literal() {
        assert_eq!(
            StandardDialect::Postgres.render_literal(&Value::Timestamp(0), SqlType::Timestamp),
            "'1970-01-01 00:00:00'"
        );
    }

    #[test]
    fn test_identifier_quoting() {
        assert_eq!(StandardDialect::Postgres.quote_identifier("age"), "\"age\"");
        assert_eq!(StandardDialect::Mysql.quote_identifier("age"), "`age`");
    }
}
