//! Error types shared by every sqlcell crate.

use thiserror::Error;

use crate::types::SqlType;

/// Result alias used throughout sqlcell.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by cells, operators, enum mapping and synchronization.
///
/// Every variant is a local, synchronous failure. None of them is retried
/// by sqlcell; the caller decides what to do.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A defined primary-key cell was assigned outside the privileged path.
    #[error("primary key {} is already defined and cannot be changed", display_column(.column))]
    PrimaryKeyImmutable { column: Option<String> },

    /// `negate()` was called on a cell that has no operator.
    #[error("no operator defined on {}", display_column(.column))]
    NoOperatorDefined { column: Option<String> },

    /// A stored literal does not correspond to any declared enum constant.
    #[error("stored value {literal} does not match any constant of {enum_type}")]
    EnumMismatch {
        literal: String,
        enum_type: &'static str,
    },

    /// A type adaptor rejected a value during synchronization.
    #[error("cannot convert {} ({direction}): {message}", display_column(.property))]
    AdaptorConversion {
        property: Option<String>,
        direction: &'static str,
        message: String,
    },

    /// The operator is not meaningful for the cell's declared SQL type.
    #[error("{operator} is not supported on {sql_type:?} column {}", display_column(.column))]
    UnsupportedPredicate {
        operator: &'static str,
        sql_type: SqlType,
        column: Option<String>,
    },

    /// A dynamic value could not be read as the requested literal type.
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// The row source has no column with this name.
    #[error("no such column in row: {column}")]
    ColumnNotFound { column: String },

    /// An operator refers to a cell that does not exist in the owning arena.
    #[error("operator refers to unknown cell #{index}")]
    DanglingCell { index: u32 },

    /// A LIKE template could not be compiled for in-memory evaluation.
    #[error("invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

fn display_column(column: &Option<String>) -> &str {
    column.as_deref().unwrap_or("<unnamed>")
}

impl Error {
    /// Attach a column/property name to errors that carry one.
    ///
    /// An already-present name is kept.
    #[must_use]
    pub fn column(mut self, name: &str) -> Self {
        if let Error::PrimaryKeyImmutable { column }
        | Error::NoOperatorDefined { column }
        | Error::UnsupportedPredicate { column, .. }
        | Error::AdaptorConversion {
            property: column, ..
        } = &mut self
        {
            if column.is_none() {
                *column = Some(name.to_string());
            }
        }
        self
    }

    /// Short machine-readable name of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Error::PrimaryKeyImmutable { .. } => "primary_key_immutable",
            Error::NoOperatorDefined { .. } => "no_operator_defined",
            Error::EnumMismatch { .. } => "enum_mismatch",
            Error::AdaptorConversion { .. } => "adaptor_conversion",
            Error::UnsupportedPredicate { .. } => "unsupported_predicate",
            Error::TypeMismatch { .. } => "type_mismatch",
            Error::ColumnNotFound { .. } => "column_not_found",
            Error::DanglingCell { .. } => "dangling_cell",
            Error::InvalidPattern { .. } => "invalid_pattern",
        }
    }
}
