//! The row-source collaborator and a simple in-memory row.

use crate::error::{Error, Result};
use crate::types::SqlType;
use crate::value::Value;

/// Reads single column values from a tabular result.
pub trait RowSource {
    /// Read one column, returning the value and the driver's null flag.
    ///
    /// The flag is authoritative: when it is `true` the value is ignored even
    /// if the driver filled in a placeholder such as `0`.
    fn read_scalar(&self, column: &str, sql_type: SqlType) -> Result<(Value, bool)>;
}

/// A row of named values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
    null_flags: Vec<bool>,
}

impl Row {
    /// Create a row; a column is null exactly when its value is `Value::Null`.
    ///
    /// A name without a matching value reads as a missing column.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        let null_flags = values.iter().map(Value::is_null).collect();
        Self {
            columns,
            values,
            null_flags,
        }
    }

    /// Create a row from `(name, value)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let (columns, values): (Vec<String>, Vec<Value>) =
            pairs.into_iter().map(|(c, v)| (c.into(), v)).unzip();
        Self::new(columns, values)
    }

    /// Mark a column as null regardless of its stored value.
    ///
    /// Drivers that report nulls out of band use this for their
    /// placeholder values.
    pub fn mark_null(&mut self, column: &str) -> Result<()> {
        let idx = self.index_of(column)?;
        self.null_flags[idx] = true;
        Ok(())
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a value by column name.
    pub fn get_named(&self, column: &str) -> Result<&Value> {
        let idx = self.index_of(column)?;
        Ok(&self.values[idx])
    }

    /// Position of `column`, limited to names that carry a value.
    fn index_of(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .take(self.values.len())
            .position(|c| c == column)
            .ok_or_else(|| Error::ColumnNotFound {
                column: column.to_string(),
            })
    }
}

impl RowSource for Row {
    fn read_scalar(&self, column: &str, sql_type: SqlType) -> Result<(Value, bool)> {
        let idx = self.index_of(column)?;
        let was_null = self.null_flags[idx];
        tracing::trace!(
            column,
            sql_type = sql_type.sql_name(),
            was_null,
            "Reading scalar from row"
        );
        Ok((self.values[idx].clone(), was_null))
    }
}
