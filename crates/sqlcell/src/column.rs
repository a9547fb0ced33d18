//! Named columns and clause assembly.
//!
//! A [`Column`] ties a cell to the column name it is declared under, the way
//! an entity's field metadata does. Heterogeneous columns are combined
//! through the object-safe [`Constraint`] trait to build WHERE, UPDATE SET
//! and ORDER BY clauses.

use sqlcell_cell::{DbEnum, EnumCell, ValueCell};
use sqlcell_core::{CellValue, Dialect, Literal, Result, RowSource};

/// A cell declared under a column name.
#[derive(Debug, Clone, PartialEq)]
pub struct Column<T> {
    name: String,
    cell: ValueCell<T>,
}

impl<T: CellValue> Column<T> {
    /// Declare a regular column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cell: ValueCell::new(),
        }
    }

    /// Declare a primary-key column.
    pub fn primary_key(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cell: ValueCell::new().with_primary_key(true),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cell(&self) -> &ValueCell<T> {
        &self.cell
    }

    pub fn cell_mut(&mut self) -> &mut ValueCell<T> {
        &mut self.cell
    }

    pub fn value(&self) -> Option<&T> {
        self.cell.value()
    }

    pub fn set(&mut self, value: T) -> Result<()> {
        self.cell.set(value).map_err(|e| e.column(&self.name))
    }

    pub fn set_null(&mut self) -> Result<()> {
        self.cell.set_null().map_err(|e| e.column(&self.name))
    }

    /// Change a primary-key value through the privileged path.
    pub fn set_primary_key(&mut self, value: T) -> Result<()> {
        self.cell
            .set_primary_key(value)
            .map_err(|e| e.column(&self.name))
    }

    pub fn negate(&mut self) -> Result<()> {
        self.cell.negate().map_err(|e| e.column(&self.name))
    }

    /// Accept the current value as persisted.
    pub fn mark_clean(&mut self) {
        self.cell.set_unchanged();
    }
}

impl<T: Literal> Column<T> {
    /// Load this column's value from a row.
    pub fn load<R: RowSource + ?Sized>(&mut self, row: &R) -> Result<()> {
        self.cell
            .load_from_row(row, &self.name)
            .map_err(|e| e.column(&self.name))
    }
}

/// An enum-backed cell declared under a column name.
pub struct EnumColumn<E: DbEnum, L = <E as DbEnum>::Code> {
    name: String,
    cell: EnumCell<E, L>,
}

impl<E: DbEnum, L: Literal> Clone for EnumColumn<E, L> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            cell: self.cell.clone(),
        }
    }
}

impl<E: DbEnum, L: Literal> std::fmt::Debug for EnumColumn<E, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnumColumn")
            .field("name", &self.name)
            .field("cell", &self.cell)
            .finish()
    }
}

impl<E: DbEnum, L: Literal> EnumColumn<E, L> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cell: EnumCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cell(&self) -> &EnumCell<E, L> {
        &self.cell
    }

    pub fn cell_mut(&mut self) -> &mut EnumCell<E, L> {
        &mut self.cell
    }

    pub fn set(&mut self, value: E) -> Result<()> {
        self.cell.set(value).map_err(|e| e.column(&self.name))
    }

    pub fn get(&self) -> Result<Option<E>> {
        self.cell.as_enum()
    }

    pub fn load<R: RowSource + ?Sized>(&mut self, row: &R) -> Result<()> {
        self.cell
            .load_from_row(row, &self.name)
            .map_err(|e| e.column(&self.name))
    }
}

// ============================================================================
// Constraint
// ============================================================================

/// Type-erased view of a column for clause assembly.
pub trait Constraint {
    fn column_name(&self) -> &str;

    /// The column's predicate; empty when it carries no operator.
    fn render_predicate(&self, dialect: &dyn Dialect) -> Result<String>;

    /// The column's current value as a literal.
    fn render_value(&self, dialect: &dyn Dialect) -> String;

    fn has_changed(&self) -> bool;

    /// Whether the column holds a writable value: a literal or an explicit
    /// NULL, not a query constraint.
    fn has_concrete_value(&self) -> bool;

    fn is_primary_key(&self) -> bool;

    fn sort_order_sql(&self) -> &'static str;
}

impl<T: Literal> Constraint for Column<T> {
    fn column_name(&self) -> &str {
        &self.name
    }

    fn render_predicate(&self, dialect: &dyn Dialect) -> Result<String> {
        self.cell.render_predicate(&self.name, dialect)
    }

    fn render_value(&self, dialect: &dyn Dialect) -> String {
        self.cell.render_literal(dialect)
    }

    fn has_changed(&self) -> bool {
        self.cell.has_changed()
    }

    fn has_concrete_value(&self) -> bool {
        self.cell.holds_concrete_value()
    }

    fn is_primary_key(&self) -> bool {
        self.cell.is_primary_key()
    }

    fn sort_order_sql(&self) -> &'static str {
        self.cell.sort_order_sql()
    }
}

impl<E: DbEnum, L: Literal> Constraint for EnumColumn<E, L> {
    fn column_name(&self) -> &str {
        &self.name
    }

    fn render_predicate(&self, dialect: &dyn Dialect) -> Result<String> {
        self.cell.cell().render_predicate(&self.name, dialect)
    }

    fn render_value(&self, dialect: &dyn Dialect) -> String {
        self.cell.cell().render_literal(dialect)
    }

    fn has_changed(&self) -> bool {
        self.cell.cell().has_changed()
    }

    fn has_concrete_value(&self) -> bool {
        self.cell.cell().holds_concrete_value()
    }

    fn is_primary_key(&self) -> bool {
        self.cell.cell().is_primary_key()
    }

    fn sort_order_sql(&self) -> &'static str {
        self.cell.cell().sort_order_sql()
    }
}

// ============================================================================
// Clause assembly
// ============================================================================

/// AND together every non-empty column predicate.
///
/// Returns an empty string when no column constrains anything.
pub fn where_clause(columns: &[&dyn Constraint], dialect: &dyn Dialect) -> Result<String> {
    let mut parts = Vec::new();
    for column in columns {
        let predicate = column.render_predicate(dialect)?;
        if !predicate.is_empty() {
            parts.push(format!("({predicate})"));
        }
    }
    tracing::trace!(
        columns = columns.len(),
        predicates = parts.len(),
        "Built WHERE clause"
    );
    Ok(parts.join(" AND "))
}

/// `SET` assignments for changed, non-key columns.
///
/// Columns that currently carry a query constraint instead of a value are
/// left out.
pub fn update_set_clause(columns: &[&dyn Constraint], dialect: &dyn Dialect) -> String {
    columns
        .iter()
        .filter(|c| c.has_changed() && c.has_concrete_value() && !c.is_primary_key())
        .map(|c| {
            format!(
                "{} = {}",
                dialect.quote_identifier(c.column_name()),
                c.render_value(dialect)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// `ORDER BY` terms in column order.
pub fn order_by_clause(columns: &[&dyn Constraint], dialect: &dyn Dialect) -> String {
    columns
        .iter()
        .map(|c| {
            format!(
                "{} {}",
                dialect.quote_identifier(c.column_name()),
                c.sort_order_sql()
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlcell_core::{Error, StandardDialect};

    #[test]
    fn test_errors_carry_column_name() {
        let mut id: Column<i64> = Column::primary_key("id");
        id.set(1).unwrap();
        assert_eq!(
            id.set(2),
            Err(Error::PrimaryKeyImmutable {
                column: Some("id".to_string())
            })
        );
        let mut name: Column<String> = Column::new("name");
        assert_eq!(
            name.negate(),
            Err(Error::NoOperatorDefined {
                column: Some("name".to_string())
            })
        );
    }

    #[test]
    fn test_where_clause_skips_unconstrained() {
        let mut age: Column<i64> = Column::new("age");
        age.cell_mut().permitted_range(Some(18), None).unwrap();
        let name: Column<String> = Column::new("name");
        let mut nick: Column<String> = Column::new("nick");
        nick.cell_mut().permit_only_null().unwrap();

        let sql = where_clause(&[&age, &name, &nick], &StandardDialect::Postgres).unwrap();
        assert_eq!(sql, "(\"age\" >= 18) AND (\"nick\" IS NULL)");
        assert_eq!(where_clause(&[&name], &StandardDialect::Postgres).unwrap(), "");
    }

    #[test]
    fn test_update_set_skips_constrained_columns() {
        let row = sqlcell_core::Row::from_pairs([
            ("age", sqlcell_core::Value::Int(30)),
            ("nick", sqlcell_core::Value::Text("al".into())),
        ]);
        let mut age: Column<i32> = Column::new("age");
        let mut nick: Column<String> = Column::new("nick");
        age.load(&row).unwrap();
        nick.load(&row).unwrap();

        age.cell_mut().permitted_range(Some(18), Some(65)).unwrap();
        assert!(age.has_changed());
        assert!(!age.has_concrete_value());
        let dialect = StandardDialect::Postgres;
        assert_eq!(update_set_clause(&[&age, &nick], &dialect), "");

        nick.set_null().unwrap();
        assert_eq!(update_set_clause(&[&age, &nick], &dialect), "\"nick\" = NULL");

        age.set(31).unwrap();
        age.negate().unwrap();
        assert_eq!(update_set_clause(&[&age, &nick], &dialect), "\"nick\" = NULL");
        age.negate().unwrap();
        assert_eq!(
            update_set_clause(&[&age, &nick], &dialect),
            "\"age\" = 31, \"nick\" = NULL"
        );
    }

    #[test]
    fn test_order_by() {
        let id: Column<i64> = Column::new("id");
        let mut created: Column<i64> = Column::new("created");
        created.cell_mut().set_sort_order(false);
        assert_eq!(
            order_by_clause(&[&created, &id], &StandardDialect::Sqlite),
            "\"created\" DESC, \"id\" ASC"
        );
    }
}
