//! Typed value/constraint cells for SQL column fields.
//!
//! `sqlcell` is the facade crate. Every persistent field of an entity is a
//! cell that holds its literal, the query constraint bound to it, and
//! whether it changed since it was loaded. Cells render their constraint as
//! a WHERE fragment, evaluate it in memory, and synchronize with cells of a
//! user-facing type through one-way adaptors.
//!
//! # Role In The Architecture
//!
//! - **`sqlcell-core`**: `Value`, `SqlType`, the `Literal` trait, the
//!   `Dialect` and `RowSource` collaborators, and the shared `Error`.
//! - **`sqlcell-cell`**: `ValueCell`, `Operator`, `EnumCell`, rendering,
//!   evaluation and graph conversion.
//! - **`sqlcell-sync`**: `TypeAdaptor` implementations and `CellSyncer`.
//! - **This crate**: re-exports, the [`prelude`], and [`Column`] with
//!   WHERE / UPDATE SET / ORDER BY assembly.
//!
//! # Example
//!
//! ```ignore
//! use sqlcell::prelude::*;
//!
//! let mut id: Column<i64> = Column::primary_key("id");
//! let mut name: Column<String> = Column::new("name");
//! id.load(&row)?;
//! name.load(&row)?;
//!
//! name.set("Robin".to_string())?;
//! let set = update_set_clause(&[&id, &name], &StandardDialect::Postgres);
//! assert_eq!(set, "\"name\" = 'Robin'");
//! ```

pub mod column;

pub use column::{Column, Constraint, EnumColumn, order_by_clause, update_set_clause, where_clause};

pub use sqlcell_cell::{
    CellId, CellRef, CodeMatch, DbEnum, EnumCell, GraphConversion, Operator, RangePolicy,
    ValueCell, like_matches,
};
pub use sqlcell_core::{
    CellValue, Dialect, Error, Literal, Result, Row, RowSource, SqlType, StandardDialect,
    Timestamp, Value, quote_ident, quote_ident_mysql,
};
pub use sqlcell_sync::{CellSyncer, EnumAdaptor, FnAdaptor, IdentityAdaptor, TypeAdaptor};

/// Everything an entity declaration usually needs.
pub mod prelude {
    pub use crate::column::{
        Column, Constraint, EnumColumn, order_by_clause, update_set_clause, where_clause,
    };
    pub use sqlcell_cell::{CodeMatch, DbEnum, EnumCell, Operator, RangePolicy, ValueCell};
    pub use sqlcell_core::{
        CellValue, Dialect, Error, Literal, Result, Row, RowSource, SqlType, StandardDialect,
        Timestamp, Value,
    };
    pub use sqlcell_sync::{CellSyncer, EnumAdaptor, FnAdaptor, IdentityAdaptor, TypeAdaptor};
}
