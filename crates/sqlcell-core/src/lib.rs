//! Core types and collaborator traits for sqlcell.
//!
//! `sqlcell-core` is the **contract layer** of the workspace. It holds the
//! types every other crate shares and the narrow interfaces through which
//! cells talk to the surrounding persistence framework.
//!
//! # Role In The Architecture
//!
//! - **Data model**: `Value`, `SqlType` and `Timestamp` describe database-native
//!   values and declared column types.
//! - **Literal traits**: `CellValue` (anything a cell can hold) and `Literal`
//!   (values with a database mapping).
//! - **Collaborators**: `Dialect` renders literals and identifiers, `RowSource`
//!   reads column values from a result row.
//! - **Errors**: one `Error` enum for the whole workspace.
//!
//! # Who Uses This Crate
//!
//! - `sqlcell-cell` builds value cells, operators and predicate rendering on
//!   these types.
//! - `sqlcell-sync` converts cells between external and internal shapes.
//! - `sqlcell` re-exports everything behind one facade.

pub mod dialect;
pub mod error;
pub mod identifiers;
pub mod literal;
pub mod row;
pub mod types;
pub mod value;

pub use dialect::{Dialect, StandardDialect};
pub use error::{Error, Result};
pub use identifiers::{quote_ident, quote_ident_mysql};
pub use literal::{CellValue, Literal};
pub use row::{Row, RowSource};
pub use types::SqlType;
pub use value::{Timestamp, Value};
