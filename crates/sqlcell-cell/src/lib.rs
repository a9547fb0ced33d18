//! Value cells, operators and predicate rendering for sqlcell.
//!
//! A cell is the runtime value of one column: the literal, the query
//! constraint bound to it, whether it changed since it was loaded, and what
//! it held before.
//!
//! # Design Philosophy
//!
//! - **One arena per cell**: nested cells (equals bounds, range endpoints,
//!   set members, pattern templates, previous-value snapshots) are nodes of
//!   the owning cell's arena, addressed by `CellId`
//! - **Explicit changes**: the first assignment defines a cell, only later
//!   differing assignments mark it changed
//! - **Protected keys**: a defined primary-key cell only changes through
//!   `set_primary_key`
//! - **SQL semantics in memory**: `accepts` evaluates a constraint with the
//!   same three-valued logic the rendered predicate has
//!
//! # Example
//!
//! ```ignore
//! let mut age: ValueCell<i64> = ValueCell::new();
//! age.permitted_range(Some(18), Some(65))?;
//! assert_eq!(
//!     age.render_predicate("age", &StandardDialect::Postgres)?,
//!     "(\"age\" >= 18 AND \"age\" < 65)"
//! );
//! assert!(age.accepts(Some(&30))?);
//! ```

pub mod cell;
pub mod enum_cell;
pub mod eval;
pub mod graph;
pub mod operator;
pub mod render;
mod slot;

pub use cell::{CellRef, ValueCell};
pub use enum_cell::{CodeMatch, DbEnum, EnumCell};
pub use eval::like_matches;
pub use graph::GraphConversion;
pub use operator::{CellId, Operator, RangePolicy};
