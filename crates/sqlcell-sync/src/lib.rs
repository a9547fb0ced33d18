//! Cycle-safe synchronization between external and internal cell shapes.
//!
//! A property declared with a user-facing type (a domain enum, a newtype)
//! is backed by a database-native literal. `sqlcell-sync` mirrors a cell of
//! one shape into a cell of the other through a one-way [`TypeAdaptor`]
//! per direction, carrying the value, change history, and operator with
//! all of its embedded cells.
//!
//! # Role In The Architecture
//!
//! - **Adaptors**: `FnAdaptor`, `IdentityAdaptor` and `EnumAdaptor` cover the
//!   common conversions; anything else implements `TypeAdaptor`.
//! - **Syncer**: `CellSyncer` runs one identity-memoized pass per call and
//!   publishes the result only when the whole pass succeeded.
//!
//! Passes are independent: nothing is cached across calls and a syncer can
//! be shared freely between threads when its adaptor can.

pub mod adaptor;
pub mod syncer;

pub use adaptor::{EnumAdaptor, FnAdaptor, IdentityAdaptor, TypeAdaptor};
pub use syncer::CellSyncer;
