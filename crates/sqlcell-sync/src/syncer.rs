//! The cell-graph synchronizer.
//!
//! A [`CellSyncer`] converts a whole cell, including its previous-value
//! snapshot and every cell embedded in its operator, between the external
//! and the internal literal type of one property. Each call runs its own
//! identity-memoized pass, so cyclic and shared sub-graphs convert to
//! cyclic and shared targets and every source node is converted once.

use sqlcell_cell::{GraphConversion, ValueCell};
use sqlcell_core::{CellValue, Error, Result};

use crate::adaptor::TypeAdaptor;

const TO_INTERNAL: &str = "to_internal";
const TO_EXTERNAL: &str = "to_external";

/// Synchronizes cells of one property through a [`TypeAdaptor`].
#[derive(Debug, Clone)]
pub struct CellSyncer<A> {
    adaptor: A,
    property: Option<String>,
}

impl<A: TypeAdaptor> CellSyncer<A> {
    /// Create a syncer for an unnamed property.
    pub fn new(adaptor: A) -> Self {
        Self {
            adaptor,
            property: None,
        }
    }

    /// Name the property; errors and log events carry the name.
    pub fn for_property(mut self, name: impl Into<String>) -> Self {
        self.property = Some(name.into());
        self
    }

    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    pub fn adaptor(&self) -> &A {
        &self.adaptor
    }

    /// Convert an external-shape cell into a fresh internal-shape cell.
    pub fn sync_to_internal(
        &self,
        external: &ValueCell<A::External>,
    ) -> Result<ValueCell<A::Internal>> {
        self.run(external, TO_INTERNAL, |v| self.adaptor.to_internal(v))
    }

    /// Convert an internal-shape cell into a fresh external-shape cell.
    pub fn sync_to_external(
        &self,
        internal: &ValueCell<A::Internal>,
    ) -> Result<ValueCell<A::External>> {
        self.run(internal, TO_EXTERNAL, |v| self.adaptor.to_external(v))
    }

    /// Like [`sync_to_internal`](Self::sync_to_internal); an absent source
    /// yields an absent target.
    pub fn sync_opt_to_internal(
        &self,
        external: Option<&ValueCell<A::External>>,
    ) -> Result<Option<ValueCell<A::Internal>>> {
        external.map(|cell| self.sync_to_internal(cell)).transpose()
    }

    /// Like [`sync_to_external`](Self::sync_to_external); an absent source
    /// yields an absent target.
    pub fn sync_opt_to_external(
        &self,
        internal: Option<&ValueCell<A::Internal>>,
    ) -> Result<Option<ValueCell<A::External>>> {
        internal.map(|cell| self.sync_to_external(cell)).transpose()
    }

    /// Replace `internal` with the conversion of `external`.
    ///
    /// On failure `internal` is left untouched. The destination keeps its
    /// own primary-key declaration.
    pub fn sync_into_internal(
        &self,
        external: &ValueCell<A::External>,
        internal: &mut ValueCell<A::Internal>,
    ) -> Result<()> {
        let converted = self.sync_to_internal(external)?;
        publish(converted, internal);
        Ok(())
    }

    /// Replace `external` with the conversion of `internal`.
    ///
    /// On failure `external` is left untouched. The destination keeps its
    /// own primary-key declaration.
    pub fn sync_into_external(
        &self,
        internal: &ValueCell<A::Internal>,
        external: &mut ValueCell<A::External>,
    ) -> Result<()> {
        let converted = self.sync_to_external(internal)?;
        publish(converted, external);
        Ok(())
    }

    #[tracing::instrument(
        level = "debug",
        skip(self, source, convert),
        fields(property = self.property.as_deref())
    )]
    fn run<S, D, F>(&self, source: &ValueCell<S>, direction: &'static str, convert: F) -> Result<ValueCell<D>>
    where
        S: CellValue,
        D: CellValue,
        F: FnMut(&S) -> std::result::Result<D, String>,
    {
        let mut pass = GraphConversion::new(source, convert);
        match pass.convert_root() {
            Ok(root) => {
                tracing::debug!(
                    source_nodes = source.arena_len(),
                    converted = pass.visited_len(),
                    memo_hits = pass.memo_hits(),
                    "Synchronized cell graph"
                );
                Ok(pass.finish(root))
            }
            Err(message) => {
                tracing::warn!(
                    property = self.property.as_deref(),
                    direction,
                    error = %message,
                    "Adaptor rejected a value, synchronization aborted"
                );
                Err(Error::AdaptorConversion {
                    property: self.property.clone(),
                    direction,
                    message,
                })
            }
        }
    }
}

fn publish<T: CellValue>(mut converted: ValueCell<T>, destination: &mut ValueCell<T>) {
    converted.set_primary_key_flag(destination.is_primary_key());
    *destination = converted;
}
