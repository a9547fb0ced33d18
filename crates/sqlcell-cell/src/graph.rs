//! Identity-memoized conversion of a whole cell graph.
//!
//! A [`GraphConversion`] walks a source [`ValueCell`] arena from one node,
//! following previous-value snapshots and every cell embedded in an
//! operator, and builds an equivalent graph whose literals went through a
//! conversion function. The source may contain cycles (an equals bound
//! whose operator points at itself) and shared nodes (a range whose two
//! bounds are the same cell).
//!
//! Each source node is converted exactly once. The target node is
//! allocated and recorded in `visited` *before* anything nested is
//! converted, so reaching the same source node again (including through a
//! cycle) returns the recorded target instead of recursing.

use std::collections::HashMap;

use sqlcell_core::CellValue;

use crate::cell::{CellNode, ValueCell};
use crate::operator::CellId;
use crate::slot::LiteralSlot;

/// One conversion pass. Create one per call and drop it afterwards.
pub struct GraphConversion<'s, S, D, F> {
    source: &'s ValueCell<S>,
    nodes: Vec<CellNode<D>>,
    visited: HashMap<CellId, CellId>,
    memo_hits: usize,
    convert_value: F,
}

impl<'s, S, D, E, F> GraphConversion<'s, S, D, F>
where
    S: CellValue,
    D: CellValue,
    F: FnMut(&S) -> Result<D, E>,
{
    /// Start a pass over `source`; `convert_value` maps non-null literals.
    pub fn new(source: &'s ValueCell<S>, convert_value: F) -> Self {
        Self {
            source,
            nodes: Vec::new(),
            visited: HashMap::new(),
            memo_hits: 0,
            convert_value,
        }
    }

    /// Convert the root of the source cell.
    pub fn convert_root(&mut self) -> Result<CellId, E> {
        self.convert(self.source.root)
    }

    /// Convert an optional node; `None` stays `None`.
    pub fn convert_opt(&mut self, id: Option<CellId>) -> Result<Option<CellId>, E> {
        id.map(|id| self.convert(id)).transpose()
    }

    /// Convert one source node and everything reachable from it.
    pub fn convert(&mut self, id: CellId) -> Result<CellId, E> {
        if let Some(&target) = self.visited.get(&id) {
            self.memo_hits += 1;
            tracing::trace!(source = %id, target = %target, "Cell already converted");
            return Ok(target);
        }

        let target = CellId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(CellNode::undefined());
        self.visited.insert(id, target);

        let source = self.source;
        let node = &source.nodes[id.index()];

        let value = match (&node.slot.value, node.slot.is_null) {
            (Some(v), false) => Some((self.convert_value)(v)?),
            _ => None,
        };
        let previous = self.convert_opt(node.slot.previous)?;
        let operator = node
            .operator
            .as_ref()
            .map(|op| op.try_map_cells(|cell| self.convert(cell)))
            .transpose()?;

        self.nodes[target.index()] = CellNode {
            slot: LiteralSlot {
                value,
                defined: node.slot.defined,
                is_null: node.slot.is_null,
                changed: node.slot.changed,
                previous,
            },
            operator,
            sort_ascending: node.sort_ascending,
            is_primary_key: node.is_primary_key,
        };
        Ok(target)
    }

    /// Number of distinct source nodes converted so far.
    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// Number of times an already-converted node was reached again.
    pub fn memo_hits(&self) -> usize {
        self.memo_hits
    }

    /// The target node recorded for a source node, if converted.
    pub fn target_of(&self, source: CellId) -> Option<CellId> {
        self.visited.get(&source).copied()
    }

    pub(crate) fn into_nodes(self) -> Vec<CellNode<D>> {
        self.nodes
    }

    /// Finish the pass, making `root` the root of the produced cell.
    pub fn finish(self, root: CellId) -> ValueCell<D> {
        ValueCell::from_parts(self.nodes, root)
    }
}
