//! The value cell: a column's literal, its constraint and its history.
//!
//! A [`ValueCell`] owns an arena of [`CellNode`]s. The root node is the
//! cell the application sees; every nested cell (an equals bound, range
//! endpoints, set members, a pattern template, the previous-value snapshot)
//! is another node of the same arena, addressed by [`CellId`]. Operators
//! store ids, which is how an operator can point back at the cell that owns
//! it without reference-counted cycles.
//!
//! # Lifecycle
//!
//! ```text
//! undefined --set/set_null/set_operator--> defined
//! defined   --set/set_null (different)----> defined + changed (previous captured)
//! ```
//!
//! `changed` is sticky: once set it stays set until [`ValueCell::set_unchanged`].

use sqlcell_core::{CellValue, Error, Literal, Result, RowSource};

use crate::graph::GraphConversion;
use crate::operator::{CellId, Operator, RangePolicy};
use crate::slot::LiteralSlot;

/// Arena size above which a mutation reclaims unreachable nodes.
const COMPACT_THRESHOLD: usize = 64;

/// One node of a cell arena.
#[derive(Debug, Clone, PartialEq)]
pub struct CellNode<T> {
    pub(crate) slot: LiteralSlot<T>,
    pub(crate) operator: Option<Operator>,
    pub(crate) sort_ascending: bool,
    pub(crate) is_primary_key: bool,
}

impl<T> CellNode<T> {
    pub(crate) const fn undefined() -> Self {
        Self {
            slot: LiteralSlot::undefined(),
            operator: None,
            sort_ascending: true,
            is_primary_key: false,
        }
    }
}

/// A typed column value plus its query constraint, change history and
/// definedness state.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueCell<T> {
    pub(crate) nodes: Vec<CellNode<T>>,
    pub(crate) root: CellId,
    pk_change_approved: bool,
}

impl<T: CellValue> Default for ValueCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of one node in a cell arena.
#[derive(Debug)]
pub struct CellRef<'a, T> {
    cell: &'a ValueCell<T>,
    id: CellId,
}

impl<T> Clone for CellRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CellRef<'_, T> {}

impl<'a, T: CellValue> CellRef<'a, T> {
    fn node(&self) -> &'a CellNode<T> {
        &self.cell.nodes[self.id.index()]
    }

    /// Identity of this node.
    pub fn id(&self) -> CellId {
        self.id
    }

    /// The stored literal; `None` when undefined, null, or a pure constraint.
    pub fn value(&self) -> Option<&'a T> {
        self.node().slot.value()
    }

    pub fn is_defined(&self) -> bool {
        self.node().slot.defined
    }

    /// Explicitly null, or defined without a literal.
    pub fn is_null(&self) -> bool {
        self.node().slot.reads_as_null()
    }

    pub fn has_changed(&self) -> bool {
        self.node().slot.changed
    }

    pub fn operator(&self) -> Option<&'a Operator> {
        self.node().operator.as_ref()
    }

    /// Snapshot of the state before the last change.
    pub fn previous(&self) -> Option<CellRef<'a, T>> {
        self.node().slot.previous.map(|id| self.cell.node(id))
    }

    pub fn sort_ascending(&self) -> bool {
        self.node().sort_ascending
    }

    pub fn is_primary_key(&self) -> bool {
        self.node().is_primary_key
    }
}

impl<T: CellValue> ValueCell<T> {
    /// Create an undefined cell.
    pub fn new() -> Self {
        Self {
            nodes: vec![CellNode::undefined()],
            root: CellId(0),
            pk_change_approved: false,
        }
    }

    /// Create a cell whose first assignment is `value` (so it is not changed).
    pub fn with_value(value: T) -> Self {
        let mut cell = Self::new();
        cell.assign(Some(value));
        cell
    }

    /// Declare the cell as (part of) the primary key.
    pub fn with_primary_key(mut self, value: bool) -> Self {
        self.set_primary_key_flag(value);
        self
    }

    pub(crate) fn from_parts(nodes: Vec<CellNode<T>>, root: CellId) -> Self {
        Self {
            nodes,
            root,
            pk_change_approved: false,
        }
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// View of the root node.
    pub fn root(&self) -> CellRef<'_, T> {
        self.node(self.root)
    }

    /// View of any node of this cell's arena.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this arena.
    pub fn node(&self, id: CellId) -> CellRef<'_, T> {
        assert!(id.index() < self.nodes.len(), "unknown cell {id}");
        CellRef { cell: self, id }
    }

    /// Number of nodes in the arena, reachable or not.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    pub fn value(&self) -> Option<&T> {
        self.root().value()
    }

    pub fn is_defined(&self) -> bool {
        self.root().is_defined()
    }

    /// True when explicitly null, or defined without a literal value.
    pub fn is_null(&self) -> bool {
        self.root().is_null()
    }

    pub fn has_changed(&self) -> bool {
        self.root().has_changed()
    }

    pub fn previous_value(&self) -> Option<CellRef<'_, T>> {
        self.root().previous()
    }

    pub fn operator(&self) -> Option<&Operator> {
        self.root().operator()
    }

    /// True when the root holds a literal or an explicit NULL rather than a
    /// query constraint such as a range, set, pattern or negated match.
    pub fn holds_concrete_value(&self) -> bool {
        matches!(
            self.operator(),
            Some(Operator::Equals { negated: false, .. } | Operator::IsNull { negated: false })
        )
    }

    pub fn is_primary_key(&self) -> bool {
        self.root().is_primary_key()
    }

    pub fn sort_ascending(&self) -> bool {
        self.root().sort_ascending()
    }

    /// `ASC` or `DESC` for ORDER BY clauses.
    pub fn sort_order_sql(&self) -> &'static str {
        if self.sort_ascending() { "ASC" } else { "DESC" }
    }

    // ========================================================================
    // Flags
    // ========================================================================

    pub fn set_primary_key_flag(&mut self, value: bool) {
        let root = self.root;
        self.nodes[root.index()].is_primary_key = value;
    }

    pub fn set_sort_order(&mut self, ascending: bool) {
        let root = self.root;
        self.nodes[root.index()].sort_ascending = ascending;
    }

    // ========================================================================
    // Assignment
    // ========================================================================

    /// Assign a value.
    ///
    /// The first assignment defines the cell without marking it changed.
    /// A later assignment that differs from the current state snapshots
    /// that state into the previous value and marks the cell changed. The
    /// operator is always rebuilt to `Equals` over a copy of the cell.
    pub fn set(&mut self, value: T) -> Result<()> {
        self.guard_primary_key()?;
        self.assign(Some(value));
        Ok(())
    }

    /// Assign SQL NULL, with the same change rules as [`set`](Self::set).
    pub fn set_null(&mut self) -> Result<()> {
        self.guard_primary_key()?;
        self.assign(None);
        Ok(())
    }

    /// Arm the privileged path for the next guarded assignment.
    ///
    /// The approval is spent by that assignment whether or not the cell was
    /// a defined primary key at the time, and loading from a row disarms it.
    pub fn approve_primary_key_change(&mut self) {
        self.pk_change_approved = true;
    }

    /// Change a primary-key value through the privileged path.
    pub fn set_primary_key(&mut self, value: T) -> Result<()> {
        self.approve_primary_key_change();
        self.set(value)
    }

    /// Replace the constraint directly.
    ///
    /// The literal value and null flag are cleared: a cell carrying a range,
    /// set or pattern is a query constraint, not a concrete value.
    pub fn set_operator(&mut self, operator: Operator) -> Result<()> {
        self.guard_primary_key()?;
        self.check_cells(&operator)?;
        let root = self.root;
        if self.nodes[root.index()].slot.defined {
            self.capture_previous();
            self.nodes[root.index()].slot.changed = true;
        } else {
            self.nodes[root.index()].slot.defined = true;
        }
        let node = &mut self.nodes[root.index()];
        node.slot.value = None;
        node.slot.is_null = false;
        node.operator = Some(operator);
        tracing::trace!(operator = node.operator.as_ref().map(Operator::name), "Operator set");
        self.compact_if_needed();
        Ok(())
    }

    /// Invert the current constraint.
    pub fn negate(&mut self) -> Result<()> {
        let root = self.root;
        match self.nodes[root.index()].operator.as_mut() {
            Some(op) => {
                op.negate();
                Ok(())
            }
            None => Err(Error::NoOperatorDefined { column: None }),
        }
    }

    /// Accept the current value as the new baseline, typically after a
    /// successful write.
    pub fn set_unchanged(&mut self) {
        let root = self.root;
        let slot = &mut self.nodes[root.index()].slot;
        slot.changed = false;
        slot.previous = None;
    }

    /// Reset to the undefined state, keeping the primary-key and sort flags.
    pub fn clear(&mut self) {
        let old = &self.nodes[self.root.index()];
        let mut fresh = CellNode::undefined();
        fresh.is_primary_key = old.is_primary_key;
        fresh.sort_ascending = old.sort_ascending;
        self.nodes = vec![fresh];
        self.root = CellId(0);
        self.pk_change_approved = false;
    }

    /// Add a standalone node holding `value` (null when `None`).
    ///
    /// Used to build operator bounds; the node is not attached to anything
    /// until an operator refers to it. The id stays valid only until the
    /// next assignment or operator change, which may compact the arena.
    pub fn add_bound(&mut self, value: Option<T>) -> CellId {
        let mut node = CellNode::undefined();
        node.slot.defined = true;
        node.slot.is_null = value.is_none();
        node.slot.value = value;
        self.push(node)
    }

    /// Copy a node within the arena.
    ///
    /// Scalar flags are copied, the previous-value chain is deep-copied and
    /// the operator is shared as-is.
    pub fn copy_node(&mut self, id: CellId) -> CellId {
        let mut node = self.nodes[id.index()].clone();
        node.slot.previous = node.slot.previous.map(|p| self.copy_node(p));
        self.push(node)
    }

    /// An independent snapshot of this cell.
    pub fn copy(&self) -> Self {
        let mut copy = self.clone();
        copy.pk_change_approved = false;
        copy
    }

    /// Drop arena nodes no longer reachable from the root.
    ///
    /// Invalidates previously observed [`CellId`]s.
    pub fn compact(&mut self) {
        let before = self.nodes.len();
        let mut conversion = GraphConversion::new(&*self, |v: &T| {
            Ok::<T, std::convert::Infallible>(v.clone())
        });
        let root = match conversion.convert(self.root) {
            Ok(root) => root,
            Err(never) => match never {},
        };
        let nodes = conversion.into_nodes();
        self.nodes = nodes;
        self.root = root;
        tracing::trace!(before, after = self.nodes.len(), "Compacted cell arena");
    }

    // ========================================================================
    // Storage
    // ========================================================================

    /// Load the root value as read from storage.
    ///
    /// Bypasses primary-key protection and leaves the cell defined and
    /// unchanged. The row's null flag wins over any placeholder value.
    pub fn load_from_row<R: RowSource + ?Sized>(&mut self, row: &R, column: &str) -> Result<()>
    where
        T: Literal,
    {
        let (value, was_null) = row.read_scalar(column, T::SQL_TYPE)?;
        let literal = if was_null || value.is_null() {
            None
        } else {
            Some(T::from_value(&value)?)
        };
        let root = self.root;
        let slot = &mut self.nodes[root.index()].slot;
        slot.defined = false;
        slot.changed = false;
        slot.previous = None;
        self.pk_change_approved = false;
        self.assign(literal);
        tracing::trace!(column, was_null, "Loaded cell from row");
        Ok(())
    }

    // ========================================================================
    // Query helpers
    // ========================================================================

    /// Constrain to any of `values`.
    pub fn permitted_values<I: IntoIterator<Item = T>>(&mut self, values: I) -> Result<()> {
        self.check_primary_key()?;
        let op = self.members_operator(values, false);
        self.set_operator(op)
    }

    /// Constrain to none of `values`.
    pub fn excluded_values<I: IntoIterator<Item = T>>(&mut self, values: I) -> Result<()> {
        self.check_primary_key()?;
        let op = self.members_operator(values, true);
        self.set_operator(op)
    }

    /// Constrain to `[lower, upper)`. A `None` bound leaves that side open.
    pub fn permitted_range(&mut self, lower: Option<T>, upper: Option<T>) -> Result<()> {
        self.range(lower, upper, RangePolicy::HalfOpen, false)
    }

    /// Constrain to `[lower, upper]`.
    pub fn permitted_range_inclusive(&mut self, lower: Option<T>, upper: Option<T>) -> Result<()> {
        self.range(lower, upper, RangePolicy::Inclusive, false)
    }

    /// Constrain to `(lower, upper)`.
    pub fn permitted_range_exclusive(&mut self, lower: Option<T>, upper: Option<T>) -> Result<()> {
        self.range(lower, upper, RangePolicy::Exclusive, false)
    }

    /// Constrain to values outside `[lower, upper)`.
    pub fn excluded_range(&mut self, lower: Option<T>, upper: Option<T>) -> Result<()> {
        self.range(lower, upper, RangePolicy::HalfOpen, true)
    }

    pub fn excluded_range_inclusive(&mut self, lower: Option<T>, upper: Option<T>) -> Result<()> {
        self.range(lower, upper, RangePolicy::Inclusive, true)
    }

    pub fn excluded_range_exclusive(&mut self, lower: Option<T>, upper: Option<T>) -> Result<()> {
        self.range(lower, upper, RangePolicy::Exclusive, true)
    }

    /// Constrain with an explicit range policy.
    pub fn range(
        &mut self,
        lower: Option<T>,
        upper: Option<T>,
        policy: RangePolicy,
        negated: bool,
    ) -> Result<()> {
        self.check_primary_key()?;
        let (lower_inclusive, upper_inclusive) = policy.inclusivity();
        let lower = lower.map(|v| self.add_bound(Some(v)));
        let upper = upper.map(|v| self.add_bound(Some(v)));
        self.set_operator(Operator::Range {
            lower,
            upper,
            lower_inclusive,
            upper_inclusive,
            negated,
        })
    }

    /// Constrain with a `LIKE` template. Only textual cells accept patterns.
    pub fn permitted_pattern(&mut self, template: T) -> Result<()>
    where
        T: Literal,
    {
        self.pattern(template, false)
    }

    pub fn excluded_pattern(&mut self, template: T) -> Result<()>
    where
        T: Literal,
    {
        self.pattern(template, true)
    }

    fn pattern(&mut self, template: T, negated: bool) -> Result<()>
    where
        T: Literal,
    {
        if !T::SQL_TYPE.is_textual() {
            return Err(Error::UnsupportedPredicate {
                operator: "pattern",
                sql_type: T::SQL_TYPE,
                column: None,
            });
        }
        self.check_primary_key()?;
        let template = self.add_bound(Some(template));
        self.set_operator(Operator::Pattern { template, negated })
    }

    /// Constrain to `IS NULL`.
    pub fn permit_only_null(&mut self) -> Result<()> {
        self.set_operator(Operator::IsNull { negated: false })
    }

    /// Constrain to `IS NOT NULL`.
    pub fn permit_only_not_null(&mut self) -> Result<()> {
        self.set_operator(Operator::IsNull { negated: true })
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn members_operator<I: IntoIterator<Item = T>>(&mut self, values: I, negated: bool) -> Operator {
        let members = values
            .into_iter()
            .map(|v| self.add_bound(Some(v)))
            .collect();
        Operator::PermittedSet { members, negated }
    }

    fn push(&mut self, node: CellNode<T>) -> CellId {
        let id = CellId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(node);
        id
    }

    fn primary_key_locked(&self) -> bool {
        let root = &self.nodes[self.root.index()];
        root.is_primary_key && root.slot.defined
    }

    /// Reject a mutation up front without spending the approval.
    fn check_primary_key(&self) -> Result<()> {
        if self.primary_key_locked() && !self.pk_change_approved {
            return Err(Error::PrimaryKeyImmutable { column: None });
        }
        Ok(())
    }

    /// Spend any armed approval, then reject the mutation if it needed one.
    fn guard_primary_key(&mut self) -> Result<()> {
        let approved = std::mem::take(&mut self.pk_change_approved);
        if !self.primary_key_locked() {
            return Ok(());
        }
        if approved {
            tracing::debug!("Approved primary key change");
            return Ok(());
        }
        Err(Error::PrimaryKeyImmutable { column: None })
    }

    fn check_cells(&self, operator: &Operator) -> Result<()> {
        match operator
            .embedded_cells()
            .into_iter()
            .find(|id| id.index() >= self.nodes.len())
        {
            Some(id) => Err(Error::DanglingCell { index: id.0 }),
            None => Ok(()),
        }
    }

    /// Snapshot the root's current state (one level of history).
    fn capture_previous(&mut self) {
        let root = self.root;
        let mut snapshot = self.nodes[root.index()].clone();
        snapshot.slot.previous = None;
        let id = self.push(snapshot);
        self.nodes[root.index()].slot.previous = Some(id);
    }

    fn assign(&mut self, value: Option<T>) {
        let root = self.root;
        let slot = &self.nodes[root.index()].slot;
        if slot.defined {
            let differs = slot.is_null != value.is_none() || slot.value != value;
            if differs {
                self.capture_previous();
                self.nodes[root.index()].slot.changed = true;
            }
        }
        let is_null = value.is_none();
        {
            let slot = &mut self.nodes[root.index()].slot;
            slot.defined = true;
            slot.is_null = is_null;
            slot.value = value;
        }
        let operator = if is_null {
            Operator::IsNull { negated: false }
        } else {
            // The bound is a history-free copy of the cell that shares the
            // new operator, so the equals constraint refers back to itself.
            let mut copy = self.nodes[root.index()].clone();
            copy.slot.previous = None;
            let bound = self.push(copy);
            Operator::Equals {
                bound,
                negated: false,
            }
        };
        if let Operator::Equals { bound, .. } = &operator {
            self.nodes[bound.index()].operator = Some(operator.clone());
        }
        self.nodes[root.index()].operator = Some(operator);
        self.compact_if_needed();
    }

    fn compact_if_needed(&mut self) {
        if self.nodes.len() > COMPACT_THRESHOLD {
            self.compact();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlcell_core::{Row, Value};

    #[test]
    fn test_new_cell_is_undefined() {
        let cell: ValueCell<i64> = ValueCell::new();
        assert!(!cell.is_defined());
        assert!(!cell.is_null());
        assert!(!cell.has_changed());
        assert!(cell.operator().is_none());
    }

    #[test]
    fn test_first_set_is_not_a_change() {
        let mut cell = ValueCell::new();
        cell.set(5_i64).unwrap();
        assert!(cell.is_defined());
        assert!(!cell.has_changed());
        assert_eq!(cell.value(), Some(&5));
        assert!(cell.previous_value().is_none());
    }

    #[test]
    fn test_change_captures_previous() {
        let mut cell = ValueCell::with_value("a".to_string());
        cell.set("b".to_string()).unwrap();
        assert!(cell.has_changed());
        let prev = cell.previous_value().unwrap();
        assert_eq!(prev.value().map(String::as_str), Some("a"));
        assert!(!prev.has_changed());
    }

    #[test]
    fn test_same_value_is_not_a_change() {
        let mut cell = ValueCell::with_value(1_i32);
        cell.set(1).unwrap();
        assert!(!cell.has_changed());
        assert!(cell.previous_value().is_none());
    }

    #[test]
    fn test_set_null_transitions() {
        let mut cell = ValueCell::with_value(1_i32);
        cell.set_null().unwrap();
        assert!(cell.is_null());
        assert!(cell.has_changed());
        assert_eq!(cell.operator(), Some(&Operator::IsNull { negated: false }));

        let mut fresh: ValueCell<i32> = ValueCell::new();
        fresh.set_null().unwrap();
        assert!(fresh.is_null());
        assert!(!fresh.has_changed());
    }

    #[test]
    fn test_equals_bound_refers_to_itself() {
        let cell = ValueCell::with_value(9_i64);
        let Some(Operator::Equals { bound, negated }) = cell.operator() else {
            panic!("expected equals");
        };
        assert!(!negated);
        let bound_ref = cell.node(*bound);
        assert_eq!(bound_ref.value(), Some(&9));
        assert_eq!(
            bound_ref.operator(),
            Some(&Operator::Equals {
                bound: *bound,
                negated: false
            })
        );
    }

    #[test]
    fn test_set_operator_clears_literal() {
        let mut cell = ValueCell::with_value(3_i64);
        cell.permitted_range(Some(1), Some(5)).unwrap();
        assert!(cell.value().is_none());
        assert!(cell.has_changed());
        assert_eq!(cell.previous_value().unwrap().value(), Some(&3));

        let mut fresh: ValueCell<i64> = ValueCell::new();
        fresh.permitted_values([1, 2]).unwrap();
        assert!(fresh.is_defined());
        assert!(!fresh.has_changed());
    }

    #[test]
    fn test_holds_concrete_value() {
        let mut cell: ValueCell<i64> = ValueCell::new();
        assert!(!cell.holds_concrete_value());
        cell.set(30).unwrap();
        assert!(cell.holds_concrete_value());
        cell.negate().unwrap();
        assert!(!cell.holds_concrete_value());
        cell.set_null().unwrap();
        assert!(cell.holds_concrete_value());
        cell.permit_only_not_null().unwrap();
        assert!(!cell.holds_concrete_value());
        cell.permitted_range(Some(18), Some(65)).unwrap();
        assert!(!cell.holds_concrete_value());
    }

    #[test]
    fn test_set_operator_rejects_dangling_cells() {
        let mut cell: ValueCell<i64> = ValueCell::new();
        let err = cell
            .set_operator(Operator::Equals {
                bound: CellId(40),
                negated: false,
            })
            .unwrap_err();
        assert_eq!(err, Error::DanglingCell { index: 40 });
        assert!(!cell.is_defined());
    }

    #[test]
    fn test_bound_ids_expire_with_compaction() {
        let mut cell: ValueCell<i64> = ValueCell::new();
        for i in 0..40 {
            cell.add_bound(Some(i));
        }
        let stale = cell.add_bound(Some(100));
        assert_eq!(stale, CellId(41));

        // Assignments push past the threshold and the unattached bounds go.
        for i in 0..20 {
            cell.set(i).unwrap();
        }
        assert!(cell.arena_len() <= stale.index());
        let err = cell
            .set_operator(Operator::PermittedSet {
                members: vec![stale],
                negated: false,
            })
            .unwrap_err();
        assert_eq!(err, Error::DanglingCell { index: 41 });
        assert_eq!(cell.value(), Some(&19));

        let fresh = cell.add_bound(Some(100));
        cell.set_operator(Operator::PermittedSet {
            members: vec![fresh],
            negated: false,
        })
        .unwrap();
        assert!(cell.accepts(Some(&100)).unwrap());
    }

    #[test]
    fn test_negate_without_operator() {
        let mut cell: ValueCell<i64> = ValueCell::new();
        assert_eq!(
            cell.negate(),
            Err(Error::NoOperatorDefined { column: None })
        );
        cell.set(1).unwrap();
        cell.negate().unwrap();
        assert!(cell.operator().unwrap().is_negated());
    }

    #[test]
    fn test_primary_key_guard() {
        let mut cell = ValueCell::new().with_primary_key(true);
        cell.set(1_i64).unwrap();
        assert_eq!(
            cell.set(2),
            Err(Error::PrimaryKeyImmutable { column: None })
        );
        assert_eq!(cell.value(), Some(&1));
        cell.set_primary_key(2).unwrap();
        assert_eq!(cell.value(), Some(&2));
        assert!(cell.set(3).is_err());
    }

    #[test]
    fn test_approval_is_spent_on_undefined_key() {
        let mut cell = ValueCell::new().with_primary_key(true);
        cell.set_primary_key(1_i64).unwrap();
        assert_eq!(
            cell.set(2),
            Err(Error::PrimaryKeyImmutable { column: None })
        );
        assert_eq!(cell.value(), Some(&1));

        let mut plain: ValueCell<i64> = ValueCell::new();
        plain.approve_primary_key_change();
        plain.set(1).unwrap();
        plain.set_primary_key_flag(true);
        assert!(plain.set(2).is_err());
    }

    #[test]
    fn test_load_disarms_approval() {
        let row = Row::from_pairs([("id", Value::BigInt(8))]);
        let mut cell = ValueCell::new().with_primary_key(true);
        cell.set(1_i64).unwrap();
        cell.approve_primary_key_change();
        cell.load_from_row(&row, "id").unwrap();
        assert_eq!(cell.value(), Some(&8));
        assert!(cell.set(9).is_err());
    }

    #[test]
    fn test_rejected_constraints_do_not_grow_arena() {
        let mut cell = ValueCell::new().with_primary_key(true);
        cell.set(1_i64).unwrap();
        let len = cell.arena_len();
        for i in 0..100_i64 {
            assert!(cell.permitted_values([i, i + 1]).is_err());
            assert!(cell.excluded_values([i]).is_err());
            assert!(cell.permitted_range(Some(i), Some(i + 5)).is_err());
        }
        assert_eq!(cell.arena_len(), len);

        let mut name = ValueCell::with_value("a".to_string()).with_primary_key(true);
        let len = name.arena_len();
        assert!(name.permitted_pattern("a%".to_string()).is_err());
        assert_eq!(name.arena_len(), len);

        name.approve_primary_key_change();
        name.permitted_pattern("a%".to_string()).unwrap();
        assert!(matches!(name.operator(), Some(Operator::Pattern { .. })));
        assert!(name.permitted_pattern("b%".to_string()).is_err());
    }

    #[test]
    fn test_pattern_requires_text() {
        let mut numbers: ValueCell<i64> = ValueCell::new();
        let err = numbers.permitted_pattern(5).unwrap_err();
        assert_eq!(err.kind(), "unsupported_predicate");

        let mut names: ValueCell<String> = ValueCell::new();
        names.permitted_pattern("A%".to_string()).unwrap();
        assert!(matches!(names.operator(), Some(Operator::Pattern { .. })));
    }

    #[test]
    fn test_load_from_row_is_unchanged() {
        let row = Row::from_pairs([("age", Value::Int(40)), ("nick", Value::Null)]);
        let mut age = ValueCell::new().with_primary_key(true);
        age.set(1_i64).unwrap();
        age.load_from_row(&row, "age").unwrap();
        assert_eq!(age.value(), Some(&40));
        assert!(!age.has_changed());

        let mut nick: ValueCell<String> = ValueCell::with_value("x".into());
        nick.load_from_row(&row, "nick").unwrap();
        assert!(nick.is_null());
        assert!(!nick.has_changed());
    }

    #[test]
    fn test_set_unchanged_and_clear() {
        let mut cell = ValueCell::with_value(1_i64).with_primary_key(true);
        cell.set_primary_key(2).unwrap();
        cell.set_unchanged();
        assert!(!cell.has_changed());
        assert!(cell.previous_value().is_none());
        cell.clear();
        assert!(!cell.is_defined());
        assert!(cell.is_primary_key());
        assert_eq!(cell.arena_len(), 1);
    }

    #[test]
    fn test_arena_stays_bounded() {
        let mut cell = ValueCell::new();
        for i in 0..500_i64 {
            cell.set(i).unwrap();
        }
        assert!(cell.arena_len() <= COMPACT_THRESHOLD + 4);
        assert_eq!(cell.value(), Some(&499));
        assert_eq!(cell.previous_value().unwrap().value(), Some(&498));
    }

    #[test]
    fn test_repeated_constraints_stay_bounded() {
        let mut cell: ValueCell<i64> = ValueCell::new();
        for i in 0..200_i64 {
            cell.permitted_values([i, i + 1, i + 2]).unwrap();
        }
        assert!(cell.arena_len() <= COMPACT_THRESHOLD + 4);
        let Some(Operator::PermittedSet { members, .. }) = cell.operator() else {
            panic!("expected a set");
        };
        let values: Vec<i64> = members.iter().map(|m| *cell.node(*m).value().unwrap()).collect();
        assert_eq!(values, vec![199, 200, 201]);
    }

    #[test]
    fn test_copy_is_independent() {
        let mut cell = ValueCell::with_value(1_i64);
        let snapshot = cell.copy();
        cell.set(2).unwrap();
        assert_eq!(snapshot.value(), Some(&1));
        assert!(!snapshot.has_changed());
    }

    #[test]
    fn test_sort_order() {
        let mut cell: ValueCell<i64> = ValueCell::new();
        assert_eq!(cell.sort_order_sql(), "ASC");
        cell.set_sort_order(false);
        assert_eq!(cell.sort_order_sql(), "DESC");
    }
}
