//! The operator model: predicates bound to a cell.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a cell node inside one [`ValueCell`](crate::ValueCell) arena.
///
/// Two references to the same node compare equal; two nodes holding equal
/// values do not. Ids are valid until the next mutating call on the owning
/// cell (mutation may compact the arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub(crate) u32);

impl CellId {
    /// Position of the node in its arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A query predicate attached to a cell.
///
/// Embedded cells (bounds, members, templates) are referenced by [`CellId`]
/// and live in the same arena as the owning cell, so an operator may point
/// back at the cell that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    /// `column = bound`
    Equals { bound: CellId, negated: bool },
    /// `column IS NULL`
    IsNull { negated: bool },
    /// Open or closed interval; each bound has its own inclusivity.
    Range {
        lower: Option<CellId>,
        upper: Option<CellId>,
        lower_inclusive: bool,
        upper_inclusive: bool,
        negated: bool,
    },
    /// `column IN (members...)`
    PermittedSet { members: Vec<CellId>, negated: bool },
    /// `column LIKE template`
    Pattern { template: CellId, negated: bool },
}

impl Operator {
    /// Whether the predicate is inverted.
    #[must_use]
    pub const fn is_negated(&self) -> bool {
        match self {
            Operator::Equals { negated, .. }
            | Operator::IsNull { negated }
            | Operator::Range { negated, .. }
            | Operator::PermittedSet { negated, .. }
            | Operator::Pattern { negated, .. } => *negated,
        }
    }

    /// Flip the negation flag.
    pub fn negate(&mut self) {
        match self {
            Operator::Equals { negated, .. }
            | Operator::IsNull { negated }
            | Operator::Range { negated, .. }
            | Operator::PermittedSet { negated, .. }
            | Operator::Pattern { negated, .. } => *negated = !*negated,
        }
    }

    /// Return a copy with the negation flag flipped.
    #[must_use]
    pub fn negated(&self) -> Self {
        let mut op = self.clone();
        op.negate();
        op
    }

    /// Short name of the variant.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Operator::Equals { .. } => "equals",
            Operator::IsNull { .. } => "is_null",
            Operator::Range { .. } => "range",
            Operator::PermittedSet { .. } => "permitted_set",
            Operator::Pattern { .. } => "pattern",
        }
    }

    /// Every embedded cell, in declaration order. Duplicates are kept.
    #[must_use]
    pub fn embedded_cells(&self) -> Vec<CellId> {
        match self {
            Operator::Equals { bound, .. } => vec![*bound],
            Operator::IsNull { .. } => Vec::new(),
            Operator::Range { lower, upper, .. } => lower.iter().chain(upper.iter()).copied().collect(),
            Operator::PermittedSet { members, .. } => members.clone(),
            Operator::Pattern { template, .. } => vec![*template],
        }
    }

    /// Rebuild the same variant with every embedded cell mapped through `f`.
    ///
    /// Negation and inclusivity flags are preserved. Stops at the first error.
    pub fn try_map_cells<E, F>(&self, mut f: F) -> Result<Operator, E>
    where
        F: FnMut(CellId) -> Result<CellId, E>,
    {
        Ok(match self {
            Operator::Equals { bound, negated } => Operator::Equals {
                bound: f(*bound)?,
                negated: *negated,
            },
            Operator::IsNull { negated } => Operator::IsNull { negated: *negated },
            Operator::Range {
                lower,
                upper,
                lower_inclusive,
                upper_inclusive,
                negated,
            } => Operator::Range {
                lower: lower.map(&mut f).transpose()?,
                upper: upper.map(&mut f).transpose()?,
                lower_inclusive: *lower_inclusive,
                upper_inclusive: *upper_inclusive,
                negated: *negated,
            },
            Operator::PermittedSet { members, negated } => Operator::PermittedSet {
                members: members.iter().map(|m| f(*m)).collect::<Result<_, E>>()?,
                negated: *negated,
            },
            Operator::Pattern { template, negated } => Operator::Pattern {
                template: f(*template)?,
                negated: *negated,
            },
        })
    }
}

/// Named inclusivity policies for range helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RangePolicy {
    /// Lower bound inclusive, upper bound exclusive (`[lo, hi)`).
    #[default]
    HalfOpen,
    /// Both bounds inclusive (`[lo, hi]`).
    Inclusive,
    /// Both bounds exclusive (`(lo, hi)`).
    Exclusive,
}

impl RangePolicy {
    /// `(lower_inclusive, upper_inclusive)` for this policy.
    #[must_use]
    pub const fn inclusivity(self) -> (bool, bool) {
        match self {
            RangePolicy::HalfOpen => (true, false),
            RangePolicy::Inclusive => (true, true),
            RangePolicy::Exclusive => (false, false),
        }
    }
}
