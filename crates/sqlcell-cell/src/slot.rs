//! Literal value slot: the raw value plus definedness bookkeeping.

use crate::operator::CellId;

/// The raw value of a cell node and its definedness, null and change flags.
///
/// Three states are distinguished: undefined (`defined == false`), null
/// (`is_null == true`, no value) and holding data. A defined slot without a
/// value and without the null flag belongs to a cell that carries a
/// constraint rather than a concrete value.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralSlot<T> {
    pub(crate) value: Option<T>,
    pub(crate) defined: bool,
    pub(crate) is_null: bool,
    pub(crate) changed: bool,
    /// Snapshot node of the state before the last change.
    pub(crate) previous: Option<CellId>,
}

impl<T> LiteralSlot<T> {
    pub(crate) const fn undefined() -> Self {
        Self {
            value: None,
            defined: false,
            is_null: false,
            changed: false,
            previous: None,
        }
    }

    /// The literal, unless the slot is null.
    pub(crate) fn value(&self) -> Option<&T> {
        if self.is_null {
            None
        } else {
            self.value.as_ref()
        }
    }

    pub(crate) fn reads_as_null(&self) -> bool {
        self.is_null || (self.defined && self.value.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_states() {
        let undefined: LiteralSlot<i64> = LiteralSlot::undefined();
        assert!(!undefined.reads_as_null());

        let mut null = LiteralSlot::<i64>::undefined();
        null.defined = true;
        null.is_null = true;
        assert!(null.reads_as_null());
        assert!(null.value().is_none());

        let mut data = LiteralSlot::undefined();
        data.defined = true;
        data.value = Some(3_i64);
        assert!(!data.reads_as_null());
        assert_eq!(data.value(), Some(&3));
    }
}
