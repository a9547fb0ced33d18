//! Enum-backed cells.
//!
//! The database stores a scalar code; the application works with a closed
//! enumeration. An [`EnumCell`] keeps the code in an ordinary
//! [`ValueCell`] and maps it to the enum only when asked, so rows carrying
//! codes the program does not know about still load.

use std::fmt::Debug;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use sqlcell_core::{Error, Literal, Result, RowSource, Value};

use crate::cell::ValueCell;

/// A closed enumeration persisted as a scalar code.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Status { Active, Retired, Unknown }
///
/// impl DbEnum for Status {
///     type Code = i32;
///     fn variants() -> &'static [Self] { &[Status::Active, Status::Retired, Status::Unknown] }
///     fn code(&self) -> Option<i32> {
///         match self {
///             Status::Active => Some(1),
///             Status::Retired => Some(2),
///             Status::Unknown => None,
///         }
///     }
/// }
/// ```
pub trait DbEnum: Copy + PartialEq + Debug + 'static {
    /// Native type of the code.
    type Code: Literal;

    /// Every constant, in declaration order.
    fn variants() -> &'static [Self];

    /// The stored code; `None` means the constant persists as NULL.
    fn code(&self) -> Option<Self::Code>;
}

/// How a stored literal is compared with the declared codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CodeMatch {
    /// Numeric variants compare by value (`Int(1)` matches `BigInt(1)`).
    #[default]
    Widening,
    /// Codes must match variant for variant.
    Strict,
}

impl CodeMatch {
    /// Whether `stored` matches `code` under this policy.
    pub fn matches(self, stored: &Value, code: &Value) -> bool {
        match self {
            CodeMatch::Widening => stored.widening_eq(code),
            CodeMatch::Strict => stored == code,
        }
    }
}

/// A value cell whose literal is the code of an enum `E`.
///
/// `L` is the stored literal type. It defaults to `E::Code` but may be
/// wider, e.g. `i32` codes stored in a `BIGINT` column.
pub struct EnumCell<E: DbEnum, L = <E as DbEnum>::Code> {
    cell: ValueCell<L>,
    code_match: CodeMatch,
    _enum: PhantomData<fn() -> E>,
}

impl<E: DbEnum, L: Literal> Clone for EnumCell<E, L> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            code_match: self.code_match,
            _enum: PhantomData,
        }
    }
}

impl<E: DbEnum, L: Literal> Debug for EnumCell<E, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnumCell")
            .field("enum_type", &self.enum_type_name())
            .field("cell", &self.cell)
            .field("code_match", &self.code_match)
            .finish()
    }
}

impl<E: DbEnum, L: Literal> Default for EnumCell<E, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: DbEnum, L: Literal> EnumCell<E, L> {
    /// Create an undefined enum cell.
    pub fn new() -> Self {
        Self {
            cell: ValueCell::new(),
            code_match: CodeMatch::default(),
            _enum: PhantomData,
        }
    }

    /// Select the code comparison policy.
    pub fn with_code_match(mut self, code_match: CodeMatch) -> Self {
        self.code_match = code_match;
        self
    }

    pub fn code_match(&self) -> CodeMatch {
        self.code_match
    }

    /// Fully qualified name of `E`, used in diagnostics.
    pub fn enum_type_name(&self) -> &'static str {
        std::any::type_name::<E>()
    }

    pub fn cell(&self) -> &ValueCell<L> {
        &self.cell
    }

    pub fn cell_mut(&mut self) -> &mut ValueCell<L> {
        &mut self.cell
    }

    /// Store the constant's code, or NULL when it has none.
    pub fn set(&mut self, value: E) -> Result<()> {
        match Self::literal_for(value)? {
            Some(code) => self.cell.set(code),
            None => self.cell.set_null(),
        }
    }

    pub fn set_null(&mut self) -> Result<()> {
        self.cell.set_null()
    }

    /// Load the stored code from a row without interpreting it.
    pub fn load_from_row<R: RowSource + ?Sized>(&mut self, row: &R, column: &str) -> Result<()> {
        self.cell.load_from_row(row, column)
    }

    /// Map the stored code back to its constant.
    ///
    /// Returns `Ok(None)` when no literal is stored. A code that matches no
    /// declared constant is an [`Error::EnumMismatch`].
    pub fn as_enum(&self) -> Result<Option<E>> {
        let Some(stored) = self.cell.value() else {
            return Ok(None);
        };
        let stored = stored.to_value();
        let found = E::variants().iter().copied().find(|variant| {
            variant
                .code()
                .is_some_and(|code| self.code_match.matches(&stored, &code.to_value()))
        });
        match found {
            Some(variant) => Ok(Some(variant)),
            None => {
                tracing::warn!(
                    literal = %stored.describe(),
                    enum_type = self.enum_type_name(),
                    "Stored code matches no enum constant"
                );
                Err(Error::EnumMismatch {
                    literal: stored.describe(),
                    enum_type: self.enum_type_name(),
                })
            }
        }
    }

    /// Constrain to any of `values`. Constants without a code never match
    /// an `IN` list and are skipped.
    pub fn permitted_values<I: IntoIterator<Item = E>>(&mut self, values: I) -> Result<()> {
        let codes = Self::codes(values)?;
        self.cell.permitted_values(codes)
    }

    /// Constrain to none of `values`.
    pub fn excluded_values<I: IntoIterator<Item = E>>(&mut self, values: I) -> Result<()> {
        let codes = Self::codes(values)?;
        self.cell.excluded_values(codes)
    }

    fn codes<I: IntoIterator<Item = E>>(values: I) -> Result<Vec<L>> {
        let mut codes = Vec::new();
        for value in values {
            if let Some(code) = Self::literal_for(value)? {
                codes.push(code);
            }
        }
        Ok(codes)
    }

    /// The constant's code converted into the stored literal type.
    fn literal_for(value: E) -> Result<Option<L>> {
        value
            .code()
            .map(|code| L::from_value(&code.to_value()))
            .transpose()
    }
}
