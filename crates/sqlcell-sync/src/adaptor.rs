//! One-way type adaptors between an external and an internal literal type.
//!
//! Adaptors only ever see present values: a null cell converts to a null
//! cell without consulting the adaptor, and an adaptor cannot turn a value
//! into null or back.

use std::fmt;
use std::marker::PhantomData;

use sqlcell_cell::{CodeMatch, DbEnum};
use sqlcell_core::{CellValue, Literal};

/// A pair of pure conversions between two literal types.
pub trait TypeAdaptor {
    /// The user-facing declared type.
    type External: CellValue;
    /// The database-native type.
    type Internal: CellValue;

    /// Convert an external value into its internal form.
    fn to_internal(&self, value: &Self::External) -> Result<Self::Internal, String>;

    /// Convert an internal value into its external form.
    fn to_external(&self, value: &Self::Internal) -> Result<Self::External, String>;
}

impl<A: TypeAdaptor + ?Sized> TypeAdaptor for &A {
    type External = A::External;
    type Internal = A::Internal;

    fn to_internal(&self, value: &Self::External) -> Result<Self::Internal, String> {
        (**self).to_internal(value)
    }

    fn to_external(&self, value: &Self::Internal) -> Result<Self::External, String> {
        (**self).to_external(value)
    }
}

// ============================================================================
// FnAdaptor
// ============================================================================

/// An adaptor built from two closures.
pub struct FnAdaptor<X, I, F, G> {
    to_internal: F,
    to_external: G,
    _types: PhantomData<fn(X) -> I>,
}

impl<X, I, F, G> FnAdaptor<X, I, F, G>
where
    F: Fn(&X) -> Result<I, String>,
    G: Fn(&I) -> Result<X, String>,
{
    pub fn new(to_internal: F, to_external: G) -> Self {
        Self {
            to_internal,
            to_external,
            _types: PhantomData,
        }
    }
}

impl<X, I, F, G> fmt::Debug for FnAdaptor<X, I, F, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAdaptor")
            .field("external", &std::any::type_name::<X>())
            .field("internal", &std::any::type_name::<I>())
            .finish_non_exhaustive()
    }
}

impl<X, I, F, G> TypeAdaptor for FnAdaptor<X, I, F, G>
where
    X: CellValue,
    I: CellValue,
    F: Fn(&X) -> Result<I, String>,
    G: Fn(&I) -> Result<X, String>,
{
    type External = X;
    type Internal = I;

    fn to_internal(&self, value: &X) -> Result<I, String> {
        (self.to_internal)(value)
    }

    fn to_external(&self, value: &I) -> Result<X, String> {
        (self.to_external)(value)
    }
}

// ============================================================================
// IdentityAdaptor
// ============================================================================

/// Passes values through unchanged.
pub struct IdentityAdaptor<T>(PhantomData<fn() -> T>);

impl<T> IdentityAdaptor<T> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for IdentityAdaptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for IdentityAdaptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityAdaptor<{}>", std::any::type_name::<T>())
    }
}

impl<T: CellValue> TypeAdaptor for IdentityAdaptor<T> {
    type External = T;
    type Internal = T;

    fn to_internal(&self, value: &T) -> Result<T, String> {
        Ok(value.clone())
    }

    fn to_external(&self, value: &T) -> Result<T, String> {
        Ok(value.clone())
    }
}

// ============================================================================
// EnumAdaptor
// ============================================================================

/// Maps enum constants to their database codes and back.
///
/// A constant without a code cannot be converted: the adaptor would have to
/// produce null, and adaptors never change nullability. Store such
/// constants with an [`EnumCell`](sqlcell_cell::EnumCell) instead.
pub struct EnumAdaptor<E: DbEnum, L = <E as DbEnum>::Code> {
    code_match: CodeMatch,
    _types: PhantomData<fn(E) -> L>,
}

impl<E: DbEnum, L: Literal> EnumAdaptor<E, L> {
    pub const fn new() -> Self {
        Self {
            code_match: CodeMatch::Widening,
            _types: PhantomData,
        }
    }

    pub fn with_code_match(mut self, code_match: CodeMatch) -> Self {
        self.code_match = code_match;
        self
    }
}

impl<E: DbEnum, L: Literal> Default for EnumAdaptor<E, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: DbEnum, L: Literal> fmt::Debug for EnumAdaptor<E, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumAdaptor")
            .field("enum_type", &std::any::type_name::<E>())
            .field("code_match", &self.code_match)
            .finish()
    }
}

impl<E: DbEnum, L: Literal> TypeAdaptor for EnumAdaptor<E, L> {
    type External = E;
    type Internal = L;

    fn to_internal(&self, value: &E) -> Result<L, String> {
        let code = value
            .code()
            .ok_or_else(|| format!("{value:?} has no database code"))?;
        L::from_value(&code.to_value()).map_err(|e| e.to_string())
    }

    fn to_external(&self, value: &L) -> Result<E, String> {
        let stored = value.to_value();
        E::variants()
            .iter()
            .copied()
            .find(|variant| {
                variant
                    .code()
                    .is_some_and(|code| self.code_match.matches(&stored, &code.to_value()))
            })
            .ok_or_else(|| {
                format!(
                    "{} does not match any constant of {}",
                    stored.describe(),
                    std::any::type_name::<E>()
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Color {
        Red,
        Green,
        Unset,
    }

    impl DbEnum for Color {
        type Code = String;

        fn variants() -> &'static [Self] {
            &[Color::Red, Color::Green, Color::Unset]
        }

        fn code(&self) -> Option<String> {
            match self {
                Color::Red => Some("R".to_string()),
                Color::Green => Some("G".to_string()),
                Color::Unset => None,
            }
        }
    }

    #[test]
    fn test_fn_adaptor() {
        let adaptor = FnAdaptor::new(
            |v: &u8| Ok(i32::from(*v)),
            |v: &i32| u8::try_from(*v).map_err(|e| e.to_string()),
        );
        assert_eq!(adaptor.to_internal(&7), Ok(7));
        assert_eq!(adaptor.to_external(&7), Ok(7));
        assert!(adaptor.to_external(&300).is_err());
    }

    #[test]
    fn test_identity_adaptor() {
        let adaptor = IdentityAdaptor::<String>::new();
        assert_eq!(adaptor.to_internal(&"x".to_string()), Ok("x".to_string()));
    }

    #[test]
    fn test_enum_adaptor() {
        let adaptor = EnumAdaptor::<Color>::new();
        assert_eq!(adaptor.to_internal(&Color::Green), Ok("G".to_string()));
        assert_eq!(adaptor.to_external(&"R".to_string()), Ok(Color::Red));
        assert!(adaptor.to_internal(&Color::Unset).is_err());
        let err = adaptor.to_external(&"Z".to_string()).unwrap_err();
        assert!(err.contains("does not match"));
    }
}
