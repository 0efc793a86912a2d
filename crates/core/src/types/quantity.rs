//! Requested-quantity newtype with the "never below one" invariant.

use serde::{Deserialize, Serialize};

/// A requested quantity for a line item or sub-item allocation.
///
/// The invariant is that a quantity is always `>= 1`: the quantity inputs in
/// the UI accept anything, and whatever arrives (zero, negative, garbage
/// parsed to a sentinel) is clamped rather than rejected. Deserialization
/// clamps too, so a `Quantity` read from a form or a fixture can never hold
/// an invalid value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "i64", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// The minimum (and default) quantity.
    pub const ONE: Self = Self(1);

    /// Clamp raw user input to a valid quantity.
    ///
    /// Values below 1 become 1; values above `u32::MAX` saturate.
    #[must_use]
    pub fn clamp(raw: i64) -> Self {
        if raw < 1 {
            Self::ONE
        } else {
            Self(u32::try_from(raw).unwrap_or(u32::MAX))
        }
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Add two quantities, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Multiply two quantities, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_mul(self, factor: Self) -> Self {
        Self(self.0.saturating_mul(factor.0))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Quantity {
    fn from(raw: i64) -> Self {
        Self::clamp(raw)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clamp_floors_at_one() {
        assert_eq!(Quantity::clamp(0).get(), 1);
        assert_eq!(Quantity::clamp(-5).get(), 1);
        assert_eq!(Quantity::clamp(1).get(), 1);
        assert_eq!(Quantity::clamp(37).get(), 37);
    }

    #[test]
    fn clamp_saturates_above_u32() {
        assert_eq!(Quantity::clamp(i64::MAX).get(), u32::MAX);
    }

    #[test]
    fn saturating_mul_scales() {
        let base = Quantity::clamp(14);
        assert_eq!(base.saturating_mul(Quantity::clamp(3)).get(), 42);
    }

    #[test]
    fn deserialization_clamps() {
        let quantity: Quantity = serde_json::from_str("-3").unwrap();
        assert_eq!(quantity.get(), 1);

        let quantity: Quantity = serde_json::from_str("6").unwrap();
        assert_eq!(quantity.get(), 6);
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&Quantity::clamp(14)).unwrap();
        assert_eq!(json, "14");
    }
}
