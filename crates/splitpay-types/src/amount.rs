//! Amount and share primitives.
//!
//! Amounts are integer micro-units of the underlying currency. Shares are
//! integer basis points where 10,000 = 100%. Decimal conversion exists only
//! for presentation at the boundary.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::constants::{MICRO_UNITS_PER_UNIT, UNIT_DECIMALS};

/// Integer amount in micro-units.
pub type Amount = u64;

/// Share of a split in basis points (0..=10,000).
pub type BasisPoints = u16;

/// Render micro-units as whole currency units (e.g. `1_500_000` → `1.5`).
#[must_use]
pub fn to_units(amount: Amount) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(amount), UNIT_DECIMALS).normalize()
}

/// Convert whole currency units into micro-units, truncating anything finer
/// than one micro-unit. Returns `None` for negative or out-of-range values.
#[must_use]
pub fn from_units(units: Decimal) -> Option<Amount> {
    if units.is_sign_negative() {
        return None;
    }
    let micro = units.checked_mul(Decimal::from(MICRO_UNITS_PER_UNIT))?.trunc();
    micro.to_u64()
}
