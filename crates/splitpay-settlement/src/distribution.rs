//! Pro-rata distribution of an amount across basis-point shares.
//!
//! Rounding rule:
//! ```text
//! base_i    = floor(amount * bps_i / 10000)
//! remainder = amount - Σ base_i            (< number of nonzero shares)
//! one extra unit to each nonzero-share participant, in ledger order,
//! until the remainder is exhausted
//! ```
//! Σ credits == amount exactly: no value is lost or created.

use splitpay_types::{Amount, BasisPoints, Result, SplitError, constants::BPS_DENOMINATOR};

/// Floor of `total * bps / 10000`. Returns `None` on overflow.
#[must_use]
pub fn share_of(total: Amount, bps: BasisPoints) -> Option<Amount> {
    u128::from(total)
        .checked_mul(u128::from(bps))?
        .checked_div(u128::from(BPS_DENOMINATOR))?
        .try_into()
        .ok()
}

/// Sum of basis points. `u32` cannot overflow for ten `u16` shares.
#[must_use]
pub fn sum_bps(shares: &[BasisPoints]) -> u32 {
    shares.iter().map(|&bps| u32::from(bps)).sum()
}

/// Split `amount` across `shares` (ledger order).
///
/// # Errors
/// - `InvalidShares` if the shares do not total 10,000 bp
/// - `Internal` if the rounding bookkeeping does not close (unreachable for
///   valid shares)
pub fn allocate(amount: Amount, shares: &[BasisPoints]) -> Result<Vec<Amount>> {
    let total = sum_bps(shares);
    if total != u32::from(BPS_DENOMINATOR) {
        return Err(SplitError::InvalidShares { total });
    }

    let mut credits = shares
        .iter()
        .map(|&bps| share_of(amount, bps))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| SplitError::Internal(format!("share overflow for {amount}")))?;

    let floored: Amount = credits.iter().sum();
    let mut remainder = amount
        .checked_sub(floored)
        .ok_or_else(|| SplitError::Internal(format!("floored {floored} exceeds {amount}")))?;

    for (credit, &bps) in credits.iter_mut().zip(shares) {
        if remainder == 0 {
            break;
        }
        if bps > 0 {
            *credit += 1;
            remainder -= 1;
        }
    }

    if remainder != 0 {
        return Err(SplitError::Internal(format!(
            "{remainder} left undistributed from {amount}"
        )));
    }
    Ok(credits)
}
