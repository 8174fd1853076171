//! Supply conservation invariant checker.
//!
//! Invariant enforced before every commit, per split:
//! ```text
//! inflows - outflows == Σ withdrawable + pending_pool + creator_claim
//! paid_amount        <= received_amount
//! ```
//! where `creator_claim` is the collected-but-unwithdrawn total of a live
//! FixedAmount split. The tracker keeps its own tally of money in and out,
//! independent of the record's counters, so a bookkeeping slip in the engine
//! surfaces here instead of in a payout.

use std::collections::HashMap;

use splitpay_types::{Amount, Result, SplitError, SplitId, SplitMode, SplitRecord};

/// Per-split tally of money that entered and left the engine.
pub struct SupplyConservation {
    /// Total accepted payments per split.
    inflows: HashMap<SplitId, Amount>,
    /// Total withdrawals and refunds per split.
    outflows: HashMap<SplitId, Amount>,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inflows: HashMap::new(),
            outflows: HashMap::new(),
        }
    }

    pub fn record_inflow(&mut self, split_id: SplitId, amount: Amount) {
        *self.inflows.entry(split_id).or_insert(0) += amount;
    }

    pub fn record_outflow(&mut self, split_id: SplitId, amount: Amount) {
        *self.outflows.entry(split_id).or_insert(0) += amount;
    }

    #[must_use]
    pub fn total_inflow(&self, split_id: SplitId) -> Amount {
        self.inflows.get(&split_id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_outflow(&self, split_id: SplitId) -> Amount {
        self.outflows.get(&split_id).copied().unwrap_or(0)
    }

    /// Funds the split should be holding once `inflow`/`outflow` are applied.
    #[must_use]
    pub fn expected_held(&self, split_id: SplitId, inflow: Amount, outflow: Amount) -> Option<Amount> {
        self.total_inflow(split_id)
            .checked_add(inflow)?
            .checked_sub(self.total_outflow(split_id).checked_add(outflow)?)
    }

    /// Verify a staged record against the tally plus the pending movement.
    ///
    /// # Errors
    /// Returns [`SplitError::SupplyInvariantViolation`] if the record's
    /// balances do not account for exactly the funds held.
    pub fn verify(&self, record: &SplitRecord, inflow: Amount, outflow: Amount) -> Result<()> {
        let expected = self
            .expected_held(record.id, inflow, outflow)
            .ok_or_else(|| SplitError::SupplyInvariantViolation {
                reason: format!("{}: outflows exceed inflows", record.id),
            })?;

        let creator_claim = match record.mode {
            SplitMode::FixedAmount if !record.is_cancelled => record.collected_unwithdrawn(),
            _ => 0,
        };
        let accounted = record
            .credited_balances()
            .checked_add(record.pending_pool)
            .and_then(|sum| sum.checked_add(creator_claim));

        if accounted != Some(expected) || record.held_amount() != expected {
            return Err(SplitError::SupplyInvariantViolation {
                reason: format!(
                    "{}: held {} != expected {expected} (balances={}, pool={}, claim={creator_claim})",
                    record.id,
                    record.held_amount(),
                    record.credited_balances(),
                    record.pending_pool,
                ),
            });
        }
        if record.paid_amount > record.received_amount {
            return Err(SplitError::SupplyInvariantViolation {
                reason: format!(
                    "{}: distributed {} exceeds received {}",
                    record.id, record.paid_amount, record.received_amount
                ),
            });
        }
        Ok(())
    }
}

impl Default for SupplyConservation {
    fn default() -> Self {
        Self::new()
    }
}
