//! Split model types.
//!
//! A split is an agreement among an ordered, bounded set of participants.
//! Participants hold either a percentage share (SharePercent mode) or a fixed
//! obligation (FixedAmount mode); the two shapes are one tagged
//! [`Allotment`] rather than two parallel structures.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, BasisPoints, Contribution, SplitId};

/// How incoming funds are divided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitMode {
    /// Participants own basis-point shares; each payment is divided pro-rata.
    SharePercent,
    /// Each participant owes a fixed amount; the split completes when all pay.
    FixedAmount,
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SharePercent => write!(f, "SHARE_PERCENT"),
            Self::FixedAmount => write!(f, "FIXED_AMOUNT"),
        }
    }
}

/// Lifecycle state derived from a record's flags.
///
/// ```text
/// Active ⇄ Paused
/// Active → Complete   (FixedAmount, every payer paid)
/// Active → Cancelled  (creator cancels, contributions refunded)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitStatus {
    /// Accepting payments.
    Active,
    /// Deactivated by the creator; can be reactivated.
    Paused,
    /// Fully paid. Terminal for payments, withdrawals still allowed.
    Complete,
    /// Cancelled and refunded. Terminal.
    Cancelled,
}

impl SplitStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Cancelled)
    }
}

impl fmt::Display for SplitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Paused => write!(f, "PAUSED"),
            Self::Complete => write!(f, "COMPLETE"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Participant
// ---------------------------------------------------------------------------

/// What a participant is entitled to (share) or owes (fixed amount).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Allotment {
    /// Pro-rata share in basis points.
    Share { bps: BasisPoints },
    /// Exact obligation in micro-units.
    Fixed { amount: Amount },
}

impl Allotment {
    #[must_use]
    pub fn mode(&self) -> SplitMode {
        match self {
            Self::Share { .. } => SplitMode::SharePercent,
            Self::Fixed { .. } => SplitMode::FixedAmount,
        }
    }

    #[must_use]
    pub fn share_bps(&self) -> Option<BasisPoints> {
        match self {
            Self::Share { bps } => Some(*bps),
            Self::Fixed { .. } => None,
        }
    }

    #[must_use]
    pub fn obligation(&self) -> Option<Amount> {
        match self {
            Self::Fixed { amount } => Some(*amount),
            Self::Share { .. } => None,
        }
    }
}

/// One entry of a split's participant ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Recipient (SharePercent) or payer (FixedAmount).
    pub account: AccountId,
    /// Share or obligation.
    pub allotment: Allotment,
    /// FixedAmount: whether the obligation has been paid.
    pub paid: bool,
    /// Credited but not yet withdrawn.
    pub withdrawable: Amount,
}

impl Participant {
    #[must_use]
    pub fn new(account: AccountId, allotment: Allotment) -> Self {
        Self {
            account,
            allotment,
            paid: false,
            withdrawable: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// SplitTerms: creation input
// ---------------------------------------------------------------------------

/// A recipient and their share, as supplied at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareInput {
    pub account: AccountId,
    pub bps: BasisPoints,
}

/// A payer and their obligation, as supplied at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObligationInput {
    pub account: AccountId,
    pub amount: Amount,
}

/// Terms of a new split. The mode is implied by the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitTerms {
    SharePercent {
        recipients: Vec<ShareInput>,
        auto_distribute: bool,
    },
    FixedAmount {
        payers: Vec<ObligationInput>,
    },
}

impl SplitTerms {
    #[must_use]
    pub fn mode(&self) -> SplitMode {
        match self {
            Self::SharePercent { .. } => SplitMode::SharePercent,
            Self::FixedAmount { .. } => SplitMode::FixedAmount,
        }
    }

    /// Number of participants.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::SharePercent { recipients, .. } => recipients.len(),
            Self::FixedAmount { payers } => payers.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Participant accounts in listed order.
    #[must_use]
    pub fn accounts(&self) -> Vec<&AccountId> {
        match self {
            Self::SharePercent { recipients, .. } => recipients.iter().map(|r| &r.account).collect(),
            Self::FixedAmount { payers } => payers.iter().map(|p| &p.account).collect(),
        }
    }

    fn into_participants(self) -> (Vec<Participant>, bool) {
        match self {
            Self::SharePercent {
                recipients,
                auto_distribute,
            } => (
                recipients
                    .into_iter()
                    .map(|r| Participant::new(r.account, Allotment::Share { bps: r.bps }))
                    .collect(),
                auto_distribute,
            ),
            Self::FixedAmount { payers } => (
                payers
                    .into_iter()
                    .map(|p| Participant::new(p.account, Allotment::Fixed { amount: p.amount }))
                    .collect(),
                false,
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// SplitRecord
// ---------------------------------------------------------------------------

/// One split: identity, mode, running totals, lifecycle flags, and its
/// participant ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRecord {
    pub id: SplitId,
    pub name: String,
    pub creator: AccountId,
    pub mode: SplitMode,
    /// FixedAmount: sum of all obligations. `None` in SharePercent mode.
    pub target_total: Option<Amount>,
    /// Every accepted payment, cumulative.
    pub received_amount: Amount,
    /// FixedAmount: obligations settled. SharePercent: amount credited to
    /// participant balances (auto-distribution or pool materialisation).
    pub paid_amount: Amount,
    /// Payments waiting in the accumulate-mode pool.
    pub pending_pool: Amount,
    /// Paid out through withdrawals.
    pub withdrawn_amount: Amount,
    /// Returned to payers on cancellation.
    pub refunded_amount: Amount,
    pub is_active: bool,
    pub is_complete: bool,
    pub is_cancelled: bool,
    /// SharePercent only; always false in FixedAmount mode.
    pub auto_distribute: bool,
    /// Ordered participant ledger (1..=10 entries).
    pub participants: Vec<Participant>,
    /// Every accepted payment, in arrival order.
    pub contributions: Vec<Contribution>,
    pub created_at: DateTime<Utc>,
}

impl SplitRecord {
    /// Build a fresh, active record. Terms must already be validated.
    #[must_use]
    pub fn new(id: SplitId, name: String, creator: AccountId, terms: SplitTerms) -> Self {
        let mode = terms.mode();
        let (participants, auto_distribute) = terms.into_participants();
        let target_total = match mode {
            SplitMode::FixedAmount => Some(
                participants
                    .iter()
                    .filter_map(|p| p.allotment.obligation())
                    .sum(),
            ),
            SplitMode::SharePercent => None,
        };
        Self {
            id,
            name,
            creator,
            mode,
            target_total,
            received_amount: 0,
            paid_amount: 0,
            pending_pool: 0,
            withdrawn_amount: 0,
            refunded_amount: 0,
            is_active: true,
            is_complete: false,
            is_cancelled: false,
            auto_distribute,
            participants,
            contributions: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn status(&self) -> SplitStatus {
        if self.is_cancelled {
            SplitStatus::Cancelled
        } else if self.is_complete {
            SplitStatus::Complete
        } else if self.is_active {
            SplitStatus::Active
        } else {
            SplitStatus::Paused
        }
    }

    #[must_use]
    pub fn accepts_payments(&self) -> bool {
        self.status() == SplitStatus::Active
    }

    #[must_use]
    pub fn is_creator(&self, account: &AccountId) -> bool {
        self.creator == *account
    }

    #[must_use]
    pub fn participant(&self, index: usize) -> Option<&Participant> {
        self.participants.get(index)
    }

    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Ledger position of an account, if it participates.
    #[must_use]
    pub fn position(&self, account: &AccountId) -> Option<usize> {
        self.participants.iter().position(|p| p.account == *account)
    }

    /// Shares in ledger order (zero for fixed-obligation entries).
    #[must_use]
    pub fn shares(&self) -> Vec<BasisPoints> {
        self.participants
            .iter()
            .map(|p| p.allotment.share_bps().unwrap_or(0))
            .collect()
    }

    /// Σ participant withdrawable balances.
    #[must_use]
    pub fn credited_balances(&self) -> Amount {
        self.participants.iter().map(|p| p.withdrawable).sum()
    }

    /// Funds the split still holds on behalf of someone.
    #[must_use]
    pub fn held_amount(&self) -> Amount {
        self.received_amount
            .saturating_sub(self.withdrawn_amount)
            .saturating_sub(self.refunded_amount)
    }

    /// FixedAmount: whether every payer has paid.
    #[must_use]
    pub fn all_paid(&self) -> bool {
        self.participants.iter().all(|p| p.paid)
    }

    /// FixedAmount: collected funds the creator has not withdrawn yet.
    #[must_use]
    pub fn collected_unwithdrawn(&self) -> Amount {
        self.paid_amount.saturating_sub(self.withdrawn_amount)
    }

    /// Contributions summed per payer, in order of each payer's first payment.
    #[must_use]
    pub fn contributions_by_payer(&self) -> Vec<(AccountId, Amount)> {
        let mut totals: Vec<(AccountId, Amount)> = Vec::new();
        for c in &self.contributions {
            match totals.iter_mut().find(|(payer, _)| *payer == c.payer) {
                Some((_, total)) => *total += c.amount,
                None => totals.push((c.payer.clone(), c.amount)),
            }
        }
        totals
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl SplitTerms {
    pub fn dummy_shares(recipients: &[(&str, BasisPoints)], auto_distribute: bool) -> Self {
        Self::SharePercent {
            recipients: recipients
                .iter()
                .map(|(account, bps)| ShareInput {
                    account: AccountId::new(*account),
                    bps: *bps,
                })
                .collect(),
            auto_distribute,
        }
    }

    pub fn dummy_bill(payers: &[(&str, Amount)]) -> Self {
        Self::FixedAmount {
            payers: payers
                .iter()
                .map(|(account, amount)| ObligationInput {
                    account: AccountId::new(*account),
                    amount: *amount,
                })
                .collect(),
        }
    }
}
