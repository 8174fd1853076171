//! Error types for the SplitPay settlement engine.
//!
//! All errors use the `SP_ERR_` prefix convention for easy grepping in logs.
//! Codes 100-199 are the settlement errors a caller can trigger; they keep
//! the numeric values of the on-chain contract where one existed so hosts can
//! map them one to one. 9xx are internal errors.

use thiserror::Error;

use crate::{AccountId, Amount, SplitId};

/// Central error enum for all SplitPay operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    // =================================================================
    // Settlement Errors (1xx)
    // =================================================================
    /// Caller is not the principal the operation requires.
    #[error("SP_ERR_100: Unauthorized: {caller} is not the creator of {split_id}")]
    Unauthorized { caller: AccountId, split_id: SplitId },

    /// Shares of a SharePercent split do not total 10,000 bp.
    #[error("SP_ERR_101: Invalid shares: total {total} bp, expected 10000 bp")]
    InvalidShares { total: u32 },

    /// No split with this identifier exists.
    #[error("SP_ERR_102: Split not found: {0}")]
    SplitNotFound(SplitId),

    /// Amount is zero or the amounts overflow.
    #[error("SP_ERR_103: Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// The split is paused or cancelled.
    #[error("SP_ERR_104: Split inactive: {0}")]
    SplitInactive(SplitId),

    /// Participant list is empty, too long, or contains duplicates.
    #[error("SP_ERR_105: Invalid recipient list: {reason}")]
    InvalidRecipient { reason: String },

    /// The caller has no accrued balance on the split.
    #[error("SP_ERR_106: Nothing to withdraw for {caller} on {split_id}")]
    NothingToWithdraw { caller: AccountId, split_id: SplitId },

    /// A FixedAmount payment did not match the payer's obligation.
    #[error("SP_ERR_107: Amount mismatch: expected {expected}, got {actual}")]
    AmountMismatch { expected: Amount, actual: Amount },

    /// Caller is not one of the payers of a FixedAmount split.
    #[error("SP_ERR_108: {caller} is not a payer of {split_id}")]
    NotAPayer { caller: AccountId, split_id: SplitId },

    /// The payer has already settled their obligation.
    #[error("SP_ERR_109: {caller} has already paid {split_id}")]
    AlreadyPaid { caller: AccountId, split_id: SplitId },

    /// Withdrawal from a FixedAmount split before every payer has paid.
    #[error("SP_ERR_110: Split not complete: {0}")]
    SplitNotComplete(SplitId),

    /// The split is complete or cancelled (terminal state).
    #[error("SP_ERR_111: Split already finalized: {0}")]
    AlreadyFinalized(SplitId),

    /// Split name is empty or too long.
    #[error("SP_ERR_112: Invalid split name: {reason}")]
    InvalidName { reason: String },

    /// Funds have already left the split, so a full refund is impossible.
    #[error("SP_ERR_113: Funds already released from {split_id}: {withdrawn} withdrawn")]
    FundsAlreadyReleased { split_id: SplitId, withdrawn: Amount },

    /// Operation does not apply to the split's mode.
    #[error("SP_ERR_114: Invalid mode for {split_id}: {reason}")]
    InvalidMode { split_id: SplitId, reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Supply conservation invariant violated. Indicates an engine bug.
    #[error("SP_ERR_900: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    /// Serialization / deserialization error.
    #[error("SP_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, out-of-range limits, etc.).
    #[error("SP_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// Unrecoverable internal error.
    #[error("SP_ERR_903: Internal error: {0}")]
    Internal(String),
}

impl SplitError {
    /// Numeric error code, the `NNN` of the `SP_ERR_NNN` prefix.
    #[must_use]
    pub fn code(&self) -> u32 {
        match self {
            Self::Unauthorized { .. } => 100,
            Self::InvalidShares { .. } => 101,
            Self::SplitNotFound(_) => 102,
            Self::InvalidAmount { .. } => 103,
            Self::SplitInactive(_) => 104,
            Self::InvalidRecipient { .. } => 105,
            Self::NothingToWithdraw { .. } => 106,
            Self::AmountMismatch { .. } => 107,
            Self::NotAPayer { .. } => 108,
            Self::AlreadyPaid { .. } => 109,
            Self::SplitNotComplete(_) => 110,
            Self::AlreadyFinalized(_) => 111,
            Self::InvalidName { .. } => 112,
            Self::FundsAlreadyReleased { .. } => 113,
            Self::InvalidMode { .. } => 114,
            Self::SupplyInvariantViolation { .. } => 900,
            Self::Serialization(_) => 901,
            Self::Configuration(_) => 902,
            Self::Internal(_) => 903,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SplitError>;

impl From<serde_json::Error> for SplitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
