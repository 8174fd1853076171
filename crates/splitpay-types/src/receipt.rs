//! Receipt types for the SplitPay audit trail.
//!
//! Every successful mutating operation produces a [`Receipt`]. Receipts are
//! hash-chained: each one commits to its payload and to the previous
//! receipt's hash, so the trail can be verified end to end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, SplitId};

/// The type of action this receipt proves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceiptType {
    /// A split was created.
    SplitCreated,
    /// A payment was accepted.
    PaymentRecorded,
    /// A FixedAmount split became fully paid.
    SplitCompleted,
    /// Funds were paid out to a participant or creator.
    Withdrawal,
    /// A split was cancelled and its contributions refunded.
    SplitCancelled,
    /// The creator paused or resumed a split.
    StatusToggled,
    /// The creator switched between auto-distribute and accumulate.
    AutoDistributeToggled,
}

impl std::fmt::Display for ReceiptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SplitCreated => write!(f, "SPLIT_CREATED"),
            Self::PaymentRecorded => write!(f, "PAYMENT_RECORDED"),
            Self::SplitCompleted => write!(f, "SPLIT_COMPLETED"),
            Self::Withdrawal => write!(f, "WITHDRAWAL"),
            Self::SplitCancelled => write!(f, "SPLIT_CANCELLED"),
            Self::StatusToggled => write!(f, "STATUS_TOGGLED"),
            Self::AutoDistributeToggled => write!(f, "AUTO_DISTRIBUTE_TOGGLED"),
        }
    }
}

/// A hash-chained receipt proving that an action occurred.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    /// Position in the journal, starting at 0.
    pub sequence: u64,
    /// What kind of action this receipt proves.
    pub receipt_type: ReceiptType,
    /// The split the action touched.
    pub split_id: SplitId,
    /// The caller that performed the action.
    pub actor: AccountId,
    /// JSON-encoded details of the action.
    pub payload: Vec<u8>,
    /// SHA-256 over the previous hash, the header fields, and the payload.
    pub hash: [u8; 32],
    /// Hash of the preceding receipt (all zeroes for the first one).
    pub prev_hash: [u8; 32],
    /// When this receipt was issued.
    pub issued_at: DateTime<Utc>,
}

impl Receipt {
    /// Hex form of the receipt hash, for logs and display.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Decode the JSON payload.
    pub fn payload_json(&self) -> crate::Result<serde_json::Value> {
        Ok(serde_json::from_slice(&self.payload)?)
    }
}
