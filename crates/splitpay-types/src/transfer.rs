//! Funds movement records.
//!
//! A [`Contribution`] is money that came into a split. A [`Transfer`] is
//! money the host must send out of it; the engine only queues transfers, the
//! host's value-transfer primitive executes them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, ContributionId, SplitId};

/// One accepted payment into a split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub id: ContributionId,
    pub payer: AccountId,
    pub amount: Amount,
    pub recorded_at: DateTime<Utc>,
}

/// Why funds leave a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferKind {
    /// Participant (or bill creator) withdrawing accrued funds.
    Withdrawal,
    /// Contribution returned to its payer on cancellation.
    Refund,
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Withdrawal => write!(f, "WITHDRAWAL"),
            Self::Refund => write!(f, "REFUND"),
        }
    }
}

/// An outgoing payment the host must execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub split_id: SplitId,
    pub recipient: AccountId,
    pub amount: Amount,
    pub kind: TransferKind,
}
