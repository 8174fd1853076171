//! Outgoing transfer queue.
//!
//! The engine never moves funds itself. Withdrawals and refunds are queued
//! here in commit order; the host drains the queue and executes each
//! transfer with its own value-transfer primitive.

use splitpay_types::{Amount, Transfer};

/// FIFO queue of transfers awaiting execution by the host.
pub struct TransferOutbox {
    /// Transfers in commit order.
    queued: Vec<Transfer>,
}

impl TransferOutbox {
    #[must_use]
    pub fn new() -> Self {
        Self { queued: Vec::new() }
    }

    pub fn push(&mut self, transfer: Transfer) {
        self.queued.push(transfer);
    }

    pub fn extend(&mut self, transfers: impl IntoIterator<Item = Transfer>) {
        self.queued.extend(transfers);
    }

    /// Transfers not yet drained.
    #[must_use]
    pub fn pending(&self) -> &[Transfer] {
        &self.queued
    }

    /// Take every queued transfer, leaving the outbox empty.
    pub fn drain(&mut self) -> Vec<Transfer> {
        std::mem::take(&mut self.queued)
    }

    /// Sum of queued amounts.
    #[must_use]
    pub fn pending_total(&self) -> Amount {
        self.queued.iter().map(|t| t.amount).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queued.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }
}

impl Default for TransferOutbox {
    fn default() -> Self {
        Self::new()
    }
}
