//! Hash-chained receipt journal.
//!
//! Each receipt hash commits to:
//! - the previous receipt's hash (zeroes for the first)
//! - sequence number, receipt type, split id, actor
//! - issue timestamp (microseconds)
//! - the JSON payload
//!
//! Rewriting or dropping any receipt breaks every hash after it.

use chrono::Utc;
use sha2::{Digest, Sha256};
use splitpay_types::{AccountId, Receipt, ReceiptType, SplitId, constants};

/// Append-only audit trail of settlement actions.
pub struct ReceiptJournal {
    receipts: Vec<Receipt>,
}

impl ReceiptJournal {
    #[must_use]
    pub fn new() -> Self {
        Self {
            receipts: Vec::new(),
        }
    }

    /// Append a receipt and return it.
    pub fn append(
        &mut self,
        receipt_type: ReceiptType,
        split_id: SplitId,
        actor: &AccountId,
        payload: &serde_json::Value,
    ) -> &Receipt {
        let mut receipt = Receipt {
            sequence: self.receipts.len() as u64,
            receipt_type,
            split_id,
            actor: actor.clone(),
            payload: payload.to_string().into_bytes(),
            hash: [0u8; 32],
            prev_hash: self.last_hash(),
            issued_at: Utc::now(),
        };
        receipt.hash = Self::compute_hash(&receipt);

        tracing::debug!(
            seq = receipt.sequence,
            kind = %receipt.receipt_type,
            split = %split_id,
            hash = %receipt.hash_hex(),
            "Receipt appended"
        );

        self.receipts.push(receipt);
        &self.receipts[self.receipts.len() - 1]
    }

    /// Hash of the newest receipt, or zeroes when empty.
    #[must_use]
    pub fn last_hash(&self) -> [u8; 32] {
        self.receipts.last().map_or([0u8; 32], |r| r.hash)
    }

    #[must_use]
    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// Receipts touching one split, in journal order.
    pub fn for_split(&self, split_id: SplitId) -> impl Iterator<Item = &Receipt> {
        self.receipts.iter().filter(move |r| r.split_id == split_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    /// Recompute every hash and link. Returns the first broken sequence
    /// number, or `None` if the chain is intact.
    #[must_use]
    pub fn first_broken_link(&self) -> Option<u64> {
        let mut prev = [0u8; 32];
        for (i, receipt) in self.receipts.iter().enumerate() {
            if receipt.sequence != i as u64
                || receipt.prev_hash != prev
                || receipt.hash != Self::compute_hash(receipt)
            {
                return Some(i as u64);
            }
            prev = receipt.hash;
        }
        None
    }

    #[must_use]
    pub fn verify_chain(&self) -> bool {
        self.first_broken_link().is_none()
    }

    fn compute_hash(receipt: &Receipt) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(constants::RECEIPT_DOMAIN);
        hasher.update(receipt.prev_hash);
        hasher.update(receipt.sequence.to_le_bytes());
        hasher.update(receipt.receipt_type.to_string().as_bytes());
        hasher.update(receipt.split_id.0.to_le_bytes());
        hasher.update((receipt.actor.as_str().len() as u64).to_le_bytes());
        hasher.update(receipt.actor.as_str().as_bytes());
        hasher.update(receipt.issued_at.timestamp_micros().to_le_bytes());
        hasher.update(&receipt.payload);

        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }
}

impl Default for ReceiptJournal {
    fn default() -> Self {
        Self::new()
    }
}
