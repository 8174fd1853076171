//! Creator → split ids index.

use std::collections::HashMap;

use splitpay_types::{AccountId, SplitId};

/// Ordered list of split ids per creator.
pub struct UserIndex {
    by_creator: HashMap<AccountId, Vec<SplitId>>,
}

impl UserIndex {
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_creator: HashMap::new(),
        }
    }

    /// Append a newly created split to its creator's list.
    pub fn record(&mut self, creator: &AccountId, split_id: SplitId) {
        self.by_creator
            .entry(creator.clone())
            .or_default()
            .push(split_id);
    }

    /// Splits created by `creator`, oldest first. Unknown creators get an
    /// empty slice.
    #[must_use]
    pub fn list_by_creator(&self, creator: &AccountId) -> &[SplitId] {
        self.by_creator.get(creator).map_or(&[][..], Vec::as_slice)
    }

    /// Number of distinct creators.
    #[must_use]
    pub fn creator_count(&self) -> usize {
        self.by_creator.len()
    }
}

impl Default for UserIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_creator_is_empty() {
        let index = UserIndex::new();
        assert!(index.list_by_creator(&AccountId::new("wallet_3")).is_empty());
        assert_eq!(index.creator_count(), 0);
    }

    #[test]
    fn keeps_creation_order_per_creator() {
        let mut index = UserIndex::new();
        let alice = AccountId::new("alice");
        let bob = AccountId::new("bob");

        index.record(&alice, SplitId(1));
        index.record(&bob, SplitId(2));
        index.record(&alice, SplitId(3));

        assert_eq!(index.list_by_creator(&alice), &[SplitId(1), SplitId(3)]);
        assert_eq!(index.list_by_creator(&bob), &[SplitId(2)]);
        assert_eq!(index.creator_count(), 2);
    }
}
