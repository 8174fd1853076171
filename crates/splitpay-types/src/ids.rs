//! Identifiers used throughout SplitPay.
//!
//! Split identifiers are sequential integers handed out by the registry.
//! Accounts are opaque principal strings supplied (and authenticated) by the
//! host environment. Contributions use UUIDv7 for time-ordered sorting.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants;

// ---------------------------------------------------------------------------
// SplitId
// ---------------------------------------------------------------------------

/// Monotonically increasing identifier for a split. Starts at 1, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SplitId(pub u64);

impl SplitId {
    /// The first identifier the registry assigns.
    pub const FIRST: Self = Self(constants::FIRST_SPLIT_ID);

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SplitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "split:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// Identity of a creator, recipient, or payer.
///
/// The engine never verifies identities; the host passes in an already
/// authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    #[must_use]
    pub fn new(principal: impl Into<String>) -> Self {
        Self(principal.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AccountId {
    fn from(principal: &str) -> Self {
        Self::new(principal)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// ContributionId
// ---------------------------------------------------------------------------

/// Unique identifier for one accepted payment into a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ContributionId(pub Uuid);

impl ContributionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ContributionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContributionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "contrib:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_id_starts_at_one() {
        assert_eq!(SplitId::FIRST, SplitId(1));
        assert_eq!(SplitId::FIRST.next(), SplitId(2));
    }

    #[test]
    fn split_id_display() {
        assert_eq!(format!("{}", SplitId(7)), "split:7");
    }

    #[test]
    fn account_id_from_str() {
        let a: AccountId = "ST1P5VMVNKV33KQ7HXA43WVFQHTM9JBFBWXC0WNX8".into();
        assert_eq!(a.as_str(), "ST1P5VMVNKV33KQ7HXA43WVFQHTM9JBFBWXC0WNX8");
        assert_eq!(format!("{a}"), a.0);
    }

    #[test]
    fn contribution_id_ordering() {
        let a = ContributionId::new();
        let b = ContributionId::new();
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn serde_roundtrips() {
        let id = SplitId(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let back: SplitId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);

        let account = AccountId::new("wallet_1");
        let json = serde_json::to_string(&account).unwrap();
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(account, back);
    }
}
