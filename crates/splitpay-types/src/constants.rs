//! System-wide constants for the SplitPay settlement engine.

/// Basis points that make up 100% of a SharePercent split.
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Minimum number of participants in a split.
pub const MIN_PARTICIPANTS: usize = 1;

/// Maximum number of participants in a split.
pub const MAX_PARTICIPANTS: usize = 10;

/// Maximum length of a split name, in characters.
pub const MAX_NAME_LEN: usize = 50;

/// Micro-units per whole currency unit (1 unit = 1,000,000 micro-units).
pub const MICRO_UNITS_PER_UNIT: u64 = 1_000_000;

/// Decimal places implied by [`MICRO_UNITS_PER_UNIT`].
pub const UNIT_DECIMALS: u32 = 6;

/// First identifier handed out by the registry.
pub const FIRST_SPLIT_ID: u64 = 1;

/// Domain separator for the receipt hash chain.
pub const RECEIPT_DOMAIN: &[u8] = b"splitpay:receipt:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "SplitPay";
