//! # splitpay-types
//!
//! Shared types, errors, and configuration for the **SplitPay** settlement
//! engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`SplitId`], [`AccountId`], [`ContributionId`]
//! - **Amounts**: [`Amount`] (integer micro-units), [`BasisPoints`]
//! - **Split model**: [`SplitRecord`], [`Participant`], [`Allotment`], [`SplitMode`], [`SplitStatus`], [`SplitTerms`]
//! - **Funds movement**: [`Contribution`], [`Transfer`], [`TransferKind`]
//! - **Receipt model**: [`Receipt`], [`ReceiptType`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`SplitError`] with `SP_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod amount;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod receipt;
pub mod split;
pub mod transfer;

// Re-export all primary types at crate root for ergonomic imports:
//   use splitpay_types::{SplitRecord, Participant, SplitError, ...};

pub use amount::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use receipt::*;
pub use split::*;
pub use transfer::*;

// Constants are accessed via `splitpay_types::constants::FOO`
// (not re-exported to avoid name collisions).
