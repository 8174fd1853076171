//! # splitpay-settlement
//!
//! **Settlement plane**: the [`SettlementEngine`] and the pieces it commits
//! through.
//!
//! ## Architecture
//!
//! Every mutating operation on the engine:
//! 1. Validates the caller and the split's lifecycle state
//! 2. Stages the change on a copy of the split record
//! 3. Checks supply conservation (funds in − funds out == funds held)
//! 4. Commits the record, queues transfers in the outbox, appends a
//!    hash-chained receipt
//!
//! ## Modes
//!
//! - **SharePercent**: basis-point shares summing to 10,000. Payments are
//!   credited immediately (auto-distribute) or pooled and allocated when a
//!   participant withdraws.
//! - **FixedAmount**: each payer owes an exact amount. Once all have paid the
//!   split is complete and the creator collects the total.

pub mod conservation;
pub mod distribution;
pub mod engine;
pub mod journal;
pub mod outbox;
pub mod validation;

pub use conservation::SupplyConservation;
pub use distribution::{allocate, share_of};
pub use engine::SettlementEngine;
pub use journal::ReceiptJournal;
pub use outbox::TransferOutbox;
