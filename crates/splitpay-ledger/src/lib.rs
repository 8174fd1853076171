//! # splitpay-ledger
//!
//! **State plane**: where split records live between operations.
//!
//! - **SplitRegistry**: append-only arena of [`SplitRecord`]s. Identifiers are
//!   stable positions in the arena; records are never removed, so cancelled
//!   and completed splits stay auditable.
//! - **UserIndex**: creator → split ids, in creation order.
//!
//! Neither structure validates business rules; the settlement engine does
//! that before it writes here.
//!
//! [`SplitRecord`]: splitpay_types::SplitRecord

pub mod registry;
pub mod user_index;

pub use registry::SplitRegistry;
pub use user_index::UserIndex;
