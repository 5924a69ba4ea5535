//! Settlement orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/payments
//!     → coordinator.rs settle()
//!         1. look up rental, short-circuit if already settled
//!         2. validate amount against the rental's total price
//!         3. record payment (Pending), rental → ActionRequired
//!         4. tx hash supplied → chain balance snapshot
//!         5. commit: payment Completed + rental Active,
//!            or roll the rental back to Pending
//! ```
//!
//! The coordinator owns no records of its own; it only drives the rental
//! manager, the payment ledger and the chain reader, serialized per
//! rental id.

pub mod coordinator;

pub use coordinator::{
    PaymentRequest, Settlement, SettlementCoordinator, SettlementError, SettlementOutcome,
};
