//! Payment ledger subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/payments
//!     → settlement coordinator validates against the rental
//!     → ledger.rs records the payment (Pending)
//!     → coordinator marks Completed / Failed after verification
//! ```
//!
//! # Constraints
//! - At most one Completed payment per rental on the happy path
//! - Failed payments never block a retry; a new record is created
//! - Records are never deleted

pub mod ledger;
pub mod types;

pub use ledger::PaymentLedger;
pub use types::{Currency, NewPayment, Payment, PaymentError, PaymentStatus};
