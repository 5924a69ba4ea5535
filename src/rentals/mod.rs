//! Rental lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/rentals
//!     → manager.rs (create, status Pending)
//!     → settlement coordinator drives Pending → ActionRequired → Active
//!     → PATCH /status drives Active → Completed and cancellation
//! ```
//!
//! # Constraints
//! - Status moves only along the edges of the transition table
//! - A transaction hash, once recorded, is never cleared or replaced
//! - Records are mutated only through manager operations, never by
//!   direct field writes from orchestration code

pub mod manager;
pub mod types;

pub use manager::RentalManager;
pub use types::{NewRental, Rental, RentalError, RentalStatus};
