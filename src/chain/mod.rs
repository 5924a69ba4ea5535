//! Chain reader subsystem.
//!
//! # Data Flow
//! ```text
//! ChainConfig (RPC URL, failovers, timeout)
//!     → client.rs (RPC connection with per-call timeouts)
//!     → block height / address balance snapshots
//!     → settlement coordinator & HTTP read endpoints
//! ```
//!
//! # Constraints
//! - Read-only: never signs or submits transactions
//! - All RPC calls bounded by the configured timeout
//! - No internal retry beyond one attempt per configured endpoint;
//!   retry policy belongs to callers
//! - Balances converted from wei in fixed point, never through floats

pub mod client;
pub mod types;

use async_trait::async_trait;
use rust_decimal::Decimal;

pub use client::ChainClient;
pub use types::{ChainError, ChainResult};

/// Read-only view of the configured chain.
///
/// Fronts [`ChainClient`] so orchestration code can be exercised against a
/// scripted implementation in tests.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Latest block height observed by the node.
    async fn block_number(&self) -> ChainResult<u64>;

    /// Native-currency balance of `address` in the chain's display unit.
    async fn balance_of(&self, address: &str) -> ChainResult<Decimal>;
}
