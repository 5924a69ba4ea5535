//! Chain-specific types, errors and unit conversion.

use alloy::primitives::U256;
use rust_decimal::Decimal;
use thiserror::Error;

// Re-export ChainConfig from config module to avoid duplication
pub use crate::config::schema::ChainConfig;

/// Number of decimal places between wei and ether.
const WEI_SCALE: u32 = 18;

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Node could not be reached or answered with a transport error.
    #[error("chain unavailable: {0}")]
    Unavailable(String),

    /// RPC request timed out.
    #[error("chain request timed out after {0} seconds")]
    Timeout(u64),

    /// Node answered but the response could not be interpreted.
    #[error("malformed chain response: {0}")]
    Protocol(String),

    /// Address is not syntactically valid.
    #[error("invalid chain address '{0}'")]
    InvalidAddress(String),
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Convert a raw wei balance to ether as a fixed-point decimal.
///
/// The conversion goes through integer arithmetic only; balances that do
/// not fit the decimal's 96-bit mantissa are rejected rather than rounded.
pub fn wei_to_ether(wei: U256) -> ChainResult<Decimal> {
    let raw = u128::try_from(wei)
        .map_err(|_| ChainError::Protocol(format!("balance {} exceeds 128 bits", wei)))?;
    if raw > i128::MAX as u128 {
        return Err(ChainError::Protocol(format!("balance {} out of range", wei)));
    }
    Decimal::try_from_i128_with_scale(raw as i128, WEI_SCALE)
        .map(|d| d.normalize())
        .map_err(|_| ChainError::Protocol(format!("balance {} not representable", wei)))
}
