//! Payment records and status definitions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settlement currency of a payment. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eth,
}

/// Lifecycle status of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// A recorded payment against a rental.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: u64,
    /// Foreign id of the rental this payment settles.
    pub rental_id: u64,
    /// Chain address of the payer (opaque string).
    pub payer_address: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub status: PaymentStatus,
    pub transaction_hash: Option<String>,
    /// Server-assigned at creation, immutable.
    pub created_at: DateTime<Utc>,
    /// Set when the payment is marked failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// Input for recording a payment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub rental_id: u64,
    pub payer_address: String,
    pub amount: Decimal,
    pub currency: Currency,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    /// Explicit initial status; defaults to `Pending` when absent.
    #[serde(default)]
    pub status: Option<PaymentStatus>,
}

/// Errors from payment ledger operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment {0} not found")]
    NotFound(u64),

    #[error("payment amount must be positive")]
    InvalidAmount,

    #[error("rental {0} not found")]
    UnknownRental(u64),

    #[error("illegal payment transition {from} -> {to}")]
    IllegalTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_wire_names() {
        assert_eq!(serde_json::to_string(&Currency::Usd).unwrap(), "\"USD\"");
        assert_eq!(serde_json::to_string(&Currency::Eth).unwrap(), "\"ETH\"");
        let parsed: Currency = serde_json::from_str("\"ETH\"").unwrap();
        assert_eq!(parsed, Currency::Eth);
    }

    #[test]
    fn test_payment_wire_shape() {
        let payment = Payment {
            id: 3,
            rental_id: 7,
            payer_address: "0xAA".to_string(),
            amount: "500.00".parse().unwrap(),
            currency: Currency::Usd,
            status: PaymentStatus::Pending,
            transaction_hash: None,
            created_at: Utc::now(),
            failure_reason: None,
        };
        let json = serde_json::to_value(&payment).unwrap();
        assert_eq!(json["rentalId"], 7);
        assert_eq!(json["payerAddress"], "0xAA");
        assert_eq!(json["status"], "PENDING");
        assert!(json.get("failureReason").is_none());
    }

    #[test]
    fn test_new_payment_defaults() {
        let new: NewPayment = serde_json::from_str(
            r#"{"rentalId": 1, "payerAddress": "0xAA", "amount": "500.00", "currency": "USD"}"#,
        )
        .unwrap();
        assert!(new.transaction_hash.is_none());
        assert!(new.status.is_none());
    }
}
