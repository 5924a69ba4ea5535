//! Rental records and the status state machine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of a rental.
///
/// ```text
/// Pending ──▶ ActionRequired ──▶ Active ──▶ Completed
///    │ ▲            │ │
///    │ └────────────┘ │
///    └──────┬─────────┘
///           ▼
///       Cancelled
/// ```
///
/// `Completed` and `Cancelled` are terminal. `ActionRequired` falls back
/// to `Pending` when an on-chain confirmation fails or times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentalStatus {
    Pending,
    ActionRequired,
    Active,
    Completed,
    Cancelled,
}

impl RentalStatus {
    /// Whether `self → to` is an edge of the transition table.
    ///
    /// Re-asserting the current status is allowed as a no-op edge so that
    /// idempotent re-drives of settlement do not trip a transition error.
    pub fn can_transition(self, to: RentalStatus) -> bool {
        use RentalStatus::*;
        if self == to {
            return true;
        }
        matches!(
            (self, to),
            (Pending, ActionRequired)
                | (ActionRequired, Active)
                | (ActionRequired, Pending)
                | (Pending, Cancelled)
                | (ActionRequired, Cancelled)
                | (Active, Completed)
        )
    }

    /// Terminal states admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, RentalStatus::Completed | RentalStatus::Cancelled)
    }
}

impl std::fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RentalStatus::Pending => "PENDING",
            RentalStatus::ActionRequired => "ACTION_REQUIRED",
            RentalStatus::Active => "ACTIVE",
            RentalStatus::Completed => "COMPLETED",
            RentalStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// A rental agreement between a renter address and a property.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    /// Server-assigned identity, immutable after creation.
    pub id: u64,
    /// Foreign id of the rented property; resolved through the property
    /// service, never followed as an in-memory reference.
    pub property_id: u64,
    /// Chain address of the renter (opaque string).
    pub renter_address: String,
    pub start_date: NaiveDate,
    /// Inclusive end of the rental period; `end_date == start_date` is a
    /// valid single-day rental.
    pub end_date: NaiveDate,
    pub total_price: Decimal,
    pub status: RentalStatus,
    /// Set at most once, when a blockchain payment is associated.
    pub transaction_hash: Option<String>,
}

/// Input for creating a rental.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRental {
    pub property_id: u64,
    pub renter_address: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: Decimal,
}

/// Errors from rental lifecycle operations.
#[derive(Debug, Error)]
pub enum RentalError {
    #[error("rental {0} not found")]
    NotFound(u64),

    #[error("end date precedes start date")]
    InvalidDateRange,

    #[error("total price must be positive")]
    InvalidAmount,

    #[error("illegal rental transition {from} -> {to}")]
    IllegalTransition {
        from: RentalStatus,
        to: RentalStatus,
    },

    #[error("rental {id} already has transaction hash {existing}")]
    TransactionHashConflict { id: u64, existing: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use RentalStatus::*;

    const ALL: [RentalStatus; 5] = [Pending, ActionRequired, Active, Completed, Cancelled];

    #[test]
    fn test_transition_table_exhaustive() {
        let allowed = [
            (Pending, ActionRequired),
            (ActionRequired, Active),
            (ActionRequired, Pending),
            (Pending, Cancelled),
            (ActionRequired, Cancelled),
            (Active, Completed),
        ];
        for from in ALL {
            for to in ALL {
                let expected = from == to || allowed.contains(&(from, to));
                assert_eq!(
                    from.can_transition(to),
                    expected,
                    "{from} -> {to} mismatch"
                );
            }
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(Completed.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Pending.is_terminal());
        assert!(!ActionRequired.is_terminal());
        assert!(!Active.is_terminal());
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&ActionRequired).unwrap(),
            "\"ACTION_REQUIRED\""
        );
        let parsed: RentalStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(parsed, Cancelled);
    }

    #[test]
    fn test_rental_wire_shape() {
        let rental = Rental {
            id: 7,
            property_id: 1,
            renter_address: "0xAA".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            total_price: "500.00".parse().unwrap(),
            status: Pending,
            transaction_hash: None,
        };
        let json = serde_json::to_value(&rental).unwrap();
        assert_eq!(json["propertyId"], 1);
        assert_eq!(json["renterAddress"], "0xAA");
        assert_eq!(json["startDate"], "2024-01-01");
        assert_eq!(json["status"], "PENDING");
    }
}
