//! Rental lifecycle manager.

use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::observability::metrics;
use crate::rentals::types::{NewRental, Rental, RentalError, RentalStatus};

/// Owns all rental records and enforces the status state machine.
///
/// All mutation goes through [`create`](Self::create) and
/// [`update_status`](Self::update_status); records are handed out by
/// value so callers cannot bypass the transition rules.
#[derive(Default)]
pub struct RentalManager {
    rentals: DashMap<u64, Rental>,
    next_id: AtomicU64,
}

impl RentalManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a rental in `Pending` status.
    pub fn create(&self, new: NewRental) -> Result<Rental, RentalError> {
        if new.end_date < new.start_date {
            return Err(RentalError::InvalidDateRange);
        }
        if new.total_price <= Decimal::ZERO {
            return Err(RentalError::InvalidAmount);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let rental = Rental {
            id,
            property_id: new.property_id,
            renter_address: new.renter_address,
            start_date: new.start_date,
            end_date: new.end_date,
            total_price: new.total_price,
            status: RentalStatus::Pending,
            transaction_hash: None,
        };
        self.rentals.insert(id, rental.clone());

        tracing::info!(
            rental_id = id,
            property_id = rental.property_id,
            renter = %rental.renter_address,
            "Rental created"
        );
        Ok(rental)
    }

    /// Apply a status transition, optionally recording a transaction hash.
    ///
    /// The hash is write-once: supplying a different hash on a rental that
    /// already carries one fails with `TransactionHashConflict` before any
    /// state is touched. Re-supplying the identical hash is accepted.
    pub fn update_status(
        &self,
        id: u64,
        to: RentalStatus,
        tx_hash: Option<&str>,
    ) -> Result<Rental, RentalError> {
        let mut entry = self.rentals.get_mut(&id).ok_or(RentalError::NotFound(id))?;

        if let (Some(existing), Some(supplied)) = (&entry.transaction_hash, tx_hash) {
            if existing != supplied {
                return Err(RentalError::TransactionHashConflict {
                    id,
                    existing: existing.clone(),
                });
            }
        }
        if !entry.status.can_transition(to) {
            return Err(RentalError::IllegalTransition {
                from: entry.status,
                to,
            });
        }

        let from = entry.status;
        entry.status = to;
        if entry.transaction_hash.is_none() {
            entry.transaction_hash = tx_hash.map(str::to_owned);
        }

        if from != to {
            tracing::info!(rental_id = id, %from, %to, "Rental transitioned");
            metrics::record_rental_transition(&to.to_string());
        }
        Ok(entry.clone())
    }

    pub fn get(&self, id: u64) -> Result<Rental, RentalError> {
        self.rentals
            .get(&id)
            .map(|r| r.clone())
            .ok_or(RentalError::NotFound(id))
    }

    pub fn exists(&self, id: u64) -> bool {
        self.rentals.contains_key(&id)
    }

    /// All rentals for a renter address, in insertion order.
    pub fn list_by_renter(&self, address: &str) -> Vec<Rental> {
        let mut rentals: Vec<Rental> = self
            .rentals
            .iter()
            .filter(|r| r.renter_address == address)
            .map(|r| r.clone())
            .collect();
        rentals.sort_by_key(|r| r.id);
        rentals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_rental(total_price: &str) -> NewRental {
        NewRental {
            property_id: 1,
            renter_address: "0xAA".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            total_price: total_price.parse().unwrap(),
        }
    }

    #[test]
    fn test_create_starts_pending() {
        let manager = RentalManager::new();
        let rental = manager.create(new_rental("500.00")).unwrap();
        assert_eq!(rental.status, RentalStatus::Pending);
        assert!(rental.transaction_hash.is_none());
        assert_eq!(manager.get(rental.id).unwrap().id, rental.id);
    }

    #[test]
    fn test_single_day_rental_allowed() {
        let manager = RentalManager::new();
        let mut new = new_rental("100");
        new.end_date = new.start_date;
        assert!(manager.create(new).is_ok());
    }

    #[test]
    fn test_inverted_date_range_rejected() {
        let manager = RentalManager::new();
        let mut new = new_rental("100");
        new.end_date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert!(matches!(
            manager.create(new),
            Err(RentalError::InvalidDateRange)
        ));
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let manager = RentalManager::new();
        assert!(matches!(
            manager.create(new_rental("0")),
            Err(RentalError::InvalidAmount)
        ));
        assert!(matches!(
            manager.create(new_rental("-1.50")),
            Err(RentalError::InvalidAmount)
        ));
    }

    #[test]
    fn test_legal_transition_chain() {
        let manager = RentalManager::new();
        let id = manager.create(new_rental("500.00")).unwrap().id;

        manager
            .update_status(id, RentalStatus::ActionRequired, None)
            .unwrap();
        manager
            .update_status(id, RentalStatus::Active, Some("0xhash"))
            .unwrap();
        let rental = manager
            .update_status(id, RentalStatus::Completed, None)
            .unwrap();
        assert_eq!(rental.status, RentalStatus::Completed);
        assert_eq!(rental.transaction_hash.as_deref(), Some("0xhash"));
    }

    #[test]
    fn test_illegal_transition_rejected() {
        let manager = RentalManager::new();
        let id = manager.create(new_rental("500.00")).unwrap().id;

        let err = manager
            .update_status(id, RentalStatus::Active, None)
            .unwrap_err();
        assert!(matches!(
            err,
            RentalError::IllegalTransition {
                from: RentalStatus::Pending,
                to: RentalStatus::Active
            }
        ));
        // Rental untouched
        assert_eq!(manager.get(id).unwrap().status, RentalStatus::Pending);
    }

    #[test]
    fn test_terminal_states_are_final() {
        let manager = RentalManager::new();
        let id = manager.create(new_rental("500.00")).unwrap().id;
        manager
            .update_status(id, RentalStatus::Cancelled, None)
            .unwrap();

        assert!(manager
            .update_status(id, RentalStatus::ActionRequired, None)
            .is_err());
        assert!(manager.update_status(id, RentalStatus::Pending, None).is_err());
    }

    #[test]
    fn test_transaction_hash_write_once() {
        let manager = RentalManager::new();
        let id = manager.create(new_rental("500.00")).unwrap().id;
        manager
            .update_status(id, RentalStatus::ActionRequired, Some("0xaaa"))
            .unwrap();

        // Same hash again is fine
        assert!(manager
            .update_status(id, RentalStatus::Active, Some("0xaaa"))
            .is_ok());

        // A different hash must be rejected without a state change
        let err = manager
            .update_status(id, RentalStatus::Completed, Some("0xbbb"))
            .unwrap_err();
        assert!(matches!(err, RentalError::TransactionHashConflict { .. }));
        let rental = manager.get(id).unwrap();
        assert_eq!(rental.status, RentalStatus::Active);
        assert_eq!(rental.transaction_hash.as_deref(), Some("0xaaa"));
    }

    #[test]
    fn test_unknown_rental() {
        let manager = RentalManager::new();
        assert!(matches!(
            manager.update_status(99, RentalStatus::Cancelled, None),
            Err(RentalError::NotFound(99))
        ));
        assert!(manager.get(99).is_err());
        assert!(!manager.exists(99));
    }

    #[test]
    fn test_list_by_renter_insertion_order() {
        let manager = RentalManager::new();
        let a = manager.create(new_rental("100")).unwrap();
        let mut other = new_rental("200");
        other.renter_address = "0xBB".to_string();
        manager.create(other).unwrap();
        let b = manager.create(new_rental("300")).unwrap();

        let mine = manager.list_by_renter("0xAA");
        assert_eq!(
            mine.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![a.id, b.id]
        );
        assert!(manager.list_by_renter("0xCC").is_empty());
    }
}
