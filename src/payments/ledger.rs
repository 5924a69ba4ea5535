//! Payment ledger.

use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::payments::types::{NewPayment, Payment, PaymentError, PaymentStatus};
use crate::rentals::RentalManager;

/// Owns all payment records and enforces payment status transitions.
///
/// Rental ids are validated through the rental manager at record time; the
/// ledger never follows the reference afterwards.
pub struct PaymentLedger {
    payments: DashMap<u64, Payment>,
    next_id: AtomicU64,
    rentals: Arc<RentalManager>,
}

impl PaymentLedger {
    pub fn new(rentals: Arc<RentalManager>) -> Self {
        Self {
            payments: DashMap::new(),
            next_id: AtomicU64::new(0),
            rentals,
        }
    }

    /// Record a payment. Status defaults to `Pending` unless explicitly
    /// supplied; the creation timestamp is always server-assigned.
    pub fn record(&self, new: NewPayment) -> Result<Payment, PaymentError> {
        if new.amount <= Decimal::ZERO {
            return Err(PaymentError::InvalidAmount);
        }
        if !self.rentals.exists(new.rental_id) {
            return Err(PaymentError::UnknownRental(new.rental_id));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let payment = Payment {
            id,
            rental_id: new.rental_id,
            payer_address: new.payer_address,
            amount: new.amount,
            currency: new.currency,
            status: new.status.unwrap_or(PaymentStatus::Pending),
            transaction_hash: new.transaction_hash,
            created_at: Utc::now(),
            failure_reason: None,
        };
        self.payments.insert(id, payment.clone());

        tracing::info!(
            payment_id = id,
            rental_id = payment.rental_id,
            amount = %payment.amount,
            status = %payment.status,
            "Payment recorded"
        );
        Ok(payment)
    }

    /// Mark a payment completed after successful verification.
    ///
    /// Completing an already completed payment is a no-op; a failed
    /// payment cannot be resurrected.
    pub fn mark_completed(&self, id: u64) -> Result<Payment, PaymentError> {
        let mut entry = self.payments.get_mut(&id).ok_or(PaymentError::NotFound(id))?;
        match entry.status {
            PaymentStatus::Completed => Ok(entry.clone()),
            PaymentStatus::Failed => Err(PaymentError::IllegalTransition {
                from: PaymentStatus::Failed,
                to: PaymentStatus::Completed,
            }),
            PaymentStatus::Pending => {
                entry.status = PaymentStatus::Completed;
                tracing::info!(payment_id = id, "Payment completed");
                Ok(entry.clone())
            }
        }
    }

    /// Mark a payment failed, recording the reason. Allowed from any state
    /// except `Completed`.
    pub fn mark_failed(&self, id: u64, reason: &str) -> Result<Payment, PaymentError> {
        let mut entry = self.payments.get_mut(&id).ok_or(PaymentError::NotFound(id))?;
        if entry.status == PaymentStatus::Completed {
            return Err(PaymentError::IllegalTransition {
                from: PaymentStatus::Completed,
                to: PaymentStatus::Failed,
            });
        }
        entry.status = PaymentStatus::Failed;
        entry.failure_reason = Some(reason.to_string());
        tracing::info!(payment_id = id, reason, "Payment failed");
        Ok(entry.clone())
    }

    pub fn get(&self, id: u64) -> Result<Payment, PaymentError> {
        self.payments
            .get(&id)
            .map(|p| p.clone())
            .ok_or(PaymentError::NotFound(id))
    }

    /// All payments recorded against a rental, in insertion order.
    pub fn list_by_rental(&self, rental_id: u64) -> Vec<Payment> {
        let mut payments: Vec<Payment> = self
            .payments
            .iter()
            .filter(|p| p.rental_id == rental_id)
            .map(|p| p.clone())
            .collect();
        payments.sort_by_key(|p| p.id);
        payments
    }

    /// The completed payment for a rental, if one exists.
    pub fn find_completed(&self, rental_id: u64) -> Option<Payment> {
        self.payments
            .iter()
            .find(|p| p.rental_id == rental_id && p.status == PaymentStatus::Completed)
            .map(|p| p.clone())
    }
}
