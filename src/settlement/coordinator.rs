//! Settlement coordinator.

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::chain::{ChainError, ChainReader};
use crate::observability::metrics;
use crate::payments::{Currency, NewPayment, Payment, PaymentError, PaymentLedger};
use crate::rentals::{Rental, RentalError, RentalManager, RentalStatus};

/// An incoming payment submission to settle against a rental.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub payer_address: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub transaction_hash: Option<String>,
}

/// How a settlement attempt concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementOutcome {
    /// Chain check passed; payment completed, rental active.
    Confirmed,
    /// No transaction hash supplied; awaiting on-chain confirmation.
    AwaitingConfirmation,
    /// Chain could not be consulted in time; payment still pending,
    /// rental rolled back for a retry.
    Deferred,
    /// Payment failed validation or verification; rental not advanced.
    Rejected,
    /// A completed payment already existed; nothing changed.
    AlreadySettled,
}

impl SettlementOutcome {
    fn as_str(self) -> &'static str {
        match self {
            SettlementOutcome::Confirmed => "confirmed",
            SettlementOutcome::AwaitingConfirmation => "awaiting_confirmation",
            SettlementOutcome::Deferred => "deferred",
            SettlementOutcome::Rejected => "rejected",
            SettlementOutcome::AlreadySettled => "already_settled",
        }
    }
}

/// Result of a settlement attempt: the outcome plus the current state of
/// the payment/rental pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub outcome: SettlementOutcome,
    pub payment: Payment,
    pub rental: Rental,
}

/// Errors from settlement orchestration.
///
/// Chain failures do not appear here: they are absorbed into the
/// [`Deferred`](SettlementOutcome::Deferred) outcome after the rental has
/// been rolled back.
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error(transparent)]
    Rental(#[from] RentalError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error("rental {rental_id} has a completed payment and cannot be cancelled")]
    CancelBlocked { rental_id: u64 },
}

/// Orchestrates the rental manager, payment ledger and chain reader.
///
/// Settlement attempts on the same rental id are serialized through a
/// per-rental mutex, so two concurrent submissions can never both reach
/// `Completed` for one rental.
pub struct SettlementCoordinator<C> {
    rentals: Arc<RentalManager>,
    payments: Arc<PaymentLedger>,
    chain: Arc<C>,
    locks: DashMap<u64, Arc<Mutex<()>>>,
}

impl<C: ChainReader> SettlementCoordinator<C> {
    pub fn new(rentals: Arc<RentalManager>, payments: Arc<PaymentLedger>, chain: Arc<C>) -> Self {
        Self {
            rentals,
            payments,
            chain,
            locks: DashMap::new(),
        }
    }

    /// Settle an incoming payment against a rental.
    ///
    /// Re-driving an already settled rental is a no-op returning the
    /// existing payment/rental pair.
    pub async fn settle(
        &self,
        rental_id: u64,
        request: PaymentRequest,
    ) -> Result<Settlement, SettlementError> {
        let lock = self.lock_for(rental_id);
        let _guard = lock.lock_owned().await;

        let rental = self.rentals.get(rental_id)?;

        if let Some(existing) = self.payments.find_completed(rental_id) {
            tracing::info!(rental_id, payment_id = existing.id, "Rental already settled");
            return Ok(self.conclude(SettlementOutcome::AlreadySettled, existing, rental));
        }

        // Amount must match the rental's expected total exactly; on
        // mismatch the payment is recorded as failed and the rental is
        // left untouched.
        if request.amount != rental.total_price {
            let payment = self.payments.record(self.new_payment(rental_id, &request))?;
            let reason = format!(
                "amount mismatch: expected {}, got {}",
                rental.total_price, request.amount
            );
            let payment = self.payments.mark_failed(payment.id, &reason)?;
            tracing::warn!(rental_id, payment_id = payment.id, %reason, "Payment rejected");
            return Ok(self.conclude(SettlementOutcome::Rejected, payment, rental));
        }

        let payment = self.payments.record(self.new_payment(rental_id, &request))?;
        let rental = match self.rentals.update_status(
            rental_id,
            RentalStatus::ActionRequired,
            request.transaction_hash.as_deref(),
        ) {
            Ok(rental) => rental,
            Err(e) => {
                // The rental refused the transition (terminal state or a
                // conflicting hash); the recorded payment must not stay
                // pending forever.
                self.payments.mark_failed(payment.id, &e.to_string())?;
                return Err(e.into());
            }
        };

        if request.transaction_hash.is_none() {
            return Ok(self.conclude(SettlementOutcome::AwaitingConfirmation, payment, rental));
        }

        match self.chain.balance_of(&request.payer_address).await {
            Ok(balance) => {
                let required = required_native_amount(&payment);
                if balance >= required {
                    let payment = self.payments.mark_completed(payment.id)?;
                    let rental = self.rentals.update_status(
                        rental_id,
                        RentalStatus::Active,
                        request.transaction_hash.as_deref(),
                    )?;
                    Ok(self.conclude(SettlementOutcome::Confirmed, payment, rental))
                } else {
                    let reason = format!(
                        "insufficient balance: required {}, found {}",
                        required, balance
                    );
                    let payment = self.payments.mark_failed(payment.id, &reason)?;
                    let rental =
                        self.rentals
                            .update_status(rental_id, RentalStatus::Pending, None)?;
                    tracing::warn!(rental_id, payment_id = payment.id, %reason, "Payment rejected");
                    Ok(self.conclude(SettlementOutcome::Rejected, payment, rental))
                }
            }
            Err(ChainError::InvalidAddress(addr)) => {
                let reason = format!("invalid payer address '{}'", addr);
                let payment = self.payments.mark_failed(payment.id, &reason)?;
                let rental = self
                    .rentals
                    .update_status(rental_id, RentalStatus::Pending, None)?;
                Ok(self.conclude(SettlementOutcome::Rejected, payment, rental))
            }
            Err(e) => {
                // Transport failure or timeout: the payment stays pending
                // and the rental returns to Pending so the client can
                // re-drive settlement later.
                tracing::warn!(rental_id, error = %e, "Chain check incomplete, rolling rental back");
                let rental = self
                    .rentals
                    .update_status(rental_id, RentalStatus::Pending, None)?;
                Ok(self.conclude(SettlementOutcome::Deferred, payment, rental))
            }
        }
    }

    /// Cancel a rental, guarded by payment state.
    pub async fn cancel(&self, rental_id: u64) -> Result<Rental, SettlementError> {
        let lock = self.lock_for(rental_id);
        let _guard = lock.lock_owned().await;

        self.rentals.get(rental_id)?;
        if self.payments.find_completed(rental_id).is_some() {
            return Err(SettlementError::CancelBlocked { rental_id });
        }
        let rental = self
            .rentals
            .update_status(rental_id, RentalStatus::Cancelled, None)?;
        Ok(rental)
    }

    fn new_payment(&self, rental_id: u64, request: &PaymentRequest) -> NewPayment {
        NewPayment {
            rental_id,
            payer_address: request.payer_address.clone(),
            amount: request.amount,
            currency: request.currency,
            transaction_hash: request.transaction_hash.clone(),
            status: None,
        }
    }

    fn conclude(
        &self,
        outcome: SettlementOutcome,
        payment: Payment,
        rental: Rental,
    ) -> Settlement {
        metrics::record_settlement(outcome.as_str());
        tracing::info!(
            rental_id = rental.id,
            payment_id = payment.id,
            outcome = outcome.as_str(),
            rental_status = %rental.status,
            payment_status = %payment.status,
            "Settlement concluded"
        );
        Settlement {
            outcome,
            payment,
            rental,
        }
    }

    fn lock_for(&self, rental_id: u64) -> Arc<Mutex<()>> {
        self.locks.entry(rental_id).or_default().clone()
    }
}

/// The native-unit balance the payer must hold for the snapshot check.
///
/// Only ether-denominated payments can be compared against the chain's
/// native balance; for USD the snapshot degrades to a reachability probe
/// of the address.
fn required_native_amount(payment: &Payment) -> Decimal {
    match payment.currency {
        Currency::Eth => payment.amount,
        Currency::Usd => Decimal::ZERO,
    }
}
