//! Shared fixtures for settlement flow tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};

use rental_settlement::chain::{ChainError, ChainReader, ChainResult};
use rental_settlement::payments::{Currency, PaymentLedger};
use rental_settlement::rentals::{NewRental, Rental, RentalManager};
use rental_settlement::settlement::{PaymentRequest, SettlementCoordinator};

/// What the scripted chain should answer on the next calls.
#[derive(Clone, Copy)]
pub enum Script {
    /// Node reachable; every address holds this balance.
    Balance(Decimal),
    /// Node unreachable; every call times out.
    Down,
}

/// A chain reader whose answers are scripted by the test.
pub struct ScriptedChain {
    script: Mutex<Script>,
}

impl ScriptedChain {
    pub fn new(script: Script) -> Self {
        Self {
            script: Mutex::new(script),
        }
    }

    /// Change the scripted behavior mid-test (e.g. node recovers).
    pub fn set(&self, script: Script) {
        *self.script.lock().unwrap() = script;
    }
}

#[async_trait]
impl ChainReader for ScriptedChain {
    async fn block_number(&self) -> ChainResult<u64> {
        match *self.script.lock().unwrap() {
            Script::Balance(_) => Ok(100),
            Script::Down => Err(ChainError::Timeout(1)),
        }
    }

    async fn balance_of(&self, address: &str) -> ChainResult<Decimal> {
        if address.is_empty() {
            return Err(ChainError::InvalidAddress(address.to_string()));
        }
        match *self.script.lock().unwrap() {
            Script::Balance(balance) => Ok(balance),
            Script::Down => Err(ChainError::Timeout(1)),
        }
    }
}

/// Fully wired core with a scripted chain.
pub struct Harness {
    pub rentals: Arc<RentalManager>,
    pub payments: Arc<PaymentLedger>,
    pub coordinator: Arc<SettlementCoordinator<ScriptedChain>>,
    pub chain: Arc<ScriptedChain>,
}

pub fn harness(script: Script) -> Harness {
    let rentals = Arc::new(RentalManager::new());
    let payments = Arc::new(PaymentLedger::new(rentals.clone()));
    let chain = Arc::new(ScriptedChain::new(script));
    let coordinator = Arc::new(SettlementCoordinator::new(
        rentals.clone(),
        payments.clone(),
        chain.clone(),
    ));
    Harness {
        rentals,
        payments,
        coordinator,
        chain,
    }
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Rental for property 1 by 0xAA, 2024-01-01..2024-01-05, total 500.00.
pub fn standard_rental(harness: &Harness) -> Rental {
    harness
        .rentals
        .create(NewRental {
            property_id: 1,
            renter_address: "0xAA".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            total_price: dec("500.00"),
        })
        .unwrap()
}

pub fn payment_of(amount: &str, currency: Currency, tx_hash: Option<&str>) -> PaymentRequest {
    PaymentRequest {
        payer_address: "0xAA".to_string(),
        amount: dec(amount),
        currency,
        transaction_hash: tx_hash.map(str::to_owned),
    }
}
