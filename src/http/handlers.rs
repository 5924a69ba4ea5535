//! Request handlers for the settlement service API.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::chain::ChainReader;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::payments::{Currency, Payment};
use crate::rentals::{NewRental, Rental, RentalStatus};
use crate::settlement::{PaymentRequest, SettlementOutcome};

/// POST /api/rentals
pub async fn create_rental(
    State(state): State<AppState>,
    Json(new): Json<NewRental>,
) -> Result<Json<Rental>, ApiError> {
    if !state.directory.exists(new.property_id).await? {
        return Err(ApiError::unknown_property(new.property_id));
    }
    let rental = state.rentals.create(new)?;
    Ok(Json(rental))
}

/// GET /api/rentals/{id}
pub async fn get_rental(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Rental>, ApiError> {
    Ok(Json(state.rentals.get(id)?))
}

#[derive(Debug, Deserialize)]
pub struct RenterQuery {
    pub address: String,
}

/// GET /api/rentals/my-rentals?address=
pub async fn list_my_rentals(
    State(state): State<AppState>,
    Query(query): Query<RenterQuery>,
) -> Json<Vec<Rental>> {
    Json(state.rentals.list_by_renter(&query.address))
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: RentalStatus,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
}

/// PATCH /api/rentals/{id}/status?status=&txHash=
///
/// Thin manager-level transition. Cancellation routes through the
/// coordinator so the completed-payment guard applies.
pub async fn update_rental_status(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Rental>, ApiError> {
    let rental = if query.status == RentalStatus::Cancelled {
        state.coordinator.cancel(id).await?
    } else {
        state
            .rentals
            .update_status(id, query.status, query.tx_hash.as_deref())?
    };
    Ok(Json(rental))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub rental_id: u64,
    pub payer_address: String,
    pub amount: Decimal,
    pub currency: Currency,
    #[serde(default)]
    pub transaction_hash: Option<String>,
}

/// POST /api/payments
///
/// Invokes settlement. The payment record is returned in all concluded
/// outcomes; the status code reflects how settlement ended.
pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<Response, ApiError> {
    let settlement = state
        .coordinator
        .settle(
            request.rental_id,
            PaymentRequest {
                payer_address: request.payer_address,
                amount: request.amount,
                currency: request.currency,
                transaction_hash: request.transaction_hash,
            },
        )
        .await?;

    let status = match settlement.outcome {
        SettlementOutcome::Confirmed
        | SettlementOutcome::AwaitingConfirmation
        | SettlementOutcome::AlreadySettled => StatusCode::OK,
        SettlementOutcome::Rejected => StatusCode::CONFLICT,
        SettlementOutcome::Deferred => StatusCode::SERVICE_UNAVAILABLE,
    };
    Ok((status, Json(settlement.payment)).into_response())
}

/// GET /api/payments/{id}
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Payment>, ApiError> {
    Ok(Json(state.payments.get(id)?))
}

/// GET /api/payments/rental/{rentalId}
pub async fn list_payments_by_rental(
    State(state): State<AppState>,
    Path(rental_id): Path<u64>,
) -> Json<Vec<Payment>> {
    Json(state.payments.list_by_rental(rental_id))
}

/// GET /api/blockchain/block-number
pub async fn block_number(State(state): State<AppState>) -> Result<Json<u64>, ApiError> {
    Ok(Json(state.chain.block_number().await?))
}

/// GET /api/blockchain/balance/{address}
pub async fn balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<Decimal>, ApiError> {
    Ok(Json(state.chain.balance_of(&address).await?))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let chain_healthy = state.chain.is_healthy().await;
    Json(serde_json::json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "chainHealthy": chain_healthy,
    }))
}
