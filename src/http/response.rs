//! Domain error to HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::chain::ChainError;
use crate::directory::DirectoryError;
use crate::payments::PaymentError;
use crate::rentals::RentalError;
use crate::settlement::SettlementError;

/// An error response with a stable machine-readable tag and a
/// human-readable detail, rendered as `{ "error": ..., "detail": ... }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status,
            error,
            detail: detail.into(),
        }
    }

    pub fn unknown_property(property_id: u64) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "unknown_property",
            format!("property {} does not exist", property_id),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = self.error, detail = %self.detail, "Request failed");
        }
        let body = Json(serde_json::json!({
            "error": self.error,
            "detail": self.detail,
        }));
        (self.status, body).into_response()
    }
}

impl From<RentalError> for ApiError {
    fn from(e: RentalError) -> Self {
        let (status, error) = match &e {
            RentalError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            RentalError::InvalidDateRange | RentalError::InvalidAmount => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            RentalError::IllegalTransition { .. } => (StatusCode::CONFLICT, "illegal_transition"),
            RentalError::TransactionHashConflict { .. } => {
                (StatusCode::CONFLICT, "transaction_hash_conflict")
            }
        };
        Self::new(status, error, e.to_string())
    }
}

impl From<PaymentError> for ApiError {
    fn from(e: PaymentError) -> Self {
        let (status, error) = match &e {
            PaymentError::NotFound(_) | PaymentError::UnknownRental(_) => {
                (StatusCode::NOT_FOUND, "not_found")
            }
            PaymentError::InvalidAmount => (StatusCode::BAD_REQUEST, "validation_error"),
            PaymentError::IllegalTransition { .. } => (StatusCode::CONFLICT, "illegal_transition"),
        };
        Self::new(status, error, e.to_string())
    }
}

impl From<ChainError> for ApiError {
    fn from(e: ChainError) -> Self {
        let (status, error) = match &e {
            ChainError::InvalidAddress(_) => (StatusCode::BAD_REQUEST, "invalid_address"),
            ChainError::Protocol(_) => (StatusCode::BAD_GATEWAY, "chain_protocol_error"),
            ChainError::Unavailable(_) | ChainError::Timeout(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "chain_unavailable")
            }
        };
        Self::new(status, error, e.to_string())
    }
}

impl From<SettlementError> for ApiError {
    fn from(e: SettlementError) -> Self {
        match e {
            SettlementError::Rental(inner) => inner.into(),
            SettlementError::Payment(inner) => inner.into(),
            SettlementError::CancelBlocked { .. } => {
                Self::new(StatusCode::CONFLICT, "cancel_blocked", e.to_string())
            }
        }
    }
}

impl From<DirectoryError> for ApiError {
    fn from(e: DirectoryError) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, "property_service_unavailable", e.to_string())
    }
}
