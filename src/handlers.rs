//! HTTP request handlers
//!
//! Thin adapters between axum and the payment submitter.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::MomoError;
use crate::models::{PaymentRequest, PaymentResponse};
use crate::state::AppState;

pub const WELCOME_MESSAGE: &str = "Welcome to the API Mobile money";

/// Root endpoint
pub async fn root() -> &'static str {
    WELCOME_MESSAGE
}

/// Submit a (possibly partial) payment request to the provider
///
/// Returns the provider's response on acceptance; failures are mapped to
/// `{"error": "..."}` with a status reflecting which side failed.
pub async fn submit_payment(
    State(state): State<AppState>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let Json(payload) = payload?;
    let response = state.payments.submit(&payload).await?;
    Ok(Json(response))
}

pub enum ApiError {
    /// Request body could not be read as a payment request
    Body(JsonRejection),
    Gateway(MomoError),
}

impl From<MomoError> for ApiError {
    fn from(err: MomoError) -> Self {
        Self::Gateway(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        let err = match self {
            ApiError::Body(rejection) => return rejection.status(),
            ApiError::Gateway(err) => err,
        };
        match err {
            MomoError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MomoError::Network(_) => StatusCode::GATEWAY_TIMEOUT,
            MomoError::Config(_) | MomoError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MomoError::TokenEndpoint { .. }
            | MomoError::MalformedResponse(_)
            | MomoError::Authentication(_)
            | MomoError::PaymentRejected { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Body(rejection) => rejection.body_text(),
            ApiError::Gateway(MomoError::PaymentRejected { message, .. }) => message.clone(),
            ApiError::Gateway(other) => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
