use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, info, warn};

use crate::config::Credentials;
use crate::error::{MomoError, Result};
use crate::infrastructure::{Clock, SystemClock};
use crate::models::{PaymentRequest, PaymentResponse};
use crate::services::token_service::TokenManager;

/// Completes partial payment requests and submits them to the provider.
///
/// Each call to [`PaymentSubmitter::submit`] is single-shot: no retries.
pub struct PaymentSubmitter {
    credentials: Arc<Credentials>,
    http: reqwest::Client,
    tokens: Arc<TokenManager>,
    clock: Arc<dyn Clock>,
}

impl PaymentSubmitter {
    pub fn new(
        credentials: Arc<Credentials>,
        http: reqwest::Client,
        tokens: Arc<TokenManager>,
    ) -> Self {
        Self {
            credentials,
            http,
            tokens,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn tokens(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    /// Apply provider defaults using the configured callback URL
    pub fn normalize(&self, req: PaymentRequest) -> Result<PaymentRequest> {
        req.normalize(&self.credentials.callback_url, self.clock.now())
    }

    pub async fn submit(&self, req: &PaymentRequest) -> Result<PaymentResponse> {
        let token = self
            .tokens
            .ensure_valid()
            .await
            .map_err(|e| MomoError::Authentication(Box::new(e)))?;

        let req = self.normalize(req.clone())?;
        let body = serde_json::to_vec(&req)?;

        debug!(
            correlator_id = %req.correlator_id,
            url = %self.credentials.api_endpoint,
            "submitting payment request"
        );
        let response = self
            .http
            .post(&self.credentials.api_endpoint)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        // The provider sends diagnostic fields with error statuses too
        let decoded: PaymentResponse = serde_json::from_slice(&bytes).map_err(|e| {
            MomoError::MalformedResponse(format!(
                "payment response (status {}): {e}",
                status.as_u16()
            ))
        })?;

        if status != reqwest::StatusCode::OK {
            warn!(
                correlator_id = %req.correlator_id,
                status = status.as_u16(),
                message = %decoded.status_message,
                "payment rejected"
            );
            return Err(MomoError::PaymentRejected {
                status: status.as_u16(),
                message: decoded.status_message,
            });
        }

        info!(
            correlator_id = %req.correlator_id,
            provider_transaction_id = %decoded.provider_transaction_id,
            fulfillment_status = %decoded.fulfillment_status,
            "payment accepted"
        );
        Ok(decoded)
    }
}
