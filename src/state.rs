//! Application state management
//!
//! Shared, cheaply cloneable state handed to every HTTP handler.

use std::sync::Arc;

use crate::config::Config;
use crate::infrastructure::http_client;
use crate::services::{PaymentSubmitter, TokenManager};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// Submission pipeline; owns the shared token manager
    pub payments: Arc<PaymentSubmitter>,
}

impl AppState {
    /// Wire the token manager and payment submitter from configuration
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let http = http_client::build(&config.http)?;
        let credentials = Arc::new(config.credentials.clone());

        let tokens = Arc::new(
            TokenManager::new(credentials.clone(), http.clone()).with_validity(config.token_validity),
        );
        let payments = Arc::new(PaymentSubmitter::new(credentials, http, tokens));

        Ok(Self {
            config: Arc::new(config),
            payments,
        })
    }

    pub fn tokens(&self) -> &Arc<TokenManager> {
        self.payments.tokens()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_keeps_loaded_config() {
        let config = Config::from_lookup(|key| {
            let value = match key {
                "MOMO_CONSUMER_KEY" => "key",
                "MOMO_CONSUMER_SECRET" => "secret",
                "MOMO_TOKEN_URL" => "http://127.0.0.1:9/oauth/token",
                "MOMO_CALLBACK_URL" => "http://127.0.0.1:9/callback",
                "MOMO_API_ENDPOINT" => "http://127.0.0.1:9/payment",
                "BIND_ADDR" => "127.0.0.1:9100",
                _ => return None,
            };
            Some(value.to_string())
        })
        .unwrap();

        let state = AppState::new(config).unwrap();
        assert_eq!(state.config.bind_addr, "127.0.0.1:9100");
        assert_eq!(state.config.credentials.consumer_key, "key");
        assert!(!state.tokens().is_valid());
    }
}
