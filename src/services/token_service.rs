//! OAuth2 client-credentials token lifecycle
//!
//! The token is fetched lazily on first use and refreshed on demand once its
//! validity window has elapsed. Token state sits behind a short-held lock so
//! status reads never wait on the network. Refreshes are serialized by a
//! separate async mutex: callers that queued behind an attempt take that
//! attempt's outcome, token or error, instead of fetching again.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::Credentials;
use crate::error::{MomoError, Result};
use crate::infrastructure::{Clock, SystemClock};

/// Stored bearer token. An empty `access_token` means none was fetched yet.
#[derive(Debug, Default)]
struct TokenState {
    access_token: String,
    expires_at: Option<DateTime<Utc>>,
    /// Bumped every time a refresh attempt completes, successful or not
    attempts: u64,
}

impl TokenState {
    fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => !self.access_token.is_empty() && now < expires_at,
            None => false,
        }
    }
}

/// Outcome of the most recent refresh attempt
#[derive(Debug, Default)]
struct RefreshSlot {
    last_failure: Option<MomoError>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct TokenManager {
    credentials: Arc<Credentials>,
    http: reqwest::Client,
    clock: Arc<dyn Clock>,
    validity: chrono::Duration,
    state: RwLock<TokenState>,
    refresh: Mutex<RefreshSlot>,
}

impl TokenManager {
    pub fn new(credentials: Arc<Credentials>, http: reqwest::Client) -> Self {
        Self {
            credentials,
            http,
            clock: Arc::new(SystemClock),
            validity: chrono::Duration::minutes(45),
            state: RwLock::new(TokenState::default()),
            refresh: Mutex::new(RefreshSlot::default()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Override the fixed validity window assigned to each fetched token
    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = chrono::Duration::from_std(validity).unwrap_or(chrono::Duration::MAX);
        self
    }

    fn read_state(&self) -> RwLockReadGuard<'_, TokenState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, TokenState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// True iff a token is stored and the clock is strictly before its expiry
    pub fn is_valid(&self) -> bool {
        self.read_state().is_valid_at(self.clock.now())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.read_state().expires_at
    }

    /// Stored token, whether or not it is still valid
    pub fn access_token(&self) -> Option<String> {
        let state = self.read_state();
        (!state.access_token.is_empty()).then(|| state.access_token.clone())
    }

    /// The stored token if valid now, else the attempt counter observed
    fn valid_token(&self) -> std::result::Result<String, u64> {
        let state = self.read_state();
        if state.is_valid_at(self.clock.now()) {
            Ok(state.access_token.clone())
        } else {
            Err(state.attempts)
        }
    }

    /// Run the client-credentials grant. Does not touch the stored state.
    pub async fn fetch(&self) -> Result<String> {
        let credentials = STANDARD.encode(format!(
            "{}:{}",
            self.credentials.consumer_key, self.credentials.consumer_secret
        ));

        debug!(url = %self.credentials.token_url, "requesting access token");
        let response = self
            .http
            .post(&self.credentials.token_url)
            .header(AUTHORIZATION, format!("Basic {credentials}"))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != reqwest::StatusCode::OK {
            warn!(status = status.as_u16(), "token endpoint rejected the request");
            return Err(MomoError::TokenEndpoint {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| MomoError::MalformedResponse(format!("token response: {e}")))?;
        if token.access_token.is_empty() {
            return Err(MomoError::MalformedResponse(
                "token response: empty access_token".to_string(),
            ));
        }

        Ok(token.access_token)
    }

    /// Fetch a new token and store it. On failure the previous state is kept.
    pub async fn refresh(&self) -> Result<()> {
        let mut slot = self.refresh.lock().await;
        self.refresh_locked(&mut slot).await.map(|_| ())
    }

    /// Return a token that is valid now, refreshing it first if needed.
    ///
    /// This is the entry point other components use. Concurrent callers that
    /// find the token stale share one fetch and observe the same result.
    pub async fn ensure_valid(&self) -> Result<String> {
        let seen = match self.valid_token() {
            Ok(token) => return Ok(token),
            Err(seen) => seen,
        };

        let mut slot = self.refresh.lock().await;
        let seen_now = match self.valid_token() {
            Ok(token) => return Ok(token),
            Err(attempts) => attempts,
        };
        if seen_now != seen {
            if let Some(err) = &slot.last_failure {
                debug!("sharing failed refresh with waiting caller");
                return Err(err.clone());
            }
        }

        self.refresh_locked(&mut slot).await
    }

    /// Drop the stored token so the next `ensure_valid` fetches a new one
    pub fn invalidate(&self) {
        let mut state = self.write_state();
        state.access_token.clear();
        state.expires_at = None;
        debug!("access token invalidated");
    }

    async fn refresh_locked(&self, slot: &mut RefreshSlot) -> Result<String> {
        let outcome = self.fetch().await;

        let mut state = self.write_state();
        state.attempts += 1;
        match outcome {
            Ok(token) => {
                let expires_at = self
                    .clock
                    .now()
                    .checked_add_signed(self.validity)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC);
                state.access_token = token.clone();
                state.expires_at = Some(expires_at);
                slot.last_failure = None;
                info!(%expires_at, "access token refreshed");
                Ok(token)
            }
            Err(err) => {
                slot.last_failure = Some(err.clone());
                Err(err)
            }
        }
    }
}
