//! Mobile-money payment gateway client
//!
//! OAuth2 client-credentials token lifecycle and payment submission against
//! the provider's API, plus the small axum front-end that exposes it.

pub mod config;
pub mod error;
pub mod handlers;
pub mod infrastructure;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};

pub use config::{Config, Credentials};
pub use error::{MomoError, Result};
pub use models::*;
pub use services::{PaymentSubmitter, TokenManager};
pub use state::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/payments", post(handlers::submit_payment))
        .with_state(app_state)
}
