//! Business logic services
//!
//! Token lifecycle management and payment submission against the provider.

pub mod payment_service;
pub mod token_service;

pub use payment_service::PaymentSubmitter;
pub use token_service::TokenManager;
