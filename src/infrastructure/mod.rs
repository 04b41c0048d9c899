//! Infrastructure layer
//!
//! Outbound HTTP client construction and the clock abstraction used for
//! token expiry.

pub mod clock;
pub mod http_client;

pub use clock::{Clock, ManualClock, SystemClock};
