use reqwest::Client;

use crate::config::HttpConfig;

/// Build the client shared by the token and payment calls.
///
/// The overall timeout bounds every provider call; an elapsed timeout
/// surfaces as a `reqwest::Error` and therefore as `MomoError::Network`.
pub fn build(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .pool_max_idle_per_host(50)
        .connect_timeout(config.connect_timeout)
        .timeout(config.timeout)
        .build()
}
