#![doc = include_str!("../README.md")]

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod request;
pub mod response;
pub mod service;

pub use error::{RosetteError, RosetteResult};

/// Helpers for testing code built on this crate against a mock server.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use crate::auth::RosetteCredential;
    use crate::client::RosetteClient;
    use wiremock::MockServer;

    /// Test API key (not a real key).
    pub const TEST_API_KEY: &str = "test-api-key";

    /// Create a test client connected to a mock server.
    pub async fn setup_mock_client(server: &MockServer) -> RosetteClient {
        RosetteClient::builder()
            .endpoint(server.uri())
            .credential(RosetteCredential::api_key(TEST_API_KEY))
            .build()
            .expect("should build client")
    }
}
