//! Integration tests for rosette_api_core.
//!
//! These tests require a live Rosette API endpoint.
//! Run with: `cargo test --features integration-tests`
//!
//! Required environment variables:
//! - `ROSETTE_API_KEY`: The API key for authentication
//!
//! Optional:
//! - `ROSETTE_API_URL`: Alternate endpoint (defaults to the public service)

#![cfg(feature = "integration-tests")]

use rosette_api_core::client::RosetteClient;
use rosette_api_core::response::TypedResponse;
use rosette_api_core::{service, RosetteError};

#[tokio::test]
async fn test_ping() {
    let client = RosetteClient::builder().build().expect("Failed to build client");

    let pong = service::ping(&client).await.expect("ping");
    assert!(pong.message.is_some());
    assert_eq!(client.concurrent_requests(), 0);
}

#[tokio::test]
async fn test_info() {
    let client = RosetteClient::builder().build().expect("Failed to build client");

    let info = service::info(&client).await.expect("info");
    assert!(info.version.is_some());
    assert!(info.envelope().response_headers().request_id.is_some());
}

#[tokio::test]
async fn test_bad_key_is_api_error() {
    let client = RosetteClient::builder()
        .credential(rosette_api_core::auth::RosetteCredential::api_key("not-a-key"))
        .build()
        .expect("Failed to build client");

    let err = service::ping(&client).await.expect_err("should be rejected");
    assert!(matches!(err, RosetteError::Api { .. }));
}
