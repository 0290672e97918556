//! Service status endpoints: `info` and `ping`.
//!
//! ```rust,no_run
//! # use rosette_api_core::client::RosetteClient;
//! # async fn example(client: &RosetteClient) -> rosette_api_core::error::RosetteResult<()> {
//! let info = rosette_api_core::service::info(client).await?;
//! println!("{} {}", info.name.unwrap_or_default(), info.version.unwrap_or_default());
//! # Ok(())
//! # }
//! ```

use serde::Serialize;

use crate::client::{RosetteClient, BINDING_VERSION};
use crate::error::RosetteResult;
use crate::response::{field, RosetteResponse, TypedResponse};

/// Server build information.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub name: Option<String>,
    pub version: Option<String>,
    pub build_number: Option<String>,
    pub build_time: Option<String>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl TypedResponse for InfoResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        let content = envelope.content();
        Self {
            name: field(content, "name"),
            version: field(content, "version"),
            build_number: field(content, "buildNumber"),
            build_time: field(content, "buildTime"),
            envelope,
        }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// Liveness check result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PingResponse {
    pub message: Option<String>,
    /// Server time in epoch milliseconds.
    pub time: Option<i64>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl TypedResponse for PingResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        let content = envelope.content();
        Self {
            message: field(content, "message"),
            time: field(content, "time"),
            envelope,
        }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// Fetch server build information.
///
/// Sends `clientVersion` so the server can flag incompatible bindings.
///
/// # Tracing
///
/// Emits a span named `rosette::service::info`.
#[tracing::instrument(name = "rosette::service::info", skip(client))]
pub async fn info(client: &RosetteClient) -> RosetteResult<InfoResponse> {
    tracing::debug!("requesting server info");

    let envelope = client
        .get("info", &[("clientVersion", BINDING_VERSION)])
        .await?;
    let info = InfoResponse::from_envelope(envelope);

    tracing::debug!(version = ?info.version, "server info received");
    Ok(info)
}

/// Check that the service is reachable and the key is accepted.
///
/// # Tracing
///
/// Emits a span named `rosette::service::ping`.
#[tracing::instrument(name = "rosette::service::ping", skip(client))]
pub async fn ping(client: &RosetteClient) -> RosetteResult<PingResponse> {
    tracing::debug!("pinging service");

    let envelope = client.get("ping", &[]).await?;
    Ok(PingResponse::from_envelope(envelope))
}
