//! Name deduplication: cluster a list of names.

use rosette_api_core::client::RosetteClient;
use rosette_api_core::error::{RosetteError, RosetteResult};
use rosette_api_core::response::{field_or_default, RosetteResponse, TypedResponse};
use serde::Serialize;

use crate::models::Name;

/// A request to cluster names that refer to the same entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameDeduplicationRequest {
    pub names: Vec<Name>,
    /// Minimum similarity for two names to share a cluster (`0.0..=1.0`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

/// Builder for [`NameDeduplicationRequest`].
#[derive(Debug, Default)]
pub struct NameDeduplicationRequestBuilder {
    names: Vec<Name>,
    threshold: Option<f64>,
}

impl NameDeduplicationRequest {
    pub fn builder() -> NameDeduplicationRequestBuilder {
        NameDeduplicationRequestBuilder::default()
    }
}

impl NameDeduplicationRequestBuilder {
    /// Append one name.
    pub fn name(mut self, name: impl Into<Name>) -> Self {
        self.names.push(name.into());
        self
    }

    /// Append several names.
    pub fn names<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Name>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn build(self) -> RosetteResult<NameDeduplicationRequest> {
        if self.names.is_empty() {
            return Err(RosetteError::Builder("names cannot be empty".into()));
        }

        if let Some(threshold) = self.threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(RosetteError::Builder(
                    "threshold must be between 0.0 and 1.0".into(),
                ));
            }
        }

        Ok(NameDeduplicationRequest {
            names: self.names,
            threshold: self.threshold,
        })
    }
}

/// Result of [`deduplicate`]: one cluster id per input name, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameDeduplicationResponse {
    pub results: Vec<String>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl NameDeduplicationResponse {
    /// Number of distinct clusters.
    pub fn cluster_count(&self) -> usize {
        let mut ids: Vec<&str> = self.results.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

impl TypedResponse for NameDeduplicationResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        Self {
            results: field_or_default(envelope.content(), "results"),
            envelope,
        }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// Cluster names that likely refer to the same entity.
#[tracing::instrument(
    name = "rosette::name_deduplication::deduplicate",
    skip(client, request),
    fields(names = request.names.len())
)]
pub async fn deduplicate(
    client: &RosetteClient,
    request: &NameDeduplicationRequest,
) -> RosetteResult<NameDeduplicationResponse> {
    tracing::debug!("deduplicating names");

    let envelope = client.post("name-deduplication", request, &[]).await?;
    let result = NameDeduplicationResponse::from_envelope(envelope);

    tracing::debug!(clusters = result.cluster_count(), "name deduplication complete");
    Ok(result)
}
