//! Address similarity scoring.

use rosette_api_core::client::RosetteClient;
use rosette_api_core::error::{RosetteError, RosetteResult};
use rosette_api_core::response::{field, RosetteResponse, TypedResponse};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::Address;

/// A request to compare two addresses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressSimilarityRequest {
    pub address1: Address,
    pub address2: Address,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
}

/// Builder for [`AddressSimilarityRequest`].
#[derive(Debug, Default)]
pub struct AddressSimilarityRequestBuilder {
    address1: Option<Address>,
    address2: Option<Address>,
    parameters: Map<String, Value>,
}

impl AddressSimilarityRequest {
    pub fn builder() -> AddressSimilarityRequestBuilder {
        AddressSimilarityRequestBuilder::default()
    }
}

impl AddressSimilarityRequestBuilder {
    /// **Required.**
    pub fn address1(mut self, address: impl Into<Address>) -> Self {
        self.address1 = Some(address.into());
        self
    }

    /// **Required.**
    pub fn address2(mut self, address: impl Into<Address>) -> Self {
        self.address2 = Some(address.into());
        self
    }

    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn build(self) -> RosetteResult<AddressSimilarityRequest> {
        let address1 = self
            .address1
            .ok_or_else(|| RosetteError::Builder("address1 is required".into()))?;
        let address2 = self
            .address2
            .ok_or_else(|| RosetteError::Builder("address2 is required".into()))?;

        if address1.is_empty() || address2.is_empty() {
            return Err(RosetteError::Builder("address cannot be empty".into()));
        }

        Ok(AddressSimilarityRequest {
            address1,
            address2,
            parameters: self.parameters,
        })
    }
}

/// Result of [`score`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressSimilarityResponse {
    pub score: Option<f64>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl TypedResponse for AddressSimilarityResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        Self {
            score: field(envelope.content(), "score"),
            envelope,
        }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// Score how likely two addresses denote the same place.
#[tracing::instrument(name = "rosette::address_similarity::score", skip(client, request))]
pub async fn score(
    client: &RosetteClient,
    request: &AddressSimilarityRequest,
) -> RosetteResult<AddressSimilarityResponse> {
    tracing::debug!("scoring address similarity");

    let envelope = client.post("address-similarity", request, &[]).await?;
    let result = AddressSimilarityResponse::from_envelope(envelope);

    tracing::debug!(score = ?result.score, "address similarity complete");
    Ok(result)
}
