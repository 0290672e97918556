//! Name similarity scoring.
//!
//! ## Example
//!
//! ```rust,no_run
//! # use rosette_api_core::client::RosetteClient;
//! use rosette_api_core::models::EntityType;
//! use rosette_api_names::models::Name;
//! use rosette_api_names::name_similarity::{self, NameSimilarityRequest};
//!
//! # async fn example(client: &RosetteClient) -> rosette_api_core::error::RosetteResult<()> {
//! let request = NameSimilarityRequest::builder()
//!     .name1(Name::new("Michael Jackson").with_entity_type(EntityType::Person))
//!     .name2(Name::new("迈克尔·杰克逊").with_entity_type(EntityType::Person))
//!     .build()?;
//!
//! let result = name_similarity::score(client, &request).await?;
//! println!("score: {:?}", result.score);
//! # Ok(())
//! # }
//! ```

use rosette_api_core::client::RosetteClient;
use rosette_api_core::error::{RosetteError, RosetteResult};
use rosette_api_core::response::{field, RosetteResponse, TypedResponse};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::Name;

/// A request to compare two names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameSimilarityRequest {
    pub name1: Name,
    pub name2: Name,
    /// Matcher parameter overrides, sent verbatim.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
}

/// Builder for [`NameSimilarityRequest`].
#[derive(Debug, Default)]
pub struct NameSimilarityRequestBuilder {
    name1: Option<Name>,
    name2: Option<Name>,
    parameters: Map<String, Value>,
}

impl NameSimilarityRequest {
    pub fn builder() -> NameSimilarityRequestBuilder {
        NameSimilarityRequestBuilder::default()
    }
}

impl NameSimilarityRequestBuilder {
    /// **Required.**
    pub fn name1(mut self, name: impl Into<Name>) -> Self {
        self.name1 = Some(name.into());
        self
    }

    /// **Required.**
    pub fn name2(mut self, name: impl Into<Name>) -> Self {
        self.name2 = Some(name.into());
        self
    }

    /// Set one matcher parameter, e.g. `conflictScore`.
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn build(self) -> RosetteResult<NameSimilarityRequest> {
        let name1 = self
            .name1
            .ok_or_else(|| RosetteError::Builder("name1 is required".into()))?;
        let name2 = self
            .name2
            .ok_or_else(|| RosetteError::Builder("name2 is required".into()))?;

        if name1.text.trim().is_empty() || name2.text.trim().is_empty() {
            return Err(RosetteError::Builder("name text cannot be empty".into()));
        }

        Ok(NameSimilarityRequest {
            name1,
            name2,
            parameters: self.parameters,
        })
    }
}

/// Result of [`score`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameSimilarityResponse {
    /// Similarity in `0.0..=1.0`.
    pub score: Option<f64>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl TypedResponse for NameSimilarityResponse {
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

/// Score how likely two names refer to the same entity.
#[tracing::instrument(name = "rosette::name_similarity::score", skip(client, request))]
pub async fn score(
    client: &RosetteClient,
    request: &NameSimilarityRequest,
) -> RosetteResult<NameSimilarityResponse> {
    tracing::debug!("scoring name similarity");

    let envelope = client.post("name-similarity", request, &[]).await?;
    let result = NameSimilarityResponse::from_envelope(envelope);

    tracing::debug!(score = ?result.score, "name similarity complete");
    Ok(result)
}
