//! Sentiment analysis, for the document as a whole and per entity.

use rosette_api_core::client::RosetteClient;
use rosette_api_core::error::RosetteResult;
use rosette_api_core::request::{DocumentRequest, InputForms};
use rosette_api_core::response::{field, records, RosetteResponse, TypedResponse};
use serde::{Deserialize, Serialize};

use crate::models::{LabelConfidence, RosetteEntity};

/// An entity with the sentiment expressed toward it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentEntity {
    #[serde(flatten)]
    pub entity: RosetteEntity,
    #[serde(default)]
    pub sentiment: Option<LabelConfidence>,
}

/// Result of [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentResponse {
    /// Sentiment of the whole document (`pos`, `neu` or `neg`).
    pub document: Option<LabelConfidence>,
    pub entities: Vec<SentimentEntity>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl TypedResponse for SentimentResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        let content = envelope.content();
        Self {
            document: field(content, "document"),
            entities: records(content, "entities"),
            envelope,
        }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// Analyze the sentiment of a document.
#[tracing::instrument(name = "rosette::sentiment::analyze", skip(client, request))]
pub async fn analyze(
    client: &RosetteClient,
    request: impl Into<DocumentRequest>,
) -> RosetteResult<SentimentResponse> {
    let request = request.into();
    tracing::debug!("analyzing sentiment");

    let envelope = client
        .post_document("sentiment", &request, InputForms::DOCUMENT)
        .await?;
    let result = SentimentResponse::from_envelope(envelope);

    tracing::debug!(
        label = ?result.document.as_ref().map(|d| &d.label),
        "sentiment analysis complete"
    );
    Ok(result)
}
