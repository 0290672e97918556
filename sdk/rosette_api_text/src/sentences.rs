//! Sentence segmentation.

use rosette_api_core::client::RosetteClient;
use rosette_api_core::error::RosetteResult;
use rosette_api_core::request::{DocumentRequest, InputForms};
use rosette_api_core::response::{field_or_default, RosetteResponse, TypedResponse};
use serde::Serialize;

/// Result of [`split`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentencesResponse {
    pub sentences: Vec<String>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl TypedResponse for SentencesResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        Self {
            sentences: field_or_default(envelope.content(), "sentences"),
            envelope,
        }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// Split a document into sentences.
#[tracing::instrument(name = "rosette::sentences::split", skip(client, request))]
pub async fn split(
    client: &RosetteClient,
    request: impl Into<DocumentRequest>,
) -> RosetteResult<SentencesResponse> {
    let request = request.into();
    tracing::debug!("splitting sentences");

    let envelope = client
        .post_document("sentences", &request, InputForms::DOCUMENT)
        .await?;
    let result = SentencesResponse::from_envelope(envelope);

    tracing::debug!(count = result.sentences.len(), "sentence split complete");
    Ok(result)
}
