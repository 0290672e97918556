//! Tokenization.

use rosette_api_core::client::RosetteClient;
use rosette_api_core::error::RosetteResult;
use rosette_api_core::request::{DocumentRequest, InputForms};
use rosette_api_core::response::{field_or_default, RosetteResponse, TypedResponse};
use serde::Serialize;

/// Result of [`tokenize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokensResponse {
    pub tokens: Vec<String>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl TypedResponse for TokensResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        Self {
            tokens: field_or_default(envelope.content(), "tokens"),
            envelope,
        }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// Split a document into tokens.
#[tracing::instrument(name = "rosette::tokens::tokenize", skip(client, request))]
pub async fn tokenize(
    client: &RosetteClient,
    request: impl Into<DocumentRequest>,
) -> RosetteResult<TokensResponse> {
    let request = request.into();
    tracing::debug!("tokenizing");

    let envelope = client
        .post_document("tokens", &request, InputForms::DOCUMENT)
        .await?;
    let result = TokensResponse::from_envelope(envelope);

    tracing::debug!(count = result.tokens.len(), "tokenization complete");
    Ok(result)
}
