//! Transliteration between scripts. Only inline content is accepted.

use rosette_api_core::client::RosetteClient;
use rosette_api_core::error::RosetteResult;
use rosette_api_core::request::{DocumentRequest, InputForms};
use rosette_api_core::response::{field, RosetteResponse, TypedResponse};
use serde::Serialize;

/// Result of [`transliterate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransliterationResponse {
    pub transliteration: Option<String>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl TypedResponse for TransliterationResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        Self {
            transliteration: field(envelope.content(), "transliteration"),
            envelope,
        }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// Transliterate text into the script the service picks for its language.
#[tracing::instrument(name = "rosette::transliteration::transliterate", skip(client, request))]
pub async fn transliterate(
    client: &RosetteClient,
    request: impl Into<DocumentRequest>,
) -> RosetteResult<TransliterationResponse> {
    let request = request.into();
    tracing::debug!("transliterating");

    let envelope = client
        .post_document("transliteration", &request, InputForms::TEXT_ONLY)
        .await?;
    Ok(TransliterationResponse::from_envelope(envelope))
}
