//! Language identification.

use rosette_api_core::client::RosetteClient;
use rosette_api_core::error::RosetteResult;
use rosette_api_core::request::{DocumentRequest, InputForms};
use rosette_api_core::response::{records, RosetteResponse, TypedResponse};
use serde::{Deserialize, Serialize};

/// One candidate language.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageDetection {
    /// ISO 639-3 code.
    pub language: String,
    pub confidence: f64,
}

/// Result of [`detect`], candidates in descending confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageResponse {
    pub language_detections: Vec<LanguageDetection>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl LanguageResponse {
    /// The most likely language, if any was detected.
    pub fn best(&self) -> Option<&LanguageDetection> {
        self.language_detections.first()
    }
}

impl TypedResponse for LanguageResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        Self {
            language_detections: records(envelope.content(), "languageDetections"),
            envelope,
        }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// Identify the language of a document.
#[tracing::instrument(name = "rosette::language::detect", skip(client, request))]
pub async fn detect(
    client: &RosetteClient,
    request: impl Into<DocumentRequest>,
) -> RosetteResult<LanguageResponse> {
    let request = request.into();
    tracing::debug!("detecting language");

    let envelope = client
        .post_document("language", &request, InputForms::DOCUMENT)
        .await?;
    let result = LanguageResponse::from_envelope(envelope);

    tracing::debug!(best = ?result.best().map(|d| &d.language), "language detection complete");
    Ok(result)
}
