//! Syntactic dependency parsing.

use rosette_api_core::client::RosetteClient;
use rosette_api_core::error::RosetteResult;
use rosette_api_core::request::{DocumentRequest, InputForms};
use rosette_api_core::response::{field_or_default, records, RosetteResponse, TypedResponse};
use serde::{Deserialize, Serialize};

/// A labelled arc between two tokens.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dependency {
    /// Universal Dependencies label, e.g. `nsubj`.
    pub dependency_type: String,
    /// Index of the head token; `-1` for the root.
    pub governor_token_index: i64,
    pub dependent_token_index: i64,
}

/// Dependencies within one sentence, with the sentence's token range.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SentenceWithDependencies {
    pub start_token_index: u32,
    pub end_token_index: u32,
    pub dependencies: Vec<Dependency>,
}

/// Result of [`dependencies`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntaxDependenciesResponse {
    pub sentences: Vec<SentenceWithDependencies>,
    pub tokens: Vec<String>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl SyntaxDependenciesResponse {
    /// Token text at `index`, resolving dependency indices.
    pub fn token(&self, index: i64) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.tokens.get(i))
            .map(String::as_str)
    }
}

impl TypedResponse for SyntaxDependenciesResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        let content = envelope.content();
        Self {
            sentences: records(content, "sentences"),
            tokens: field_or_default(content, "tokens"),
            envelope,
        }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// Parse the syntactic dependencies of a document.
#[tracing::instrument(name = "rosette::syntax::dependencies", skip(client, request))]
pub async fn dependencies(
    client: &RosetteClient,
    request: impl Into<DocumentRequest>,
) -> RosetteResult<SyntaxDependenciesResponse> {
    let request = request.into();
    tracing::debug!("parsing dependencies");

    let envelope = client
        .post_document("syntax/dependencies", &request, InputForms::DOCUMENT)
        .await?;
    let result = SyntaxDependenciesResponse::from_envelope(envelope);

    tracing::debug!(sentences = result.sentences.len(), "dependency parse complete");
    Ok(result)
}
