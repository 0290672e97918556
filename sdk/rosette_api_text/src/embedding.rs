//! Vector endpoints: document embeddings, per-token semantic vectors and
//! similar terms.
//!
//! ## Example
//!
//! ```rust,no_run
//! # use rosette_api_core::client::RosetteClient;
//! # use rosette_api_core::request::DocumentRequest;
//! use rosette_api_text::embedding;
//!
//! # async fn example(client: &RosetteClient) -> rosette_api_core::error::RosetteResult<()> {
//! let request = DocumentRequest::builder()
//!     .content("spy")
//!     .option("resultLanguages", vec!["spa", "deu"])
//!     .option("count", 5)
//!     .build()?;
//! let result = embedding::similar_terms(client, request).await?;
//! for (language, terms) in &result.similar_terms {
//!     println!("{language}: {:?}", terms.iter().map(|t| &t.term).collect::<Vec<_>>());
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use rosette_api_core::client::RosetteClient;
use rosette_api_core::error::RosetteResult;
use rosette_api_core::request::{DocumentRequest, InputForms};
use rosette_api_core::response::{field, field_or_default, RosetteResponse, TypedResponse};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Current key first; older deployments used `embedding`.
fn document_embedding(content: &Map<String, Value>) -> Vec<f64> {
    field(content, "documentEmbedding")
        .or_else(|| field(content, "embedding"))
        .unwrap_or_default()
}

/// Result of [`text_embedding`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEmbeddingResponse {
    pub document_embedding: Vec<f64>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl TypedResponse for TextEmbeddingResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        Self {
            document_embedding: document_embedding(envelope.content()),
            envelope,
        }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// Result of [`semantic_vectors`]. Token vectors are only present when the
/// `perToken` option is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticVectorsResponse {
    pub document_embedding: Vec<f64>,
    pub tokens: Vec<String>,
    pub token_embeddings: Vec<Vec<f64>>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl SemanticVectorsResponse {
    /// Pair each token with its vector.
    pub fn token_vectors(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.tokens
            .iter()
            .map(String::as_str)
            .zip(self.token_embeddings.iter().map(Vec::as_slice))
    }
}

impl TypedResponse for SemanticVectorsResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        let content = envelope.content();
        Self {
            document_embedding: document_embedding(content),
            tokens: field_or_default(content, "tokens"),
            token_embeddings: field_or_default(content, "tokenEmbeddings"),
            envelope,
        }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// A term close to the input in embedding space.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarTerm {
    pub term: String,
    pub similarity: f64,
}

/// Result of [`similar_terms`], keyed by ISO 639-3 language code.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarTermsResponse {
    pub similar_terms: BTreeMap<String, Vec<SimilarTerm>>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl SimilarTermsResponse {
    /// Terms for one language; empty if that language was not returned.
    pub fn for_language(&self, language: &str) -> &[SimilarTerm] {
        self.similar_terms
            .get(language)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl TypedResponse for SimilarTermsResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        Self {
            similar_terms: field_or_default(envelope.content(), "similarTerms"),
            envelope,
        }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// Compute a single embedding for the whole document.
#[tracing::instrument(name = "rosette::embedding::text_embedding", skip(client, request))]
pub async fn text_embedding(
    client: &RosetteClient,
    request: impl Into<DocumentRequest>,
) -> RosetteResult<TextEmbeddingResponse> {
    let request = request.into();
    tracing::debug!("computing text embedding");

    let envelope = client
        .post_document("text-embedding", &request, InputForms::DOCUMENT)
        .await?;
    let result = TextEmbeddingResponse::from_envelope(envelope);

    tracing::debug!(dimensions = result.document_embedding.len(), "text embedding complete");
    Ok(result)
}

/// Compute the document vector and, with `perToken`, one vector per token.
#[tracing::instrument(name = "rosette::embedding::semantic_vectors", skip(client, request))]
pub async fn semantic_vectors(
    client: &RosetteClient,
    request: impl Into<DocumentRequest>,
) -> RosetteResult<SemanticVectorsResponse> {
    let request = request.into();
    tracing::debug!("computing semantic vectors");

    let envelope = client
        .post_document("semantic-vectors", &request, InputForms::DOCUMENT)
        .await?;
    let result = SemanticVectorsResponse::from_envelope(envelope);

    tracing::debug!(
        dimensions = result.document_embedding.len(),
        tokens = result.tokens.len(),
        "semantic vectors complete"
    );
    Ok(result)
}

/// Find terms similar to the input, optionally across `resultLanguages`.
#[tracing::instrument(name = "rosette::embedding::similar_terms", skip(client, request))]
pub async fn similar_terms(
    client: &RosetteClient,
    request: impl Into<DocumentRequest>,
) -> RosetteResult<SimilarTermsResponse> {
    let request = request.into();
    tracing::debug!("finding similar terms");

    let envelope = client
        .post_document("similar-terms", &request, InputForms::DOCUMENT)
        .await?;
    let result = SimilarTermsResponse::from_envelope(envelope);

    tracing::debug!(languages = result.similar_terms.len(), "similar terms complete");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_mock_client;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_text_embedding() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/text-embedding"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"documentEmbedding": [0.1, -0.2, 0.3]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let result = text_embedding(&client, "Cambridge, Massachusetts")
            .await
            .expect("should succeed");

        assert_eq!(result.document_embedding, vec![0.1, -0.2, 0.3]);
    }

    #[tokio::test]
    async fn test_text_embedding_legacy_key() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/text-embedding"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"embedding": [1.0, 2.0]})))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let result = text_embedding(&client, "text").await.expect("should succeed");
        assert_eq!(result.document_embedding, vec![1.0, 2.0]);
    }

    #[tokio::test]
    async fn test_semantic_vectors_per_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/semantic-vectors"))
            .and(body_json(json!({
                "content": "Cambridge Massachusetts",
                "options": {"perToken": true}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "documentEmbedding": [0.5, 0.5],
                "tokens": ["Cambridge", "Massachusetts"],
                "tokenEmbeddings": [[0.4, 0.6], [0.6, 0.4]]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let request = DocumentRequest::builder()
            .content("Cambridge Massachusetts")
            .option("perToken", true)
            .build()
            .expect("valid request");
        let result = semantic_vectors(&client, request)
            .await
            .expect("should succeed");

        let pairs: Vec<_> = result.token_vectors().collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1], ("Massachusetts", &[0.6, 0.4][..]));
    }

    #[tokio::test]
    async fn test_similar_terms_by_language() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/similar-terms"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "similarTerms": {
                    "spa": [{"term": "espía", "similarity": 0.61}],
                    "deu": [{"term": "Spion", "similarity": 0.74}, {"term": "Agent", "similarity": 0.6}]
                }
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let result = similar_terms(&client, "spy").await.expect("should succeed");

        assert_eq!(result.for_language("deu").len(), 2);
        assert_eq!(result.for_language("spa")[0].term, "espía");
        assert!(result.for_language("jpn").is_empty());
    }
}
