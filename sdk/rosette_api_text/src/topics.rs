//! Key phrase and concept extraction.

use rosette_api_core::client::RosetteClient;
use rosette_api_core::error::RosetteResult;
use rosette_api_core::models::EntityId;
use rosette_api_core::request::{DocumentRequest, InputForms};
use rosette_api_core::response::{records, RosetteResponse, TypedResponse};
use serde::{Deserialize, Serialize};

/// A salient phrase taken verbatim from the document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Keyphrase {
    pub phrase: String,
    pub salience: f64,
}

/// A concept the document is about, which need not appear in it verbatim.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Concept {
    pub phrase: String,
    pub salience: f64,
    pub concept_id: EntityId,
}

/// Result of [`extract`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicsResponse {
    pub keyphrases: Vec<Keyphrase>,
    pub concepts: Vec<Concept>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl TypedResponse for TopicsResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        let content = envelope.content();
        Self {
            keyphrases: records(content, "keyphrases"),
            concepts: records(content, "concepts"),
            envelope,
        }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// Extract key phrases and concepts from a document.
#[tracing::instrument(name = "rosette::topics::extract", skip(client, request))]
pub async fn extract(
    client: &RosetteClient,
    request: impl Into<DocumentRequest>,
) -> RosetteResult<TopicsResponse> {
    let request = request.into();
    tracing::debug!("extracting topics");

    let envelope = client
        .post_document("topics", &request, InputForms::DOCUMENT)
        .await?;
    let result = TopicsResponse::from_envelope(envelope);

    tracing::debug!(
        keyphrases = result.keyphrases.len(),
        concepts = result.concepts.len(),
        "topic extraction complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_mock_client;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_extract_topics() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/topics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "keyphrases": [{"phrase": "Ghostbusters", "salience": 0.97}],
                "concepts": [{"phrase": "Ghostbusters", "salience": 1.0, "conceptId": "Q108745"}]
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let result = extract(&client, "Ghostbusters is a 1984 film.")
            .await
            .expect("should succeed");

        assert_eq!(result.keyphrases[0].phrase, "Ghostbusters");
        assert_eq!(
            result.concepts[0].concept_id.link().as_deref(),
            Some("http://www.wikidata.org/wiki/Q108745")
        );
    }
}
