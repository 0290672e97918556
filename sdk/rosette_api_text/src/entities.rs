//! Entity extraction and linking.
//!
//! ## Example
//!
//! ```rust,no_run
//! # use rosette_api_core::client::RosetteClient;
//! # use rosette_api_core::request::DocumentRequest;
//! # async fn example(client: &RosetteClient) -> rosette_api_core::error::RosetteResult<()> {
//! let request = DocumentRequest::builder()
//!     .content("Bill Murray will appear in new Ghostbusters film.")
//!     .option("calculateConfidence", true)
//!     .build()?;
//!
//! let result = rosette_api_text::entities::extract(client, request).await?;
//! for entity in &result.entities {
//!     println!("{} [{}] {:?}", entity.mention, entity.entity_type, entity.link());
//! }
//! # Ok(())
//! # }
//! ```

use rosette_api_core::client::RosetteClient;
use rosette_api_core::error::RosetteResult;
use rosette_api_core::models::EntityType;
use rosette_api_core::request::{DocumentRequest, InputForms};
use rosette_api_core::response::{records, RosetteResponse, TypedResponse};
use serde::Serialize;

use crate::models::RosetteEntity;

/// Result of [`extract`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitiesResponse {
    pub entities: Vec<RosetteEntity>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl EntitiesResponse {
    /// Entities of the given type, in document order.
    pub fn of_type<'a>(
        &'a self,
        entity_type: &'a EntityType,
    ) -> impl Iterator<Item = &'a RosetteEntity> + 'a {
        self.entities
            .iter()
            .filter(move |e| &e.entity_type == entity_type)
    }
}

impl TypedResponse for EntitiesResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        Self {
            entities: records(envelope.content(), "entities"),
            envelope,
        }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// Extract entities from a document.
///
/// # Tracing
///
/// Emits a span named `rosette::entities::extract`.
#[tracing::instrument(name = "rosette::entities::extract", skip(client, request))]
pub async fn extract(
    client: &RosetteClient,
    request: impl Into<DocumentRequest>,
) -> RosetteResult<EntitiesResponse> {
    let request = request.into();
    tracing::debug!("extracting entities");

    let envelope = client
        .post_document("entities", &request, InputForms::DOCUMENT)
        .await?;
    let result = EntitiesResponse::from_envelope(envelope);

    tracing::debug!(count = result.entities.len(), "entity extraction complete");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_mock_client;
    use rosette_api_core::models::{IdentifierKind, TemporalKind};
    use rosette_api_core::RosetteError;
    use serde_json::json;
    use tracing_test::traced_test;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_extract_conflict_is_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/entities"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "code": "incompatibleClientVersion",
                "message": "the client version is not compatible"
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let err = extract(&client, "content").await.expect_err("should fail");

        assert_eq!(err.status(), Some(409));
        assert!(matches!(err, RosetteError::Api { .. }));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_extract_projects_entity_variants() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/entities"))
            .and(body_json(json!({
                "content": "Bill Murray called 555-1212 on Tuesday.",
                "options": {"linkEntities": true}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entities": [
                    {"type": "PERSON", "mention": "Bill Murray", "normalized": "Bill Murray",
                     "count": 1, "entityId": "Q29250"},
                    {"type": "IDENTIFIER:PHONE_NUMBER", "mention": "555-1212", "count": 1,
                     "entityId": "T1"},
                    {"type": "TEMPORAL:DATE", "mention": "Tuesday", "count": 1, "entityId": "T2"},
                    {"type": "FOOD", "mention": "pie", "count": 1, "entityId": "T3"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        client.set_option("linkEntities", true);

        let result = extract(&client, "Bill Murray called 555-1212 on Tuesday.")
            .await
            .expect("should succeed");

        assert_eq!(result.entities.len(), 4);
        assert_eq!(result.entities[0].entity_type, EntityType::Person);
        assert_eq!(
            result.entities[0].link().as_deref(),
            Some("http://www.wikidata.org/wiki/Q29250")
        );
        assert_eq!(
            result.entities[1].entity_type,
            EntityType::Identifier(IdentifierKind::PhoneNumber)
        );
        assert_eq!(result.entities[1].link(), None);
        assert_eq!(
            result.entities[2].entity_type,
            EntityType::Temporal(TemporalKind::Date)
        );
        assert_eq!(
            result.entities[3].entity_type,
            EntityType::Unrecognized("FOOD".into())
        );
        assert_eq!(result.of_type(&EntityType::Person).count(), 1);
        assert!(logs_contain("entity extraction complete"));
    }

    #[tokio::test]
    async fn test_extract_keeps_entity_with_null_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/entities"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entities": [
                    {"type": "PERSON", "mention": "Bill Murray", "entityId": null, "count": 1},
                    {"type": "LOCATION", "mention": "Boston", "entityId": "Q100", "count": "two"}
                ]
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let result = extract(&client, "Bill Murray in Boston")
            .await
            .expect("should succeed");

        assert_eq!(result.entities.len(), 2);
        assert_eq!(result.entities[0].mention, "Bill Murray");
        assert_eq!(result.entities[0].entity_type, EntityType::Person);
        assert_eq!(result.entities[0].entity_id.as_str(), "");
        assert_eq!(result.entities[0].link(), None);
        assert_eq!(result.entities[0].count, Some(1));
        assert_eq!(result.entities[1].count, None);
        assert_eq!(result.entities[1].entity_id.as_str(), "Q100");
    }

    #[tokio::test]
    async fn test_extract_sends_request_url_parameters() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/entities"))
            .and(query_param("output", "rosette"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"entities": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let request = DocumentRequest::builder()
            .content("Bill Murray")
            .url_parameter("output", "rosette")
            .build()
            .expect("valid");

        let result = extract(&client, request).await.expect("should succeed");
        assert!(result.entities.is_empty());
    }

    #[tokio::test]
    async fn test_extract_rejects_missing_content_without_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let err = extract(&client, DocumentRequest::default())
            .await
            .expect_err("should fail");
        assert_eq!(err.to_string(), "Must supply one of Content or ContentUri");
        assert!(err.is_client_side());
    }

    #[tokio::test]
    async fn test_extract_equality_compares_fields_and_json() {
        let server = MockServer::start().await;

        let body = json!({"entities": [{"type": "LOCATION", "mention": "Boston", "entityId": "Q100"}]});
        Mock::given(method("POST"))
            .and(path("/entities"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let first = extract(&client, "Boston").await.expect("should succeed");
        let second = extract(&client, "Boston").await.expect("should succeed");

        assert_eq!(first.entities, second.entities);
        assert_eq!(first.to_json(), second.to_json());
        assert_eq!(first.to_json()["entities"][0]["type"], "LOCATION");
    }
}
