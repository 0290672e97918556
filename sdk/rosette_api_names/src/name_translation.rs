//! Name translation between languages and scripts.
//!
//! ## Example
//!
//! ```rust,no_run
//! # use rosette_api_core::client::RosetteClient;
//! use rosette_api_core::models::EntityType;
//! use rosette_api_names::name_translation::{self, NameTranslationRequest};
//!
//! # async fn example(client: &RosetteClient) -> rosette_api_core::error::RosetteResult<()> {
//! let request = NameTranslationRequest::builder()
//!     .name("معمر محمد أبو منيار القذاف")
//!     .target_language("eng")
//!     .entity_type(EntityType::Person)
//!     .target_scheme("IC")
//!     .build()?;
//!
//! let result = name_translation::translate(client, &request).await?;
//! println!("{:?}", result.translation);
//! # Ok(())
//! # }
//! ```

use rosette_api_core::client::RosetteClient;
use rosette_api_core::error::{RosetteError, RosetteResult};
use rosette_api_core::models::EntityType;
use rosette_api_core::response::{field, RosetteResponse, TypedResponse};
use serde::Serialize;

/// A request to translate a name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameTranslationRequest {
    pub name: String,
    /// ISO 639-3 code of the language to translate into.
    pub target_language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language_of_origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language_of_use: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_script: Option<String>,
    /// Transliteration scheme, e.g. `IC` or `BGN`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_scheme: Option<String>,
}

/// Builder for [`NameTranslationRequest`].
#[derive(Debug, Default)]
pub struct NameTranslationRequestBuilder {
    name: Option<String>,
    target_language: Option<String>,
    entity_type: Option<EntityType>,
    source_script: Option<String>,
    source_language_of_origin: Option<String>,
    source_language_of_use: Option<String>,
    target_script: Option<String>,
    target_scheme: Option<String>,
}

impl NameTranslationRequest {
    pub fn builder() -> NameTranslationRequestBuilder {
        NameTranslationRequestBuilder::default()
    }
}

impl NameTranslationRequestBuilder {
    /// **Required.**
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// **Required.**
    pub fn target_language(mut self, language: impl Into<String>) -> Self {
        self.target_language = Some(language.into());
        self
    }

    pub fn entity_type(mut self, entity_type: EntityType) -> Self {
        self.entity_type = Some(entity_type);
        self
    }

    pub fn source_script(mut self, script: impl Into<String>) -> Self {
        self.source_script = Some(script.into());
        self
    }

    pub fn source_language_of_origin(mut self, language: impl Into<String>) -> Self {
        self.source_language_of_origin = Some(language.into());
        self
    }

    pub fn source_language_of_use(mut self, language: impl Into<String>) -> Self {
        self.source_language_of_use = Some(language.into());
        self
    }

    pub fn target_script(mut self, script: impl Into<String>) -> Self {
        self.target_script = Some(script.into());
        self
    }

    pub fn target_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.target_scheme = Some(scheme.into());
        self
    }

    pub fn build(self) -> RosetteResult<NameTranslationRequest> {
        let name = self
            .name
            .ok_or_else(|| RosetteError::Builder("name is required".into()))?;
        if name.trim().is_empty() {
            return Err(RosetteError::Builder("name cannot be empty".into()));
        }

        let target_language = self
            .target_language
            .ok_or_else(|| RosetteError::Builder("target_language is required".into()))?;
        if target_language.trim().is_empty() {
            return Err(RosetteError::Builder(
                "target_language cannot be empty".into(),
            ));
        }

        Ok(NameTranslationRequest {
            name,
            target_language,
            entity_type: self.entity_type,
            source_script: self.source_script,
            source_language_of_origin: self.source_language_of_origin,
            source_language_of_use: self.source_language_of_use,
            target_script: self.target_script,
            target_scheme: self.target_scheme,
        })
    }
}

/// Result of [`translate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameTranslationResponse {
    pub translation: Option<String>,
    pub target_language: Option<String>,
    pub target_script: Option<String>,
    pub target_scheme: Option<String>,
    pub source_script: Option<String>,
    pub source_language_of_origin: Option<String>,
    pub source_language_of_use: Option<String>,
    pub confidence: Option<f64>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl TypedResponse for NameTranslationResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        let content = envelope.content();
        Self {
            translation: field(content, "translation"),
            target_language: field(content, "targetLanguage"),
            target_script: field(content, "targetScript"),
            target_scheme: field(content, "targetScheme"),
            source_script: field(content, "sourceScript"),
            source_language_of_origin: field(content, "sourceLanguageOfOrigin"),
            source_language_of_use: field(content, "sourceLanguageOfUse"),
            confidence: field(content, "confidence"),
            envelope,
        }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// Translate a name into the target language.
#[tracing::instrument(
    name = "rosette::name_translation::translate",
    skip(client, request),
    fields(target_language = %request.target_language)
)]
pub async fn translate(
    client: &RosetteClient,
    request: &NameTranslationRequest,
) -> RosetteResult<NameTranslationResponse> {
    tracing::debug!("translating name");

    let envelope = client.post("name-translation", request, &[]).await?;
    let result = NameTranslationResponse::from_envelope(envelope);

    tracing::debug!(confidence = ?result.confidence, "name translation complete");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_mock_client;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_request_serialization_minimal() {
        let request = NameTranslationRequest::builder()
            .name("Юрий Гагарин")
            .target_language("eng")
            .build()
            .expect("valid request");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, json!({"name": "Юрий Гагарин", "targetLanguage": "eng"}));
    }

    #[test]
    fn test_builder_requires_name_and_target_language() {
        let err = NameTranslationRequest::builder()
            .target_language("eng")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("name is required"));

        let err = NameTranslationRequest::builder()
            .name("Юрий Гагарин")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("target_language is required"));

        let err = NameTranslationRequest::builder()
            .name("Юрий Гагарин")
            .target_language(" ")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("target_language cannot be empty"));
    }

    #[tokio::test]
    async fn test_translate() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/name-translation"))
            .and(body_json(json!({
                "name": "معمر محمد أبو منيار القذاف",
                "targetLanguage": "eng",
                "entityType": "PERSON",
                "targetScript": "Latn",
                "targetScheme": "IC"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sourceScript": "Arab",
                "sourceLanguageOfOrigin": "ara",
                "sourceLanguageOfUse": "ara",
                "translation": "Mu'ammar Muhammad Abu-Minyar al-Qadhaf",
                "targetLanguage": "eng",
                "targetScript": "Latn",
                "targetScheme": "IC",
                "confidence": 0.06
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let request = NameTranslationRequest::builder()
            .name("معمر محمد أبو منيار القذاف")
            .target_language("eng")
            .entity_type(EntityType::Person)
            .target_script("Latn")
            .target_scheme("IC")
            .build()
            .expect("valid request");

        let result = translate(&client, &request).await.expect("should succeed");
        assert_eq!(
            result.translation.as_deref(),
            Some("Mu'ammar Muhammad Abu-Minyar al-Qadhaf")
        );
        assert_eq!(result.source_script.as_deref(), Some("Arab"));
        assert_eq!(result.confidence, Some(0.06));
    }
}
