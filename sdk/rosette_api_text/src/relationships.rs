//! Relationship extraction.
//!
//! The service reports each relationship's arguments as numbered keys
//! (`arg1`, `arg1Id`, `arg2`, ...). They are collected into
//! [`RosetteRelationship::arguments`] and [`RosetteRelationship::argument_ids`]
//! keyed by argument number.

use std::collections::BTreeMap;

use rosette_api_core::client::RosetteClient;
use rosette_api_core::error::RosetteResult;
use rosette_api_core::models::EntityId;
use rosette_api_core::request::{DocumentRequest, InputForms};
use rosette_api_core::response::{field, field_or_default, RosetteResponse, TypedResponse};
use serde::Serialize;
use serde_json::{Map, Value};

/// One extracted relationship.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosetteRelationship {
    pub predicate: Option<String>,
    pub predicate_id: Option<String>,
    /// Argument text by argument number.
    pub arguments: BTreeMap<u32, String>,
    /// Linked entity id by argument number, for arguments that were linked.
    pub argument_ids: BTreeMap<u32, EntityId>,
    pub temporals: Vec<String>,
    pub locatives: Vec<String>,
    pub adjuncts: Vec<String>,
    pub confidence: Option<f64>,
    /// e.g. `assertion`, `belief`, `negation`.
    pub modalities: Vec<String>,
}

impl RosetteRelationship {
    /// Project one relationship object.
    fn from_object(obj: &Map<String, Value>) -> Self {
        let mut arguments = BTreeMap::new();
        let mut argument_ids = BTreeMap::new();

        for (key, value) in obj {
            let Some(rest) = key.strip_prefix("arg") else {
                continue;
            };
            let Value::String(text) = value else {
                continue;
            };
            if let Some(n) = rest.strip_suffix("Id").and_then(|n| n.parse::<u32>().ok()) {
                argument_ids.insert(n, EntityId::new(text.clone()));
            } else if let Ok(n) = rest.parse::<u32>() {
                arguments.insert(n, text.clone());
            }
        }

        Self {
            predicate: field(obj, "predicate"),
            predicate_id: field(obj, "predicateId"),
            arguments,
            argument_ids,
            temporals: field_or_default(obj, "temporals"),
            locatives: field_or_default(obj, "locatives"),
            adjuncts: field_or_default(obj, "adjuncts"),
            confidence: field(obj, "confidence"),
            modalities: field_or_default(obj, "modalities"),
        }
    }

    /// Text of argument `n` (1-based).
    pub fn argument(&self, n: u32) -> Option<&str> {
        self.arguments.get(&n).map(String::as_str)
    }
}

/// Result of [`extract`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipsResponse {
    pub relationships: Vec<RosetteRelationship>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl TypedResponse for RelationshipsResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        let relationships = field_or_default::<Vec<Value>>(envelope.content(), "relationships")
            .iter()
            .filter_map(Value::as_object)
            .map(RosetteRelationship::from_object)
            .collect();

        Self {
            relationships,
            envelope,
        }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// Extract relationships between entities in a document.
#[tracing::instrument(name = "rosette::relationships::extract", skip(client, request))]
pub async fn extract(
    client: &RosetteClient,
    request: impl Into<DocumentRequest>,
) -> RosetteResult<RelationshipsResponse> {
    let request = request.into();
    tracing::debug!("extracting relationships");

    let envelope = client
        .post_document("relationships", &request, InputForms::DOCUMENT)
        .await?;
    let result = RelationshipsResponse::from_envelope(envelope);

    tracing::debug!(count = result.relationships.len(), "relationship extraction complete");
    Ok(result)
}
