//! Records shared by several document endpoints.

use rosette_api_core::models::{EntityId, EntityType};
use serde::{Deserialize, Serialize};

/// Character span of one mention in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MentionOffset {
    pub start_offset: u32,
    pub end_offset: u32,
}

/// An entity extracted from a document.
///
/// `entity_type` selects the kind of entity; every kind shares these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RosetteEntity {
    /// The entity as it first appears in the text.
    pub mention: String,
    /// Canonical form of the mention.
    pub normalized: Option<String>,
    pub entity_id: EntityId,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Number of mentions in the document.
    pub count: Option<u32>,
    /// Extraction confidence, requested with the `calculateConfidence` option.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linking_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salience: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mention_offsets: Vec<MentionOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dbpedia_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perm_id: Option<String>,
}

impl Default for RosetteEntity {
    fn default() -> Self {
        Self {
            mention: String::new(),
            normalized: None,
            entity_id: EntityId::default(),
            entity_type: EntityType::Unrecognized(String::new()),
            count: None,
            confidence: None,
            linking_confidence: None,
            salience: None,
            mention_offsets: Vec::new(),
            dbpedia_type: None,
            perm_id: None,
        }
    }
}

impl RosetteEntity {
    /// Wikidata page for the entity, if it was linked.
    pub fn link(&self) -> Option<String> {
        self.entity_id.link()
    }
}

/// A label with its confidence, as used by sentiment results.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfidence {
    pub label: String,
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosette_api_core::models::IdentifierKind;
    use serde_json::json;

    #[test]
    fn entity_deserializes_wire_shape() {
        let entity: RosetteEntity = serde_json::from_value(json!({
            "type": "PERSON",
            "mention": "Bill Murray",
            "normalized": "Bill Murray",
            "count": 2,
            "entityId": "Q29250",
            "mentionOffsets": [{"startOffset": 0, "endOffset": 11}],
            "linkingConfidence": 0.63
        }))
        .expect("should deserialize");

        assert_eq!(entity.entity_type, EntityType::Person);
        assert_eq!(entity.count, Some(2));
        assert_eq!(entity.mention_offsets[0].end_offset, 11);
        assert_eq!(
            entity.link().as_deref(),
            Some("http://www.wikidata.org/wiki/Q29250")
        );
    }

    #[test]
    fn entity_tolerates_missing_fields() {
        let entity: RosetteEntity =
            serde_json::from_value(json!({"type": "IDENTIFIER:EMAIL", "mention": "a@b.c"}))
                .expect("should deserialize");
        assert_eq!(
            entity.entity_type,
            EntityType::Identifier(IdentifierKind::Email)
        );
        assert_eq!(entity.entity_id.as_str(), "");
        assert_eq!(entity.link(), None);
        assert!(entity.mention_offsets.is_empty());
    }
}
