//! Names and addresses shared by the matching endpoints.

use rosette_api_core::models::EntityType;
use serde::{Deserialize, Serialize};

/// A name to match, translate or deduplicate.
///
/// Only `text` is required. The other attributes help the matcher and are
/// omitted from the request when unset.
///
/// ```rust
/// use rosette_api_core::models::EntityType;
/// use rosette_api_names::models::Name;
///
/// let name = Name::new("Влади́мир Влади́мирович Пу́тин")
///     .with_entity_type(EntityType::Person)
///     .with_language("rus");
/// assert_eq!(name.text, "Влади́мир Влади́мирович Пу́тин");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
    /// ISO 639-3 language code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// ISO 15924 script code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl Name {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_entity_type(mut self, entity_type: EntityType) -> Self {
        self.entity_type = Some(entity_type);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Name {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// An address broken into components. Every component is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldedAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staircase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suburb: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub island: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub po_box: Option<String>,
}

impl FieldedAddress {
    /// True if no component is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// An address, either as a single string or as components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Address {
    Unfielded { address: String },
    Fielded(FieldedAddress),
}

impl Address {
    pub fn unfielded(address: impl Into<String>) -> Self {
        Self::Unfielded {
            address: address.into(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Self::Unfielded { address } => address.trim().is_empty(),
            Self::Fielded(fields) => fields.is_empty(),
        }
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self::unfielded(address)
    }
}

impl From<FieldedAddress> for Address {
    fn from(fields: FieldedAddress) -> Self {
        Self::Fielded(fields)
    }
}
