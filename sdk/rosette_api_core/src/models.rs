//! Field models shared across the Rosette crates.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Prefix of Wikidata QIDs.
const WIKIDATA_PREFIX: char = 'Q';

/// Base URL for Wikidata entity pages.
pub const WIKIDATA_BASE_URL: &str = "http://www.wikidata.org/wiki/";

/// Identifier of a resolved entity.
///
/// Linked entities carry a Wikidata QID (`Q76`); unlinked ones carry a
/// server-local id such as `T0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wikidata page for this entity, when the id is a QID.
    pub fn link(&self) -> Option<String> {
        self.0
            .starts_with(WIKIDATA_PREFIX)
            .then(|| format!("{WIKIDATA_BASE_URL}{}", self.0))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier sub-types (`IDENTIFIER:*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    CreditCardNum,
    Email,
    Money,
    PersonalIdNum,
    PhoneNumber,
    Url,
    Distance,
    LatitudeLongitude,
}

/// Temporal sub-types (`TEMPORAL:*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    Date,
    Time,
}

/// Type of an extracted entity or a name.
///
/// Serialized as the wire string, e.g. `PERSON` or `IDENTIFIER:EMAIL`.
/// Strings outside the known set are kept in
/// [`Unrecognized`](Self::Unrecognized).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityType {
    Location,
    Organization,
    Person,
    Product,
    Title,
    Nationality,
    Religion,
    Identifier(IdentifierKind),
    Temporal(TemporalKind),
    Unrecognized(String),
}

const TYPE_TABLE: &[(&str, EntityType)] = &[
    ("LOCATION", EntityType::Location),
    ("ORGANIZATION", EntityType::Organization),
    ("PERSON", EntityType::Person),
    ("PRODUCT", EntityType::Product),
    ("TITLE", EntityType::Title),
    ("NATIONALITY", EntityType::Nationality),
    ("RELIGION", EntityType::Religion),
    (
        "IDENTIFIER:CREDIT_CARD_NUM",
        EntityType::Identifier(IdentifierKind::CreditCardNum),
    ),
    ("IDENTIFIER:EMAIL", EntityType::Identifier(IdentifierKind::Email)),
    ("IDENTIFIER:MONEY", EntityType::Identifier(IdentifierKind::Money)),
    (
        "IDENTIFIER:PERSONAL_ID_NUM",
        EntityType::Identifier(IdentifierKind::PersonalIdNum),
    ),
    (
        "IDENTIFIER:PHONE_NUMBER",
        EntityType::Identifier(IdentifierKind::PhoneNumber),
    ),
    ("IDENTIFIER:URL", EntityType::Identifier(IdentifierKind::Url)),
    (
        "IDENTIFIER:DISTANCE",
        EntityType::Identifier(IdentifierKind::Distance),
    ),
    (
        "IDENTIFIER:LATITUDE_LONGITUDE",
        EntityType::Identifier(IdentifierKind::LatitudeLongitude),
    ),
    ("TEMPORAL:DATE", EntityType::Temporal(TemporalKind::Date)),
    ("TEMPORAL:TIME", EntityType::Temporal(TemporalKind::Time)),
];

impl EntityType {
    /// Look up a wire string in the closed set of known types.
    pub fn parse(raw: &str) -> Self {
        TYPE_TABLE
            .iter()
            .find(|(name, _)| *name == raw)
            .map(|(_, t)| t.clone())
            .unwrap_or_else(|| Self::Unrecognized(raw.to_string()))
    }

    /// The wire string for this type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unrecognized(raw) => raw,
            known => TYPE_TABLE
                .iter()
                .find(|(_, t)| t == known)
                .map(|(name, _)| *name)
                .unwrap_or_default(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EntityType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntityType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
