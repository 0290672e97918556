//! Record similarity: score pairs of multi-field records.
//!
//! A request declares the fields to compare with their types and weights,
//! then supplies `left` and `right` record lists. Every left record is
//! scored against every right record.
//!
//! ## Example
//!
//! ```rust,no_run
//! # use rosette_api_core::client::RosetteClient;
//! use rosette_api_names::record_similarity::{
//!     self, FieldedDate, Record, RecordField, RecordFieldType, RecordSimilarityRequest,
//! };
//!
//! # async fn example(client: &RosetteClient) -> rosette_api_core::error::RosetteResult<()> {
//! let left = Record::from([
//!     ("primaryName".to_string(), RecordField::from("Ethan R")),
//!     ("dob".to_string(), RecordField::Date(FieldedDate::new("1993-04-16"))),
//! ]);
//! let right = Record::from([
//!     ("primaryName".to_string(), RecordField::from("Ethan Rose")),
//!     ("dob".to_string(), RecordField::Date(FieldedDate::new("1993-04-16"))),
//! ]);
//!
//! let request = RecordSimilarityRequest::builder()
//!     .field("primaryName", RecordFieldType::Name, 0.5)
//!     .field("dob", RecordFieldType::Date, 0.2)
//!     .threshold(0.7)
//!     .left(left)
//!     .right(right)
//!     .build()?;
//!
//! let result = record_similarity::score(client, &request).await?;
//! for r in &result.results {
//!     println!("{:?}", r.score);
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use rosette_api_core::client::RosetteClient;
use rosette_api_core::error::{RosetteError, RosetteResult};
use rosette_api_core::models::EntityType;
use rosette_api_core::response::{field, records, RosetteResponse, TypedResponse};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::FieldedAddress;

/// How the service compares a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordFieldType {
    #[serde(rename = "rni_name")]
    Name,
    #[serde(rename = "rni_date")]
    Date,
    #[serde(rename = "rni_address")]
    Address,
    #[serde(rename = "rni_string")]
    String,
    #[serde(rename = "rni_number")]
    Number,
    #[serde(rename = "rni_boolean")]
    Boolean,
}

/// Declaration of one comparable field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordFieldSpec {
    #[serde(rename = "type")]
    pub field_type: RecordFieldType,
    pub weight: f64,
}

/// A name value with optional matching hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldedName {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_of_origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
}

impl FieldedName {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
            language_of_origin: None,
            script: None,
            entity_type: None,
        }
    }
}

/// A date value, optionally with its format (e.g. `MM/dd/yyyy`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldedDate {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl FieldedDate {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            format: None,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// The value of one field in a record.
///
/// Serialized without a tag; a plain string is sent as-is and the service
/// interprets it according to the field's declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordField {
    Name(FieldedName),
    Date(FieldedDate),
    Address(FieldedAddress),
    Text(String),
    Number(f64),
    Boolean(bool),
}

impl From<&str> for RecordField {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for RecordField {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for RecordField {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for RecordField {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// One record: field name to value.
pub type Record = BTreeMap<String, RecordField>;

/// Scoring properties.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSimilarityProperties {
    /// Pairs scoring below this are dropped from the results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_explain_info: Option<bool>,
}

/// The two sides to compare.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RecordSimilarityRecords {
    pub left: Vec<Record>,
    pub right: Vec<Record>,
}

/// A request to score records against each other.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSimilarityRequest {
    pub fields: BTreeMap<String, RecordFieldSpec>,
    pub properties: RecordSimilarityProperties,
    pub records: RecordSimilarityRecords,
}

/// Builder for [`RecordSimilarityRequest`].
#[derive(Debug, Default)]
pub struct RecordSimilarityRequestBuilder {
    fields: BTreeMap<String, RecordFieldSpec>,
    properties: RecordSimilarityProperties,
    records: RecordSimilarityRecords,
}

impl RecordSimilarityRequest {
    pub fn builder() -> RecordSimilarityRequestBuilder {
        RecordSimilarityRequestBuilder::default()
    }
}

impl RecordSimilarityRequestBuilder {
    /// Declare a field. **At least one is required.**
    pub fn field(mut self, name: impl Into<String>, field_type: RecordFieldType, weight: f64) -> Self {
        self.fields
            .insert(name.into(), RecordFieldSpec { field_type, weight });
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.properties.threshold = Some(threshold);
        self
    }

    pub fn include_explain_info(mut self, include: bool) -> Self {
        self.properties.include_explain_info = Some(include);
        self
    }

    /// Append a record to the left side.
    pub fn left(mut self, record: Record) -> Self {
        self.records.left.push(record);
        self
    }

    /// Append a record to the right side.
    pub fn right(mut self, record: Record) -> Self {
        self.records.right.push(record);
        self
    }

    pub fn build(self) -> RosetteResult<RecordSimilarityRequest> {
        if self.fields.is_empty() {
            return Err(RosetteError::Builder("at least one field is required".into()));
        }

        if let Some((name, _)) = self
            .fields
            .iter()
            .find(|(_, spec)| !spec.weight.is_finite() || spec.weight < 0.0)
        {
            return Err(RosetteError::Builder(format!(
                "weight of field '{name}' must be a non-negative number"
            )));
        }

        if let Some(threshold) = self.properties.threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(RosetteError::Builder(
                    "threshold must be between 0.0 and 1.0".into(),
                ));
            }
        }

        if self.records.left.is_empty() || self.records.right.is_empty() {
            return Err(RosetteError::Builder(
                "left and right records cannot be empty".into(),
            ));
        }

        let undeclared = self
            .records
            .left
            .iter()
            .chain(&self.records.right)
            .flat_map(|record| record.keys())
            .find(|key| !self.fields.contains_key(*key));
        if let Some(key) = undeclared {
            return Err(RosetteError::Builder(format!(
                "record field '{key}' is not declared"
            )));
        }

        Ok(RecordSimilarityRequest {
            fields: self.fields,
            properties: self.properties,
            records: self.records,
        })
    }
}

/// Score of one left/right pair.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordSimilarityResult {
    pub score: Option<f64>,
    pub left: Map<String, Value>,
    pub right: Map<String, Value>,
    /// Per-field breakdown, present with `include_explain_info`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain_info: Option<Value>,
    /// Set instead of a score when this pair could not be compared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of [`score`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSimilarityResponse {
    pub results: Vec<RecordSimilarityResult>,
    pub info: Option<String>,
    pub error_message: Option<String>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl TypedResponse for RecordSimilarityResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        let content = envelope.content();
        Self {
            results: records(content, "results"),
            info: field(content, "info"),
            error_message: field(content, "errorMessage"),
            envelope,
        }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// Score every left record against every right record.
#[tracing::instrument(name = "rosette::record_similarity::score", skip(client, request))]
pub async fn score(
    client: &RosetteClient,
    request: &RecordSimilarityRequest,
) -> RosetteResult<RecordSimilarityResponse> {
    tracing::debug!(
        left = request.records.left.len(),
        right = request.records.right.len(),
        "scoring record similarity"
    );

    let envelope = client.post("record-similarity", request, &[]).await?;
    let result = RecordSimilarityResponse::from_envelope(envelope);

    if let Some(message) = &result.error_message {
        tracing::warn!(%message, "record similarity reported an error");
    }
    tracing::debug!(count = result.results.len(), "record similarity complete");
    Ok(result)
}
