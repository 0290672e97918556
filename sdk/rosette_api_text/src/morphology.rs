//! Morphological analysis: lemmas, parts of speech, compound components and
//! Han readings.
//!
//! The [`MorphologyFeature`] selects the URL path; [`MorphologyFeature::Complete`]
//! returns every sub-result.
//!
//! ## Example
//!
//! ```rust,no_run
//! # use rosette_api_core::client::RosetteClient;
//! use rosette_api_text::morphology::{self, MorphologyFeature};
//!
//! # async fn example(client: &RosetteClient) -> rosette_api_core::error::RosetteResult<()> {
//! let text = "The geese went back to get a rest";
//! let result = morphology::analyze(client, text, MorphologyFeature::Lemmas).await?;
//! for item in &result.items {
//!     println!("{} -> {:?}", item.token, item.lemma);
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;

use rosette_api_core::client::RosetteClient;
use rosette_api_core::error::RosetteResult;
use rosette_api_core::request::{DocumentRequest, InputForms};
use rosette_api_core::response::{field_or_default, RosetteResponse, TypedResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Which morphology result to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MorphologyFeature {
    /// All of the below.
    #[default]
    Complete,
    Lemmas,
    PartsOfSpeech,
    CompoundComponents,
    HanReadings,
}

impl MorphologyFeature {
    /// The feature name as the service spells it (`hanReadings`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Lemmas => "lemmas",
            Self::PartsOfSpeech => "partsOfSpeech",
            Self::CompoundComponents => "compoundComponents",
            Self::HanReadings => "hanReadings",
        }
    }

    /// Endpoint path for this feature, e.g. `morphology/han-readings`.
    pub fn path(&self) -> String {
        format!("morphology/{}", hyphenate(self.name()))
    }
}

impl fmt::Display for MorphologyFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Insert a hyphen before every non-leading uppercase letter and lowercase
/// the result: `compoundComponents` -> `compound-components`.
pub fn hyphenate(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push('-');
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Morphology of one token. Fields the requested feature did not cover are
/// `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MorphologyItem {
    pub token: String,
    pub pos_tag: Option<String>,
    pub lemma: Option<String>,
    pub compound_components: Option<Vec<String>>,
    pub han_readings: Option<Vec<String>>,
}

/// Result of [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MorphologyResponse {
    pub items: Vec<MorphologyItem>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl MorphologyResponse {
    /// Tokens in document order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.token.as_str())
    }
}

/// Per-token column; entries may be `null` for tokens without a value.
fn column<T: DeserializeOwned>(content: &Map<String, Value>, key: &str) -> Vec<Option<T>> {
    field_or_default::<Vec<Value>>(content, key)
        .into_iter()
        .map(|v| serde_json::from_value(v).ok())
        .collect()
}

impl TypedResponse for MorphologyResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        let content = envelope.content();
        let tokens = column::<String>(content, "tokens");
        let pos_tags = column::<String>(content, "posTags");
        let lemmas = column::<String>(content, "lemmas");
        let compounds = column::<Vec<String>>(content, "compoundComponents");
        let readings = column::<Vec<String>>(content, "hanReadings");

        let items = tokens
            .into_iter()
            .enumerate()
            .map(|(i, token)| MorphologyItem {
                token: token.unwrap_or_default(),
                pos_tag: pos_tags.get(i).cloned().flatten(),
                lemma: lemmas.get(i).cloned().flatten(),
                compound_components: compounds.get(i).cloned().flatten(),
                han_readings: readings.get(i).cloned().flatten(),
            })
            .collect();

        Self { items, envelope }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// Run morphological analysis for `feature`.
#[tracing::instrument(
    name = "rosette::morphology::analyze",
    skip(client, request, feature),
    fields(feature = %feature)
)]
pub async fn analyze(
    client: &RosetteClient,
    request: impl Into<DocumentRequest>,
    feature: MorphologyFeature,
) -> RosetteResult<MorphologyResponse> {
    let request = request.into();
    tracing::debug!("analyzing morphology");

    let envelope = client
        .post_document(&feature.path(), &request, InputForms::DOCUMENT)
        .await?;
    let result = MorphologyResponse::from_envelope(envelope);

    tracing::debug!(tokens = result.items.len(), "morphology complete");
    Ok(result)
}
