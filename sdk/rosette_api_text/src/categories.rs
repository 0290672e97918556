//! Document categorization.
//!
//! ## Example
//!
//! ```rust,no_run
//! # use rosette_api_core::client::RosetteClient;
//! # async fn example(client: &RosetteClient) -> rosette_api_core::error::RosetteResult<()> {
//! let result = rosette_api_text::categories::categorize(
//!     client,
//!     "Sony Pictures is planning to shoot a good portion of the new \"Ghostbusters\" in Boston.",
//! )
//! .await?;
//! for category in &result.categories {
//!     println!("{} ({:.2})", category.label, category.confidence.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

use rosette_api_core::client::RosetteClient;
use rosette_api_core::error::RosetteResult;
use rosette_api_core::request::{DocumentRequest, InputForms};
use rosette_api_core::response::{records, RosetteResponse, TypedResponse};
use serde::{Deserialize, Serialize};

/// One category assigned to the document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosetteCategory {
    /// Category label, e.g. `ARTS_AND_ENTERTAINMENT`.
    pub label: String,
    pub confidence: Option<f64>,
    /// Raw classifier score.
    pub score: Option<f64>,
}

/// Result of [`categorize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<RosetteCategory>,
    #[serde(skip)]
    envelope: RosetteResponse,
}

impl TypedResponse for CategoriesResponse {
    fn from_envelope(envelope: RosetteResponse) -> Self {
        Self {
            categories: records(envelope.content(), "categories"),
            envelope,
        }
    }

    fn envelope(&self) -> &RosetteResponse {
        &self.envelope
    }
}

/// Categorize a document.
///
/// # Tracing
///
/// Emits a span named `rosette::categories::categorize`.
#[tracing::instrument(name = "rosette::categories::categorize", skip(client, request))]
pub async fn categorize(
    client: &RosetteClient,
    request: impl Into<DocumentRequest>,
) -> RosetteResult<CategoriesResponse> {
    let request = request.into();
    tracing::debug!("categorizing document");

    let envelope = client
        .post_document("categories", &request, InputForms::DOCUMENT)
        .await?;
    let result = CategoriesResponse::from_envelope(envelope);

    tracing::debug!(count = result.categories.len(), "categorization complete");
    Ok(result)
}
