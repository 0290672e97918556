//! Input normalization for document endpoints.
//!
//! Every document endpoint accepts the same kinds of input: inline text, a URL
//! the server fetches itself, a local file uploaded as multipart, or a raw
//! option map passed through verbatim. [`DocumentRequest`] unifies them and
//! [`DocumentRequest::validate`] enforces the content/contentUri exclusion
//! before any request is sent.
//!
//! ```rust
//! use rosette_api_core::request::{DocumentRequest, InputForms};
//!
//! let request = DocumentRequest::builder()
//!     .content("Bill Murray will appear in new Ghostbusters film.")
//!     .language("eng")
//!     .build()
//!     .expect("valid request");
//! assert!(request.validate(InputForms::DOCUMENT).is_ok());
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::error::{RosetteError, RosetteResult};

pub const MISSING_CONTENT: &str = "Must supply one of Content or ContentUri";
pub const CONFLICTING_CONTENT: &str = "Cannot supply both Content and ContentUri";

/// The input forms an endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputForms {
    pub content_uri: bool,
    pub file: bool,
}

impl InputForms {
    /// Inline content, a content URI, or a file upload.
    pub const DOCUMENT: Self = Self {
        content_uri: true,
        file: true,
    };

    /// Inline content only.
    pub const TEXT_ONLY: Self = Self {
        content_uri: false,
        file: false,
    };
}

/// A local file to send as the request content.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl FileUpload {
    /// Create an upload from in-memory bytes.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk.
    ///
    /// The file is read in full and closed before this returns. The MIME type
    /// is guessed from the extension.
    pub async fn read(path: impl AsRef<Path>) -> RosetteResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "content".to_string());

        tracing::debug!(file = %file_name, size = bytes.len(), "read upload file");

        Ok(Self {
            content_type: content_type_for(path).to_string(),
            file_name,
            bytes: Bytes::from(bytes),
        })
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// A request to a document endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentRequest {
    content: Option<String>,
    content_uri: Option<String>,
    language: Option<String>,
    genre: Option<String>,
    options: Map<String, Value>,
    file: Option<FileUpload>,
    extra: Map<String, Value>,
    url_parameters: BTreeMap<String, String>,
}

impl DocumentRequest {
    /// Creates a new builder.
    pub fn builder() -> DocumentRequestBuilder {
        DocumentRequestBuilder::default()
    }

    /// A request for inline text.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// A request for a document the server downloads itself.
    pub fn uri(uri: impl Into<String>) -> Self {
        Self {
            content_uri: Some(uri.into()),
            ..Self::default()
        }
    }

    /// A request uploading the file at `path`.
    pub async fn from_file(path: impl AsRef<Path>) -> RosetteResult<Self> {
        Ok(Self {
            file: Some(FileUpload::read(path).await?),
            ..Self::default()
        })
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn content_uri(&self) -> Option<&str> {
        self.content_uri.as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn file(&self) -> Option<&FileUpload> {
        self.file.as_ref()
    }

    /// Per-request options. These override options set on the client.
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// Per-request URL parameters. These override parameters set on the client.
    pub fn url_parameters(&self) -> &BTreeMap<String, String> {
        &self.url_parameters
    }

    /// Check that exactly one input form is present and that `forms` allows it.
    pub fn validate(&self, forms: InputForms) -> RosetteResult<()> {
        let has_content = self.content.is_some() || self.file.is_some();
        let has_uri = self.content_uri.is_some();

        match (has_content, has_uri) {
            (false, false) => return Err(RosetteError::client(MISSING_CONTENT)),
            (true, true) => return Err(RosetteError::client(CONFLICTING_CONTENT)),
            _ => {}
        }
        if self.content.is_some() && self.file.is_some() {
            return Err(RosetteError::client(
                "Cannot supply both Content and a file upload",
            ));
        }
        if has_uri && !forms.content_uri {
            return Err(RosetteError::client(
                "ContentUri is not supported by this endpoint",
            ));
        }
        if self.file.is_some() && !forms.file {
            return Err(RosetteError::client(
                "File upload is not supported by this endpoint",
            ));
        }
        Ok(())
    }

    /// Assemble the JSON body.
    ///
    /// `client_options` are merged under the request's own options. For file
    /// uploads the content travels in its own multipart part and is not part
    /// of this body.
    pub fn to_body(&self, client_options: &Map<String, Value>) -> Value {
        let mut body = self.extra.clone();

        if let Some(content) = &self.content {
            body.insert("content".into(), Value::String(content.clone()));
        }
        if let Some(uri) = &self.content_uri {
            body.insert("contentUri".into(), Value::String(uri.clone()));
        }
        if let Some(language) = &self.language {
            body.insert("language".into(), Value::String(language.clone()));
        }
        if let Some(genre) = &self.genre {
            body.insert("genre".into(), Value::String(genre.clone()));
        }

        let mut options = client_options.clone();
        options.extend(self.options.clone());
        if !options.is_empty() {
            body.insert("options".into(), Value::Object(options));
        }

        Value::Object(body)
    }
}

impl From<&str> for DocumentRequest {
    fn from(content: &str) -> Self {
        Self::text(content)
    }
}

impl From<String> for DocumentRequest {
    fn from(content: String) -> Self {
        Self::text(content)
    }
}

impl From<FileUpload> for DocumentRequest {
    fn from(file: FileUpload) -> Self {
        Self {
            file: Some(file),
            ..Self::default()
        }
    }
}

/// A raw option map. Known keys are lifted into typed fields; everything else
/// is sent verbatim.
impl From<Map<String, Value>> for DocumentRequest {
    fn from(mut raw: Map<String, Value>) -> Self {
        let mut take_string = |key: &str| match raw.remove(key) {
            Some(Value::String(s)) => Some(s),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };

        let content = take_string("content");
        let content_uri = take_string("contentUri");
        let language = take_string("language");
        let genre = take_string("genre");
        let options = match raw.remove("options") {
            Some(Value::Object(map)) => map,
            Some(other) => {
                raw.insert("options".into(), other);
                Map::new()
            }
            None => Map::new(),
        };

        Self {
            content,
            content_uri,
            language,
            genre,
            options,
            file: None,
            extra: raw,
            url_parameters: BTreeMap::new(),
        }
    }
}

/// Builder for [`DocumentRequest`].
#[derive(Debug, Default)]
pub struct DocumentRequestBuilder {
    inner: DocumentRequest,
}

impl DocumentRequestBuilder {
    /// Sets inline text to analyze.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.inner.content = Some(content.into());
        self
    }

    /// Sets a URL for the server to fetch.
    pub fn content_uri(mut self, uri: impl Into<String>) -> Self {
        self.inner.content_uri = Some(uri.into());
        self
    }

    /// Sets a file to upload.
    pub fn file(mut self, file: FileUpload) -> Self {
        self.inner.file = Some(file);
        self
    }

    /// Sets the ISO 639-3 language code, skipping server-side detection.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.inner.language = Some(language.into());
        self
    }

    /// Sets the document genre, e.g. `social-media`.
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.inner.genre = Some(genre.into());
        self
    }

    /// Sets a per-request option.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inner.options.insert(name.into(), value.into());
        self
    }

    /// Sets a query parameter for this request only.
    pub fn url_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner.url_parameters.insert(name.into(), value.into());
        self
    }

    /// Sets a top-level body field the SDK does not model yet.
    pub fn extra(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inner.extra.insert(name.into(), value.into());
        self
    }

    /// Builds the request.
    ///
    /// # Errors
    ///
    /// Returns [`RosetteError::Client`] when neither or both of content and
    /// content URI are set.
    pub fn build(self) -> RosetteResult<DocumentRequest> {
        self.inner.validate(InputForms::DOCUMENT)?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(err: RosetteError) -> String {
        assert!(err.is_client_side(), "expected client-side error: {err:?}");
        err.to_string()
    }

    #[test]
    fn missing_input_is_rejected() {
        let err = DocumentRequest::default()
            .validate(InputForms::DOCUMENT)
            .expect_err("should reject");
        assert_eq!(message(err), MISSING_CONTENT);
    }

    #[test]
    fn conflicting_input_is_rejected() {
        let err = DocumentRequest::builder()
            .content("text")
            .content_uri("https://example.com")
            .build()
            .expect_err("should reject");
        assert_eq!(message(err), CONFLICTING_CONTENT);
    }

    #[test]
    fn file_and_uri_conflict() {
        let request = DocumentRequest::builder()
            .file(FileUpload::new("a.txt", "text/plain", "hello".as_bytes().to_vec()))
            .content_uri("https://example.com");
        let err = request.build().expect_err("should reject");
        assert_eq!(message(err), CONFLICTING_CONTENT);
    }

    #[test]
    fn text_only_rejects_uri_and_file() {
        let uri = DocumentRequest::uri("https://example.com");
        assert!(uri.validate(InputForms::DOCUMENT).is_ok());
        let err = uri.validate(InputForms::TEXT_ONLY).expect_err("uri not allowed");
        assert!(message(err).contains("ContentUri"));

        let file = DocumentRequest::from(FileUpload::new("a.txt", "text/plain", "x"));
        let err = file.validate(InputForms::TEXT_ONLY).expect_err("file not allowed");
        assert!(message(err).contains("File upload"));
    }

    #[test]
    fn body_contains_content_and_merged_options() {
        let request = DocumentRequest::builder()
            .content("Some text")
            .language("eng")
            .option("linkEntities", false)
            .build()
            .expect("valid");

        let mut client_options = Map::new();
        client_options.insert("linkEntities".into(), json!(true));
        client_options.insert("calculateConfidence".into(), json!(true));

        let body = request.to_body(&client_options);
        assert_eq!(
            body,
            json!({
                "content": "Some text",
                "language": "eng",
                "options": {"linkEntities": false, "calculateConfidence": true}
            })
        );
    }

    #[test]
    fn url_parameters_stay_out_of_the_body() {
        let request = DocumentRequest::builder()
            .content("text")
            .url_parameter("output", "rosette")
            .build()
            .expect("valid");

        assert_eq!(request.url_parameters()["output"], "rosette");
        assert_eq!(request.to_body(&Map::new()), json!({"content": "text"}));
    }

    #[test]
    fn body_omits_empty_options() {
        let body = DocumentRequest::from("text").to_body(&Map::new());
        assert_eq!(body, json!({"content": "text"}));
    }

    #[test]
    fn raw_map_lifts_known_keys_and_keeps_the_rest() {
        let raw = json!({
            "contentUri": "https://example.com/page",
            "language": "spa",
            "options": {"includeDBpediaType": true},
            "futureFlag": [1, 2]
        });
        let Value::Object(raw) = raw else {
            unreachable!()
        };

        let request = DocumentRequest::from(raw);
        assert_eq!(request.content_uri(), Some("https://example.com/page"));
        assert_eq!(request.language(), Some("spa"));
        assert!(request.validate(InputForms::DOCUMENT).is_ok());

        let body = request.to_body(&Map::new());
        assert_eq!(body["futureFlag"], json!([1, 2]));
        assert_eq!(body["options"]["includeDBpediaType"], json!(true));
    }

    #[test]
    fn raw_map_with_both_forms_is_rejected() {
        let raw = json!({"content": "a", "contentUri": "b"});
        let Value::Object(raw) = raw else {
            unreachable!()
        };
        let err = DocumentRequest::from(raw)
            .validate(InputForms::DOCUMENT)
            .expect_err("should reject");
        assert_eq!(message(err), CONFLICTING_CONTENT);
    }

    #[tokio::test]
    async fn from_file_reads_bytes_and_guesses_type() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("rosette-upload-{}.txt", std::process::id()));
        tokio::fs::write(&path, b"file body").await.expect("write temp file");

        let request = DocumentRequest::from_file(&path).await.expect("should read");
        let file = request.file().expect("file set");
        assert_eq!(file.bytes.as_ref(), b"file body");
        assert_eq!(file.content_type, "text/plain");
        assert!(request.validate(InputForms::DOCUMENT).is_ok());

        tokio::fs::remove_file(&path).await.expect("cleanup");
    }

    #[tokio::test]
    async fn from_file_missing_path_is_io_error() {
        let err = DocumentRequest::from_file("/definitely/not/here.txt")
            .await
            .expect_err("should fail");
        assert!(matches!(err, RosetteError::Io(_)));
    }
}
