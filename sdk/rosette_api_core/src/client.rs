//! HTTP client for the Rosette API.
//!
//! This module provides [`RosetteClient`], the entry point for every endpoint
//! in the SDK. The client handles authentication, HTTP transport, the
//! configuration shared by all calls (custom headers, URL parameters and
//! options), and the advisory count of requests in flight.
//!
//! # Examples
//!
//! ## Using an API key
//! ```rust,no_run
//! use rosette_api_core::client::RosetteClient;
//! use rosette_api_core::auth::RosetteCredential;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RosetteClient::builder()
//!     .credential(RosetteCredential::api_key("your-key"))
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Using a self-hosted deployment
//! ```rust,no_run
//! use rosette_api_core::client::RosetteClient;
//! use rosette_api_core::auth::RosetteCredential;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RosetteClient::builder()
//!     .endpoint("http://rosette.internal:8181/rest/v1")
//!     .credential(RosetteCredential::api_key("unused"))
//!     .build()?;
//!
//! client.set_custom_header("X-RosetteAPI-App", "indexer")?;
//! client.set_url_parameter("output", "rosette");
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client as HttpClient, RequestBuilder};
use serde_json::{Map, Value};
use url::Url;

use crate::auth::RosetteCredential;
use crate::error::{RosetteError, RosetteResult};
use crate::request::{DocumentRequest, FileUpload, InputForms};
use crate::response::RosetteResponse;

/// Public Rosette API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.rosette.com/rest/v1/";

/// Environment variable overriding the endpoint.
pub const ENDPOINT_ENV: &str = "ROSETTE_API_URL";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-RosetteAPI-Key";

/// Header naming the client binding.
pub const BINDING_HEADER: &str = "X-RosetteAPI-Binding";

/// Header carrying the binding version.
pub const BINDING_VERSION_HEADER: &str = "X-RosetteAPI-Binding-Version";

/// Prefix every custom header name must start with.
pub const CUSTOM_HEADER_PREFIX: &str = "X-RosetteAPI-";

/// Binding name sent in [`BINDING_HEADER`].
pub const BINDING: &str = "rust";

/// Version of this binding.
pub const BINDING_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default connection timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default read/response timeout (60 seconds).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration applied to every request.
#[derive(Debug, Clone, Default)]
struct Settings {
    custom_headers: BTreeMap<String, String>,
    url_parameters: BTreeMap<String, String>,
    options: Map<String, Value>,
}

/// The client for the Rosette API.
///
/// The client is cheaply cloneable and can be shared across tasks. Clones
/// share configuration and the in-flight counter. Configuration setters take
/// effect for requests started after they return.
#[derive(Debug, Clone)]
pub struct RosetteClient {
    pub(crate) http: HttpClient,
    pub(crate) endpoint: Url,
    pub(crate) credential: RosetteCredential,
    settings: Arc<RwLock<Settings>>,
    in_flight: Arc<AtomicUsize>,
}

/// Builder for constructing a [`RosetteClient`].
///
/// Use [`RosetteClient::builder()`] to create a new builder.
#[derive(Debug, Default)]
pub struct RosetteClientBuilder {
    endpoint: Option<String>,
    credential: Option<RosetteCredential>,
    http_client: Option<HttpClient>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
}

/// Holds one slot of the in-flight counter; releases it on drop.
struct InFlight<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

impl RosetteClient {
    /// Create a new builder for configuring a `RosetteClient`.
    pub fn builder() -> RosetteClientBuilder {
        RosetteClientBuilder::default()
    }

    /// Get the base endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Number of requests issued through this client (or its clones) that
    /// have not completed yet.
    ///
    /// Informational only; nothing is throttled based on it.
    pub fn concurrent_requests(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn read_settings(&self) -> std::sync::RwLockReadGuard<'_, Settings> {
        self.settings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_settings(&self) -> std::sync::RwLockWriteGuard<'_, Settings> {
        self.settings.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a header sent with every request.
    ///
    /// # Errors
    ///
    /// Returns [`RosetteError::Client`] if `name` does not begin with
    /// [`CUSTOM_HEADER_PREFIX`]. The header collection is left unchanged.
    pub fn set_custom_header(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> RosetteResult<()> {
        let name = name.into();
        if !name.starts_with(CUSTOM_HEADER_PREFIX) {
            return Err(RosetteError::client(format!(
                "Custom header name must begin with \"{CUSTOM_HEADER_PREFIX}\""
            )));
        }
        self.write_settings()
            .custom_headers
            .insert(name, value.into());
        Ok(())
    }

    /// Currently configured custom headers.
    pub fn custom_headers(&self) -> BTreeMap<String, String> {
        self.read_settings().custom_headers.clone()
    }

    pub fn clear_custom_headers(&self) {
        self.write_settings().custom_headers.clear();
    }

    /// Add a query parameter sent with every request.
    pub fn set_url_parameter(&self, name: impl Into<String>, value: impl Into<String>) {
        self.write_settings()
            .url_parameters
            .insert(name.into(), value.into());
    }

    pub fn url_parameters(&self) -> BTreeMap<String, String> {
        self.read_settings().url_parameters.clone()
    }

    pub fn clear_url_parameters(&self) {
        self.write_settings().url_parameters.clear();
    }

    /// Set an option sent in the `options` object of every request body.
    ///
    /// Options set on an individual request take precedence.
    pub fn set_option(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.write_settings()
            .options
            .insert(name.into(), value.into());
    }

    pub fn option(&self, name: &str) -> Option<Value> {
        self.read_settings().options.get(name).cloned()
    }

    pub fn options(&self) -> Map<String, Value> {
        self.read_settings().options.clone()
    }

    pub fn clear_options(&self) {
        self.write_settings().options.clear();
    }

    /// Build a full URL for an API path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined to the endpoint URL.
    pub fn url(&self, path: &str) -> RosetteResult<Url> {
        self.endpoint
            .join(path.trim_start_matches('/'))
            .map_err(|e| RosetteError::invalid_endpoint_with_source("failed to construct URL", e))
    }

    /// Send a GET request.
    ///
    /// `params` are merged over the client's URL parameters.
    pub async fn get(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> RosetteResult<RosetteResponse> {
        let url = self.url(path)?;
        let builder = self.http.get(url);
        self.send(builder, params).await
    }

    /// Send a POST request with a JSON body.
    ///
    /// If the body is a JSON object, the client's options are merged under its
    /// `options` object; options already in the body take precedence.
    pub async fn post<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
        params: &[(&str, &str)],
    ) -> RosetteResult<RosetteResponse> {
        let mut body = serde_json::to_value(body)?;
        if let Value::Object(map) = &mut body {
            let mut options = self.options();
            match map.remove("options") {
                Some(Value::Object(own)) => options.extend(own),
                Some(other) => {
                    map.insert("options".into(), other);
                }
                None => {}
            }
            if !options.is_empty() && !map.contains_key("options") {
                map.insert("options".into(), Value::Object(options));
            }
        }

        let url = self.url(path)?;
        let builder = self.http.post(url).json(&body);
        self.send(builder, params).await
    }

    /// Send a `multipart/form-data` POST: the JSON `request` part plus the
    /// file as the `content` part.
    pub async fn post_multipart(
        &self,
        path: &str,
        request: &Value,
        file: &FileUpload,
        params: &[(&str, &str)],
    ) -> RosetteResult<RosetteResponse> {
        let request_part = Part::text(serde_json::to_string(request)?)
            .mime_str("application/json")?;
        let content_part = Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|_| {
                RosetteError::client(format!(
                    "Invalid content type for file upload: {}",
                    file.content_type
                ))
            })?;
        let form = Form::new()
            .part("request", request_part)
            .part("content", content_part);

        let url = self.url(path)?;
        let builder = self.http.post(url).multipart(form);
        self.send(builder, params).await
    }

    /// Validate and send a document request.
    ///
    /// Validation against `forms` happens before anything is sent. File
    /// uploads go out as multipart, everything else as JSON.
    pub async fn post_document(
        &self,
        path: &str,
        request: &DocumentRequest,
        forms: InputForms,
    ) -> RosetteResult<RosetteResponse> {
        request.validate(forms)?;

        let body = request.to_body(&self.options());
        let params: Vec<(&str, &str)> = request
            .url_parameters()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        match request.file() {
            Some(file) => self.post_multipart(path, &body, file, &params).await,
            None => {
                let url = self.url(path)?;
                let builder = self.http.post(url).json(&body);
                self.send(builder, &params).await
            }
        }
    }

    /// Attach headers and query parameters, send, and build the envelope.
    async fn send(
        &self,
        builder: RequestBuilder,
        params: &[(&str, &str)],
    ) -> RosetteResult<RosetteResponse> {
        let (headers, query) = {
            let settings = self.read_settings();
            let mut query = settings.url_parameters.clone();
            for (k, v) in params {
                query.insert((*k).to_string(), (*v).to_string());
            }
            (settings.custom_headers.clone(), query)
        };

        let mut builder = builder
            .header(API_KEY_HEADER, self.credential.expose())
            .header(BINDING_HEADER, BINDING)
            .header(BINDING_VERSION_HEADER, BINDING_VERSION)
            .header(reqwest::header::ACCEPT, "application/json");
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !query.is_empty() {
            builder = builder.query(&query);
        }

        let _in_flight = InFlight::enter(&self.in_flight);
        tracing::trace!(in_flight = self.concurrent_requests(), "sending request");

        let response = builder.send().await?;
        tracing::debug!(status = response.status().as_u16(), "response received");

        RosetteResponse::from_http(response).await
    }
}

impl RosetteClientBuilder {
    /// Set the Rosette API endpoint URL.
    ///
    /// Defaults to the `ROSETTE_API_URL` environment variable, then to
    /// [`DEFAULT_ENDPOINT`].
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the credential to use for authentication.
    ///
    /// If not set, the builder will use [`RosetteCredential::from_env()`].
    pub fn credential(mut self, credential: RosetteCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Set a custom HTTP client.
    ///
    /// **Note:** If you provide a custom HTTP client, any timeout configuration
    /// on this builder is ignored.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout, covering the whole request/response cycle.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Build the `RosetteClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The endpoint URL is invalid
    /// - No credential is provided and `ROSETTE_API_KEY` is not set
    /// - The HTTP client cannot be created
    pub fn build(self) -> RosetteResult<RosetteClient> {
        let http = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .connect_timeout(self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT))
                .timeout(self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT))
                .build()?,
        };

        let mut endpoint_str = self
            .endpoint
            .or_else(|| std::env::var(ENDPOINT_ENV).ok().filter(|s| !s.is_empty()))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        if !endpoint_str.ends_with('/') {
            endpoint_str.push('/');
        }

        let endpoint = Url::parse(&endpoint_str)
            .map_err(|e| RosetteError::invalid_endpoint_with_source("invalid endpoint URL", e))?;

        let credential = match self.credential {
            Some(credential) => credential,
            None => RosetteCredential::from_env()?,
        };

        Ok(RosetteClient {
            http,
            endpoint,
            credential,
            settings: Arc::new(RwLock::new(Settings::default())),
            in_flight: Arc::new(AtomicUsize::new(0)),
        })
    }
}
