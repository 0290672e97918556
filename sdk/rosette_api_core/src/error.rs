use thiserror::Error;

/// Errors that can occur when interacting with the Rosette API.
///
/// The variants fall into three groups:
///
/// - rejected locally before anything was sent ([`Client`](Self::Client),
///   [`Builder`](Self::Builder), [`Io`](Self::Io)),
/// - rejected by the server ([`Api`](Self::Api)),
/// - transport failures from `reqwest`, propagated as-is
///   ([`Request`](Self::Request)).
#[derive(Error, Debug)]
pub enum RosetteError {
    /// The request was rejected locally and never sent.
    #[error("{message}")]
    Client { message: String },

    /// The server answered with a non-success status.
    #[error("Rosette API error ({status} {code}): {message}")]
    Api {
        /// HTTP status of the response.
        status: u16,
        /// Error code reported by the server, e.g. `unauthorized`; the HTTP
        /// status when the body carries none.
        code: String,
        message: String,
        request_id: Option<String>,
        file: Option<String>,
        line: Option<String>,
    },

    /// A typed request could not be built.
    #[error("Invalid request: {0}")]
    Builder(String),

    /// The request payload could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request failed at the transport level.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// A file selected for upload could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The endpoint URL is invalid.
    #[error("Invalid endpoint URL: {message}")]
    InvalidEndpoint {
        message: String,
        #[source]
        source: url::ParseError,
    },

    /// A required configuration value is missing.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),
}

impl RosetteError {
    /// Create a client-side error. These never carry a status code.
    pub fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_endpoint_with_source(
        message: impl Into<String>,
        source: url::ParseError,
    ) -> Self {
        Self::InvalidEndpoint {
            message: message.into(),
            source,
        }
    }

    /// HTTP status reported by the server, if the request reached it.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Request id reported by the server, if any.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Api { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// `true` when the error was raised before any network call was made.
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            Self::Client { .. }
                | Self::Builder(_)
                | Self::Io(_)
                | Self::Serialization(_)
                | Self::InvalidEndpoint { .. }
                | Self::MissingConfig(_)
        )
    }
}

/// Result type alias for Rosette operations.
pub type RosetteResult<T> = std::result::Result<T, RosetteError>;
