//! The response envelope shared by every endpoint.
//!
//! Responses are parsed in two phases. [`RosetteResponse`] turns the HTTP
//! response into status, headers, raw body and a generic JSON object
//! (`content`), failing with [`RosetteError::Api`] for non-success statuses.
//! Endpoint crates then project `content` into typed fields through
//! [`TypedResponse`], using [`field`], [`field_or_default`] and [`records`] so that a
//! missing or mistyped key never fails the whole response.

use std::collections::BTreeMap;
use std::time::SystemTime;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{RosetteError, RosetteResult};

/// Header carrying the server-assigned request id.
pub const REQUEST_ID_HEADER: &str = "x-rosetteapi-request-id";

/// Header carrying the concurrency allowed for the caller's plan.
pub const CONCURRENCY_HEADER: &str = "x-rosetteapi-concurrency";

/// Header carrying the language the server used for processing.
pub const PROCESSED_LANGUAGE_HEADER: &str = "x-rosetteapi-processedlanguage";

/// Maximum length for error messages copied out of response bodies.
const MAX_ERROR_MESSAGE_LEN: usize = 1000;

/// Status, headers, raw body and generic JSON content of one response.
///
/// Built once per HTTP response and immutable afterwards. A value of this
/// type always represents a successful (2xx) response.
#[derive(Debug, Clone, PartialEq)]
pub struct RosetteResponse {
    status: u16,
    reason: String,
    headers: BTreeMap<String, String>,
    raw_body: String,
    content: Map<String, Value>,
}

impl RosetteResponse {
    /// Build the envelope from the parts of an HTTP response.
    ///
    /// Header names are lower-cased. Non-success statuses fail with
    /// [`RosetteError::Api`].
    pub fn new<I, K, V>(
        status: u16,
        reason: impl Into<String>,
        headers: I,
        body: impl Into<String>,
    ) -> RosetteResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let reason = reason.into();
        let raw_body = body.into();
        let headers: BTreeMap<String, String> = headers
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
            .collect();

        if !(200..300).contains(&status) {
            return Err(api_error(status, &reason, &headers, &raw_body));
        }

        let content = match serde_json::from_str::<Value>(&raw_body) {
            Ok(Value::Object(map)) => map,
            Ok(_) => Map::new(),
            Err(e) => {
                if !raw_body.trim().is_empty() {
                    tracing::warn!(status, error = %e, "success response body is not JSON");
                }
                Map::new()
            }
        };

        Ok(Self {
            status,
            reason,
            headers,
            raw_body,
            content,
        })
    }

    /// Read a `reqwest` response to completion and build the envelope.
    pub async fn from_http(response: reqwest::Response) -> RosetteResult<Self> {
        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Self::new(status.as_u16(), reason, headers, body)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// All response headers, keyed by lower-cased name.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Look up a header by name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The response body exactly as received.
    pub fn raw_body(&self) -> &str {
        &self.raw_body
    }

    /// Top-level keys of the JSON body. Empty when the body was not an object.
    pub fn content(&self) -> &Map<String, Value> {
        &self.content
    }

    /// Typed view of the headers the service documents.
    pub fn response_headers(&self) -> ResponseHeaders {
        ResponseHeaders::from_map(&self.headers)
    }
}

/// Typed projection of the response headers of interest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseHeaders {
    pub request_id: Option<String>,
    pub concurrency: Option<u32>,
    pub processed_language: Option<String>,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    /// Parsed `Date` header. `None` when absent or not a valid HTTP date.
    pub date: Option<SystemTime>,
    pub server: Option<String>,
}

impl ResponseHeaders {
    /// Project a lower-cased header map.
    pub fn from_map(headers: &BTreeMap<String, String>) -> Self {
        let get = |name: &str| headers.get(name).cloned();

        let date = headers
            .get("date")
            .and_then(|raw| match httpdate::parse_http_date(raw) {
                Ok(date) => Some(date),
                Err(e) => {
                    tracing::debug!(value = %raw, error = %e, "ignoring unparseable date header");
                    None
                }
            });

        Self {
            request_id: get(REQUEST_ID_HEADER),
            concurrency: headers
                .get(CONCURRENCY_HEADER)
                .and_then(|v| v.trim().parse().ok()),
            processed_language: get(PROCESSED_LANGUAGE_HEADER),
            content_type: get("content-type"),
            content_length: headers
                .get("content-length")
                .and_then(|v| v.trim().parse().ok()),
            date,
            server: get("server"),
        }
    }
}

/// A response type whose fields are projected out of a [`RosetteResponse`].
pub trait TypedResponse: Sized + Serialize {
    /// Project the envelope's content into typed fields.
    ///
    /// Never fails: missing or mistyped keys leave the field at its default.
    fn from_envelope(envelope: RosetteResponse) -> Self;

    /// The envelope this response was built from.
    fn envelope(&self) -> &RosetteResponse;

    /// JSON view of the typed fields, for comparison and display.
    fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Read `key` from `content` as `T`.
///
/// Returns `None` when the key is absent, `null`, or does not match `T`.
pub fn field<T: DeserializeOwned>(content: &Map<String, Value>, key: &str) -> Option<T> {
    match content.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => match T::deserialize(value) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::debug!(key, error = %e, "ignoring mistyped response field");
                None
            }
        },
    }
}

/// Like [`field`], falling back to `T::default()`.
pub fn field_or_default<T: DeserializeOwned + Default>(
    content: &Map<String, Value>,
    key: &str,
) -> T {
    field(content, key).unwrap_or_default()
}

/// Read `key` as an array of records.
///
/// A record object with `null` or mistyped fields keeps its other fields; the
/// bad ones fall back to their defaults. This relies on `T` deserializing from
/// a partial object, i.e. `#[serde(default)]` records. Elements that are not
/// objects and do not match `T` are skipped.
pub fn records<T: DeserializeOwned>(content: &Map<String, Value>, key: &str) -> Vec<T> {
    let Some(Value::Array(items)) = content.get(key) else {
        return Vec::new();
    };
    items.iter().filter_map(|item| record(key, item)).collect()
}

fn record<T: DeserializeOwned>(key: &str, item: &Value) -> Option<T> {
    let err = match T::deserialize(item) {
        Ok(v) => return Some(v),
        Err(e) => e,
    };
    let Value::Object(obj) = strip_nulls(item) else {
        tracing::debug!(key, error = %err, "skipping mistyped record");
        return None;
    };

    let mut kept = Map::new();
    for (name, value) in obj {
        let mut single = Map::new();
        single.insert(name.clone(), value);
        if T::deserialize(&Value::Object(single.clone())).is_ok() {
            kept.extend(single);
        } else {
            tracing::debug!(key, field = %name, "defaulting mistyped record field");
        }
    }

    match T::deserialize(&Value::Object(kept)) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!(key, error = %e, "skipping mistyped record");
            None
        }
    }
}

/// Drop `null` members from objects, recursively. Array elements are kept.
fn strip_nulls(value: &Value) -> Value {
    match value {
        Value::Object(obj) => Value::Object(
            obj.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(strip_nulls).collect()),
        other => other.clone(),
    }
}

/// Build the error for a non-success response.
fn api_error(
    status: u16,
    reason: &str,
    headers: &BTreeMap<String, String>,
    body: &str,
) -> RosetteError {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let text = |key: &str| -> Option<String> {
        parsed.as_ref().and_then(|v| v.get(key)).and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
    };

    let fallback_message = if body.trim().is_empty() {
        reason.to_string()
    } else {
        body.to_string()
    };

    RosetteError::Api {
        status,
        code: text("code").unwrap_or_else(|| status.to_string()),
        message: truncate_message(&text("message").unwrap_or(fallback_message)),
        request_id: text("requestId").or_else(|| headers.get(REQUEST_ID_HEADER).cloned()),
        file: text("file"),
        line: text("line"),
    }
}

/// Truncate a message if it exceeds the maximum length.
fn truncate_message(msg: &str) -> String {
    if msg.len() > MAX_ERROR_MESSAGE_LEN {
        let mut end = MAX_ERROR_MESSAGE_LEN;
        while !msg.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated)", &msg[..end])
    } else {
        msg.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok(body: &str) -> RosetteResponse {
        RosetteResponse::new(200, "OK", Vec::<(String, String)>::new(), body)
            .expect("success status should build")
    }

    #[test]
    fn content_holds_top_level_keys() {
        let response = ok(r#"{"response":"OK","nested":{"a":1},"list":[1,2]}"#);
        let keys: Vec<&str> = response.content().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains(&"response"));
        assert!(keys.contains(&"nested"));
        assert!(keys.contains(&"list"));
        assert_eq!(response.content()["response"], "OK");
    }

    #[test]
    fn every_success_status_builds() {
        for status in 200..300 {
            let response =
                RosetteResponse::new(status, "", Vec::<(String, String)>::new(), "{}");
            assert!(response.is_ok(), "status {status} should build");
        }
    }

    #[test]
    fn non_object_success_body_yields_empty_content() {
        assert!(ok("[1,2,3]").content().is_empty());
        assert!(ok("").content().is_empty());
        assert!(ok("not json").content().is_empty());
        assert_eq!(ok("not json").raw_body(), "not json");
    }

    #[test]
    fn error_without_code_uses_http_status() {
        let err = RosetteResponse::new(409, "Conflict", Vec::<(String, String)>::new(), "{}")
            .expect_err("409 should fail");
        assert_eq!(err.status(), Some(409));
        match err {
            RosetteError::Api { code, message, .. } => {
                assert_eq!(code, "409");
                assert_eq!(message, "{}");
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn error_body_fields_are_extracted() {
        let body = json!({
            "code": "badRequest",
            "message": "content is empty",
            "requestId": "abc-123",
            "file": "Handler.java",
            "line": 42
        })
        .to_string();

        let err = RosetteResponse::new(400, "Bad Request", Vec::<(String, String)>::new(), body)
            .expect_err("400 should fail");
        match err {
            RosetteError::Api {
                status,
                code,
                message,
                request_id,
                file,
                line,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, "badRequest");
                assert_eq!(message, "content is empty");
                assert_eq!(request_id.as_deref(), Some("abc-123"));
                assert_eq!(file.as_deref(), Some("Handler.java"));
                assert_eq!(line.as_deref(), Some("42"));
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn error_without_body_falls_back_to_reason_and_header_request_id() {
        let headers = vec![("X-RosetteAPI-Request-Id", "hdr-req")];
        let err = RosetteResponse::new(503, "Service Unavailable", headers, "")
            .expect_err("503 should fail");
        match err {
            RosetteError::Api {
                message, request_id, ..
            } => {
                assert_eq!(message, "Service Unavailable");
                assert_eq!(request_id.as_deref(), Some("hdr-req"));
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(MAX_ERROR_MESSAGE_LEN + 50);
        let err = RosetteResponse::new(500, "", Vec::<(String, String)>::new(), body)
            .expect_err("500 should fail");
        match err {
            RosetteError::Api { message, .. } => {
                assert!(message.ends_with("... (truncated)"));
                assert!(message.len() < MAX_ERROR_MESSAGE_LEN + 20);
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn headers_are_case_insensitive_and_projected() {
        let headers = vec![
            ("X-RosetteAPI-Request-Id", "req-9"),
            ("X-RosetteAPI-Concurrency", "5"),
            ("X-RosetteAPI-ProcessedLanguage", "eng"),
            ("Content-Type", "application/json"),
            ("Content-Length", "17"),
            ("Date", "Sun, 06 Nov 1994 08:49:37 GMT"),
        ];
        let response = RosetteResponse::new(200, "OK", headers, "{}").expect("should build");
        assert_eq!(response.header("x-rosetteapi-request-id"), Some("req-9"));
        assert_eq!(response.header("X-ROSETTEAPI-REQUEST-ID"), Some("req-9"));

        let projected = response.response_headers();
        assert_eq!(projected.request_id.as_deref(), Some("req-9"));
        assert_eq!(projected.concurrency, Some(5));
        assert_eq!(projected.processed_language.as_deref(), Some("eng"));
        assert_eq!(projected.content_type.as_deref(), Some("application/json"));
        assert_eq!(projected.content_length, Some(17));
        let expected = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(784_111_777);
        assert_eq!(projected.date, Some(expected));
    }

    #[test]
    fn malformed_date_header_is_ignored() {
        let headers = vec![("Date", "yesterday-ish")];
        let response = RosetteResponse::new(200, "OK", headers, "{}").expect("should build");
        assert_eq!(response.response_headers().date, None);
    }

    #[test]
    fn field_defaults_on_missing_and_mismatched() {
        let content = ok(r#"{"score":0.5,"label":3,"gone":null}"#).content().clone();
        assert_eq!(field::<f64>(&content, "score"), Some(0.5));
        assert_eq!(field::<String>(&content, "label"), None);
        assert_eq!(field::<String>(&content, "gone"), None);
        assert_eq!(field::<String>(&content, "absent"), None);
        let tokens: Vec<String> = field_or_default(&content, "tokens");
        assert!(tokens.is_empty());
    }

    #[test]
    fn records_skip_mismatched_elements() {
        let content = ok(r#"{"values":[1,"two",3],"scalar":5}"#).content().clone();
        let values: Vec<u32> = records(&content, "values");
        assert_eq!(values, vec![1, 3]);
        assert!(records::<u32>(&content, "scalar").is_empty());
        assert!(records::<u32>(&content, "absent").is_empty());
    }

    #[derive(Debug, Default, PartialEq, serde::Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    struct Mention {
        mention: String,
        entity_id: String,
        count: u32,
        offsets: Vec<Offset>,
    }

    #[derive(Debug, Default, PartialEq, serde::Deserialize)]
    #[serde(default)]
    struct Offset {
        start: u32,
        end: u32,
    }

    #[test]
    fn records_keep_elements_with_null_or_mistyped_fields() {
        let content = ok(r#"{"items":[
            {"mention":"Bill Murray","entityId":null,"count":1},
            {"mention":"Boston","entityId":"Q100","count":"many"},
            {"mention":"Paris","offsets":[{"start":0,"end":null}]},
            "garbage"
        ]}"#)
        .content()
        .clone();

        let items: Vec<Mention> = records(&content, "items");
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].mention, "Bill Murray");
        assert_eq!(items[0].entity_id, "");
        assert_eq!(items[0].count, 1);
        assert_eq!(items[1].entity_id, "Q100");
        assert_eq!(items[1].count, 0);
        assert_eq!(items[2].offsets, vec![Offset { start: 0, end: 0 }]);
    }
}
