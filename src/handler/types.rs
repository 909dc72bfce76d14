//! JSON envelope types for the build endpoint.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Incoming HTTP-style event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEvent {
    /// HTTP method; absent means `POST`.
    #[serde(default)]
    pub http_method: Option<String>,
    /// Raw request body (JSON text).
    #[serde(default)]
    pub body: Option<String>,
}

impl RequestEvent {
    /// `POST` event carrying `body` serialized as JSON.
    pub fn post<T: Serialize>(body: &T) -> serde_json::Result<Self> {
        Ok(Self {
            http_method: Some("POST".into()),
            body: Some(serde_json::to_string(body)?),
        })
    }

    /// Method, upper-cased, defaulting to `POST`.
    pub fn method(&self) -> String {
        self.http_method
            .as_deref()
            .unwrap_or("POST")
            .to_ascii_uppercase()
    }
}

/// Outgoing HTTP-style event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEvent {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers.
    pub headers: BTreeMap<String, String>,
    /// Response body (JSON text, or empty for pre-flight).
    pub body: String,
    /// Always `false`; the body is JSON text.
    pub is_base64_encoded: bool,
}

/// Build request body.
///
/// Payload fields hold base64, optionally behind a data-URL prefix
/// (`data:application/zip;base64,<data>`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
    /// Application display name.
    pub app_name: Option<String>,
    /// Application version.
    pub app_version: Option<String>,
    /// Zipped site.
    pub zip_file: Option<String>,
    /// Icon image.
    pub icon_file: Option<String>,
}

/// Successful build body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResponse {
    /// Always `true`.
    pub success: bool,
    /// Container bytes, base64.
    pub apk_file: String,
    /// Suggested file name.
    pub file_name: String,
    /// Caveat about the placeholder code entry.
    pub note: String,
}

/// Failure body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
}
