//! Request handler translating a JSON envelope into a build and back.
//!
//! # Protocol
//!
//! | Request | Status | Body |
//! |---------|--------|------|
//! | `OPTIONS` | 200 | empty |
//! | any method but `POST` | 405 | `{"error": ...}` |
//! | `POST`, missing field or bad base64 | 400 | `{"error": ...}` |
//! | `POST`, rejected input | 400 | `{"error": ...}` |
//! | `POST`, assembly failure | 500 | `{"error": ...}` |
//! | `POST`, success | 200 | `{"success": true, "apkFile", "fileName", "note"}` |
//!
//! Every response allows any origin.

mod types;

pub use types::{BuildRequest, BuildResponse, ErrorResponse, RequestEvent, ResponseEvent};

use crate::apk::{self, AppIdentity, Assembler};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::collections::BTreeMap;
use thiserror::Error;

/// Caveat returned with every successful build.
pub const PLACEHOLDER_NOTE: &str = "The package wraps the site in a WebView layout; \
     classes.dex and the signature block are structural placeholders, so the package \
     must be compiled and signed by a real toolchain before it can run on a device.";

/// Failures surfaced to the caller as error responses.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Method other than `POST`/`OPTIONS`.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Body is not valid JSON.
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// A required field is absent or empty.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// A payload is not valid base64.
    #[error("Field {field} is not valid base64: {source}")]
    InvalidPayload {
        /// Field name
        field: &'static str,
        /// Decoder error
        #[source]
        source: base64::DecodeError,
    },

    /// The build pipeline rejected the input or failed.
    #[error("{0}")]
    Build(#[from] apk::Error),
}

impl HandlerError {
    /// HTTP status for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::MethodNotAllowed => 405,
            HandlerError::Build(e) if !e.kind().is_client_error() => 500,
            _ => 400,
        }
    }
}

/// Answer one request event.
pub fn handle(assembler: &Assembler, event: &RequestEvent) -> ResponseEvent {
    let method = event.method();
    if method == "OPTIONS" {
        return preflight();
    }

    let result = if method == "POST" {
        serde_json::from_str::<BuildRequest>(event.body.as_deref().unwrap_or("{}"))
            .map_err(HandlerError::from)
            .and_then(|request| build(assembler, &request))
    } else {
        Err(HandlerError::MethodNotAllowed)
    };

    match result {
        Ok(response) => json_response(200, &response),
        Err(error) => {
            let status = error.status_code();
            if status >= 500 {
                log::error!("Build request failed: {}", error);
            } else {
                log::warn!("Build request rejected ({}): {}", status, error);
            }
            json_response(
                status,
                &ErrorResponse {
                    error: error.to_string(),
                },
            )
        }
    }
}

/// Run one build from a decoded request body.
pub fn build(assembler: &Assembler, request: &BuildRequest) -> Result<BuildResponse, HandlerError> {
    let fields = [
        ("appName", &request.app_name),
        ("appVersion", &request.app_version),
        ("zipFile", &request.zip_file),
        ("iconFile", &request.icon_file),
    ];
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(HandlerError::MissingFields(missing));
    }

    let field = |value: &Option<String>| value.as_deref().unwrap_or_default().to_string();
    let (name, version) = (field(&request.app_name), field(&request.app_version));
    let zip_data = decode_payload("zipFile", &field(&request.zip_file))?;
    let icon_data = decode_payload("iconFile", &field(&request.icon_file))?;

    let identity = AppIdentity::new(&name, &version, &assembler.config().identity)?;
    log::info!(
        "Building {} {} as {} ({} byte site, {} byte icon)",
        identity.display_name(),
        identity.version(),
        identity.package_id(),
        zip_data.len(),
        icon_data.len()
    );

    let apk = assembler.assemble(&identity, &zip_data, &icon_data)?;
    log::debug!("Assembled {} bytes for {}", apk.len(), identity.package_id());

    Ok(BuildResponse {
        success: true,
        apk_file: STANDARD.encode(&apk),
        file_name: identity.artifact_file_name(),
        note: PLACEHOLDER_NOTE.to_string(),
    })
}

/// Decode raw base64 or the part after the first comma of a data URL.
pub fn decode_payload(field: &'static str, value: &str) -> Result<Vec<u8>, HandlerError> {
    let data = value.split_once(',').map_or(value, |(_, data)| data);
    STANDARD
        .decode(data.trim())
        .map_err(|source| HandlerError::InvalidPayload { field, source })
}

fn cors_headers() -> BTreeMap<String, String> {
    BTreeMap::from([("Access-Control-Allow-Origin".to_string(), "*".to_string())])
}

fn preflight() -> ResponseEvent {
    let mut headers = cors_headers();
    headers.insert("Access-Control-Allow-Methods".into(), "POST, OPTIONS".into());
    headers.insert("Access-Control-Allow-Headers".into(), "Content-Type".into());
    headers.insert("Access-Control-Max-Age".into(), "86400".into());
    ResponseEvent {
        status_code: 200,
        headers,
        body: String::new(),
        is_base64_encoded: false,
    }
}

fn json_response<T: serde::Serialize>(status_code: u16, body: &T) -> ResponseEvent {
    let mut headers = cors_headers();
    headers.insert("Content-Type".into(), "application/json".into());
    let body = serde_json::to_string(body).unwrap_or_else(|e| {
        log::error!("Failed to serialize response body: {}", e);
        r#"{"error":"Server error"}"#.to_string()
    });
    ResponseEvent {
        status_code,
        headers,
        body,
        is_base64_encoded: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_payload_variants() {
        assert_eq!(decode_payload("zipFile", "aGk=").unwrap(), b"hi");
        assert_eq!(
            decode_payload("zipFile", "data:application/zip;base64,aGk=").unwrap(),
            b"hi"
        );
        assert!(matches!(
            decode_payload("iconFile", "***"),
            Err(HandlerError::InvalidPayload { field: "iconFile", .. })
        ));
    }

    #[test]
    fn test_preflight() {
        let event = RequestEvent {
            http_method: Some("options".into()),
            body: None,
        };
        let response = handle(&Assembler::default(), &event);
        assert_eq!(response.status_code, 200);
        assert!(response.body.is_empty());
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
    }

    #[test]
    fn test_missing_fields_listed() {
        let request = BuildRequest {
            app_name: Some("App".into()),
            app_version: Some("  ".into()),
            ..BuildRequest::default()
        };
        let err = build(&Assembler::default(), &request).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.to_string(),
            "Missing required fields: appVersion, zipFile, iconFile"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(HandlerError::MethodNotAllowed.status_code(), 405);
        assert_eq!(HandlerError::from(apk::Error::MissingEntryPoint).status_code(), 400);
        let assembly = apk::Error::Assembly {
            stage: "writing container",
            cause: apk::AssemblyCause::Encoding("boom".into()),
        };
        assert_eq!(HandlerError::from(assembly).status_code(), 500);
    }
}
