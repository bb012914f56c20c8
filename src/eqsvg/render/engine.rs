//! Typesetting engine boundary
//!
//! Requests and responses are explicit schemas. On the wire a response is
//! `{id, svg, success: true}` or `{id, error, success: false}`.

use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::eqsvg::document::DisplayMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub id: String,
    pub latex: String,
    pub display_mode: DisplayMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireResponse", into = "WireResponse")]
pub enum RenderResponse {
    Success { id: String, svg: String },
    Failure { id: String, error: String },
}

impl RenderResponse {
    pub fn id(&self) -> &str {
        match self {
            RenderResponse::Success { id, .. } | RenderResponse::Failure { id, .. } => id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RenderResponse::Success { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireResponse {
    id: String,
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    svg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl TryFrom<WireResponse> for RenderResponse {
    type Error = String;

    fn try_from(wire: WireResponse) -> Result<Self, Self::Error> {
        match (wire.success, wire.svg, wire.error) {
            (true, Some(svg), _) => Ok(RenderResponse::Success { id: wire.id, svg }),
            (true, None, _) => Err(format!("successful response for '{}' has no svg", wire.id)),
            (false, _, error) => Ok(RenderResponse::Failure {
                id: wire.id,
                error: error.unwrap_or_else(|| "unknown engine error".to_string()),
            }),
        }
    }
}

impl From<RenderResponse> for WireResponse {
    fn from(response: RenderResponse) -> Self {
        match response {
            RenderResponse::Success { id, svg } => WireResponse {
                id,
                success: true,
                svg: Some(svg),
                error: None,
            },
            RenderResponse::Failure { id, error } => WireResponse {
                id,
                success: false,
                svg: None,
                error: Some(error),
            },
        }
    }
}

/// An asynchronous `latex -> svg` typesetter.
pub trait TypesetEngine: Send + Sync + 'static {
    fn render(&self, request: RenderRequest) -> impl Future<Output = RenderResponse> + Send;

    /// Resolves once the engine accepts requests.
    fn ready(&self) -> impl Future<Output = ()> + Send {
        async {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_wire_format() {
        let ok = RenderResponse::Success {
            id: "a".to_string(),
            svg: "<svg/>".to_string(),
        };
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["svg"], "<svg/>");
        assert!(json.get("error").is_none());

        let failed: RenderResponse =
            serde_json::from_str(r#"{"id":"b","success":false,"error":"bad"}"#).unwrap();
        assert_eq!(
            failed,
            RenderResponse::Failure {
                id: "b".to_string(),
                error: "bad".to_string()
            }
        );
    }

    #[test]
    fn success_without_svg_is_rejected() {
        let parsed: Result<RenderResponse, _> = serde_json::from_str(r#"{"id":"c","success":true}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn request_uses_camel_case() {
        let request = RenderRequest {
            id: "a".to_string(),
            latex: "x".to_string(),
            display_mode: DisplayMode::Inline,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["displayMode"], "inline");
    }
}
