//! JSON payload carried by the `<metadata>` element

use serde::{Deserialize, Serialize};

use crate::eqsvg::document::DisplayMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMetadata {
    #[serde(flatten)]
    pub provenance: Provenance,
    pub equations: Vec<EmbeddedEquation>,
}

/// Where an artifact came from. Informational only, never part of the equations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    pub generator: String,
    pub generator_version: String,
    /// RFC 3339 timestamp.
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedEquation {
    pub id: String,
    pub latex: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub display_mode: DisplayMode,
}

impl ArtifactMetadata {
    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            Err(err) => {
                tracing::error!(%err, "failed to serialize artifact metadata");
                String::from("{}")
            }
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape_is_flat() {
        let metadata = ArtifactMetadata {
            provenance: Provenance {
                generator: "eqsvg".to_string(),
                generator_version: "0.1.0".to_string(),
                generated_at: "2024-01-01T00:00:00.000Z".to_string(),
            },
            equations: vec![EmbeddedEquation {
                id: "e1".to_string(),
                latex: "x^2".to_string(),
                label: "eq1".to_string(),
                display_mode: DisplayMode::Block,
            }],
        };
        let value: serde_json::Value = serde_json::from_str(&metadata.to_json()).unwrap();
        assert_eq!(value["generator"], "eqsvg");
        assert_eq!(value["generatorVersion"], "0.1.0");
        assert_eq!(value["equations"][0]["displayMode"], "block");
        assert_eq!(ArtifactMetadata::from_json(&metadata.to_json()).unwrap(), metadata);
    }

    #[test]
    fn label_and_display_mode_are_optional_on_read() {
        let json = r#"{"generator":"other","generatorVersion":"1","generatedAt":"now",
            "equations":[{"id":"a","latex":"y"}]}"#;
        let metadata = ArtifactMetadata::from_json(json).unwrap();
        assert_eq!(metadata.equations[0].label, "");
        assert_eq!(metadata.equations[0].display_mode, DisplayMode::Block);
    }
}
