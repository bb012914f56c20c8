//! Decoding an artifact back into equations

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use super::dimensions::attribute;
use super::escape::unescape;
use super::metadata::{ArtifactMetadata, EmbeddedEquation, Provenance};
use super::{EQUATION_ROLE, METADATA_ID};
use crate::eqsvg::color::ColorMode;
use crate::eqsvg::document::{DisplayMode, Equation, Frontmatter, ParsedDocument};
use crate::eqsvg::parsing::labels::explicit_label;
use crate::eqsvg::parsing::parse_with_mode;
use crate::eqsvg::serializing::document_text;

static METADATA_ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<metadata\b([^>]*)>(.*?)</metadata>").unwrap());

static GROUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<g\b[^>]*>").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Neither the metadata element nor any equation wrapper is present.
    NotAnArtifact,
    /// The metadata element exists but does not hold a valid payload.
    InvalidMetadata(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::NotAnArtifact => write!(f, "SVG does not carry embedded equations"),
            CodecError::InvalidMetadata(msg) => write!(f, "Invalid equation metadata: {msg}"),
        }
    }
}

impl std::error::Error for CodecError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedArtifact {
    /// Absent when the equations were recovered from wrapper attributes only.
    pub provenance: Option<Provenance>,
    pub equations: Vec<EmbeddedEquation>,
}

impl DecodedArtifact {
    /// Re-emit the equations as a document without settings.
    ///
    /// A leading marker section is added when the first body would otherwise be read
    /// back as frontmatter.
    pub fn to_document_text(&self) -> String {
        document_text(
            &Frontmatter::default(),
            self.equations.iter().map(|eq| eq.latex.as_str()),
        )
    }

    /// Parse the re-emitted document, keeping the ids recorded in the artifact.
    pub fn to_document(&self, mode: ColorMode) -> ParsedDocument {
        self.to_document_with(mode, &[])
    }

    /// Like [Self::to_document], but ids from `previous` are preferred over the recorded
    /// ones when both match an equation.
    pub fn to_document_with(&self, mode: ColorMode, previous: &[Equation]) -> ParsedDocument {
        let recorded = self.equations.iter().map(|eq| Equation {
            id: eq.id.clone().into(),
            label: eq.label.clone(),
            latex: eq.latex.clone(),
            start_line: 0,
            end_line: 0,
            color: None,
            rendered_svg: None,
        });
        let known: Vec<Equation> = previous.iter().cloned().chain(recorded).collect();
        parse_with_mode(&self.to_document_text(), &known, mode)
    }
}

pub fn decode(svg: &str) -> Result<DecodedArtifact, CodecError> {
    if let Some(payload) = metadata_payload(svg) {
        let metadata = ArtifactMetadata::from_json(payload.trim())
            .map_err(|err| CodecError::InvalidMetadata(err.to_string()))?;
        return Ok(DecodedArtifact {
            provenance: Some(metadata.provenance),
            equations: metadata.equations,
        });
    }

    let equations = wrapper_equations(svg);
    if equations.is_empty() {
        return Err(CodecError::NotAnArtifact);
    }
    tracing::debug!(
        count = equations.len(),
        "no metadata element, recovered equations from wrappers"
    );
    Ok(DecodedArtifact {
        provenance: None,
        equations,
    })
}

fn metadata_payload(svg: &str) -> Option<String> {
    METADATA_ELEMENT
        .captures_iter(svg)
        .find(|caps| attribute(&caps[1], "id").as_deref() == Some(METADATA_ID))
        .map(|caps| {
            let body = caps[2].trim();
            match body
                .strip_prefix("<![CDATA[")
                .and_then(|rest| rest.strip_suffix("]]>"))
            {
                Some(cdata) => cdata.to_string(),
                None => unescape(body),
            }
        })
}

fn wrapper_equations(svg: &str) -> Vec<EmbeddedEquation> {
    GROUP_TAG
        .find_iter(svg)
        .map(|tag| tag.as_str())
        .filter(|tag| attribute(tag, "data-role").as_deref() == Some(EQUATION_ROLE))
        .filter_map(|tag| {
            let latex = attribute(tag, "data-latex")?;
            Some(EmbeddedEquation {
                id: attribute(tag, "data-equation-id").unwrap_or_default(),
                label: explicit_label(&latex).unwrap_or_default(),
                display_mode: attribute(tag, "data-display-mode")
                    .as_deref()
                    .and_then(DisplayMode::parse)
                    .unwrap_or_default(),
                latex,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eqsvg::codec::encode::{encode, EquationRef};

    fn artifact(latex: &str) -> String {
        encode(
            r#"<svg width="1ex" height="1ex" viewBox="0 0 1 1"><path/></svg>"#,
            EquationRef {
                id: "e1",
                latex,
                label: "eq1",
            },
            DisplayMode::Block,
        )
    }

    #[test]
    fn decodes_metadata_channel() {
        let decoded = decode(&artifact("a < b & c")).unwrap();
        let provenance = decoded.provenance.unwrap();
        assert_eq!(provenance.generator, "eqsvg");
        assert_eq!(decoded.equations.len(), 1);
        assert_eq!(decoded.equations[0].latex, "a < b & c");
        assert_eq!(decoded.equations[0].id, "e1");
    }

    #[test]
    fn falls_back_to_wrapper_attributes() {
        let svg = r#"<svg><g data-role="latex-equation" data-equation-id="k" data-latex="y \label{top}" data-display-mode="inline"><path/></g></svg>"#;
        let decoded = decode(svg).unwrap();
        assert!(decoded.provenance.is_none());
        assert_eq!(decoded.equations[0].label, "top");
        assert_eq!(decoded.equations[0].display_mode, DisplayMode::Inline);
    }

    #[test]
    fn plain_svg_is_not_an_artifact() {
        assert_eq!(decode("<svg><path/></svg>"), Err(CodecError::NotAnArtifact));
    }

    #[test]
    fn broken_metadata_is_reported() {
        let svg = r#"<svg><metadata id="latex-equations">{not json</metadata></svg>"#;
        assert!(matches!(decode(svg), Err(CodecError::InvalidMetadata(_))));
    }

    #[test]
    fn document_keeps_recorded_ids() {
        let doc = decode(&artifact("x^2")).unwrap().to_document(ColorMode::Css);
        assert_eq!(doc.equations.len(), 1);
        assert_eq!(doc.equations[0].id.as_str(), "e1");
        assert_eq!(doc.equations[0].label, "eq1");
    }
}
