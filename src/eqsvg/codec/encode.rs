//! Encoding a rendered fragment into a self-describing SVG document

use chrono::{DateTime, SecondsFormat, Utc};

use super::dimensions::SvgRoot;
use super::escape::{escape_attr, escape_text};
use super::metadata::{ArtifactMetadata, EmbeddedEquation, Provenance};
use super::{EQUATION_ROLE, METADATA_ID, METADATA_TYPE};
use crate::eqsvg::document::{DisplayMode, Equation};
use crate::eqsvg::{GENERATOR, GENERATOR_VERSION};

/// The parts of an equation an artifact records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquationRef<'a> {
    pub id: &'a str,
    pub latex: &'a str,
    pub label: &'a str,
}

impl<'a> From<&'a Equation> for EquationRef<'a> {
    fn from(equation: &'a Equation) -> Self {
        EquationRef {
            id: equation.id.as_str(),
            latex: &equation.latex,
            label: &equation.label,
        }
    }
}

/// Wrap an engine fragment (already color post-processed) into a standalone artifact.
pub fn encode(fragment: &str, equation: EquationRef<'_>, display_mode: DisplayMode) -> String {
    encode_at(fragment, equation, display_mode, Utc::now())
}

/// [encode] with an explicit generation timestamp.
pub fn encode_at(
    fragment: &str,
    equation: EquationRef<'_>,
    display_mode: DisplayMode,
    generated_at: DateTime<Utc>,
) -> String {
    let root = SvgRoot::locate(fragment);
    let frame = root.export_frame();

    let metadata = ArtifactMetadata {
        provenance: Provenance {
            generator: GENERATOR.to_string(),
            generator_version: GENERATOR_VERSION.to_string(),
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        },
        equations: vec![EmbeddedEquation {
            id: equation.id.to_string(),
            latex: equation.latex.to_string(),
            label: equation.label.to_string(),
            display_mode,
        }],
    };

    let mut out = String::with_capacity(fragment.len() + equation.latex.len() * 2 + 512);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{}\" height=\"{}\" viewBox=\"{}\">\n",
        escape_attr(&frame.width),
        escape_attr(&frame.height),
        escape_attr(&frame.view_box),
    ));
    out.push_str(&format!(
        "<metadata id=\"{METADATA_ID}\" data-type=\"{METADATA_TYPE}\">{}</metadata>\n",
        escape_text(&metadata.to_json()),
    ));
    out.push_str(&format!(
        "<g data-role=\"{EQUATION_ROLE}\" data-equation-id=\"{}\" data-latex=\"{}\" data-display-mode=\"{}\">\n",
        escape_attr(equation.id),
        escape_attr(equation.latex),
        display_mode.as_str(),
    ));
    out.push_str(root.inner.trim());
    out.push_str("\n</g>\n</svg>\n");
    out
}
