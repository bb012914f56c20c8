//! Equation document model
//!
//! The parser produces a [ParsedDocument]: the frontmatter plus the equations in source
//! order. The codec decodes artifacts back into the same model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use eqsvg_config::DisplayModeSetting;

use crate::eqsvg::color::Presets;

/// Opaque equation identifier, stable across re-parses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquationId(String);

impl EquationId {
    /// Mint a fresh identifier.
    pub fn generate() -> Self {
        EquationId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EquationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EquationId {
    fn from(value: &str) -> Self {
        EquationId(value.to_string())
    }
}

impl From<String> for EquationId {
    fn from(value: String) -> Self {
        EquationId(value)
    }
}

/// Global settings declared in the leading section of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
    /// Resolved global color, applied to equations without their own override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Named color literals, referenced elsewhere as `$name`.
    #[serde(default, skip_serializing_if = "Presets::is_empty")]
    pub presets: Presets,
    /// Keys with no meaning to eqsvg, kept so they survive serialization.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, String>,
}

impl Frontmatter {
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.presets.is_empty() && self.settings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equation {
    pub id: EquationId,
    pub label: String,
    /// Body with color references already resolved. Comments and `\label` are kept.
    pub latex: String,
    /// Zero-based, inclusive.
    pub start_line: usize,
    pub end_line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered_svg: Option<String>,
}

impl Equation {
    pub fn contains_line(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub frontmatter: Frontmatter,
    pub equations: Vec<Equation>,
}

impl ParsedDocument {
    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    /// Map an editor cursor line to the equation whose section spans it.
    pub fn equation_at_line(&self, line: usize) -> Option<&Equation> {
        self.equations.iter().find(|eq| eq.contains_line(line))
    }

    pub fn find(&self, id: &EquationId) -> Option<&Equation> {
        self.equations.iter().find(|eq| &eq.id == id)
    }

    /// Cache a rendering for an equation. Returns false if the id is unknown.
    pub fn apply_render(&mut self, id: &EquationId, svg: String) -> bool {
        match self.equations.iter_mut().find(|eq| &eq.id == id) {
            Some(equation) => {
                equation.rendered_svg = Some(svg);
                true
            }
            None => false,
        }
    }

    /// Equation override first, then the frontmatter's global color.
    pub fn effective_color<'a>(&'a self, equation: &'a Equation) -> Option<&'a str> {
        effective_color(&self.frontmatter, equation)
    }

    /// Serialize back into the document text format.
    pub fn to_text(&self) -> String {
        crate::eqsvg::serializing::to_document_text(&self.frontmatter, &self.equations)
    }
}

pub fn effective_color<'a>(frontmatter: &'a Frontmatter, equation: &'a Equation) -> Option<&'a str> {
    equation
        .color
        .as_deref()
        .or(frontmatter.color.as_deref())
}

/// How the typesetting engine lays out an equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Inline,
    #[default]
    Block,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Inline => "inline",
            DisplayMode::Block => "block",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "inline" => Some(DisplayMode::Inline),
            "block" => Some(DisplayMode::Block),
            _ => None,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<DisplayModeSetting> for DisplayMode {
    fn from(setting: DisplayModeSetting) -> Self {
        match setting {
            DisplayModeSetting::Inline => DisplayMode::Inline,
            DisplayModeSetting::Block => DisplayMode::Block,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equation(id: &str, start: usize, end: usize, color: Option<&str>) -> Equation {
        Equation {
            id: EquationId::from(id),
            label: id.to_string(),
            latex: "x".to_string(),
            start_line: start,
            end_line: end,
            color: color.map(str::to_string),
            rendered_svg: None,
        }
    }

    #[test]
    fn maps_cursor_line_to_equation() {
        let doc = ParsedDocument {
            frontmatter: Frontmatter::default(),
            equations: vec![equation("a", 0, 2, None), equation("b", 4, 6, None)],
        };
        assert_eq!(doc.equation_at_line(1).map(|eq| eq.label.as_str()), Some("a"));
        assert_eq!(doc.equation_at_line(6).map(|eq| eq.label.as_str()), Some("b"));
        assert!(doc.equation_at_line(3).is_none());
    }

    #[test]
    fn equation_color_overrides_global() {
        let doc = ParsedDocument {
            frontmatter: Frontmatter {
                color: Some("red".to_string()),
                ..Default::default()
            },
            equations: vec![equation("a", 0, 0, Some("blue")), equation("b", 2, 2, None)],
        };
        assert_eq!(doc.effective_color(&doc.equations[0]), Some("blue"));
        assert_eq!(doc.effective_color(&doc.equations[1]), Some("red"));
    }

    #[test]
    fn apply_render_caches_svg() {
        let mut doc = ParsedDocument {
            frontmatter: Frontmatter::default(),
            equations: vec![equation("a", 0, 0, None)],
        };
        assert!(doc.apply_render(&EquationId::from("a"), "<svg/>".to_string()));
        assert!(!doc.apply_render(&EquationId::from("zz"), "<svg/>".to_string()));
        assert_eq!(doc.equations[0].rendered_svg.as_deref(), Some("<svg/>"));
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(EquationId::generate(), EquationId::generate());
    }
}
