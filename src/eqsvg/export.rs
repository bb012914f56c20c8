//! Per-equation export
//!
//! SVG exports are round-trip artifacts (see [codec](crate::eqsvg::codec)); PNG exports
//! are rasterized from that artifact and lose the embedded equations.

use std::fmt;

use crate::eqsvg::codec::{encode, EquationRef};
use crate::eqsvg::document::{DisplayMode, Equation, EquationId};
use crate::eqsvg::raster::{rasterize_png, RasterError, RasterOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Svg,
    Png,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "svg" => Some(ExportFormat::Svg),
            "png" => Some(ExportFormat::Png),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportError {
    /// The equation has no cached rendering.
    NotRendered(EquationId),
    Raster(RasterError),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::NotRendered(id) => write!(f, "Equation '{id}' has not been rendered"),
            ExportError::Raster(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<RasterError> for ExportError {
    fn from(err: RasterError) -> Self {
        ExportError::Raster(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub id: EquationId,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// File name for an equation's artifact, derived from its label.
pub fn artifact_file_name(equation: &Equation, format: ExportFormat) -> String {
    let stem: String = equation
        .label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let stem = stem.trim_matches(|c| c == '.' || c == '-');
    let stem = if stem.is_empty() {
        equation.id.as_str()
    } else {
        stem
    };
    format!("{stem}.{}", format.extension())
}

pub fn export_equation(
    equation: &Equation,
    display_mode: DisplayMode,
    format: ExportFormat,
    raster: RasterOptions,
) -> Result<Artifact, ExportError> {
    let rendered = equation
        .rendered_svg
        .as_deref()
        .ok_or_else(|| ExportError::NotRendered(equation.id.clone()))?;
    let svg = encode(rendered, EquationRef::from(equation), display_mode);

    let bytes = match format {
        ExportFormat::Svg => svg.into_bytes(),
        ExportFormat::Png => rasterize_png(&svg, raster)?,
    };

    Ok(Artifact {
        id: equation.id.clone(),
        file_name: artifact_file_name(equation, format),
        bytes,
    })
}
