//! PNG export
//!
//! A lossy side path: the embedded equations are dropped, so PNG files are never import
//! sources. `ex` lengths are converted to points first (1ex = 8pt) because the
//! rasterizer has no font context to resolve them.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;

/// Points per `ex`.
pub const EX_TO_PT: f64 = 8.0;

/// Fixed oversampling, multiplied with the display's pixel density.
pub const OVERSAMPLE: f32 = 4.0;

static EX_LENGTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(\s)(width|height)="([0-9]*\.?[0-9]+)ex""#).unwrap());

static METADATA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<metadata\b[^>]*>.*?</metadata>").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub enum RasterError {
    ParseFailed(String),
    EmptyImage { width: u32, height: u32 },
    EncodeFailed(String),
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::ParseFailed(msg) => write!(f, "Failed to parse SVG: {msg}"),
            RasterError::EmptyImage { width, height } => {
                write!(f, "Cannot allocate a {width}x{height} image")
            }
            RasterError::EncodeFailed(msg) => write!(f, "Failed to encode PNG: {msg}"),
        }
    }
}

impl std::error::Error for RasterError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Device pixel ratio of the target display.
    pub pixel_density: f32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        RasterOptions { pixel_density: 1.0 }
    }
}

impl RasterOptions {
    pub fn scale(&self) -> f32 {
        OVERSAMPLE * self.pixel_density.max(f32::EPSILON)
    }
}

/// Rewrite `ex` widths and heights into points.
pub fn ex_to_points(svg: &str) -> String {
    EX_LENGTH
        .replace_all(svg, |caps: &Captures| {
            let value: f64 = caps[3].parse().unwrap_or(0.0);
            format!("{}{}=\"{:.3}pt\"", &caps[1], &caps[2], value * EX_TO_PT)
        })
        .into_owned()
}

pub fn strip_metadata(svg: &str) -> String {
    METADATA.replace_all(svg, "").into_owned()
}

/// Rasterize an artifact (or any SVG) into PNG bytes.
pub fn rasterize_png(svg: &str, options: RasterOptions) -> Result<Vec<u8>, RasterError> {
    let prepared = ex_to_points(&strip_metadata(svg));

    let tree = usvg::Tree::from_str(&prepared, &usvg::Options::default())
        .map_err(|e| RasterError::ParseFailed(e.to_string()))?;

    let scale = options.scale();
    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(RasterError::EmptyImage { width, height })?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    pixmap
        .encode_png()
        .map_err(|e| RasterError::EncodeFailed(e.to_string()))
}
