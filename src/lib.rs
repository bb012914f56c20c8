//! # eqsvg
//!
//! Edit collections of LaTeX equations and export them as SVG images that carry
//! their own source equations as embedded metadata.
//!
//! File Layout
//!
//! Everything lives under [eqsvg](crate::eqsvg), split by stage:
//! src/eqsvg
//!   ├── color        Color literal normalization and preset resolution
//!   ├── document     The equation model shared by every stage
//!   ├── parsing      Raw text -> frontmatter + equations with stable ids
//!   ├── serializing  Equations -> raw text
//!   ├── codec        Self-describing SVG artifacts (encode and decode)
//!   ├── raster       Lossy PNG side path
//!   ├── render       Typesetting engine boundary and the render coordinator
//!   ├── project      Versioned project container
//!   ├── export       Artifact naming and per-equation export
//!   └── loader       File and string entry points
//!
//! The document text format and the SVG artifact must agree on the equation
//! field set: an exported artifact decodes back into the same model that the
//! parser produces.

pub mod eqsvg;
