//! Main module for eqsvg library functionality

pub mod codec;
pub mod color;
pub mod document;
pub mod export;
pub mod loader;
pub mod parsing;
pub mod project;
pub mod raster;
pub mod render;
pub mod serializing;
pub mod testing;

pub use document::{DisplayMode, Equation, EquationId, Frontmatter, ParsedDocument};
pub use parsing::{parse, parse_with_mode};

/// Name written into artifact and project provenance fields.
pub const GENERATOR: &str = "eqsvg";

/// Version written into artifact and project provenance fields.
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");
