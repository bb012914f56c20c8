//! SVG round-trip codec
//!
//!     Exported SVG artifacts embed the equations they were rendered from, so an artifact
//!     can be opened again as a document. The equation is recorded twice:
//!
//!         - a `<metadata id="latex-equations">` element holding a JSON payload
//!           ([ArtifactMetadata]) with provenance and an array of equations;
//!         - a `<g data-role="latex-equation">` wrapper around the rendered markup whose
//!           attributes carry the id, latex and display mode.
//!
//!     Decoding prefers the metadata and falls back to the wrapper attributes, so either
//!     channel alone is enough to recover the equation.
//!
//!     Attribute extraction is pattern based and never fails on malformed markup; absent
//!     or unparsable dimensions fall back to fixed defaults.

pub mod decode;
pub mod dimensions;
pub mod encode;
pub mod escape;
pub mod metadata;

pub use decode::{decode, CodecError, DecodedArtifact};
pub use encode::{encode, encode_at, EquationRef};
pub use metadata::{ArtifactMetadata, EmbeddedEquation, Provenance};

/// `id` of the metadata element.
pub const METADATA_ID: &str = "latex-equations";

/// `data-type` of the metadata element.
pub const METADATA_TYPE: &str = "application/json";

/// `data-role` of the per-equation wrapper group.
pub const EQUATION_ROLE: &str = "latex-equation";
