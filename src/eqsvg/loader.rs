//! Document loading
//!
//! String and file entry points. String-based methods do the work; file-based methods
//! read the file, pick the source kind from the extension and delegate.
//!
//! Supported sources:
//!
//! - document text (any extension not listed below)
//! - `.svg` round-trip artifacts, through [codec::decode](crate::eqsvg::codec::decode)
//! - `.json` project containers, through [Project](crate::eqsvg::project::Project)
//!
//! PNG exports carry no equations and are refused.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::eqsvg::codec::{decode, CodecError};
use crate::eqsvg::color::ColorMode;
use crate::eqsvg::document::{Equation, ParsedDocument};
use crate::eqsvg::parsing::parse_with_mode;
use crate::eqsvg::project::{Project, ProjectError};

#[derive(Debug)]
pub enum LoadError {
    Io { path: PathBuf, source: io::Error },
    Codec(CodecError),
    Project(ProjectError),
    UnsupportedSource(PathBuf),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            LoadError::Codec(err) => write!(f, "{err}"),
            LoadError::Project(err) => write!(f, "{err}"),
            LoadError::UnsupportedSource(path) => write!(
                f,
                "{} cannot be imported (raster exports carry no equations)",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<CodecError> for LoadError {
    fn from(err: CodecError) -> Self {
        LoadError::Codec(err)
    }
}

impl From<ProjectError> for LoadError {
    fn from(err: ProjectError) -> Self {
        LoadError::Project(err)
    }
}

/// What kind of file a path holds, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Document,
    Artifact,
    Project,
    Raster,
}

impl SourceKind {
    pub fn of(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("svg") => SourceKind::Artifact,
            Some("json") => SourceKind::Project,
            Some("png") => SourceKind::Raster,
            _ => SourceKind::Document,
        }
    }
}

/// Primary API for turning sources into [ParsedDocument]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentLoader {
    mode: ColorMode,
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: ColorMode) -> Self {
        DocumentLoader { mode }
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn parse(&self, source: &str, previous: &[Equation]) -> ParsedDocument {
        parse_with_mode(source, previous, self.mode)
    }

    /// Decode an artifact, keeping the ids it records.
    pub fn import_svg(&self, svg: &str) -> Result<ParsedDocument, CodecError> {
        Ok(decode(svg)?.to_document(self.mode))
    }

    /// Decode an artifact, reusing ids from `previous` first and recorded ids second.
    pub fn import_svg_with(
        &self,
        svg: &str,
        previous: &[Equation],
    ) -> Result<ParsedDocument, CodecError> {
        Ok(decode(svg)?.to_document_with(self.mode, previous))
    }

    /// The document text held by a file of any supported kind.
    pub fn load_text(&self, path: impl AsRef<Path>) -> Result<String, LoadError> {
        let path = path.as_ref();
        match SourceKind::of(path) {
            SourceKind::Raster => Err(LoadError::UnsupportedSource(path.to_path_buf())),
            SourceKind::Project => Ok(Project::load(path)?.document),
            SourceKind::Artifact => Ok(decode(&read(path)?)?.to_document_text()),
            SourceKind::Document => read(path),
        }
    }

    pub fn load_and_parse(
        &self,
        path: impl AsRef<Path>,
        previous: &[Equation],
    ) -> Result<ParsedDocument, LoadError> {
        let path = path.as_ref();
        if SourceKind::of(path) == SourceKind::Artifact {
            return Ok(self.import_svg_with(&read(path)?, previous)?);
        }
        let text = self.load_text(path)?;
        Ok(self.parse(&text, previous))
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
