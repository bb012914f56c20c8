//! Project container
//!
//! A versioned JSON record wrapping the document text with provenance and an optional
//! global preamble. The `document` field holds exactly the document text format.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::eqsvg::{GENERATOR, GENERATOR_VERSION};

/// Container format version written by this crate.
pub const PROJECT_VERSION: u32 = 1;

#[derive(Debug)]
pub enum ProjectError {
    Io(io::Error),
    Json(serde_json::Error),
    UnsupportedVersion(u32),
}

impl fmt::Display for ProjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectError::Io(err) => write!(f, "Project I/O failed: {err}"),
            ProjectError::Json(err) => write!(f, "Malformed project file: {err}"),
            ProjectError::UnsupportedVersion(version) => write!(
                f,
                "Unsupported project version {version} (expected at most {PROJECT_VERSION})"
            ),
        }
    }
}

impl std::error::Error for ProjectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProjectError::Io(err) => Some(err),
            ProjectError::Json(err) => Some(err),
            ProjectError::UnsupportedVersion(_) => None,
        }
    }
}

impl From<io::Error> for ProjectError {
    fn from(err: io::Error) -> Self {
        ProjectError::Io(err)
    }
}

impl From<serde_json::Error> for ProjectError {
    fn from(err: serde_json::Error) -> Self {
        ProjectError::Json(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub version: u32,
    pub metadata: ProjectMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_preamble: Option<String>,
    pub document: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub created_at: String,
    pub updated_at: String,
    pub generator: String,
    pub generator_version: String,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Project {
    pub fn new(document: impl Into<String>) -> Self {
        let timestamp = now();
        Project {
            version: PROJECT_VERSION,
            metadata: ProjectMetadata {
                created_at: timestamp.clone(),
                updated_at: timestamp,
                generator: GENERATOR.to_string(),
                generator_version: GENERATOR_VERSION.to_string(),
            },
            global_preamble: None,
            document: document.into(),
        }
    }

    /// Replace the document text and bump `updatedAt`.
    pub fn set_document(&mut self, document: impl Into<String>) {
        self.document = document.into();
        self.touch();
    }

    pub fn touch(&mut self) {
        self.metadata.updated_at = now();
        self.metadata.generator = GENERATOR.to_string();
        self.metadata.generator_version = GENERATOR_VERSION.to_string();
    }

    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        let project: Project = serde_json::from_str(json)?;
        if project.version > PROJECT_VERSION {
            return Err(ProjectError::UnsupportedVersion(project.version));
        }
        Ok(project)
    }

    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProjectError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
