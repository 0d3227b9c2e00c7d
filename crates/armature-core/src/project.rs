//! Project file serialization

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::armature::Armature;
use crate::bake::BakeOptions;
use crate::constants::PROJECT_VERSION;

/// Project file containing an armature and its bake settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// File format version
    pub version: u32,
    /// Project name
    pub name: String,
    /// The posed armature
    pub armature: Armature,
    /// Bake configuration
    #[serde(default)]
    pub bake_options: BakeOptions,
}

impl Default for Project {
    fn default() -> Self {
        Self::new("New Project")
    }
}

impl Project {
    /// Create a new project with an empty armature
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            version: PROJECT_VERSION,
            armature: Armature::new(name.clone()),
            name,
            bake_options: BakeOptions::default(),
        }
    }

    /// Create a project around an existing armature
    pub fn with_armature(name: impl Into<String>, armature: Armature) -> Self {
        Self {
            version: PROJECT_VERSION,
            name: name.into(),
            armature,
            bake_options: BakeOptions::default(),
        }
    }

    /// Save project to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProjectError> {
        let path = path.as_ref();
        let content = self.to_bytes()?;
        std::fs::write(path, content).map_err(|e| ProjectError::Io(e.to_string()))?;
        tracing::info!("saved project '{}' to {}", self.name, path.display());
        Ok(())
    }

    /// Serialize project to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProjectError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ProjectError::Serialize(e.to_string()))?;
        Ok(content.into_bytes())
    }

    /// Load project from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ProjectError::Io(e.to_string()))?;
        Self::load_from_bytes(content.as_bytes())
    }

    /// Load project from bytes
    pub fn load_from_bytes(data: &[u8]) -> Result<Self, ProjectError> {
        let content =
            std::str::from_utf8(data).map_err(|e| ProjectError::Deserialize(e.to_string()))?;
        let project: Project =
            ron::from_str(content).map_err(|e| ProjectError::Deserialize(e.to_string()))?;
        if project.version > PROJECT_VERSION {
            return Err(ProjectError::UnsupportedVersion(project.version));
        }
        project.armature.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            ProjectError::Deserialize(format!("invalid armature: {}", messages.join("; ")))
        })?;
        Ok(project)
    }
}

/// Project-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProjectError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    #[error("Unsupported project version: {0}")]
    UnsupportedVersion(u32),
}
