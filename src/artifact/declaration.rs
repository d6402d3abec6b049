// src/artifact/declaration.rs

//! Additional-dependency declarations attached to plugins

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::ArtifactCoordinate;
use super::coordinate::DEFAULT_ARTIFACT_TYPE;

/// A library a plugin requests beyond its own dependency graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDeclaration {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(rename = "type", default = "default_type")]
    pub artifact_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    /// Local file to use instead of resolving the coordinate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_path: Option<PathBuf>,
}

fn default_type() -> String {
    DEFAULT_ARTIFACT_TYPE.to_string()
}

impl DependencyDeclaration {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            artifact_type: default_type(),
            classifier: None,
            system_path: None,
        }
    }

    pub fn coordinate(&self) -> ArtifactCoordinate {
        ArtifactCoordinate {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            version: self.version.clone(),
            artifact_type: self.artifact_type.clone(),
            classifier: self.classifier.clone(),
        }
    }

    /// Same library (group, artifact, type, classifier), any version
    pub fn same_library(&self, other: &DependencyDeclaration) -> bool {
        self.group_id == other.group_id
            && self.artifact_id == other.artifact_id
            && self.artifact_type == other.artifact_type
            && self.classifier == other.classifier
    }
}

impl fmt::Display for DependencyDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinate())
    }
}

/// Additional dependencies declared for one target plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDeclaration {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default)]
    pub additional_dependencies: Vec<DependencyDeclaration>,
}

impl PluginDeclaration {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            additional_dependencies: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, dependency: DependencyDeclaration) -> Self {
        self.additional_dependencies.push(dependency);
        self
    }

    /// The (group, artifact) pair identifying the target plugin
    pub fn key(&self) -> PluginKey {
        PluginKey {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
        }
    }
}

/// (group, artifact) identity of a plugin targeted by declarations
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PluginKey {
    pub group_id: String,
    pub artifact_id: String,
}

impl fmt::Display for PluginKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}
