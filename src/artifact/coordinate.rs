// src/artifact/coordinate.rs

//! Artifact coordinates: the (group, name, version, type, classifier) tuple

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Type used when a coordinate does not name one
pub const DEFAULT_ARTIFACT_TYPE: &str = "jar";

/// Identifies a library in a repository
///
/// Ordering compares group, name, version, classifier and type, in that
/// order, so that sorted collections serialize deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactCoordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(rename = "type", default = "default_type")]
    pub artifact_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
}

fn default_type() -> String {
    DEFAULT_ARTIFACT_TYPE.to_string()
}

/// Identity of a library regardless of its version
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LibraryKey {
    pub group_id: String,
    pub artifact_id: String,
    pub classifier: Option<String>,
    pub artifact_type: String,
}

impl ArtifactCoordinate {
    /// Create a `jar` coordinate without classifier
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            artifact_type: DEFAULT_ARTIFACT_TYPE.to_string(),
            classifier: None,
        }
    }

    pub fn with_type(mut self, artifact_type: impl Into<String>) -> Self {
        self.artifact_type = artifact_type.into();
        self
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// Same coordinate at a different version
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..self.clone()
        }
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    /// Key shared by every version of this library
    pub fn library_key(&self) -> LibraryKey {
        LibraryKey {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            classifier: self.classifier.clone(),
            artifact_type: self.artifact_type.clone(),
        }
    }

    /// Same artifact, possibly at a different version
    pub fn same_library(&self, other: &ArtifactCoordinate) -> bool {
        self.group_id == other.group_id
            && self.artifact_id == other.artifact_id
            && self.classifier == other.classifier
            && self.artifact_type == other.artifact_type
    }

    /// Matches a (group, artifact) pair as used by plugin and shared-library declarations
    pub fn matches(&self, group_id: &str, artifact_id: &str) -> bool {
        self.group_id == group_id && self.artifact_id == artifact_id
    }

    /// Parse `group:artifact:version`, `group:artifact:type:version` or
    /// `group:artifact:type:classifier:version`
    pub fn parse(s: &str) -> Result<Self, Error> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(Error::ParseError(format!("Empty component in coordinate '{s}'")));
        }
        let coordinate = match parts.as_slice() {
            [group, artifact, version] => Self::new(*group, *artifact, *version),
            [group, artifact, artifact_type, version] => {
                Self::new(*group, *artifact, *version).with_type(*artifact_type)
            }
            [group, artifact, artifact_type, classifier, version] => {
                Self::new(*group, *artifact, *version)
                    .with_type(*artifact_type)
                    .with_classifier(*classifier)
            }
            _ => {
                return Err(Error::ParseError(format!(
                    "Expected group:artifact[:type[:classifier]]:version, found '{s}'"
                )));
            }
        };
        Ok(coordinate)
    }
}

impl Ord for ArtifactCoordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.group_id
            .cmp(&other.group_id)
            .then_with(|| self.artifact_id.cmp(&other.artifact_id))
            .then_with(|| self.version.cmp(&other.version))
            .then_with(|| self.classifier.cmp(&other.classifier))
            .then_with(|| self.artifact_type.cmp(&other.artifact_type))
    }
}

impl PartialOrd for ArtifactCoordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.artifact_type)?;
        if let Some(ref classifier) = self.classifier {
            write!(f, ":{}", classifier)?;
        }
        write!(f, ":{}", self.version)
    }
}

impl FromStr for ArtifactCoordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactCoordinate::parse(s)
    }
}
