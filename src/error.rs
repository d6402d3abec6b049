// src/error.rs

//! Error types for classloader model resolution and repository installation

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving, assembling or installing a classloader model
///
/// Every variant is fatal for the packaging run that produced it; there is no
/// partially resolved model.
#[derive(Debug, Error)]
pub enum Error {
    /// A coordinate could not be located or resolved by the graph resolver
    #[error("Failed to resolve {coordinate}: {reason}")]
    ResolutionError { coordinate: String, reason: String },

    /// Packaging configuration or plugin build metadata is inconsistent
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Two contributions of the same library disagree on the major version
    #[error(
        "Attempting to add different major versions of the same dependency as additional plugin dependency. \
         If this is not explicitly defined, check transitive dependencies. These are: {existing} and {candidate}"
    )]
    VersionConflict { existing: String, candidate: String },

    /// A non-plugin artifact was used as a plugin region key
    #[error("The following artifacts are not plugins but are trying to be added as such: {0}")]
    InvalidPlugin(String),

    /// Copying an artifact into the mirrored repository failed
    #[error("Failed to install {artifact} into {}: {source}", destination.display())]
    InstallError {
        artifact: String,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl Error {
    pub(crate) fn resolution(coordinate: impl ToString, reason: impl Into<String>) -> Self {
        Error::ResolutionError {
            coordinate: coordinate.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::ParseError(format!("Invalid classloader model JSON: {e}"))
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::ParseError(format!("Invalid TOML: {e}"))
    }
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        Error::ParseError(format!("Invalid descriptor XML: {e}"))
    }
}

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_conflict_names_both_coordinates() {
        let err = Error::VersionConflict {
            existing: "org.foo:bar:jar:1.2.0".to_string(),
            candidate: "org.foo:bar:jar:2.0.0".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("org.foo:bar:jar:1.2.0"));
        assert!(message.contains("org.foo:bar:jar:2.0.0"));
    }

    #[test]
    fn test_install_error_names_destination() {
        let err = Error::InstallError {
            artifact: "org.foo:bar:jar:1.0.0".to_string(),
            destination: PathBuf::from("/repo/org/foo/bar/1.0.0"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        };
        let message = err.to_string();
        assert!(message.contains("org.foo:bar:jar:1.0.0"));
        assert!(message.contains("/repo/org/foo/bar/1.0.0"));
    }
}
