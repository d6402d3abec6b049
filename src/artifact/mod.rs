// src/artifact/mod.rs

//! Artifact identities and resolved bundles
//!
//! - [`ArtifactCoordinate`]: immutable (group, name, version, type, classifier)
//! - [`ResolvedDependency`]: a coordinate located by the graph resolver
//! - [`Artifact`]: an entry of the classloader model
//! - [`DependencyKind`]: classification of a dependency by its classifier

mod coordinate;
mod declaration;
pub mod layout;

pub use coordinate::{ArtifactCoordinate, DEFAULT_ARTIFACT_TYPE, LibraryKey};
pub use declaration::{DependencyDeclaration, PluginDeclaration, PluginKey};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, Result};

/// Classifier carried by plugin artifacts
pub const PLUGIN_CLASSIFIER: &str = "mule-plugin";

/// Classifier carried by domain artifacts
pub const DOMAIN_CLASSIFIER: &str = "mule-domain";

/// How a dependency is loaded, decided purely by its classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    /// Regular library bundled with the application
    Application,
    /// Plugin with its own isolated classloading region
    Plugin,
    /// Domain loaded by the container, never bundled
    Domain,
}

impl DependencyKind {
    pub fn of(coordinate: &ArtifactCoordinate) -> Self {
        match coordinate.classifier() {
            Some(PLUGIN_CLASSIFIER) => DependencyKind::Plugin,
            Some(DOMAIN_CLASSIFIER) => DependencyKind::Domain,
            _ => DependencyKind::Application,
        }
    }
}

/// Dependency scope as reported by the graph resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Compile,
    Provided,
    Runtime,
    Test,
    System,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Compile => "compile",
            Scope::Provided => "provided",
            Scope::Runtime => "runtime",
            Scope::Test => "test",
            Scope::System => "system",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "compile" => Ok(Scope::Compile),
            "provided" => Ok(Scope::Provided),
            "runtime" => Ok(Scope::Runtime),
            "test" => Ok(Scope::Test),
            "system" => Ok(Scope::System),
            other => Err(Error::ParseError(format!("Unknown dependency scope: {other}"))),
        }
    }
}

/// A graph node returned by the dependency resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub coordinate: ArtifactCoordinate,
    /// Absolute location of the payload
    pub bundle_uri: Url,
    pub scope: Scope,
}

impl ResolvedDependency {
    pub fn new(coordinate: ArtifactCoordinate, bundle_uri: Url, scope: Scope) -> Self {
        Self {
            coordinate,
            bundle_uri,
            scope,
        }
    }

    pub fn kind(&self) -> DependencyKind {
        DependencyKind::of(&self.coordinate)
    }

    pub fn is_plugin(&self) -> bool {
        self.kind() == DependencyKind::Plugin
    }

    /// Local path of the payload
    pub fn bundle_path(&self) -> Result<PathBuf> {
        file_path(&self.bundle_uri.to_string(), &self.coordinate)
    }
}

impl fmt::Display for ResolvedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.coordinate, self.scope)
    }
}

/// Convert a `file:` location into a local path
fn file_path(uri: &str, coordinate: &ArtifactCoordinate) -> Result<PathBuf> {
    let url = Url::parse(uri).map_err(|e| {
        Error::ParseError(format!("Invalid location '{uri}' for {coordinate}: {e}"))
    })?;
    url.to_file_path().map_err(|()| {
        Error::ParseError(format!("Location '{uri}' for {coordinate} is not a local file"))
    })
}

/// An entry of the classloader model
///
/// `uri` is either an absolute `file:` URI (resolved form) or a path under
/// [`layout::REPOSITORY_FOLDER`] (relocatable form).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(rename = "artifactCoordinates")]
    pub coordinates: ArtifactCoordinate,
    pub uri: String,
    #[serde(default)]
    pub shared: bool,
}

impl Artifact {
    pub fn new(coordinates: ArtifactCoordinate, uri: impl Into<String>) -> Self {
        Self {
            coordinates,
            uri: uri.into(),
            shared: false,
        }
    }

    pub fn from_dependency(dependency: &ResolvedDependency) -> Self {
        Self::new(dependency.coordinate.clone(), dependency.bundle_uri.to_string())
    }

    pub fn kind(&self) -> DependencyKind {
        DependencyKind::of(&self.coordinates)
    }

    pub fn is_plugin(&self) -> bool {
        self.kind() == DependencyKind::Plugin
    }

    /// Copy with the source location replaced by its relocatable form
    pub fn with_parameterized_uri(&self) -> Self {
        Self {
            coordinates: self.coordinates.clone(),
            uri: layout::relocatable_uri(&self.coordinates),
            shared: self.shared,
        }
    }

    /// True when the location still needs a repository root to be usable
    pub fn is_parameterized(&self) -> bool {
        self.uri.starts_with(layout::REPOSITORY_FOLDER)
    }

    /// Local path of the payload; fails for relocatable locations
    pub fn source_path(&self) -> Result<PathBuf> {
        file_path(&self.uri, &self.coordinates)
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin() -> ArtifactCoordinate {
        ArtifactCoordinate::new("org.mule.connectors", "http", "1.0.0").with_classifier(PLUGIN_CLASSIFIER)
    }

    #[test]
    fn test_dependency_kind_of() {
        assert_eq!(DependencyKind::of(&plugin()), DependencyKind::Plugin);
        let domain = ArtifactCoordinate::new("g", "d", "1.0.0").with_classifier(DOMAIN_CLASSIFIER);
        assert_eq!(DependencyKind::of(&domain), DependencyKind::Domain);
        let lib = ArtifactCoordinate::new("g", "lib", "1.0.0").with_classifier("tests");
        assert_eq!(DependencyKind::of(&lib), DependencyKind::Application);
    }

    #[test]
    fn test_scope_parse() {
        assert_eq!("Provided".parse::<Scope>().unwrap(), Scope::Provided);
        assert!("optional".parse::<Scope>().is_err());
    }

    #[test]
    fn test_parameterized_copy_keeps_original() {
        let url = Url::parse("file:///home/me/.m2/repository/org/mule/connectors/http/1.0.0/http-1.0.0-mule-plugin.jar").unwrap();
        let dependency = ResolvedDependency::new(plugin(), url, Scope::Compile);
        let artifact = Artifact::from_dependency(&dependency);
        let relocatable = artifact.with_parameterized_uri();

        assert!(artifact.uri.starts_with("file:///home/me"));
        assert!(!artifact.is_parameterized());
        assert_eq!(
            relocatable.uri,
            "repository/org/mule/connectors/http/1.0.0/http-1.0.0-mule-plugin.jar"
        );
        assert!(relocatable.is_parameterized());
        assert!(relocatable.source_path().is_err());
    }

    #[test]
    fn test_bundle_path() {
        let url = Url::parse("file:///tmp/repo/a-1.0.jar").unwrap();
        let dependency = ResolvedDependency::new(ArtifactCoordinate::new("g", "a", "1.0"), url, Scope::Runtime);
        assert_eq!(dependency.bundle_path().unwrap(), PathBuf::from("/tmp/repo/a-1.0.jar"));
    }
}
