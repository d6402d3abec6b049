// src/config/mod.rs

//! Packaging configuration
//!
//! # Example packaging.toml
//!
//! ```toml
//! [artifact]
//! coordinates = "com.acme:orders-app:jar:mule-application:1.0.0"
//! include_test_dependencies = false
//!
//! # Loaded once at application level
//! [[shared_libraries]]
//! group_id = "org.postgresql"
//! artifact_id = "postgresql"
//!
//! # Libraries attached to a plugin's region
//! [[additional_plugin_dependencies]]
//! group_id = "org.mule.connectors"
//! artifact_id = "mule-db-connector"
//!
//! [[additional_plugin_dependencies.additional_dependencies]]
//! group_id = "org.postgresql"
//! artifact_id = "postgresql"
//! version = "42.2.5"
//!
//! [output]
//! directory = "target"
//! parameterize_uris = true
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::artifact::{ArtifactCoordinate, DependencyDeclaration, PluginDeclaration};
use crate::error::{Error, Result};
use crate::model::SharedLibrary;

/// Default output directory, relative to the configuration file
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "target";

/// Complete packaging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagingConfig {
    pub artifact: ArtifactSection,

    #[serde(default)]
    pub shared_libraries: Vec<SharedLibrary>,

    #[serde(default)]
    pub additional_plugin_dependencies: Vec<PluginDeclaration>,

    #[serde(default)]
    pub output: OutputSection,
}

/// The artifact being packaged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSection {
    /// `group:artifact[:type[:classifier]]:version`
    pub coordinates: String,

    #[serde(default)]
    pub include_test_dependencies: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    /// Serialize relocatable locations instead of absolute ones
    #[serde(default = "default_true")]
    pub parameterize_uris: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            parameterize_uris: true,
        }
    }
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIRECTORY)
}

fn default_true() -> bool {
    true
}

impl PackagingConfig {
    /// Configuration for `coordinates` with every option at its default
    pub fn new(coordinates: impl Into<String>) -> Self {
        Self {
            artifact: ArtifactSection {
                coordinates: coordinates.into(),
                include_test_dependencies: false,
            },
            shared_libraries: Vec::new(),
            additional_plugin_dependencies: Vec::new(),
            output: OutputSection::default(),
        }
    }

    /// Load and validate a configuration file
    ///
    /// A relative output directory is taken from the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        if config.output.directory.is_relative() {
            let base = path.parent().unwrap_or(Path::new("."));
            config.output.directory = base.join(&config.output.directory);
        }
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: PackagingConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Coordinates of the packaged artifact
    pub fn root(&self) -> Result<ArtifactCoordinate> {
        ArtifactCoordinate::parse(&self.artifact.coordinates)
            .map_err(|e| Error::ConfigError(format!("Invalid artifact coordinates: {e}")))
    }

    /// Reject empty required fields before anything is resolved
    pub fn validate(&self) -> Result<()> {
        self.root()?;

        let mut shared = HashSet::new();
        for library in &self.shared_libraries {
            require(&library.group_id, "groupId", "shared library")?;
            require(&library.artifact_id, "artifactId", "shared library")?;
            if !shared.insert(library) {
                return Err(Error::ConfigError(format!(
                    "Shared library {library} is declared more than once"
                )));
            }
        }

        for plugin in &self.additional_plugin_dependencies {
            require(&plugin.group_id, "groupId", "additional plugin dependencies")?;
            require(&plugin.artifact_id, "artifactId", "additional plugin dependencies")?;
            for dependency in &plugin.additional_dependencies {
                validate_dependency(dependency, plugin)?;
            }
        }
        Ok(())
    }
}

fn require(value: &str, element: &str, context: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::ConfigError(format!(
            "Expecting child element with not null value {element} in {context}"
        )));
    }
    Ok(())
}

fn validate_dependency(dependency: &DependencyDeclaration, plugin: &PluginDeclaration) -> Result<()> {
    let context = format!("additional dependencies of {}", plugin.key());
    require(&dependency.group_id, "groupId", &context)?;
    require(&dependency.artifact_id, "artifactId", &context)?;
    require(&dependency.version, "version", &context)?;
    require(&dependency.artifact_type, "type", &context)
}
