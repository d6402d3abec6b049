// src/model/mod.rs

//! Classloader model - the resolved dependency closure of a packaged artifact
//!
//! A model holds the application's flat dependency list and one isolated
//! region per plugin. It is produced once per packaging run by
//! [`ClassLoaderModelBuilder`] and is immutable afterwards; the relocatable
//! variant is obtained through [`ClassLoaderModel::parameterized`], which
//! returns a new model.
//!
//! # Example classloader-model.json
//!
//! ```json
//! {
//!   "version": "1.2.0",
//!   "artifactCoordinates": {
//!     "groupId": "com.acme",
//!     "artifactId": "orders-app",
//!     "version": "1.0.0",
//!     "type": "jar",
//!     "classifier": "mule-application"
//!   },
//!   "dependencies": [
//!     {
//!       "artifactCoordinates": { "groupId": "org.lib", "artifactId": "json", "version": "2.1", "type": "jar" },
//!       "uri": "repository/org/lib/json/2.1/json-2.1.jar",
//!       "shared": false
//!     }
//!   ],
//!   "mulePlugins": [
//!     { "plugin": { ... }, "dependencies": [ ... ] }
//!   ]
//! }
//! ```

mod builder;
pub mod serialize;

pub use builder::ClassLoaderModelBuilder;
pub use serialize::{deserialize, deserialize_from_file, serialize, serialize_to_file};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::artifact::{Artifact, ArtifactCoordinate};

/// Schema version written into every model
pub const CLASS_LOADER_MODEL_VERSION: &str = "1.2.0";

/// File name of a serialized model
pub const CLASS_LOADER_MODEL_FILE: &str = "classloader-model.json";

/// A library loaded once at application level instead of per region
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SharedLibrary {
    pub group_id: String,
    pub artifact_id: String,
}

impl SharedLibrary {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }
}

impl fmt::Display for SharedLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// Resolved dependency closure of a packaged artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLoaderModel {
    version: String,
    artifact_coordinates: ArtifactCoordinate,
    /// Sorted by coordinate, one entry per coordinate
    dependencies: Vec<Artifact>,
    /// Plugin artifact to its region, each region sorted by coordinate
    plugins: BTreeMap<Artifact, Vec<Artifact>>,
}

impl ClassLoaderModel {
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn artifact_coordinates(&self) -> &ArtifactCoordinate {
        &self.artifact_coordinates
    }

    pub fn dependencies(&self) -> &[Artifact] {
        &self.dependencies
    }

    pub fn plugins(&self) -> &BTreeMap<Artifact, Vec<Artifact>> {
        &self.plugins
    }

    /// Region of the plugin with the given coordinate
    pub fn plugin_dependencies(&self, plugin: &ArtifactCoordinate) -> Option<&[Artifact]> {
        self.plugins
            .iter()
            .find(|(p, _)| &p.coordinates == plugin)
            .map(|(_, deps)| deps.as_slice())
    }

    /// Every artifact the model references: flat list, plugins and regions
    ///
    /// One entry per coordinate. When a coordinate appears both in the flat
    /// list and in a region, the flat list entry (with its shared flag) is kept.
    pub fn artifacts(&self) -> BTreeSet<Artifact> {
        let mut by_coordinate: BTreeMap<&ArtifactCoordinate, &Artifact> = BTreeMap::new();
        let regions = self
            .plugins
            .iter()
            .flat_map(|(plugin, deps)| std::iter::once(plugin).chain(deps));
        for artifact in self.dependencies.iter().chain(regions) {
            by_coordinate.entry(&artifact.coordinates).or_insert(artifact);
        }
        by_coordinate.into_values().cloned().collect()
    }

    /// Copy of this model with every location relative to a repository root
    pub fn parameterized(&self) -> ClassLoaderModel {
        let relocate = |artifacts: &[Artifact]| -> Vec<Artifact> {
            artifacts.iter().map(Artifact::with_parameterized_uri).collect()
        };
        ClassLoaderModel {
            version: self.version.clone(),
            artifact_coordinates: self.artifact_coordinates.clone(),
            dependencies: relocate(&self.dependencies),
            plugins: self
                .plugins
                .iter()
                .map(|(plugin, deps)| (plugin.with_parameterized_uri(), relocate(deps)))
                .collect(),
        }
    }

    pub fn is_parameterized(&self) -> bool {
        self.artifacts().iter().all(Artifact::is_parameterized)
    }

    /// Model describing a single plugin's region, as shipped next to the plugin
    pub fn plugin_model(&self, plugin: &Artifact) -> Option<ClassLoaderModel> {
        let deps = self.plugins.get(plugin)?;
        Some(ClassLoaderModel {
            version: self.version.clone(),
            artifact_coordinates: plugin.coordinates.clone(),
            dependencies: deps.clone(),
            plugins: BTreeMap::new(),
        })
    }
}
