// src/model/builder.rs

//! Accumulates model fragments and freezes them into a [`ClassLoaderModel`]

use std::collections::BTreeMap;
use tracing::debug;

use super::{CLASS_LOADER_MODEL_VERSION, ClassLoaderModel, SharedLibrary};
use crate::artifact::{Artifact, ArtifactCoordinate};
use crate::error::{Error, Result};

/// Builder for [`ClassLoaderModel`]
///
/// Nothing is validated until [`build`](Self::build): plugin keys must carry
/// the plugin classifier and every shared library must match a dependency.
#[derive(Debug, Clone)]
pub struct ClassLoaderModelBuilder {
    version: String,
    artifact_coordinates: ArtifactCoordinate,
    dependencies: Vec<Artifact>,
    plugins: Vec<(Artifact, Vec<Artifact>)>,
    shared_libraries: Vec<SharedLibrary>,
}

impl ClassLoaderModelBuilder {
    pub fn new(artifact_coordinates: ArtifactCoordinate) -> Self {
        Self {
            version: CLASS_LOADER_MODEL_VERSION.to_string(),
            artifact_coordinates,
            dependencies: Vec::new(),
            plugins: Vec::new(),
            shared_libraries: Vec::new(),
        }
    }

    /// Override the schema version, used when reading existing models
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn dependency(mut self, artifact: Artifact) -> Self {
        self.dependencies.push(artifact);
        self
    }

    pub fn dependencies(mut self, artifacts: impl IntoIterator<Item = Artifact>) -> Self {
        self.dependencies.extend(artifacts);
        self
    }

    pub fn plugin(mut self, plugin: Artifact, dependencies: Vec<Artifact>) -> Self {
        self.plugins.push((plugin, dependencies));
        self
    }

    pub fn shared_library(mut self, library: SharedLibrary) -> Self {
        self.shared_libraries.push(library);
        self
    }

    pub fn shared_libraries(mut self, libraries: impl IntoIterator<Item = SharedLibrary>) -> Self {
        self.shared_libraries.extend(libraries);
        self
    }

    pub fn build(self) -> Result<ClassLoaderModel> {
        let invalid: Vec<String> = self
            .plugins
            .iter()
            .filter(|(p, _)| !p.is_plugin())
            .map(|(p, _)| p.coordinates.to_string())
            .collect();
        if !invalid.is_empty() {
            return Err(Error::InvalidPlugin(invalid.join(", ")));
        }

        let mut dependencies = sorted_unique(self.dependencies);
        for library in &self.shared_libraries {
            let mut matched = false;
            for artifact in dependencies
                .iter_mut()
                .filter(|a| a.coordinates.matches(&library.group_id, &library.artifact_id))
            {
                debug!("Marking {} as shared", artifact.coordinates);
                artifact.shared = true;
                matched = true;
            }
            if !matched {
                return Err(Error::ConfigError(format!(
                    "Shared library {library} is not a dependency of {}",
                    self.artifact_coordinates
                )));
            }
        }

        let mut plugins: BTreeMap<Artifact, Vec<Artifact>> = BTreeMap::new();
        for (plugin, deps) in self.plugins {
            plugins.entry(plugin).or_default().extend(deps);
        }
        let plugins = plugins
            .into_iter()
            .map(|(plugin, deps)| (plugin, sorted_unique(deps)))
            .collect();

        Ok(ClassLoaderModel {
            version: self.version,
            artifact_coordinates: self.artifact_coordinates,
            dependencies,
            plugins,
        })
    }
}

/// Sort by coordinate keeping the first artifact seen for each coordinate
fn sorted_unique(mut artifacts: Vec<Artifact>) -> Vec<Artifact> {
    artifacts.sort_by(|a, b| a.coordinates.cmp(&b.coordinates));
    artifacts.dedup_by(|b, a| a.coordinates == b.coordinates);
    artifacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::PLUGIN_CLASSIFIER;

    fn artifact(group: &str, name: &str, version: &str) -> Artifact {
        Artifact::new(
            ArtifactCoordinate::new(group, name, version),
            format!("file:///repo/{name}-{version}.jar"),
        )
    }

    fn root() -> ArtifactCoordinate {
        ArtifactCoordinate::new("com.acme", "app", "1.0.0")
    }

    #[test]
    fn test_non_plugin_key_rejected() {
        let err = ClassLoaderModelBuilder::new(root())
            .plugin(artifact("org.lib", "json", "2.1"), Vec::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPlugin(ref m) if m.contains("org.lib:json:jar:2.1")));
    }

    #[test]
    fn test_dependencies_sorted_and_unique() {
        let model = ClassLoaderModelBuilder::new(root())
            .dependencies(vec![
                artifact("org.zeta", "z", "1.0"),
                artifact("org.alpha", "a", "1.0"),
                artifact("org.zeta", "z", "1.0"),
            ])
            .build()
            .unwrap();
        let names: Vec<&str> = model
            .dependencies()
            .iter()
            .map(|a| a.coordinates.artifact_id.as_str())
            .collect();
        assert_eq!(names, vec!["a", "z"]);
    }

    #[test]
    fn test_shared_library_tagging() {
        let model = ClassLoaderModelBuilder::new(root())
            .dependencies(vec![artifact("g1", "a1", "1.0"), artifact("g1", "a2", "1.0")])
            .shared_library(SharedLibrary::new("g1", "a1"))
            .build()
            .unwrap();
        let shared: Vec<bool> = model.dependencies().iter().map(|a| a.shared).collect();
        assert_eq!(shared, vec![true, false]);
    }

    #[test]
    fn test_unmatched_shared_library_is_config_error() {
        let err = ClassLoaderModelBuilder::new(root())
            .dependency(artifact("g1", "a1", "1.0"))
            .shared_library(SharedLibrary::new("g1", "missing"))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::ConfigError(ref m) if m.contains("g1:missing")));
    }

    #[test]
    fn test_plugin_regions_sorted() {
        let plugin = Artifact::new(
            ArtifactCoordinate::new("org.mule", "p", "1.0.0").with_classifier(PLUGIN_CLASSIFIER),
            "file:///repo/p.jar",
        );
        let model = ClassLoaderModelBuilder::new(root())
            .plugin(plugin.clone(), vec![artifact("org.y", "y", "2.0.0"), artifact("org.x", "x", "1.0.0")])
            .build()
            .unwrap();
        let region: Vec<&str> = model.plugins()[&plugin]
            .iter()
            .map(|a| a.coordinates.artifact_id.as_str())
            .collect();
        assert_eq!(region, vec!["x", "y"]);
    }
}
