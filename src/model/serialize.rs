// src/model/serialize.rs

//! JSON form of a classloader model
//!
//! Field order is fixed by the wire structs below, not by insertion order, so
//! two runs over the same closure produce identical bytes. Plugin regions are
//! written as an array of `{ "plugin", "dependencies" }` pairs sorted by
//! plugin coordinate, since an artifact is not a valid JSON object key.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use super::{CLASS_LOADER_MODEL_FILE, ClassLoaderModel, ClassLoaderModelBuilder};
use crate::artifact::{Artifact, ArtifactCoordinate};
use crate::error::Result;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModelDocument<'a> {
    version: &'a str,
    artifact_coordinates: &'a ArtifactCoordinate,
    dependencies: &'a [Artifact],
    mule_plugins: Vec<PluginEntry<'a>>,
}

#[derive(Serialize)]
struct PluginEntry<'a> {
    plugin: &'a Artifact,
    dependencies: &'a [Artifact],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnedModelDocument {
    version: String,
    artifact_coordinates: ArtifactCoordinate,
    #[serde(default)]
    dependencies: Vec<Artifact>,
    #[serde(default)]
    mule_plugins: Vec<OwnedPluginEntry>,
}

#[derive(Deserialize)]
struct OwnedPluginEntry {
    plugin: Artifact,
    #[serde(default)]
    dependencies: Vec<Artifact>,
}

/// Pretty-printed JSON, terminated by a newline
pub fn serialize(model: &ClassLoaderModel) -> Result<String> {
    let document = ModelDocument {
        version: model.version(),
        artifact_coordinates: model.artifact_coordinates(),
        dependencies: model.dependencies(),
        mule_plugins: model
            .plugins()
            .iter()
            .map(|(plugin, dependencies)| PluginEntry {
                plugin,
                dependencies,
            })
            .collect(),
    };
    let mut json = serde_json::to_string_pretty(&document)?;
    json.push('\n');
    Ok(json)
}

/// Write `classloader-model.json` into `directory`, returning its path
///
/// The file is written to a temporary sibling first and renamed into place.
pub fn serialize_to_file(model: &ClassLoaderModel, directory: &Path) -> Result<PathBuf> {
    fs::create_dir_all(directory)?;
    let path = directory.join(CLASS_LOADER_MODEL_FILE);

    let mut temp = NamedTempFile::new_in(directory)?;
    temp.write_all(serialize(model)?.as_bytes())?;
    temp.persist(&path).map_err(|e| e.error)?;

    debug!("Wrote classloader model {}", path.display());
    Ok(path)
}

/// Read a model back from its JSON form
pub fn deserialize(json: &str) -> Result<ClassLoaderModel> {
    let document: OwnedModelDocument = serde_json::from_str(json)?;
    document
        .mule_plugins
        .into_iter()
        .fold(
            ClassLoaderModelBuilder::new(document.artifact_coordinates)
                .version(document.version)
                .dependencies(document.dependencies),
            |builder, entry| builder.plugin(entry.plugin, entry.dependencies),
        )
        .build()
}

pub fn deserialize_from_file(path: &Path) -> Result<ClassLoaderModel> {
    let json = fs::read_to_string(path)?;
    deserialize(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::PLUGIN_CLASSIFIER;
    use crate::error::Error;
    use crate::model::SharedLibrary;

    fn model() -> ClassLoaderModel {
        let plugin = ArtifactCoordinate::new("org.mule.connectors", "http", "1.0.0")
            .with_classifier(PLUGIN_CLASSIFIER);
        ClassLoaderModelBuilder::new(ArtifactCoordinate::new("com.acme", "app", "1.0.0"))
            .dependency(Artifact::new(
                ArtifactCoordinate::new("org.lib", "json", "2.1"),
                "file:///repo/json-2.1.jar",
            ))
            .plugin(
                Artifact::new(plugin, "file:///repo/http-1.0.0-mule-plugin.jar"),
                vec![Artifact::new(
                    ArtifactCoordinate::new("org.lib", "netty", "4.1.0"),
                    "file:///repo/netty-4.1.0.jar",
                )],
            )
            .shared_library(SharedLibrary::new("org.lib", "json"))
            .build()
            .unwrap()
            .parameterized()
    }

    #[test]
    fn test_layout_and_key_order() {
        let json = serialize(&model()).unwrap();
        let expected = r#"{
  "version": "1.2.0",
  "artifactCoordinates": {
    "groupId": "com.acme",
    "artifactId": "app",
    "version": "1.0.0",
    "type": "jar"
  },
  "dependencies": [
    {
      "artifactCoordinates": {
        "groupId": "org.lib",
        "artifactId": "json",
        "version": "2.1",
        "type": "jar"
      },
      "uri": "repository/org/lib/json/2.1/json-2.1.jar",
      "shared": true
    }
  ],
  "mulePlugins": [
    {
      "plugin": {
        "artifactCoordinates": {
          "groupId": "org.mule.connectors",
          "artifactId": "http",
          "version": "1.0.0",
          "type": "jar",
          "classifier": "mule-plugin"
        },
        "uri": "repository/org/mule/connectors/http/1.0.0/http-1.0.0-mule-plugin.jar",
        "shared": false
      },
      "dependencies": [
        {
          "artifactCoordinates": {
            "groupId": "org.lib",
            "artifactId": "netty",
            "version": "4.1.0",
            "type": "jar"
          },
          "uri": "repository/org/lib/netty/4.1.0/netty-4.1.0.jar",
          "shared": false
        }
      ]
    }
  ]
}
"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_read_back() {
        let model = model();
        let read = deserialize(&serialize(&model).unwrap()).unwrap();
        assert_eq!(read, model);
    }

    #[test]
    fn test_read_rejects_non_plugin_key() {
        let json = r#"{
  "version": "1.2.0",
  "artifactCoordinates": { "groupId": "g", "artifactId": "app", "version": "1.0" },
  "mulePlugins": [
    { "plugin": { "artifactCoordinates": { "groupId": "g", "artifactId": "lib", "version": "1.0" }, "uri": "repository/g/lib/1.0/lib-1.0.jar" } }
  ]
}"#;
        assert!(matches!(deserialize(json), Err(Error::InvalidPlugin(_))));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let model = model();
        let path = serialize_to_file(&model, &dir.path().join("META-INF")).unwrap();
        assert!(path.ends_with("META-INF/classloader-model.json"));
        assert_eq!(deserialize_from_file(&path).unwrap(), model);
    }
}
