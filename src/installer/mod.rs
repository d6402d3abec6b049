// src/installer/mod.rs

//! Mirrors a classloader model's artifacts into a local repository
//!
//! Each artifact lands in `<root>/<group path>/<artifact>/<version>/` next to
//! its descriptor. Files are written to a temporary sibling and renamed into
//! place, so reinstalling over a previous run replaces files instead of
//! appending to them. Installation is not transactional: a failure leaves
//! whatever was installed before it, and a rerun repairs the tree.

use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::artifact::{Artifact, ArtifactCoordinate, layout};
use crate::error::{Error, Result};
use crate::metadata::locate_descriptor;
use crate::model::{self, ClassLoaderModel};

/// Written into an empty repository so it can be told apart from a missing one
pub const MARKER_FILE: &str = ".marker";

/// Installs artifacts below a repository root
#[derive(Debug, Clone)]
pub struct RepositoryInstaller {
    root: PathBuf,
}

impl RepositoryInstaller {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory an artifact is installed into
    pub fn destination(&self, coordinate: &ArtifactCoordinate) -> PathBuf {
        self.root.join(layout::repository_directory(coordinate))
    }

    /// Install every artifact, in parallel, stopping at the first failure
    ///
    /// Returns the number of artifacts installed.
    pub fn install(&self, artifacts: &BTreeSet<Artifact>) -> Result<usize> {
        fs::create_dir_all(&self.root)?;

        let marker = self.root.join(MARKER_FILE);
        if artifacts.is_empty() {
            File::create(&marker)?;
            info!("No artifacts to install, wrote {}", marker.display());
            return Ok(0);
        }
        match fs::remove_file(&marker) {
            Ok(()) => debug!("Removed stale {}", marker.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        artifacts
            .par_iter()
            .try_for_each(|artifact| self.install_artifact(artifact).map(|_| ()))?;

        info!("Installed {} artifacts into {}", artifacts.len(), self.root.display());
        Ok(artifacts.len())
    }

    /// Install one artifact and its descriptor, returning the payload's path
    pub fn install_artifact(&self, artifact: &Artifact) -> Result<PathBuf> {
        let coordinate = &artifact.coordinates;
        let destination = self.destination(coordinate);
        let source = artifact.source_path()?;
        let fail = |source: io::Error| Error::InstallError {
            artifact: coordinate.to_string(),
            destination: destination.clone(),
            source,
        };

        fs::create_dir_all(&destination).map_err(fail)?;

        let payload = destination.join(layout::file_name(coordinate));
        copy_atomically(&source, &payload).map_err(fail)?;

        let descriptor = destination.join(layout::descriptor_file_name(coordinate));
        match locate_descriptor(&source, coordinate) {
            Some(found) => copy_atomically(&found, &descriptor).map_err(fail)?,
            None => {
                debug!("Generating descriptor for {}", coordinate);
                write_atomically(&descriptor, minimal_descriptor(coordinate).as_bytes())
                    .map_err(fail)?
            }
        }

        info!("Installed {} into {}", coordinate, destination.display());
        Ok(payload)
    }

    /// Write each plugin's region as `classloader-model.json` in the plugin's directory
    pub fn write_plugin_models(&self, model: &ClassLoaderModel) -> Result<Vec<PathBuf>> {
        let relocatable = model.parameterized();
        relocatable
            .plugins()
            .keys()
            .filter_map(|plugin| relocatable.plugin_model(plugin))
            .map(|plugin_model| {
                let directory = self.destination(plugin_model.artifact_coordinates());
                model::serialize_to_file(&plugin_model, &directory)
            })
            .collect()
    }
}

fn copy_atomically(source: &Path, destination: &Path) -> io::Result<()> {
    let mut input = File::open(source)?;
    let mut temp = temp_sibling(destination)?;
    io::copy(&mut input, temp.as_file_mut())?;
    temp.as_file().sync_all()?;
    temp.persist(destination).map_err(|e| e.error)?;
    Ok(())
}

fn write_atomically(destination: &Path, content: &[u8]) -> io::Result<()> {
    let mut temp = temp_sibling(destination)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(destination).map_err(|e| e.error)?;
    Ok(())
}

fn temp_sibling(destination: &Path) -> io::Result<NamedTempFile> {
    let directory = destination.parent().unwrap_or(Path::new("."));
    NamedTempFile::new_in(directory)
}

/// Descriptor holding only the coordinates, for artifacts shipped without one
fn minimal_descriptor(coordinate: &ArtifactCoordinate) -> String {
    use quick_xml::escape::escape;
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
  <modelVersion>4.0.0</modelVersion>
  <groupId>{}</groupId>
  <artifactId>{}</artifactId>
  <version>{}</version>
  <packaging>{}</packaging>
</project>
"#,
        escape(&coordinate.group_id),
        escape(&coordinate.artifact_id),
        escape(&coordinate.version),
        escape(&coordinate.artifact_type)
    )
}
