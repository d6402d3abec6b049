// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use classloader_packager::artifact::layout;
use classloader_packager::{ArtifactCoordinate, PackagingConfig, Scope, SnapshotResolver};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

pub const PLUGIN: &str = "jar:mule-plugin";

pub fn coord(s: &str) -> ArtifactCoordinate {
    ArtifactCoordinate::parse(s).unwrap()
}

/// `org.mule.connectors:<name>:jar:mule-plugin:<version>`
pub fn plugin(name: &str, version: &str) -> String {
    format!("org.mule.connectors:{name}:{PLUGIN}:{version}")
}

struct Entry {
    coordinate: ArtifactCoordinate,
    dependencies: Vec<(ArtifactCoordinate, Scope)>,
}

/// A local repository on disk plus the snapshot describing its graph
///
/// Keep the fixture alive for as long as its files are needed.
pub struct TestRepository {
    dir: TempDir,
    entries: Vec<Entry>,
}

impl TestRepository {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            entries: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Root of the source repository payloads are read from
    pub fn repository(&self) -> PathBuf {
        self.dir.path().join("m2")
    }

    /// Output directory used by [`config`](Self::config)
    pub fn output(&self) -> PathBuf {
        self.dir.path().join("target")
    }

    fn artifact_dir(&self, coordinate: &ArtifactCoordinate) -> PathBuf {
        self.repository().join(layout::repository_directory(coordinate))
    }

    /// Add an artifact with a payload and a plain descriptor
    pub fn add(&mut self, coordinate: &str, dependencies: &[(&str, Scope)]) -> ArtifactCoordinate {
        let coordinate = coord(coordinate);
        let dir = self.artifact_dir(&coordinate);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(layout::file_name(&coordinate)),
            format!("payload of {coordinate}"),
        )
        .unwrap();
        fs::write(
            dir.join(layout::descriptor_file_name(&coordinate)),
            format!(
                "<project><groupId>{}</groupId><artifactId>{}</artifactId><version>{}</version></project>",
                coordinate.group_id, coordinate.artifact_id, coordinate.version
            ),
        )
        .unwrap();

        self.entries.push(Entry {
            coordinate: coordinate.clone(),
            dependencies: dependencies.iter().map(|(c, s)| (coord(c), *s)).collect(),
        });
        coordinate
    }

    /// Replace an artifact's descriptor with one declaring additional
    /// dependencies for `target` (a plugin artifact id)
    pub fn declare_additional(&self, owner: &ArtifactCoordinate, target: &str, dependencies: &[&str]) {
        let dependencies: String = dependencies
            .iter()
            .map(|d| {
                let c = coord(d);
                format!(
                    "<dependency><groupId>{}</groupId><artifactId>{}</artifactId><version>{}</version></dependency>",
                    c.group_id, c.artifact_id, c.version
                )
            })
            .collect();
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<project>
  <groupId>{}</groupId>
  <artifactId>{}</artifactId>
  <version>{}</version>
  <build>
    <plugins>
      <plugin>
        <groupId>org.mule.runtime.plugins</groupId>
        <artifactId>mule-extensions-maven-plugin</artifactId>
        <configuration>
          <additionalPluginDependencies>
            <plugin>
              <groupId>org.mule.connectors</groupId>
              <artifactId>{target}</artifactId>
              <additionalDependencies>{dependencies}</additionalDependencies>
            </plugin>
          </additionalPluginDependencies>
        </configuration>
      </plugin>
    </plugins>
  </build>
</project>"#,
            owner.group_id, owner.artifact_id, owner.version
        );
        fs::write(
            self.artifact_dir(owner).join(layout::descriptor_file_name(owner)),
            xml,
        )
        .unwrap();
    }

    pub fn resolver(&self) -> SnapshotResolver {
        self.entries
            .iter()
            .fold(SnapshotResolver::new(self.repository()), |resolver, entry| {
                resolver.with_artifact(entry.coordinate.clone(), entry.dependencies.clone())
            })
    }

    /// Configuration packaging `root` into [`output`](Self::output)
    pub fn config(&self, root: &ArtifactCoordinate) -> PackagingConfig {
        let mut config = PackagingConfig::new(root.to_string());
        config.output.directory = self.output();
        config
    }
}

/// Relative path and content of every file below `root`, sorted by path
pub fn tree(root: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files: Vec<(String, Vec<u8>)> = WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(root).unwrap().to_string_lossy().into_owned();
            (relative, fs::read(e.path()).unwrap())
        })
        .collect();
    files.sort();
    files
}
