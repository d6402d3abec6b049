// src/resolver/snapshot.rs

//! Offline graph resolution backed by a resolution snapshot
//!
//! A snapshot records, for each artifact, where its payload lives and its
//! direct dependencies:
//!
//! ```toml
//! repository = "repository"
//!
//! [[artifact]]
//! coordinates = "com.acme:orders-app:1.0.0"
//! dependencies = [
//!     { coordinates = "org.mule.connectors:mule-db-connector:jar:mule-plugin:1.8.0" },
//!     { coordinates = "junit:junit:4.12", scope = "test" },
//! ]
//!
//! [[artifact]]
//! coordinates = "org.mule.connectors:mule-db-connector:jar:mule-plugin:1.8.0"
//! ```
//!
//! Artifacts without an explicit `path` are expected at their standard
//! location below `repository`.

use serde::Deserialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

use super::DependencyResolver;
use crate::artifact::{ArtifactCoordinate, DependencyKind, ResolvedDependency, Scope, layout};
use crate::error::{Error, Result};
use crate::metadata::{BuildMetadata, locate_descriptor};

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    repository: Option<PathBuf>,
    #[serde(default, rename = "artifact")]
    artifacts: Vec<SnapshotArtifact>,
}

#[derive(Debug, Deserialize)]
struct SnapshotArtifact {
    coordinates: String,
    #[serde(default)]
    path: Option<PathBuf>,
    #[serde(default)]
    dependencies: Vec<SnapshotEdge>,
}

#[derive(Debug, Deserialize)]
struct SnapshotEdge {
    coordinates: String,
    #[serde(default)]
    scope: Scope,
}

#[derive(Debug, Clone)]
struct Node {
    path: PathBuf,
    dependencies: Vec<(ArtifactCoordinate, Scope)>,
}

/// [`DependencyResolver`] answering from a recorded snapshot, without network access
#[derive(Debug, Clone)]
pub struct SnapshotResolver {
    repository: PathBuf,
    nodes: HashMap<ArtifactCoordinate, Node>,
}

impl SnapshotResolver {
    /// Empty snapshot whose payloads live below `repository`
    pub fn new(repository: impl Into<PathBuf>) -> Self {
        Self {
            repository: repository.into(),
            nodes: HashMap::new(),
        }
    }

    /// Add an artifact stored at its standard repository location
    pub fn with_artifact(
        self,
        coordinate: ArtifactCoordinate,
        dependencies: Vec<(ArtifactCoordinate, Scope)>,
    ) -> Self {
        let path = self
            .repository
            .join(layout::repository_directory(&coordinate))
            .join(layout::file_name(&coordinate));
        self.with_artifact_at(coordinate, path, dependencies)
    }

    /// Add an artifact stored at an explicit path
    pub fn with_artifact_at(
        mut self,
        coordinate: ArtifactCoordinate,
        path: impl Into<PathBuf>,
        dependencies: Vec<(ArtifactCoordinate, Scope)>,
    ) -> Self {
        self.nodes.insert(
            coordinate,
            Node {
                path: path.into(),
                dependencies,
            },
        );
        self
    }

    /// Load a snapshot file; relative paths are taken from the file's directory
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let file: SnapshotFile = toml::from_str(&content)?;
        let base = path.parent().unwrap_or(Path::new("."));
        let repository = base.join(
            file.repository
                .unwrap_or_else(|| PathBuf::from(layout::REPOSITORY_FOLDER)),
        );

        let mut resolver = Self::new(repository);
        for artifact in file.artifacts {
            let coordinate = ArtifactCoordinate::parse(&artifact.coordinates)?;
            let dependencies = artifact
                .dependencies
                .iter()
                .map(|edge| Ok((ArtifactCoordinate::parse(&edge.coordinates)?, edge.scope)))
                .collect::<Result<Vec<_>>>()?;
            resolver = match artifact.path {
                Some(p) => resolver.with_artifact_at(coordinate, base.join(p), dependencies),
                None => resolver.with_artifact(coordinate, dependencies),
            };
        }
        debug!("Loaded resolution snapshot {} with {} artifacts", path.display(), resolver.len());
        Ok(resolver)
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, coordinate: &ArtifactCoordinate) -> Result<&Node> {
        self.nodes
            .get(coordinate)
            .ok_or_else(|| Error::resolution(coordinate, "not present in resolution snapshot"))
    }

    fn located(&self, coordinate: &ArtifactCoordinate, node: &Node, scope: Scope) -> Result<ResolvedDependency> {
        let absolute = std::path::absolute(&node.path)?;
        let url = Url::from_file_path(&absolute).map_err(|()| {
            Error::resolution(coordinate, format!("invalid location {}", absolute.display()))
        })?;
        Ok(ResolvedDependency::new(coordinate.clone(), url, scope))
    }
}

/// Effective scope of a transitive edge, `None` when the edge is not followed
fn propagate(parent: Scope, child: Scope) -> Option<Scope> {
    match child {
        Scope::Provided | Scope::Test => None,
        Scope::System => Some(Scope::System),
        Scope::Compile | Scope::Runtime => Some(match parent {
            Scope::Compile => child,
            Scope::Runtime | Scope::System => Scope::Runtime,
            other => other,
        }),
    }
}

impl DependencyResolver for SnapshotResolver {
    fn resolve_dependencies(
        &self,
        root: &ArtifactCoordinate,
        include_test: bool,
    ) -> Result<Vec<ResolvedDependency>> {
        let root_node = self.node(root)?;

        let mut seen = HashSet::from([root.library_key()]);
        let mut queue: VecDeque<(ArtifactCoordinate, Scope, &ArtifactCoordinate)> = root_node
            .dependencies
            .iter()
            .filter(|(_, scope)| include_test || *scope != Scope::Test)
            .map(|(coordinate, scope)| (coordinate.clone(), *scope, root))
            .collect();

        let mut resolved = Vec::new();
        while let Some((coordinate, scope, parent)) = queue.pop_front() {
            // Nearest declaration wins
            if !seen.insert(coordinate.library_key()) {
                continue;
            }
            let (coordinate, node) = self
                .nodes
                .get_key_value(&coordinate)
                .ok_or_else(|| {
                    Error::resolution(
                        &coordinate,
                        format!("not present in resolution snapshot (required by {parent})"),
                    )
                })?;
            resolved.push(self.located(coordinate, node, scope)?);

            // A plugin's libraries belong to its region; only the plugins it
            // depends on join this graph
            let is_plugin = DependencyKind::of(coordinate) == DependencyKind::Plugin;
            for (child, child_scope) in &node.dependencies {
                if is_plugin && DependencyKind::of(child) != DependencyKind::Plugin {
                    continue;
                }
                if let Some(effective) = propagate(scope, *child_scope) {
                    queue.push_back((child.clone(), effective, coordinate));
                }
            }
        }
        Ok(resolved)
    }

    fn resolve_artifact(&self, coordinate: &ArtifactCoordinate) -> Result<ResolvedDependency> {
        let node = self.node(coordinate)?;
        self.located(coordinate, node, Scope::Compile)
    }

    fn build_metadata(&self, bundle: &ResolvedDependency) -> Result<BuildMetadata> {
        let path = bundle.bundle_path()?;
        match locate_descriptor(&path, &bundle.coordinate) {
            Some(descriptor) => BuildMetadata::from_descriptor_file(&descriptor),
            None => {
                debug!("No descriptor found for {}", bundle.coordinate);
                Ok(BuildMetadata::default())
            }
        }
    }
}
