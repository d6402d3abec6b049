// src/resolver/adapter.rs

//! Application and isolated plugin graphs from the external resolver

use std::collections::HashSet;
use tracing::{debug, info};

use super::DependencyResolver;
use crate::artifact::{ArtifactCoordinate, DependencyKind, ResolvedDependency, Scope};
use crate::error::Result;

/// Adapts a [`DependencyResolver`] to the two graphs packaging needs
#[derive(Clone, Copy)]
pub struct ApplicationDependencyResolver<'a> {
    resolver: &'a dyn DependencyResolver,
}

impl<'a> ApplicationDependencyResolver<'a> {
    pub fn new(resolver: &'a dyn DependencyResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &'a dyn DependencyResolver {
        self.resolver
    }

    /// Resolve the application graph
    ///
    /// Provided dependencies are dropped unless they are domains, which the
    /// container loads itself. The result holds one entry per library.
    pub fn resolve_application_dependencies(
        &self,
        root: &ArtifactCoordinate,
        include_test: bool,
    ) -> Result<Vec<ResolvedDependency>> {
        info!("Resolving application dependencies of {}", root);
        let resolved = self.resolver.resolve_dependencies(root, include_test)?;

        let dependencies = unique_libraries(resolved.into_iter().filter(|d| {
            let keep = d.scope != Scope::Provided || d.kind() == DependencyKind::Domain;
            if !keep {
                debug!("Excluding provided dependency {}", d.coordinate);
            }
            keep
        }));

        info!(
            "Resolved {} application dependencies for {}",
            dependencies.len(),
            root
        );
        Ok(dependencies)
    }

    /// Resolve a plugin's graph as if it were resolved standalone
    pub fn resolve_isolated_dependencies(
        &self,
        plugin: &ArtifactCoordinate,
    ) -> Result<Vec<ResolvedDependency>> {
        let resolved = self.resolver.resolve_dependencies(plugin, false)?;
        Ok(unique_libraries(
            resolved.into_iter().filter(|d| d.scope != Scope::Provided),
        ))
    }
}

/// Keep the first occurrence of each library
fn unique_libraries(
    dependencies: impl Iterator<Item = ResolvedDependency>,
) -> Vec<ResolvedDependency> {
    let mut seen = HashSet::new();
    dependencies
        .filter(|d| seen.insert(d.coordinate.library_key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{DOMAIN_CLASSIFIER, PLUGIN_CLASSIFIER};
    use crate::resolver::SnapshotResolver;

    fn coord(s: &str) -> ArtifactCoordinate {
        ArtifactCoordinate::parse(s).unwrap()
    }

    fn snapshot() -> SnapshotResolver {
        let domain = coord("com.acme:shared-domain:1.0.0").with_classifier(DOMAIN_CLASSIFIER);
        let plugin = coord("org.mule.connectors:http:1.0.0").with_classifier(PLUGIN_CLASSIFIER);
        SnapshotResolver::new("/repo")
            .with_artifact(
                coord("com.acme:app:1.0.0"),
                vec![
                    (coord("org.lib:compiled:1.0.0"), Scope::Compile),
                    (coord("org.lib:container:1.0.0"), Scope::Provided),
                    (domain.clone(), Scope::Provided),
                    (plugin.clone(), Scope::Compile),
                    (coord("org.lib:junit:4.12"), Scope::Test),
                ],
            )
            .with_artifact(coord("org.lib:compiled:1.0.0"), vec![])
            .with_artifact(coord("org.lib:container:1.0.0"), vec![])
            .with_artifact(coord("org.lib:junit:4.12"), vec![])
            .with_artifact(domain, vec![])
            .with_artifact(
                plugin,
                vec![
                    (coord("org.lib:http-core:2.0.0"), Scope::Compile),
                    (coord("org.lib:api:1.0.0"), Scope::Provided),
                ],
            )
            .with_artifact(coord("org.lib:http-core:2.0.0"), vec![])
            .with_artifact(coord("org.lib:api:1.0.0"), vec![])
    }

    #[test]
    fn test_provided_excluded_except_domains() {
        let snapshot = snapshot();
        let adapter = ApplicationDependencyResolver::new(&snapshot);
        let deps = adapter
            .resolve_application_dependencies(&coord("com.acme:app:1.0.0"), false)
            .unwrap();
        let names: Vec<&str> = deps.iter().map(|d| d.coordinate.artifact_id.as_str()).collect();

        assert!(names.contains(&"compiled"));
        assert!(names.contains(&"shared-domain"));
        assert!(names.contains(&"http"));
        assert!(!names.contains(&"container"));
        assert!(!names.contains(&"junit"));
    }

    #[test]
    fn test_include_test_dependencies() {
        let snapshot = snapshot();
        let adapter = ApplicationDependencyResolver::new(&snapshot);
        let deps = adapter
            .resolve_application_dependencies(&coord("com.acme:app:1.0.0"), true)
            .unwrap();
        assert!(deps.iter().any(|d| d.coordinate.artifact_id == "junit"));
    }

    #[test]
    fn test_isolated_dependencies() {
        let snapshot = snapshot();
        let adapter = ApplicationDependencyResolver::new(&snapshot);
        let plugin = coord("org.mule.connectors:http:1.0.0").with_classifier(PLUGIN_CLASSIFIER);
        let deps = adapter.resolve_isolated_dependencies(&plugin).unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].coordinate, coord("org.lib:http-core:2.0.0"));
    }

    #[test]
    fn test_unknown_root_is_resolution_error() {
        let snapshot = snapshot();
        let adapter = ApplicationDependencyResolver::new(&snapshot);
        let err = adapter
            .resolve_application_dependencies(&coord("com.acme:missing:1.0.0"), false)
            .unwrap_err();
        assert!(matches!(err, crate::Error::ResolutionError { .. }));
    }
}
