// src/resolver/mod.rs

//! Dependency closure resolution
//!
//! The graph itself comes from an external [`DependencyResolver`]; this module
//! turns its answers into the pieces of a classloader model:
//!
//! - [`ApplicationDependencyResolver`]: the application graph and isolated plugin graphs
//! - [`PluginIsolationResolver`]: one memoized classloading region per plugin
//! - [`AdditionalDependenciesResolver`]: extra libraries requested for plugins,
//!   arbitrated with the same-major-version rule
//! - [`SnapshotResolver`]: an offline resolver backed by a resolution snapshot

mod adapter;
mod additional;
pub mod conflict;
mod plugin;
mod snapshot;

pub use adapter::ApplicationDependencyResolver;
pub use additional::{AdditionalDependencies, AdditionalDependenciesResolver};
pub use conflict::{Arbitration, arbitrate};
pub use plugin::{PluginIsolationResolver, PluginRegion};
pub use snapshot::SnapshotResolver;

use crate::artifact::{ArtifactCoordinate, ResolvedDependency};
use crate::error::Result;
use crate::metadata::BuildMetadata;

/// External graph-resolution service
///
/// Implementations own version mediation: the graph they return is expected
/// to hold at most one version per library.
pub trait DependencyResolver: Send + Sync {
    /// Transitive dependencies of `root`, excluding `root` itself
    ///
    /// Plugins reached from `root` are returned without their own libraries,
    /// which belong to the plugin's region. Plugins they depend on are
    /// returned like any other plugin of the graph. Test-scoped
    /// dependencies are only included when `include_test` is set.
    fn resolve_dependencies(
        &self,
        root: &ArtifactCoordinate,
        include_test: bool,
    ) -> Result<Vec<ResolvedDependency>>;

    /// Locate a single artifact
    fn resolve_artifact(&self, coordinate: &ArtifactCoordinate) -> Result<ResolvedDependency>;

    /// Build metadata packaged with a resolved bundle
    fn build_metadata(&self, bundle: &ResolvedDependency) -> Result<BuildMetadata>;
}
