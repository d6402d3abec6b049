// src/resolver/plugin.rs

//! Isolated classloading regions for plugins

use dashmap::DashMap;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

use super::ApplicationDependencyResolver;
use crate::artifact::{ArtifactCoordinate, ResolvedDependency};
use crate::error::Result;

/// A plugin and the dependencies of its isolated region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginRegion {
    pub plugin: ResolvedDependency,
    pub dependencies: Arc<Vec<ResolvedDependency>>,
}

impl PluginRegion {
    /// True when the region already holds exactly this coordinate
    pub fn contains(&self, coordinate: &ArtifactCoordinate) -> bool {
        self.dependencies.iter().any(|d| &d.coordinate == coordinate)
    }
}

/// Computes plugin regions, each plugin coordinate at most once
///
/// Regions are not deduplicated against the application graph: a region may
/// carry a different version of a library than the application does.
pub struct PluginIsolationResolver<'a> {
    adapter: ApplicationDependencyResolver<'a>,
    regions: DashMap<ArtifactCoordinate, Arc<Vec<ResolvedDependency>>>,
}

impl<'a> PluginIsolationResolver<'a> {
    pub fn new(adapter: ApplicationDependencyResolver<'a>) -> Self {
        Self {
            adapter,
            regions: DashMap::new(),
        }
    }

    /// Region of a single plugin, computed on first request
    pub fn region(&self, plugin: &ResolvedDependency) -> Result<PluginRegion> {
        let dependencies = self
            .regions
            .entry(plugin.coordinate.clone())
            .or_try_insert_with(|| self.compute(&plugin.coordinate).map(Arc::new))?
            .clone();
        Ok(PluginRegion {
            plugin: plugin.clone(),
            dependencies,
        })
    }

    /// Regions of every plugin in the application graph, resolved in parallel
    pub fn resolve_all(
        &self,
        application: &[ResolvedDependency],
    ) -> Result<BTreeMap<ArtifactCoordinate, PluginRegion>> {
        let mut seen = HashSet::new();
        let plugins: Vec<&ResolvedDependency> = application
            .iter()
            .filter(|&d| d.is_plugin() && seen.insert(&d.coordinate))
            .collect();
        info!("Resolving isolated regions for {} plugins", plugins.len());

        let regions = plugins
            .par_iter()
            .map(|plugin| self.region(plugin))
            .collect::<Result<Vec<_>>>()?;

        Ok(regions
            .into_iter()
            .map(|region| (region.plugin.coordinate.clone(), region))
            .collect())
    }

    fn compute(&self, plugin: &ArtifactCoordinate) -> Result<Vec<ResolvedDependency>> {
        let isolated = self.adapter.resolve_isolated_dependencies(plugin)?;

        let mut seen = HashSet::new();
        let dependencies: Vec<ResolvedDependency> = isolated
            .into_iter()
            .filter(|d| !d.is_plugin() && &d.coordinate != plugin)
            .filter(|d| seen.insert(d.coordinate.clone()))
            .collect();

        debug!("Region of {} holds {} dependencies", plugin, dependencies.len());
        Ok(dependencies)
    }
}
