// src/resolver/additional.rs

//! Additional dependencies requested for plugins
//!
//! Declarations come from two places: the packaging configuration
//! (top level) and the build metadata of plugins in the application graph
//! (discovered). A top-level declaration for a target plugin replaces every
//! discovered declaration for that target. Discovered declarations for the
//! same target coming from several plugins are merged entry by entry.

use dashmap::DashMap;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};
use url::Url;

use super::conflict;
use super::{ApplicationDependencyResolver, PluginRegion};
use crate::artifact::{
    ArtifactCoordinate, DependencyDeclaration, PluginDeclaration, PluginKey, ResolvedDependency,
    Scope,
};
use crate::error::{Error, Result};

/// Resolved additional dependencies, keyed by the plugin they are attached to
pub type AdditionalDependencies = BTreeMap<ArtifactCoordinate, Vec<ResolvedDependency>>;

/// Resolves additional plugin dependencies and arbitrates their versions
pub struct AdditionalDependenciesResolver<'a> {
    adapter: ApplicationDependencyResolver<'a>,
    declared: Vec<PluginDeclaration>,
}

impl<'a> AdditionalDependenciesResolver<'a> {
    /// `declared` holds the top-level declarations of the packaging configuration
    pub fn new(adapter: ApplicationDependencyResolver<'a>, declared: Vec<PluginDeclaration>) -> Self {
        Self { adapter, declared }
    }

    /// Declarations discovered in the build metadata of the application's plugins
    ///
    /// Metadata is read in parallel and merged in coordinate order, so the
    /// result does not depend on scheduling.
    pub fn discover(&self, application: &[ResolvedDependency]) -> Result<Vec<PluginDeclaration>> {
        let plugins: Vec<&ResolvedDependency> = application
            .iter()
            .filter(|d| d.is_plugin())
            .map(|d| (&d.coordinate, d))
            .collect::<BTreeMap<_, _>>()
            .into_values()
            .collect();

        let metadata = plugins
            .par_iter()
            .map(|plugin| {
                self.adapter
                    .resolver()
                    .build_metadata(plugin)
                    .map(|m| (plugin.coordinate.clone(), m))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut merged: BTreeMap<PluginKey, PluginDeclaration> = BTreeMap::new();
        for (owner, metadata) in metadata {
            for declaration in metadata.additional_plugin_dependencies {
                debug!(
                    "{} declares {} additional dependencies for {}",
                    owner,
                    declaration.additional_dependencies.len(),
                    declaration.key()
                );
                merge_plugin_declaration(&mut merged, declaration)?;
            }
        }
        Ok(merged.into_values().collect())
    }

    /// Top-level declarations plus discovered ones for targets not declared at top level
    pub fn effective_declarations(
        &self,
        application: &[ResolvedDependency],
    ) -> Result<Vec<PluginDeclaration>> {
        let mut effective: BTreeMap<PluginKey, PluginDeclaration> = BTreeMap::new();
        for declaration in &self.declared {
            merge_plugin_declaration(&mut effective, declaration.clone())?;
        }
        let top_level: BTreeSet<PluginKey> = effective.keys().cloned().collect();

        for declaration in self.discover(application)? {
            let key = declaration.key();
            if top_level.contains(&key) {
                info!(
                    "Additional dependencies for {} discovered in plugin metadata are overridden by the packaging configuration",
                    key
                );
                continue;
            }
            effective.insert(key, declaration);
        }
        Ok(effective.into_values().collect())
    }

    /// Resolve the additional dependencies of every targeted plugin
    ///
    /// Only plugins that end up with at least one additional dependency
    /// appear in the result; each list is sorted by coordinate.
    pub fn resolve(
        &self,
        application: &[ResolvedDependency],
        regions: &BTreeMap<ArtifactCoordinate, PluginRegion>,
    ) -> Result<AdditionalDependencies> {
        let declarations = self.effective_declarations(application)?;
        if declarations.is_empty() {
            return Ok(AdditionalDependencies::new());
        }
        info!("Resolving additional dependencies for {} plugins", declarations.len());

        let accumulator: DashMap<ArtifactCoordinate, Vec<ResolvedDependency>> = DashMap::new();
        declarations.par_iter().try_for_each(|declaration| {
            let plugin = target_plugin(declaration, application)?;
            let region = regions.get(&plugin.coordinate).ok_or_else(|| {
                Error::ConfigError(format!(
                    "Could not find the classloading region resolved for plugin {}",
                    plugin.coordinate
                ))
            })?;

            let mut additional = Vec::new();
            for dependency in &declaration.additional_dependencies {
                let coordinate = dependency.coordinate();
                if region.contains(&coordinate) {
                    debug!("{} already in region of {}", coordinate, plugin.coordinate);
                    continue;
                }
                for resolved in self.resolve_declared(dependency)? {
                    conflict::merge_dependency(&mut additional, resolved)?;
                }
            }

            let mut entry = accumulator.entry(plugin.coordinate.clone()).or_default();
            for resolved in additional {
                conflict::merge_dependency(entry.value_mut(), resolved)?;
            }
            Ok::<(), Error>(())
        })?;

        Ok(accumulator
            .into_iter()
            .filter(|(_, deps)| !deps.is_empty())
            .map(|(plugin, mut deps)| {
                deps.sort_by(|a, b| a.coordinate.cmp(&b.coordinate));
                info!("Attaching {} additional dependencies to {}", deps.len(), plugin);
                (plugin, deps)
            })
            .collect())
    }

    /// A declared dependency followed by its own transitive closure
    fn resolve_declared(&self, dependency: &DependencyDeclaration) -> Result<Vec<ResolvedDependency>> {
        let coordinate = dependency.coordinate();

        if let Some(ref system_path) = dependency.system_path {
            let absolute = std::path::absolute(system_path)?;
            let url = Url::from_file_path(&absolute).map_err(|()| {
                Error::resolution(&coordinate, format!("invalid system path {}", absolute.display()))
            })?;
            return Ok(vec![ResolvedDependency::new(coordinate, url, Scope::System)]);
        }

        let mut resolved = vec![self.adapter.resolver().resolve_artifact(&coordinate)?];
        resolved.extend(self.adapter.resolve_isolated_dependencies(&coordinate)?);
        Ok(resolved)
    }
}

/// Insert a declaration, merging entries with an existing one for the same target
fn merge_plugin_declaration(
    merged: &mut BTreeMap<PluginKey, PluginDeclaration>,
    declaration: PluginDeclaration,
) -> Result<()> {
    match merged.get_mut(&declaration.key()) {
        Some(existing) => {
            for dependency in declaration.additional_dependencies {
                conflict::merge_declaration(&mut existing.additional_dependencies, dependency)?;
            }
        }
        None => {
            merged.insert(declaration.key(), declaration);
        }
    }
    Ok(())
}

/// The plugin of the application graph a declaration targets
fn target_plugin<'d>(
    declaration: &PluginDeclaration,
    application: &'d [ResolvedDependency],
) -> Result<&'d ResolvedDependency> {
    application
        .iter()
        .find(|d| d.is_plugin() && d.coordinate.matches(&declaration.group_id, &declaration.artifact_id))
        .ok_or_else(|| {
            Error::ConfigError(format!(
                "Declared additional dependencies for a plugin not present: {}",
                declaration.key()
            ))
        })
}
