// src/assembler/mod.rs

//! Assembles resolution results into a [`ClassLoaderModel`]
//!
//! Runs on a single thread once every region and additional dependency is
//! known: arbitration between a region and the additional dependencies of
//! its plugin needs both sides complete.

use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

use crate::artifact::{Artifact, ArtifactCoordinate, ResolvedDependency};
use crate::error::{Error, Result};
use crate::model::{ClassLoaderModel, ClassLoaderModelBuilder, SharedLibrary};
use crate::resolver::{AdditionalDependencies, PluginRegion};

/// Merges the application graph, plugin regions and additional dependencies
#[derive(Debug, Clone, Default)]
pub struct ClassLoaderModelAssembler {
    shared_libraries: Vec<SharedLibrary>,
}

impl ClassLoaderModelAssembler {
    pub fn new(shared_libraries: Vec<SharedLibrary>) -> Self {
        Self { shared_libraries }
    }

    pub fn assemble(
        &self,
        root: &ArtifactCoordinate,
        application: &[ResolvedDependency],
        regions: &BTreeMap<ArtifactCoordinate, PluginRegion>,
        additional: &AdditionalDependencies,
    ) -> Result<ClassLoaderModel> {
        // Plugins only appear as region keys
        let flat: Vec<Artifact> = application
            .iter()
            .filter(|d| !d.is_plugin())
            .map(Artifact::from_dependency)
            .collect();

        if let Some(orphan) = additional.keys().find(|p| !regions.contains_key(*p)) {
            return Err(Error::ConfigError(format!(
                "Additional dependencies resolved for {orphan}, which has no classloading region"
            )));
        }

        let mut builder = ClassLoaderModelBuilder::new(root.clone())
            .dependencies(flat)
            .shared_libraries(self.shared_libraries.iter().cloned());

        for (coordinate, region) in regions {
            let extra = additional.get(coordinate).map(Vec::as_slice).unwrap_or_default();
            let dependencies = merge_region(&region.dependencies, extra);
            debug!(
                "Region of {}: {} dependencies ({} additional)",
                coordinate,
                dependencies.len(),
                extra.len()
            );
            builder = builder.plugin(Artifact::from_dependency(&region.plugin), dependencies);
        }

        let model = builder.build()?;
        info!(
            "Assembled classloader model for {}: {} dependencies, {} plugins",
            root,
            model.dependencies().len(),
            model.plugins().len()
        );
        Ok(model)
    }
}

/// Region followed by additional dependencies, which override region entries for the same library
fn merge_region(region: &[ResolvedDependency], additional: &[ResolvedDependency]) -> Vec<Artifact> {
    let overridden: HashSet<_> = additional.iter().map(|d| d.coordinate.library_key()).collect();
    region
        .iter()
        .filter(|d| {
            let keep = !overridden.contains(&d.coordinate.library_key());
            if !keep {
                debug!("{} overridden by an additional dependency", d.coordinate);
            }
            keep
        })
        .chain(additional)
        .map(Artifact::from_dependency)
        .collect()
}
