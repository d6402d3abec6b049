// src/packager.rs

//! End-to-end packaging: resolve, assemble, install, serialize

use std::path::{Path, PathBuf};
use tracing::info;

use crate::artifact::layout::REPOSITORY_FOLDER;
use crate::assembler::ClassLoaderModelAssembler;
use crate::config::PackagingConfig;
use crate::error::Result;
use crate::installer::RepositoryInstaller;
use crate::model::{self, ClassLoaderModel};
use crate::resolver::{
    AdditionalDependenciesResolver, ApplicationDependencyResolver, DependencyResolver,
    PluginIsolationResolver,
};

/// Directory, relative to the output, holding the artifact descriptor
pub const DESCRIPTOR_DIRECTORY: &str = "META-INF/mule-artifact";

/// What a packaging run produced
#[derive(Debug, Clone)]
pub struct PackagingReport {
    /// The resolved model, with absolute locations
    pub model: ClassLoaderModel,
    pub repository: PathBuf,
    pub installed: usize,
    pub descriptor: PathBuf,
    pub plugin_descriptors: Vec<PathBuf>,
}

/// Runs the packaging pipeline for one configuration
pub struct Packager<'a> {
    config: PackagingConfig,
    resolver: &'a dyn DependencyResolver,
}

impl<'a> Packager<'a> {
    pub fn new(config: PackagingConfig, resolver: &'a dyn DependencyResolver) -> Self {
        Self { config, resolver }
    }

    pub fn config(&self) -> &PackagingConfig {
        &self.config
    }

    /// Resolve and assemble the model without touching the file system
    pub fn resolve(&self) -> Result<ClassLoaderModel> {
        self.config.validate()?;
        let root = self.config.root()?;

        let adapter = ApplicationDependencyResolver::new(self.resolver);
        let application = adapter
            .resolve_application_dependencies(&root, self.config.artifact.include_test_dependencies)?;

        let regions = PluginIsolationResolver::new(adapter).resolve_all(&application)?;

        let additional = AdditionalDependenciesResolver::new(
            adapter,
            self.config.additional_plugin_dependencies.clone(),
        )
        .resolve(&application, &regions)?;

        ClassLoaderModelAssembler::new(self.config.shared_libraries.clone()).assemble(
            &root,
            &application,
            &regions,
            &additional,
        )
    }

    /// The model in the form it is serialized, according to the output settings
    pub fn descriptor_model(&self, model: &ClassLoaderModel) -> ClassLoaderModel {
        if self.config.output.parameterize_uris {
            model.parameterized()
        } else {
            model.clone()
        }
    }

    /// Resolve, then write the repository and descriptors below the output directory
    ///
    /// Every resolution and configuration error surfaces before the first write.
    pub fn package(&self) -> Result<PackagingReport> {
        let model = self.resolve()?;
        let output: &Path = &self.config.output.directory;

        let installer = RepositoryInstaller::new(output.join(REPOSITORY_FOLDER));
        let installed = installer.install(&model.artifacts())?;
        let plugin_descriptors = installer.write_plugin_models(&model)?;

        let descriptor = model::serialize_to_file(
            &self.descriptor_model(&model),
            &output.join(DESCRIPTOR_DIRECTORY),
        )?;

        info!(
            "Packaged {}: {} artifacts, descriptor {}",
            model.artifact_coordinates(),
            installed,
            descriptor.display()
        );
        Ok(PackagingReport {
            model,
            repository: installer.root().to_path_buf(),
            installed,
            descriptor,
            plugin_descriptors,
        })
    }
}
