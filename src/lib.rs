// src/lib.rs

//! Classloader model packaging
//!
//! Computes the classloader model of a modular application: the closure of
//! its runtime dependencies, partitioned into one isolated region per plugin,
//! with additional and shared libraries applied. The model is then mirrored
//! into a local repository and serialized as `classloader-model.json`.
//!
//! # Architecture
//!
//! - Resolution: an external [`DependencyResolver`] supplies graphs; the
//!   [`resolver`] module builds the application graph, plugin regions and
//!   additional dependencies on top of it
//! - Arbitration: contributions for the same library must share a major
//!   version, the newest one wins
//! - Assembly: [`ClassLoaderModelAssembler`] freezes everything into an
//!   immutable [`ClassLoaderModel`], with a relocatable copy on demand
//! - Materialization: [`RepositoryInstaller`] mirrors artifacts by coordinate

pub mod artifact;
pub mod assembler;
pub mod config;
mod error;
pub mod installer;
pub mod metadata;
pub mod model;
pub mod packager;
pub mod resolver;
pub mod version;

pub use artifact::{
    Artifact, ArtifactCoordinate, DependencyDeclaration, DependencyKind, PluginDeclaration,
    ResolvedDependency, Scope,
};
pub use assembler::ClassLoaderModelAssembler;
pub use config::PackagingConfig;
pub use error::{Error, Result};
pub use installer::RepositoryInstaller;
pub use metadata::BuildMetadata;
pub use model::{ClassLoaderModel, ClassLoaderModelBuilder, SharedLibrary};
pub use packager::{Packager, PackagingReport};
pub use resolver::{
    AdditionalDependenciesResolver, ApplicationDependencyResolver, DependencyResolver,
    PluginIsolationResolver, SnapshotResolver,
};
