// src/commands/inspect.rs

//! Summarize an existing classloader model descriptor

use anyhow::{Context, Result};
use classloader_packager::model;
use std::path::Path;

pub fn cmd_inspect(descriptor: &Path) -> Result<()> {
    let model = model::deserialize_from_file(descriptor)
        .with_context(|| format!("Failed to read {}", descriptor.display()))?;

    println!("Artifact: {}", model.artifact_coordinates());
    println!("Model version: {}", model.version());
    println!(
        "Locations: {}",
        if model.is_parameterized() { "relocatable" } else { "absolute" }
    );

    println!("\nDependencies ({}):", model.dependencies().len());
    for artifact in model.dependencies() {
        let shared = if artifact.shared { " [shared]" } else { "" };
        println!("  {}{}", artifact.coordinates, shared);
    }

    println!("\nPlugins ({}):", model.plugins().len());
    for (plugin, dependencies) in model.plugins() {
        println!("  {} ({} dependencies)", plugin.coordinates, dependencies.len());
        for artifact in dependencies {
            println!("    {}", artifact.coordinates);
        }
    }

    println!("\nDistinct artifacts: {}", model.artifacts().len());
    Ok(())
}
