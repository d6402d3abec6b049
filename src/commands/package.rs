// src/commands/package.rs

//! Full packaging run

use anyhow::Result;
use classloader_packager::Packager;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn cmd_package(config: &Path, snapshot: &Path, output: Option<PathBuf>) -> Result<()> {
    let (mut config, resolver) = super::load_inputs(config, snapshot)?;
    if let Some(output) = output {
        config.output.directory = output;
    }
    info!("Packaging into {}", config.output.directory.display());

    let report = Packager::new(config, &resolver).package()?;

    println!("Packaged {}", report.model.artifact_coordinates());
    println!("  Dependencies: {}", report.model.dependencies().len());
    println!("  Plugins:      {}", report.model.plugins().len());
    println!(
        "  Installed:    {} artifacts into {}",
        report.installed,
        report.repository.display()
    );
    println!("  Descriptor:   {}", report.descriptor.display());
    for descriptor in &report.plugin_descriptors {
        println!("    {}", descriptor.display());
    }
    Ok(())
}
