// src/commands/mod.rs
//! Command handlers for the clpack CLI

mod inspect;
mod package;
mod resolve;

pub use inspect::cmd_inspect;
pub use package::cmd_package;
pub use resolve::cmd_resolve;

use anyhow::{Context, Result};
use classloader_packager::{PackagingConfig, SnapshotResolver};
use std::path::Path;

/// Load the configuration and the resolution snapshot shared by resolve and package
fn load_inputs(config: &Path, snapshot: &Path) -> Result<(PackagingConfig, SnapshotResolver)> {
    let config = PackagingConfig::load(config)
        .with_context(|| format!("Failed to load packaging configuration {}", config.display()))?;
    let resolver = SnapshotResolver::load(snapshot)
        .with_context(|| format!("Failed to load resolution snapshot {}", snapshot.display()))?;
    Ok((config, resolver))
}
