// src/commands/resolve.rs

//! Resolve a classloader model and print its descriptor

use anyhow::Result;
use classloader_packager::{Packager, model};
use std::path::Path;

pub fn cmd_resolve(config: &Path, snapshot: &Path, absolute: bool) -> Result<()> {
    let (mut config, resolver) = super::load_inputs(config, snapshot)?;
    if absolute {
        config.output.parameterize_uris = false;
    }

    let packager = Packager::new(config, &resolver);
    let resolved = packager.resolve()?;
    print!("{}", model::serialize(&packager.descriptor_model(&resolved))?);
    Ok(())
}
