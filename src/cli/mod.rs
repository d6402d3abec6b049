// src/cli/mod.rs
//! CLI definitions for clpack
//!
//! This module contains the command-line interface definitions using clap.
//! The command implementations are in the `commands` module.
//!
//! - `resolve` - Resolve a classloader model and print it
//! - `package` - Resolve, mirror the repository and write descriptors
//! - `inspect` - Summarize an existing classloader-model.json
//! - `completions` - Generate shell completions

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "clpack")]
#[command(version)]
#[command(about = "Resolve and package classloader models for modular applications", long_about = None)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the classloader model and print it as JSON
    Resolve {
        /// Packaging configuration file
        #[arg(short, long, default_value = "packaging.toml")]
        config: PathBuf,

        /// Resolution snapshot used as dependency graph source
        #[arg(short, long, default_value = "resolution.toml")]
        snapshot: PathBuf,

        /// Print absolute locations instead of repository-relative ones
        #[arg(long)]
        absolute: bool,
    },

    /// Resolve, install the artifact repository and write descriptors
    Package {
        /// Packaging configuration file
        #[arg(short, long, default_value = "packaging.toml")]
        config: PathBuf,

        /// Resolution snapshot used as dependency graph source
        #[arg(short, long, default_value = "resolution.toml")]
        snapshot: PathBuf,

        /// Output directory (defaults to the configured one)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a summary of a classloader-model.json
    Inspect {
        /// Descriptor to read
        descriptor: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
