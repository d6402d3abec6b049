// src/artifact/layout.rs

//! Repository layout: where a coordinate lives inside a mirrored repository

use std::path::PathBuf;

use super::ArtifactCoordinate;

/// Folder, relative to the packaged artifact, that holds the mirrored repository
pub const REPOSITORY_FOLDER: &str = "repository";

/// Types whose payload is packaged as a jar file
const JAR_PACKAGED_TYPES: &[&str] = &[
    "test-jar",
    "maven-plugin",
    "ejb",
    "ejb-client",
    "java-source",
    "javadoc",
];

/// File extension used for an artifact type
pub fn extension_for_type(artifact_type: &str) -> &str {
    if JAR_PACKAGED_TYPES.contains(&artifact_type) {
        "jar"
    } else {
        artifact_type
    }
}

/// Directory segments for a coordinate: group (dots as separators), name, version
fn directory_segments(coordinate: &ArtifactCoordinate) -> Vec<&str> {
    let mut segments: Vec<&str> = coordinate.group_id.split('.').collect();
    segments.push(&coordinate.artifact_id);
    segments.push(&coordinate.version);
    segments
}

/// Directory for a coordinate, relative to a repository root
pub fn repository_directory(coordinate: &ArtifactCoordinate) -> PathBuf {
    directory_segments(coordinate).into_iter().collect()
}

/// Payload file name: `<artifact>-<version>[-<classifier>].<extension>`
pub fn file_name(coordinate: &ArtifactCoordinate) -> String {
    let mut name = format!("{}-{}", coordinate.artifact_id, coordinate.version);
    if let Some(classifier) = coordinate.classifier().filter(|c| !c.trim().is_empty()) {
        name.push('-');
        name.push_str(classifier);
    }
    name.push('.');
    name.push_str(extension_for_type(&coordinate.artifact_type));
    name
}

/// Descriptor file name: `<artifact>-<version>.pom`
pub fn descriptor_file_name(coordinate: &ArtifactCoordinate) -> String {
    format!("{}-{}.pom", coordinate.artifact_id, coordinate.version)
}

/// Relocatable location of the payload, always `/`-separated
pub fn relocatable_uri(coordinate: &ArtifactCoordinate) -> String {
    let name = file_name(coordinate);
    let mut segments = vec![REPOSITORY_FOLDER];
    segments.extend(directory_segments(coordinate));
    segments.push(&name);
    segments.join("/")
}
