// src/version/mod.rs

//! Version comparison for artifact arbitration
//!
//! Versions are compared semantically when both sides parse as semantic
//! versions (after completing `1` to `1.0.0` and `1.2` to `1.2.0`), and
//! lexicographically otherwise. Everything here is a pure function over
//! version strings.

use semver::Version;
use std::cmp::Ordering;

/// Outcome of comparing two version strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionComparison {
    /// Ordering of the left version relative to the right one
    pub ordering: Ordering,
    /// True when both versions parsed as semantic versions
    pub semantic: bool,
}

/// Parse a version leniently into a semantic version
///
/// Accepts strict semantic versions plus one- and two-component numeric
/// versions with an optional `-qualifier`, e.g. `1`, `1.2`, `1.2-SNAPSHOT`.
pub fn parse_semantic(version: &str) -> Option<Version> {
    let version = version.trim();
    if let Ok(v) = Version::parse(version) {
        return Some(v);
    }

    let (numbers, qualifier) = match version.split_once('-') {
        Some((n, q)) => (n, Some(q)),
        None => (version, None),
    };
    let parts: Vec<&str> = numbers.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    let mut components = [0u64; 3];
    for (slot, part) in components.iter_mut().zip(&parts) {
        *slot = part.parse::<u64>().ok()?;
    }

    let completed = match qualifier {
        Some(q) => format!("{}.{}.{}-{}", components[0], components[1], components[2], q),
        None => format!("{}.{}.{}", components[0], components[1], components[2]),
    };
    Version::parse(&completed).ok()
}

/// Compare two version strings
pub fn compare_versions(a: &str, b: &str) -> VersionComparison {
    match (parse_semantic(a), parse_semantic(b)) {
        (Some(va), Some(vb)) => VersionComparison {
            ordering: va.cmp(&vb),
            semantic: true,
        },
        // Not semantic on both sides, fall back to plain string ordering
        _ => VersionComparison {
            ordering: a.cmp(b),
            semantic: false,
        },
    }
}

/// True when `candidate` is strictly newer than `current`
pub fn is_newer(candidate: &str, current: &str) -> bool {
    compare_versions(candidate, current).ordering == Ordering::Greater
}

/// True when both versions share the same major component
///
/// Identical strings always match. Otherwise both must parse as semantic
/// versions; two unparseable, differing versions are never the same major.
pub fn same_major(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (parse_semantic(a), parse_semantic(b)) {
        (Some(va), Some(vb)) => va.major == vb.major,
        _ => false,
    }
}
