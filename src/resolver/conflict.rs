// src/resolver/conflict.rs

//! Version arbitration between contributions for the same library
//!
//! Two contributions for one library are only compatible when they share a
//! major version; the newer one then wins. Differing majors abort the run,
//! since silently picking one would change behavior for whoever asked for
//! the other.

use tracing::debug;

use crate::artifact::{ArtifactCoordinate, DependencyDeclaration, ResolvedDependency};
use crate::error::{Error, Result};
use crate::version;

/// Outcome of offering a candidate to an accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arbitration {
    /// No entry for the library yet
    Insert,
    /// Candidate is newer within the same major, replaces the entry
    Replace,
    /// Existing entry is at least as new, candidate is discarded
    KeepExisting,
}

/// Decide what to do with `candidate` given the entry already held for its library
pub fn arbitrate(
    existing: Option<&ArtifactCoordinate>,
    candidate: &ArtifactCoordinate,
) -> Result<Arbitration> {
    let Some(existing) = existing else {
        return Ok(Arbitration::Insert);
    };

    if !version::same_major(&existing.version, &candidate.version) {
        return Err(Error::VersionConflict {
            existing: existing.to_string(),
            candidate: candidate.to_string(),
        });
    }

    if version::is_newer(&candidate.version, &existing.version) {
        debug!("{} replaces {}", candidate, existing);
        Ok(Arbitration::Replace)
    } else {
        debug!("Keeping {} over {}", existing, candidate);
        Ok(Arbitration::KeepExisting)
    }
}

/// Offer a resolved dependency to an accumulator, keeping one entry per library
pub fn merge_dependency(
    accumulator: &mut Vec<ResolvedDependency>,
    candidate: ResolvedDependency,
) -> Result<Arbitration> {
    let position = accumulator
        .iter()
        .position(|d| d.coordinate.same_library(&candidate.coordinate));
    let decision = arbitrate(
        position.map(|i| &accumulator[i].coordinate),
        &candidate.coordinate,
    )?;
    match (decision, position) {
        (Arbitration::Insert, _) => accumulator.push(candidate),
        (Arbitration::Replace, Some(i)) => accumulator[i] = candidate,
        _ => {}
    }
    Ok(decision)
}

/// Offer a declared dependency to a declaration list, keeping one entry per library
pub fn merge_declaration(
    declarations: &mut Vec<DependencyDeclaration>,
    candidate: DependencyDeclaration,
) -> Result<Arbitration> {
    let position = declarations.iter().position(|d| d.same_library(&candidate));
    let existing = position.map(|i| declarations[i].coordinate());
    let decision = arbitrate(existing.as_ref(), &candidate.coordinate())?;
    match (decision, position) {
        (Arbitration::Insert, _) => declarations.push(candidate),
        (Arbitration::Replace, Some(i)) => declarations[i] = candidate,
        _ => {}
    }
    Ok(decision)
}
