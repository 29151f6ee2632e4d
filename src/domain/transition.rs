//! Next-version computation
//!
//! Maps the current version and the user's release intent to the version
//! that will be written, along with the kind of move that was made so the
//! caller can warn about downgrades.

use crate::domain::intent::ReleaseIntent;
use crate::domain::prerelease::TrackOrder;
use crate::domain::version::{Counter, Prerelease, SemanticVersion, VersionBump};
use crate::error::{BumpError, Result};
use std::cmp::Ordering;

/// How the next version was derived from the current one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionKind {
    /// Production release bumped by a component
    Bump(VersionBump),
    /// Prerelease suffix stripped
    Promote,
    /// Same track, counter incremented
    Iterate,
    /// Moved to a higher-ranked track
    Upgrade { from: String, to: String },
    /// Moved to a lower-ranked track
    Downgrade { from: String, to: String },
    /// Moved away from a track that is not configured
    Switch { from: String, to: String },
    /// Version given verbatim
    Custom,
}

/// A computed version change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: SemanticVersion,
    pub to: SemanticVersion,
    pub kind: TransitionKind,
}

/// Compute the next version
///
/// `bump` only matters when `current` is a production release and the
/// intent is not custom; it defaults to patch.
pub fn next_version(
    current: &SemanticVersion,
    intent: &ReleaseIntent,
    bump: Option<VersionBump>,
    tracks: &TrackOrder,
) -> Result<Transition> {
    let (to, kind) = match intent {
        ReleaseIntent::Custom(literal) => (SemanticVersion::parse(literal)?, TransitionKind::Custom),
        ReleaseIntent::Production => match &current.prerelease {
            Some(_) => (current.core(), TransitionKind::Promote),
            None => {
                let bump = bump.unwrap_or_default();
                (current.bump(bump)?, TransitionKind::Bump(bump))
            }
        },
        ReleaseIntent::Prerelease(track) => {
            if tracks.get(track).is_none() {
                return Err(BumpError::UnknownTrack(track.clone()));
            }
            match &current.prerelease {
                None => {
                    let bump = bump.unwrap_or_default();
                    let next = current.bump(bump)?.with_prerelease(Prerelease::start(track));
                    (next, TransitionKind::Bump(bump))
                }
                Some(pre) => change_track(current, pre, track, tracks),
            }
        }
    };

    Ok(Transition {
        from: current.clone(),
        to,
        kind,
    })
}

fn change_track(
    current: &SemanticVersion,
    pre: &Prerelease,
    track: &str,
    tracks: &TrackOrder,
) -> (SemanticVersion, TransitionKind) {
    if pre.tag == track {
        let counter = match &pre.counter {
            Some(counter) => counter.increment(),
            None => Counter::zero(),
        };
        let next = current
            .core()
            .with_prerelease(Prerelease::new(track, Some(counter)));
        return (next, TransitionKind::Iterate);
    }

    let from = pre.tag.clone();
    let to = track.to_string();
    let kind = match tracks.compare(&from, &to) {
        Some(Ordering::Less) => TransitionKind::Downgrade { from, to },
        Some(_) => TransitionKind::Upgrade { from, to },
        None => TransitionKind::Switch { from, to },
    };

    (current.core().with_prerelease(Prerelease::start(track)), kind)
}
