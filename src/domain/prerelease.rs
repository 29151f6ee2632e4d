//! Prerelease tracks
//!
//! A track is a maturity category such as `alpha` or `rc`. The order of the
//! configured tracks defines which moves are upgrades and which are
//! downgrades; it is configuration and never derived from the names.

use crate::error::{BumpError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A named prerelease track with its human label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrereleaseTrack {
    pub name: String,
    #[serde(default)]
    pub label: String,
}

impl PrereleaseTrack {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        PrereleaseTrack {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// Returns the default track list: dev < alpha < beta < rc
pub fn default_tracks() -> Vec<PrereleaseTrack> {
    vec![
        PrereleaseTrack::new("dev", "development build"),
        PrereleaseTrack::new("alpha", "internal testing"),
        PrereleaseTrack::new("beta", "public testing"),
        PrereleaseTrack::new("rc", "release candidate"),
    ]
}

/// Ordered enumeration of prerelease tracks, lowest maturity first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackOrder {
    tracks: Vec<PrereleaseTrack>,
}

impl TrackOrder {
    /// Build a track order, rejecting empty, duplicate or non-identifier names
    pub fn new(tracks: Vec<PrereleaseTrack>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(BumpError::config("At least one prerelease track is required"));
        }

        for (index, track) in tracks.iter().enumerate() {
            validate_track_name(&track.name)?;

            if tracks[..index].iter().any(|t| t.name == track.name) {
                return Err(BumpError::config(format!(
                    "Duplicate prerelease track '{}'",
                    track.name
                )));
            }
        }

        Ok(TrackOrder { tracks })
    }

    pub fn tracks(&self) -> &[PrereleaseTrack] {
        &self.tracks
    }

    pub fn get(&self, name: &str) -> Option<&PrereleaseTrack> {
        self.tracks.iter().find(|t| t.name == name)
    }

    /// Index of a track in the configured order
    pub fn rank(&self, name: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.name == name)
    }

    /// Human label for a track; None when the tag is not configured
    pub fn label(&self, name: &str) -> Option<&str> {
        self.get(name).map(|t| t.label.as_str())
    }

    /// Compare two tracks by rank; None when either is not configured
    pub fn compare(&self, from: &str, to: &str) -> Option<Ordering> {
        Some(self.rank(to)?.cmp(&self.rank(from)?))
    }
}

impl Default for TrackOrder {
    fn default() -> Self {
        TrackOrder {
            tracks: default_tracks(),
        }
    }
}

fn validate_track_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BumpError::config("Empty prerelease track name"));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(BumpError::config(format!(
            "Invalid prerelease track '{}': only ASCII letters, digits and '-' are allowed",
            name
        )));
    }

    // A purely numeric tag would be read back as a counter.
    if name.chars().all(|c| c.is_ascii_digit()) {
        return Err(BumpError::config(format!(
            "Invalid prerelease track '{}': must not be numeric",
            name
        )));
    }

    Ok(())
}
