use crate::domain::prerelease::TrackOrder;
use crate::domain::version::{Counter, SemanticVersion};
use crate::error::Result;

/// Breakdown of a valid version for the `validate` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReport {
    pub version: SemanticVersion,
    /// Label of the prerelease track; None for unknown tags
    pub track_label: Option<String>,
}

impl VersionReport {
    pub fn major(&self) -> u64 {
        self.version.major
    }

    pub fn minor(&self) -> u64 {
        self.version.minor
    }

    pub fn patch(&self) -> u64 {
        self.version.patch
    }

    pub fn prerelease_tag(&self) -> Option<&str> {
        self.version.prerelease.as_ref().map(|p| p.tag.as_str())
    }

    pub fn prerelease_counter(&self) -> Option<&Counter> {
        self.version.prerelease.as_ref().and_then(|p| p.counter.as_ref())
    }

    pub fn build(&self) -> Option<&str> {
        self.version.build.as_deref()
    }
}

/// Parse `text` and describe it against the configured tracks
pub fn validate(text: &str, tracks: &TrackOrder) -> Result<VersionReport> {
    let version = SemanticVersion::parse(text)?;
    let track_label = version
        .prerelease
        .as_ref()
        .and_then(|p| tracks.label(&p.tag))
        .map(str::to_string);

    Ok(VersionReport {
        version,
        track_label,
    })
}
