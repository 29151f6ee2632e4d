//! Changelog rewriting
//!
//! Turns the entries collected under `## [Unreleased]` into a dated release
//! section while keeping the Unreleased heading for future entries.

use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::error::{BumpError, Result};

const UNRELEASED_PATTERN: &str = r"## \[Unreleased\]\s*\n";

/// What happened to the changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangelogUpdate {
    /// The release heading was written
    Updated { heading: String },
    /// Dry run: the release heading would have been written
    WouldUpdate { heading: String },
    /// No changelog file
    MissingFile,
    /// The file has no `## [Unreleased]` heading
    NoUnreleasedSection,
}

impl ChangelogUpdate {
    pub fn changed_file(&self) -> bool {
        matches!(self, ChangelogUpdate::Updated { .. })
    }
}

fn unreleased_regex() -> Result<Regex> {
    Regex::new(UNRELEASED_PATTERN).map_err(|e| BumpError::config(e.to_string()))
}

/// `## [<version>] - <YYYY-MM-DD>`
pub fn release_heading(version: &str, date: NaiveDate) -> String {
    format!("## [{}] - {}", version, date.format("%Y-%m-%d"))
}

/// Whether the content has an `## [Unreleased]` heading
pub fn has_unreleased_section(content: &str) -> bool {
    unreleased_regex()
        .map(|re| re.is_match(content))
        .unwrap_or(false)
}

/// Insert the release heading right after the first Unreleased heading
///
/// Returns None when there is no Unreleased heading.
pub fn insert_release_heading(content: &str, version: &str, date: NaiveDate) -> Option<String> {
    let re = unreleased_regex().ok()?;
    let found = re.find(content)?;

    let mut updated = String::with_capacity(content.len() + 32);
    updated.push_str(&content[..found.start()]);
    updated.push_str("## [Unreleased]\n\n");
    updated.push_str(&release_heading(version, date));
    updated.push_str("\n\n");
    updated.push_str(&content[found.end()..]);
    Some(updated)
}

/// Rewrite the changelog at `path` for `version`
///
/// A missing file or a file without an Unreleased heading is left alone.
pub fn update_changelog(
    path: &Path,
    version: &str,
    date: NaiveDate,
    dry_run: bool,
) -> Result<ChangelogUpdate> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no changelog");
        return Ok(ChangelogUpdate::MissingFile);
    }

    let content = fs::read_to_string(path)?;
    let Some(updated) = insert_release_heading(&content, version, date) else {
        return Ok(ChangelogUpdate::NoUnreleasedSection);
    };

    let heading = release_heading(version, date);
    if dry_run {
        return Ok(ChangelogUpdate::WouldUpdate { heading });
    }

    fs::write(path, updated)?;
    tracing::debug!(path = %path.display(), %heading, "changelog updated");
    Ok(ChangelogUpdate::Updated { heading })
}
