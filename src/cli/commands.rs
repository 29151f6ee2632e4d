//! `validate` and `changelog` subcommands
//!
//! Both write through the given writers so their output can be checked
//! without a terminal.

use chrono::NaiveDate;
use console::style;
use std::io::Write;
use std::path::Path;

use crate::changelog::{self, ChangelogUpdate};
use crate::config::Config;
use crate::domain::{validate, SemanticVersion, TrackOrder, VersionReport};
use crate::error::Result;
use crate::manifest::Manifest;

pub const EXPECTED_FORMAT: &str = "MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]";

/// Check a version string and print its parts
///
/// Returns the process exit code: 0 for a valid version, 1 for an invalid
/// or missing one.
pub fn validate_command(
    input: Option<&str>,
    tracks: &TrackOrder,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<i32> {
    let Some(input) = input else {
        writeln!(err, "Usage: bump-version validate <VERSION>")?;
        writeln!(err, "Expected format: {}", EXPECTED_FORMAT)?;
        return Ok(1);
    };

    match validate(input, tracks) {
        Ok(report) => {
            write_report(&report, out)?;
            Ok(0)
        }
        Err(e) => {
            writeln!(err, "{} {}", style("✗").red(), e)?;
            writeln!(err, "Expected format: {}", EXPECTED_FORMAT)?;
            Ok(1)
        }
    }
}

fn write_report(report: &VersionReport, out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        "{} Valid version: {}",
        style("✓").green(),
        report.version
    )?;
    writeln!(out, "  Major:      {}", report.major())?;
    writeln!(out, "  Minor:      {}", report.minor())?;
    writeln!(out, "  Patch:      {}", report.patch())?;

    if let Some(tag) = report.prerelease_tag() {
        let counter = report
            .prerelease_counter()
            .map(|c| format!(".{}", c))
            .unwrap_or_default();
        match &report.track_label {
            Some(label) if !label.is_empty() => {
                writeln!(out, "  Prerelease: {}{} ({})", tag, counter, label)?
            }
            _ => writeln!(out, "  Prerelease: {}{}", tag, counter)?,
        }
    }

    if let Some(build) = report.build() {
        writeln!(out, "  Build:      {}", build)?;
    }

    Ok(())
}

/// Turn the changelog's Unreleased section into a release entry
///
/// `version` defaults to the manifest's version.
pub fn changelog_command(
    project_dir: &Path,
    config: &Config,
    version: Option<&str>,
    date: NaiveDate,
    dry_run: bool,
    out: &mut dyn Write,
) -> Result<ChangelogUpdate> {
    let version = match version {
        Some(version) => SemanticVersion::parse(version)?.to_string(),
        None => Manifest::load(&config.manifest_path(project_dir))?
            .version()?
            .to_string(),
    };

    let path = config.changelog_path(project_dir);
    let name = config.changelog.path.as_str();
    let update = changelog::update_changelog(&path, &version, date, dry_run)?;

    match &update {
        ChangelogUpdate::Updated { heading } => {
            writeln!(out, "{} {} updated: {}", style("✓").green(), name, heading)?
        }
        ChangelogUpdate::WouldUpdate { heading } => writeln!(
            out,
            "{} Would update {}: {}",
            style("[DRY-RUN]").cyan(),
            name,
            heading
        )?,
        ChangelogUpdate::MissingFile => writeln!(out, "No {} found, skipping", name)?,
        ChangelogUpdate::NoUnreleasedSection => writeln!(
            out,
            "{} No [Unreleased] section in {}, skipping",
            style("⚠").yellow(),
            name
        )?,
    }

    Ok(update)
}
