//! Main workflow orchestration logic
//!
//! Gathers the release decision from the prompts, shows the plan and hands
//! the mutating steps to the pipeline. It provides a clean separation
//! between CLI argument parsing and business logic: nothing here reads the
//! environment or process-wide flags.

use chrono::{Local, NaiveDate};
use std::path::PathBuf;

use crate::cli::pipeline::{self, build_steps, ReleaseContext};
use crate::config::Config;
use crate::domain::tag::validate_tag_name;
use crate::domain::{
    next_version, ReleaseIntent, SemanticVersion, TrackOrder, Transition, TransitionKind,
    VersionBump,
};
use crate::error::{BumpError, Result};
use crate::git::Repository;
use crate::hooks::ScriptRunner;
use crate::manifest::Manifest;
use crate::ui::{self, Choice, Prompt, ReleasePlan};
use crate::warning::ReleaseWarning;

/// Prompt keys, usable in `BUMP_VERSION_DEFAULTS`
pub const PROCEED_KEY: &str = "proceed";
pub const RELEASE_TYPE_KEY: &str = "releaseTypeChoice";
pub const VERSION_BUMP_KEY: &str = "selectedVersionBump";
pub const CUSTOM_VERSION_KEY: &str = "customVersion";
pub const CONFIRM_KEY: &str = "confirm";

const PRODUCTION_CHOICE: &str = "production";
const CUSTOM_CHOICE: &str = "custom";

/// Arguments for the release workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
/// This decoupling allows the workflow to be called programmatically
/// without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseArgs {
    /// Directory holding the manifest
    pub project_dir: PathBuf,

    /// Preview mode - print the steps without executing them
    pub dry_run: bool,

    /// Push the release; combined with `git.push` from the config
    pub push: bool,

    /// Date written into the changelog heading
    pub date: NaiveDate,
}

impl ReleaseArgs {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        ReleaseArgs {
            project_dir: project_dir.into(),
            dry_run: false,
            push: true,
            date: Local::now().date_naive(),
        }
    }
}

/// Result of a completed release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    pub previous: String,
    pub version: String,
    pub tag: String,
    pub pushed: bool,
    pub dry_run: bool,
    pub warnings: Vec<ReleaseWarning>,
}

/// Main release workflow
///
/// Orchestrates the entire release:
/// 1. Read the manifest version, the branch and the working tree state
/// 2. Confirm releasing from a non-release branch
/// 3. Refuse a dirty working tree
/// 4. Ask for the release type, bump or custom version
/// 5. Compute the next version and show the plan
/// 6. Run the pipeline after the final confirmation
///
/// Declining a prompt returns [BumpError::UserCancelled] and a dirty tree
/// returns [BumpError::DirtyWorkingTree], both before anything is written.
pub fn run_release(
    args: &ReleaseArgs,
    config: &Config,
    repo: &dyn Repository,
    runner: &dyn ScriptRunner,
    prompt: &mut dyn Prompt,
) -> Result<ReleaseOutcome> {
    let tracks = config.track_order()?;
    let manifest_path = config.manifest_path(&args.project_dir);
    let manifest = Manifest::load(&manifest_path)?;
    let current_text = manifest.version()?.to_string();
    let branch = repo.current_branch()?;
    let mut warnings = Vec::new();

    ui::display_status(&format!("Current version: {}", current_text));
    ui::display_status(&format!("Current branch: {}", branch));

    if branch != config.git.release_branch {
        let warning = ReleaseWarning::NotOnReleaseBranch {
            current: branch.clone(),
            expected: config.git.release_branch.clone(),
        };
        ui::display_warning(&warning);
        warnings.push(warning);

        let message = format!(
            "Release from '{}' instead of '{}'?",
            branch, config.git.release_branch
        );
        if !prompt.confirm(PROCEED_KEY, &message, false)? {
            return Err(BumpError::UserCancelled);
        }
    }

    let changes = repo.uncommitted_changes()?;
    if !changes.is_empty() {
        return Err(BumpError::DirtyWorkingTree { changes });
    }

    let current = SemanticVersion::parse(&current_text)?;
    let transition = choose_transition(&current, &tracks, prompt)?;
    if transition.to == transition.from {
        return Err(BumpError::process(
            "npm version",
            format!("Version not changed: {} is the current version", current),
        ));
    }

    if let TransitionKind::Downgrade { from, to } = &transition.kind {
        let warning = ReleaseWarning::PrereleaseDowngrade {
            from: from.clone(),
            to: to.clone(),
        };
        ui::display_warning(&warning);
        warnings.push(warning);
    }

    let version = transition.to.to_string();
    let tag = config.tag_template()?.render(&transition.to);
    validate_tag_name(&tag)?;
    if repo.tag_exists(&tag)? {
        return Err(BumpError::process(
            format!("git tag -a {}", tag),
            format!("tag '{}' already exists", tag),
        ));
    }

    let release = ReleaseContext {
        repo,
        runner,
        manifest_path,
        lock_path: config.lock_file_path(&args.project_dir),
        changelog_path: config
            .changelog
            .enabled
            .then(|| config.changelog_path(&args.project_dir)),
        declared_hooks: pipeline::declared_hooks(&manifest),
        previous: current_text.clone(),
        version: version.clone(),
        tag: tag.clone(),
        commit_message: config.commit_template()?.render(&transition.to),
        tag_message: config.tag_message_template()?.render(&transition.to),
        remote: config.git.remote.clone(),
        branch: branch.clone(),
        date: args.date,
    };

    let push = args.push && config.git.push;
    let steps = build_steps(config.changelog.enabled, push);

    let plan = ReleasePlan {
        package: manifest.name().map(str::to_string),
        previous: current_text.clone(),
        version: version.clone(),
        tag: tag.clone(),
        release_type: describe_release_type(&transition, &tracks),
        commit_message: release.commit_message.clone(),
        steps: steps
            .iter()
            .filter(|step| match step {
                pipeline::Step::Hook(hook) => release.declared_hooks.contains(hook),
                _ => true,
            })
            .map(|step| step.describe(&release))
            .collect(),
    };
    ui::display_release_plan(&plan);

    if !prompt.confirm(CONFIRM_KEY, "Proceed with these steps?", true)? {
        return Err(BumpError::UserCancelled);
    }

    if args.dry_run {
        ui::display_status("Dry run: no files, commits or tags will be changed");
    }

    let report = pipeline::run_pipeline(&steps, &release, args.dry_run)?;
    warnings.extend(report.warnings);

    if !args.dry_run {
        ui::display_success(&format!("Released {}", version));
        if !report.pushed {
            ui::display_manual_push_instruction(&config.git.remote, &branch, &tag);
        }
    }

    Ok(ReleaseOutcome {
        previous: current_text,
        version,
        tag,
        pushed: report.pushed,
        dry_run: args.dry_run,
        warnings,
    })
}

/// Ask for the release type (and bump or custom version) and compute the transition
fn choose_transition(
    current: &SemanticVersion,
    tracks: &TrackOrder,
    prompt: &mut dyn Prompt,
) -> Result<Transition> {
    let choice = prompt.select(
        RELEASE_TYPE_KEY,
        "Select release type",
        &release_type_choices(current, tracks),
        0,
    )?;

    let intent = match choice.as_str() {
        PRODUCTION_CHOICE => ReleaseIntent::Production,
        CUSTOM_CHOICE => {
            let literal = prompt.input(
                CUSTOM_VERSION_KEY,
                "Enter version (MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD])",
            )?;
            // Validate before anything else happens
            SemanticVersion::parse(literal.trim())?;
            ReleaseIntent::custom(literal.trim())
        }
        track => ReleaseIntent::prerelease(track),
    };

    tracing::debug!(%intent, "release intent chosen");

    let bump = match (&current.prerelease, &intent) {
        (_, ReleaseIntent::Custom(_)) => None,
        (None, _) => Some(choose_bump(current, &intent, tracks, prompt)?),
        (Some(pre), ReleaseIntent::Production) => {
            ui::display_status(&format!(
                "Current version is a {} prerelease, releasing it as production",
                pre.tag
            ));
            None
        }
        (Some(pre), ReleaseIntent::Prerelease(track)) if pre.tag == *track => {
            ui::display_status(&format!(
                "Current version is a {} prerelease, incrementing its counter",
                pre.tag
            ));
            None
        }
        (Some(pre), ReleaseIntent::Prerelease(track)) => {
            ui::display_status(&format!("Switching prerelease from {} to {}", pre.tag, track));
            None
        }
    };

    next_version(current, &intent, bump, tracks)
}

fn choose_bump(
    current: &SemanticVersion,
    intent: &ReleaseIntent,
    tracks: &TrackOrder,
    prompt: &mut dyn Prompt,
) -> Result<VersionBump> {
    let mut choices = Vec::new();
    for (bump, title) in [
        (VersionBump::Patch, "Patch - bug fixes"),
        (VersionBump::Minor, "Minor - backwards-compatible features"),
        (VersionBump::Major, "Major - breaking changes"),
    ] {
        let preview = next_version(current, intent, Some(bump), tracks)?;
        choices.push(
            Choice::new(bump.name(), title)
                .with_description(format!("{} → {}", current, preview.to)),
        );
    }

    let selected = prompt.select(VERSION_BUMP_KEY, "Select version bump", &choices, 0)?;
    selected.parse()
}

/// Production first, then every configured track, then custom
///
/// Tracks below the current prerelease track stay selectable but are
/// marked as downgrades.
pub fn release_type_choices(current: &SemanticVersion, tracks: &TrackOrder) -> Vec<Choice> {
    let mut choices = vec![Choice::new(PRODUCTION_CHOICE, "Production release")
        .with_description("stable release for production use")];

    let current_rank = current
        .prerelease
        .as_ref()
        .and_then(|pre| tracks.rank(&pre.tag));

    for (rank, track) in tracks.tracks().iter().enumerate() {
        let mut description = track.label.clone();
        if current_rank.is_some_and(|current| rank < current) {
            if description.is_empty() {
                description = "downgrade".to_string();
            } else {
                description.push_str(" (downgrade)");
            }
        }

        let choice = Choice::new(&track.name, format!("{} prerelease", track.name));
        choices.push(if description.is_empty() {
            choice
        } else {
            choice.with_description(description)
        });
    }

    choices.push(
        Choice::new(CUSTOM_CHOICE, "Custom version").with_description("enter an exact version"),
    );
    choices
}

fn describe_release_type(transition: &Transition, tracks: &TrackOrder) -> String {
    let track_name = |version: &SemanticVersion| {
        version.prerelease.as_ref().map(|pre| {
            match tracks.label(&pre.tag).filter(|label| !label.is_empty()) {
                Some(label) => format!("{} ({})", pre.tag, label),
                None => pre.tag.clone(),
            }
        })
    };

    match &transition.kind {
        TransitionKind::Custom => "custom".to_string(),
        TransitionKind::Bump(bump) => match track_name(&transition.to) {
            Some(track) => format!("{}, {} bump", track, bump),
            None => format!("production ({})", bump),
        },
        _ => track_name(&transition.to).unwrap_or_else(|| "production".to_string()),
    }
}
