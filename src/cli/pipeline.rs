//! Release pipeline
//!
//! The mutating half of a release is an ordered list of [Step]s run by
//! [run_pipeline]. Each step carries a [FailurePolicy]: an `Abort` failure
//! before the commit restores every file snapshot taken so far, a `Warn`
//! failure is recorded and the pipeline carries on.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::changelog::{self, ChangelogUpdate};
use crate::error::Result;
use crate::git::Repository;
use crate::hooks::{FailurePolicy, HookContext, HookType, ScriptRunner};
use crate::manifest::{self, FileSnapshot};
use crate::ui;
use crate::warning::ReleaseWarning;

/// One unit of work in the release pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Hook(HookType),
    WriteManifest,
    Changelog,
    Commit,
    Tag,
    Push,
}

impl Step {
    pub fn failure_policy(&self) -> FailurePolicy {
        match self {
            Step::Hook(hook) => hook.failure_policy(),
            _ => FailurePolicy::Abort,
        }
    }

    /// Human-readable description used in the plan and in dry runs
    pub fn describe(&self, release: &ReleaseContext<'_>) -> String {
        match self {
            Step::Hook(hook) => format!(
                "Run {} hook ({})",
                hook,
                release.runner.describe(hook.name())
            ),
            Step::WriteManifest => format!(
                "Update {} to {}",
                file_name(&release.manifest_path),
                release.version
            ),
            Step::Changelog => match &release.changelog_path {
                Some(path) => format!("Add release {} to {}", release.version, file_name(path)),
                None => "Update changelog".to_string(),
            },
            Step::Commit => format!("Commit changes (\"{}\")", release.commit_message),
            Step::Tag => format!("Create annotated tag {}", release.tag),
            Step::Push => format!(
                "Push {} and {} to {}",
                release.branch, release.tag, release.remote
            ),
        }
    }
}

/// Steps in execution order
pub fn build_steps(changelog: bool, push: bool) -> Vec<Step> {
    let mut steps = vec![Step::Hook(HookType::Preversion), Step::WriteManifest];
    if changelog {
        steps.push(Step::Changelog);
    }
    steps.extend([
        Step::Hook(HookType::Version),
        Step::Commit,
        Step::Tag,
        Step::Hook(HookType::Postversion),
    ]);
    if push {
        steps.push(Step::Push);
    }
    steps
}

/// Everything the steps need to know about the release being cut
pub struct ReleaseContext<'a> {
    pub repo: &'a dyn Repository,
    pub runner: &'a dyn ScriptRunner,
    pub manifest_path: PathBuf,
    pub lock_path: Option<PathBuf>,
    /// None when changelog updates are disabled
    pub changelog_path: Option<PathBuf>,
    /// Lifecycle scripts declared in the manifest
    pub declared_hooks: Vec<HookType>,
    pub previous: String,
    pub version: String,
    pub tag: String,
    pub commit_message: String,
    pub tag_message: String,
    pub remote: String,
    pub branch: String,
    pub date: NaiveDate,
}

impl ReleaseContext<'_> {
    fn hook_context(&self, hook: HookType) -> HookContext {
        HookContext {
            hook_type: hook,
            old_version: self.previous.clone(),
            new_version: self.version.clone(),
            tag: self.tag.clone(),
        }
    }

    fn is_declared(&self, hook: HookType) -> bool {
        self.declared_hooks.contains(&hook)
    }
}

/// What the pipeline did
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub warnings: Vec<ReleaseWarning>,
    pub committed: bool,
    pub pushed: bool,
    pub changelog: Option<ChangelogUpdate>,
}

#[derive(Default)]
struct PipelineState {
    snapshots: Vec<FileSnapshot>,
    changed: Vec<PathBuf>,
    report: PipelineReport,
}

/// Run `steps` in order
///
/// In dry-run mode every step is printed and nothing is executed.
pub fn run_pipeline(
    steps: &[Step],
    release: &ReleaseContext<'_>,
    dry_run: bool,
) -> Result<PipelineReport> {
    let mut state = PipelineState::default();

    for step in steps {
        if let Step::Hook(hook) = step {
            if !release.is_declared(*hook) {
                ui::display_info(&format!("No {} script declared, skipping", hook));
                continue;
            }
        }

        if dry_run {
            ui::display_dry_run(&step.describe(release));
            continue;
        }

        tracing::debug!(?step, "running step");
        if let Err(e) = execute(*step, release, &mut state) {
            match step.failure_policy() {
                FailurePolicy::Warn => {
                    let hook = match step {
                        Step::Hook(hook) => hook.name().to_string(),
                        other => format!("{:?}", other),
                    };
                    let warning = ReleaseWarning::HookFailed {
                        hook,
                        message: e.to_string(),
                    };
                    ui::display_warning(&warning);
                    state.report.warnings.push(warning);
                }
                FailurePolicy::Abort => {
                    if !state.report.committed {
                        rollback(&state.snapshots);
                    } else if *step == Step::Push {
                        ui::display_status("Release committed and tagged locally");
                        ui::display_manual_push_instruction(
                            &release.remote,
                            &release.branch,
                            &release.tag,
                        );
                    }
                    return Err(e);
                }
            }
        }
    }

    Ok(state.report)
}

fn rollback(snapshots: &[FileSnapshot]) {
    if snapshots.is_empty() {
        return;
    }

    match manifest::restore_all(snapshots) {
        Ok(()) => ui::display_status("Rolled back uncommitted changes"),
        Err(e) => {
            tracing::error!(error = %e, "rollback failed");
            ui::display_error(&format!("Rollback failed: {}", e));
        }
    }
}

fn execute(step: Step, release: &ReleaseContext<'_>, state: &mut PipelineState) -> Result<()> {
    match step {
        Step::Hook(hook) => {
            release
                .runner
                .run(hook.name(), &release.hook_context(hook))?;
            ui::display_success(&format!("{} hook completed", hook));
        }
        Step::WriteManifest => {
            let snapshots = manifest::write_version(
                &release.manifest_path,
                release.lock_path.as_deref(),
                &release.version,
            )?;
            for snapshot in &snapshots {
                state.changed.push(snapshot.path.clone());
            }
            state.snapshots.extend(snapshots);
            ui::display_success(&format!("Version updated to {}", release.version));
        }
        Step::Changelog => {
            let Some(path) = release.changelog_path.as_deref() else {
                return Ok(());
            };

            let snapshot = FileSnapshot::capture(path)?;
            let update = changelog::update_changelog(path, &release.version, release.date, false)?;
            match &update {
                ChangelogUpdate::Updated { heading } => {
                    state.snapshots.push(snapshot);
                    state.changed.push(path.to_path_buf());
                    ui::display_success(&format!("{} updated: {}", file_name(path), heading));
                }
                ChangelogUpdate::NoUnreleasedSection => ui::display_info(&format!(
                    "{} has no [Unreleased] section, skipping",
                    file_name(path)
                )),
                ChangelogUpdate::MissingFile | ChangelogUpdate::WouldUpdate { .. } => {}
            }
            state.report.changelog = Some(update);
        }
        Step::Commit => {
            let paths: Vec<&Path> = state.changed.iter().map(PathBuf::as_path).collect();
            let oid = release.repo.commit_paths(&paths, &release.commit_message)?;
            state.report.committed = true;
            ui::display_success(&format!(
                "Committed {} ({})",
                release.commit_message,
                &oid[..oid.len().min(7)]
            ));
        }
        Step::Tag => {
            release
                .repo
                .create_annotated_tag(&release.tag, &release.tag_message)?;
            ui::display_success(&format!("Created tag {}", release.tag));
        }
        Step::Push => {
            release
                .repo
                .push(&release.remote, &release.branch, &release.tag)?;
            state.report.pushed = true;
            ui::display_success(&format!(
                "Pushed {} and {} to {}",
                release.branch, release.tag, release.remote
            ));
        }
    }

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read the lifecycle scripts a manifest declares
pub fn declared_hooks(manifest: &manifest::Manifest) -> Vec<HookType> {
    HookType::ALL
        .into_iter()
        .filter(|hook| manifest.has_script(hook.name()))
        .collect()
}
