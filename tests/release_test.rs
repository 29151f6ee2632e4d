// tests/release_test.rs
mod common;

use bump_version::cli::{run_release, ReleaseArgs, ReleaseOutcome};
use bump_version::config::Config;
use bump_version::git::Git2Repository;
use bump_version::ui::ScriptedPrompt;
use bump_version::warning::ReleaseWarning;
use bump_version::{BumpError, Result};
use chrono::NaiveDate;
use common::{FakeRunner, Project, CHANGELOG, PACKAGE_NO_SCRIPTS, PACKAGE_WITH_HOOKS};

fn release_args(project: &Project) -> ReleaseArgs {
    ReleaseArgs {
        project_dir: project.path().to_path_buf(),
        dry_run: false,
        push: false,
        date: NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
    }
}

fn release(
    project: &Project,
    args: &ReleaseArgs,
    runner: &FakeRunner,
    answers: &str,
) -> Result<ReleaseOutcome> {
    let repo = Git2Repository::open(project.path())?;
    let mut prompt = ScriptedPrompt::from_json(answers)?;
    run_release(args, &Config::default(), &repo, runner, &mut prompt)
}

#[test]
fn test_production_minor_release() {
    let project = Project::new(&[("package.json", PACKAGE_NO_SCRIPTS)]);
    let runner = FakeRunner::default();

    let outcome = release(
        &project,
        &release_args(&project),
        &runner,
        r#"{"releaseTypeChoice": "production", "selectedVersionBump": "minor"}"#,
    )
    .unwrap();

    assert_eq!(outcome.previous, "1.0.0");
    assert_eq!(outcome.version, "1.1.0");
    assert_eq!(outcome.tag, "v1.1.0");
    assert!(!outcome.pushed);
    assert!(outcome.warnings.is_empty());

    assert!(project.read("package.json").contains("\"version\": \"1.1.0\""));
    assert_eq!(project.head_message(), "chore: release 1.1.0");
    assert_eq!(project.commit_count(), 2);
    assert_eq!(
        project.tag_message("v1.1.0").unwrap().trim(),
        "Release 1.1.0"
    );
}

#[test]
fn test_release_keeps_manifest_formatting() {
    let project = Project::new(&[("package.json", PACKAGE_NO_SCRIPTS)]);

    release(
        &project,
        &release_args(&project),
        &FakeRunner::default(),
        r#"{"releaseTypeChoice": "production"}"#,
    )
    .unwrap();

    assert_eq!(
        project.read("package.json"),
        PACKAGE_NO_SCRIPTS.replace("1.0.0", "1.0.1")
    );
}

#[test]
fn test_prerelease_from_production_updates_lock_file() {
    let lock = r#"{
  "name": "demo-app",
  "version": "1.0.0",
  "lockfileVersion": 3,
  "packages": {
    "": {
      "name": "demo-app",
      "version": "1.0.0"
    }
  }
}
"#;
    let project = Project::new(&[
        ("package.json", PACKAGE_NO_SCRIPTS),
        ("package-lock.json", lock),
    ]);

    let outcome = release(
        &project,
        &release_args(&project),
        &FakeRunner::default(),
        r#"{"releaseTypeChoice": "dev", "selectedVersionBump": "patch"}"#,
    )
    .unwrap();

    assert_eq!(outcome.version, "1.0.1-dev.0");
    let lock_after: serde_json::Value =
        serde_json::from_str(&project.read("package-lock.json")).unwrap();
    assert_eq!(lock_after["version"], "1.0.1-dev.0");
    assert_eq!(lock_after["packages"][""]["version"], "1.0.1-dev.0");

    // Both files are part of the release commit
    let repo = Git2Repository::open(project.path()).unwrap();
    assert!(bump_version::git::Repository::uncommitted_changes(&repo)
        .unwrap()
        .is_empty());
}

#[test]
fn test_prerelease_iteration_and_promotion() {
    let project = Project::with_version("1.0.0-rc.9");
    let args = release_args(&project);

    let outcome = release(
        &project,
        &args,
        &FakeRunner::default(),
        r#"{"releaseTypeChoice": "rc"}"#,
    )
    .unwrap();
    assert_eq!(outcome.version, "1.0.0-rc.10");

    let outcome = release(
        &project,
        &args,
        &FakeRunner::default(),
        r#"{"releaseTypeChoice": "production"}"#,
    )
    .unwrap();
    assert_eq!(outcome.version, "1.0.0");
    assert!(project.tag_message("v1.0.0-rc.10").is_some());
    assert!(project.tag_message("v1.0.0").is_some());
}

#[test]
fn test_downgrade_emits_warning() {
    let project = Project::with_version("1.0.0-rc.1");

    let outcome = release(
        &project,
        &release_args(&project),
        &FakeRunner::default(),
        r#"{"releaseTypeChoice": "alpha"}"#,
    )
    .unwrap();

    assert_eq!(outcome.version, "1.0.0-alpha.0");
    assert_eq!(
        outcome.warnings,
        vec![ReleaseWarning::PrereleaseDowngrade {
            from: "rc".to_string(),
            to: "alpha".to_string(),
        }]
    );
}

#[test]
fn test_custom_version() {
    let project = Project::new(&[("package.json", PACKAGE_NO_SCRIPTS)]);

    let outcome = release(
        &project,
        &release_args(&project),
        &FakeRunner::default(),
        r#"{"releaseTypeChoice": "custom", "customVersion": "2.0.0-beta.1+exp.sha.5114f85"}"#,
    )
    .unwrap();

    assert_eq!(outcome.version, "2.0.0-beta.1+exp.sha.5114f85");
    assert_eq!(outcome.tag, "v2.0.0-beta.1+exp.sha.5114f85");
}

#[test]
fn test_invalid_custom_version_changes_nothing() {
    let project = Project::new(&[("package.json", PACKAGE_NO_SCRIPTS)]);

    let result = release(
        &project,
        &release_args(&project),
        &FakeRunner::default(),
        r#"{"releaseTypeChoice": "custom", "customVersion": "v2.0"}"#,
    );

    assert!(matches!(result, Err(BumpError::InvalidVersionFormat(_))));
    assert_eq!(project.read("package.json"), PACKAGE_NO_SCRIPTS);
    assert_eq!(project.commit_count(), 1);
}

#[test]
fn test_hooks_run_in_order_with_new_version() {
    let project = Project::new(&[("package.json", PACKAGE_WITH_HOOKS)]);
    let runner = FakeRunner::default();

    release(
        &project,
        &release_args(&project),
        &runner,
        r#"{"releaseTypeChoice": "production", "selectedVersionBump": "major"}"#,
    )
    .unwrap();

    assert_eq!(
        *runner.runs.borrow(),
        vec![
            ("preversion".to_string(), "2.0.0".to_string()),
            ("version".to_string(), "2.0.0".to_string()),
            ("postversion".to_string(), "2.0.0".to_string()),
        ]
    );
}

#[test]
fn test_preversion_failure_changes_nothing() {
    let project = Project::new(&[("package.json", PACKAGE_WITH_HOOKS)]);
    let runner = FakeRunner::failing(&["preversion"]);

    let result = release(
        &project,
        &release_args(&project),
        &runner,
        r#"{"releaseTypeChoice": "production"}"#,
    );

    assert!(matches!(result, Err(BumpError::HookFailure { ref hook, .. }) if hook == "preversion"));
    assert_eq!(runner.scripts(), vec!["preversion"]);
    assert_eq!(project.read("package.json"), PACKAGE_WITH_HOOKS);
    assert_eq!(project.commit_count(), 1);
}

#[test]
fn test_version_hook_failure_rolls_back_manifest_and_changelog() {
    let project = Project::new(&[
        ("package.json", PACKAGE_WITH_HOOKS),
        ("CHANGELOG.md", CHANGELOG),
    ]);
    let runner = FakeRunner::failing(&["version"]);

    let result = release(
        &project,
        &release_args(&project),
        &runner,
        r#"{"releaseTypeChoice": "production"}"#,
    );

    assert!(result.is_err());
    assert_eq!(project.read("package.json"), PACKAGE_WITH_HOOKS);
    assert_eq!(project.read("CHANGELOG.md"), CHANGELOG);
    assert_eq!(project.commit_count(), 1);
    assert!(project.tag_message("v1.0.1").is_none());
}

#[test]
fn test_postversion_failure_is_only_a_warning() {
    let project = Project::new(&[("package.json", PACKAGE_WITH_HOOKS)]);
    let runner = FakeRunner::failing(&["postversion"]);

    let outcome = release(
        &project,
        &release_args(&project),
        &runner,
        r#"{"releaseTypeChoice": "production"}"#,
    )
    .unwrap();

    assert_eq!(outcome.version, "1.0.1");
    assert!(matches!(
        outcome.warnings.as_slice(),
        [ReleaseWarning::HookFailed { hook, .. }] if hook == "postversion"
    ));
    assert_eq!(project.head_message(), "chore: release 1.0.1");
    assert!(project.tag_message("v1.0.1").is_some());
}

#[test]
fn test_changelog_is_committed_with_release() {
    let project = Project::new(&[
        ("package.json", PACKAGE_NO_SCRIPTS),
        ("CHANGELOG.md", CHANGELOG),
    ]);

    release(
        &project,
        &release_args(&project),
        &FakeRunner::default(),
        r#"{"releaseTypeChoice": "production"}"#,
    )
    .unwrap();

    let changelog = project.read("CHANGELOG.md");
    assert!(changelog.contains("## [Unreleased]\n\n## [1.0.1] - 2024-07-15\n\n### Fixed"));

    let repo = Git2Repository::open(project.path()).unwrap();
    assert!(bump_version::git::Repository::uncommitted_changes(&repo)
        .unwrap()
        .is_empty());
}

#[test]
fn test_dry_run_mutates_nothing() {
    let project = Project::new(&[
        ("package.json", PACKAGE_WITH_HOOKS),
        ("CHANGELOG.md", CHANGELOG),
    ]);
    let runner = FakeRunner::default();
    let mut args = release_args(&project);
    args.dry_run = true;

    let outcome = release(
        &project,
        &args,
        &runner,
        r#"{"releaseTypeChoice": "beta"}"#,
    )
    .unwrap();

    assert!(outcome.dry_run);
    assert_eq!(outcome.version, "1.0.1-beta.0");
    assert!(runner.scripts().is_empty());
    assert_eq!(project.read("package.json"), PACKAGE_WITH_HOOKS);
    assert_eq!(project.read("CHANGELOG.md"), CHANGELOG);
    assert_eq!(project.commit_count(), 1);
    assert!(project.tag_message("v1.0.1-beta.0").is_none());
}

#[test]
fn test_dirty_tree_halts_before_prompts() {
    let project = Project::new(&[("package.json", PACKAGE_NO_SCRIPTS)]);
    project.write("notes.txt", "wip");

    let result = release(
        &project,
        &release_args(&project),
        &FakeRunner::default(),
        r#"{"releaseTypeChoice": "production"}"#,
    );

    match result {
        Err(err @ BumpError::DirtyWorkingTree { .. }) => {
            assert_eq!(err.exit_code(), 0);
            if let BumpError::DirtyWorkingTree { changes } = err {
                assert_eq!(changes, vec!["?? notes.txt".to_string()]);
            }
        }
        other => panic!("expected dirty tree, got {:?}", other),
    }
    assert_eq!(project.read("package.json"), PACKAGE_NO_SCRIPTS);
}

#[test]
fn test_declining_confirmation_cancels() {
    let project = Project::new(&[("package.json", PACKAGE_NO_SCRIPTS)]);

    let result = release(
        &project,
        &release_args(&project),
        &FakeRunner::default(),
        r#"{"releaseTypeChoice": "production", "confirm": false}"#,
    );

    assert!(matches!(result, Err(BumpError::UserCancelled)));
    assert_eq!(project.read("package.json"), PACKAGE_NO_SCRIPTS);
    assert_eq!(project.commit_count(), 1);
}

#[test]
fn test_non_release_branch_requires_proceed() {
    let project = Project::new(&[("package.json", PACKAGE_NO_SCRIPTS)]);
    project.checkout_new_branch("feature/login");
    let args = release_args(&project);

    // proceed defaults to no
    let result = release(
        &project,
        &args,
        &FakeRunner::default(),
        r#"{"releaseTypeChoice": "production"}"#,
    );
    assert!(matches!(result, Err(BumpError::UserCancelled)));

    let outcome = release(
        &project,
        &args,
        &FakeRunner::default(),
        r#"{"proceed": true, "releaseTypeChoice": "production"}"#,
    )
    .unwrap();
    assert_eq!(outcome.version, "1.0.1");
    assert_eq!(
        outcome.warnings,
        vec![ReleaseWarning::NotOnReleaseBranch {
            current: "feature/login".to_string(),
            expected: "main".to_string(),
        }]
    );
}

#[test]
fn test_existing_tag_is_refused() {
    let project = Project::new(&[("package.json", PACKAGE_NO_SCRIPTS)]);
    let head = project.repo.head().unwrap().peel_to_commit().unwrap();
    project
        .repo
        .tag_lightweight("v1.0.1", head.as_object(), false)
        .unwrap();

    let result = release(
        &project,
        &release_args(&project),
        &FakeRunner::default(),
        r#"{"releaseTypeChoice": "production"}"#,
    );

    assert!(matches!(result, Err(BumpError::Process { .. })));
    assert_eq!(project.read("package.json"), PACKAGE_NO_SCRIPTS);
}

#[test]
fn test_invalid_manifest_version() {
    let project = Project::with_version("one.two");

    let result = release(
        &project,
        &release_args(&project),
        &FakeRunner::default(),
        r#"{"releaseTypeChoice": "production"}"#,
    );

    assert!(matches!(result, Err(BumpError::InvalidVersionFormat(_))));
}

#[test]
fn test_push_failure_after_commit_keeps_release() {
    let project = Project::new(&[("package.json", PACKAGE_NO_SCRIPTS)]);
    let mut args = release_args(&project);
    args.push = true;

    // No remote configured, so the push step fails
    let result = release(
        &project,
        &args,
        &FakeRunner::default(),
        r#"{"releaseTypeChoice": "production"}"#,
    );

    assert!(matches!(result, Err(BumpError::Process { .. })));
    assert_eq!(project.head_message(), "chore: release 1.0.1");
    assert!(project.tag_message("v1.0.1").is_some());
    assert!(project.read("package.json").contains("1.0.1"));
}

#[test]
fn test_unchanged_custom_version_is_refused() {
    let project = Project::new(&[("package.json", PACKAGE_NO_SCRIPTS)]);

    let result = release(
        &project,
        &release_args(&project),
        &FakeRunner::default(),
        r#"{"releaseTypeChoice": "custom", "customVersion": "1.0.0"}"#,
    );

    let err = result.unwrap_err();
    assert!(matches!(err, BumpError::Process { ref command, .. } if command == "npm version"));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(project.read("package.json"), PACKAGE_NO_SCRIPTS);
    assert_eq!(project.commit_count(), 1);
    assert!(project.tag_message("v1.0.0").is_none());
}
