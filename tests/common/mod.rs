// Shared fixtures for integration tests
#![allow(dead_code)]

use bump_version::hooks::{HookContext, ScriptRunner};
use bump_version::BumpError;
use git2::{IndexAddOption, Repository, RepositoryInitOptions, Signature};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const PACKAGE_NO_SCRIPTS: &str = r#"{
  "name": "demo-app",
  "version": "1.0.0",
  "private": true
}
"#;

pub const PACKAGE_WITH_HOOKS: &str = r#"{
  "name": "demo-app",
  "version": "1.0.0",
  "scripts": {
    "preversion": "npm test",
    "version": "npm run build",
    "postversion": "echo done"
  }
}
"#;

pub const CHANGELOG: &str = "# Changelog

## [Unreleased]

### Fixed
- Crash on startup
";

/// A temporary project with a git repository on `main` and one commit
pub struct Project {
    pub dir: TempDir,
    pub repo: Repository,
}

impl Project {
    pub fn new(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        let mut options = RepositoryInitOptions::new();
        options.initial_head("main");
        let repo = Repository::init_opts(dir.path(), &options).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }

        let project = Project { dir, repo };
        for (name, content) in files {
            project.write(name, content);
        }
        project.commit_all("Initial commit");
        project
    }

    pub fn with_version(version: &str) -> Self {
        let package = PACKAGE_NO_SCRIPTS.replace("1.0.0", version);
        Project::new(&[("package.json", &package)])
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, content: &str) {
        fs::write(self.dir.path().join(name), content).unwrap();
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).unwrap()
    }

    pub fn commit_all(&self, message: &str) {
        let mut index = self.repo.index().unwrap();
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let signature = Signature::now("Test User", "test@example.com").unwrap();
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .unwrap();
    }

    pub fn checkout_new_branch(&self, name: &str) {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        self.repo.branch(name, &head, false).unwrap();
        self.repo.set_head(&format!("refs/heads/{}", name)).unwrap();
    }

    pub fn head_message(&self) -> String {
        let commit = self.repo.head().unwrap().peel_to_commit().unwrap();
        commit.message().unwrap_or("").to_string()
    }

    pub fn commit_count(&self) -> usize {
        let mut walk = self.repo.revwalk().unwrap();
        walk.push_head().unwrap();
        walk.count()
    }

    /// Message of an annotated tag, None when the tag does not exist
    pub fn tag_message(&self, name: &str) -> Option<String> {
        let reference = self
            .repo
            .find_reference(&format!("refs/tags/{}", name))
            .ok()?;
        let tag = reference.peel_to_tag().ok()?;
        tag.message().map(str::to_string)
    }
}

/// Records hook runs and fails the listed scripts
#[derive(Default)]
pub struct FakeRunner {
    pub failing: Vec<&'static str>,
    pub runs: RefCell<Vec<(String, String)>>,
}

impl FakeRunner {
    pub fn failing(scripts: &[&'static str]) -> Self {
        FakeRunner {
            failing: scripts.to_vec(),
            ..Default::default()
        }
    }

    /// Names of the scripts run so far
    pub fn scripts(&self) -> Vec<String> {
        self.runs.borrow().iter().map(|(s, _)| s.clone()).collect()
    }
}

impl ScriptRunner for FakeRunner {
    fn describe(&self, script: &str) -> String {
        format!("npm run {}", script)
    }

    fn run(&self, script: &str, context: &HookContext) -> bump_version::Result<()> {
        self.runs
            .borrow_mut()
            .push((script.to_string(), context.new_version.clone()));
        if self.failing.contains(&script) {
            return Err(BumpError::hook(script, "exited with code 1"));
        }
        Ok(())
    }
}
