use crate::error::{BumpError, Result};
use crate::git::Repository;
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A mutating call recorded by [MockRepository]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Commit { paths: Vec<PathBuf>, message: String },
    Tag { name: String, message: String },
    Push { remote: String, branch: String, tag: String },
}

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    branch: String,
    changes: Vec<String>,
    tags: RefCell<HashSet<String>>,
    calls: RefCell<Vec<GitCall>>,
    fail_commit: bool,
    fail_tag: bool,
    fail_push: bool,
}

impl MockRepository {
    /// Create a clean mock repository on `main`
    pub fn new() -> Self {
        MockRepository {
            branch: "main".to_string(),
            changes: Vec::new(),
            tags: RefCell::new(HashSet::new()),
            calls: RefCell::new(Vec::new()),
            fail_commit: false,
            fail_tag: false,
            fail_push: false,
        }
    }

    pub fn on_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Report these lines as uncommitted changes
    pub fn with_changes(mut self, changes: &[&str]) -> Self {
        self.changes = changes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_tag(self, name: impl Into<String>) -> Self {
        self.tags.borrow_mut().insert(name.into());
        self
    }

    pub fn failing_commit(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    pub fn failing_tag(mut self) -> Self {
        self.fail_tag = true;
        self
    }

    pub fn failing_push(mut self) -> Self {
        self.fail_push = true;
        self
    }

    /// Mutating calls made so far, in order
    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.borrow().clone()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn uncommitted_changes(&self) -> Result<Vec<String>> {
        Ok(self.changes.clone())
    }

    fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<String> {
        if self.fail_commit {
            return Err(BumpError::process("git commit", "mock commit failure"));
        }

        self.calls.borrow_mut().push(GitCall::Commit {
            paths: paths.iter().map(|p| p.to_path_buf()).collect(),
            message: message.to_string(),
        });
        Ok(format!("{:040x}", self.calls.borrow().len()))
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.tags.borrow().contains(name))
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        if self.fail_tag {
            return Err(BumpError::process(
                format!("git tag -a {}", name),
                "mock tag failure",
            ));
        }

        self.tags.borrow_mut().insert(name.to_string());
        self.calls.borrow_mut().push(GitCall::Tag {
            name: name.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str, tag: &str) -> Result<()> {
        if self.fail_push {
            return Err(BumpError::process(
                format!("git push {} {} {}", remote, branch, tag),
                "mock push failure",
            ));
        }

        self.calls.borrow_mut().push(GitCall::Push {
            remote: remote.to_string(),
            branch: branch.to_string(),
            tag: tag.to_string(),
        });
        Ok(())
    }
}
