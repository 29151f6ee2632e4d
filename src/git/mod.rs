//! Git operations abstraction layer
//!
//! The release flow depends on the [Repository] trait rather than on git2
//! directly so it can be exercised against [mock::MockRepository].
//!
//! - [repository::Git2Repository]: real implementation using the `git2` crate
//! - [mock::MockRepository]: records calls, for tests

pub mod mock;
pub mod repository;

pub use mock::{GitCall, MockRepository};
pub use repository::Git2Repository;

use crate::error::Result;
use std::path::Path;

/// Git operations needed to cut a release
///
/// All methods return [crate::error::Result<T>]. Mutating operations map
/// their failures to [crate::error::BumpError::Process] naming the git
/// command they stand for.
pub trait Repository {
    /// Name of the checked-out branch, or `HEAD` when detached
    fn current_branch(&self) -> Result<String>;

    /// Porcelain-style lines for every modified, staged or untracked path
    ///
    /// An empty list means the working tree is clean.
    fn uncommitted_changes(&self) -> Result<Vec<String>>;

    /// Stage `paths` and commit them on the current branch
    ///
    /// Paths may be absolute or relative to the working directory. Returns
    /// the new commit id.
    fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<String>;

    /// Whether a tag with this name exists
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Create an annotated tag on HEAD
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Push the branch and the tag to `remote`
    fn push(&self, remote: &str, branch: &str, tag: &str) -> Result<()>;
}
