use crate::error::{BumpError, Result};
use git2::{Repository as Git2Repo, Status, StatusOptions};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| BumpError::process("git", "Repository has no working directory"))
    }

    /// Resolve `path` to a path relative to the working directory
    fn relative_path(&self, path: &Path) -> Result<PathBuf> {
        if path.is_relative() {
            return Ok(path.to_path_buf());
        }

        let workdir = self.workdir()?;
        let workdir = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        path.strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                BumpError::process(
                    "git add",
                    format!("{} is outside the repository", path.display()),
                )
            })
    }
}

fn status_code(status: Status) -> &'static str {
    if status.is_wt_new() {
        "??"
    } else if status.is_index_new() {
        "A "
    } else if status.is_index_deleted() || status.is_wt_deleted() {
        " D"
    } else if status.is_wt_renamed() || status.is_index_renamed() {
        " R"
    } else if status.is_conflicted() {
        "UU"
    } else {
        " M"
    }
}

impl super::Repository for Git2Repository {
    fn current_branch(&self) -> Result<String> {
        let head = match self.repo.head() {
            Ok(head) => head,
            // Unborn branch: HEAD names a branch with no commits yet.
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                let head_ref = self.repo.find_reference("HEAD")?;
                let target = head_ref.symbolic_target().unwrap_or("HEAD");
                return Ok(target.trim_start_matches("refs/heads/").to_string());
            }
            Err(e) => return Err(e.into()),
        };

        if !head.is_branch() {
            return Ok("HEAD".to_string());
        }

        Ok(head.shorthand().unwrap_or("HEAD").to_string())
    }

    fn uncommitted_changes(&self) -> Result<Vec<String>> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;

        Ok(statuses
            .iter()
            .filter(|entry| entry.status() != Status::CURRENT)
            .map(|entry| {
                format!(
                    "{} {}",
                    status_code(entry.status()),
                    entry.path().unwrap_or("(non-utf8 path)")
                )
            })
            .collect())
    }

    fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<String> {
        let mut index = self.repo.index()?;
        for path in paths {
            let relative = self.relative_path(path)?;
            index
                .add_path(&relative)
                .map_err(|e| BumpError::process(format!("git add {}", relative.display()), e))?;
        }
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self
            .repo
            .signature()
            .map_err(|e| BumpError::process("git commit", e))?;

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .map_err(|e| BumpError::process("git commit", e))?;

        tracing::debug!(%oid, message, "created commit");
        Ok(oid.to_string())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        let command = format!("git tag -a {}", name);
        let head = self
            .repo
            .head()
            .and_then(|h| h.peel(git2::ObjectType::Commit))
            .map_err(|e| BumpError::process(&command, e))?;
        let signature = self
            .repo
            .signature()
            .map_err(|e| BumpError::process(&command, e))?;

        self.repo
            .tag(name, &head, &signature, message, false)
            .map_err(|e| BumpError::process(&command, e))?;

        tracing::debug!(tag = name, "created annotated tag");
        Ok(())
    }

    fn push(&self, remote_name: &str, branch: &str, tag: &str) -> Result<()> {
        let command = format!("git push {} {} {}", remote_name, branch, tag);
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|e| BumpError::process(&command, format!("Cannot find remote: {}", e)))?;

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");

            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }

                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }
            }

            git2::Cred::default()
        });

        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "Remote rejected {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let branch_ref = format!("refs/heads/{0}:refs/heads/{0}", branch);
        let tag_ref = format!("refs/tags/{0}:refs/tags/{0}", tag);

        remote
            .push(&[branch_ref.as_str(), tag_ref.as_str()], Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    BumpError::process(&command, format!("Network error: {}", e))
                } else {
                    BumpError::process(&command, e)
                }
            })?;

        tracing::debug!(remote = remote_name, branch, tag, "pushed");
        Ok(())
    }
}
