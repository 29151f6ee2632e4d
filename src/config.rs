use crate::domain::prerelease::default_tracks;
use crate::domain::{PrereleaseTrack, Template, TrackOrder};
use crate::error::{BumpError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the project directory
pub const CONFIG_FILE_NAME: &str = "bumpversion.toml";

/// Represents the complete configuration for bump-version.
///
/// Contains manifest locations, git settings, hook runner, changelog and prerelease track options.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub manifest: ManifestConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub hooks: HooksConfig,

    #[serde(default)]
    pub changelog: ChangelogConfig,

    #[serde(default)]
    pub prerelease: PrereleaseConfig,
}

fn default_manifest_path() -> String {
    "package.json".to_string()
}

fn default_lock_file() -> Option<String> {
    Some("package-lock.json".to_string())
}

/// Location of the manifest and its lock-file mirror, relative to the project directory.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ManifestConfig {
    #[serde(default = "default_manifest_path")]
    pub path: String,

    #[serde(default = "default_lock_file")]
    pub lock_file: Option<String>,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        ManifestConfig {
            path: default_manifest_path(),
            lock_file: default_lock_file(),
        }
    }
}

fn default_release_branch() -> String {
    "main".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_commit_message() -> String {
    "chore: release {version}".to_string()
}

fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

fn default_tag_message() -> String {
    "Release {version}".to_string()
}

fn default_true() -> bool {
    true
}

/// Git settings for the commit, tag and push steps.
///
/// `commit_message`, `tag_pattern` and `tag_message` are templates containing `{version}`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_release_branch")]
    pub release_branch: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,

    #[serde(default = "default_tag_message")]
    pub tag_message: String,

    #[serde(default = "default_true")]
    pub push: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            release_branch: default_release_branch(),
            remote: default_remote(),
            commit_message: default_commit_message(),
            tag_pattern: default_tag_pattern(),
            tag_message: default_tag_message(),
            push: true,
        }
    }
}

fn default_runner() -> String {
    "npm".to_string()
}

/// Program used to run lifecycle scripts (`<runner> run <script>`).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HooksConfig {
    #[serde(default = "default_runner")]
    pub runner: String,
}

impl Default for HooksConfig {
    fn default() -> Self {
        HooksConfig {
            runner: default_runner(),
        }
    }
}

fn default_changelog_path() -> String {
    "CHANGELOG.md".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangelogConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_changelog_path")]
    pub path: String,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            enabled: true,
            path: default_changelog_path(),
        }
    }
}

/// Ordered prerelease tracks, lowest maturity first.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PrereleaseConfig {
    #[serde(default = "default_tracks")]
    pub tracks: Vec<PrereleaseTrack>,
}

impl Default for PrereleaseConfig {
    fn default() -> Self {
        PrereleaseConfig {
            tracks: default_tracks(),
        }
    }
}

impl Config {
    /// Validated track ordering built from `[[prerelease.tracks]]`
    pub fn track_order(&self) -> Result<TrackOrder> {
        TrackOrder::new(self.prerelease.tracks.clone())
    }

    pub fn tag_template(&self) -> Result<Template> {
        Template::new(self.git.tag_pattern.clone())
    }

    pub fn commit_template(&self) -> Result<Template> {
        Template::new(self.git.commit_message.clone())
    }

    pub fn tag_message_template(&self) -> Result<Template> {
        Template::new(self.git.tag_message.clone())
    }

    pub fn manifest_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.manifest.path)
    }

    pub fn lock_file_path(&self, project_dir: &Path) -> Option<PathBuf> {
        self.manifest
            .lock_file
            .as_ref()
            .map(|lock| project_dir.join(lock))
    }

    pub fn changelog_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.changelog.path)
    }

    /// Check every setting that can be checked without touching the project
    pub fn validate(&self) -> Result<()> {
        self.track_order()?;
        self.tag_template()?;

        self.commit_template()?;
        self.tag_message_template()?;

        if self.git.remote.trim().is_empty() {
            return Err(BumpError::config("git.remote must not be empty"));
        }
        if self.hooks.runner.trim().is_empty() {
            return Err(BumpError::config("hooks.runner must not be empty"));
        }

        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `bumpversion.toml` in the project directory
/// 3. `~/.config/.bumpversion.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded and validated configuration
/// * `Err(BumpError::Config)` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>, project_dir: &Path) -> Result<Config> {
    let candidate = if let Some(path) = config_path {
        Some(PathBuf::from(path))
    } else if project_dir.join(CONFIG_FILE_NAME).exists() {
        Some(project_dir.join(CONFIG_FILE_NAME))
    } else {
        dirs::config_dir()
            .map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
            .filter(|path| path.exists())
    };

    let config = match candidate {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            let config_str = fs::read_to_string(&path).map_err(|e| {
                BumpError::config(format!("Cannot read {}: {}", path.display(), e))
            })?;
            parse_config(&config_str)?
        }
        None => {
            tracing::debug!("no configuration file found, using defaults");
            Config::default()
        }
    };

    config.validate()?;
    Ok(config)
}

pub fn parse_config(config_str: &str) -> Result<Config> {
    toml::from_str(config_str).map_err(|e| BumpError::config(e.to_string()))
}
