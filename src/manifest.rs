//! `package.json` and `package-lock.json` handling
//!
//! Writes go through [`FileSnapshot`] so a failed release can put the files
//! back exactly as they were.

use crate::error::{BumpError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of a file captured before a write, restorable on abort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnapshot {
    pub path: PathBuf,
    /// None when the file did not exist before the write
    pub before: Option<String>,
}

impl FileSnapshot {
    pub fn capture(path: &Path) -> Result<Self> {
        let before = if path.exists() {
            Some(fs::read_to_string(path)?)
        } else {
            None
        };
        Ok(FileSnapshot {
            path: path.to_path_buf(),
            before,
        })
    }

    /// Put the file back to its captured state
    pub fn restore(&self) -> Result<()> {
        match &self.before {
            Some(contents) => fs::write(&self.path, contents)?,
            None => {
                if self.path.exists() {
                    fs::remove_file(&self.path)?;
                }
            }
        }
        Ok(())
    }
}

/// A parsed JSON manifest keeping key order and formatting hints
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    document: Map<String, Value>,
    indent: String,
    trailing_newline: bool,
}

impl Manifest {
    /// Load and parse a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            BumpError::manifest(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(path, &raw)
    }

    pub fn parse(path: &Path, raw: &str) -> Result<Self> {
        let document: Map<String, Value> = serde_json::from_str(raw).map_err(|e| {
            BumpError::manifest(format!("Cannot parse {}: {}", path.display(), e))
        })?;

        Ok(Manifest {
            path: path.to_path_buf(),
            document,
            indent: detect_indent(raw),
            trailing_newline: raw.ends_with('\n'),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.document.get("name").and_then(Value::as_str)
    }

    /// The `version` field, which must be a string
    pub fn version(&self) -> Result<&str> {
        self.document
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                BumpError::manifest(format!(
                    "No version field in {}",
                    self.path.display()
                ))
            })
    }

    /// A declared npm script, e.g. `preversion`
    pub fn script(&self, name: &str) -> Option<&str> {
        self.document
            .get("scripts")
            .and_then(Value::as_object)
            .and_then(|scripts| scripts.get(name))
            .and_then(Value::as_str)
    }

    pub fn has_script(&self, name: &str) -> bool {
        self.script(name).is_some()
    }

    /// Set the top-level version
    pub fn set_version(&mut self, version: &str) {
        self.document
            .insert("version".to_string(), Value::String(version.to_string()));
    }

    /// Set the lock-file mirror of the root package version, when present
    fn set_root_package_version(&mut self, version: &str) {
        let root = self
            .document
            .get_mut("packages")
            .and_then(Value::as_object_mut)
            .and_then(|packages| packages.get_mut(""))
            .and_then(Value::as_object_mut);

        if let Some(root) = root {
            if root.contains_key("version") {
                root.insert("version".to_string(), Value::String(version.to_string()));
            }
        }
    }

    /// Serialize with the original indentation and trailing newline
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(self.indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.document.serialize(&mut serializer)?;

        let mut rendered = String::from_utf8(buffer)
            .map_err(|e| BumpError::manifest(format!("Manifest is not UTF-8: {}", e)))?;
        if self.trailing_newline {
            rendered.push('\n');
        }
        Ok(rendered)
    }

    pub fn save(&self) -> Result<()> {
        fs::write(&self.path, self.render()?)?;
        Ok(())
    }
}

/// Write `version` into the manifest and, if it exists, the lock file
///
/// Returns snapshots of every file touched, in write order. If any write
/// fails the files already written are restored before the error returns.
pub fn write_version(
    manifest_path: &Path,
    lock_path: Option<&Path>,
    version: &str,
) -> Result<Vec<FileSnapshot>> {
    let mut snapshots = Vec::new();
    match write_each(manifest_path, lock_path, version, &mut snapshots) {
        Ok(()) => Ok(snapshots),
        Err(e) => {
            restore_all(&snapshots)?;
            Err(e)
        }
    }
}

fn write_each(
    manifest_path: &Path,
    lock_path: Option<&Path>,
    version: &str,
    snapshots: &mut Vec<FileSnapshot>,
) -> Result<()> {
    let mut manifest = Manifest::load(manifest_path)?;
    manifest.set_version(version);
    snapshots.push(FileSnapshot::capture(manifest_path)?);
    manifest.save()?;
    tracing::debug!(path = %manifest_path.display(), version, "manifest updated");

    if let Some(lock_path) = lock_path.filter(|p| p.exists()) {
        let mut lock = Manifest::load(lock_path)?;
        lock.set_version(version);
        lock.set_root_package_version(version);
        snapshots.push(FileSnapshot::capture(lock_path)?);
        lock.save()?;
        tracing::debug!(path = %lock_path.display(), version, "lock file updated");
    }

    Ok(())
}

/// Restore snapshots in reverse write order
pub fn restore_all(snapshots: &[FileSnapshot]) -> Result<()> {
    for snapshot in snapshots.iter().rev() {
        snapshot.restore()?;
        tracing::debug!(path = %snapshot.path.display(), "restored");
    }
    Ok(())
}

fn detect_indent(raw: &str) -> String {
    raw.lines()
        .skip(1)
        .find(|line| !line.trim().is_empty())
        .map(|line| {
            line.chars()
                .take_while(|c| *c == ' ' || *c == '\t')
                .collect::<String>()
        })
        .filter(|indent| !indent.is_empty())
        .unwrap_or_else(|| "  ".to_string())
}
