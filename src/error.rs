use thiserror::Error;

/// Unified error type for bump-version operations
#[derive(Error, Debug)]
pub enum BumpError {
    #[error("Invalid version format: '{0}'")]
    InvalidVersionFormat(String),

    #[error("Unknown prerelease track: '{0}'")]
    UnknownTrack(String),

    #[error("Version component overflow: {0}")]
    ComponentOverflow(String),

    #[error("Working tree has uncommitted changes")]
    DirtyWorkingTree { changes: Vec<String> },

    #[error("Release cancelled by user")]
    UserCancelled,

    #[error("Hook '{hook}' failed: {message}")]
    HookFailure { hook: String, message: String },

    #[error("Command '{command}' failed: {message}")]
    Process { command: String, message: String },

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in bump-version
pub type Result<T> = std::result::Result<T, BumpError>;

impl BumpError {
    pub fn invalid_version(text: impl Into<String>) -> Self {
        BumpError::InvalidVersionFormat(text.into())
    }

    pub fn hook(hook: impl Into<String>, message: impl Into<String>) -> Self {
        BumpError::HookFailure {
            hook: hook.into(),
            message: message.into(),
        }
    }

    pub fn process(command: impl Into<String>, message: impl std::fmt::Display) -> Self {
        BumpError::Process {
            command: command.into(),
            message: message.to_string(),
        }
    }

    pub fn manifest(msg: impl Into<String>) -> Self {
        BumpError::Manifest(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        BumpError::Config(msg.into())
    }

    /// Whether the error should fail the process.
    ///
    /// A dirty working tree and a declined prompt halt the release but are
    /// ordinary outcomes, not failures.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            BumpError::DirtyWorkingTree { .. } | BumpError::UserCancelled
        )
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        if self.is_fatal() {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BumpError::config("tracks must not be empty");
        assert_eq!(
            err.to_string(),
            "Configuration error: tracks must not be empty"
        );
    }

    #[test]
    fn test_invalid_version_display() {
        let err = BumpError::invalid_version("not-a-version");
        assert_eq!(err.to_string(), "Invalid version format: 'not-a-version'");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BumpError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_hook_failure_names_hook() {
        let err = BumpError::hook("preversion", "exit code 1");
        assert_eq!(err.to_string(), "Hook 'preversion' failed: exit code 1");
    }

    #[test]
    fn test_non_fatal_errors_exit_zero() {
        assert_eq!(BumpError::UserCancelled.exit_code(), 0);
        assert_eq!(
            BumpError::DirtyWorkingTree {
                changes: vec!["?? notes.txt".to_string()]
            }
            .exit_code(),
            0
        );
    }

    #[test]
    fn test_fatal_errors_exit_one() {
        let errors = vec![
            BumpError::invalid_version("x"),
            BumpError::UnknownTrack("nightly".to_string()),
            BumpError::hook("version", "boom"),
            BumpError::process("git commit", "index locked"),
            BumpError::manifest("missing version"),
        ];

        for err in errors {
            assert_eq!(err.exit_code(), 1, "{} should be fatal", err);
        }
    }
}
