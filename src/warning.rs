use std::fmt;

/// Non-fatal issues raised during a release.
/// These are reported to the user and collected in the release outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseWarning {
    /// Releasing from a branch other than the configured release branch
    NotOnReleaseBranch { current: String, expected: String },
    /// Moving to an earlier prerelease track
    PrereleaseDowngrade { from: String, to: String },
    /// A hook with the Warn policy failed after the release was committed
    HookFailed { hook: String, message: String },
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::NotOnReleaseBranch { current, expected } => {
                write!(
                    f,
                    "You are not on the '{}' branch (current: {})",
                    expected, current
                )
            }
            ReleaseWarning::PrereleaseDowngrade { from, to } => {
                write!(
                    f,
                    "Downgrading prerelease track from '{}' to '{}'",
                    from, to
                )
            }
            ReleaseWarning::HookFailed { hook, message } => {
                write!(
                    f,
                    "Hook '{}' failed, the release is already committed: {}",
                    hook, message
                )
            }
        }
    }
}
