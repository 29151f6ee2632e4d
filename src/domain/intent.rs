use std::fmt;

/// What kind of release the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseIntent {
    /// A stable release
    Production,
    /// A prerelease on the named track
    Prerelease(String),
    /// An explicit version typed by the user, taken verbatim
    Custom(String),
}

impl ReleaseIntent {
    pub fn prerelease(track: impl Into<String>) -> Self {
        ReleaseIntent::Prerelease(track.into())
    }

    pub fn custom(literal: impl Into<String>) -> Self {
        ReleaseIntent::Custom(literal.into())
    }
}

impl fmt::Display for ReleaseIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseIntent::Production => write!(f, "production"),
            ReleaseIntent::Prerelease(track) => write!(f, "{}", track),
            ReleaseIntent::Custom(literal) => write!(f, "custom ({})", literal),
        }
    }
}
