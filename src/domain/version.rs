//! Semantic version model
//!
//! Grammar validation is delegated to the `semver` crate; the parsed value is
//! then split into the `tag.counter` shape the release tracks work with.

use crate::error::{BumpError, Result};
use std::fmt;
use std::str::FromStr;

/// Non-negative decimal counter of unbounded size
///
/// Stored as its canonical digit string so incrementing never overflows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Counter(String);

impl Counter {
    pub fn zero() -> Self {
        Counter("0".to_string())
    }

    /// Parse a numeric identifier (digits only, no leading zeros)
    pub fn parse(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if digits.len() > 1 && digits.starts_with('0') {
            return None;
        }
        Some(Counter(digits.to_string()))
    }

    /// Return the counter plus one
    pub fn increment(&self) -> Self {
        let mut digits = self.0.clone().into_bytes();
        let mut carry = true;

        for digit in digits.iter_mut().rev() {
            if !carry {
                break;
            }
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
            }
        }

        if carry {
            digits.insert(0, b'1');
        }

        // Only ASCII digits are ever written above.
        Counter(String::from_utf8_lossy(&digits).into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for Counter {
    fn from(value: u64) -> Self {
        Counter(value.to_string())
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Prerelease suffix, e.g. `alpha.3`
///
/// `tag` holds every identifier before a trailing numeric counter. A
/// prerelease without that shape (`alpha`, `x.y`) is kept whole in `tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prerelease {
    pub tag: String,
    pub counter: Option<Counter>,
}

impl Prerelease {
    pub fn new(tag: impl Into<String>, counter: Option<Counter>) -> Self {
        Prerelease {
            tag: tag.into(),
            counter,
        }
    }

    /// First iteration on a track: `<tag>.0`
    pub fn start(tag: impl Into<String>) -> Self {
        Prerelease::new(tag, Some(Counter::zero()))
    }

    fn from_identifiers(text: &str) -> Self {
        if let Some((tag, last)) = text.rsplit_once('.') {
            if let Some(counter) = Counter::parse(last) {
                return Prerelease::new(tag, Some(counter));
            }
        }
        Prerelease::new(text, None)
    }
}

impl fmt::Display for Prerelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        if let Some(counter) = &self.counter {
            write!(f, ".{}", counter)?;
        }
        Ok(())
    }
}

/// Semantic version representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<Prerelease>,
    pub build: Option<String>,
}

impl SemanticVersion {
    /// Create a production version with no prerelease or build metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            prerelease: None,
            build: None,
        }
    }

    /// Parse `MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]`
    pub fn parse(text: &str) -> Result<Self> {
        let parsed =
            semver::Version::parse(text).map_err(|_| BumpError::invalid_version(text))?;

        let prerelease = if parsed.pre.is_empty() {
            None
        } else {
            Some(Prerelease::from_identifiers(parsed.pre.as_str()))
        };

        let build = if parsed.build.is_empty() {
            None
        } else {
            Some(parsed.build.as_str().to_string())
        };

        Ok(SemanticVersion {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            prerelease,
            build,
        })
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// The `MAJOR.MINOR.PATCH` part alone
    pub fn core(&self) -> Self {
        SemanticVersion::new(self.major, self.minor, self.patch)
    }

    pub fn with_prerelease(mut self, prerelease: Prerelease) -> Self {
        self.prerelease = Some(prerelease);
        self
    }

    /// Bump the core version according to bump type
    ///
    /// Lower components reset to 0; prerelease and build metadata are dropped.
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let increment = |value: u64, name: &str| {
            value
                .checked_add(1)
                .ok_or_else(|| BumpError::ComponentOverflow(format!("{} {}", name, value)))
        };

        let next = match bump_type {
            VersionBump::Major => SemanticVersion::new(increment(self.major, "major")?, 0, 0),
            VersionBump::Minor => {
                SemanticVersion::new(self.major, increment(self.minor, "minor")?, 0)
            }
            VersionBump::Patch => {
                SemanticVersion::new(self.major, self.minor, increment(self.patch, "patch")?)
            }
        };

        Ok(next)
    }
}

impl FromStr for SemanticVersion {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionBump {
    Major,
    Minor,
    #[default]
    Patch,
}

impl VersionBump {
    pub fn name(&self) -> &'static str {
        match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Patch => "patch",
        }
    }
}

impl FromStr for VersionBump {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "major" => Ok(VersionBump::Major),
            "minor" => Ok(VersionBump::Minor),
            "patch" => Ok(VersionBump::Patch),
            other => Err(BumpError::config(format!(
                "Invalid version bump '{}': expected major, minor or patch",
                other
            ))),
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
