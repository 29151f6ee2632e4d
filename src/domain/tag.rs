use crate::domain::version::SemanticVersion;
use crate::error::{BumpError, Result};

const PLACEHOLDER: &str = "{version}";

/// Naming template with a `{version}` placeholder
///
/// Used for tag names (`v{version}`) and for commit and tag messages
/// (`chore: release {version}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub pattern: String,
}

impl Template {
    /// Create a template, requiring the `{version}` placeholder
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if !pattern.contains(PLACEHOLDER) {
            return Err(BumpError::config(format!(
                "Template '{}' must contain {} placeholder",
                pattern, PLACEHOLDER
            )));
        }
        Ok(Template { pattern })
    }

    /// Example: pattern="v{version}", version=1.2.3 -> "v1.2.3"
    pub fn render(&self, version: &SemanticVersion) -> String {
        self.pattern.replace(PLACEHOLDER, &version.to_string())
    }
}

/// Tag names must be valid git ref components
pub fn validate_tag_name(tag: &str) -> Result<()> {
    let invalid = tag.is_empty()
        || tag.starts_with('-')
        || tag.starts_with('.')
        || tag.ends_with('.')
        || tag.ends_with(".lock")
        || tag.contains("..")
        || tag.contains("@{")
        || tag
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || "~^:?*[\\".contains(c));

    if invalid {
        return Err(BumpError::config(format!("Invalid tag name '{}'", tag)));
    }
    Ok(())
}
