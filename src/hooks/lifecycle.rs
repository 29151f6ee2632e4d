use std::collections::HashMap;
use std::fmt;

/// npm lifecycle scripts run during a version bump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookType {
    Preversion,
    Version,
    Postversion,
}

impl HookType {
    /// All hooks, in execution order
    pub const ALL: [HookType; 3] = [HookType::Preversion, HookType::Version, HookType::Postversion];

    /// Script name as declared in `package.json`
    pub fn name(&self) -> &'static str {
        match self {
            HookType::Preversion => "preversion",
            HookType::Version => "version",
            HookType::Postversion => "postversion",
        }
    }

    /// How a failure of this hook affects the release
    ///
    /// `postversion` runs after the commit and tag exist, so it only warns.
    pub fn failure_policy(&self) -> FailurePolicy {
        match self {
            HookType::Preversion | HookType::Version => FailurePolicy::Abort,
            HookType::Postversion => FailurePolicy::Warn,
        }
    }
}

impl fmt::Display for HookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the release does when a step fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the release, rolling back uncommitted writes
    Abort,
    /// Report a warning and carry on
    Warn,
}

/// Context information passed to a hook
#[derive(Debug, Clone)]
pub struct HookContext {
    pub hook_type: HookType,
    pub old_version: String,
    pub new_version: String,
    pub tag: String,
}

impl HookContext {
    /// Convert context to environment variables for the hook script
    ///
    /// Maps context fields to BUMP_VERSION_* environment variables
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert(
            "BUMP_VERSION_HOOK".to_string(),
            self.hook_type.name().to_string(),
        );
        env.insert("BUMP_VERSION_OLD".to_string(), self.old_version.clone());
        env.insert("BUMP_VERSION_NEW".to_string(), self.new_version.clone());
        env.insert("BUMP_VERSION_TAG".to_string(), self.tag.clone());

        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_names() {
        assert_eq!(HookType::Preversion.name(), "preversion");
        assert_eq!(HookType::Version.name(), "version");
        assert_eq!(HookType::Postversion.name(), "postversion");
    }

    #[test]
    fn test_hook_order() {
        let names: Vec<_> = HookType::ALL.iter().map(HookType::name).collect();
        assert_eq!(names, vec!["preversion", "version", "postversion"]);
    }

    #[test]
    fn test_failure_policies() {
        assert_eq!(HookType::Preversion.failure_policy(), FailurePolicy::Abort);
        assert_eq!(HookType::Version.failure_policy(), FailurePolicy::Abort);
        assert_eq!(HookType::Postversion.failure_policy(), FailurePolicy::Warn);
    }

    #[test]
    fn test_hook_context_to_env_vars() {
        let ctx = HookContext {
            hook_type: HookType::Version,
            old_version: "1.0.0".to_string(),
            new_version: "1.0.1".to_string(),
            tag: "v1.0.1".to_string(),
        };

        let env = ctx.to_env_vars();
        assert_eq!(env.len(), 4);
        assert_eq!(env.get("BUMP_VERSION_HOOK"), Some(&"version".to_string()));
        assert_eq!(env.get("BUMP_VERSION_OLD"), Some(&"1.0.0".to_string()));
        assert_eq!(env.get("BUMP_VERSION_NEW"), Some(&"1.0.1".to_string()));
        assert_eq!(env.get("BUMP_VERSION_TAG"), Some(&"v1.0.1".to_string()));
    }
}
