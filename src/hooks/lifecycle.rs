use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Points in the bump workflow where hooks run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookType {
    Leading,
    Trailing,
}

impl HookType {
    /// Get the hook name as a string
    pub fn name(&self) -> &'static str {
        match self {
            HookType::Leading => "leading",
            HookType::Trailing => "trailing",
        }
    }
}

/// Context information passed to a hook
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Type of hook being executed
    pub hook_type: HookType,
    /// Version found in the manifest before the bump
    pub current_version: String,
    /// Version being written
    pub new_version: String,
    /// Release type token (`minor`, `prerelease`, ...)
    pub release_type: String,
}

impl HookContext {
    /// Convert context to environment variables for the hook command
    ///
    /// Maps context fields to BUMP_* environment variables
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("BUMP_HOOK".to_string(), self.hook_type.name().to_string());
        env.insert(
            "BUMP_CURRENT_VERSION".to_string(),
            self.current_version.clone(),
        );
        env.insert("BUMP_NEW_VERSION".to_string(), self.new_version.clone());
        env.insert("BUMP_RELEASE_TYPE".to_string(), self.release_type.clone());

        env
    }

    /// Substitute `${NEW_VERSION}`, `${CURRENT_VERSION}` and `${RELEASE_TYPE}`
    pub fn expand(&self, command: &str) -> String {
        command
            .replace("${NEW_VERSION}", &self.new_version)
            .replace("${CURRENT_VERSION}", &self.current_version)
            .replace("${RELEASE_TYPE}", &self.release_type)
    }
}
