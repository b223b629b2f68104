use crate::domain::ReleaseType;
use crate::error::{BumpError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Represents a git branch with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
    pub is_main: bool,
}

impl BranchContext {
    /// Create a new branch context
    pub fn new(name: impl Into<String>) -> Self {
        let name_str = name.into();
        let is_main = matches!(name_str.as_str(), "main" | "master");

        BranchContext {
            name: name_str,
            is_main,
        }
    }

    /// Check if this is a release branch (main/master)
    pub fn is_release_branch(&self) -> bool {
        self.is_main
    }
}

/// One entry of the `allowed_branches` configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AllowedBranch {
    /// Branch name pattern; any release type is allowed
    Pattern(String),
    /// Branch name pattern with release type restrictions
    Rule {
        name: String,
        #[serde(default)]
        allow_types: Option<Vec<ReleaseType>>,
        #[serde(default)]
        disallow_types: Vec<ReleaseType>,
    },
}

impl AllowedBranch {
    /// The branch name pattern of this entry
    pub fn pattern(&self) -> &str {
        match self {
            AllowedBranch::Pattern(pattern) => pattern,
            AllowedBranch::Rule { name, .. } => name,
        }
    }
}

#[derive(Debug)]
struct CompiledRule {
    regex: Regex,
    allow_types: Option<Vec<ReleaseType>>,
    disallow_types: Vec<ReleaseType>,
}

/// Gate deciding which branches may cut which release types
///
/// Patterns are regular expressions matched against the whole branch name.
#[derive(Debug)]
pub struct BranchPolicy {
    rules: Vec<CompiledRule>,
}

impl BranchPolicy {
    /// Compile the configured entries
    pub fn new(entries: &[AllowedBranch]) -> Result<Self> {
        let rules = entries
            .iter()
            .map(|entry| {
                let regex = compile_pattern(entry.pattern())?;
                let (allow_types, disallow_types) = match entry {
                    AllowedBranch::Pattern(_) => (None, Vec::new()),
                    AllowedBranch::Rule {
                        allow_types,
                        disallow_types,
                        ..
                    } => (allow_types.clone(), disallow_types.clone()),
                };
                Ok(CompiledRule {
                    regex,
                    allow_types,
                    disallow_types,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BranchPolicy { rules })
    }

    /// Whether `branch` may cut a `release_type` release
    pub fn allows(&self, branch: &BranchContext, release_type: ReleaseType) -> bool {
        if self.rules.is_empty() {
            return true;
        }

        let mut matched_any = false;
        for rule in self.rules.iter().filter(|r| r.regex.is_match(&branch.name)) {
            matched_any = true;
            if rule.disallow_types.contains(&release_type) {
                continue;
            }
            match &rule.allow_types {
                Some(allowed) if !allowed.contains(&release_type) => continue,
                _ => return true,
            }
        }

        // Branch releases are meant for non-release branches
        !matched_any && release_type == ReleaseType::Branch
    }

    /// Fail with `BranchNotAllowed` unless the release is permitted
    pub fn check(&self, branch: &BranchContext, release_type: ReleaseType) -> Result<()> {
        if self.allows(branch, release_type) {
            Ok(())
        } else {
            Err(BumpError::BranchNotAllowed {
                branch: branch.name.clone(),
                release_type: release_type.to_string(),
            })
        }
    }
}

/// Compile a branch pattern anchored to the whole branch name
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
        BumpError::config(format!("Invalid branch pattern '{}': {}", pattern, e))
    })
}
