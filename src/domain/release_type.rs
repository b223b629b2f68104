use crate::error::{BumpError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of version bump requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Major,
    Minor,
    Patch,
    Premajor,
    Preminor,
    Prepatch,
    Prerelease,
    /// Ephemeral prerelease whose identifier is the slugified branch name
    Branch,
    /// Caller supplies the exact target version
    Custom,
}

impl ReleaseType {
    /// The seven standard semver release types, in display order
    pub const STANDARD: [ReleaseType; 7] = [
        ReleaseType::Major,
        ReleaseType::Minor,
        ReleaseType::Patch,
        ReleaseType::Premajor,
        ReleaseType::Preminor,
        ReleaseType::Prepatch,
        ReleaseType::Prerelease,
    ];

    /// Lowercase token for this release type
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseType::Major => "major",
            ReleaseType::Minor => "minor",
            ReleaseType::Patch => "patch",
            ReleaseType::Premajor => "premajor",
            ReleaseType::Preminor => "preminor",
            ReleaseType::Prepatch => "prepatch",
            ReleaseType::Prerelease => "prerelease",
            ReleaseType::Branch => "branch",
            ReleaseType::Custom => "custom",
        }
    }

    /// Whether the release produces a prerelease version
    pub fn is_pre(&self) -> bool {
        matches!(
            self,
            ReleaseType::Premajor
                | ReleaseType::Preminor
                | ReleaseType::Prepatch
                | ReleaseType::Prerelease
                | ReleaseType::Branch
        )
    }
}

impl FromStr for ReleaseType {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "major" => Ok(ReleaseType::Major),
            "minor" => Ok(ReleaseType::Minor),
            "patch" => Ok(ReleaseType::Patch),
            "premajor" => Ok(ReleaseType::Premajor),
            "preminor" => Ok(ReleaseType::Preminor),
            "prepatch" => Ok(ReleaseType::Prepatch),
            "prerelease" => Ok(ReleaseType::Prerelease),
            "branch" => Ok(ReleaseType::Branch),
            "custom" => Ok(ReleaseType::Custom),
            _ => Err(BumpError::release_type(format!("'{}'", s))),
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
