use crate::domain::branch::compile_pattern;
use crate::domain::AllowedBranch;
use crate::error::{BumpError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-level config file name
pub const CONFIG_FILE_NAME: &str = "bump.toml";
/// User-level config file name inside the user config directory
pub const USER_CONFIG_FILE_NAME: &str = ".bump.toml";

/// Represents the complete configuration for bump-version.
///
/// Contains tag handling, branch policy, workspace layout, changelog and hook settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Prefix of version tags (`v` for `v1.2.3`)
    pub tag_prefix: String,

    /// Cross-check the next version against existing tags
    pub with_tags: bool,

    /// Fetch tags from the remote before reading them
    pub remote_tags: bool,

    /// Remote to fetch tags from
    pub remote: String,

    /// Allow writing versions with uncommitted changes
    pub allow_dirty: bool,

    /// Branches allowed to cut releases
    pub allowed_branches: Vec<AllowedBranch>,

    pub mode: WorkspaceMode,

    /// Package directories updated in monorepo mode (`packages/*` expands one level)
    pub packages: Vec<String>,

    pub changelog: bool,

    pub changelog_file: String,

    pub hooks: HooksConfig,
}

/// How versions are written across the workspace
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceMode {
    /// Only the package in the working directory
    #[default]
    Independent,
    /// Root package plus every configured package share one version
    Monorepo,
}

/// Shell commands run around the version write.
///
/// `${NEW_VERSION}`, `${CURRENT_VERSION}` and `${RELEASE_TYPE}` are substituted.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct HooksConfig {
    #[serde(alias = "before")]
    pub leading: Vec<String>,
    #[serde(alias = "after", alias = "tailing")]
    pub trailing: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tag_prefix: "v".to_string(),
            with_tags: false,
            remote_tags: false,
            remote: "origin".to_string(),
            allow_dirty: false,
            allowed_branches: vec![
                AllowedBranch::Pattern("main".to_string()),
                AllowedBranch::Pattern("master".to_string()),
            ],
            mode: WorkspaceMode::Independent,
            packages: Vec::new(),
            changelog: false,
            changelog_file: "CHANGELOG.md".to_string(),
            hooks: HooksConfig::default(),
        }
    }
}

impl Config {
    /// Parse a config from TOML text and validate it
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| BumpError::config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the config for inconsistencies, reporting every problem at once
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.mode == WorkspaceMode::Monorepo && self.packages.is_empty() {
            errors.push("packages is required in monorepo mode".to_string());
        }

        for entry in &self.allowed_branches {
            if let AllowedBranch::Rule {
                name,
                allow_types: Some(allow),
                disallow_types,
            } = entry
            {
                let overlap: Vec<String> = allow
                    .iter()
                    .filter(|t| disallow_types.contains(t))
                    .map(|t| t.to_string())
                    .collect();
                if !overlap.is_empty() {
                    errors.push(format!(
                        "branch {}: allow_types and disallow_types overlap: {}",
                        name,
                        overlap.join(", ")
                    ));
                }
            }

            if entry.pattern().is_empty() {
                errors.push("branch entries must have a name".to_string());
            } else if let Err(e) = compile_pattern(entry.pattern()) {
                errors.push(e.to_string());
            }
        }

        if !self
            .tag_prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            errors.push(format!(
                "tag_prefix '{}' contains invalid characters",
                self.tag_prefix
            ));
        }

        if self.changelog && self.changelog_file.trim().is_empty() {
            errors.push("changelog_file must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(BumpError::config(format!(
                "validation failed:\n{}",
                errors
                    .iter()
                    .map(|e| format!("  - {}", e))
                    .collect::<Vec<_>>()
                    .join("\n")
            )))
        }
    }
}

/// Locate the config file to use, if any.
///
/// Looks in the following order:
/// 1. Custom path provided as parameter
/// 2. `bump.toml` in the project root
/// 3. `.bump.toml` in the user config directory
pub fn find_config_file(config_path: Option<&Path>, root: &Path) -> Result<Option<PathBuf>> {
    if let Some(path) = config_path {
        if !path.exists() {
            return Err(BumpError::config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    let project = root.join(CONFIG_FILE_NAME);
    if project.exists() {
        return Ok(Some(project));
    }

    Ok(dirs::config_dir()
        .map(|dir| dir.join(USER_CONFIG_FILE_NAME))
        .filter(|path| path.exists()))
}

/// Loads configuration from file or returns defaults.
///
/// # Arguments
/// * `config_path` - Optional path to a custom configuration file
/// * `root` - Project root searched for `bump.toml`
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If the file cannot be read, parsed or fails validation
pub fn load_config(config_path: Option<&Path>, root: &Path) -> Result<Config> {
    match find_config_file(config_path, root)? {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            let content = fs::read_to_string(&path)?;
            Config::from_toml(&content)
        }
        None => {
            debug!("no config file found, using defaults");
            Ok(Config::default())
        }
    }
}
