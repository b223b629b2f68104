//! package.json reader and writer
//!
//! Only the `version` field is rewritten; key order and indentation of the
//! original file are kept.

use crate::error::{BumpError, Result};
use crate::version::parse_version;
use semver::Version;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MANIFEST_FILE_NAME: &str = "package.json";

const DEFAULT_INDENT: &str = "  ";

/// A package manifest loaded from disk
#[derive(Debug, Clone)]
pub struct Manifest {
    pub path: PathBuf,
    pub name: Option<String>,
    pub version: Version,
    indent: String,
    json: Value,
}

impl Manifest {
    /// Load `package.json` from a package directory
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE_NAME);
        if !path.is_file() {
            return Err(BumpError::manifest(format!(
                "{} not found in {}",
                MANIFEST_FILE_NAME,
                dir.display()
            )));
        }

        let content = fs::read_to_string(&path)?;
        Self::parse(path, &content)
    }

    /// Parse manifest text read from `path`
    pub fn parse(path: PathBuf, content: &str) -> Result<Self> {
        let json: Value = serde_json::from_str(content)
            .map_err(|e| BumpError::manifest(format!("{}: {}", path.display(), e)))?;

        if !json.is_object() {
            return Err(BumpError::manifest(format!(
                "{}: top level is not an object",
                path.display()
            )));
        }

        let raw_version = json
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                BumpError::manifest(format!("{}: missing \"version\" field", path.display()))
            })?;
        let version = parse_version(raw_version)?;

        let name = json.get("name").and_then(Value::as_str).map(str::to_string);

        Ok(Manifest {
            path,
            name,
            version,
            indent: detect_indent(content),
            json,
        })
    }

    /// Package name, falling back to the directory name
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.path
                .parent()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| MANIFEST_FILE_NAME.to_string())
        })
    }

    pub fn set_version(&mut self, version: &Version) {
        self.version = version.clone();
        if let Some(object) = self.json.as_object_mut() {
            object.insert("version".to_string(), Value::String(version.to_string()));
        }
    }

    /// Serialize with the original indentation and a trailing newline
    pub fn render(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(self.indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.json
            .serialize(&mut serializer)
            .map_err(|e| BumpError::manifest(format!("{}: {}", self.path.display(), e)))?;

        let mut rendered = String::from_utf8(buf)
            .map_err(|e| BumpError::manifest(format!("{}: {}", self.path.display(), e)))?;
        rendered.push('\n');
        Ok(rendered)
    }

    pub fn save(&self) -> Result<()> {
        fs::write(&self.path, self.render()?)?;
        debug!(path = %self.path.display(), version = %self.version, "manifest written");
        Ok(())
    }
}

/// Leading whitespace of the first indented line, two spaces if none
fn detect_indent(content: &str) -> String {
    content
        .lines()
        .skip(1)
        .find(|line| !line.trim().is_empty())
        .map(|line| {
            line.chars()
                .take_while(|c| *c == ' ' || *c == '\t')
                .collect::<String>()
        })
        .filter(|indent| !indent.is_empty())
        .unwrap_or_else(|| DEFAULT_INDENT.to_string())
}

/// Manifests of the configured monorepo packages
///
/// Entries ending in `/*` expand to every direct subdirectory. Directories
/// without a versioned package.json are skipped.
pub fn workspace_manifests(root: &Path, packages: &[String]) -> Result<Vec<Manifest>> {
    let mut dirs = Vec::new();

    for package in packages {
        match package.strip_suffix("/*") {
            Some(parent) => {
                let parent = root.join(parent);
                if !parent.is_dir() {
                    debug!(dir = %parent.display(), "package directory does not exist");
                    continue;
                }
                let mut children: Vec<PathBuf> = fs::read_dir(&parent)?
                    .filter_map(|entry| entry.ok().map(|e| e.path()))
                    .filter(|path| path.is_dir())
                    .collect();
                children.sort();
                dirs.extend(children);
            }
            None => dirs.push(root.join(package)),
        }
    }

    let mut manifests: Vec<Manifest> = Vec::new();
    for dir in dirs {
        if manifests.iter().any(|m| m.path.parent() == Some(dir.as_path())) {
            continue;
        }
        match Manifest::load(&dir) {
            Ok(manifest) => manifests.push(manifest),
            Err(e) => debug!(dir = %dir.display(), error = %e, "skipping package"),
        }
    }

    Ok(manifests)
}
