//! Tag-aware version resolution
//!
//! The version declared in the working copy can lag behind tags that were
//! already published (several alpha releases cut since the last version
//! commit, for example). Incrementing blindly from the declared version
//! would re-mint a tag that exists, so the resolver finds the latest tag in
//! the same release line and increments from there instead.
//!
//! Lines by release type:
//! - `major` / `premajor`: every tag
//! - `minor` / `preminor`: tags sharing the raw result's major
//! - `patch` / `prepatch`: tags sharing the raw result's major and minor
//! - `prerelease` / `branch` on a prerelease: tags on the current
//!   `major.minor.patch` in the same channel
//! - `prerelease` / `branch` on a stable version: tags sharing the raw
//!   result's major and minor, bumped as `prepatch`
//!
//! The result always lies above `current` and above every tag in its line;
//! a request that cannot satisfy both fails with `InvalidVersion`.

use crate::domain::prerelease::identifier_of;
use crate::domain::ReleaseType;
use crate::error::{BumpError, Result};
use crate::version::{effective_identifier, increment, parse_version, validate_custom};
use semver::Version;
use tracing::debug;

/// Parse raw tag strings into versions, dropping anything that is not semver.
///
/// The result is deduplicated and sorted newest first. Prefix stripping is
/// the caller's job (see [`crate::domain::strip_tag_prefix`]).
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<Version> {
    let mut versions: Vec<Version> = tags
        .iter()
        .filter_map(|tag| Version::parse(tag.as_ref().trim()).ok())
        .collect();
    versions.sort_by(|a, b| b.cmp(a));
    versions.dedup();
    versions
}

/// Release line a tag has to belong to in order to serve as increment base
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    All,
    Major(u64),
    MajorMinor(u64, u64),
    Channel {
        major: u64,
        minor: u64,
        patch: u64,
        identifier: String,
    },
}

impl Line {
    fn contains(&self, v: &Version) -> bool {
        match self {
            Line::All => true,
            Line::Major(major) => v.major == *major,
            Line::MajorMinor(major, minor) => v.major == *major && v.minor == *minor,
            Line::Channel {
                major,
                minor,
                patch,
                identifier,
            } => {
                v.major == *major
                    && v.minor == *minor
                    && v.patch == *patch
                    && identifier_of(v).as_deref() == Some(identifier.as_str())
            }
        }
    }
}

/// Explicit input of one resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub current: String,
    pub release_type: ReleaseType,
    pub identifier: Option<String>,
    /// Target version for `custom` releases
    pub custom_target: Option<String>,
}

impl ResolveRequest {
    pub fn new(current: impl Into<String>, release_type: ReleaseType) -> Self {
        ResolveRequest {
            current: current.into(),
            release_type,
            identifier: None,
            custom_target: None,
        }
    }

    pub fn with_identifier(mut self, identifier: Option<String>) -> Self {
        self.identifier = identifier;
        self
    }

    pub fn with_custom_target(mut self, target: Option<String>) -> Self {
        self.custom_target = target;
        self
    }

    /// Resolve against a snapshot of (prefix-stripped) tags
    pub fn resolve<S: AsRef<str>>(&self, tags: &[S]) -> Result<Resolution> {
        let current = parse_version(&self.current)?;
        let versions = normalize_tags(tags);
        let identifier = self.identifier.as_deref();

        let (next, base) = match self.release_type {
            ReleaseType::Custom => {
                let target = self.custom_target.as_deref().ok_or_else(|| {
                    BumpError::version("a custom release requires an explicit target version")
                })?;
                let next = validate_custom(&current, target)?;
                ensure_untagged(&next, &versions)?;
                (next, None)
            }
            release_type => resolve_versions(&current, release_type, &versions, identifier)?,
        };

        Ok(Resolution {
            current,
            identifier: identifier_of(&next).filter(|_| self.release_type.is_pre()),
            next,
            release_type: self.release_type,
            base,
        })
    }
}

/// Outcome of a resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub current: Version,
    pub next: Version,
    pub release_type: ReleaseType,
    /// Prerelease channel of the result, for prerelease-producing types
    pub identifier: Option<String>,
    /// Tag the result was incremented from, `None` when computed from `current`
    pub base: Option<Version>,
}

/// Compute the next version, cross-checked against existing tags.
///
/// `tags` are raw strings with any tag prefix already removed; entries that
/// do not parse are ignored.
///
/// # Example
/// ```
/// use bump_version::domain::ReleaseType;
/// use bump_version::resolver::resolve_with_tags;
///
/// let tags = ["1.3.2", "1.3.4", "not-a-version"];
/// let next = resolve_with_tags("1.3.1", ReleaseType::Patch, &tags, None).unwrap();
/// assert_eq!(next.to_string(), "1.3.5");
/// ```
pub fn resolve_with_tags<S: AsRef<str>>(
    current: &str,
    release_type: ReleaseType,
    tags: &[S],
    identifier: Option<&str>,
) -> Result<Version> {
    let current = parse_version(current)?;
    let versions = normalize_tags(tags);
    resolve_versions(&current, release_type, &versions, identifier).map(|(next, _)| next)
}

/// Core of the resolver over already-normalized tags (newest first).
///
/// Returns the next version and the tag it was derived from, if any.
pub fn resolve_versions(
    current: &Version,
    release_type: ReleaseType,
    tags: &[Version],
    identifier: Option<&str>,
) -> Result<(Version, Option<Version>)> {
    let channel = effective_identifier(current, release_type, identifier);
    let raw_next = increment(current, release_type, channel.as_deref())?;

    if tags.is_empty() {
        debug!(%current, %raw_next, "no version tags, using raw increment");
        ensure_advances(&raw_next, current)?;
        return Ok((raw_next, None));
    }

    let (line, effective_type) = match release_type {
        ReleaseType::Major | ReleaseType::Premajor => (Line::All, release_type),
        ReleaseType::Minor | ReleaseType::Preminor => (Line::Major(raw_next.major), release_type),
        ReleaseType::Patch | ReleaseType::Prepatch => {
            (Line::MajorMinor(raw_next.major, raw_next.minor), release_type)
        }
        ReleaseType::Prerelease | ReleaseType::Branch => match (&channel, identifier_of(current)) {
            (Some(id), Some(_)) => (
                Line::Channel {
                    major: current.major,
                    minor: current.minor,
                    patch: current.patch,
                    identifier: id.clone(),
                },
                release_type,
            ),
            _ => (
                Line::MajorMinor(raw_next.major, raw_next.minor),
                ReleaseType::Prepatch,
            ),
        },
        ReleaseType::Custom => return Ok((raw_next, None)),
    };

    let latest = match tags.iter().filter(|v| line.contains(v)).max() {
        Some(latest) => latest,
        None => {
            debug!(?line, %raw_next, "no tags in release line, using raw increment");
            ensure_advances(&raw_next, current)?;
            return Ok((raw_next, None));
        }
    };

    if raw_next > *latest {
        debug!(%latest, %raw_next, "working copy is ahead of the tags in line");
        ensure_advances(&raw_next, current)?;
        ensure_untagged(&raw_next, tags)?;
        return Ok((raw_next, None));
    }

    let next = increment(latest, effective_type, channel.as_deref())?;
    debug!(?line, %latest, %effective_type, %next, "incremented from latest tag in line");

    ensure_advances(&next, current)?;
    ensure_untagged(&next, tags)?;
    Ok((next, Some(latest.clone())))
}

/// Fail when the candidate does not move past the declared version
///
/// Happens when an explicit identifier sorts below the current channel,
/// e.g. asking for `alpha` while on `1.0.0-beta.0`.
fn ensure_advances(candidate: &Version, current: &Version) -> Result<()> {
    if candidate <= current {
        return Err(BumpError::version(format!(
            "Next version {} is not greater than current version {}",
            candidate, current
        )));
    }
    Ok(())
}

/// Fail when the candidate already exists anywhere in the tag set
fn ensure_untagged(candidate: &Version, tags: &[Version]) -> Result<()> {
    if tags.contains(candidate) {
        return Err(BumpError::collision(candidate.to_string()));
    }
    Ok(())
}
