//! Version arithmetic: raw next-version computation without any I/O.
//!
//! Increments follow the npm `semver.inc` rules, so a prerelease of the
//! target line is promoted rather than skipped (`2.0.0-alpha.1` + major is
//! `2.0.0`, not `3.0.0`).

use crate::domain::prerelease::{
    identifier_of, is_valid_identifier, DEFAULT_BRANCH_IDENTIFIER, DEFAULT_IDENTIFIER,
};
use crate::domain::ReleaseType;
use crate::error::{BumpError, Result};
use semver::{BuildMetadata, Prerelease, Version};

/// Parse a version string, rejecting anything that is not strict semver.
///
/// # Example
/// ```
/// use bump_version::version::parse_version;
///
/// assert_eq!(parse_version("1.2.3").unwrap().to_string(), "1.2.3");
/// assert!(parse_version("v1.2.3").is_err());
/// ```
pub fn parse_version(raw: &str) -> Result<Version> {
    Version::parse(raw.trim()).map_err(|e| BumpError::version(format!("'{}': {}", raw, e)))
}

/// Pick the prerelease identifier for an increment.
///
/// Explicit identifier first, then the channel the current version is already
/// on, then `alpha` for prerelease-producing types.
pub fn effective_identifier(
    current: &Version,
    release_type: ReleaseType,
    identifier: Option<&str>,
) -> Option<String> {
    if let Some(id) = identifier.filter(|id| !id.is_empty()) {
        return Some(id.to_string());
    }
    match release_type {
        ReleaseType::Branch => Some(DEFAULT_BRANCH_IDENTIFIER.to_string()),
        t if t.is_pre() => {
            Some(identifier_of(current).unwrap_or_else(|| DEFAULT_IDENTIFIER.to_string()))
        }
        _ => identifier_of(current),
    }
}

/// Compute the next version from `current` for the requested release type.
///
/// `custom` returns `current` unchanged: the caller supplies the target
/// and checks it with [`validate_custom`].
///
/// # Example
/// ```
/// use bump_version::domain::ReleaseType;
/// use bump_version::version::{increment, parse_version};
///
/// let current = parse_version("1.0.0-beta.2").unwrap();
/// let next = increment(&current, ReleaseType::Prerelease, None).unwrap();
/// assert_eq!(next.to_string(), "1.0.0-beta.3");
/// ```
pub fn increment(
    current: &Version,
    release_type: ReleaseType,
    identifier: Option<&str>,
) -> Result<Version> {
    if let Some(id) = identifier.filter(|id| !id.is_empty()) {
        if !is_valid_identifier(id) {
            return Err(BumpError::version(format!(
                "Invalid pre-release identifier: '{}'",
                id
            )));
        }
    }

    let id = effective_identifier(current, release_type, identifier);
    let mut next = current.clone();
    next.build = BuildMetadata::EMPTY;

    match release_type {
        ReleaseType::Major => bump_major(&mut next),
        ReleaseType::Minor => bump_minor(&mut next),
        ReleaseType::Patch => bump_patch(&mut next),
        ReleaseType::Premajor => {
            next.pre = Prerelease::EMPTY;
            bump_major(&mut next);
            bump_pre(&mut next, id.as_deref())?;
        }
        ReleaseType::Preminor => {
            next.pre = Prerelease::EMPTY;
            bump_minor(&mut next);
            bump_pre(&mut next, id.as_deref())?;
        }
        ReleaseType::Prepatch => {
            next.pre = Prerelease::EMPTY;
            bump_patch(&mut next);
            bump_pre(&mut next, id.as_deref())?;
        }
        ReleaseType::Prerelease | ReleaseType::Branch => {
            if next.pre.is_empty() {
                bump_patch(&mut next);
            }
            bump_pre(&mut next, id.as_deref())?;
        }
        ReleaseType::Custom => return Ok(current.clone()),
    }

    Ok(next)
}

/// String-level wrapper around [`increment`].
pub fn increment_str(
    current: &str,
    release_type: ReleaseType,
    identifier: Option<&str>,
) -> Result<String> {
    let current = parse_version(current)?;
    Ok(increment(&current, release_type, identifier)?.to_string())
}

/// Validate a caller-supplied target for a `custom` release.
///
/// The target must be valid semver and strictly greater than `current`.
pub fn validate_custom(current: &Version, target: &str) -> Result<Version> {
    let target = parse_version(target)?;
    if target <= *current {
        return Err(BumpError::version(format!(
            "custom version {} must be greater than the current version {}",
            target, current
        )));
    }
    Ok(target)
}

fn bump_major(v: &mut Version) {
    if v.minor != 0 || v.patch != 0 || v.pre.is_empty() {
        v.major += 1;
    }
    v.minor = 0;
    v.patch = 0;
    v.pre = Prerelease::EMPTY;
}

fn bump_minor(v: &mut Version) {
    if v.patch != 0 || v.pre.is_empty() {
        v.minor += 1;
    }
    v.patch = 0;
    v.pre = Prerelease::EMPTY;
}

fn bump_patch(v: &mut Version) {
    if v.pre.is_empty() {
        v.patch += 1;
    }
    v.pre = Prerelease::EMPTY;
}

fn is_numeric(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
}

/// Advance the prerelease part: bump the right-most numeric identifier,
/// then switch channel when a different identifier is requested.
fn bump_pre(v: &mut Version, identifier: Option<&str>) -> Result<()> {
    let mut parts: Vec<String> = if v.pre.is_empty() {
        Vec::new()
    } else {
        v.pre.as_str().split('.').map(str::to_string).collect()
    };

    if parts.is_empty() {
        parts.push("0".to_string());
    } else {
        let bumped = parts.iter_mut().rev().find(|p| is_numeric(p)).map(|p| {
            let n = p.parse::<u64>().unwrap_or(0);
            *p = (n + 1).to_string();
        });
        if bumped.is_none() {
            parts.push("0".to_string());
        }
    }

    if let Some(id) = identifier {
        let same_channel = parts.first().map(String::as_str) == Some(id);
        let has_counter = parts.get(1).map(|p| is_numeric(p)).unwrap_or(false);
        if !same_channel || !has_counter {
            parts = vec![id.to_string(), "0".to_string()];
        }
    }

    v.pre = Prerelease::new(&parts.join("."))
        .map_err(|e| BumpError::version(format!("invalid prerelease '{}': {}", parts.join("."), e)))?;
    Ok(())
}
