//! Prerelease channel handling for semantic versioning
//!
//! A prerelease such as `alpha.3` is read as a channel identifier (`alpha`)
//! followed by an iteration number (`3`). According to semver.org: https://semver.org/#spec-item-9

use semver::Version;

/// Channel identifier used when a prerelease is requested without one
pub const DEFAULT_IDENTIFIER: &str = "alpha";

/// Identifier used for branch releases when no branch name is available
pub const DEFAULT_BRANCH_IDENTIFIER: &str = "branch";

/// Channel identifier carried by a version (`alpha` for `1.0.0-alpha.2`)
pub fn identifier_of(version: &Version) -> Option<String> {
    let first = version.pre.as_str().split('.').next()?;
    if first.is_empty() || first.chars().all(|c| c.is_ascii_digit()) {
        None
    } else {
        Some(first.to_string())
    }
}

/// Channel that usually follows `identifier` on the way to a release
///
/// `alpha` → `beta` → `canary` → `rc`; `None` past `rc` or for unknown channels.
pub fn next_identifier(identifier: &str) -> Option<&'static str> {
    match identifier {
        "alpha" => Some("beta"),
        "beta" => Some("canary"),
        "canary" => Some("rc"),
        _ => None,
    }
}

/// Whether a string is usable as a single semver prerelease identifier
pub fn is_valid_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Turn a branch name into a prerelease identifier
///
/// `feature/Login_Form` becomes `feature-login-form`.
pub fn slugify_branch(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        DEFAULT_BRANCH_IDENTIFIER.to_string()
    } else {
        slug.to_string()
    }
}
