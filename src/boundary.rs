use std::fmt;

/// Non-fatal conditions met while gathering release inputs.
/// These are reported to the user and the command carries on.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No tag carries the configured prefix, the declared version is used as is
    NoVersionTags { prefix: String },
    /// Tags carry the prefix but are not semantic versions
    IgnoredTags { tags: Vec<String> },
    /// Tag fetch failed, local tags are used
    FetchFailed { remote: String, reason: String },
    /// Working tree has uncommitted changes and `allow_dirty` is set
    DirtyWorkingTree,
    /// No new commits since the latest tag
    NoNewCommits {
        latest_tag: String,
        current_commit_hash: String,
    },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoVersionTags { prefix } => {
                write!(
                    f,
                    "No version tags found with prefix '{}', using the manifest version",
                    prefix
                )
            }
            BoundaryWarning::IgnoredTags { tags } => {
                write!(f, "Ignoring tags that are not versions: {}", tags.join(", "))
            }
            BoundaryWarning::FetchFailed { remote, reason } => {
                write!(
                    f,
                    "Could not fetch tags from '{}': {}. Using local tags",
                    remote, reason
                )
            }
            BoundaryWarning::DirtyWorkingTree => {
                write!(f, "Working tree has uncommitted changes")
            }
            BoundaryWarning::NoNewCommits {
                latest_tag,
                current_commit_hash,
            } => {
                let short_hash = if current_commit_hash.len() > 7 {
                    &current_commit_hash[..7]
                } else {
                    current_commit_hash.as_str()
                };
                write!(
                    f,
                    "No new commits since tag '{}' (current: {})",
                    latest_tag, short_hash
                )
            }
        }
    }
}
