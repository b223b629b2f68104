/// Represents a git tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    /// Create a new tag from a string
    pub fn new(name: impl Into<String>) -> Self {
        Tag { name: name.into() }
    }

    /// Extract the version part of the tag for a given prefix
    /// Example: prefix="v", name="v1.2.3" -> Some("1.2.3")
    ///
    /// Returns `None` when the tag does not start with the prefix.
    pub fn version_part(&self, prefix: &str) -> Option<&str> {
        self.name.strip_prefix(prefix)
    }
}

/// Build a tag name from a prefix and a version
/// Example: prefix="v", version="1.2.3" -> "v1.2.3"
pub fn format_tag(prefix: &str, version: &str) -> String {
    format!("{}{}", prefix, version)
}

/// Strip the tag prefix from raw tag names, keeping only tags that carry it.
///
/// The result still contains non-version entries; those are filtered by the
/// resolver when it normalizes the set.
pub fn strip_tag_prefix<S: AsRef<str>>(tags: &[S], prefix: &str) -> Vec<String> {
    tags.iter()
        .map(|tag| Tag::new(tag.as_ref().trim()))
        .filter_map(|tag| tag.version_part(prefix).map(str::to_string))
        .filter(|rest| !rest.is_empty())
        .collect()
}
