use thiserror::Error;

/// Process exit code for a successful run
pub const EXIT_SUCCESS: i32 = 0;
/// Process exit code for any failure without a dedicated code
pub const EXIT_GENERAL_ERROR: i32 = 1;
/// Process exit code when no valid next version can be produced
pub const EXIT_INVALID_VERSION: i32 = -1;
/// Process exit code when the branch policy rejects the release
pub const EXIT_BRANCH_NOT_ALLOWED: i32 = -2;

/// Unified error type for bump-version operations
#[derive(Error, Debug)]
pub enum BumpError {
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Invalid release type: {0}")]
    InvalidReleaseType(String),

    #[error("Version {0} already exists as a tag")]
    VersionCollision(String),

    #[error("Branch '{branch}' is not allowed for a {release_type} release")]
    BranchNotAllowed {
        branch: String,
        release_type: String,
    },

    #[error("Working tree has uncommitted changes; commit them or set allow_dirty")]
    DirtyWorkingTree,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Hook failed: {0}")]
    Hook(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Branch error: {0}")]
    Branch(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in bump-version
pub type Result<T> = std::result::Result<T, BumpError>;

impl BumpError {
    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        BumpError::InvalidVersion(msg.into())
    }

    /// Create a release type error with context
    pub fn release_type(msg: impl Into<String>) -> Self {
        BumpError::InvalidReleaseType(msg.into())
    }

    /// Create a collision error for a version that is already tagged
    pub fn collision(version: impl Into<String>) -> Self {
        BumpError::VersionCollision(version.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BumpError::Config(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        BumpError::Manifest(msg.into())
    }

    /// Create a hook error with context
    pub fn hook(msg: impl Into<String>) -> Self {
        BumpError::Hook(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        BumpError::Tag(msg.into())
    }

    /// Create a branch error with context
    pub fn branch(msg: impl Into<String>) -> Self {
        BumpError::Branch(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        BumpError::Remote(msg.into())
    }

    /// Exit code the CLI should terminate with for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            BumpError::InvalidVersion(_)
            | BumpError::InvalidReleaseType(_)
            | BumpError::VersionCollision(_) => EXIT_INVALID_VERSION,
            BumpError::BranchNotAllowed { .. } => EXIT_BRANCH_NOT_ALLOWED,
            _ => EXIT_GENERAL_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BumpError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BumpError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_collision_display() {
        let err = BumpError::collision("1.2.3");
        assert_eq!(err.to_string(), "Version 1.2.3 already exists as a tag");
    }

    #[test]
    fn test_branch_not_allowed_display() {
        let err = BumpError::BranchNotAllowed {
            branch: "feature/x".to_string(),
            release_type: "major".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("feature/x"));
        assert!(msg.contains("major"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(BumpError::version("x").exit_code(), EXIT_INVALID_VERSION);
        assert_eq!(
            BumpError::release_type("x").exit_code(),
            EXIT_INVALID_VERSION
        );
        assert_eq!(BumpError::collision("1.0.0").exit_code(), EXIT_INVALID_VERSION);
        assert_eq!(
            BumpError::BranchNotAllowed {
                branch: "dev".to_string(),
                release_type: "patch".to_string(),
            }
            .exit_code(),
            EXIT_BRANCH_NOT_ALLOWED
        );
        assert_eq!(BumpError::hook("x").exit_code(), EXIT_GENERAL_ERROR);
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (BumpError::config("x"), "Configuration error"),
            (BumpError::version("x"), "Invalid version"),
            (BumpError::release_type("x"), "Invalid release type"),
            (BumpError::manifest("x"), "Manifest error"),
            (BumpError::hook("x"), "Hook failed"),
            (BumpError::tag("x"), "Tag error"),
            (BumpError::remote("x"), "Remote operation failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
