//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the repository
//! access bump-version needs: the current branch, version tags, working tree
//! state and the commit log since the last release.
//!
//! # Overview
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! Commands depend on the [Repository] trait rather than concrete
//! implementations.
//!
//! ```rust
//! # use bump_version::git::{collect_version_tags, Repository};
//! # fn example<R: Repository>(repo: &R) -> bump_version::error::Result<()> {
//! let branch = repo.current_branch()?;
//! let versions = collect_version_tags(repo, "v")?;
//! println!("{} has {} version tags", branch, versions.len());
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::strip_tag_prefix;
use crate::error::Result;

/// Commit information for changelog generation
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The commit hash (shortened)
    pub hash: String,
    /// The commit message
    pub message: String,
    /// The commit author
    pub author: String,
}

/// Common git operation trait for abstraction
///
/// All implementors must be `Send + Sync`. Implementations map underlying
/// errors (like `git2::Error`) to the matching [crate::error::BumpError]
/// variants.
pub trait Repository: Send + Sync {
    /// Name of the checked-out branch
    ///
    /// # Returns
    /// * `Ok(String)` - Branch name, or `HEAD` when detached
    /// * `Err` - If HEAD cannot be resolved (e.g. an unborn repository)
    fn current_branch(&self) -> Result<String>;

    /// Abbreviated hash of the HEAD commit
    fn head_short_hash(&self) -> Result<String>;

    /// Get all tag names in the repository
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Tag names in no particular order
    /// * `Err` - If there's a Git error
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Whether the working tree has no uncommitted changes
    ///
    /// Untracked files are ignored.
    fn is_clean(&self) -> Result<bool>;

    /// Fetch all tags from a remote
    ///
    /// # Arguments
    /// * `remote` - Name of the remote (e.g., "origin", "upstream")
    ///
    /// # Returns
    /// * `Ok(())` - Success
    /// * `Err` - If the remote doesn't exist or the fetch fails
    fn fetch_tags(&self, remote: &str) -> Result<()>;

    /// Commits reachable from HEAD but not from `tag`
    ///
    /// Returns every commit up to HEAD when `tag` is `None`, oldest first.
    ///
    /// # Arguments
    /// * `tag` - Tag name the previous release was cut from
    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<CommitInfo>>;
}

/// Version candidates from the repository's tags
///
/// Lists every tag and strips `prefix`; tags without the prefix are dropped.
/// The result is not validated, the resolver ignores entries that are not
/// versions.
pub fn collect_version_tags<R: Repository + ?Sized>(repo: &R, prefix: &str) -> Result<Vec<String>> {
    let tags = repo.list_tags()?;
    Ok(strip_tag_prefix(&tags, prefix))
}
