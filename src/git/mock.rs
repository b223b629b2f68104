use crate::error::{BumpError, Result};
use crate::git::{CommitInfo, Repository};
use std::collections::HashMap;
use std::sync::Mutex;

/// Mock repository for testing without actual git operations
///
/// History is linear: commits are appended to HEAD and tags point at the
/// commit that was HEAD when they were added.
pub struct MockRepository {
    branch: String,
    clean: bool,
    commits: Vec<CommitInfo>,
    // tag name -> number of commits reachable from the tag
    tags: Mutex<HashMap<String, usize>>,
    remotes: HashMap<String, Vec<String>>,
}

impl MockRepository {
    /// Create a new empty mock repository on `main`
    pub fn new() -> Self {
        MockRepository {
            branch: "main".to_string(),
            clean: true,
            commits: Vec::new(),
            tags: Mutex::new(HashMap::new()),
            remotes: HashMap::new(),
        }
    }

    /// Check out another branch
    pub fn set_branch(&mut self, branch: impl Into<String>) {
        self.branch = branch.into();
    }

    /// Mark the working tree dirty or clean
    pub fn set_clean(&mut self, clean: bool) {
        self.clean = clean;
    }

    /// Append a commit on top of HEAD
    pub fn add_commit(&mut self, message: impl Into<String>) {
        let hash = format!("{:07x}", self.commits.len() + 1);
        self.commits.push(CommitInfo {
            hash,
            message: message.into(),
            author: "Test Author".to_string(),
        });
    }

    /// Add a tag pointing at the current HEAD
    pub fn add_tag(&mut self, name: impl Into<String>) {
        let head = self.commits.len();
        self.tags_mut().insert(name.into(), head);
    }

    /// Register a remote carrying the given tags
    pub fn add_remote(&mut self, name: impl Into<String>, tags: &[&str]) {
        self.remotes
            .insert(name.into(), tags.iter().map(|t| t.to_string()).collect());
    }

    fn tags_mut(&mut self) -> &mut HashMap<String, usize> {
        self.tags.get_mut().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_tags(&self) -> std::sync::MutexGuard<'_, HashMap<String, usize>> {
        self.tags.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn head_short_hash(&self) -> Result<String> {
        self.commits
            .last()
            .map(|c| c.hash.clone())
            .ok_or_else(|| BumpError::branch("HEAD has no commits"))
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let mut tags: Vec<String> = self.lock_tags().keys().cloned().collect();
        tags.sort();
        Ok(tags)
    }

    fn is_clean(&self) -> Result<bool> {
        Ok(self.clean)
    }

    fn fetch_tags(&self, remote: &str) -> Result<()> {
        let remote_tags = self
            .remotes
            .get(remote)
            .ok_or_else(|| BumpError::remote(format!("Cannot find remote: {}", remote)))?;

        let head = self.commits.len();
        let mut tags = self.lock_tags();
        for tag in remote_tags {
            tags.entry(tag.clone()).or_insert(head);
        }
        Ok(())
    }

    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<CommitInfo>> {
        let start = match tag {
            Some(name) => *self
                .lock_tags()
                .get(name)
                .ok_or_else(|| BumpError::tag(format!("Cannot find tag '{}'", name)))?,
            None => 0,
        };
        Ok(self.commits[start..].to_vec())
    }
}
