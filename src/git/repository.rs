use crate::error::{BumpError, Result};
use crate::git::CommitInfo;
use git2::{Repository as Git2Repo, StatusOptions};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
///
/// `git2::Repository` is not `Sync`, so access goes through a mutex.
pub struct Git2Repository {
    repo: Mutex<Git2Repo>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo: Mutex::new(repo),
        }
    }

    fn repo(&self) -> MutexGuard<'_, Git2Repo> {
        self.repo.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn remote_callbacks<'a>() -> git2::RemoteCallbacks<'a> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }

            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }
        }

        git2::Cred::default()
    });
    callbacks
}

impl super::Repository for Git2Repository {
    fn current_branch(&self) -> Result<String> {
        let repo = self.repo();
        let head = repo
            .head()
            .map_err(|e| BumpError::branch(format!("Cannot resolve HEAD: {}", e)))?;

        if !head.is_branch() {
            return Ok("HEAD".to_string());
        }

        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| BumpError::branch("Branch name is not valid UTF-8"))
    }

    fn head_short_hash(&self) -> Result<String> {
        let repo = self.repo();
        let commit = repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| BumpError::branch(format!("Cannot resolve HEAD commit: {}", e)))?;

        let short = commit.as_object().short_id()?;
        Ok(short.as_str().unwrap_or_default().to_string())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo().tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn is_clean(&self) -> Result<bool> {
        let repo = self.repo();
        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);

        let statuses = repo.statuses(Some(&mut options))?;
        Ok(statuses.is_empty())
    }

    fn fetch_tags(&self, remote: &str) -> Result<()> {
        let repo = self.repo();
        let mut remote_handle = repo
            .find_remote(remote)
            .map_err(|e| BumpError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(remote_callbacks());

        debug!(remote, "fetching tags");
        remote_handle
            .fetch(&["+refs/tags/*:refs/tags/*"], Some(&mut fetch_options), None)
            .map_err(|e| {
                BumpError::remote(format!("Failed to fetch tags from '{}': {}", remote, e))
            })?;

        Ok(())
    }

    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<CommitInfo>> {
        let repo = self.repo();
        let mut revwalk = repo.revwalk()?;
        revwalk.push_head()?;

        if let Some(tag_name) = tag {
            let tag_commit = repo
                .find_reference(&format!("refs/tags/{}", tag_name))
                .and_then(|reference| reference.peel_to_commit())
                .map_err(|e| BumpError::tag(format!("Cannot find tag '{}': {}", tag_name, e)))?;
            revwalk.hide(tag_commit.id())?;
        }

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = repo.find_commit(oid)?;

            let message = commit.message().unwrap_or("(empty message)").to_string();
            let author = commit.author().name().unwrap_or("unknown").to_string();

            commits.push(CommitInfo {
                hash: oid.to_string().chars().take(7).collect(),
                message,
                author,
            });
        }

        commits.reverse();
        Ok(commits)
    }
}
