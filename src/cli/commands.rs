//! Command implementations
//!
//! Every command takes the repository, the loaded config and the project
//! root and returns a plain result struct. Printing and prompting stay in
//! the binary, so these functions run unchanged against a
//! [`MockRepository`](crate::git::MockRepository).

use crate::boundary::BoundaryWarning;
use crate::changelog::{find_changelog_file, prepend_section, render_section};
use crate::config::{Config, WorkspaceMode};
use crate::domain::{
    format_tag, identifier_of, next_identifier, slugify_branch, BranchContext, BranchPolicy,
    ReleaseType,
};
use crate::error::{BumpError, Result};
use crate::git::{collect_version_tags, Repository};
use crate::hooks::{HookContext, HookExecutor, HookType};
use crate::manifest::{workspace_manifests, Manifest};
use crate::resolver::{normalize_tags, Resolution, ResolveRequest};
use chrono::NaiveDate;
use semver::Version;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Tag snapshot plus what went wrong while taking it
#[derive(Debug, Clone, Default)]
pub struct TagSnapshot {
    /// Tag names with the prefix stripped
    pub versions: Vec<String>,
    pub warnings: Vec<BoundaryWarning>,
}

/// Read the version tags, fetching them from the configured remote first
/// when `fetch` is set. A failed fetch is downgraded to a warning.
pub fn gather_tags<R: Repository + ?Sized>(
    repo: &R,
    config: &Config,
    fetch: bool,
) -> Result<TagSnapshot> {
    let mut warnings = Vec::new();

    if fetch {
        info!(remote = %config.remote, "fetching tags");
        if let Err(e) = repo.fetch_tags(&config.remote) {
            warn!(remote = %config.remote, error = %e, "tag fetch failed");
            warnings.push(BoundaryWarning::FetchFailed {
                remote: config.remote.clone(),
                reason: e.to_string(),
            });
        }
    }

    let versions = collect_version_tags(repo, &config.tag_prefix)?;
    if versions.is_empty() {
        warnings.push(BoundaryWarning::NoVersionTags {
            prefix: config.tag_prefix.clone(),
        });
    }

    let ignored: Vec<String> = versions
        .iter()
        .filter(|v| Version::parse(v).is_err())
        .map(|v| format_tag(&config.tag_prefix, v))
        .collect();
    if !ignored.is_empty() {
        debug!(count = ignored.len(), "ignoring non-version tags");
        warnings.push(BoundaryWarning::IgnoredTags { tags: ignored });
    }

    debug!(count = versions.len(), "collected version tags");
    Ok(TagSnapshot { versions, warnings })
}

/// Prerelease identifier for a request: the explicit one, or the slugified
/// branch name for branch releases
fn request_identifier(release_type: ReleaseType, preid: Option<&str>, branch: &str) -> Option<String> {
    match preid.filter(|id| !id.is_empty()) {
        Some(id) => Some(id.to_string()),
        None if release_type == ReleaseType::Branch => Some(slugify_branch(branch)),
        None => None,
    }
}

/// Options of the `next` command
#[derive(Debug, Clone, PartialEq)]
pub struct NextOptions {
    pub release_type: ReleaseType,
    pub preid: Option<String>,
    /// Target for `custom` releases
    pub custom_version: Option<String>,
    /// Cross-check against tags even when the config does not ask for it
    pub with_tags: bool,
    /// Fetch tags before reading them even when the config does not ask for it
    pub fetch: bool,
    /// The plan is going to be applied, so the working tree must be clean
    pub write: bool,
}

impl NextOptions {
    pub fn new(release_type: ReleaseType) -> Self {
        NextOptions {
            release_type,
            preid: None,
            custom_version: None,
            with_tags: false,
            fetch: false,
            write: false,
        }
    }
}

/// Everything `next` decided before anything is written
#[derive(Debug, Clone)]
pub struct NextPlan {
    pub branch: String,
    pub resolution: Resolution,
    /// Manifests to update, the root package first
    pub manifests: Vec<Manifest>,
    pub warnings: Vec<BoundaryWarning>,
}

/// Compute the next version for the package in `root`
///
/// Gates the branch policy, checks the working tree when writing, reads
/// tags when requested and resolves. Nothing is written.
pub fn plan_next<R: Repository + ?Sized>(
    repo: &R,
    config: &Config,
    root: &Path,
    opts: &NextOptions,
) -> Result<NextPlan> {
    let root_manifest = Manifest::load(root)?;
    let branch = repo.current_branch()?;

    let policy = BranchPolicy::new(&config.allowed_branches)?;
    policy.check(&BranchContext::new(&branch), opts.release_type)?;

    let mut warnings = Vec::new();

    if opts.write && !repo.is_clean()? {
        if !config.allow_dirty {
            return Err(BumpError::DirtyWorkingTree);
        }
        warnings.push(BoundaryWarning::DirtyWorkingTree);
    }

    let tags = if opts.with_tags || config.with_tags {
        let snapshot = gather_tags(repo, config, opts.fetch || config.remote_tags)?;
        warnings.extend(snapshot.warnings);
        snapshot.versions
    } else {
        Vec::new()
    };

    let resolution = ResolveRequest::new(root_manifest.version.to_string(), opts.release_type)
        .with_identifier(request_identifier(
            opts.release_type,
            opts.preid.as_deref(),
            &branch,
        ))
        .with_custom_target(opts.custom_version.clone())
        .resolve(&tags)?;
    info!(current = %resolution.current, next = %resolution.next, "resolved next version");

    let mut manifests = vec![root_manifest];
    if config.mode == WorkspaceMode::Monorepo {
        for manifest in workspace_manifests(root, &config.packages)? {
            if manifest.path != manifests[0].path {
                manifests.push(manifest);
            }
        }
    }

    Ok(NextPlan {
        branch,
        resolution,
        manifests,
        warnings,
    })
}

/// Files touched by [`apply_next`]
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedNext {
    pub written: Vec<PathBuf>,
    pub changelog: Option<PathBuf>,
}

/// Write the planned version
///
/// Runs the leading hooks, rewrites every planned manifest, prepends the
/// changelog section when enabled and runs the trailing hooks. A failing
/// hook stops the sequence; files already written stay written.
pub fn apply_next<R: Repository + ?Sized>(
    repo: &R,
    config: &Config,
    root: &Path,
    plan: &NextPlan,
    date: NaiveDate,
) -> Result<AppliedNext> {
    let resolution = &plan.resolution;
    let mut context = HookContext {
        hook_type: HookType::Leading,
        current_version: resolution.current.to_string(),
        new_version: resolution.next.to_string(),
        release_type: resolution.release_type.to_string(),
    };

    HookExecutor::run_all(&config.hooks.leading, &context, root)?;

    let mut written = Vec::new();
    for manifest in &plan.manifests {
        let mut manifest = manifest.clone();
        manifest.set_version(&resolution.next);
        manifest.save()?;
        info!(path = %manifest.path.display(), "version written");
        written.push(manifest.path);
    }

    let changelog = if config.changelog {
        let output = generate_changelog(
            repo,
            config,
            root,
            &ChangelogOptions {
                version: Some(resolution.next.to_string()),
                date,
                dry_run: false,
            },
        )?;
        Some(output.path)
    } else {
        None
    };

    context.hook_type = HookType::Trailing;
    HookExecutor::run_all(&config.hooks.trailing, &context, root)?;

    Ok(AppliedNext { written, changelog })
}

/// One row of the `list` table
#[derive(Debug)]
pub struct Candidate {
    pub release_type: ReleaseType,
    /// Set on the row that moves to the next prerelease channel
    pub channel: Option<String>,
    pub outcome: Result<Version>,
}

/// Next version for every release type
#[derive(Debug)]
pub struct CandidateList {
    pub current: Version,
    pub branch: String,
    pub candidates: Vec<Candidate>,
    pub warnings: Vec<BoundaryWarning>,
}

/// Options of the `list` command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    pub preid: Option<String>,
    pub with_tags: bool,
    pub fetch: bool,
}

/// Resolve every standard release type plus `branch`
///
/// When the current version sits on a known channel, one more `prerelease`
/// row moves to the following channel (`alpha` to `beta`, ...). A release
/// type that fails to resolve keeps its error in the table instead of
/// failing the command.
pub fn list_candidates<R: Repository + ?Sized>(
    repo: &R,
    config: &Config,
    root: &Path,
    opts: &ListOptions,
) -> Result<CandidateList> {
    let manifest = Manifest::load(root)?;
    let branch = repo.current_branch()?;

    let (tags, warnings) = if opts.with_tags || config.with_tags {
        let snapshot = gather_tags(repo, config, opts.fetch || config.remote_tags)?;
        (snapshot.versions, snapshot.warnings)
    } else {
        (Vec::new(), Vec::new())
    };

    let resolve = |release_type: ReleaseType, identifier: Option<String>| {
        ResolveRequest::new(manifest.version.to_string(), release_type)
            .with_identifier(identifier)
            .resolve(&tags)
            .map(|resolution| resolution.next)
    };

    // Branch releases only make sense off the release branches.
    let branch_row =
        (!BranchContext::new(&branch).is_release_branch()).then_some(ReleaseType::Branch);

    let mut candidates: Vec<Candidate> = ReleaseType::STANDARD
        .iter()
        .copied()
        .chain(branch_row)
        .map(|release_type| Candidate {
            release_type,
            channel: None,
            outcome: resolve(
                release_type,
                request_identifier(release_type, opts.preid.as_deref(), &branch),
            ),
        })
        .collect();

    let next_channel = identifier_of(&manifest.version)
        .as_deref()
        .and_then(next_identifier);
    if let Some(channel) = next_channel {
        candidates.push(Candidate {
            release_type: ReleaseType::Prerelease,
            channel: Some(channel.to_string()),
            outcome: resolve(ReleaseType::Prerelease, Some(channel.to_string())),
        });
    }

    Ok(CandidateList {
        current: manifest.version,
        branch,
        candidates,
        warnings,
    })
}

/// Options of the `changelog` command
#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogOptions {
    /// Version heading, the manifest version when `None`
    pub version: Option<String>,
    pub date: NaiveDate,
    pub dry_run: bool,
}

/// Rendered changelog section and where it goes
#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogOutput {
    pub path: PathBuf,
    pub section: String,
    /// Tag the commit range starts at
    pub since: Option<String>,
    pub commit_count: usize,
    pub warnings: Vec<BoundaryWarning>,
}

/// Changelog file to write: the configured file when it exists, else any
/// existing changelog, else the configured name
fn changelog_path(config: &Config, root: &Path) -> PathBuf {
    let configured = root.join(&config.changelog_file);
    if configured.is_file() {
        return configured;
    }
    find_changelog_file(root).unwrap_or(configured)
}

/// Render a section for the commits since the newest version tag below the
/// released version and prepend it to the changelog unless `dry_run` is set
pub fn generate_changelog<R: Repository + ?Sized>(
    repo: &R,
    config: &Config,
    root: &Path,
    opts: &ChangelogOptions,
) -> Result<ChangelogOutput> {
    let version = match &opts.version {
        Some(version) => crate::version::parse_version(version)?,
        None => Manifest::load(root)?.version,
    };

    let tags = collect_version_tags(repo, &config.tag_prefix)?;
    let since = normalize_tags(&tags)
        .into_iter()
        .find(|tagged| *tagged < version)
        .map(|latest| format_tag(&config.tag_prefix, &latest.to_string()));
    debug!(since = ?since, "collecting commits for changelog");

    let commits = repo.commits_since(since.as_deref())?;

    let mut warnings = Vec::new();
    if commits.is_empty() {
        if let Some(tag) = &since {
            warnings.push(BoundaryWarning::NoNewCommits {
                latest_tag: tag.clone(),
                current_commit_hash: repo.head_short_hash()?,
            });
        }
    }

    let section = render_section(&version.to_string(), opts.date, &commits);
    let path = changelog_path(config, root);

    if !opts.dry_run {
        prepend_section(&path, &section)?;
        info!(path = %path.display(), "changelog updated");
    }

    Ok(ChangelogOutput {
        path,
        section,
        since,
        commit_count: commits.len(),
        warnings,
    })
}

/// Branch policy verdict for the current branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchCheck {
    pub branch: String,
    pub release_type: ReleaseType,
    pub allowed: bool,
}

pub fn check_branch<R: Repository + ?Sized>(
    repo: &R,
    config: &Config,
    release_type: ReleaseType,
) -> Result<BranchCheck> {
    let branch = repo.current_branch()?;
    let policy = BranchPolicy::new(&config.allowed_branches)?;
    let allowed = policy.allows(&BranchContext::new(&branch), release_type);

    Ok(BranchCheck {
        branch,
        release_type,
        allowed,
    })
}
