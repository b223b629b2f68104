// tests/git_test.rs
mod common;

use bump_version::git::{collect_version_tags, Git2Repository, Repository};
use bump_version::BumpError;
use common::{commit_all, setup_test_repo, tag_head, write_package};
use std::fs;

#[test]
fn test_branch_and_head() {
    let (temp_dir, _repo) = setup_test_repo("1.0.0");
    let repo = Git2Repository::open(temp_dir.path()).unwrap();

    assert_eq!(repo.current_branch().unwrap(), "main");
    assert_eq!(repo.head_short_hash().unwrap().len(), 7);
}

#[test]
fn test_open_discovers_from_subdirectory() {
    let (temp_dir, _repo) = setup_test_repo("1.0.0");
    let nested = temp_dir.path().join("packages/a");
    fs::create_dir_all(&nested).unwrap();

    let repo = Git2Repository::open(&nested).unwrap();
    assert_eq!(repo.current_branch().unwrap(), "main");
}

#[test]
fn test_list_and_collect_tags() {
    let (temp_dir, git) = setup_test_repo("1.0.0");
    tag_head(&git, "v1.0.0");
    tag_head(&git, "docs-2024");

    let repo = Git2Repository::open(temp_dir.path()).unwrap();
    let mut tags = repo.list_tags().unwrap();
    tags.sort();
    assert_eq!(tags, vec!["docs-2024", "v1.0.0"]);
    assert_eq!(collect_version_tags(&repo, "v").unwrap(), vec!["1.0.0"]);
}

#[test]
fn test_is_clean_ignores_untracked_files() {
    let (temp_dir, _git) = setup_test_repo("1.0.0");
    let repo = Git2Repository::open(temp_dir.path()).unwrap();
    assert!(repo.is_clean().unwrap());

    fs::write(temp_dir.path().join("notes.txt"), "scratch").unwrap();
    assert!(repo.is_clean().unwrap());

    write_package(temp_dir.path(), "1.0.1");
    assert!(!repo.is_clean().unwrap());
}

#[test]
fn test_commits_since_tag() {
    let (temp_dir, git) = setup_test_repo("1.0.0");
    tag_head(&git, "v1.0.0");

    write_package(temp_dir.path(), "1.0.1");
    commit_all(&git, "fix: first fix");
    write_package(temp_dir.path(), "1.0.2");
    commit_all(&git, "feat: second change");

    let repo = Git2Repository::open(temp_dir.path()).unwrap();
    let since: Vec<String> = repo
        .commits_since(Some("v1.0.0"))
        .unwrap()
        .into_iter()
        .map(|c| c.message)
        .collect();
    assert_eq!(since, vec!["fix: first fix", "feat: second change"]);

    assert_eq!(repo.commits_since(None).unwrap().len(), 3);
    assert!(matches!(
        repo.commits_since(Some("v9.9.9")).unwrap_err(),
        BumpError::Tag(_)
    ));
}

#[test]
fn test_fetch_tags_from_local_remote() {
    let (upstream_dir, upstream) = setup_test_repo("1.0.0");
    tag_head(&upstream, "v1.0.0");
    tag_head(&upstream, "v1.1.0-beta.0");

    let (temp_dir, git) = setup_test_repo("1.0.0");
    let url = upstream_dir.path().to_str().unwrap().to_string();
    git.remote("origin", &url).unwrap();

    let repo = Git2Repository::open(temp_dir.path()).unwrap();
    assert!(repo.list_tags().unwrap().is_empty());

    repo.fetch_tags("origin").unwrap();
    let mut tags = repo.list_tags().unwrap();
    tags.sort();
    assert_eq!(tags, vec!["v1.0.0", "v1.1.0-beta.0"]);
}

#[test]
fn test_fetch_from_unknown_remote() {
    let (temp_dir, _git) = setup_test_repo("1.0.0");
    let repo = Git2Repository::open(temp_dir.path()).unwrap();

    assert!(matches!(
        repo.fetch_tags("upstream").unwrap_err(),
        BumpError::Remote(_)
    ));
}
