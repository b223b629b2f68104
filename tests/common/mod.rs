use git2::{Oid, Repository, RepositoryInitOptions, Signature};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Fresh repository on `main` with one committed package.json
pub fn setup_test_repo(version: &str) -> (TempDir, Repository) {
    let temp_dir = TempDir::new().expect("Could not create temp dir");

    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("main");
    let repo = Repository::init_opts(temp_dir.path(), &opts).expect("Could not init git repo");

    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
    }

    write_package(temp_dir.path(), version);
    commit_all(&repo, "feat: initial commit");

    (temp_dir, repo)
}

pub fn write_package(dir: &Path, version: &str) {
    fs::write(
        dir.join("package.json"),
        format!("{{\n  \"name\": \"demo\",\n  \"version\": \"{}\"\n}}\n", version),
    )
    .expect("Could not write package.json");
}

/// Stage every file in the work tree and commit on HEAD
pub fn commit_all(repo: &Repository, message: &str) -> Oid {
    let mut index = repo.index().expect("Could not get index");
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .expect("Could not add files to index");
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let sig = Signature::now("Test User", "test@example.com").expect("Could not get sig");

    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("Could not create commit")
}

pub fn tag_head(repo: &Repository, name: &str) {
    let head = repo
        .head()
        .and_then(|head| head.peel_to_commit())
        .expect("Could not resolve HEAD");
    repo.tag_lightweight(name, head.as_object(), false)
        .expect("Could not create tag");
}
