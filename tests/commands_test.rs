// tests/commands_test.rs
use bump_version::boundary::BoundaryWarning;
use bump_version::cli::commands::{
    apply_next, generate_changelog, list_candidates, plan_next, ChangelogOptions, ListOptions,
    NextOptions,
};
use bump_version::config::{Config, WorkspaceMode};
use bump_version::domain::ReleaseType;
use bump_version::error::EXIT_BRANCH_NOT_ALLOWED;
use bump_version::git::MockRepository;
use bump_version::BumpError;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_package(dir: &Path, name: &str, version: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("package.json"),
        format!(
            "{{\n  \"name\": \"{}\",\n  \"version\": \"{}\"\n}}\n",
            name, version
        ),
    )
    .unwrap();
}

fn read_version(dir: &Path) -> String {
    let content = fs::read_to_string(dir.join("package.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    json["version"].as_str().unwrap().to_string()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
}

fn options(release_type: ReleaseType) -> NextOptions {
    NextOptions::new(release_type)
}

#[test]
fn test_plan_without_tags_uses_manifest_version() {
    let root = TempDir::new().unwrap();
    write_package(root.path(), "demo", "1.3.1");
    let mut repo = MockRepository::new();
    repo.add_tag("v1.3.4");

    let plan = plan_next(&repo, &Config::default(), root.path(), &options(ReleaseType::Patch))
        .unwrap();
    assert_eq!(plan.branch, "main");
    assert_eq!(plan.resolution.next.to_string(), "1.3.2");
    assert_eq!(plan.manifests.len(), 1);
    assert!(plan.warnings.is_empty());
}

#[test]
fn test_plan_with_tags_skips_published_versions() {
    let root = TempDir::new().unwrap();
    write_package(root.path(), "demo", "1.3.1");
    let mut repo = MockRepository::new();
    repo.add_tag("v1.3.2");
    repo.add_tag("v1.3.4");

    let opts = NextOptions {
        with_tags: true,
        ..options(ReleaseType::Patch)
    };
    let plan = plan_next(&repo, &Config::default(), root.path(), &opts).unwrap();
    assert_eq!(plan.resolution.next.to_string(), "1.3.5");
    assert_eq!(
        plan.resolution.base.as_ref().map(|v| v.to_string()),
        Some("1.3.4".to_string())
    );
}

#[test]
fn test_plan_with_tags_from_config_and_fetch() {
    let root = TempDir::new().unwrap();
    write_package(root.path(), "demo", "1.0.0-beta.0");
    let mut repo = MockRepository::new();
    repo.add_remote("origin", &["v1.0.0-beta.0", "v1.0.0-beta.1"]);

    let config = Config {
        with_tags: true,
        remote_tags: true,
        ..Config::default()
    };
    let plan = plan_next(&repo, &config, root.path(), &options(ReleaseType::Prerelease)).unwrap();
    assert_eq!(plan.resolution.next.to_string(), "1.0.0-beta.2");
    assert_eq!(plan.resolution.identifier.as_deref(), Some("beta"));
}

#[test]
fn test_plan_rejects_disallowed_branch() {
    let root = TempDir::new().unwrap();
    write_package(root.path(), "demo", "1.0.0");
    let mut repo = MockRepository::new();
    repo.set_branch("feature/login");

    let err = plan_next(&repo, &Config::default(), root.path(), &options(ReleaseType::Minor))
        .unwrap_err();
    assert!(matches!(err, BumpError::BranchNotAllowed { .. }));
    assert_eq!(err.exit_code(), EXIT_BRANCH_NOT_ALLOWED);
}

#[test]
fn test_branch_release_uses_branch_name() {
    let root = TempDir::new().unwrap();
    write_package(root.path(), "demo", "1.0.0");
    let mut repo = MockRepository::new();
    repo.set_branch("feature/Login");

    let plan = plan_next(&repo, &Config::default(), root.path(), &options(ReleaseType::Branch))
        .unwrap();
    assert_eq!(plan.resolution.next.to_string(), "1.0.1-feature-login.0");
}

#[test]
fn test_dirty_tree_blocks_writing() {
    let root = TempDir::new().unwrap();
    write_package(root.path(), "demo", "1.0.0");
    let mut repo = MockRepository::new();
    repo.set_clean(false);

    let opts = NextOptions {
        write: true,
        ..options(ReleaseType::Patch)
    };
    let err = plan_next(&repo, &Config::default(), root.path(), &opts).unwrap_err();
    assert!(matches!(err, BumpError::DirtyWorkingTree));

    let config = Config {
        allow_dirty: true,
        ..Config::default()
    };
    let plan = plan_next(&repo, &config, root.path(), &opts).unwrap();
    assert_eq!(plan.warnings, vec![BoundaryWarning::DirtyWorkingTree]);

    // Only writing needs a clean tree
    assert!(plan_next(&repo, &Config::default(), root.path(), &options(ReleaseType::Patch)).is_ok());
}

#[test]
fn test_missing_manifest() {
    let root = TempDir::new().unwrap();
    let repo = MockRepository::new();

    let err = plan_next(&repo, &Config::default(), root.path(), &options(ReleaseType::Patch))
        .unwrap_err();
    assert!(matches!(err, BumpError::Manifest(_)));
}

#[test]
fn test_apply_writes_monorepo_and_runs_hooks() {
    let root = TempDir::new().unwrap();
    write_package(root.path(), "root", "1.3.0");
    write_package(&root.path().join("packages/a"), "a", "1.3.0");
    write_package(&root.path().join("packages/b"), "b", "1.2.0");
    let repo = MockRepository::new();

    let mut config = Config {
        mode: WorkspaceMode::Monorepo,
        packages: vec!["packages/*".to_string()],
        ..Config::default()
    };
    config.hooks.leading = vec!["echo ${CURRENT_VERSION} > leading.txt".to_string()];
    config.hooks.trailing =
        vec!["grep -q '\"version\": \"${NEW_VERSION}\"' package.json".to_string()];

    let plan = plan_next(&repo, &config, root.path(), &options(ReleaseType::Minor)).unwrap();
    assert_eq!(plan.manifests.len(), 3);

    let applied = apply_next(&repo, &config, root.path(), &plan, date()).unwrap();
    assert_eq!(applied.written.len(), 3);
    assert_eq!(applied.changelog, None);

    assert_eq!(read_version(root.path()), "1.4.0");
    assert_eq!(read_version(&root.path().join("packages/a")), "1.4.0");
    assert_eq!(read_version(&root.path().join("packages/b")), "1.4.0");
    assert_eq!(
        fs::read_to_string(root.path().join("leading.txt")).unwrap().trim(),
        "1.3.0"
    );
}

#[test]
fn test_failing_leading_hook_writes_nothing() {
    let root = TempDir::new().unwrap();
    write_package(root.path(), "demo", "1.0.0");
    let repo = MockRepository::new();

    let mut config = Config::default();
    config.hooks.leading = vec!["exit 1".to_string()];

    let plan = plan_next(&repo, &config, root.path(), &options(ReleaseType::Patch)).unwrap();
    let err = apply_next(&repo, &config, root.path(), &plan, date()).unwrap_err();

    assert!(matches!(err, BumpError::Hook(_)));
    assert_eq!(read_version(root.path()), "1.0.0");
}

#[test]
fn test_apply_with_changelog() {
    let root = TempDir::new().unwrap();
    write_package(root.path(), "demo", "1.0.0");
    let mut repo = MockRepository::new();
    repo.add_commit("feat: initial release");
    repo.add_tag("v1.0.0");
    repo.add_commit("fix(cli): respect --cwd");

    let config = Config {
        changelog: true,
        ..Config::default()
    };
    let plan = plan_next(&repo, &config, root.path(), &options(ReleaseType::Patch)).unwrap();
    let applied = apply_next(&repo, &config, root.path(), &plan, date()).unwrap();

    let path = applied.changelog.unwrap();
    assert_eq!(path, root.path().join("CHANGELOG.md"));
    let content = fs::read_to_string(path).unwrap();
    assert!(content.starts_with("## 1.0.1 (2024-05-20)"));
    assert!(content.contains("* **cli:** respect --cwd (0000002)"));
    assert!(!content.contains("initial release"));
}

#[test]
fn test_list_candidates() {
    let root = TempDir::new().unwrap();
    write_package(root.path(), "demo", "1.0.0");
    let mut repo = MockRepository::new();
    repo.set_branch("develop");

    let list = list_candidates(&repo, &Config::default(), root.path(), &ListOptions::default())
        .unwrap();
    let rows: Vec<(String, String)> = list
        .candidates
        .iter()
        .map(|c| {
            (
                c.release_type.to_string(),
                c.outcome.as_ref().map(|v| v.to_string()).unwrap(),
            )
        })
        .collect();

    assert_eq!(list.branch, "develop");
    assert_eq!(rows.len(), 8);
    assert!(rows.contains(&("major".to_string(), "2.0.0".to_string())));
    assert!(rows.contains(&("preminor".to_string(), "1.1.0-alpha.0".to_string())));
    assert!(rows.contains(&("branch".to_string(), "1.0.1-develop.0".to_string())));
}

#[test]
fn test_list_omits_branch_row_on_release_branch() {
    let root = TempDir::new().unwrap();
    write_package(root.path(), "demo", "1.0.0");
    let mut repo = MockRepository::new();
    repo.set_branch("main");

    let list = list_candidates(&repo, &Config::default(), root.path(), &ListOptions::default())
        .unwrap();
    assert_eq!(list.candidates.len(), 7);
    assert!(list
        .candidates
        .iter()
        .all(|c| c.release_type != ReleaseType::Branch));
}

#[test]
fn test_list_offers_next_channel() {
    let root = TempDir::new().unwrap();
    write_package(root.path(), "demo", "1.0.0-alpha.2");
    let mut repo = MockRepository::new();
    repo.add_commit("feat: first");
    repo.add_tag("v1.0.0-alpha.2");
    repo.add_tag("v1.0.0-beta.0");
    repo.add_tag("v1.0.0-beta.1");

    let opts = ListOptions {
        with_tags: true,
        ..ListOptions::default()
    };
    let list = list_candidates(&repo, &Config::default(), root.path(), &opts).unwrap();
    assert_eq!(list.candidates.len(), 8);

    let plain = list
        .candidates
        .iter()
        .find(|c| c.release_type == ReleaseType::Prerelease && c.channel.is_none())
        .unwrap();
    assert_eq!(plain.outcome.as_ref().unwrap().to_string(), "1.0.0-alpha.3");

    let next_channel = list.candidates.last().unwrap();
    assert_eq!(next_channel.release_type, ReleaseType::Prerelease);
    assert_eq!(next_channel.channel.as_deref(), Some("beta"));
    assert_eq!(next_channel.outcome.as_ref().unwrap().to_string(), "1.0.0-beta.2");
}

#[test]
fn test_list_has_no_channel_past_rc() {
    let root = TempDir::new().unwrap();
    write_package(root.path(), "demo", "1.0.0-rc.0");
    let repo = MockRepository::new();

    let list = list_candidates(&repo, &Config::default(), root.path(), &ListOptions::default())
        .unwrap();
    assert_eq!(list.candidates.len(), 7);
    assert!(list.candidates.iter().all(|c| c.channel.is_none()));
}

#[test]
fn test_list_keeps_failures_per_row() {
    let root = TempDir::new().unwrap();
    write_package(root.path(), "demo", "1.0.0");
    let repo = MockRepository::new();

    let opts = ListOptions {
        preid: Some("not valid".to_string()),
        ..ListOptions::default()
    };
    let list = list_candidates(&repo, &Config::default(), root.path(), &opts).unwrap();
    assert!(list.candidates.iter().all(|c| c.outcome.is_err()));
}

#[test]
fn test_changelog_dry_run_and_write() {
    let root = TempDir::new().unwrap();
    write_package(root.path(), "demo", "1.1.0");
    fs::write(root.path().join("CHANGELOG.md"), "# Changelog\n").unwrap();

    let mut repo = MockRepository::new();
    repo.add_commit("feat: first");
    repo.add_tag("v1.0.0");
    repo.add_commit("feat(api): add endpoint");
    repo.add_commit("perf: cache tags");

    let dry = generate_changelog(
        &repo,
        &Config::default(),
        root.path(),
        &ChangelogOptions {
            version: None,
            date: date(),
            dry_run: true,
        },
    )
    .unwrap();
    assert_eq!(dry.since.as_deref(), Some("v1.0.0"));
    assert_eq!(dry.commit_count, 2);
    assert!(dry.section.contains("### Performance Improvements"));
    assert_eq!(
        fs::read_to_string(root.path().join("CHANGELOG.md")).unwrap(),
        "# Changelog\n"
    );

    generate_changelog(
        &repo,
        &Config::default(),
        root.path(),
        &ChangelogOptions {
            version: None,
            date: date(),
            dry_run: false,
        },
    )
    .unwrap();
    let content = fs::read_to_string(root.path().join("CHANGELOG.md")).unwrap();
    assert!(content.starts_with("# Changelog\n\n## 1.1.0 (2024-05-20)\n"));
}

#[test]
fn test_changelog_range_ignores_newer_lines() {
    let root = TempDir::new().unwrap();
    write_package(root.path(), "demo", "1.3.4");
    let mut repo = MockRepository::new();
    repo.add_commit("feat: first");
    repo.add_tag("v1.3.4");
    repo.add_commit("feat: next major");
    repo.add_tag("v2.0.0");
    repo.add_commit("fix: backport");

    let output = generate_changelog(
        &repo,
        &Config::default(),
        root.path(),
        &ChangelogOptions {
            version: Some("1.3.5".to_string()),
            date: date(),
            dry_run: true,
        },
    )
    .unwrap();

    assert_eq!(output.since.as_deref(), Some("v1.3.4"));
    assert_eq!(output.commit_count, 2);
    assert!(output.section.starts_with("## 1.3.5 (2024-05-20)\n"));
}

#[test]
fn test_changelog_without_new_commits_warns() {
    let root = TempDir::new().unwrap();
    write_package(root.path(), "demo", "1.1.0");
    let mut repo = MockRepository::new();
    repo.add_commit("feat: first");
    repo.add_tag("v1.0.0");

    let output = generate_changelog(
        &repo,
        &Config::default(),
        root.path(),
        &ChangelogOptions {
            version: Some("1.0.1".to_string()),
            date: date(),
            dry_run: true,
        },
    )
    .unwrap();

    assert_eq!(output.commit_count, 0);
    assert!(output.section.contains("No notable changes."));
    assert!(matches!(
        output.warnings[0],
        BoundaryWarning::NoNewCommits { .. }
    ));
}
