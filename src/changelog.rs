use crate::domain::{ChangeKind, ParsedCommit};
use crate::error::Result;
use crate::git::CommitInfo;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File names recognised as an existing changelog, in lookup order
pub const CHANGELOG_FILE_NAMES: [&str; 4] = ["CHANGELOG.md", "CHANGELOG", "changelog.md", "changelog"];

/// Render the changelog section for one release
///
/// Conventional commits are grouped by kind; commits that are neither
/// breaking, features, fixes nor performance work are left out.
pub fn render_section(version: &str, date: NaiveDate, commits: &[CommitInfo]) -> String {
    let mut groups: BTreeMap<ChangeKind, Vec<String>> = BTreeMap::new();

    for commit in commits {
        let parsed = ParsedCommit::parse(&commit.message);
        let kind = parsed.kind();
        if kind == ChangeKind::Other {
            continue;
        }

        let entry = match &parsed.scope {
            Some(scope) => format!("* **{}:** {} ({})", scope, parsed.description, commit.hash),
            None => format!("* {} ({})", parsed.description, commit.hash),
        };
        groups.entry(kind).or_default().push(entry);
    }

    let mut section = format!("## {} ({})\n", version, date.format("%Y-%m-%d"));

    if groups.is_empty() {
        section.push_str("\nNo notable changes.\n");
        return section;
    }

    for (kind, entries) in groups {
        section.push_str(&format!("\n### {}\n\n", kind.heading()));
        for entry in entries {
            section.push_str(&entry);
            section.push('\n');
        }
    }

    section
}

/// Existing changelog file in `root`, if any
pub fn find_changelog_file(root: &Path) -> Option<PathBuf> {
    CHANGELOG_FILE_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

/// Write `section` above the existing entries of the changelog at `path`
///
/// A leading `# ` title line stays on top. The file is created when missing.
pub fn prepend_section(path: &Path, section: &str) -> Result<()> {
    let existing = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let section = section.trim_end();
    let content = match existing.split_once('\n') {
        Some((title, rest)) if title.starts_with("# ") => {
            format!("{}\n\n{}\n\n{}", title, section, rest.trim_start())
        }
        _ if existing.trim().is_empty() => format!("{}\n", section),
        _ => format!("{}\n\n{}", section, existing),
    };

    fs::write(path, content.trim_end().to_string() + "\n")?;
    Ok(())
}
