//! Formatting functions for UI output.
//!
//! `format_*` functions build the text and are tested; `display_*` wrappers
//! print it. Styling goes through `console`, which drops colors when the
//! output is not a terminal.

use crate::boundary::BoundaryWarning;
use crate::cli::commands::{BranchCheck, CandidateList, ChangelogOutput};
use crate::manifest::Manifest;
use crate::resolver::Resolution;
use console::style;
use semver::Version;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// `current → next`, followed by the tag the result was derived from
pub fn format_resolution(resolution: &Resolution, tag_prefix: &str) -> String {
    let mut line = format!(
        "{} → {}",
        style(&resolution.current).red(),
        style(&resolution.next).green().bold()
    );
    if let Some(base) = &resolution.base {
        line.push_str(&format!(
            " {}",
            style(format!("(from tag {}{})", tag_prefix, base)).dim()
        ));
    }
    line
}

pub fn display_resolution(resolution: &Resolution, tag_prefix: &str) {
    println!("{}", format_resolution(resolution, tag_prefix));
}

/// Table of next versions, one release type per line
pub fn format_candidates(list: &CandidateList) -> String {
    let mut out = format!(
        "{} {} on {}\n",
        style("Current version:").bold(),
        list.current,
        style(&list.branch).cyan()
    );
    for candidate in &list.candidates {
        let outcome = match &candidate.outcome {
            Ok(version) => style(version.to_string()).green().to_string(),
            Err(e) => style(e.to_string()).red().to_string(),
        };
        let label = match &candidate.channel {
            Some(channel) => format!("{} ({})", candidate.release_type, channel),
            None => candidate.release_type.to_string(),
        };
        out.push_str(&format!("  {:<20}{}\n", label, outcome));
    }
    out
}

pub fn display_candidates(list: &CandidateList) {
    print!("{}", format_candidates(list));
}

/// Per-package `name  old -> new` lines
pub fn format_manifest_changes(manifests: &[Manifest], next: &Version) -> String {
    manifests
        .iter()
        .map(|manifest| {
            format!(
                "  {:<20}{} -> {}\n",
                style(manifest.display_name()).cyan(),
                manifest.version,
                style(next).yellow()
            )
        })
        .collect()
}

pub fn display_manifest_changes(manifests: &[Manifest], next: &Version) {
    print!("{}", format_manifest_changes(manifests, next));
}

pub fn display_changelog(output: &ChangelogOutput, dry_run: bool) {
    let range = match &output.since {
        Some(tag) => format!("since {}", tag),
        None => "in history".to_string(),
    };
    display_status(&format!("{} commits {}", output.commit_count, range));

    if dry_run {
        println!("\n{}", output.section);
    } else {
        display_success(&format!("Updated {}", output.path.display()));
    }
}

pub fn format_branch_check(check: &BranchCheck) -> String {
    if check.allowed {
        format!(
            "Branch '{}' may cut a {} release",
            check.branch, check.release_type
        )
    } else {
        format!(
            "Branch '{}' is not allowed to cut a {} release",
            check.branch, check.release_type
        )
    }
}
