//! Command line surface
//!
//! Argument definitions live here; the work is done in [`commands`].

pub mod commands;

use crate::domain::ReleaseType;
use crate::error::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "bump",
    version,
    about = "Compute and write the next semantic version of a package"
)]
pub struct Cli {
    #[arg(
        short = 'C',
        long,
        global = true,
        value_name = "DIR",
        help = "Run as if started in DIR"
    )]
    pub cwd: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Custom configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "Increase log verbosity (-v info, -vv debug)"
    )]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the next version and optionally write it
    Next(NextArgs),
    /// Show the next version for every release type
    List(ListArgs),
    /// Prepend a changelog section for the commits since the last tag
    Changelog(ChangelogArgs),
    /// Check whether the current branch may cut a release type
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct NextArgs {
    #[arg(
        value_name = "TYPE",
        help = "major, minor, patch, premajor, preminor, prepatch, prerelease, branch or custom"
    )]
    pub release_type: String,

    #[arg(long, value_name = "ID", help = "Prerelease identifier (alpha, beta, rc, ...)")]
    pub preid: Option<String>,

    #[arg(
        long = "version",
        value_name = "VERSION",
        help = "Target version for a custom release"
    )]
    pub custom_version: Option<String>,

    #[arg(long, help = "Cross-check the result against existing version tags")]
    pub with_tags: bool,

    #[arg(long, help = "Fetch tags from the remote first")]
    pub fetch: bool,

    #[arg(long, help = "Write the new version to the package manifests")]
    pub write: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    pub dry_run: bool,

    #[arg(short, long, help = "Skip confirmation prompts")]
    pub yes: bool,
}

impl NextArgs {
    pub fn release_type(&self) -> Result<ReleaseType> {
        self.release_type.parse()
    }
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long, value_name = "ID", help = "Prerelease identifier (alpha, beta, rc, ...)")]
    pub preid: Option<String>,

    #[arg(long, help = "Cross-check the results against existing version tags")]
    pub with_tags: bool,

    #[arg(long, help = "Fetch tags from the remote first")]
    pub fetch: bool,
}

#[derive(Debug, Args)]
pub struct ChangelogArgs {
    #[arg(
        long = "version",
        value_name = "VERSION",
        help = "Version heading, defaults to the manifest version"
    )]
    pub release_version: Option<String>,

    #[arg(long, help = "Print the section without writing it")]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[arg(value_name = "TYPE", help = "Release type to check")]
    pub release_type: String,
}

impl CheckArgs {
    pub fn release_type(&self) -> Result<ReleaseType> {
        self.release_type.parse()
    }
}
