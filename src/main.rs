use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bump_version::cli::commands::{self, ChangelogOptions, ListOptions, NextOptions};
use bump_version::cli::{ChangelogArgs, CheckArgs, Cli, Command, ListArgs, NextArgs};
use bump_version::config::{self, Config};
use bump_version::error::{BumpError, EXIT_BRANCH_NOT_ALLOWED, EXIT_GENERAL_ERROR, EXIT_SUCCESS};
use bump_version::git::Git2Repository;
use bump_version::ui;

const LOG_ENV: &str = "BUMP_LOG";

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            ui::display_error(&format!("{:#}", err));
            err.downcast_ref::<BumpError>()
                .map_or(EXIT_GENERAL_ERROR, BumpError::exit_code)
        }
    };

    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let root = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine the working directory")?,
    };
    let config = config::load_config(cli.config.as_deref(), &root)?;

    match cli.command {
        Command::Next(args) => run_next(&root, &config, args),
        Command::List(args) => run_list(&root, &config, args),
        Command::Changelog(args) => run_changelog(&root, &config, args),
        Command::Check(args) => run_check(&root, &config, args),
    }
}

fn open_repo(root: &Path) -> Result<Git2Repository> {
    Git2Repository::open(root)
        .with_context(|| format!("Not in a git repository: {}", root.display()))
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn run_next(root: &Path, config: &Config, args: NextArgs) -> Result<i32> {
    let release_type = args.release_type()?;
    let repo = open_repo(root)?;

    let opts = NextOptions {
        release_type,
        preid: args.preid.clone(),
        custom_version: args.custom_version.clone(),
        with_tags: args.with_tags,
        fetch: args.fetch,
        write: args.write && !args.dry_run,
    };
    let plan = commands::plan_next(&repo, config, root, &opts)?;

    for warning in &plan.warnings {
        ui::display_boundary_warning(warning);
    }
    ui::display_resolution(&plan.resolution, &config.tag_prefix);

    if !args.write {
        return Ok(EXIT_SUCCESS);
    }

    let next = &plan.resolution.next;
    ui::display_manifest_changes(&plan.manifests, next);

    if args.dry_run {
        ui::display_status(&format!(
            "Dry run: would run {} leading hook(s), write {} manifest(s){}, run {} trailing hook(s)",
            config.hooks.leading.len(),
            plan.manifests.len(),
            if config.changelog {
                " and the changelog"
            } else {
                ""
            },
            config.hooks.trailing.len()
        ));
        return Ok(EXIT_SUCCESS);
    }

    if !args.yes && !ui::confirm_action(&format!("Write version {}?", next))? {
        println!("Operation cancelled by user.");
        return Ok(EXIT_SUCCESS);
    }

    let applied = commands::apply_next(&repo, config, root, &plan, today())?;
    for path in &applied.written {
        ui::display_success(&format!("Updated {}", path.display()));
    }
    if let Some(path) = &applied.changelog {
        ui::display_success(&format!("Updated {}", path.display()));
    }

    Ok(EXIT_SUCCESS)
}

fn run_list(root: &Path, config: &Config, args: ListArgs) -> Result<i32> {
    let repo = open_repo(root)?;
    let opts = ListOptions {
        preid: args.preid,
        with_tags: args.with_tags,
        fetch: args.fetch,
    };

    let list = commands::list_candidates(&repo, config, root, &opts)?;
    for warning in &list.warnings {
        ui::display_boundary_warning(warning);
    }
    ui::display_candidates(&list);

    Ok(EXIT_SUCCESS)
}

fn run_changelog(root: &Path, config: &Config, args: ChangelogArgs) -> Result<i32> {
    let repo = open_repo(root)?;
    let opts = ChangelogOptions {
        version: args.release_version,
        date: today(),
        dry_run: args.dry_run,
    };

    let output = commands::generate_changelog(&repo, config, root, &opts)?;
    for warning in &output.warnings {
        ui::display_boundary_warning(warning);
    }
    ui::display_changelog(&output, args.dry_run);

    Ok(EXIT_SUCCESS)
}

fn run_check(root: &Path, config: &Config, args: CheckArgs) -> Result<i32> {
    let release_type = args.release_type()?;
    let repo = open_repo(root)?;

    let check = commands::check_branch(&repo, config, release_type)?;
    let message = ui::formatter::format_branch_check(&check);

    if check.allowed {
        ui::display_success(&message);
        Ok(EXIT_SUCCESS)
    } else {
        ui::display_error(&message);
        Ok(EXIT_BRANCH_NOT_ALLOWED)
    }
}
