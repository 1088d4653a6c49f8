mod commands;
mod config;
mod diagnostics;
mod error;
mod navigation;
mod ordering;
mod paginator;
mod store;
mod summary;
mod types;

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use crate::navigation::Jump;

/// Command-line interface for browsing a submission's review comments.
#[derive(Parser)]
#[command(
    name = "commentnav",
    version,
    about = "Stable pagination and jump-to-comment navigation for review comments"
)]
struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    command: Commands,
    /// Only log errors
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// JSON comment store to read (overrides `store` in .commentnav.toml)
    #[arg(long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// The three read endpoints: summary, navigate, locate.
#[derive(Subcommand)]
enum Commands {
    /// Find the page holding a comment, the first comment, or the first unresolved one
    Locate(LocateArgs),
    /// Show one page of comments with first/previous/next/last targets
    Navigate {
        /// Open the page that holds this comment instead of `--page`
        #[arg(long, value_name = "COMMENT", conflicts_with = "page")]
        at: Option<String>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
        /// Page size (defaults to `default_limit` from config)
        #[arg(long, short)]
        limit: Option<NonZeroUsize>,
        /// One-based page; out-of-range values clamp to the nearest page
        #[arg(long, short, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,
        /// Submission whose comments to page through
        submission: String,
    },
    /// Show comment counts, per-section breakdown, and jump targets
    Summary {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
        /// Submission to summarize
        submission: String,
    },
}

/// Arguments for `locate`. Exactly one target must be given.
#[derive(Args)]
#[command(group = clap::ArgGroup::new("target").required(true))]
struct LocateArgs {
    /// Comment id to find
    #[arg(index = 2, group = "target")]
    comment: Option<String>,
    /// Jump to the first comment in navigation order
    #[arg(long, group = "target")]
    first: bool,
    /// Jump to the first unresolved comment
    #[arg(long, group = "target")]
    first_unresolved: bool,
    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
    /// Page size (defaults to `default_limit` from config)
    #[arg(long, short)]
    limit: Option<NonZeroUsize>,
    /// Submission the comment belongs to
    #[arg(index = 1)]
    submission: String,
}

impl LocateArgs {
    /// The jump target selected on the command line.
    fn jump(&self) -> Jump {
        if self.first {
            return Jump::First;
        }
        if self.first_unresolved {
            return Jump::FirstUnresolved;
        }
        return self.comment.clone().map_or(Jump::First, Jump::Comment);
    }
}

/// Set up stderr logging. `RUST_LOG` wins over the default filter; the flags win over both.
fn init_logging(quiet: bool, verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

/// Parse arguments, run one command, and map any error to its exit code.
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);
    let store = cli.store.as_deref();

    let result = match &cli.command {
        Commands::Locate(args) => {
            commands::locate(store, &args.submission, &args.jump(), args.limit, args.json)
        },
        Commands::Navigate { at, json, limit, page, submission } => {
            let target = at
                .as_deref()
                .map_or(commands::PageTarget::Number(*page), commands::PageTarget::Comment);
            commands::navigate(store, submission, target, *limit, *json)
        },
        Commands::Summary { json, submission } => commands::summary(store, submission, *json),
    };

    return match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("command failed: {e:?}");
            diagnostics::print_error(&e);
            diagnostics::exit_code(&e)
        },
    };
}
