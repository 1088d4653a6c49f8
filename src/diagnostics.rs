use std::io::IsTerminal as _;
use std::process::ExitCode;

use crate::error::Error;

/// ANSI bold, used for markdown headings on a terminal.
const BOLD: &str = "\x1b[1m";
/// ANSI reset.
const RESET: &str = "\x1b[0m";

/// Map an error to the process exit code callers script against.
///
/// `1` not found or nothing to jump to, `2` data integrity, `3` store unavailable, `4` anything else.
pub fn exit_code(e: &Error) -> ExitCode {
    return match e {
        Error::DataIntegrity { .. } => ExitCode::from(2),
        Error::Io(_) | Error::Json(_) | Error::TomlDe(_) => ExitCode::from(4),
        Error::NoJumpTarget { .. } | Error::NotFound { .. } => ExitCode::from(1),
        Error::StoreUnavailable { .. } => ExitCode::from(3),
    };
}

/// Render an error as markdown and print to stderr, with bold headings on a terminal.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    let bold = std::io::stderr().is_terminal();
    for line in md.lines() {
        if bold && line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Corrupt record: which comment, what is missing, and the invariants it must meet.
fn render_data_integrity(comment_id: &str, reason: &str) -> String {
    return format!("\
# Error: Data Integrity

Comment `{comment_id}` is corrupt: {reason}.

Every comment needs an `id`, a `submissionId`, and a non-blank `standardCode`,
and ids must be unique within a submission.

## Fix

Repair the record in the comment store. It is never skipped silently.
");
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is one, how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::DataIntegrity { comment_id, reason } => render_data_integrity(comment_id, reason),
        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        Error::Json(e) => format!("\
# Error: JSON Serialization

{e}
"),
        Error::NoJumpTarget { submission_id, target } => render_no_jump_target(submission_id, target),
        Error::NotFound { comment_id, submission_id } => render_not_found(comment_id, submission_id),
        Error::StoreUnavailable { path, reason } => render_store_unavailable(path, reason),
        Error::TomlDe(e) => format!("\
# Error: Invalid Config

{e}

## Fix

Check `.commentnav.toml`. Known keys: `store`, `default_limit`, `max_limit`.
"),
    };
}

/// `--first` on an empty submission, or `--first-unresolved` with everything resolved.
fn render_no_jump_target(submission_id: &str, target: &str) -> String {
    return format!("\
# Error: Nothing To Jump To

Submission `{submission_id}` has no {target}.

## Fix

Check the counts before jumping:

    commentnav summary {submission_id}
");
}

/// Unknown comment id for the submission.
fn render_not_found(comment_id: &str, submission_id: &str) -> String {
    return format!("\
# Error: Comment Not Found

`{comment_id}` is not a comment of submission `{submission_id}`.

## Fix

List the submission's comments page by page:

    commentnav navigate {submission_id}
");
}

/// Store file missing, unreadable, or not JSON.
fn render_store_unavailable(path: &std::path::Path, reason: &str) -> String {
    return format!("\
# Error: Store Unavailable

Could not read `{}`: {reason}

## Fix

Point `store` in `.commentnav.toml` (or `--store`) at a JSON array of comments.
", path.display());
}
