//! CLI commands for commentnav: summary, navigate, locate.

use std::fmt::Write as _;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::Config;
use crate::error;
use crate::navigation::{self, Jump, Location, NavigationData};
use crate::store::JsonFileStore;
use crate::summary::CommentSummary;
use crate::types::CommentRef;

/// Longest excerpt of selected text shown per line in text output.
const EXCERPT_CHARS: usize = 60;

/// Which page `navigate` should open.
#[derive(Clone, Copy)]
pub enum PageTarget<'a> {
    /// The page holding this comment id.
    Comment(&'a str),
    /// A client-supplied page number, clamped into range.
    Number(i64),
}

/// Shorten selected text to one line for terminal display. JSON output is never shortened.
fn excerpt(text: &str) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= EXCERPT_CHARS {
        return flat;
    }
    let mut short: String = flat.chars().take(EXCERPT_CHARS.saturating_sub(3)).collect();
    short.push_str("...");
    return short;
}

/// Resolve a jump target and print where it lives.
///
/// # Errors
///
/// Returns `Error::NotFound` if the target does not exist, plus config and store errors.
pub fn locate(
    store_override: Option<&Path>,
    submission_id: &str,
    jump: &Jump,
    limit: Option<NonZeroUsize>,
    json: bool,
) -> Result<(), error::Error> {
    let (config, store) = open_store(store_override)?;
    let limit = config.effective_limit(limit);
    let location = navigation::locate(&store, submission_id, jump, limit)?;

    if json {
        return print_json(&location);
    }
    print!("{}", render_location(submission_id, &location, limit));
    return Ok(());
}

/// Print one page of comments with its navigation targets.
///
/// # Errors
///
/// Returns config, store, or integrity errors, and `Error::NotFound` when
/// opening the page of an unknown comment. Out-of-range page numbers are clamped, not errors.
pub fn navigate(
    store_override: Option<&Path>,
    submission_id: &str,
    target: PageTarget<'_>,
    limit: Option<NonZeroUsize>,
    json: bool,
) -> Result<(), error::Error> {
    let (config, store) = open_store(store_override)?;
    let limit = config.effective_limit(limit);
    let page = match target {
        PageTarget::Comment(comment_id) => {
            let page =
                navigation::resolve_page_for_comment(&store, submission_id, comment_id, limit)?;
            i64::try_from(page).unwrap_or(i64::MAX)
        },
        PageTarget::Number(page) => page,
    };
    let data = navigation::navigation_page(&store, submission_id, page, limit)?;

    if json {
        return print_json(&data);
    }
    print!("{}", render_navigation(submission_id, &data));
    return Ok(());
}

/// Load config from the working directory and open the comment store it names.
///
/// # Errors
///
/// Returns config loading errors.
fn open_store(store_override: Option<&Path>) -> Result<(Config, JsonFileStore), error::Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let path = store_override
        .map_or_else(|| config.store_path().to_path_buf(), Path::to_path_buf);
    let store = JsonFileStore::new(path);
    log::debug!("using comment store {}", store.path().display());
    return Ok((config, store));
}

/// Serialize a response as pretty JSON on stdout.
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails.
fn print_json<T: Serialize>(value: &T) -> Result<(), error::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    return Ok(());
}

/// `1.2` or `1.2 / a` when a spec code is present.
fn render_codes(standard_code: &str, spec_code: Option<&str>) -> String {
    return match spec_code {
        None => standard_code.to_string(),
        Some(spec) => format!("{standard_code} / {spec}"),
    };
}

/// Text form of a resolved jump.
fn render_location(submission_id: &str, location: &Location, limit: NonZeroUsize) -> String {
    return format!(
        "{} is comment #{} of {submission_id}, on page {} ({limit} per page)\n",
        location.comment_id,
        location.rank.saturating_add(1),
        location.page,
    );
}

/// Text form of one navigation page.
fn render_navigation(submission_id: &str, data: &NavigationData) -> String {
    let window = &data.pagination;
    let mut out = format!(
        "{submission_id}: page {} of {} ({} comments, {} per page)\n\n",
        window.page, window.total_pages, window.total, window.limit,
    );

    if data.comments.is_empty() {
        out.push_str("  (no comments)\n");
    }
    for comment in &data.comments {
        let mark = if comment.is_resolved { "x" } else { " " };
        let codes = render_codes(&comment.standard_code, comment.spec_code.as_deref());
        let _ = writeln!(
            out,
            "  [{mark}] {codes:<12} {:<12} {}: \"{}\"",
            comment.id,
            comment.author_name,
            excerpt(&comment.selected_text),
        );
    }

    let nav = &data.navigation;
    let mut buttons: Vec<String> = Vec::new();
    if window.has_first {
        buttons.push(format!("first {}", nav.first));
    }
    if window.has_previous {
        buttons.push(format!("previous {}", nav.previous));
    }
    if window.has_next {
        buttons.push(format!("next {}", nav.next));
    }
    if window.has_last {
        buttons.push(format!("last {}", nav.last));
    }
    if !buttons.is_empty() {
        let _ = write!(out, "\n{}\n", buttons.join(" | "));
    }
    return out;
}

/// `c1 (1.2 / a)` or `none`.
fn render_ref(point: Option<&CommentRef>) -> String {
    return point.map_or_else(
        || "none".to_string(),
        |p| format!("{} ({})", p.id, render_codes(&p.standard_code, p.spec_code.as_deref())),
    );
}

/// Text form of a summary.
fn render_summary(submission_id: &str, summary: &CommentSummary) -> String {
    let mut out = format!(
        "{submission_id}: {} comments, {} unresolved\n",
        summary.total_comments, summary.total_unresolved,
    );
    let _ = writeln!(out, "First comment:    {}", render_ref(summary.first_comment.as_ref()));
    let _ = writeln!(out, "First unresolved: {}", render_ref(summary.first_unresolved.as_ref()));

    if summary.by_section.is_empty() {
        return out;
    }
    out.push_str("\nSections:\n");
    for section in &summary.by_section {
        let codes = render_codes(&section.standard_code, section.spec_code.as_deref());
        let _ = writeln!(
            out,
            "  {codes:<16} {:>4} total {:>4} unresolved",
            section.count, section.unresolved_count,
        );
    }
    return out;
}

/// Print the comment summary for a submission.
///
/// # Errors
///
/// Returns config, store, or integrity errors.
pub fn summary(
    store_override: Option<&Path>,
    submission_id: &str,
    json: bool,
) -> Result<(), error::Error> {
    let (_config, store) = open_store(store_override)?;
    let aggregate = navigation::summary(&store, submission_id)?;

    if json {
        return print_json(&aggregate);
    }
    print!("{}", render_summary(submission_id, &aggregate));
    return Ok(());
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::Comment;

    fn store() -> MemoryStore {
        let comment = |id: &str, standard: &str, spec: Option<&str>, resolved: bool| Comment {
            author_name: "Dr. Lee".to_string(),
            created_at: 0,
            id: id.to_string(),
            is_resolved: resolved,
            selected_text: "consent\n form   wording".to_string(),
            spec_code: spec.map(str::to_string),
            standard_code: standard.to_string(),
            submission_id: "irb-7".to_string(),
        };
        return MemoryStore::from_comments(vec![
            comment("c1", "1.1", None, false),
            comment("c2", "1.1", None, true),
            comment("c3", "1.2", Some("a"), false),
        ]).unwrap();
    }

    #[test]
    fn excerpt_flattens_and_truncates() {
        assert_eq!(excerpt("a\n  b"), "a b");
        let long = "word ".repeat(40);
        let short = excerpt(&long);
        assert_eq!(short.chars().count(), EXCERPT_CHARS);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn summary_text_lists_sections() {
        let aggregate = navigation::summary(&store(), "irb-7").unwrap();
        let text = render_summary("irb-7", &aggregate);
        assert!(text.starts_with("irb-7: 3 comments, 2 unresolved\n"));
        assert!(text.contains("First comment:    c1 (1.1)"));
        assert!(text.contains("1.2 / a"));
    }

    #[test]
    fn navigation_text_shows_only_available_buttons() {
        let data = navigation::navigation_page(&store(), "irb-7", 1, NonZeroUsize::new(2).unwrap())
            .unwrap();
        let text = render_navigation("irb-7", &data);
        assert!(text.contains("page 1 of 2"));
        assert!(text.contains("[x]"));
        assert!(text.contains("\"consent form wording\""));
        assert!(text.contains("next 2 | last 2"));
        assert!(!text.contains("previous"));
    }

    #[test]
    fn empty_page_says_so() {
        let data = navigation::navigation_page(
            &MemoryStore::default(),
            "irb-7",
            1,
            NonZeroUsize::new(10).unwrap(),
        )
        .unwrap();
        assert!(render_navigation("irb-7", &data).contains("(no comments)"));
    }
}
