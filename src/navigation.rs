//! Navigation controller.
//!
//! Composes store reads, the summary aggregator and the paginator into
//! per-request responses. Holds no state between requests; the caller owns
//! the current page.

use std::num::NonZeroUsize;

use serde::Serialize;

use crate::error::Error;
use crate::ordering;
use crate::paginator::{self, NavigationTargets, PaginationWindow};
use crate::store::CommentStore;
use crate::summary::{self, CommentSummary};
use crate::types::{Comment, CommentProjection};

/// Where a "jump to" request should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Jump {
    /// A specific comment by id.
    Comment(String),
    /// Ordinal position 0.
    First,
    /// The first comment still needing attention.
    FirstUnresolved,
}

/// A resolved jump: which comment, where it ranks, and which page shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Identifier of the comment the jump resolved to.
    pub comment_id: String,
    /// One-based page containing the comment.
    pub page: usize,
    /// Zero-based ordinal rank in navigation order.
    pub rank: usize,
}

/// One page of comments with its pagination window and navigation targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationData {
    /// Display projections of the comments on this page.
    pub comments: Vec<CommentProjection>,
    /// Page numbers for first/previous/next/last.
    pub navigation: NavigationTargets,
    /// The resolved window after clamping.
    pub pagination: PaginationWindow,
}

/// Resolve a jump target to its rank and page.
///
/// # Errors
///
/// Returns `Error::NotFound` if the comment is absent, and `Error::NoJumpTarget`
/// if the submission is empty (`First`) or nothing is unresolved
/// (`FirstUnresolved`). Store errors propagate.
pub fn locate(
    store: &dyn CommentStore,
    submission_id: &str,
    jump: &Jump,
    limit: NonZeroUsize,
) -> Result<Location, Error> {
    let no_target = |target: &str| Error::NoJumpTarget {
        submission_id: submission_id.to_string(),
        target: target.to_string(),
    };

    let (comment_id, rank) = match jump {
        Jump::Comment(id) => (id.clone(), store.rank(submission_id, id)?),
        Jump::First => {
            let comments = store.list_ordered(submission_id)?;
            ordering::enforce_total_order(&comments)?;
            let first = comments.first().ok_or_else(|| no_target("comments"))?;
            (first.id.clone(), 0)
        },
        Jump::FirstUnresolved => {
            let comments = store.list_ordered(submission_id)?;
            ordering::enforce_total_order(&comments)?;
            let (rank, first) = comments
                .iter()
                .enumerate()
                .find(|(_, c)| !c.is_resolved)
                .ok_or_else(|| no_target("unresolved comments"))?;
            (first.id.clone(), rank)
        },
    };

    let page = paginator::page_for_rank(rank, limit);
    log::debug!("located {comment_id} in {submission_id} at rank {rank}, page {page}");
    return Ok(Location { comment_id, page, rank });
}

/// Build one page of navigation data.
///
/// The count and the window come from separate reads. If the comment set
/// changed in between, the page is recomputed once against the newer total.
///
/// # Errors
///
/// Propagates store errors, and `Error::DataIntegrity` if the page is not in
/// navigation order.
pub fn navigation_page(
    store: &dyn CommentStore,
    submission_id: &str,
    page: i64,
    limit: NonZeroUsize,
) -> Result<NavigationData, Error> {
    let total = store.count(submission_id)?;
    let mut pagination = paginator::paginate(total, page, limit);
    let (mut comments, observed) =
        store.list_window(submission_id, pagination.window.offset(), limit)?;

    if observed != total {
        log::debug!("{submission_id}: comment count moved from {total} to {observed} mid-request");
        let refreshed = paginator::paginate(observed, page, limit);
        if refreshed.window.offset() != pagination.window.offset() {
            (comments, _) = store.list_window(submission_id, refreshed.window.offset(), limit)?;
        }
        pagination = refreshed;
    }

    ordering::enforce_total_order(&comments)?;
    log::debug!(
        "{submission_id}: page {}/{} with {} comments",
        pagination.window.page,
        pagination.window.total_pages,
        comments.len()
    );

    return Ok(NavigationData {
        comments: comments.iter().map(Comment::projection).collect(),
        navigation: pagination.targets,
        pagination: pagination.window,
    });
}

/// One-based page holding the given comment.
///
/// # Errors
///
/// Returns `Error::NotFound` if the comment is not part of the submission.
pub fn resolve_page_for_comment(
    store: &dyn CommentStore,
    submission_id: &str,
    comment_id: &str,
    limit: NonZeroUsize,
) -> Result<usize, Error> {
    let rank = store.rank(submission_id, comment_id)?;
    return Ok(paginator::page_for_rank(rank, limit));
}

/// Summarize every comment of a submission.
///
/// # Errors
///
/// Propagates store errors and summary integrity errors.
pub fn summary(store: &dyn CommentStore, submission_id: &str) -> Result<CommentSummary, Error> {
    let comments = store.list_ordered(submission_id)?;
    let aggregate = summary::compute_summary(&comments)?;
    log::debug!(
        "{submission_id}: {} comments, {} unresolved, {} sections",
        aggregate.total_comments,
        aggregate.total_unresolved,
        aggregate.by_section.len()
    );
    return Ok(aggregate);
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::store::{JsonFileStore, MemoryStore};

    fn comment(id: &str, standard: &str, resolved: bool, created_at: i64) -> Comment {
        return Comment {
            author_name: "Reviewer".to_string(),
            created_at,
            id: id.to_string(),
            is_resolved: resolved,
            selected_text: format!("text of {id}"),
            spec_code: None,
            standard_code: standard.to_string(),
            submission_id: "sub".to_string(),
        };
    }

    fn limit(n: usize) -> NonZeroUsize {
        return NonZeroUsize::new(n).unwrap();
    }

    fn numbered(count: i64) -> MemoryStore {
        return MemoryStore::from_comments(
            (0..count).map(|i| comment(&format!("c{i:03}"), "1", i % 2 == 0, i)).collect(),
        ).unwrap();
    }

    #[test]
    fn resolves_rank_23_to_page_3() {
        let store = numbered(30);
        assert_eq!(resolve_page_for_comment(&store, "sub", "c023", limit(10)).unwrap(), 3);
        assert_eq!(resolve_page_for_comment(&store, "sub", "c000", limit(10)).unwrap(), 1);
    }

    #[test]
    fn unknown_comment_is_not_found() {
        let store = numbered(3);
        let err = resolve_page_for_comment(&store, "sub", "nope", limit(10)).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }), "got {err}");
        let err = resolve_page_for_comment(&store, "other", "c000", limit(10)).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }), "got {err}");
    }

    #[test]
    fn navigation_page_slices_the_window() {
        let store = numbered(25);
        let data = navigation_page(&store, "sub", 2, limit(10)).unwrap();
        assert_eq!(data.pagination.page, 2);
        assert_eq!(data.pagination.total, 25);
        assert_eq!(data.comments.len(), 10);
        assert_eq!(data.comments[0].id, "c010");
        assert_eq!(data.comments[9].id, "c019");
        assert_eq!(data.navigation.previous, 1);
        assert_eq!(data.navigation.next, 3);
    }

    #[test]
    fn page_past_the_end_shows_last_page() {
        let store = numbered(25);
        let data = navigation_page(&store, "sub", 999, limit(10)).unwrap();
        assert_eq!(data.pagination.page, 3);
        let ids: Vec<&str> = data.comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c020", "c021", "c022", "c023", "c024"]);
    }

    #[test]
    fn empty_submission_is_one_empty_page() {
        let store = MemoryStore::default();
        let data = navigation_page(&store, "sub", -5, limit(10)).unwrap();
        assert_eq!(data.pagination.page, 1);
        assert_eq!(data.pagination.total_pages, 1);
        assert!(data.comments.is_empty());
        assert!(!data.pagination.has_next);
    }

    #[test]
    fn projection_keeps_full_selected_text() {
        let mut long = comment("a", "1", false, 0);
        long.selected_text = "x".repeat(5_000);
        let store = MemoryStore::from_comments(vec![long]).unwrap();
        let data = navigation_page(&store, "sub", 1, limit(10)).unwrap();
        assert_eq!(data.comments[0].selected_text.len(), 5_000);
    }

    #[test]
    fn summary_reports_sections_and_first_comment() {
        let store = MemoryStore::from_comments(vec![
            comment("c", "1.2", false, 0),
            comment("b", "1.1", true, 2),
            comment("a", "1.1", false, 1),
        ]).unwrap();
        let summary = summary(&store, "sub").unwrap();
        assert_eq!(summary.total_comments, 3);
        assert_eq!(summary.total_unresolved, 2);
        assert_eq!(summary.by_section.len(), 2);
        assert_eq!(summary.first_comment.unwrap().id, "a");
    }

    #[test]
    fn locate_first_is_always_page_one() {
        let store = numbered(25);
        let loc = locate(&store, "sub", &Jump::First, limit(10)).unwrap();
        assert_eq!(loc, Location { comment_id: "c000".to_string(), page: 1, rank: 0 });
    }

    #[test]
    fn locate_first_unresolved_skips_resolved_comments() {
        let mut comments: Vec<Comment> =
            (0..15).map(|i| comment(&format!("c{i:02}"), "1", true, i)).collect();
        comments.push(comment("open", "2", false, 0));
        let store = MemoryStore::from_comments(comments).unwrap();
        let loc = locate(&store, "sub", &Jump::FirstUnresolved, limit(10)).unwrap();
        assert_eq!(loc.comment_id, "open");
        assert_eq!(loc.rank, 15);
        assert_eq!(loc.page, 2);
    }

    #[test]
    fn locate_on_empty_or_all_resolved_has_no_target() {
        let empty = MemoryStore::default();
        let Err(Error::NoJumpTarget { target, .. }) = locate(&empty, "sub", &Jump::First, limit(10))
        else {
            panic!("expected no jump target");
        };
        assert_eq!(target, "comments");

        let resolved = MemoryStore::from_comments(vec![comment("a", "1", true, 0)]).unwrap();
        let Err(Error::NoJumpTarget { submission_id, target }) =
            locate(&resolved, "sub", &Jump::FirstUnresolved, limit(10))
        else {
            panic!("expected no jump target");
        };
        assert_eq!(submission_id, "sub");
        assert_eq!(target, "unresolved comments");
    }

    #[test]
    fn locate_comment_by_id() {
        let store = numbered(30);
        let loc = locate(&store, "sub", &Jump::Comment("c023".to_string()), limit(10)).unwrap();
        assert_eq!(loc.page, 3);
        assert_eq!(loc.rank, 23);
    }

    /// Reports a stale count on the first call, then the real one.
    struct ShrinkingStore {
        /// Calls to `count` so far.
        calls: Cell<usize>,
        /// The real backing data.
        inner: MemoryStore,
    }

    impl CommentStore for ShrinkingStore {
        fn count(&self, _submission_id: &str) -> Result<usize, Error> {
            self.calls.set(self.calls.get() + 1);
            return Ok(100);
        }

        fn list_ordered(&self, submission_id: &str) -> Result<Vec<Comment>, Error> {
            return self.inner.list_ordered(submission_id);
        }

        fn list_window(
            &self,
            submission_id: &str,
            offset: usize,
            limit: NonZeroUsize,
        ) -> Result<(Vec<Comment>, usize), Error> {
            return self.inner.list_window(submission_id, offset, limit);
        }
    }

    #[test]
    fn shrinking_set_mid_request_reclamps_the_page() {
        let store = ShrinkingStore { calls: Cell::new(0), inner: numbered(15) };
        let data = navigation_page(&store, "sub", 8, limit(10)).unwrap();
        assert_eq!(store.calls.get(), 1);
        assert_eq!(data.pagination.total, 15);
        assert_eq!(data.pagination.total_pages, 2);
        assert_eq!(data.pagination.page, 2);
        assert_eq!(data.comments.len(), 5);
    }

    /// Returns a window in the wrong order.
    struct ScrambledStore;

    impl CommentStore for ScrambledStore {
        fn list_ordered(&self, _submission_id: &str) -> Result<Vec<Comment>, Error> {
            return Ok(vec![comment("b", "2", false, 0), comment("a", "1", false, 0)]);
        }
    }

    #[test]
    fn duplicate_ids_fail_every_operation() {
        let records = serde_json::json!([
            { "id": "dup", "submissionId": "sub", "standardCode": "1" },
            { "id": "x", "submissionId": "sub", "standardCode": "2" },
            { "id": "dup", "submissionId": "sub", "standardCode": "3" },
        ]);
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), records.to_string()).unwrap();
        let store = JsonFileStore::new(file.path());
        let one = limit(1);

        assert!(matches!(summary(&store, "sub"), Err(Error::DataIntegrity { .. })));
        assert!(matches!(navigation_page(&store, "sub", 1, one), Err(Error::DataIntegrity { .. })));
        assert!(matches!(
            resolve_page_for_comment(&store, "sub", "dup", one),
            Err(Error::DataIntegrity { .. })
        ));
        for jump in [Jump::Comment("dup".to_string()), Jump::First, Jump::FirstUnresolved] {
            assert!(
                matches!(locate(&store, "sub", &jump, one), Err(Error::DataIntegrity { .. })),
                "{jump:?} was accepted"
            );
        }
    }

    #[test]
    fn unordered_adapter_output_is_data_integrity_error() {
        assert!(matches!(summary(&ScrambledStore, "sub"), Err(Error::DataIntegrity { .. })));
        assert!(matches!(
            navigation_page(&ScrambledStore, "sub", 1, limit(10)),
            Err(Error::DataIntegrity { .. })
        ));
    }
}
