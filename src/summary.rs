//! Summary aggregation: counts, per-section breakdown, and jump targets.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::Error;
use crate::ordering;
use crate::types::{Comment, CommentRef};

/// Derived aggregate over all comments of one submission.
///
/// A pure function of the comment set at query time; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSummary {
    /// Sections in navigation order, each with its counts.
    pub by_section: Vec<SectionBreakdown>,
    /// The comment at ordinal position 0, if any.
    pub first_comment: Option<CommentRef>,
    /// The first comment in navigation order that is still unresolved, if any.
    pub first_unresolved: Option<CommentRef>,
    /// Number of comments in the submission.
    pub total_comments: usize,
    /// Number of comments not yet resolved.
    pub total_unresolved: usize,
}

/// Counts for one `(standardCode, specCode)` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionBreakdown {
    /// Comments in the section.
    pub count: usize,
    /// Optional spec code of the section.
    pub spec_code: Option<String>,
    /// Standard code of the section.
    pub standard_code: String,
    /// Unresolved comments in the section.
    pub unresolved_count: usize,
}

/// Aggregate an already-ordered comment sequence into a summary.
///
/// Sections appear in the order their first comment appears in the sequence.
/// An empty sequence yields zero counts and no jump targets.
///
/// # Errors
///
/// Returns `Error::DataIntegrity` if the sequence is not in navigation order
/// or repeats a comment id.
pub fn compute_summary(comments: &[Comment]) -> Result<CommentSummary, Error> {
    ordering::enforce_total_order(comments)?;

    let mut by_section: Vec<SectionBreakdown> = Vec::new();
    let mut section_index: HashMap<(&str, Option<&str>), usize> = HashMap::new();
    let mut total_unresolved = 0_usize;

    for comment in comments {
        let key = (comment.standard_code.as_str(), comment.spec_code.as_deref());
        let idx = *section_index.entry(key).or_insert_with(|| {
            by_section.push(SectionBreakdown {
                count: 0,
                spec_code: comment.spec_code.clone(),
                standard_code: comment.standard_code.clone(),
                unresolved_count: 0,
            });
            by_section.len().saturating_sub(1)
        });

        let Some(section) = by_section.get_mut(idx) else {
            return Err(Error::DataIntegrity {
                comment_id: comment.id.clone(),
                reason: format!("section index {idx} out of bounds"),
            });
        };
        section.count = section.count.saturating_add(1);
        if !comment.is_resolved {
            section.unresolved_count = section.unresolved_count.saturating_add(1);
            total_unresolved = total_unresolved.saturating_add(1);
        }
    }

    return Ok(CommentSummary {
        by_section,
        first_comment: comments.first().map(Comment::as_ref_point),
        first_unresolved: first_unresolved(comments).map(Comment::as_ref_point),
        total_comments: comments.len(),
        total_unresolved,
    });
}

/// The first comment in navigation order that still needs attention.
pub fn first_unresolved(comments: &[Comment]) -> Option<&Comment> {
    return comments.iter().find(|c| !c.is_resolved);
}
