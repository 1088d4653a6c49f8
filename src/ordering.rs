//! The canonical total order over a submission's comments, and its enforcement.
//!
//! Every sort, rank, and "first comment" decision goes through `compare`.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::Error;
use crate::types::Comment;

/// Sort key of one dot-separated code segment.
///
/// All-digit segments sort before any other segment and compare by magnitude
/// (leading zeros stripped, then length, then digits), so `2 < 10` without
/// overflowing on long digit runs. Other segments compare as strings.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Segment<'a> {
    /// A decimal integer segment.
    Number {
        /// Count of significant digits.
        digits: usize,
        /// The digits with leading zeros removed.
        value: &'a str,
    },
    /// Anything that is not purely decimal digits.
    Text(&'a str),
}

impl<'a> Segment<'a> {
    /// Classify a raw segment.
    fn classify(raw: &'a str) -> Self {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Segment::Text(raw);
        }
        let value = raw.trim_start_matches('0');
        return Segment::Number { digits: value.len(), value };
    }
}

/// Compare two comments by `(standardCode, specCode-or-empty, createdAt, id)`.
pub fn compare(left: &Comment, right: &Comment) -> Ordering {
    return compare_codes(&left.standard_code, &right.standard_code)
        .then_with(|| {
            compare_codes(
                left.spec_code.as_deref().unwrap_or(""),
                right.spec_code.as_deref().unwrap_or(""),
            )
        })
        .then_with(|| left.created_at.cmp(&right.created_at))
        .then_with(|| left.id.cmp(&right.id));
}

/// Compare two hierarchical dotted codes segment by segment.
///
/// The empty code sorts first. Numeric segments compare as integers so `1.2`
/// sorts before `1.10`, and sort before text segments, so `1.10 < 1.1a`.
/// A strict prefix sorts first. Codes that tie segment-wise (`1.01` vs `1.1`)
/// fall back to byte order so distinct strings never compare equal.
pub fn compare_codes(left: &str, right: &str) -> Ordering {
    return right
        .is_empty()
        .cmp(&left.is_empty())
        .then_with(|| {
            left.split('.')
                .map(Segment::classify)
                .cmp(right.split('.').map(Segment::classify))
        })
        .then_with(|| left.cmp(right));
}

/// Validate that comments are strictly increasing under `compare`.
///
/// A repeated id anywhere in the sequence, or a decreasing neighbour pair,
/// means the adapter handed back corrupt data.
///
/// # Errors
///
/// Returns `Error::DataIntegrity` naming the first offending comment.
pub fn enforce_total_order(comments: &[Comment]) -> Result<(), Error> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(comments.len());
    for comment in comments {
        if !seen.insert(comment.id.as_str()) {
            return Err(Error::DataIntegrity {
                comment_id: comment.id.clone(),
                reason: "duplicate comment id in submission".to_string(),
            });
        }
    }

    for window in comments.windows(2) {
        let (Some(first), Some(second)) = (window.first(), window.get(1)) else {
            continue;
        };
        if compare(first, second) == Ordering::Greater {
            return Err(Error::DataIntegrity {
                comment_id: second.id.clone(),
                reason: format!(
                    "comments not in navigation order: `{}` ({}) sorts after `{}` ({})",
                    first.id, first.standard_code, second.id, second.standard_code,
                ),
            });
        }
    }
    return Ok(());
}

/// Sort comments into the canonical order in place.
pub fn sort(comments: &mut [Comment]) {
    comments.sort_by(compare);
}
