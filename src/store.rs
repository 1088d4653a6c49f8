//! Comment store adapters.
//!
//! The core only reads through `CommentStore`; every adapter must hand back
//! comments in `ordering::compare` order.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::ordering;
use crate::types::{Comment, StoredComment};

/// Read-only query interface over persisted comments.
///
/// Implementations hand back each submission's comments in `ordering::compare`
/// order with ids unique within the submission, and report a violation as
/// `Error::DataIntegrity` rather than returning the data.
///
/// Only `list_ordered` is required. The other queries default to scanning it,
/// and adapters backed by an index can override them.
pub trait CommentStore {
    /// Number of comments attached to the submission.
    ///
    /// # Errors
    ///
    /// Propagates the adapter's read errors.
    fn count(&self, submission_id: &str) -> Result<usize, Error> {
        return Ok(self.list_ordered(submission_id)?.len());
    }

    /// Every comment of the submission, in navigation order.
    ///
    /// # Errors
    ///
    /// Returns `Error::StoreUnavailable` if the backing store cannot be read,
    /// or `Error::DataIntegrity` if a record is malformed.
    fn list_ordered(&self, submission_id: &str) -> Result<Vec<Comment>, Error>;

    /// The `limit` comments starting at `offset`, plus the total observed by this read.
    ///
    /// # Errors
    ///
    /// Propagates the adapter's read errors.
    fn list_window(
        &self,
        submission_id: &str,
        offset: usize,
        limit: NonZeroUsize,
    ) -> Result<(Vec<Comment>, usize), Error> {
        let all = self.list_ordered(submission_id)?;
        let total = all.len();
        let window = all.into_iter().skip(offset).take(limit.get()).collect();
        return Ok((window, total));
    }

    /// Zero-based ordinal position of a comment in navigation order.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the comment is not part of the submission.
    fn rank(&self, submission_id: &str, comment_id: &str) -> Result<usize, Error> {
        return self
            .list_ordered(submission_id)?
            .iter()
            .position(|c| c.id == comment_id)
            .ok_or_else(|| Error::NotFound {
                comment_id: comment_id.to_string(),
                submission_id: submission_id.to_string(),
            });
    }
}

/// Comments kept in a JSON array on disk.
///
/// The file is re-read on every query, so each request sees the latest
/// written state.
pub struct JsonFileStore {
    /// Location of the JSON array of stored comment records.
    path: PathBuf,
}

impl JsonFileStore {
    /// Point an adapter at a JSON file. Nothing is read until the first query.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        return Self { path: path.into() };
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        return &self.path;
    }

    /// Read the file and build an in-memory snapshot of one submission.
    ///
    /// Records with a missing or blank submission id cannot be attributed and fail every read.
    ///
    /// # Errors
    ///
    /// Returns `Error::StoreUnavailable` if the file is missing, unreadable,
    /// or not a JSON array, and `Error::DataIntegrity` for malformed records.
    fn snapshot(&self, submission_id: &str) -> Result<MemoryStore, Error> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| Error::StoreUnavailable {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        let records: Vec<StoredComment> =
            serde_json::from_str(&content).map_err(|e| Error::StoreUnavailable {
                path: self.path.clone(),
                reason: format!("invalid JSON: {e}"),
            })?;
        log::debug!("read {} comment records from {}", records.len(), self.path.display());

        let relevant = records
            .into_iter()
            .filter(|r| {
                r.submission_id
                    .as_deref()
                    .is_none_or(|s| s.trim().is_empty() || s == submission_id)
            })
            .collect();
        return MemoryStore::from_records(relevant);
    }
}

impl CommentStore for JsonFileStore {
    fn count(&self, submission_id: &str) -> Result<usize, Error> {
        return self.snapshot(submission_id)?.count(submission_id);
    }

    fn list_ordered(&self, submission_id: &str) -> Result<Vec<Comment>, Error> {
        return self.snapshot(submission_id)?.list_ordered(submission_id);
    }

    fn list_window(
        &self,
        submission_id: &str,
        offset: usize,
        limit: NonZeroUsize,
    ) -> Result<(Vec<Comment>, usize), Error> {
        return self.snapshot(submission_id)?.list_window(submission_id, offset, limit);
    }

    fn rank(&self, submission_id: &str, comment_id: &str) -> Result<usize, Error> {
        return self.snapshot(submission_id)?.rank(submission_id, comment_id);
    }
}

/// An immutable, already-sorted snapshot of comments for any number of submissions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Comments keyed by submission id, each list in navigation order.
    by_submission: HashMap<String, Vec<Comment>>,
}

impl MemoryStore {
    /// Group comments by submission and sort each group canonically.
    ///
    /// # Errors
    ///
    /// Returns `Error::DataIntegrity` if an id repeats within a submission.
    pub fn from_comments(comments: Vec<Comment>) -> Result<Self, Error> {
        let mut by_submission: HashMap<String, Vec<Comment>> = HashMap::new();
        for comment in comments {
            by_submission.entry(comment.submission_id.clone()).or_default().push(comment);
        }
        for group in by_submission.values_mut() {
            ordering::sort(group);
            ordering::enforce_total_order(group)?;
        }
        return Ok(Self { by_submission });
    }

    /// Validate raw records and build a snapshot. One bad record fails the whole load.
    ///
    /// # Errors
    ///
    /// Returns `Error::DataIntegrity` for the first record missing a required
    /// field, or for a repeated id within a submission.
    pub fn from_records(records: Vec<StoredComment>) -> Result<Self, Error> {
        let comments = records
            .into_iter()
            .map(Comment::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        return Self::from_comments(comments);
    }
}

impl CommentStore for MemoryStore {
    fn count(&self, submission_id: &str) -> Result<usize, Error> {
        return Ok(self.by_submission.get(submission_id).map_or(0, Vec::len));
    }

    fn list_ordered(&self, submission_id: &str) -> Result<Vec<Comment>, Error> {
        return Ok(self.by_submission.get(submission_id).cloned().unwrap_or_default());
    }

    fn list_window(
        &self,
        submission_id: &str,
        offset: usize,
        limit: NonZeroUsize,
    ) -> Result<(Vec<Comment>, usize), Error> {
        let Some(all) = self.by_submission.get(submission_id) else {
            return Ok((Vec::new(), 0));
        };
        let window = all.iter().skip(offset).take(limit.get()).cloned().collect();
        return Ok((window, all.len()));
    }
}
