//! Core domain types for review comments and their read-only projections.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Placeholder used in diagnostics when a record has no id.
const UNKNOWN_ID: &str = "<unknown>";

/// A validated review comment.
///
/// Constructed only from a `StoredComment`, so the sort keys are guaranteed
/// present and non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Display name of the reviewer who wrote the comment.
    pub author_name: String,
    /// Milliseconds since the Unix epoch. Tiebreaker after the codes.
    pub created_at: i64,
    /// Opaque identifier, unique within a submission.
    pub id: String,
    /// Resolved comments still count towards totals, never towards ordering.
    pub is_resolved: bool,
    /// Text the reviewer highlighted. Display only.
    pub selected_text: String,
    /// Optional secondary sort key.
    pub spec_code: Option<String>,
    /// Primary sort key and section grouping key.
    pub standard_code: String,
    /// Submission the comment is attached to.
    pub submission_id: String,
}

impl Comment {
    /// The `(standardCode, specCode, id)` reference used for jump targets.
    pub fn as_ref_point(&self) -> CommentRef {
        return CommentRef {
            id: self.id.clone(),
            spec_code: self.spec_code.clone(),
            standard_code: self.standard_code.clone(),
        };
    }

    /// The display subset exposed to the presentation layer.
    pub fn projection(&self) -> CommentProjection {
        return CommentProjection {
            author_name: self.author_name.clone(),
            id: self.id.clone(),
            is_resolved: self.is_resolved,
            selected_text: self.selected_text.clone(),
            spec_code: self.spec_code.clone(),
            standard_code: self.standard_code.clone(),
        };
    }
}

impl TryFrom<StoredComment> for Comment {
    type Error = Error;

    /// Validate a raw record. Missing keys are data corruption, never skipped.
    fn try_from(record: StoredComment) -> Result<Self, Self::Error> {
        let Some(id) = record.id.filter(|id| !id.trim().is_empty()) else {
            return Err(Error::DataIntegrity {
                comment_id: UNKNOWN_ID.to_string(),
                reason: "missing id".to_string(),
            });
        };
        let Some(submission_id) = record.submission_id.filter(|s| !s.trim().is_empty())
        else {
            return Err(Error::DataIntegrity {
                comment_id: id,
                reason: "missing submissionId".to_string(),
            });
        };
        let Some(standard_code) = record.standard_code.filter(|c| !c.trim().is_empty())
        else {
            return Err(Error::DataIntegrity {
                comment_id: id,
                reason: "missing standardCode".to_string(),
            });
        };

        return Ok(Self {
            author_name: record.author_name.unwrap_or_default(),
            created_at: record.created_at.unwrap_or_default(),
            id,
            is_resolved: record.is_resolved,
            selected_text: record.selected_text.unwrap_or_default(),
            spec_code: record.spec_code,
            standard_code,
            submission_id,
        });
    }
}

/// Read-only display projection of a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentProjection {
    /// Display name of the reviewer.
    pub author_name: String,
    /// Comment identifier.
    pub id: String,
    /// Whether the comment has been resolved.
    pub is_resolved: bool,
    /// Highlighted text, untruncated.
    pub selected_text: String,
    /// Optional spec code.
    pub spec_code: Option<String>,
    /// Standard code.
    pub standard_code: String,
}

/// Where a jump target lives: its section keys plus its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRef {
    /// Comment identifier.
    pub id: String,
    /// Optional spec code.
    pub spec_code: Option<String>,
    /// Standard code.
    pub standard_code: String,
}

/// A comment record exactly as persisted.
///
/// Every field may be missing; conversion into `Comment` decides which
/// absences are corruption.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredComment {
    /// Display name of the reviewer.
    #[serde(default)]
    pub author_name: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub created_at: Option<i64>,
    /// Comment identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Whether the comment has been resolved. Absent means unresolved.
    #[serde(default)]
    pub is_resolved: bool,
    /// Highlighted text.
    #[serde(default)]
    pub selected_text: Option<String>,
    /// Optional spec code.
    #[serde(default)]
    pub spec_code: Option<String>,
    /// Standard code. Required for a valid comment.
    #[serde(default)]
    pub standard_code: Option<String>,
    /// Owning submission.
    #[serde(default)]
    pub submission_id: Option<String>,
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    fn record(id: &str, standard_code: Option<&str>) -> StoredComment {
        return StoredComment {
            id: Some(id.to_string()),
            standard_code: standard_code.map(str::to_string),
            submission_id: Some("sub-1".to_string()),
            ..StoredComment::default()
        };
    }

    #[test]
    fn missing_standard_code_is_data_integrity_error() {
        let err = Comment::try_from(record("c1", None)).unwrap_err();
        match err {
            Error::DataIntegrity { comment_id, reason } => {
                assert_eq!(comment_id, "c1");
                assert!(reason.contains("standardCode"), "reason was {reason}");
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_standard_code_is_rejected() {
        assert!(Comment::try_from(record("c1", Some("   "))).is_err());
    }

    #[test]
    fn missing_id_reports_unknown() {
        let mut raw = record("c1", Some("1.1"));
        raw.id = None;
        let Err(Error::DataIntegrity { comment_id, .. }) = Comment::try_from(raw) else {
            panic!("expected data integrity error");
        };
        assert_eq!(comment_id, UNKNOWN_ID);
    }

    #[test]
    fn optional_display_fields_default_to_empty() {
        let comment = Comment::try_from(record("c1", Some("1.1"))).unwrap();
        assert_eq!(comment.author_name, "");
        assert_eq!(comment.selected_text, "");
        assert_eq!(comment.created_at, 0);
        assert!(!comment.is_resolved);
        assert_eq!(comment.spec_code, None);
    }

    #[test]
    fn deserializes_camel_case_records() {
        let json = r#"{"id":"c9","submissionId":"s","standardCode":"2.1","specCode":"a",
            "selectedText":"txt","authorName":"R. Reviewer","isResolved":true,"createdAt":42}"#;
        let raw: StoredComment = serde_json::from_str(json).unwrap();
        let comment = Comment::try_from(raw).unwrap();
        assert_eq!(comment.spec_code.as_deref(), Some("a"));
        assert!(comment.is_resolved);
        assert_eq!(comment.created_at, 42);
    }
}
