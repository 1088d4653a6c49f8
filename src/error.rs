//! Crate-level error types for commentnav diagnostics.

use std::path::PathBuf;

/// All errors in commentnav.
///
/// Each variant carries enough context to produce a useful diagnostic
/// without a debugger.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A comment record violates the ordering invariant or is missing a required field.
    #[error("data integrity: comment `{comment_id}`: {reason}")]
    DataIntegrity {
        /// Identifier of the offending comment, or `<unknown>` when the id itself is missing.
        comment_id: String,
        /// What is wrong with the record.
        reason: String,
    },

    /// Underlying I/O error outside the comment store.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of a response failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped serde_json error.
        #[from]
        serde_json::Error,
    ),

    /// A "first" jump found nothing: the submission has no comments, or none unresolved.
    #[error("nothing to jump to: submission `{submission_id}` has no {target}")]
    NoJumpTarget {
        /// Submission that was searched.
        submission_id: String,
        /// What was looked for, e.g. `unresolved comments`.
        target: String,
    },

    /// The requested comment does not belong to the submission.
    #[error("comment not found: `{comment_id}` in submission `{submission_id}`")]
    NotFound {
        /// Comment identifier that was not found.
        comment_id: String,
        /// Submission that was searched.
        submission_id: String,
    },

    /// The comment store could not be read.
    #[error("store unavailable: {}: {reason}", path.display())]
    StoreUnavailable {
        /// Location of the store that failed.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// TOML deserialization of the config file failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),
}
