//! Common result and error types for the strata toolkit.

/// The standard result type for fallible internal operations.
///
/// `Err` indicates a violated programming invariant (an inconsistent die or
/// technology setup, a terminal that should exist but does not), not a
/// recoverable runtime condition. Recoverable conditions are reported
/// through [`DiagnosticSink`](crate::DiagnosticSink) and the operation
/// still returns `Ok`.
pub type StrataResult<T> = Result<T, InternalError>;

/// An internal pipeline error indicating a bug or an inconsistent database,
/// not a user input problem.
///
/// These errors should never occur during normal operation; when one does,
/// the current pipeline stage aborts rather than degrading silently. When
/// the violated invariant concerns a specific database object, `entity`
/// names it so the report points at the offending instance, net, or master.
#[derive(Debug, thiserror::Error)]
#[error("internal pipeline error{}: {message}",
    .entity.as_ref().map(|e| format!(" on `{e}`")).unwrap_or_default())]
pub struct InternalError {
    /// Description of the violated invariant.
    pub message: String,
    /// The database object the invariant concerns, if any.
    pub entity: Option<String>,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            entity: None,
        }
    }

    /// Creates an internal error pinned to a named database object.
    pub fn on_entity(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            entity: Some(entity.into()),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self {
            message,
            entity: None,
        }
    }
}
