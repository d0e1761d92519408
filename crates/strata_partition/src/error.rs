//! Partitioning and die construction errors.

use strata_common::InternalError;
use thiserror::Error;

/// Errors produced by the partitioning stage.
#[derive(Debug, Error)]
pub enum PartitionError {
    /// The assignment file could not be read.
    #[error("cannot read partition file: {0}")]
    Io(#[from] std::io::Error),

    /// An assignment line did not match `<instanceName> <dieIndex>`.
    #[error("partition file line {line}: malformed assignment `{text}`")]
    BadAssignment {
        /// 1-based line number.
        line: u32,
        /// The offending line, trimmed.
        text: String,
    },

    /// The design does not carry one technology per die plus the root's.
    #[error("die topology needs {expected} technologies (one per die plus the root's), found {found}")]
    TechCountMismatch {
        /// `num_dies + 1`.
        expected: usize,
        /// `Design::tech_count()` at the time of the call.
        found: usize,
    },

    /// A broken setup invariant, e.g. a die index with no child block or a
    /// master missing from a die technology.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = PartitionError::TechCountMismatch {
            expected: 3,
            found: 1,
        };
        assert!(err.to_string().contains("3 technologies"));
        let err = PartitionError::BadAssignment {
            line: 7,
            text: "inst0".into(),
        };
        assert!(err.to_string().contains("line 7"));
    }
}
