//! Row legalization errors.

use thiserror::Error;

/// Errors produced by the row legalizer.
#[derive(Debug, Error)]
pub enum LegalizeError {
    /// An instance's Y coordinate snaps to no row of the block.
    #[error("instance `{inst}` at y={y} falls outside the row grid")]
    RowOutOfRange {
        /// The offending instance.
        inst: String,
        /// Its Y coordinate before snapping.
        y: i64,
    },

    /// The capacity balancer hit its pass cap with rows still in excess.
    #[error("row capacity balancing did not converge after {passes} passes")]
    BalanceNotConverged {
        /// Number of alternating sweeps performed.
        passes: usize,
    },
}
