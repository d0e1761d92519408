//! Benchmark reader errors.

use thiserror::Error;

/// Errors produced while reading a contest benchmark.
#[derive(Debug, Error)]
pub enum BenchError {
    /// The benchmark file could not be read.
    #[error("cannot read benchmark file: {0}")]
    Io(#[from] std::io::Error),

    /// A keyword or value was not where the format says it should be.
    #[error("line {line}: expected {expected}, found `{found}`")]
    UnexpectedToken {
        /// What the grammar called for at this point.
        expected: &'static str,
        /// The token actually present.
        found: String,
        /// 1-based source line of the offending token.
        line: u32,
    },

    /// The file ended in the middle of a section.
    #[error("unexpected end of file: expected {expected}")]
    UnexpectedEof {
        /// What the grammar called for at this point.
        expected: &'static str,
    },

    /// A die references a technology name with no `Tech` section.
    #[error("die references unknown technology `{0}`")]
    UnknownTech(String),

    /// A net pin references an instance that was never declared.
    #[error("net `{net}` references unknown instance `{inst}`")]
    UnknownInstance {
        /// The net being read.
        net: String,
        /// The undeclared instance name.
        inst: String,
    },

    /// An instance references a library cell missing from the technology.
    #[error("instance `{inst}` references unknown lib cell `{master}`")]
    UnknownMaster {
        /// The instance being read.
        inst: String,
        /// The undeclared library cell name.
        master: String,
    },

    /// A net pin token is missing the `inst/pin` separator.
    #[error("line {line}: malformed pin reference `{pin}`, expected `inst/pin`")]
    BadPinRef {
        /// The malformed token.
        pin: String,
        /// 1-based source line of the token.
        line: u32,
    },
}
