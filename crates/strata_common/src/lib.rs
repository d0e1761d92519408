//! Shared types for the strata multi-die toolkit.
//!
//! Provides the common result/error types used for internal invariant
//! violations, integer geometry in database units, and the diagnostic sink
//! through which pipeline stages report warn-and-continue conditions.

#![warn(missing_docs)]

pub mod diag;
pub mod geom;
pub mod result;

pub use diag::{Diagnostic, DiagnosticSink, Severity};
pub use geom::{Point, Rect};
pub use result::{InternalError, StrataResult};
