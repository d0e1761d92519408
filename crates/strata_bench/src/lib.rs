//! ICCAD 2022/2023 contest benchmark reader for the Strata multi-die flow.
//!
//! Reads the contest's line-oriented netlist format into a
//! [`strata_db::Design`]: the root block holds every instance and net
//! unplaced, the root technology mirrors the top die's library, and one
//! additional technology per die is registered for the topology builder.
//! Contest parameters with no database counterpart (max utilization,
//! terminal geometry) come back in a [`BenchInfo`] sidecar.

#![warn(missing_docs)]

pub mod error;
pub mod format;

pub use error::BenchError;
pub use format::{
    detect_format, parse_bench, read_bench, BenchFormat, BenchInfo, DieSpec, RowSpec, TerminalSpec,
};
