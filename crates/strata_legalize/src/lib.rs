//! Row legalization for the Strata multi-die flow.
//!
//! Two per-block paths over the same row bucketing:
//!
//! 1. **Abacus** — per-row clustering that minimizes weighted displacement
//! 2. **Shift** — capacity balancing across rows, then shift-left repair
//!
//! Legalization never changes a cell's row on the clustering path (only X
//! moves); the balancer path moves cells between adjacent rows by design.
//! Each block is legalized independently: the root first, then each child
//! in creation order, and one block's failure does not stop the others.

#![warn(missing_docs)]

pub mod abacus;
pub mod balance;
pub mod error;
pub mod rows;

pub use error::LegalizeError;
pub use rows::{apply_rows, bucket_rows, RowCell};

use strata_common::DiagnosticSink;
use strata_db::stats::cell_area;
use strata_db::{BlockId, Design};

/// Which legalization path to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegalizeMode {
    /// Per-row clustering (rows never change).
    Abacus,
    /// Capacity balancing plus shift-left repair.
    Shift,
}

/// Outcome of legalizing one block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowLegalizeReport {
    /// The block was skipped because its cells outgrow its die area.
    pub skipped_overfull: bool,
    /// Standard cells touched.
    pub cells: usize,
    /// Balancer sweeps performed (shift path only).
    pub balance_passes: usize,
}

/// Legalizes one block. Pure function of the block: no state is carried
/// between calls.
///
/// An overfull block (total cell area above the die area) is skipped and
/// reported through the sink rather than given an infeasible layout.
pub fn legalize_block(
    design: &mut Design,
    block_id: BlockId,
    mode: LegalizeMode,
    sink: &DiagnosticSink,
) -> Result<RowLegalizeReport, LegalizeError> {
    let block = design.block(block_id);
    if cell_area(design, block) > block.die_area.area() {
        sink.warn(format!(
            "block `{}` exceeds its die area, skipping legalization",
            block.name
        ));
        return Ok(RowLegalizeReport {
            skipped_overfull: true,
            ..RowLegalizeReport::default()
        });
    }

    let mut rows = bucket_rows(design, block_id)?;
    let cells = rows.iter().map(|row| row.len()).sum();
    let mut balance_passes = 0;
    match mode {
        LegalizeMode::Abacus => {
            for (idx, row) in rows.iter_mut().enumerate() {
                let geom = &design.block(block_id).rows[idx];
                abacus::legalize_row(row, geom.min_x(), geom.max_x());
            }
        }
        LegalizeMode::Shift => {
            if let Some(geom) = design.block(block_id).rows.first() {
                let (width, min_x, max_x) = (geom.width(), geom.min_x(), geom.max_x());
                balance_passes = balance::balance_rows(&mut rows, width)?;
                for row in rows.iter_mut() {
                    balance::shift_row(row, min_x, max_x);
                }
            }
        }
    }
    apply_rows(design, block_id, &rows);
    Ok(RowLegalizeReport {
        skipped_overfull: false,
        cells,
        balance_passes,
    })
}

/// Legalizes the root block, then every child in creation order.
///
/// Blocks are independent; a failure is recorded and the remaining blocks
/// still run.
pub fn legalize_design(
    design: &mut Design,
    mode: LegalizeMode,
    sink: &DiagnosticSink,
) -> Vec<(BlockId, Result<RowLegalizeReport, LegalizeError>)> {
    let mut blocks = vec![design.root];
    blocks.extend(design.root_block().children.iter().copied());
    blocks
        .into_iter()
        .map(|block| (block, legalize_block(design, block, mode, sink)))
        .collect()
}
