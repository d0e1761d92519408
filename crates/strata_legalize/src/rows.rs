//! Row bucketing: assigning cells to rows before per-row legalization.

use crate::error::LegalizeError;
use strata_db::{BlockId, Design, InstId, MasterKind};

/// One standard cell's view inside a row: identity plus the geometry the
/// per-row passes work on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCell {
    /// The instance.
    pub inst: InstId,
    /// Current left edge.
    pub x: i64,
    /// Footprint width.
    pub width: i64,
}

impl RowCell {
    /// Right edge at the current position.
    pub fn right(&self) -> i64 {
        self.x + self.width
    }
}

/// Snaps every standard cell of a block to a row and returns the per-row
/// cell lists, sorted by ascending X.
///
/// The row index is `(y - origin_y) / row_height`; each cell's Y is snapped
/// to its row in place. Representative instances and macros are not row
/// cells and are skipped. A Y outside the grid is fatal for the block.
pub fn bucket_rows(
    design: &mut Design,
    block_id: BlockId,
) -> Result<Vec<Vec<RowCell>>, LegalizeError> {
    let block = design.block(block_id);
    let tech = design.tech(block.tech);
    let num_rows = block.rows.len();

    let mut cells = Vec::new();
    for (id, inst) in block.instances() {
        let Some(master) = inst.master() else {
            continue;
        };
        let master = tech.master(master);
        if master.kind == MasterKind::Block {
            continue;
        }
        cells.push((id, inst.location.x, inst.location.y, master.width));
    }
    if cells.is_empty() {
        return Ok(vec![Vec::new(); num_rows]);
    }
    if num_rows == 0 {
        let (id, _, y, _) = cells[0];
        return Err(LegalizeError::RowOutOfRange {
            inst: block.inst(id).name.clone(),
            y,
        });
    }

    let y_min = block.rows[0].y();
    let row_height = block.rows[0].height();
    let mut rows = vec![Vec::new(); num_rows];
    for (id, x, y, width) in cells {
        let idx = (y - y_min).div_euclid(row_height);
        if idx < 0 || idx as usize >= num_rows {
            return Err(LegalizeError::RowOutOfRange {
                inst: design.block(block_id).inst(id).name.clone(),
                y,
            });
        }
        design.block_mut(block_id).inst_mut(id).location.y = y_min + idx * row_height;
        rows[idx as usize].push(RowCell { inst: id, x, width });
    }
    for row in &mut rows {
        row.sort_by_key(|cell| cell.x);
    }
    Ok(rows)
}

/// Writes the per-row X positions (and the row Y) back to the block.
pub fn apply_rows(design: &mut Design, block_id: BlockId, rows: &[Vec<RowCell>]) {
    let y_min = design.block(block_id).rows[0].y();
    let row_height = design.block(block_id).rows[0].height();
    for (idx, row) in rows.iter().enumerate() {
        let y = y_min + idx as i64 * row_height;
        for cell in row {
            let inst = design.block_mut(block_id).inst_mut(cell.inst);
            inst.location.x = cell.x;
            inst.location.y = y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{grid_design, place_cell};
    use strata_common::Point;

    #[test]
    fn buckets_by_snapped_y() {
        let mut design = grid_design(4, 100);
        let root = design.root;
        let a = place_cell(&mut design, "a", 10, Point::new(30, 0));
        // y=7 is still row 0 (height-8 rows starting at 0)
        let b = place_cell(&mut design, "b", 10, Point::new(5, 7));
        let c = place_cell(&mut design, "c", 10, Point::new(0, 16));
        let rows = bucket_rows(&mut design, root).unwrap();
        assert_eq!(rows.len(), 4);
        // Row 0 sorted by X: b before a.
        assert_eq!(rows[0][0].inst, b);
        assert_eq!(rows[0][1].inst, a);
        assert_eq!(rows[2][0].inst, c);
        assert!(rows[1].is_empty() && rows[3].is_empty());
        // b's Y snapped to its row.
        assert_eq!(design.block(root).inst(b).location.y, 0);
    }

    #[test]
    fn skips_reps_and_macros() {
        let mut design = grid_design(2, 100);
        let root = design.root;
        place_cell(&mut design, "a", 10, Point::new(0, 0));
        let tech_id = design.block(root).tech;
        let macro_id = design.tech_mut(tech_id).add_master(strata_db::Master {
            name: "ram".into(),
            width: 40,
            height: 16,
            kind: MasterKind::Block,
            site: None,
            pins: Vec::new(),
        });
        design.block_mut(root).create_instance(strata_db::Instance::new(
            "ram0",
            strata_db::InstKind::Cell { master: macro_id },
        ));
        let tech = design.add_tech(strata_db::Technology::new("die0_tech"));
        let child = design.create_child_block(root, "die0", tech);
        design.block_mut(root).create_instance(strata_db::Instance::new(
            "die0",
            strata_db::InstKind::Rep { child },
        ));
        let rows = bucket_rows(&mut design, root).unwrap();
        assert_eq!(rows[0].len(), 1);
    }

    #[test]
    fn out_of_range_y_is_fatal() {
        let mut design = grid_design(2, 100);
        let root = design.root;
        place_cell(&mut design, "a", 10, Point::new(0, 99));
        let err = bucket_rows(&mut design, root).unwrap_err();
        assert!(matches!(err, LegalizeError::RowOutOfRange { y: 99, .. }));
    }

    #[test]
    fn negative_y_is_fatal_not_row_zero() {
        let mut design = grid_design(2, 100);
        let root = design.root;
        place_cell(&mut design, "a", 10, Point::new(0, -1));
        let err = bucket_rows(&mut design, root).unwrap_err();
        assert!(matches!(err, LegalizeError::RowOutOfRange { y: -1, .. }));
    }

    #[test]
    fn apply_writes_positions_back() {
        let mut design = grid_design(2, 100);
        let root = design.root;
        let a = place_cell(&mut design, "a", 10, Point::new(30, 9));
        let mut rows = bucket_rows(&mut design, root).unwrap();
        // y=9 snaps into row 1.
        rows[1][0].x = 42;
        apply_rows(&mut design, root, &rows);
        assert_eq!(design.block(root).inst(a).location, Point::new(42, 8));
    }
}
