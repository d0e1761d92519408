//! Capacity balancing and shift-left legalization.
//!
//! The balancer evens out row occupancy by moving cells between adjacent
//! rows; the shift pass then removes overlaps within each row by pushing
//! cells right, repairing right-boundary overruns by repacking a window of
//! cells against the boundary. Together they form the lighter alternative
//! to the clustering pass.

use crate::error::LegalizeError;
use crate::rows::RowCell;

/// Cap on alternating balancer sweeps. A finite cell set whose total width
/// fits the total row capacity settles in far fewer.
pub const MAX_BALANCE_PASSES: usize = 64;

/// Balances row occupancy until no row's total cell width exceeds
/// `row_width`. Returns the number of sweeps performed.
///
/// Sweeps alternate upward and downward; an overfull row sheds its
/// smallest-width cells (ties by list order) to the next row in the sweep
/// direction, reflecting at the boundary row, until the shed width covers
/// the excess. Hitting the pass cap with excess remaining is an error.
pub fn balance_rows(
    rows: &mut [Vec<RowCell>],
    row_width: i64,
) -> Result<usize, LegalizeError> {
    if rows.len() < 2 {
        return match rows.first().map(|row| excess(row, row_width)) {
            Some(e) if e > 0 => Err(LegalizeError::BalanceNotConverged { passes: 0 }),
            _ => Ok(0),
        };
    }

    let last = rows.len() - 1;
    let mut upward = true;
    for pass in 0..MAX_BALANCE_PASSES {
        let mut solved = true;
        let order: Vec<usize> = if upward {
            (0..=last).collect()
        } else {
            (0..=last).rev().collect()
        };
        for i in order {
            let mut remaining = excess(&rows[i], row_width);
            if remaining <= 0 {
                continue;
            }
            solved = false;
            let target = if upward {
                if i == last {
                    i - 1
                } else {
                    i + 1
                }
            } else if i == 0 {
                i + 1
            } else {
                i - 1
            };
            while remaining > 0 {
                let Some(pos) = smallest_cell(&rows[i]) else {
                    break;
                };
                let cell = rows[i].remove(pos);
                remaining -= cell.width;
                rows[target].push(cell);
            }
        }
        if solved {
            return Ok(pass);
        }
        upward = !upward;
    }
    Err(LegalizeError::BalanceNotConverged {
        passes: MAX_BALANCE_PASSES,
    })
}

fn excess(row: &[RowCell], row_width: i64) -> i64 {
    let total: i64 = row.iter().map(|cell| cell.width).sum();
    (total - row_width).max(0)
}

/// Index of the narrowest cell; the first one wins ties.
fn smallest_cell(row: &[RowCell]) -> Option<usize> {
    row.iter()
        .enumerate()
        .min_by_key(|(_, cell)| cell.width)
        .map(|(pos, _)| pos)
}

/// Shift-left legalization for one row, sorted by X on entry.
///
/// Walks left to right with a cursor at the previous cell's right edge;
/// a cell starting before the cursor is pushed to it. A cell ending past
/// `max_x` triggers a right-boundary repair: the trailing window of cells
/// whose inter-cell gaps absorb the overrun is repacked flush against the
/// boundary, right to left.
pub fn shift_row(cells: &mut [RowCell], min_x: i64, max_x: i64) {
    cells.sort_by_key(|cell| cell.x);
    let mut cursor = min_x;
    for i in 0..cells.len() {
        if cells[i].x < cursor {
            cells[i].x = cursor;
        }
        cursor = cells[i].right();
        if cursor > max_x {
            shift_cells_to_left(cells, i, min_x, max_x);
            cursor = cells[i].right();
        }
    }
}

/// Repacks the smallest trailing window of cells that frees enough room
/// for cell `idx` to fit inside `max_x`.
fn shift_cells_to_left(cells: &mut [RowCell], idx: usize, min_x: i64, max_x: i64) {
    let stick_out = cells[idx].right() - max_x;
    // Walk backward accumulating inter-cell gaps until they cover the
    // overrun; the cell whose own left gap closes the budget stays put.
    let mut window = vec![idx];
    let mut freed = 0;
    let mut cursor = cells[idx].x;
    let mut j = idx;
    while freed < stick_out {
        if j == 0 {
            freed += cursor - min_x;
            break;
        }
        j -= 1;
        freed += cursor - cells[j].right();
        cursor = cells[j].x;
        if freed < stick_out {
            window.push(j);
        }
    }

    let mut cursor = max_x;
    for &i in &window {
        cells[i].x = cursor - cells[i].width;
        cursor = cells[i].x;
    }
}
