//! Abacus-style per-row clustering.
//!
//! Cells are processed left to right and gathered into clusters: contiguous
//! runs placed as one rigid unit. Each cluster tracks its movable weight
//! `e`, total width `w`, and the accumulator `q = Σ e_i·(x_i − offset_i)`
//! from which the weighted-optimal left edge `x = q/e` falls out. Whenever
//! a collapsed cluster would overlap its left neighbor the two merge and
//! collapse again, so the final clusters are overlap-free by construction.
//! The result minimizes weighted displacement for the row in isolation.

use crate::rows::RowCell;

#[derive(Debug, Clone, Copy)]
struct Cluster {
    /// Index of the cluster's first cell in the row list.
    begin: usize,
    /// Movable weight (one per cell).
    e: i64,
    /// Weighted-position accumulator; optimal left edge is `q / e`.
    q: i64,
    /// Total width.
    w: i64,
    /// Resolved left edge.
    x: i64,
}

impl Cluster {
    fn add_cell(&mut self, cell: &RowCell) {
        self.e += 1;
        self.q += cell.x - self.w;
        self.w += cell.width;
    }

    /// Absorbs `other`, which sits immediately to the right.
    fn merge(&mut self, other: &Cluster) {
        self.e += other.e;
        self.q += other.q - other.e * self.w;
        self.w += other.w;
    }
}

/// Legalizes one row in place: no overlaps, every cell within
/// `[min_x, max_x]`, cells keep their relative order.
pub fn legalize_row(cells: &mut [RowCell], min_x: i64, max_x: i64) {
    let mut clusters: Vec<Cluster> = Vec::new();
    for (i, cell) in cells.iter().enumerate() {
        let cluster = match clusters.pop() {
            // The running cluster reaches past this cell: append to it.
            Some(mut last) if last.x + last.w > cell.x => {
                last.add_cell(cell);
                last
            }
            last => {
                if let Some(last) = last {
                    clusters.push(last);
                }
                let mut fresh = Cluster {
                    begin: i,
                    e: 0,
                    q: 0,
                    w: 0,
                    x: cell.x,
                };
                fresh.add_cell(cell);
                fresh
            }
        };
        collapse(&mut clusters, cluster, min_x, max_x);
    }

    for (ci, cluster) in clusters.iter().enumerate() {
        let end = clusters
            .get(ci + 1)
            .map_or(cells.len(), |next| next.begin);
        let mut cursor = cluster.x;
        for cell in &mut cells[cluster.begin..end] {
            cell.x = cursor;
            cursor += cell.width;
        }
    }
}

/// Resolves a cluster's position and merges leftward until no overlap with
/// the previous cluster remains, then pushes it back on the stack.
fn collapse(clusters: &mut Vec<Cluster>, mut cluster: Cluster, min_x: i64, max_x: i64) {
    loop {
        cluster.x = (cluster.q / cluster.e).clamp(min_x, (max_x - cluster.w).max(min_x));
        match clusters.pop() {
            Some(mut prev) if prev.x + prev.w > cluster.x => {
                prev.merge(&cluster);
                cluster = prev;
            }
            prev => {
                if let Some(prev) = prev {
                    clusters.push(prev);
                }
                break;
            }
        }
    }
    clusters.push(cluster);
}
