//! Partition assignments: which die each root instance belongs to.
//!
//! Assignments come from a line-oriented text file (`<instanceName>
//! <dieIndex>` per line) or, when no file is given, from a deterministic
//! even-area bisection of the root netlist. Applying an assignment attaches
//! the die index to the instance as the integer attribute `partition_id` and
//! joins the instance to a per-die group.

use crate::error::PartitionError;
use std::path::Path;
use strata_common::DiagnosticSink;
use strata_db::{AttrValue, Design, InstKind};

/// Attribute name carrying an instance's assigned die index.
pub const PARTITION_ATTR: &str = "partition_id";

/// Reads `<instanceName> <dieIndex>` lines. Blank lines are skipped.
pub fn read_assignments(path: &Path) -> Result<Vec<(String, i64)>, PartitionError> {
    let text = std::fs::read_to_string(path)?;
    parse_assignments(&text)
}

/// Parses assignment text. See [`read_assignments`].
pub fn parse_assignments(text: &str) -> Result<Vec<(String, i64)>, PartitionError> {
    let mut assignments = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let mut fields = line.split_whitespace();
        let Some(name) = fields.next() else {
            continue;
        };
        let die = fields
            .next()
            .and_then(|f| f.parse::<i64>().ok())
            .filter(|_| fields.next().is_none());
        let Some(die) = die else {
            return Err(PartitionError::BadAssignment {
                line: i as u32 + 1,
                text: line.trim().to_string(),
            });
        };
        assignments.push((name.to_string(), die));
    }
    Ok(assignments)
}

/// Attaches die indexes to root instances and builds the per-die groups.
///
/// Each assigned instance gains the `partition_id` attribute and joins the
/// group `die{N}` (created on first use). Names with no matching root
/// instance are reported through the sink and skipped.
pub fn apply_assignments(
    design: &mut Design,
    sink: &DiagnosticSink,
    assignments: &[(String, i64)],
) {
    let root = design.root;
    for (name, die) in assignments {
        let Some(inst) = design.block(root).find_instance(name) else {
            sink.warn(format!(
                "partition assignment for unknown instance `{name}` ignored"
            ));
            continue;
        };
        design
            .block_mut(root)
            .inst_mut(inst)
            .set_attr(PARTITION_ATTR, AttrValue::Int(*die));
        let group_name = format!("die{die}");
        let group = match design.find_group(&group_name) {
            Some(g) => g,
            None => design.create_group(group_name),
        };
        design.add_to_group(group, root, inst);
    }
}

/// Synthesizes assignments by greedy even-area bisection.
///
/// Root instances are walked in creation order and split into `num_dies`
/// contiguous spans of roughly equal total footprint area; span `k` is
/// assigned die index `k`. Representative instances are not partitioned.
/// Zero dies means zero spans: nothing is assigned.
pub fn bisect_by_area(design: &Design, num_dies: usize) -> Vec<(String, i64)> {
    if num_dies == 0 {
        return Vec::new();
    }
    let root = design.root_block();
    let tech = design.tech(root.tech);
    let cells: Vec<(&str, i64)> = root
        .instances()
        .filter_map(|(_, inst)| match inst.kind {
            InstKind::Cell { master } => Some((inst.name.as_str(), tech.master(master).area())),
            InstKind::Rep { .. } => None,
        })
        .collect();
    let total: i64 = cells.iter().map(|(_, a)| a).sum();

    let mut assignments = Vec::with_capacity(cells.len());
    let mut die = 0i64;
    let mut running = 0i64;
    for (name, area) in cells {
        assignments.push((name.to_string(), die));
        running += area;
        // Advance once this span has claimed its share of the total area.
        if (die as usize) + 1 < num_dies && running * num_dies as i64 >= total * (die + 1) {
            die += 1;
        }
    }
    assignments
}
