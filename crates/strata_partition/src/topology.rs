//! Die topology construction.
//!
//! Turns a flat root block into a stacked-die hierarchy: one child block
//! per die, each carrying the root's die outline and a verbatim copy of its
//! row grid, represented in the root by a single [`InstKind::Rep`] instance.
//! Child creation order is die stacking order.

use crate::error::PartitionError;
use strata_db::{BlockId, Design, InstKind, Instance, TechId};

/// Creates the child block and representative instance for each die.
///
/// Expects exactly one technology per die in addition to the root's, in
/// stacking order (the order they were added to the design). Returns the
/// child block IDs in stacking order.
pub fn build_die_blocks(
    design: &mut Design,
    num_dies: usize,
) -> Result<Vec<BlockId>, PartitionError> {
    if design.tech_count() != num_dies + 1 {
        return Err(PartitionError::TechCountMismatch {
            expected: num_dies + 1,
            found: design.tech_count(),
        });
    }
    let root = design.root;
    let root_tech = design.block(root).tech;
    let die_techs: Vec<TechId> = design
        .techs
        .iter()
        .map(|(id, _)| id)
        .filter(|id| *id != root_tech)
        .collect();

    let mut children = Vec::with_capacity(num_dies);
    for (i, tech) in die_techs.into_iter().enumerate() {
        let name = format!("die{i}");
        let child = design.create_child_block(root, name.clone(), tech);
        design.block_mut(child).die_area = design.block(root).die_area;
        let rows = design.block(root).rows.clone();
        design.block_mut(child).rows = rows;
        design
            .block_mut(root)
            .create_instance(Instance::new(name, InstKind::Rep { child }));
        children.push(child);
    }
    Ok(children)
}

/// Returns the root's representative instance for a child block.
pub fn rep_instance(design: &Design, child: BlockId) -> Option<strata_db::InstId> {
    design
        .root_block()
        .instances()
        .find(|(_, inst)| inst.child_block() == Some(child))
        .map(|(id, _)| id)
}
