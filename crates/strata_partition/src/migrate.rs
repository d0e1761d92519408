//! Instance migration from the root block into die blocks.
//!
//! The database ties an instance's identity to its block, so a move is a
//! destroy-and-recreate: copy placement, connectivity, attributes, and group
//! membership into a freshly created same-named instance in the destination,
//! then destroy the source record. The old ID is never reused across blocks.

use crate::assign::PARTITION_ATTR;
use crate::error::PartitionError;
use std::collections::BTreeMap;
use strata_common::{DiagnosticSink, InternalError, Point};
use strata_db::{AttrValue, BlockId, Design, GroupId, InstId, InstKind, Instance, PlaceStatus};

/// Moves one instance to the die its `partition_id` attribute names.
///
/// An instance without the attribute is reported through the sink and left
/// in place. An out-of-range die index or a master name missing from the
/// die's technology is a broken setup invariant and aborts. Already being
/// in the target block is a no-op. Returns whether the instance moved.
pub fn switch_instance_to_assigned_die(
    design: &mut Design,
    sink: &DiagnosticSink,
    source: BlockId,
    inst: InstId,
) -> Result<bool, PartitionError> {
    let record = design.block(source).inst(inst);
    let name = record.name.clone();

    let master_name = match record.kind {
        InstKind::Cell { master } => design.tech(design.block(source).tech).master(master).name.clone(),
        // Representative instances stand for whole dies and never migrate.
        InstKind::Rep { .. } => return Ok(false),
    };
    let Some(die) = record.int_attr(PARTITION_ATTR) else {
        sink.warn(format!(
            "instance `{name}` has no {PARTITION_ATTR} attribute, leaving it unmigrated"
        ));
        return Ok(false);
    };

    let children = &design.root_block().children;
    let target = usize::try_from(die)
        .ok()
        .and_then(|idx| children.get(idx).copied())
        .ok_or_else(|| {
            InternalError::on_entity(
                &name,
                format!("assigned die {die} but only {} dies exist", children.len()),
            )
        })?;
    if target == source {
        return Ok(false);
    }

    let target_tech = design.block(target).tech;
    let target_master = design
        .tech(target_tech)
        .find_master(&master_name)
        .ok_or_else(|| {
            InternalError::on_entity(
                &master_name,
                format!(
                    "master missing from technology `{}`",
                    design.tech(target_tech).name
                ),
            )
        })?;

    // A die library read without row information carries siteless masters;
    // adopt the site of the target block's first row.
    if design.tech(target_tech).master(target_master).site.is_none() {
        if let Some(row) = design.block(target).rows.first() {
            let site = row.site.clone();
            design.tech_mut(target_tech).master_mut(target_master).site = Some(site);
        }
    }

    let (status, location, conns, attrs, group) = collect(design, source, inst);

    let mut new_inst = Instance::new(name, InstKind::Cell { master: target_master });
    new_inst.status = match status {
        // Locking is a root-block-only concept.
        PlaceStatus::Firm => PlaceStatus::Placed,
        other => other,
    };
    if new_inst.status != PlaceStatus::Unplaced {
        new_inst.location = location;
    }
    new_inst.attrs = attrs;
    let new_id = design.block_mut(target).create_instance(new_inst);

    for (term, net_name) in conns {
        let net = design.block_mut(target).find_or_create_net(&net_name);
        design.block_mut(target).connect(new_id, &term, net);
    }
    if let Some(group) = group {
        design.add_to_group(group, target, new_id);
    }

    design.destroy_instance(source, inst);
    Ok(true)
}

type Collected = (
    PlaceStatus,
    Point,
    BTreeMap<String, String>,
    BTreeMap<String, AttrValue>,
    Option<GroupId>,
);

/// Snapshots everything the new instance inherits, by value, so the source
/// record can be destroyed afterwards.
fn collect(design: &Design, source: BlockId, inst: InstId) -> Collected {
    let block = design.block(source);
    let record = block.inst(inst);
    let conns = record
        .conns
        .iter()
        .map(|(term, net)| (term.clone(), block.net(*net).name.clone()))
        .collect();
    (
        record.status,
        record.location,
        conns,
        record.attrs.clone(),
        record.group,
    )
}

/// Migrates every root instance carrying a `partition_id` attribute.
/// Returns the number of instances moved.
pub fn migrate_all(design: &mut Design, sink: &DiagnosticSink) -> Result<usize, PartitionError> {
    let root = design.root;
    let mut moved = 0;
    for inst in design.block(root).insts.ids() {
        if switch_instance_to_assigned_die(design, sink, root, inst)? {
            moved += 1;
        }
    }
    Ok(moved)
}
