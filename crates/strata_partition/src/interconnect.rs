//! Cross-die interconnect synthesis.
//!
//! After migration, a net whose name appears in two adjacent dies has been
//! split by the partition. For each such pair this pass creates a bond net
//! in the dies' common ancestor (the root), exposes the net at each die's
//! boundary, wires the bond net through the two representative instances,
//! and tags all three nets as crossing. Correspondence is by exact net
//! name; no connectivity inference is attempted.
//!
//! A name spanning more than two dies bonds only its lowest adjacent pair:
//! once a die's copy is tagged it never participates in a later pair, so
//! each child net carries at most one boundary terminal per name.

use crate::topology::rep_instance;
use strata_db::{BlockId, Design};

/// What interconnect synthesis did, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterconnectReport {
    /// Bond nets created in the root block.
    pub bond_nets: usize,
    /// Root boundary terminals replicated into die blocks.
    pub replicated_bterms: usize,
    /// Zero-terminal nets destroyed at the end of the pass.
    pub swept_nets: usize,
}

/// Synthesizes the cross-die interconnect. Runs after all migrations;
/// re-running is a no-op for nets already tagged.
pub fn synthesize_interconnect(design: &mut Design) -> InterconnectReport {
    let mut report = InterconnectReport::default();
    let root = design.root;
    let children = design.root_block().children.clone();

    for (lower_idx, pair) in children.windows(2).enumerate() {
        let (lower, upper) = (pair[0], pair[1]);
        for name in split_net_names(design, lower, upper) {
            bond_pair(design, lower, upper, lower_idx, &name);
            report.bond_nets += 1;
        }
    }

    // Root I/O reaches a die through the same boundary-terminal mechanism.
    let root_bterms: Vec<(String, strata_db::NetId)> = design
        .block(root)
        .bterm_by_name
        .iter()
        .map(|(name, net)| (name.clone(), *net))
        .collect();
    for (name, root_net) in root_bterms {
        for &child in &children {
            let Some(child_net) = design.block(child).find_net(&name) else {
                continue;
            };
            if design.block(child).net(child_net).has_bterm(&name) {
                continue;
            }
            design.block_mut(child).create_bterm(child_net, &name);
            if let Some(rep) = rep_instance(design, child) {
                design.block_mut(root).connect(rep, &name, root_net);
            }
            report.replicated_bterms += 1;
        }
    }

    // Migration leaves empty husks of fully-moved nets behind; sweep them.
    let mut blocks = vec![root];
    blocks.extend(children);
    for block in blocks {
        for net in design.block(block).nets.ids() {
            if design.block(block).net(net).term_count() == 0 {
                design.block_mut(block).destroy_net(net);
                report.swept_nets += 1;
            }
        }
    }
    report
}

/// Net names present in both dies and not yet bonded, in the lower die's
/// creation order.
fn split_net_names(design: &Design, lower: BlockId, upper: BlockId) -> Vec<String> {
    design
        .block(lower)
        .net_iter()
        .filter(|(_, net)| !net.crosses_die)
        .filter(|(_, net)| {
            design
                .block(upper)
                .find_net(&net.name)
                .is_some_and(|id| !design.block(upper).net(id).crosses_die)
        })
        .map(|(_, net)| net.name.clone())
        .collect()
}

/// Bonds one split net across one adjacent die pair.
fn bond_pair(design: &mut Design, lower: BlockId, upper: BlockId, lower_idx: usize, name: &str) {
    let root = design.root;
    let bond_net = design
        .block_mut(root)
        .create_net(format!("{name}__bond{lower_idx}"));

    for block in [lower, upper] {
        let Some(net) = design.block(block).find_net(name) else {
            continue;
        };
        design.block_mut(block).create_bterm(net, name);
        design.block_mut(block).net_mut(net).crosses_die = true;
        if let Some(rep) = rep_instance(design, block) {
            design.block_mut(root).connect(rep, name, bond_net);
        }
    }
    design.block_mut(root).net_mut(bond_net).crosses_die = true;
}
