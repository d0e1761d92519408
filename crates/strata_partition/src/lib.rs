//! Die partitioning for the Strata multi-die flow.
//!
//! Takes a flat root design plus a per-instance die assignment and produces
//! a stacked-die hierarchy: scaled per-die technologies, one child block per
//! die, every assigned instance migrated into its die, and synthesized
//! cross-die interconnect. [`DieStackFlow`] strings the stages together for
//! the front end; each stage is also callable on its own.
//!
//! # Pipeline
//!
//! 1. **Assign** — read or synthesize `<instance> <dieIndex>` assignments
//! 2. **Build dies** — shrunk technologies, child blocks, representatives
//! 3. **Migrate** — destroy-and-recreate each instance in its die
//! 4. **Interconnect** — bond split nets through the root block

#![warn(missing_docs)]

pub mod assign;
pub mod error;
pub mod interconnect;
pub mod migrate;
pub mod shrink;
pub mod topology;

pub use assign::{
    apply_assignments, bisect_by_area, parse_assignments, read_assignments, PARTITION_ATTR,
};
pub use error::PartitionError;
pub use interconnect::{synthesize_interconnect, InterconnectReport};
pub use migrate::{migrate_all, switch_instance_to_assigned_die};
pub use shrink::{make_shrunk_techs, scaled_tech_copy, shrink_ratios};
pub use topology::{build_die_blocks, rep_instance};

use strata_common::DiagnosticSink;
use strata_db::{BlockId, Design};

/// Partitioning pipeline configuration and entry points.
#[derive(Debug, Clone, Copy)]
pub struct DieStackFlow {
    /// Number of dies in the stack.
    pub num_dies: usize,
    /// Area ratio between adjacent dies (1.0 = no shrink).
    pub area_ratio: f64,
}

impl DieStackFlow {
    /// Creates a flow for `num_dies` dies with the given area ratio.
    pub fn new(num_dies: usize, area_ratio: f64) -> Self {
        Self {
            num_dies,
            area_ratio,
        }
    }

    /// Builds the die topology.
    ///
    /// A design carrying only the root technology gets one shrunk copy per
    /// die first; a design that already carries one technology per die (a
    /// contest benchmark) uses them as-is. Any other count is a fatal
    /// mismatch.
    pub fn build_dies(&self, design: &mut Design) -> Result<Vec<BlockId>, PartitionError> {
        if design.tech_count() == 1 {
            make_shrunk_techs(design, self.num_dies, self.area_ratio);
        }
        build_die_blocks(design, self.num_dies)
    }

    /// Migrates all assigned instances and synthesizes the interconnect.
    /// Returns `(instances moved, interconnect report)`.
    pub fn distribute(
        &self,
        design: &mut Design,
        sink: &DiagnosticSink,
    ) -> Result<(usize, InterconnectReport), PartitionError> {
        let moved = migrate_all(design, sink)?;
        let report = synthesize_interconnect(design);
        Ok((moved, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_db::{
        AttrValue, InstKind, Instance, Master, MasterKind, Technology,
    };

    fn make_flat_design() -> Design {
        let mut tech = Technology::new("top_hier");
        let master = tech.add_master(Master {
            name: "inv".into(),
            width: 4,
            height: 8,
            kind: MasterKind::Core,
            site: None,
            pins: Vec::new(),
        });
        let mut design = Design::new("top", tech);
        let root = design.root;
        design.block_mut(root).die_area = strata_common::Rect::new(0, 0, 100, 100);
        for (i, die) in [0i64, 1, 0, 1].iter().enumerate() {
            let mut inst = Instance::new(format!("u{i}"), InstKind::Cell { master });
            inst.set_attr(PARTITION_ATTR, AttrValue::Int(*die));
            design.block_mut(root).create_instance(inst);
        }
        design
    }

    #[test]
    fn flow_builds_and_distributes() {
        let mut design = make_flat_design();
        let flow = DieStackFlow::new(2, 0.5);
        let children = flow.build_dies(&mut design).unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(design.tech_count(), 3);

        let sink = DiagnosticSink::new();
        let (moved, _) = flow.distribute(&mut design, &sink).unwrap();
        assert_eq!(moved, 4);
        assert_eq!(design.block(children[0]).insts.len(), 2);
        assert_eq!(design.block(children[1]).insts.len(), 2);
        // Only the two representatives remain in the root.
        assert_eq!(design.root_block().insts.len(), 2);
    }

    #[test]
    fn flow_rejects_partial_tech_sets() {
        let mut design = make_flat_design();
        design.add_tech(Technology::new("stray"));
        let flow = DieStackFlow::new(2, 0.5);
        assert!(matches!(
            flow.build_dies(&mut design),
            Err(PartitionError::TechCountMismatch { .. })
        ));
    }
}
