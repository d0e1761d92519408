//! Read-only reporting queries: wirelength and utilization.
//!
//! Used by the front end for regression reporting; nothing here mutates the
//! design.

use crate::block::Block;
use crate::design::Design;
use crate::ids::BlockId;
use strata_common::{Point, Rect};

/// Returns the total half-perimeter wirelength of a block.
///
/// Each net contributes the half-perimeter of the bounding box of its
/// connected instance pin positions (instance location plus master pin
/// offset; the instance location alone when no pin geometry is known).
/// Boundary terminals carry no geometry and are ignored.
pub fn total_hpwl(design: &Design, block_id: BlockId) -> i64 {
    let block = design.block(block_id);
    let tech = design.tech(block.tech);
    let mut total = 0;
    for (_, net) in block.net_iter() {
        let mut bbox: Option<Rect> = None;
        for (inst_id, term) in &net.iterms {
            let Some(inst) = block.insts.get(*inst_id) else {
                continue;
            };
            let mut p = inst.location;
            if let Some(master) = inst.master() {
                if let Some(pin) = tech.master(master).find_pin(term) {
                    p = Point::new(p.x + pin.offset.x, p.y + pin.offset.y);
                }
            }
            match &mut bbox {
                Some(bbox) => bbox.expand_to(p),
                None => bbox = Some(Rect::at_point(p)),
            }
        }
        if let Some(bbox) = bbox {
            total += bbox.half_perimeter();
        }
    }
    total
}

/// Returns the total half-perimeter wirelength of the whole design:
/// the root block plus every child, in creation order.
pub fn design_hpwl(design: &Design) -> i64 {
    let mut total = total_hpwl(design, design.root);
    for &child in &design.root_block().children {
        total += total_hpwl(design, child);
    }
    total
}

/// Returns a block's cell utilization: the sum of instance footprint areas
/// divided by the die area. Representative instances have no footprint and
/// are excluded; macros count.
pub fn utilization(design: &Design, block_id: BlockId) -> f64 {
    let block = design.block(block_id);
    let die_area = block.die_area.area();
    if die_area <= 0 {
        return 0.0;
    }
    cell_area(design, block) as f64 / die_area as f64
}

/// Sum of master footprint areas over a block's leaf instances.
pub fn cell_area(design: &Design, block: &Block) -> i64 {
    let tech = design.tech(block.tech);
    block
        .instances()
        .filter_map(|(_, inst)| inst.master())
        .map(|m| tech.master(m).area())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{InstKind, Instance, PlaceStatus};
    use crate::tech::{Master, MasterKind, MasterPin, PinDirection, Technology};
    use strata_common::Point;

    fn make_design() -> Design {
        let mut tech = Technology::new("t");
        tech.add_master(Master {
            name: "inv".into(),
            width: 10,
            height: 20,
            kind: MasterKind::Core,
            site: None,
            pins: vec![
                MasterPin {
                    name: "a".into(),
                    direction: PinDirection::Input,
                    offset: Point::new(0, 0),
                },
                MasterPin {
                    name: "z".into(),
                    direction: PinDirection::Output,
                    offset: Point::new(9, 0),
                },
            ],
        });
        let mut design = Design::new("top", tech);
        design.block_mut(design.root).die_area = strata_common::Rect::new(0, 0, 100, 100);
        design
    }

    fn place(design: &mut Design, name: &str, x: i64, y: i64) -> crate::ids::InstId {
        let root = design.root;
        let master = design.tech(design.block(root).tech).find_master("inv").unwrap();
        let mut inst = Instance::new(name, InstKind::Cell { master });
        inst.status = PlaceStatus::Placed;
        inst.location = Point::new(x, y);
        design.block_mut(root).create_instance(inst)
    }

    #[test]
    fn hpwl_empty_block_is_zero() {
        let design = make_design();
        assert_eq!(total_hpwl(&design, design.root), 0);
    }

    #[test]
    fn hpwl_two_pin_net() {
        let mut design = make_design();
        let root = design.root;
        let u1 = place(&mut design, "u1", 0, 0);
        let u2 = place(&mut design, "u2", 50, 30);
        let n = design.block_mut(root).create_net("n1");
        design.block_mut(root).connect(u1, "z", n);
        design.block_mut(root).connect(u2, "a", n);
        // u1/z pin at (9, 0), u2/a pin at (50, 30)
        assert_eq!(total_hpwl(&design, root), (50 - 9) + 30);
    }

    #[test]
    fn hpwl_single_terminal_net_is_zero() {
        let mut design = make_design();
        let root = design.root;
        let u1 = place(&mut design, "u1", 5, 5);
        let n = design.block_mut(root).create_net("n1");
        design.block_mut(root).connect(u1, "z", n);
        assert_eq!(total_hpwl(&design, root), 0);
    }

    #[test]
    fn utilization_counts_leaf_cells() {
        let mut design = make_design();
        place(&mut design, "u1", 0, 0);
        place(&mut design, "u2", 20, 0);
        // Two 10x20 cells on a 100x100 die
        let util = utilization(&design, design.root);
        assert!((util - 0.04).abs() < 1e-9);
    }

    #[test]
    fn utilization_ignores_rep_instances() {
        let mut design = make_design();
        let root = design.root;
        let t = design.add_tech(Technology::new("die0_tech"));
        let child = design.create_child_block(root, "die0", t);
        design
            .block_mut(root)
            .create_instance(Instance::new("die0", InstKind::Rep { child }));
        assert_eq!(utilization(&design, root), 0.0);
    }
}
