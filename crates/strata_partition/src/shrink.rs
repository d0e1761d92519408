//! Scaled technology copies for stacked dies.
//!
//! Lower dies of a stack are manufactured in a denser process; their
//! libraries are modeled as copies of the root technology with every linear
//! dimension multiplied by a shrink ratio. An area ratio `r` between
//! adjacent dies translates to a length ratio `sqrt(r)`, compounding down
//! the stack.

use strata_db::{Design, Master, MasterPin, Site, TechId, Technology};
use strata_common::Point;

/// Per-die length ratios for `num_dies` dies with the given per-die area
/// ratio. Die 0 is unscaled; die `i` scales by `sqrt(area_ratio)^i`.
pub fn shrink_ratios(num_dies: usize, area_ratio: f64) -> Vec<f64> {
    let step = area_ratio.sqrt();
    let mut ratios = Vec::with_capacity(num_dies);
    let mut ratio = 1.0;
    for _ in 0..num_dies {
        ratios.push(ratio);
        ratio *= step;
    }
    ratios
}

fn scale(value: i64, ratio: f64) -> i64 {
    (value as f64 * ratio) as i64
}

/// Clones a technology with every site and master dimension, and every pin
/// offset, multiplied by `length_ratio`. Returns the new technology's ID.
pub fn scaled_tech_copy(
    design: &mut Design,
    source: TechId,
    name: impl Into<String>,
    length_ratio: f64,
) -> TechId {
    let src = design.tech(source);
    let mut tech = Technology::new(name);
    for site in &src.sites {
        tech.add_site(Site {
            name: site.name.clone(),
            width: scale(site.width, length_ratio),
            height: scale(site.height, length_ratio),
        });
    }
    for master in src.masters.values() {
        tech.add_master(Master {
            name: master.name.clone(),
            width: scale(master.width, length_ratio),
            height: scale(master.height, length_ratio),
            kind: master.kind,
            site: master.site.as_ref().map(|site| Site {
                name: site.name.clone(),
                width: scale(site.width, length_ratio),
                height: scale(site.height, length_ratio),
            }),
            pins: master
                .pins
                .iter()
                .map(|pin| MasterPin {
                    name: pin.name.clone(),
                    direction: pin.direction,
                    offset: Point::new(
                        scale(pin.offset.x, length_ratio),
                        scale(pin.offset.y, length_ratio),
                    ),
                })
                .collect(),
        });
    }
    design.add_tech(tech)
}

/// Creates one technology per die from the root technology: die 0 at ratio
/// 1.0, each lower die compounding `sqrt(area_ratio)`. Returns the new IDs
/// in stacking order.
pub fn make_shrunk_techs(design: &mut Design, num_dies: usize, area_ratio: f64) -> Vec<TechId> {
    let root_tech = design.block(design.root).tech;
    shrink_ratios(num_dies, area_ratio)
        .into_iter()
        .enumerate()
        .map(|(i, ratio)| scaled_tech_copy(design, root_tech, format!("die{i}_tech"), ratio))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_db::{MasterKind, PinDirection};

    fn make_design() -> Design {
        let mut tech = Technology::new("t");
        tech.add_site(Site {
            name: "core".into(),
            width: 10,
            height: 20,
        });
        tech.add_master(Master {
            name: "inv".into(),
            width: 10,
            height: 20,
            kind: MasterKind::Core,
            site: None,
            pins: vec![MasterPin {
                name: "a".into(),
                direction: PinDirection::Input,
                offset: Point::new(8, 16),
            }],
        });
        Design::new("top", tech)
    }

    #[test]
    fn ratios_compound_sqrt() {
        let ratios = shrink_ratios(3, 0.25);
        assert_eq!(ratios.len(), 3);
        assert!((ratios[0] - 1.0).abs() < 1e-12);
        assert!((ratios[1] - 0.5).abs() < 1e-12);
        assert!((ratios[2] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn copy_scales_all_dimensions() {
        let mut design = make_design();
        let root_tech = design.block(design.root).tech;
        let id = scaled_tech_copy(&mut design, root_tech, "die1_tech", 0.5);
        let tech = design.tech(id);
        assert_eq!(tech.name, "die1_tech");
        assert_eq!(tech.find_site("core").unwrap().width, 5);
        let inv = tech.find_master("inv").unwrap();
        let master = tech.master(inv);
        assert_eq!((master.width, master.height), (5, 10));
        assert_eq!(master.pins[0].offset, Point::new(4, 8));
    }

    #[test]
    fn unit_ratio_copies_verbatim() {
        let mut design = make_design();
        let root_tech = design.block(design.root).tech;
        let id = scaled_tech_copy(&mut design, root_tech, "die0_tech", 1.0);
        let tech = design.tech(id);
        let inv = tech.find_master("inv").unwrap();
        assert_eq!(tech.master(inv).width, 10);
    }

    #[test]
    fn shrunk_techs_in_stacking_order() {
        let mut design = make_design();
        let ids = make_shrunk_techs(&mut design, 2, 0.25);
        assert_eq!(ids.len(), 2);
        assert_eq!(design.tech_count(), 3);
        assert_eq!(design.tech(ids[0]).name, "die0_tech");
        let inv = design.tech(ids[1]).find_master("inv").unwrap();
        assert_eq!(design.tech(ids[1]).master(inv).width, 5);
    }
}
