//! Technology definitions: sites and masters (footprints).
//!
//! A [`Technology`] is the per-die library: the placement [`Site`]s its rows
//! are built from and the [`Master`] cell footprints its instances
//! instantiate. Each die of a stacked design carries its own technology;
//! masters correspond across technologies by name.

use crate::arena::Arena;
use crate::ids::MasterId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strata_common::Point;

/// A placement site: the unit step of a row grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Site name, unique within its technology.
    pub name: String,
    /// Site width in database units.
    pub width: i64,
    /// Site height (equals the row height) in database units.
    pub height: i64,
}

/// Direction of a master pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinDirection {
    /// Signal flows into the cell.
    Input,
    /// Signal flows out of the cell.
    Output,
}

/// A pin on a master, with its offset from the cell origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterPin {
    /// Pin name, unique within the master.
    pub name: String,
    /// Pin direction.
    pub direction: PinDirection,
    /// Pin location relative to the cell origin.
    pub offset: Point,
}

/// Whether a master is a row-placeable standard cell or a macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MasterKind {
    /// Standard cell, placed in rows.
    Core,
    /// Macro/block, not subject to row legalization.
    Block,
}

/// A reusable cell footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Master {
    /// Master name, unique within its technology.
    pub name: String,
    /// Cell width in database units.
    pub width: i64,
    /// Cell height in database units.
    pub height: i64,
    /// Standard cell vs. macro.
    pub kind: MasterKind,
    /// The site this master is legalized on, if one has been assigned.
    pub site: Option<Site>,
    /// Pin definitions.
    pub pins: Vec<MasterPin>,
}

impl Master {
    /// Returns the footprint area.
    pub fn area(&self) -> i64 {
        self.width * self.height
    }

    /// Finds a pin by name.
    pub fn find_pin(&self, name: &str) -> Option<&MasterPin> {
        self.pins.iter().find(|p| p.name == name)
    }
}

/// A per-die cell library: sites plus masters, indexed by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technology {
    /// Technology name.
    pub name: String,
    /// Placement sites defined by this technology.
    pub sites: Vec<Site>,
    /// Cell footprints.
    pub masters: Arena<MasterId, Master>,
    /// Index: master name to ID.
    #[serde(skip)]
    master_by_name: HashMap<String, MasterId>,
}

impl Technology {
    /// Creates an empty technology.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sites: Vec::new(),
            masters: Arena::new(),
            master_by_name: HashMap::new(),
        }
    }

    /// Adds a site definition.
    pub fn add_site(&mut self, site: Site) {
        self.sites.push(site);
    }

    /// Finds a site by name.
    pub fn find_site(&self, name: &str) -> Option<&Site> {
        self.sites.iter().find(|s| s.name == name)
    }

    /// Adds a master and returns its ID.
    pub fn add_master(&mut self, master: Master) -> MasterId {
        let name = master.name.clone();
        let id = self.masters.alloc(master);
        self.master_by_name.insert(name, id);
        id
    }

    /// Finds a master by name.
    pub fn find_master(&self, name: &str) -> Option<MasterId> {
        self.master_by_name.get(name).copied()
    }

    /// Returns the master with the given ID.
    pub fn master(&self, id: MasterId) -> &Master {
        &self.masters[id]
    }

    /// Returns a mutable reference to the master with the given ID.
    pub fn master_mut(&mut self, id: MasterId) -> &mut Master {
        &mut self.masters[id]
    }

    /// Rebuilds the name index after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.master_by_name.clear();
        for (id, master) in self.masters.iter() {
            self.master_by_name.insert(master.name.clone(), id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_master(name: &str, width: i64) -> Master {
        Master {
            name: name.to_string(),
            width,
            height: 200,
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
                    offset: Point::new(width - 1, 0),
                },
            ],
        }
    }

    #[test]
    fn add_and_find_master() {
        let mut tech = Technology::new("die0_tech");
        let id = tech.add_master(make_master("inv_x1", 100));
        assert_eq!(tech.find_master("inv_x1"), Some(id));
        assert!(tech.find_master("nand_x2").is_none());
        assert_eq!(tech.master(id).area(), 20_000);
    }

    #[test]
    fn find_pin() {
        let master = make_master("inv_x1", 100);
        assert_eq!(master.find_pin("z").unwrap().offset, Point::new(99, 0));
        assert!(master.find_pin("q").is_none());
    }

    #[test]
    fn sites() {
        let mut tech = Technology::new("t");
        tech.add_site(Site {
            name: "core_site".into(),
            width: 10,
            height: 200,
        });
        assert_eq!(tech.find_site("core_site").unwrap().width, 10);
        assert!(tech.find_site("other").is_none());
    }

    #[test]
    fn rebuild_indices_after_serde() {
        let mut tech = Technology::new("t");
        tech.add_master(make_master("buf_x4", 140));
        let json = serde_json::to_string(&tech).unwrap();
        let mut restored: Technology = serde_json::from_str(&json).unwrap();
        assert!(restored.find_master("buf_x4").is_none());
        restored.rebuild_indices();
        assert!(restored.find_master("buf_x4").is_some());
    }
}
