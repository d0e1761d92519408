//! Cell instances.
//!
//! An [`Instance`] lives in exactly one block. Ordinary instances
//! ([`InstKind::Cell`]) instantiate a master from the block's technology;
//! representative instances ([`InstKind::Rep`]) stand in for an entire child
//! block and carry the parent-side terminals of cross-die connections.

use crate::attr::AttrValue;
use crate::ids::{BlockId, GroupId, MasterId, NetId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strata_common::Point;

/// Placement status of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceStatus {
    /// No location assigned.
    Unplaced,
    /// Placed, movable by legalization.
    Placed,
    /// Placed and locked. Only meaningful in the root block; migration
    /// degrades it to [`PlaceStatus::Placed`].
    Firm,
}

/// What an instance instantiates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstKind {
    /// A leaf cell with a master footprint.
    Cell {
        /// The master in the owning block's technology.
        master: MasterId,
    },
    /// A representative instance standing in for a child block.
    Rep {
        /// The child block this instance represents.
        child: BlockId,
    },
}

/// A cell instance within a block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// Instance name, unique within its block.
    pub name: String,
    /// Leaf cell or child-block representative.
    pub kind: InstKind,
    /// Placement status.
    pub status: PlaceStatus,
    /// Lower-left location (meaningful when placed).
    pub location: Point,
    /// Terminal connections: terminal name to the connected net.
    pub conns: BTreeMap<String, NetId>,
    /// Group membership, if any.
    pub group: Option<GroupId>,
    /// Open-ended typed attribute bag.
    pub attrs: BTreeMap<String, AttrValue>,
}

impl Instance {
    /// Creates an unplaced, unconnected instance.
    pub fn new(name: impl Into<String>, kind: InstKind) -> Self {
        Self {
            name: name.into(),
            kind,
            status: PlaceStatus::Unplaced,
            location: Point::default(),
            conns: BTreeMap::new(),
            group: None,
            attrs: BTreeMap::new(),
        }
    }

    /// Returns the master ID for leaf cells, `None` for representatives.
    pub fn master(&self) -> Option<MasterId> {
        match self.kind {
            InstKind::Cell { master } => Some(master),
            InstKind::Rep { .. } => None,
        }
    }

    /// Returns the child block for representatives, `None` for leaf cells.
    pub fn child_block(&self) -> Option<BlockId> {
        match self.kind {
            InstKind::Cell { .. } => None,
            InstKind::Rep { child } => Some(child),
        }
    }

    /// Returns whether the instance has a location (placed or firm).
    pub fn is_placed(&self) -> bool {
        self.status != PlaceStatus::Unplaced
    }

    /// Sets an attribute, replacing any previous value under the same name.
    pub fn set_attr(&mut self, name: impl Into<String>, value: AttrValue) {
        self.attrs.insert(name.into(), value);
    }

    /// Looks up an attribute by name.
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    /// Looks up an integer attribute by name.
    pub fn int_attr(&self, name: &str) -> Option<i64> {
        self.attrs.get(name).and_then(AttrValue::as_int)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_instance_is_unplaced() {
        let inst = Instance::new("u1", InstKind::Cell {
            master: MasterId::from_raw(0),
        });
        assert!(!inst.is_placed());
        assert!(inst.conns.is_empty());
        assert!(inst.group.is_none());
        assert_eq!(inst.master(), Some(MasterId::from_raw(0)));
        assert!(inst.child_block().is_none());
    }

    #[test]
    fn rep_instance_kind() {
        let rep = Instance::new("die1", InstKind::Rep {
            child: BlockId::from_raw(2),
        });
        assert!(rep.master().is_none());
        assert_eq!(rep.child_block(), Some(BlockId::from_raw(2)));
    }

    #[test]
    fn placed_statuses() {
        let mut inst = Instance::new("u1", InstKind::Cell {
            master: MasterId::from_raw(0),
        });
        inst.status = PlaceStatus::Placed;
        assert!(inst.is_placed());
        inst.status = PlaceStatus::Firm;
        assert!(inst.is_placed());
    }

    #[test]
    fn attribute_bag() {
        let mut inst = Instance::new("u1", InstKind::Cell {
            master: MasterId::from_raw(0),
        });
        inst.set_attr("partition_id", AttrValue::Int(2));
        inst.set_attr("origin", AttrValue::Str("netlist.v".into()));
        assert_eq!(inst.int_attr("partition_id"), Some(2));
        assert_eq!(inst.attr("origin").unwrap().as_str(), Some("netlist.v"));
        assert!(inst.attr("missing").is_none());
        // Replacement, not accumulation
        inst.set_attr("partition_id", AttrValue::Int(0));
        assert_eq!(inst.int_attr("partition_id"), Some(0));
        assert_eq!(inst.attrs.len(), 2);
    }
}
