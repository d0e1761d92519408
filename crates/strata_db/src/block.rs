//! Blocks: hierarchical netlist containers.
//!
//! The root block is the flattened parent design; each child block is one
//! die's sub-design with its own technology, row grid, instances and nets.
//! Connectivity bookkeeping (instance terminal maps and net terminal sets)
//! is kept consistent by routing all connect/disconnect traffic through
//! block methods.

use crate::arena::SlotArena;
use crate::ids::{BlockId, InstId, NetId, TechId};
use crate::instance::Instance;
use crate::net::Net;
use crate::row::Row;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use strata_common::Rect;

/// A hierarchical netlist container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Block name, unique within the design.
    pub name: String,
    /// The technology this block's masters come from.
    pub tech: TechId,
    /// The die outline.
    pub die_area: Rect,
    /// Placement rows, in ascending-Y creation order.
    pub rows: Vec<Row>,
    /// Instances, with tombstoned removal (instances migrate away).
    pub insts: SlotArena<InstId, Instance>,
    /// Nets, with tombstoned removal (dangling nets are swept).
    pub nets: SlotArena<NetId, Net>,
    /// Boundary terminals: name to the net exposed at the boundary.
    pub bterm_by_name: BTreeMap<String, NetId>,
    /// Child blocks in creation (die stacking) order.
    pub children: Vec<BlockId>,
    /// The parent block, `None` for the root.
    pub parent: Option<BlockId>,
    /// Index: instance name to ID (rebuilt on deserialization).
    #[serde(skip)]
    inst_by_name: HashMap<String, InstId>,
    /// Index: net name to ID (rebuilt on deserialization).
    #[serde(skip)]
    net_by_name: HashMap<String, NetId>,
}

impl Block {
    /// Creates an empty block.
    pub fn new(name: impl Into<String>, tech: TechId) -> Self {
        Self {
            name: name.into(),
            tech,
            die_area: Rect::default(),
            rows: Vec::new(),
            insts: SlotArena::new(),
            nets: SlotArena::new(),
            bterm_by_name: BTreeMap::new(),
            children: Vec::new(),
            parent: None,
            inst_by_name: HashMap::new(),
            net_by_name: HashMap::new(),
        }
    }

    /// Adds an instance and returns its ID.
    pub fn create_instance(&mut self, inst: Instance) -> InstId {
        let name = inst.name.clone();
        let id = self.insts.alloc(inst);
        self.inst_by_name.insert(name, id);
        id
    }

    /// Finds an instance by name.
    pub fn find_instance(&self, name: &str) -> Option<InstId> {
        self.inst_by_name
            .get(name)
            .copied()
            .filter(|id| self.insts.contains(*id))
    }

    /// Returns the instance with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the instance has been destroyed.
    pub fn inst(&self, id: InstId) -> &Instance {
        &self.insts[id]
    }

    /// Returns a mutable reference to the instance with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the instance has been destroyed.
    pub fn inst_mut(&mut self, id: InstId) -> &mut Instance {
        &mut self.insts[id]
    }

    /// Destroys an instance, disconnecting all of its terminals first.
    ///
    /// Group membership cleanup is handled at the design level; see
    /// [`Design::destroy_instance`](crate::design::Design::destroy_instance).
    pub fn destroy_instance(&mut self, id: InstId) -> Option<Instance> {
        let terms: Vec<String> = self.insts.get(id)?.conns.keys().cloned().collect();
        for term in terms {
            self.disconnect(id, &term);
        }
        let inst = self.insts.remove(id)?;
        self.inst_by_name.remove(&inst.name);
        Some(inst)
    }

    /// Adds a net and returns its ID.
    pub fn create_net(&mut self, name: impl Into<String>) -> NetId {
        let net = Net::new(name);
        let name = net.name.clone();
        let id = self.nets.alloc(net);
        self.net_by_name.insert(name, id);
        id
    }

    /// Finds a net by name.
    pub fn find_net(&self, name: &str) -> Option<NetId> {
        self.net_by_name
            .get(name)
            .copied()
            .filter(|id| self.nets.contains(*id))
    }

    /// Finds a net by name, creating it if absent.
    pub fn find_or_create_net(&mut self, name: &str) -> NetId {
        match self.find_net(name) {
            Some(id) => id,
            None => self.create_net(name),
        }
    }

    /// Returns the net with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the net has been destroyed.
    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id]
    }

    /// Returns a mutable reference to the net with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the net has been destroyed.
    pub fn net_mut(&mut self, id: NetId) -> &mut Net {
        &mut self.nets[id]
    }

    /// Destroys a net, removing its boundary terminals and detaching any
    /// remaining instance terminals.
    pub fn destroy_net(&mut self, id: NetId) -> Option<Net> {
        let net = self.nets.remove(id)?;
        self.net_by_name.remove(&net.name);
        for bterm in &net.bterms {
            self.bterm_by_name.remove(bterm);
        }
        for (inst, term) in &net.iterms {
            if let Some(inst) = self.insts.get_mut(*inst) {
                inst.conns.remove(term);
            }
        }
        Some(net)
    }

    /// Connects an instance terminal to a net.
    ///
    /// If the terminal was connected to another net, it is disconnected
    /// first. Connecting the same terminal to the same net is a no-op.
    pub fn connect(&mut self, inst: InstId, term: &str, net: NetId) {
        if let Some(&prev) = self.insts[inst].conns.get(term) {
            if prev == net {
                return;
            }
            self.disconnect(inst, term);
        }
        self.insts[inst].conns.insert(term.to_string(), net);
        self.nets[net].iterms.push((inst, term.to_string()));
    }

    /// Disconnects an instance terminal from whatever net it is on.
    pub fn disconnect(&mut self, inst: InstId, term: &str) {
        let Some(net) = self.insts[inst].conns.remove(term) else {
            return;
        };
        if let Some(net) = self.nets.get_mut(net) {
            net.iterms.retain(|(i, t)| !(*i == inst && t == term));
        }
    }

    /// Creates a boundary terminal with the given name on a net.
    ///
    /// Re-creating an existing boundary terminal on the same net is a no-op.
    pub fn create_bterm(&mut self, net: NetId, name: &str) {
        if !self.nets[net].has_bterm(name) {
            self.nets[net].bterms.push(name.to_string());
        }
        self.bterm_by_name.insert(name.to_string(), net);
    }

    /// Adds a placement row.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Iterates over live instances.
    pub fn instances(&self) -> impl Iterator<Item = (InstId, &Instance)> {
        self.insts.iter()
    }

    /// Iterates over live nets.
    pub fn net_iter(&self) -> impl Iterator<Item = (NetId, &Net)> {
        self.nets.iter()
    }

    /// Rebuilds the name indexes after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.inst_by_name.clear();
        for (id, inst) in self.insts.iter() {
            self.inst_by_name.insert(inst.name.clone(), id);
        }
        self.net_by_name.clear();
        for (id, net) in self.nets.iter() {
            self.net_by_name.insert(net.name.clone(), id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::MasterId;
    use crate::instance::InstKind;

    fn cell(name: &str) -> Instance {
        Instance::new(name, InstKind::Cell {
            master: MasterId::from_raw(0),
        })
    }

    fn make_block() -> Block {
        Block::new("top", TechId::from_raw(0))
    }

    #[test]
    fn create_and_find_instance() {
        let mut block = make_block();
        let id = block.create_instance(cell("u1"));
        assert_eq!(block.find_instance("u1"), Some(id));
        assert!(block.find_instance("u2").is_none());
    }

    #[test]
    fn connect_tracks_both_sides() {
        let mut block = make_block();
        let u1 = block.create_instance(cell("u1"));
        let u2 = block.create_instance(cell("u2"));
        let n = block.create_net("n1");
        block.connect(u1, "z", n);
        block.connect(u2, "a", n);
        assert_eq!(block.net(n).term_count(), 2);
        assert_eq!(block.inst(u1).conns["z"], n);
        assert!(block.net(n).has_iterm(u2, "a"));
    }

    #[test]
    fn reconnect_moves_terminal() {
        let mut block = make_block();
        let u1 = block.create_instance(cell("u1"));
        let n1 = block.create_net("n1");
        let n2 = block.create_net("n2");
        block.connect(u1, "z", n1);
        block.connect(u1, "z", n2);
        assert_eq!(block.net(n1).term_count(), 0);
        assert_eq!(block.net(n2).term_count(), 1);
        assert_eq!(block.inst(u1).conns["z"], n2);
    }

    #[test]
    fn connect_same_net_twice_is_noop() {
        let mut block = make_block();
        let u1 = block.create_instance(cell("u1"));
        let n = block.create_net("n1");
        block.connect(u1, "z", n);
        block.connect(u1, "z", n);
        assert_eq!(block.net(n).iterms.len(), 1);
    }

    #[test]
    fn destroy_instance_disconnects() {
        let mut block = make_block();
        let u1 = block.create_instance(cell("u1"));
        let n = block.create_net("n1");
        block.connect(u1, "z", n);
        let inst = block.destroy_instance(u1).unwrap();
        assert_eq!(inst.name, "u1");
        assert_eq!(block.net(n).term_count(), 0);
        assert!(block.find_instance("u1").is_none());
        assert!(block.destroy_instance(u1).is_none());
    }

    #[test]
    fn find_or_create_net() {
        let mut block = make_block();
        let a = block.find_or_create_net("n1");
        let b = block.find_or_create_net("n1");
        assert_eq!(a, b);
        assert_eq!(block.nets.len(), 1);
    }

    #[test]
    fn destroy_net_cleans_up() {
        let mut block = make_block();
        let u1 = block.create_instance(cell("u1"));
        let n = block.create_net("n1");
        block.connect(u1, "z", n);
        block.create_bterm(n, "n1");
        block.destroy_net(n);
        assert!(block.find_net("n1").is_none());
        assert!(block.bterm_by_name.is_empty());
        assert!(block.inst(u1).conns.is_empty());
    }

    #[test]
    fn bterm_create_idempotent() {
        let mut block = make_block();
        let n = block.create_net("io_a");
        block.create_bterm(n, "io_a");
        block.create_bterm(n, "io_a");
        assert_eq!(block.net(n).bterms.len(), 1);
        assert_eq!(block.bterm_by_name["io_a"], n);
    }

    #[test]
    fn rebuild_indices() {
        let mut block = make_block();
        block.create_instance(cell("u1"));
        block.create_net("n1");
        let json = serde_json::to_string(&block).unwrap();
        let mut restored: Block = serde_json::from_str(&json).unwrap();
        assert!(restored.find_instance("u1").is_none());
        restored.rebuild_indices();
        assert!(restored.find_instance("u1").is_some());
        assert!(restored.find_net("n1").is_some());
    }
}
