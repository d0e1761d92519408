//! Top-level design container.
//!
//! A [`Design`] owns the block hierarchy, the technologies, and the
//! design-level instance groups. Cross-block operations (child block
//! creation, instance destruction with group cleanup) live here so that
//! every mutation is a sequence of single-borrow steps on one block at a
//! time.

use crate::arena::Arena;
use crate::block::Block;
use crate::ids::{BlockId, GroupId, InstId, TechId};
use crate::tech::Technology;
use serde::{Deserialize, Serialize};

/// A design-level instance group. Groups are not die-scoped: members may
/// live in different blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Group name, unique within the design.
    pub name: String,
    /// Member instances, identified by `(block, instance)`.
    pub members: Vec<(BlockId, InstId)>,
}

/// A complete stacked-die design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Design {
    /// All technologies. Index 0 is the root block's; indexes `1..=N`
    /// correspond to dies in stacking order once the dies are built.
    pub techs: Arena<TechId, Technology>,
    /// All blocks in the hierarchy.
    pub blocks: Arena<BlockId, Block>,
    /// Design-level instance groups.
    pub groups: Arena<GroupId, Group>,
    /// The root (flattened parent) block.
    pub root: BlockId,
}

impl Design {
    /// Creates a design with a root block using the given technology.
    pub fn new(root_name: impl Into<String>, root_tech: Technology) -> Self {
        let mut techs = Arena::new();
        let tech_id = techs.alloc(root_tech);
        let mut blocks = Arena::new();
        let root = blocks.alloc(Block::new(root_name, tech_id));
        Self {
            techs,
            blocks,
            groups: Arena::new(),
            root,
        }
    }

    /// Adds a technology and returns its ID.
    pub fn add_tech(&mut self, tech: Technology) -> TechId {
        self.techs.alloc(tech)
    }

    /// Returns the number of technologies.
    pub fn tech_count(&self) -> usize {
        self.techs.len()
    }

    /// Returns the technology with the given ID.
    pub fn tech(&self, id: TechId) -> &Technology {
        &self.techs[id]
    }

    /// Returns a mutable reference to the technology with the given ID.
    pub fn tech_mut(&mut self, id: TechId) -> &mut Technology {
        &mut self.techs[id]
    }

    /// Returns the block with the given ID.
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id]
    }

    /// Returns a mutable reference to the block with the given ID.
    pub fn block_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id]
    }

    /// Returns the root block.
    pub fn root_block(&self) -> &Block {
        &self.blocks[self.root]
    }

    /// Creates a child block under `parent` and returns its ID.
    pub fn create_child_block(
        &mut self,
        parent: BlockId,
        name: impl Into<String>,
        tech: TechId,
    ) -> BlockId {
        let mut block = Block::new(name, tech);
        block.parent = Some(parent);
        let id = self.blocks.alloc(block);
        self.blocks[parent].children.push(id);
        id
    }

    /// Creates a group and returns its ID.
    pub fn create_group(&mut self, name: impl Into<String>) -> GroupId {
        self.groups.alloc(Group {
            name: name.into(),
            members: Vec::new(),
        })
    }

    /// Finds a group by name.
    pub fn find_group(&self, name: &str) -> Option<GroupId> {
        self.groups
            .iter()
            .find(|(_, g)| g.name == name)
            .map(|(id, _)| id)
    }

    /// Adds an instance to a group, leaving any previous group first.
    pub fn add_to_group(&mut self, group: GroupId, block: BlockId, inst: InstId) {
        self.remove_from_group(block, inst);
        self.groups[group].members.push((block, inst));
        self.blocks[block].inst_mut(inst).group = Some(group);
    }

    /// Removes an instance from its group, if it has one.
    pub fn remove_from_group(&mut self, block: BlockId, inst: InstId) {
        let Some(group) = self.blocks[block].inst_mut(inst).group.take() else {
            return;
        };
        self.groups[group]
            .members
            .retain(|(b, i)| !(*b == block && *i == inst));
    }

    /// Destroys an instance: removes it from its group, disconnects its
    /// terminals, and deletes the record.
    pub fn destroy_instance(&mut self, block: BlockId, inst: InstId) {
        self.remove_from_group(block, inst);
        self.blocks[block].destroy_instance(inst);
    }

    /// Rebuilds every name index after deserialization.
    pub fn rebuild_indices(&mut self) {
        for (_, tech) in self.techs.iter_mut() {
            tech.rebuild_indices();
        }
        for (_, block) in self.blocks.iter_mut() {
            block.rebuild_indices();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::MasterId;
    use crate::instance::{InstKind, Instance};

    fn make_design() -> Design {
        Design::new("top", Technology::new("top_tech"))
    }

    fn cell(name: &str) -> Instance {
        Instance::new(name, InstKind::Cell {
            master: MasterId::from_raw(0),
        })
    }

    #[test]
    fn root_block_exists() {
        let design = make_design();
        assert_eq!(design.root_block().name, "top");
        assert_eq!(design.tech_count(), 1);
        assert!(design.root_block().parent.is_none());
    }

    #[test]
    fn child_blocks_in_creation_order() {
        let mut design = make_design();
        let t1 = design.add_tech(Technology::new("die0_tech"));
        let t2 = design.add_tech(Technology::new("die1_tech"));
        let c0 = design.create_child_block(design.root, "die0", t1);
        let c1 = design.create_child_block(design.root, "die1", t2);
        assert_eq!(design.root_block().children, vec![c0, c1]);
        assert_eq!(design.block(c0).parent, Some(design.root));
    }

    #[test]
    fn group_membership() {
        let mut design = make_design();
        let root = design.root;
        let u1 = design.block_mut(root).create_instance(cell("u1"));
        let g = design.create_group("die0");
        design.add_to_group(g, root, u1);
        assert_eq!(design.block(root).inst(u1).group, Some(g));
        assert_eq!(design.groups[g].members, vec![(root, u1)]);
        assert_eq!(design.find_group("die0"), Some(g));
    }

    #[test]
    fn add_to_group_leaves_previous() {
        let mut design = make_design();
        let root = design.root;
        let u1 = design.block_mut(root).create_instance(cell("u1"));
        let g0 = design.create_group("g0");
        let g1 = design.create_group("g1");
        design.add_to_group(g0, root, u1);
        design.add_to_group(g1, root, u1);
        assert!(design.groups[g0].members.is_empty());
        assert_eq!(design.groups[g1].members.len(), 1);
    }

    #[test]
    fn destroy_instance_cleans_group() {
        let mut design = make_design();
        let root = design.root;
        let u1 = design.block_mut(root).create_instance(cell("u1"));
        let g = design.create_group("g");
        design.add_to_group(g, root, u1);
        design.destroy_instance(root, u1);
        assert!(design.groups[g].members.is_empty());
        assert!(design.block(root).find_instance("u1").is_none());
    }

    #[test]
    fn serde_roundtrip_with_rebuild() {
        let mut design = make_design();
        let root = design.root;
        design.block_mut(root).create_instance(cell("u1"));
        design.block_mut(root).create_net("n1");
        let json = serde_json::to_string(&design).unwrap();
        let mut restored: Design = serde_json::from_str(&json).unwrap();
        restored.rebuild_indices();
        assert!(restored.root_block().find_instance("u1").is_some());
        assert!(restored.root_block().find_net("n1").is_some());
    }
}
