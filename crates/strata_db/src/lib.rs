//! Design database for the Strata multi-die flow.
//!
//! The database is a block hierarchy: the root [`Block`] holds the flattened
//! input netlist, and after die construction each child block holds one die's
//! sub-design with its own scaled [`Technology`] and row grid. Entities are
//! stored in ID-indexed arenas; instances and nets use tombstoned arenas so
//! that IDs stay stable while the pipeline migrates instances between dies
//! and sweeps dangling nets.
//!
//! # Usage
//!
//! ```ignore
//! use strata_db::{Design, Instance, InstKind, Technology};
//!
//! let mut design = Design::new("top", tech);
//! let root = design.root;
//! let id = design.block_mut(root).create_instance(inst);
//! let net = design.block_mut(root).create_net("clk");
//! design.block_mut(root).connect(id, "ck", net);
//! ```

#![warn(missing_docs)]

pub mod arena;
pub mod attr;
pub mod block;
pub mod design;
pub mod ids;
pub mod instance;
pub mod net;
pub mod row;
pub mod stats;
pub mod tech;

pub use arena::{Arena, ArenaId, SlotArena};
pub use attr::AttrValue;
pub use block::Block;
pub use design::{Design, Group};
pub use ids::{BlockId, GroupId, InstId, MasterId, NetId, TechId};
pub use instance::{InstKind, Instance, PlaceStatus};
pub use net::Net;
pub use row::{Row, RowOrient};
pub use stats::{design_hpwl, total_hpwl, utilization};
pub use tech::{Master, MasterKind, MasterPin, PinDirection, Site, Technology};
