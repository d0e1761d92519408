//! Opaque ID newtypes for design database entities.
//!
//! Thin `u32` wrappers used as arena indices. They are `Copy`, `Hash`, and
//! `Serialize`/`Deserialize`, and implement [`ArenaId`](crate::arena::ArenaId)
//! so they can key both the append-only and the slotted arenas.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque ID for a block (sub-design) in the design hierarchy.
    BlockId
);

define_id!(
    /// Opaque ID for a cell instance within its block.
    InstId
);

define_id!(
    /// Opaque ID for a net within its block.
    NetId
);

define_id!(
    /// Opaque ID for a technology.
    TechId
);

define_id!(
    /// Opaque ID for a master (footprint) within its technology.
    MasterId
);

define_id!(
    /// Opaque ID for an instance group.
    GroupId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn roundtrip() {
        assert_eq!(BlockId::from_raw(42).as_raw(), 42);
        assert_eq!(NetId::from_raw(0).as_raw(), 0);
        assert_eq!(MasterId::from_raw(u32::MAX).as_raw(), u32::MAX);
    }

    #[test]
    fn equality() {
        assert_eq!(InstId::from_raw(3), InstId::from_raw(3));
        assert_ne!(InstId::from_raw(3), InstId::from_raw(4));
    }

    #[test]
    fn hash_in_set() {
        let mut set = HashSet::new();
        set.insert(GroupId::from_raw(1));
        set.insert(GroupId::from_raw(2));
        set.insert(GroupId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", TechId::from_raw(5)), "5");
    }

    #[test]
    fn serde_roundtrip() {
        let id = InstId::from_raw(55);
        let json = serde_json::to_string(&id).unwrap();
        let restored: InstId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }
}
