//! Nets.
//!
//! A [`Net`] is an unordered set of connected instance terminals plus the
//! block's boundary terminals exposing the net to the parent hierarchy. A
//! net that has been split across two dies carries the `crosses_die` tag.

use crate::ids::InstId;
use serde::{Deserialize, Serialize};

/// A net within a block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    /// Net name, unique within its block.
    pub name: String,
    /// Connected instance terminals: `(instance, terminal name)`.
    pub iterms: Vec<(InstId, String)>,
    /// Boundary terminal names exposing this net at the block boundary.
    pub bterms: Vec<String>,
    /// Set once the net has been identified as spanning two dies.
    pub crosses_die: bool,
}

impl Net {
    /// Creates an empty net.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            iterms: Vec::new(),
            bterms: Vec::new(),
            crosses_die: false,
        }
    }

    /// Total terminal count: instance terminals plus boundary terminals.
    pub fn term_count(&self) -> usize {
        self.iterms.len() + self.bterms.len()
    }

    /// Returns whether the given instance terminal is connected.
    pub fn has_iterm(&self, inst: InstId, term: &str) -> bool {
        self.iterms.iter().any(|(i, t)| *i == inst && t == term)
    }

    /// Returns whether the net exposes a boundary terminal with this name.
    pub fn has_bterm(&self, name: &str) -> bool {
        self.bterms.iter().any(|b| b == name)
    }
}
