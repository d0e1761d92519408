//! Placement rows.
//!
//! A [`Row`] is a horizontal band of sites that discretizes legal positions
//! for standard cells: cells snap to the row's origin Y and to X positions
//! within `[min_x, max_x]`.

use crate::tech::Site;
use serde::{Deserialize, Serialize};
use strata_common::Point;

/// Row orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowOrient {
    /// Upright.
    N,
    /// Mirrored about the X axis (alternating-row power rails).
    FlippedX,
}

/// A horizontal placement row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Row name, e.g. `row3`.
    pub name: String,
    /// Lower-left origin of the row.
    pub origin: Point,
    /// The site the row is tiled with.
    pub site: Site,
    /// Number of sites in the row.
    pub site_count: i64,
    /// Row orientation.
    pub orient: RowOrient,
}

impl Row {
    /// Returns the total row width (site width times site count).
    pub fn width(&self) -> i64 {
        self.site.width * self.site_count
    }

    /// Returns the row height (the site height).
    pub fn height(&self) -> i64 {
        self.site.height
    }

    /// Returns the leftmost legal X.
    pub fn min_x(&self) -> i64 {
        self.origin.x
    }

    /// Returns the X just past the rightmost site.
    pub fn max_x(&self) -> i64 {
        self.origin.x + self.width()
    }

    /// Returns the row's baseline Y.
    pub fn y(&self) -> i64 {
        self.origin.y
    }
}
