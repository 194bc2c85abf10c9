use crate::lattice::{solve_dimensions, Orientation, SolvedDimensions};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Configuration that defines the grid a design is laid out on. Two lattices
/// built from the same config will always be identical.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GridConfig {
    /// Requested width of the installation, in whatever physical unit the
    /// design uses. The solved grid will never be wider than this (unless this
    /// is smaller than a single cell).
    #[validate(range(min = 0.0))]
    pub width: f64,

    /// Requested length (height, when looking at the design) of the
    /// installation, in the same unit as `width`.
    #[validate(range(min = 0.0))]
    pub length: f64,

    /// Distance between two neighboring joints, i.e. the physical length of
    /// one light segment. Same unit as `width` and `length`.
    #[validate(range(min = 0.001))]
    pub spacing: f64,

    /// Which way the hexagons point. See [Orientation].
    pub orientation: Orientation,

    /// Side length of each hexagon in lattice space. This has no physical
    /// meaning, it just sets the scale of vertex positions handed to whatever
    /// draws the lattice. Must stay well above the vertex dedup tolerance.
    #[validate(range(min = 1.0, max = 1000.0))]
    pub layout_spacing: f64,
}

impl GridConfig {
    /// Work out how many cells fit in the requested dimensions
    pub fn solve(&self) -> SolvedDimensions {
        solve_dimensions(self.width, self.length, self.spacing, self.orientation)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            length: 100.0,
            spacing: 10.0,
            orientation: Orientation::PointyTop,
            layout_spacing: 18.0,
        }
    }
}

/// Optional thresholds for a design. Nothing stops a design from going over a
/// limit, but [Statistics::check_limits](crate::Statistics::check_limits)
/// will report it.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate,
)]
#[serde(default)]
pub struct Limits {
    /// Maximum number of light segments (enabled edges)
    pub max_segments: Option<usize>,

    /// Maximum number of connector joints, meaning vertices where two or more
    /// segments meet. Dead ends don't need a connector so they don't count.
    pub max_joints: Option<usize>,
}
