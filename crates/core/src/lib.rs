//! Hexlight is the geometry and symmetry engine behind hexagonal light
//! installations. It works out how many hex cells fit in a physical space,
//! builds the lattice of joints (vertices) and light segments (edges) for
//! those cells, resolves mirror images of edges so designs can be edited
//! symmetrically, and computes the parts list for a design. Drawing and
//! persistence are left to whatever sits on top of this crate.
//!
//! ```
//! use hexlight::{Design, EdgeKey, MirrorMode};
//!
//! let mut design = Design {
//!     mirror_mode: MirrorMode::Both,
//!     ..Default::default()
//! };
//! let lattice = design.build_lattice().unwrap();
//! let key: EdgeKey = "0-1".parse().unwrap();
//! design.toggle(&lattice, key);
//! println!("{:?}", design.statistics(&lattice));
//! ```
//!
//! See [GridConfig] for details on how the grid can be customized.

mod config;
mod design;
pub mod lattice;
pub mod mirror;
mod stats;
mod util;

pub use crate::{
    config::{GridConfig, Limits},
    design::{toggle_edge, Design},
    lattice::{
        solve_dimensions, Cell, EdgeKey, EdgeKeySet, GridDimensions, Lattice,
        LatticeCache, Orientation, Point2, SolvedDimensions, Vertex, VertexId,
    },
    mirror::{mirrored_edges, resolve_axes, MirrorAxes, MirrorMode, Reflection},
    stats::{BoundingBox, LimitExceeded, Statistics},
    util::range::NumRange,
};
