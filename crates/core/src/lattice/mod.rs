//! This module holds the hex lattice: the vertex/edge graph that a light
//! installation is designed on.
//!
//! ## Lattice Space
//!
//! All positions are 2D points in **lattice space**. It's a screen-style
//! system: `x` grows to the right and `y` grows **down**, so a corner that
//! "points straight up" sits at the smallest `y` of its hexagon. A lattice is
//! always placed so that its minimum `x` and minimum `y` are both 0.
//!
//! The unit is set by the layout spacing that the lattice is built with, which
//! is the length of one hexagon side. Physical dimensions (the ones a user
//! types in) only come into play when solving cell counts, see
//! [solve_dimensions].
//!
//! ## Orientation
//!
//! Two hexagon orientations are supported. Rather than writing everything
//! twice, the builder works in a **lane frame**: a grid is a stack of lanes
//! (rows for pointy-top, columns for flat-top), every odd lane is shifted half
//! a cell along the lane, and the two orientations differ only in which world
//! axis the lanes run along. See [Orientation::to_world].
//!
//! ```text
//!   pointy-top             flat-top
//!    /\  /\  /\            __    __
//!   |  ||  ||  |          /  \__/  \
//!    \/\/\/\/\/\          \__/  \__/
//!     |  ||  ||  |        /  \__/  \
//!      \/  \/  \/         \__/  \__/
//! ```

mod data_structure;
mod dimensions;
mod unit;

pub use self::{data_structure::*, dimensions::*, unit::*};

use crate::{
    mirror::{self, MirrorAxes, MirrorMode},
    stats::Statistics,
    timed,
};
use fnv::FnvBuildHasher;
use log::{debug, info};
use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    f64::consts::{FRAC_PI_2, FRAC_PI_3},
};
use strum::{Display, EnumIter, EnumString};

/// The two supported hexagon orientations
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Orientation {
    /// The first corner of each hexagon points straight up. Cells are laid out
    /// in rows, and odd rows are shifted right by half a cell.
    PointyTop,
    /// Each hexagon has a flat side on top. Cells are laid out in columns, and
    /// odd columns are shifted down by half a cell.
    FlatTop,
}

impl Default for Orientation {
    fn default() -> Self {
        Self::PointyTop
    }
}

impl Orientation {
    /// Angle (radians) of a hexagon's first corner, measured from its center.
    /// The rest follow every 60°.
    pub fn start_angle(self) -> f64 {
        match self {
            Self::PointyTop => -FRAC_PI_2,
            Self::FlatTop => 0.0,
        }
    }

    /// Map a point from the lane frame to lattice space. `along` is the
    /// distance along a lane, `across` is the distance across the stack of
    /// lanes.
    pub fn to_world(self, along: f64, across: f64) -> Point2 {
        match self {
            Self::PointyTop => Point2::new(along, across),
            Self::FlatTop => Point2::new(across, along),
        }
    }

    /// Get the lane layout that a set of grid dimensions describes in this
    /// orientation
    pub fn lanes(self, dimensions: GridDimensions) -> LaneLayout {
        match self {
            Self::PointyTop => LaneLayout {
                count: dimensions.rows,
                even: dimensions.cols,
                odd: dimensions.cols_odd,
            },
            Self::FlatTop => LaneLayout {
                count: dimensions.cols,
                even: dimensions.rows,
                odd: dimensions.rows_odd,
            },
        }
    }
}

/// Orientation-independent view of grid dimensions. See the module docs for
/// what a lane is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LaneLayout {
    /// Number of lanes
    pub count: u32,
    /// Cells in each even lane
    pub even: u32,
    /// Cells in each odd lane
    pub odd: u32,
}

impl LaneLayout {
    /// Number of cells in the given lane
    pub fn cells_in(&self, lane: u32) -> u32 {
        if lane % 2 == 1 {
            self.odd
        } else {
            self.even
        }
    }
}

/// A single hexagon in the lattice
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub center: Point2,
    /// Corner vertices, in generation order (clockwise on screen, starting
    /// from [Orientation::start_angle])
    pub corners: [VertexId; 6],
}

impl Cell {
    /// The 6 sides of this hexagon, as canonical keys. Side `i` connects
    /// corner `i` to corner `i+1` (wrapping around).
    pub fn edges(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        (0..6).map(move |i| {
            EdgeKey::new(self.corners[i], self.corners[(i + 1) % 6])
        })
    }
}

/// A built hex lattice: every deduplicated vertex, every deduplicated edge,
/// and the cells they came from. A lattice is immutable. If the dimensions,
/// spacing or orientation change, build a new one (vertex IDs are not stable
/// across builds).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Lattice {
    orientation: Orientation,
    spacing: f64,
    dimensions: GridDimensions,
    /// Vertices, keyed by ID, in discovery order
    // Serialize as a vec because vertex IDs make bad keys
    #[serde(with = "crate::util::serde_vertex_map_to_vec")]
    vertices: VertexMap,
    /// Edges in generation order
    edges: EdgeKeyIndexSet,
    cells: Vec<Cell>,
}

impl Lattice {
    /// Two corner points closer than this (on both axes) are the same vertex.
    /// Must stay well under the smallest distance between two distinct
    /// vertices, which is one side length, see [Self::MIN_SPACING].
    pub const DEDUP_TOLERANCE: f64 = 0.01;
    /// Smallest layout spacing we'll build with. Anything smaller is bumped up
    /// to this, so that the dedup tolerance can never merge real vertices.
    pub const MIN_SPACING: f64 = 1.0;

    /// Build the lattice for a grid. `spacing` is the side length of each
    /// hexagon in lattice space.
    ///
    /// Here's our algorithm:
    /// - Lay out every cell center, lane by lane
    /// - Compute each cell's 6 corners analytically
    /// - Merge corners into vertices (see [VertexDeduper])
    /// - Connect consecutive corners into edges, skipping any edge that
    ///   another cell already produced
    pub fn build(
        dimensions: GridDimensions,
        spacing: f64,
        orientation: Orientation,
    ) -> Self {
        // f64::max ignores NaN, so that gets clamped too
        let spacing = spacing.max(Self::MIN_SPACING);
        timed!(
            "Lattice build",
            Self::build_inner(dimensions, spacing, orientation)
        )
    }

    fn build_inner(
        dimensions: GridDimensions,
        spacing: f64,
        orientation: Orientation,
    ) -> Self {
        let lanes = orientation.lanes(dimensions);
        let cell_pitch = 3.0_f64.sqrt() * spacing;
        let lane_pitch = 1.5 * spacing;

        let mut deduper = VertexDeduper::new(Self::DEDUP_TOLERANCE);
        let mut edges = EdgeKeyIndexSet::default();
        let mut cells =
            Vec::with_capacity(dimensions.cell_count(orientation));

        for lane in 0..lanes.count {
            // Odd lanes are shifted half a cell along the lane
            let offset = if lane % 2 == 1 { cell_pitch / 2.0 } else { 0.0 };
            let across = spacing + lane as f64 * lane_pitch;
            for i in 0..lanes.cells_in(lane) {
                let along = cell_pitch / 2.0 + offset + i as f64 * cell_pitch;
                let center = orientation.to_world(along, across);
                let corners = Self::corners(center, spacing, orientation)
                    .map(|corner| deduper.insert(corner));

                let cell = Cell { center, corners };
                // Shared sides collapse here, the first cell to produce an
                // edge keeps its spot in the ordering
                edges.extend(cell.edges());
                cells.push(cell);
            }
        }

        let vertices = deduper.into_vertices();
        info!(
            "Built {} lattice with {} cells, {} vertices, {} edges",
            orientation,
            cells.len(),
            vertices.len(),
            edges.len()
        );
        Self {
            orientation,
            spacing,
            dimensions,
            vertices,
            edges,
            cells,
        }
    }

    /// Get the 6 corner points of a hexagon
    fn corners(
        center: Point2,
        spacing: f64,
        orientation: Orientation,
    ) -> [Point2; 6] {
        let center: nalgebra::Point2<f64> = center.into();
        let radius = Vector2::new(spacing, 0.0);
        let mut corners = [Point2::default(); 6];
        for (i, corner) in corners.iter_mut().enumerate() {
            let angle = orientation.start_angle() + i as f64 * FRAC_PI_3;
            *corner = (center + Rotation2::new(angle) * radius).into();
        }
        corners
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Side length of each hexagon, in lattice space
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// A reference to every vertex in the lattice, keyed by ID
    pub fn vertices(&self) -> &VertexMap {
        &self.vertices
    }

    /// A reference to the full, deduplicated edge list
    pub fn edges(&self) -> &EdgeKeyIndexSet {
        &self.edges
    }

    /// Every cell in the lattice, in build order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    pub fn position(&self, id: VertexId) -> Option<Point2> {
        self.vertex(id).map(|vertex| vertex.position)
    }

    pub fn contains_edge(&self, key: &EdgeKey) -> bool {
        self.edges.contains(key)
    }

    /// Get the positions of both ends of an edge. `None` if the edge isn't
    /// part of this lattice.
    pub fn edge_endpoints(&self, key: &EdgeKey) -> Option<(Point2, Point2)> {
        if !self.contains_edge(key) {
            return None;
        }
        let (a, b) = key.endpoints();
        Some((self.position(a)?, self.position(b)?))
    }

    /// Find the vertex closest to a point, as long as it's **strictly** closer
    /// than `tolerance`. If two vertices are equally close, the lower ID wins.
    pub fn nearest_vertex(
        &self,
        point: Point2,
        tolerance: f64,
    ) -> Option<VertexId> {
        // A linear scan is plenty at this scale
        let mut nearest: Option<(VertexId, f64)> = None;
        for vertex in self.vertices.values() {
            let distance = vertex.position.distance_to(point);
            if distance < tolerance
                && nearest.map_or(true, |(_, best)| distance < best)
            {
                nearest = Some((vertex.id, distance));
            }
        }
        nearest.map(|(id, _)| id)
    }

    /// Count the edges touching each vertex, across the **full** edge list
    pub fn degrees(&self) -> VertexIdMap<usize> {
        let mut degrees = VertexIdMap::default();
        for key in &self.edges {
            let (a, b) = key.endpoints();
            *degrees.entry(a).or_insert(0) += 1;
            *degrees.entry(b).or_insert(0) += 1;
        }
        degrees
    }

    /// Narrow a list of (probably persisted) edge keys down to the ones that
    /// exist in this lattice. Keys that don't parse, or that came from some
    /// other lattice, are dropped silently. That's the normal outcome after
    /// the grid is resized or reoriented, so it's not an error.
    pub fn filter_edges<I>(&self, keys: I) -> EdgeKeySet
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut dropped = 0;
        let filtered = keys
            .into_iter()
            .filter_map(|key| {
                match key.as_ref().parse::<EdgeKey>() {
                    Ok(key) if self.contains_edge(&key) => Some(key),
                    _ => {
                        dropped += 1;
                        None
                    }
                }
            })
            .collect();
        if dropped > 0 {
            debug!("Dropped {} edge keys not in the current lattice", dropped);
        }
        filtered
    }

    /// Resolve this lattice's mirror axes. See [mirror::resolve_axes].
    pub fn mirror_axes(&self) -> MirrorAxes {
        mirror::resolve_axes(&self.vertices, self.orientation)
    }

    /// Get every edge that has to toggle along with `key` under the given
    /// mirror mode. See [mirror::mirrored_edges].
    pub fn mirrored_edges(&self, key: EdgeKey, mode: MirrorMode) -> EdgeKeySet {
        mirror::mirrored_edges(self, key, mode)
    }

    /// Compute statistics for a set of enabled edges on this lattice
    pub fn statistics(&self, enabled: &EdgeKeySet) -> Statistics {
        Statistics::compute(enabled, &self.edges, &self.vertices)
    }

    /// Serialize this lattice into JSON. Vertices come out as a list of
    /// `{id, position}` objects, edges as a list of key strings.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> anyhow::Result<String> {
        use anyhow::Context;
        serde_json::to_string(self).context("error serializing lattice")
    }
}

/// Memoizes built lattices. A lattice is a pure function of its dimensions,
/// spacing, and orientation, so as long as those match we can hand back the
/// one we already built.
#[derive(Clone, Debug, Default)]
pub struct LatticeCache {
    lattices: HashMap<LatticeCacheKey, Lattice, FnvBuildHasher>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct LatticeCacheKey {
    dimensions: GridDimensions,
    // Floats can't be hashed, but their bits can
    spacing_bits: u64,
    orientation: Orientation,
}

impl LatticeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the lattice for these inputs, building it if we haven't yet
    pub fn get_or_build(
        &mut self,
        dimensions: GridDimensions,
        spacing: f64,
        orientation: Orientation,
    ) -> &Lattice {
        let key = LatticeCacheKey {
            dimensions,
            spacing_bits: spacing.to_bits(),
            orientation,
        };
        self.lattices
            .entry(key)
            .or_insert_with(|| Lattice::build(dimensions, spacing, orientation))
    }

    /// Number of lattices held
    pub fn len(&self) -> usize {
        self.lattices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lattices.is_empty()
    }

    pub fn clear(&mut self) {
        self.lattices.clear();
    }
}
