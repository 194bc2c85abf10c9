//! Mirror symmetry for edge toggling. A design can be mirrored horizontally,
//! vertically, both, or rotationally (180° around the center). Toggling one
//! edge then toggles its mirror images too.
//!
//! There are two halves to this:
//!
//! - [resolve_axes] picks the mirror axes. They can't just sit at the center
//!   of the lattice's extent, because reflecting about an arbitrary line
//!   rarely lands on another vertex. Each axis gets snapped to a position that
//!   maps the lattice onto itself.
//! - [mirrored_edges] reflects an edge's endpoints about those axes and maps
//!   the results back onto real lattice edges.

use crate::{
    lattice::{EdgeKey, EdgeKeySet, Lattice, Orientation, Point2, VertexMap},
    util::range::NumRange,
};
use log::trace;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// How edge toggles are mirrored
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
pub enum MirrorMode {
    /// No mirroring, only the toggled edge changes
    None,
    /// Mirror left/right, across the vertical axis at `center_x`
    Horizontal,
    /// Mirror top/bottom, across the horizontal axis at `center_y`
    Vertical,
    /// Mirror left/right, top/bottom, and diagonally (4-way symmetry)
    Both,
    /// Rotate 180° around the center point, without the two straight
    /// reflections
    Radial,
}

impl Default for MirrorMode {
    fn default() -> Self {
        Self::None
    }
}

impl MirrorMode {
    /// The set of transforms this mode applies, on top of the identity
    pub fn reflections(self) -> &'static [Reflection] {
        match self {
            Self::None => &[],
            Self::Horizontal => &[Reflection::Horizontal],
            Self::Vertical => &[Reflection::Vertical],
            Self::Both => &[
                Reflection::Horizontal,
                Reflection::Vertical,
                Reflection::Radial,
            ],
            Self::Radial => &[Reflection::Radial],
        }
    }
}

/// A single point transform about the mirror axes
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter)]
pub enum Reflection {
    /// Reflect x about `center_x`
    Horizontal,
    /// Reflect y about `center_y`
    Vertical,
    /// Reflect both coordinates, i.e. rotate 180° around the center point
    Radial,
}

impl Reflection {
    /// Transform a point. Every reflection is its own inverse, so applying
    /// one twice gets back the original point.
    pub fn apply(self, point: Point2, axes: &MirrorAxes) -> Point2 {
        let flip_x = || 2.0 * axes.center_x - point.x;
        let flip_y = || 2.0 * axes.center_y - point.y;
        match self {
            Self::Horizontal => Point2::new(flip_x(), point.y),
            Self::Vertical => Point2::new(point.x, flip_y()),
            Self::Radial => Point2::new(flip_x(), flip_y()),
        }
    }
}

/// The extent of a lattice, plus the snapped mirror axes
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MirrorAxes {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    /// X coordinate of the vertical axis that horizontal mirroring reflects
    /// across
    pub center_x: f64,
    /// Y coordinate of the horizontal axis that vertical mirroring reflects
    /// across
    pub center_y: f64,
}

impl MirrorAxes {
    /// The point that radial mirroring rotates around
    pub fn center(&self) -> Point2 {
        Point2::new(self.center_x, self.center_y)
    }
}

/// Gaps between neighboring coordinates that are larger than this fraction of
/// the biggest gap count as "large", i.e. a side of a hexagon rather than the
/// short hop between two corners of a slanted side. This is tuned for regular
/// hexagons. Any lattice with uneven spacing would need something smarter.
pub const LARGE_GAP_FRACTION: f64 = 0.7;
/// Candidate axes that are within this distance of being equally close to the
/// raw center are a tie. Ties go to the smaller coordinate.
pub const TIE_TOLERANCE: f64 = 0.001;
/// A reflected endpoint must be strictly closer than this to a vertex to
/// count as landing on it
pub const MATCH_TOLERANCE: f64 = 0.1;

/// Where a mirror axis is allowed to sit along one world axis
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum AxisSnap {
    /// Through any vertex coordinate
    Vertex,
    /// Through the midpoint of a large gap between vertex coordinates, which
    /// is the midpoint of a hexagon side that runs along this axis
    SideMidpoint,
}

/// Get the allowed axis positions for the x and y axes, respectively. For
/// pointy-top hexagons the vertical sides make every vertex x a valid axis,
/// but y axes have to go through the middle of those sides. Flat-top is the
/// same thing with x and y swapped.
fn axis_snaps(orientation: Orientation) -> (AxisSnap, AxisSnap) {
    match orientation {
        Orientation::PointyTop => (AxisSnap::Vertex, AxisSnap::SideMidpoint),
        Orientation::FlatTop => (AxisSnap::SideMidpoint, AxisSnap::Vertex),
    }
}

/// Compute the mirror axes for a set of vertices. Axes are recomputed from
/// scratch every time, so they always match the current lattice.
///
/// Here's our algorithm, for each world axis:
/// - Collect the distinct vertex coordinates along that axis, sorted
/// - Build the list of valid axis positions, according to the orientation
///   (see [AxisSnap])
/// - Pick the valid position closest to the raw center of the extent. If
///   there are no valid positions (e.g. only one vertex), use the raw center.
pub fn resolve_axes(
    vertices: &VertexMap,
    orientation: Orientation,
) -> MirrorAxes {
    let xs = distinct_coordinates(vertices.values().map(|v| v.position.x));
    let ys = distinct_coordinates(vertices.values().map(|v| v.position.y));
    // Distinct coordinates are sorted, so the ends are the extent
    let (x_range, y_range) = match (extent(&xs), extent(&ys)) {
        (Some(x_range), Some(y_range)) => (x_range, y_range),
        // No vertices at all, nothing to mirror
        _ => return MirrorAxes::default(),
    };

    let (x_snap, y_snap) = axis_snaps(orientation);
    MirrorAxes {
        min_x: x_range.min,
        max_x: x_range.max,
        min_y: y_range.min,
        max_y: y_range.max,
        center_x: snap_to_nearest(
            &axis_candidates(&xs, x_snap),
            x_range.midpoint(),
        ),
        center_y: snap_to_nearest(
            &axis_candidates(&ys, y_snap),
            y_range.midpoint(),
        ),
    }
}

fn extent(sorted: &[f64]) -> Option<NumRange> {
    Some(NumRange::new(*sorted.first()?, *sorted.last()?))
}

/// Sort coordinates and merge any that are within the vertex dedup tolerance
/// of each other. Float error means two vertices in the same column won't
/// always have bit-identical x values.
fn distinct_coordinates(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    let mut distinct: Vec<f64> = Vec::with_capacity(values.len());
    for value in values {
        match distinct.last() {
            Some(last) if value - last < Lattice::DEDUP_TOLERANCE => {}
            _ => distinct.push(value),
        }
    }
    distinct
}

/// Get every valid axis position along one world axis
fn axis_candidates(coordinates: &[f64], snap: AxisSnap) -> Vec<f64> {
    match snap {
        AxisSnap::Vertex => coordinates.to_vec(),
        AxisSnap::SideMidpoint => {
            let gaps: Vec<(f64, f64)> = coordinates
                .windows(2)
                .map(|pair| (pair[1] - pair[0], (pair[0] + pair[1]) / 2.0))
                .collect();
            let max_gap =
                gaps.iter().map(|(gap, _)| *gap).fold(0.0, f64::max);
            gaps.into_iter()
                .filter(|(gap, _)| *gap > max_gap * LARGE_GAP_FRACTION)
                .map(|(_, midpoint)| midpoint)
                .collect()
        }
    }
}

/// Pick the candidate closest to `raw`. Candidates are sorted ascending, and
/// a later candidate only wins if it's closer by more than the tie tolerance,
/// so ties go to the smaller coordinate.
fn snap_to_nearest(candidates: &[f64], raw: f64) -> f64 {
    let mut best: Option<f64> = None;
    for &candidate in candidates {
        match best {
            Some(b)
                if (candidate - raw).abs()
                    >= (b - raw).abs() - TIE_TOLERANCE => {}
            _ => best = Some(candidate),
        }
    }
    best.unwrap_or(raw)
}

/// Get the full set of edges that have to toggle along with `key` under the
/// given mirror mode. The output always includes `key` itself, unless `key`
/// isn't part of the lattice at all, in which case there's nothing to toggle
/// and the output is empty.
///
/// Each reflection maps both endpoints of the edge to new points, then snaps
/// each point to the nearest vertex (within [MATCH_TOLERANCE]). If either
/// point has no vertex nearby (it fell off the edge of the grid), or the two
/// vertices aren't connected, that reflection contributes nothing. That's
/// normal near the boundaries of a ragged grid, so it isn't an error.
pub fn mirrored_edges(
    lattice: &Lattice,
    key: EdgeKey,
    mode: MirrorMode,
) -> EdgeKeySet {
    let mut edges = EdgeKeySet::default();
    let (a, b) = match lattice.edge_endpoints(&key) {
        Some(endpoints) => endpoints,
        None => {
            trace!("Edge {} isn't in the lattice, nothing to mirror", key);
            return edges;
        }
    };
    edges.insert(key);

    let reflections = mode.reflections();
    if reflections.is_empty() {
        return edges;
    }

    let axes = lattice.mirror_axes();
    for &reflection in reflections {
        let snap = |point: Point2| {
            let mirrored = reflection.apply(point, &axes);
            lattice.nearest_vertex(mirrored, MATCH_TOLERANCE)
        };
        match (snap(a), snap(b)) {
            (Some(mirror_a), Some(mirror_b)) => {
                let mirrored = EdgeKey::new(mirror_a, mirror_b);
                if lattice.contains_edge(&mirrored) {
                    edges.insert(mirrored);
                } else {
                    trace!(
                        "{:?} of edge {} lands on {}, which isn't an edge",
                        reflection,
                        key,
                        mirrored
                    );
                }
            }
            _ => trace!(
                "{:?} of edge {} falls outside the lattice",
                reflection,
                key
            ),
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::{GridDimensions, VertexId};
    use assert_approx_eq::assert_approx_eq;
    use strum::IntoEnumIterator;

    const SPACING: f64 = 18.0;
    const SQRT_3: f64 = 1.7320508075688772;

    fn key(a: u32, b: u32) -> EdgeKey {
        EdgeKey::new(VertexId(a), VertexId(b))
    }

    fn sorted(edges: EdgeKeySet) -> Vec<EdgeKey> {
        let mut edges: Vec<EdgeKey> = edges.into_iter().collect();
        edges.sort();
        edges
    }

    /// Two cells in row 0, one cell centered under them in row 1
    fn ragged_lattice() -> Lattice {
        Lattice::build(
            GridDimensions {
                cols: 2,
                cols_odd: 1,
                rows: 2,
                rows_odd: 2,
            },
            SPACING,
            Orientation::PointyTop,
        )
    }

    #[test]
    fn test_distinct_coordinates() {
        let values = vec![3.0, 1.0, 1.004, -1.0e-15, 0.0, 2.0];
        assert_eq!(
            distinct_coordinates(values.into_iter()),
            vec![-1.0e-15, 1.0, 2.0, 3.0]
        );
    }

    #[test]
    fn test_axis_candidates() {
        // Alternating short/long gaps, like the y coordinates of a pointy-top
        // lattice
        let coordinates = [0.0, 9.0, 27.0, 36.0, 54.0, 63.0];
        assert_eq!(
            axis_candidates(&coordinates, AxisSnap::Vertex),
            coordinates.to_vec()
        );
        assert_eq!(
            axis_candidates(&coordinates, AxisSnap::SideMidpoint),
            vec![18.0, 45.0]
        );
        // Not enough coordinates to have any gaps
        assert!(axis_candidates(&[5.0], AxisSnap::SideMidpoint).is_empty());
        assert!(axis_candidates(&[], AxisSnap::SideMidpoint).is_empty());
    }

    #[test]
    fn test_snap_to_nearest() {
        assert_approx_eq!(snap_to_nearest(&[0.0, 10.0, 20.0], 12.0), 10.0);
        assert_approx_eq!(snap_to_nearest(&[0.0, 10.0, 20.0], 17.0), 20.0);
        // Tie goes to the smaller coordinate
        assert_approx_eq!(snap_to_nearest(&[10.0, 20.0], 15.0), 10.0);
        assert_approx_eq!(snap_to_nearest(&[10.0, 20.0], 15.0004), 10.0);
        // No candidates, fall back to the raw center
        assert_approx_eq!(snap_to_nearest(&[], 7.5), 7.5);
    }

    #[test]
    fn test_axes_single_hexagon() {
        for orientation in Orientation::iter() {
            let lattice = Lattice::build(
                GridDimensions::uniform(1, 1),
                SPACING,
                orientation,
            );
            // Both axes go straight through the middle of the hexagon
            let axes = lattice.mirror_axes();
            let center = lattice.cells()[0].center;
            assert_approx_eq!(axes.center_x, center.x);
            assert_approx_eq!(axes.center_y, center.y);
        }
    }

    #[test]
    fn test_axes_ragged() {
        let axes = ragged_lattice().mirror_axes();
        assert_approx_eq!(axes.min_x, 0.0);
        assert_approx_eq!(axes.max_x, 2.0 * SQRT_3 * SPACING);
        assert_approx_eq!(axes.min_y, 0.0);
        assert_approx_eq!(axes.max_y, 3.5 * SPACING);
        // Row 0 and row 1 centers are equally far from the raw center, so the
        // upper (smaller y) one wins
        assert_approx_eq!(axes.center_x, SQRT_3 * SPACING);
        assert_approx_eq!(axes.center_y, SPACING);
    }

    #[test]
    fn test_axes_flat_top() {
        // 3 columns of 1 cell: the middle column sits half a cell lower
        let lattice = Lattice::build(
            GridDimensions::uniform(3, 1),
            SPACING,
            Orientation::FlatTop,
        );
        let axes = lattice.mirror_axes();
        // Vertical axis goes through the middle column's center
        assert_approx_eq!(axes.center_x, lattice.cells()[1].center.x);
        assert_approx_eq!(axes.center_x, 2.5 * SPACING);
        // Horizontal axis has to go through a vertex y. The two nearest are
        // equally far from the raw center, so the upper one wins.
        assert_approx_eq!(axes.center_y, SQRT_3 / 2.0 * SPACING);
        assert!(lattice
            .vertices()
            .values()
            .any(|v| (v.position.y - axes.center_y).abs() < 0.01));
    }

    #[test]
    fn test_axes_degenerate() {
        assert_eq!(
            resolve_axes(&VertexMap::default(), Orientation::PointyTop),
            MirrorAxes::default()
        );

        let mut vertices = VertexMap::default();
        let id = VertexId(0);
        vertices.insert(
            id,
            crate::lattice::Vertex {
                id,
                position: Point2::new(4.0, 6.0),
            },
        );
        // No gaps to take midpoints of, so y falls back to the raw center
        let axes = resolve_axes(&vertices, Orientation::PointyTop);
        assert_approx_eq!(axes.center_x, 4.0);
        assert_approx_eq!(axes.center_y, 6.0);
    }

    #[test]
    fn test_reflection_involution() {
        let axes = MirrorAxes {
            center_x: 12.5,
            center_y: -3.0,
            ..Default::default()
        };
        let point = Point2::new(1.0, 7.25);
        for reflection in Reflection::iter() {
            let twice = reflection.apply(reflection.apply(point, &axes), &axes);
            assert!(twice.approx_eq(point, 1.0e-9), "{:?}", reflection);
        }
        let radial = Reflection::Radial.apply(point, &axes);
        assert_approx_eq!(radial.x, 24.0);
        assert_approx_eq!(radial.y, -13.25);
    }

    #[test]
    fn test_mirror_none() {
        let lattice = ragged_lattice();
        assert_eq!(
            sorted(lattice.mirrored_edges(key(0, 1), MirrorMode::None)),
            vec![key(0, 1)]
        );
    }

    #[test]
    fn test_mirror_single_hexagon() {
        let lattice = Lattice::build(
            GridDimensions::uniform(1, 1),
            SPACING,
            Orientation::PointyTop,
        );
        // Upper-right side maps onto the other 3 slanted sides
        assert_eq!(
            sorted(lattice.mirrored_edges(key(0, 1), MirrorMode::Both)),
            vec![key(0, 1), key(0, 5), key(2, 3), key(3, 4)]
        );
        assert_eq!(
            sorted(lattice.mirrored_edges(key(0, 1), MirrorMode::Radial)),
            vec![key(0, 1), key(3, 4)]
        );
        // The right side is its own vertical mirror, so "both" only adds the
        // left side and there are no duplicates
        assert_eq!(
            sorted(lattice.mirrored_edges(key(1, 2), MirrorMode::Both)),
            vec![key(1, 2), key(4, 5)]
        );
        assert_eq!(
            sorted(lattice.mirrored_edges(key(1, 2), MirrorMode::Vertical)),
            vec![key(1, 2)]
        );
    }

    #[test]
    fn test_mirror_ragged() {
        let lattice = ragged_lattice();
        // Left cell's upper-right side mirrors onto the right cell's
        // upper-left side
        assert_eq!(
            sorted(lattice.mirrored_edges(key(0, 1), MirrorMode::Horizontal)),
            vec![key(0, 1), key(1, 6)]
        );
        // The bottom cell reflected about row 0's center lands above the
        // grid, so there's nothing to mirror onto
        assert_eq!(
            sorted(lattice.mirrored_edges(key(10, 11), MirrorMode::Vertical)),
            vec![key(10, 11)]
        );
    }

    #[test]
    fn test_mirror_unknown_edge() {
        let lattice = ragged_lattice();
        assert!(lattice
            .mirrored_edges(key(0, 2), MirrorMode::Both)
            .is_empty());
        assert!(lattice
            .mirrored_edges(key(500, 501), MirrorMode::None)
            .is_empty());
    }

    #[test]
    fn test_mirror_mode_parse() {
        for mode in MirrorMode::iter() {
            assert_eq!(mode.to_string().parse::<MirrorMode>().unwrap(), mode);
        }
        assert_eq!(
            "radial".parse::<MirrorMode>().unwrap(),
            MirrorMode::Radial
        );
    }
}
