use crate::{
    config::Limits,
    lattice::{EdgeKeyIndexSet, EdgeKeySet, Point2, VertexId, VertexMap},
    util::range::NumRange,
};
use derive_more::Display;
use fnv::FnvBuildHasher;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Aggregate numbers for a design, i.e. what you'd need to buy to build it.
/// Statistics are always derived from the current enabled edges and never
/// stored, so just recompute them whenever the design changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Number of enabled edges (light segments)
    pub segments: usize,
    /// Vertices with exactly one enabled edge, i.e. dead ends. These are
    /// "missing" joints, since there's no connector to put there.
    pub joints1: usize,
    /// Vertices where exactly two enabled edges meet
    pub joints2: usize,
    /// Vertices where three or more enabled edges meet. On a hex lattice
    /// that's always exactly three.
    pub joints3: usize,
    /// The smallest box around every vertex that touches an enabled edge.
    /// This is the physical footprint of the design, which can be (much)
    /// smaller than the grid. `None` if nothing is enabled.
    pub bounding_box: Option<BoundingBox>,
    /// Enabled degree of every vertex that has at least one enabled edge
    pub joint_degree_by_vertex: IndexMap<VertexId, usize, FnvBuildHasher>,
}

impl Statistics {
    /// Compute statistics for a set of enabled edges. Only edges that are in
    /// the full edge list count, so stale keys from some other lattice are
    /// ignored rather than inflating the numbers.
    pub fn compute(
        enabled: &EdgeKeySet,
        edges: &EdgeKeyIndexSet,
        vertices: &VertexMap,
    ) -> Self {
        let mut segments = 0;
        let mut degrees: IndexMap<VertexId, usize, FnvBuildHasher> =
            IndexMap::default();
        for key in edges.iter().filter(|key| enabled.contains(key)) {
            segments += 1;
            let (a, b) = key.endpoints();
            *degrees.entry(a).or_insert(0) += 1;
            *degrees.entry(b).or_insert(0) += 1;
        }

        let count_degree = |pred: fn(usize) -> bool| {
            degrees.values().filter(|degree| pred(**degree)).count()
        };
        let joints1 = count_degree(|degree| degree == 1);
        let joints2 = count_degree(|degree| degree == 2);
        let joints3 = count_degree(|degree| degree >= 3);

        let bounding_box = BoundingBox::around(
            degrees
                .keys()
                .filter_map(|id| vertices.get(id))
                .map(|vertex| vertex.position),
        );

        Self {
            segments,
            joints1,
            joints2,
            joints3,
            bounding_box,
            joint_degree_by_vertex: degrees,
        }
    }

    /// Number of joints that need a connector, i.e. every vertex where two or
    /// more segments meet
    pub fn joints(&self) -> usize {
        self.joints2 + self.joints3
    }

    /// Check this design against a set of limits. Returns every limit that's
    /// been exceeded; an empty list means the design is within all of them.
    pub fn check_limits(&self, limits: &Limits) -> Vec<LimitExceeded> {
        let mut exceeded = Vec::new();
        if let Some(limit) = limits.max_segments {
            if self.segments > limit {
                exceeded.push(LimitExceeded::Segments {
                    count: self.segments,
                    limit,
                });
            }
        }
        if let Some(limit) = limits.max_joints {
            if self.joints() > limit {
                exceeded.push(LimitExceeded::Joints {
                    count: self.joints(),
                    limit,
                });
            }
        }
        exceeded
    }
}

/// An axis-aligned box in lattice space
#[derive(Copy, Clone, Debug, Display, PartialEq, Serialize, Deserialize)]
#[display(fmt = "x: {}, y: {}", x, y)]
pub struct BoundingBox {
    pub x: NumRange,
    pub y: NumRange,
}

impl BoundingBox {
    /// Get the smallest box that contains every given point. `None` if there
    /// are no points.
    pub fn around(points: impl IntoIterator<Item = Point2>) -> Option<Self> {
        let points: Vec<Point2> = points.into_iter().collect();
        Some(Self {
            x: NumRange::bounding(points.iter().map(|point| point.x))?,
            y: NumRange::bounding(points.iter().map(|point| point.y))?,
        })
    }

    /// Is this point inside the box? Edges count as inside.
    pub fn contains(&self, point: Point2) -> bool {
        self.x.contains(point.x) && self.y.contains(point.y)
    }

    pub fn width(&self) -> f64 {
        self.x.span()
    }

    pub fn height(&self) -> f64 {
        self.y.span()
    }

    /// Top-left corner
    pub fn min(&self) -> Point2 {
        Point2::new(self.x.min, self.y.min)
    }

    /// Bottom-right corner
    pub fn max(&self) -> Point2 {
        Point2::new(self.x.max, self.y.max)
    }
}

/// A [Limits] threshold that a design has gone over
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LimitExceeded {
    #[display(fmt = "{} segments exceeds the limit of {}", count, limit)]
    Segments { count: usize, limit: usize },
    #[display(fmt = "{} joints exceeds the limit of {}", count, limit)]
    Joints { count: usize, limit: usize },
}
