//! Basic value types that make up a lattice: points, vertex IDs, and
//! canonical edge keys.

use crate::util::serde_display_from_str;
use anyhow::{anyhow, Context};
use derive_more::{Add, Display, From, Into};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{cmp, str::FromStr};

/// A 2D point in lattice space. Lattice space is screen-style: x grows to the
/// right and y grows **downward**, so "up" means negative y. The unit is
/// whatever layout spacing the lattice was built with (one hexagon side is
/// exactly one spacing long).
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    Add,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", "self.x", "self.y")]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance between two points
    pub fn distance_to(self, other: Point2) -> f64 {
        nalgebra::distance(
            &nalgebra::Point2::from(self),
            &nalgebra::Point2::from(other),
        )
    }

    /// Are these two points the same, within a tolerance? Both coordinate
    /// deltas must be **strictly** less than the tolerance.
    pub fn approx_eq(self, other: Point2, tolerance: f64) -> bool {
        (self.x - other.x).abs() < tolerance
            && (self.y - other.y).abs() < tolerance
    }
}

impl From<nalgebra::Point2<f64>> for Point2 {
    fn from(other: nalgebra::Point2<f64>) -> Self {
        Self {
            x: other.x,
            y: other.y,
        }
    }
}

impl From<Point2> for nalgebra::Point2<f64> {
    fn from(other: Point2) -> Self {
        nalgebra::Point2::new(other.x, other.y)
    }
}

/// Opaque identifier for a single vertex within a lattice. IDs are assigned in
/// discovery order during the build, starting at 0. They're only meaningful
/// within the lattice that assigned them; a rebuild throws them all away.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct VertexId(pub u32);

/// A single lattice vertex: a deduplicated hexagon corner.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub position: Point2,
}

/// Canonical identity of an edge. An edge is an unordered pair of vertices, so
/// the key always stores the smaller ID first. That means
/// `EdgeKey::new(a, b) == EdgeKey::new(b, a)` for every pair, and two edges
/// are the same edge iff their keys are equal.
///
/// The text form is `"{low}-{high}"`, e.g. `"3-7"`. That's what gets persisted
/// in designs, so it serializes as a plain string.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display(fmt = "{}{}{}", "self.low", "EdgeKey::SEPARATOR", "self.high")]
pub struct EdgeKey {
    low: VertexId,
    high: VertexId,
}

impl EdgeKey {
    pub const SEPARATOR: char = '-';

    pub fn new(a: VertexId, b: VertexId) -> Self {
        Self {
            low: cmp::min(a, b),
            high: cmp::max(a, b),
        }
    }

    /// The smaller of the two endpoint IDs
    pub fn low(&self) -> VertexId {
        self.low
    }

    /// The larger of the two endpoint IDs
    pub fn high(&self) -> VertexId {
        self.high
    }

    /// Both endpoints, smaller ID first
    pub fn endpoints(&self) -> (VertexId, VertexId) {
        (self.low, self.high)
    }
}

impl FromStr for EdgeKey {
    type Err = anyhow::Error;

    /// Parse the text form of a key. Reversed input (`"7-3"`) is accepted and
    /// canonicalized.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s.split_once(Self::SEPARATOR).ok_or_else(|| {
            anyhow!(
                "edge key {:?} is missing separator {:?}",
                s,
                Self::SEPARATOR
            )
        })?;
        let parse = |id: &str| -> anyhow::Result<VertexId> {
            id.trim().parse::<u32>().map(VertexId).with_context(|| {
                format!("invalid vertex ID in edge key {:?}", s)
            })
        };
        Ok(Self::new(parse(a)?, parse(b)?))
    }
}

impl Serialize for EdgeKey {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serde_display_from_str::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for EdgeKey {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        serde_display_from_str::deserialize(deserializer)
    }
}
