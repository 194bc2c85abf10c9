use crate::lattice::{EdgeKey, Point2, Vertex, VertexId};
use fnv::FnvBuildHasher;
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet};

/// An ORDERED map of vertex IDs to vertices. Iteration order is discovery
/// order, which is also ascending ID order.
pub type VertexMap = IndexMap<VertexId, Vertex, FnvBuildHasher>;
/// A map of vertex IDs to some `T`
pub type VertexIdMap<T> = HashMap<VertexId, T, FnvBuildHasher>;
/// An ORDERED set of edge keys. The lattice uses this for its full edge list,
/// so edges keep the order they were generated in while still getting O(1)
/// membership checks.
pub type EdgeKeyIndexSet = IndexSet<EdgeKey, FnvBuildHasher>;
/// An unordered set of edge keys, e.g. the enabled edges of a design
pub type EdgeKeySet = HashSet<EdgeKey, FnvBuildHasher>;

/// Assigns vertex IDs to hexagon corner points, merging any points that are
/// within a tolerance of each other. Two points are the same vertex iff
/// **both** coordinate deltas are strictly less than the tolerance. When a new
/// point matches more than one existing vertex, the first-seen (lowest ID)
/// vertex wins.
///
/// Points are bucketed on a grid with cells the size of the tolerance, so any
/// match for a point has to live in its own bucket or one of the 8 around it.
/// That keeps lookups near-constant instead of scanning every vertex.
#[derive(Clone, Debug)]
pub struct VertexDeduper {
    tolerance: f64,
    vertices: VertexMap,
    buckets: HashMap<(i64, i64), Vec<VertexId>, FnvBuildHasher>,
}

impl VertexDeduper {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            vertices: VertexMap::default(),
            buckets: HashMap::default(),
        }
    }

    fn bucket(&self, point: Point2) -> (i64, i64) {
        (
            (point.x / self.tolerance).floor() as i64,
            (point.y / self.tolerance).floor() as i64,
        )
    }

    /// Find the existing vertex for this point, if there is one
    pub fn find(&self, point: Point2) -> Option<VertexId> {
        let (bx, by) = self.bucket(point);
        let mut found: Option<VertexId> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let ids = match self.buckets.get(&(bx + dx, by + dy)) {
                    Some(ids) => ids,
                    None => continue,
                };
                for &id in ids {
                    let position = self.vertices[&id].position;
                    if position.approx_eq(point, self.tolerance)
                        && found.map_or(true, |f| id < f)
                    {
                        found = Some(id);
                    }
                }
            }
        }
        found
    }

    /// Get the ID for this point, allocating a new vertex if no existing one
    /// is close enough
    pub fn insert(&mut self, point: Point2) -> VertexId {
        if let Some(id) = self.find(point) {
            return id;
        }

        let id = VertexId(self.vertices.len() as u32);
        self.vertices.insert(
            id,
            Vertex {
                id,
                position: point,
            },
        );
        let bucket = self.bucket(point);
        self.buckets.entry(bucket).or_default().push(id);
        id
    }

    /// Move the collected vertices out
    pub fn into_vertices(self) -> VertexMap {
        self.vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_within_tolerance() {
        let mut deduper = VertexDeduper::new(0.01);
        let a = deduper.insert(Point2::new(1.0, 1.0));
        let b = deduper.insert(Point2::new(1.005, 0.995));
        let c = deduper.insert(Point2::new(1.02, 1.0));
        assert_eq!(a, VertexId(0));
        assert_eq!(b, a);
        assert_eq!(c, VertexId(1));

        // First-seen position is kept
        let vertices = deduper.into_vertices();
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[&a].position, Point2::new(1.0, 1.0));
    }

    #[test]
    fn test_dedup_across_bucket_boundary() {
        // These straddle zero, so they land in different buckets
        let mut deduper = VertexDeduper::new(0.01);
        let a = deduper.insert(Point2::new(0.0, 5.0));
        let b = deduper.insert(Point2::new(-1.0e-15, 5.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_dedup_first_seen_wins() {
        // Two vertices 0.015 apart, and a third point within tolerance of both
        let mut deduper = VertexDeduper::new(0.01);
        let a = deduper.insert(Point2::new(0.0, 0.0));
        let b = deduper.insert(Point2::new(0.015, 0.0));
        assert_ne!(a, b);
        assert_eq!(deduper.insert(Point2::new(0.0075, 0.0)), a);
    }
}
