use tracing::trace;

use crate::math::Point3;

/// A closed triangle mesh reconstructed from planar contours.
///
/// Coincident points at seams are not merged; only triangles are stored.
#[derive(Debug, Clone, Default)]
pub struct SurfaceMesh {
    /// Vertex positions (the whole point pool, including cap offset points).
    pub vertices: Vec<Point3>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl SurfaceMesh {
    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns the three corners of a triangle.
    #[must_use]
    pub fn triangle(&self, index: usize) -> [Point3; 3] {
        let [a, b, c] = self.indices[index];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }
}

/// Accumulates triangles emitted by the stitching and sealing stages.
///
/// Triangles that reuse a point id are dropped on the way in, so the
/// assembled mesh never holds degenerate index triples.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    indices: Vec<[u32; 3]>,
    rejected: usize,
}

impl MeshBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a triangle. Returns `false` if it was degenerate and dropped.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) -> bool {
        if a == b || b == c || a == c {
            trace!(a, b, c, "dropping degenerate triangle");
            self.rejected += 1;
            return false;
        }
        self.indices.push([a, b, c]);
        true
    }

    /// Number of triangles accepted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if no triangle was accepted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of degenerate triangles dropped so far.
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Accepted triangles, in emission order.
    #[must_use]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.indices
    }

    /// Finishes the mesh over the given point pool.
    #[must_use]
    pub fn finish(self, vertices: Vec<Point3>) -> SurfaceMesh {
        SurfaceMesh {
            vertices,
            indices: self.indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_triangles_are_dropped() {
        let mut builder = MeshBuilder::new();
        assert!(builder.push_triangle(0, 1, 2));
        assert!(!builder.push_triangle(0, 0, 2));
        assert!(!builder.push_triangle(3, 4, 3));
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.rejected(), 2);
    }

    #[test]
    fn finish_keeps_order() {
        let mut builder = MeshBuilder::new();
        builder.push_triangle(0, 1, 2);
        builder.push_triangle(2, 1, 3);
        let mesh = builder.finish(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ]);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices[1], [2, 1, 3]);
        assert_eq!(mesh.triangle(1)[2], Point3::new(1.0, 1.0, 0.0));
    }
}
