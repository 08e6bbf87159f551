use std::collections::HashMap;

use crate::mesh::SurfaceMesh;

/// Edge usage census of a triangle mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeReport {
    /// Undirected edges used by exactly one triangle.
    pub boundary_edges: usize,
    /// Undirected edges used by more than two triangles.
    pub non_manifold_edges: usize,
    /// Directed edges traversed in the same direction by two or more
    /// triangles, which signals inconsistent winding.
    pub misoriented_edges: usize,
    /// Total number of distinct undirected edges.
    pub edge_count: usize,
}

impl EdgeReport {
    /// Whether every edge is shared by exactly two consistently wound
    /// triangles.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.edge_count > 0
            && self.boundary_edges == 0
            && self.non_manifold_edges == 0
            && self.misoriented_edges == 0
    }
}

/// Checks whether a mesh is a closed, consistently oriented 2-manifold.
pub struct EdgeManifold<'a> {
    mesh: &'a SurfaceMesh,
}

impl<'a> EdgeManifold<'a> {
    /// Creates a new `EdgeManifold` query.
    #[must_use]
    pub fn new(mesh: &'a SurfaceMesh) -> Self {
        Self { mesh }
    }

    /// Counts how every edge of the mesh is used.
    #[must_use]
    pub fn execute(&self) -> EdgeReport {
        let mut undirected: HashMap<(u32, u32), usize> = HashMap::new();
        let mut directed: HashMap<(u32, u32), usize> = HashMap::new();
        for tri in &self.mesh.indices {
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                *directed.entry((a, b)).or_default() += 1;
                *undirected.entry((a.min(b), a.max(b))).or_default() += 1;
            }
        }

        EdgeReport {
            boundary_edges: undirected.values().filter(|&&n| n == 1).count(),
            non_manifold_edges: undirected.values().filter(|&&n| n > 2).count(),
            misoriented_edges: directed.values().filter(|&&n| n > 1).count(),
            edge_count: undirected.len(),
        }
    }

    /// Shorthand for `execute().is_closed()`.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.execute().is_closed()
    }
}
