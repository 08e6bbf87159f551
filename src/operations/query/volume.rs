use crate::mesh::SurfaceMesh;

/// Computes the enclosed volume of a triangle mesh.
///
/// Uses the signed tetrahedron method: for each triangle, `(1/6) * v0 . (v1 x v2)`
/// summed over all triangles. For a closed, outward-wound mesh the result is
/// positive; inward winding yields a negative volume.
pub struct MeshVolume<'a> {
    mesh: &'a SurfaceMesh,
}

impl<'a> MeshVolume<'a> {
    /// Creates a new `MeshVolume` query.
    #[must_use]
    pub fn new(mesh: &'a SurfaceMesh) -> Self {
        Self { mesh }
    }

    /// Executes the query, returning the signed volume.
    #[must_use]
    pub fn execute(&self) -> f64 {
        let mut signed_volume = 0.0;
        for index in 0..self.mesh.triangle_count() {
            let [v0, v1, v2] = self.mesh.triangle(index);
            signed_volume += v0.coords.dot(&v1.coords.cross(&v2.coords));
        }
        signed_volume / 6.0
    }
}
