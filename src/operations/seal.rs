use std::collections::HashMap;

use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation,
};
use tracing::{debug, warn};

use super::stitch::StitchContours;
use crate::contour::{ContourLine, ContourStore, Plane, TriangulationFlags};
use crate::error::{Result, TriangulationError};
use crate::math::polygon_2d::{point_in_ring, triangle_centroid_2d};
use crate::math::Vector3;
use crate::mesh::MeshBuilder;

/// Where a cap closing an exposed loop is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapPlacement {
    /// Cap a virtual copy of the loop shifted half a plane spacing outward,
    /// joined to the loop by a short wall.
    #[default]
    Offset,
    /// Cap the loop's own points. A loop exposed on both sides still gets
    /// offset caps, since two flush caps would share every edge.
    Flush,
}

/// Which way a cap faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapSide {
    /// Cap above the loop, facing +z.
    Top,
    /// Cap below the loop, facing -z.
    Bottom,
}

/// Fills a single closed planar loop with triangles.
///
/// The loop's points are run through a constrained Delaunay triangulation
/// and every triangle whose centroid falls outside the loop (ray-casting
/// test) is discarded. Kept triangles are wound to face `side`.
pub struct TriangulateCap<'a> {
    ring: &'a ContourLine,
    side: CapSide,
}

impl<'a> TriangulateCap<'a> {
    /// Creates a new `TriangulateCap` operation.
    #[must_use]
    pub fn new(ring: &'a ContourLine, side: CapSide) -> Self {
        Self { ring, side }
    }

    /// Executes the triangulation, appending the cap to `mesh`.
    ///
    /// Returns the number of triangles emitted; loops with fewer than three
    /// distinct points emit nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationError::Failed`] if a point cannot be inserted
    /// into the triangulation.
    pub fn execute(&self, store: &ContourStore, mesh: &mut MeshBuilder) -> Result<usize> {
        let ids = self.ring.distinct_points();
        if ids.len() < 3 {
            warn!(points = ids.len(), "skipping cap of degenerate loop");
            return Ok(0);
        }
        let ring = store.resolve(ids);

        let mut cdt = ConstrainedDelaunayTriangulation::<SpadePoint2<f64>>::new();
        let mut vertex_map: HashMap<usize, u32> = HashMap::new();
        let mut handles = Vec::with_capacity(ids.len());
        for (&id, p) in ids.iter().zip(&ring) {
            let handle = cdt
                .insert(SpadePoint2::new(p.x, p.y))
                .map_err(|e: InsertionError| TriangulationError::Failed(format!("CDT insert: {e}")))?;
            // Coincident points collapse onto the first inserted id.
            vertex_map.entry(handle.index()).or_insert(id);
            handles.push(handle);
        }

        for i in 0..handles.len() {
            let from = handles[i];
            let to = handles[(i + 1) % handles.len()];
            if from == to {
                continue;
            }
            if cdt.can_add_constraint(from, to) {
                cdt.add_constraint(from, to);
            } else {
                warn!(edge = i, "cap loop edge crosses an earlier edge; constraint skipped");
            }
        }

        let mut emitted = 0;
        for face in cdt.inner_faces() {
            let [a, b, c] = face.vertices().map(|v| vertex_map.get(&v.fix().index()).copied());
            let (Some(a), Some(b), Some(c)) = (a, b, c) else {
                continue;
            };
            let (pa, pb, pc) = (store.point(a), store.point(b), store.point(c));
            if !point_in_ring(&triangle_centroid_2d(pa, pb, pc), &ring) {
                continue;
            }

            let ccw = (pb.x - pa.x) * (pc.y - pa.y) - (pb.y - pa.y) * (pc.x - pa.x) > 0.0;
            let (b, c) = match (self.side, ccw) {
                (CapSide::Top, true) | (CapSide::Bottom, false) => (b, c),
                _ => (c, b),
            };
            if mesh.push_triangle(a, b, c) {
                emitted += 1;
            }
        }
        Ok(emitted)
    }
}

/// Closes every loop boundary that was not stitched to a neighbouring plane.
///
/// Runs once, after all plane pairs were stitched, over the final
/// [`TriangulationFlags`].
pub struct SealMesh<'a> {
    planes: &'a [Plane],
    spacing: f64,
    placement: CapPlacement,
}

/// Counts of the caps added by [`SealMesh`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SealStats {
    /// Caps placed above a loop.
    pub top_caps: usize,
    /// Caps placed below a loop.
    pub bottom_caps: usize,
    /// Caps whose triangulation failed and were left open.
    pub failed: usize,
}

impl<'a> SealMesh<'a> {
    /// Creates a new `SealMesh` operation.
    ///
    /// `spacing` is the distance between adjacent planes; offset caps sit
    /// half of it away from their loop.
    #[must_use]
    pub fn new(planes: &'a [Plane], spacing: f64, placement: CapPlacement) -> Self {
        Self {
            planes,
            spacing,
            placement,
        }
    }

    /// Executes the sealing, appending offset points to the store and caps
    /// and walls to `mesh`.
    ///
    /// # Errors
    ///
    /// Returns an error if a plane refers to a line missing from the store.
    pub fn execute(
        &self,
        store: &mut ContourStore,
        flags: &TriangulationFlags,
        mesh: &mut MeshBuilder,
    ) -> Result<SealStats> {
        let mut stats = SealStats::default();
        let half = self.spacing / 2.0;

        for plane in self.planes {
            for &id in &plane.lines {
                let line = store.line(id)?.clone();
                let open_top = !flags.is_above(id);
                let open_bottom = !flags.is_below(id);
                let flush = self.placement == CapPlacement::Flush && !(open_top && open_bottom);

                if open_top {
                    if cap_side(store, mesh, &line, CapSide::Top, flush, half) {
                        stats.top_caps += 1;
                    } else {
                        stats.failed += 1;
                    }
                }
                if open_bottom {
                    if cap_side(store, mesh, &line, CapSide::Bottom, flush, -half) {
                        stats.bottom_caps += 1;
                    } else {
                        stats.failed += 1;
                    }
                }
            }
        }

        debug!(
            top = stats.top_caps,
            bottom = stats.bottom_caps,
            failed = stats.failed,
            "sealed exposed contours"
        );
        Ok(stats)
    }
}

/// Caps one side of a loop. Returns `false` if the cap could not be
/// triangulated.
fn cap_side(
    store: &mut ContourStore,
    mesh: &mut MeshBuilder,
    line: &ContourLine,
    side: CapSide,
    flush: bool,
    dz: f64,
) -> bool {
    if flush {
        return match TriangulateCap::new(line, side).execute(store, mesh) {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "flush cap failed");
                false
            }
        };
    }

    let twin = offset_line(store, line, dz);
    if let Err(e) = TriangulateCap::new(&twin, side).execute(store, mesh) {
        warn!(error = %e, "offset cap failed");
        return false;
    }
    let (lower, upper) = match side {
        CapSide::Top => (line, &twin),
        CapSide::Bottom => (&twin, line),
    };
    StitchContours::new(lower, upper).execute(store, mesh);
    true
}

/// Copies a loop's distinct points shifted by `dz` into the store and
/// returns the copy as a closed line.
fn offset_line(store: &mut ContourStore, line: &ContourLine, dz: f64) -> ContourLine {
    let shift = Vector3::new(0.0, 0.0, dz);
    let ids = line
        .distinct_points()
        .iter()
        .map(|&id| {
            let p = *store.point(id) + shift;
            store.add_point(p)
        })
        .collect();
    ContourLine::new(ids).closed()
}
