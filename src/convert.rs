use slotmap::SecondaryMap;
use tracing::{debug, trace, warn};

use crate::contour::{ContourStore, LineId, PlanarContours, Plane, TriangulationFlags};
use crate::error::{InputError, Result};
use crate::mesh::{MeshBuilder, SurfaceMesh};
use crate::operations::branch::{BranchAssignment, DivideBranch};
use crate::operations::group::{infer_plane_spacing, GroupPlanes};
use crate::operations::normalize::NormalizeLines;
use crate::operations::overlap::{FindOverlaps, OverlapTable};
use crate::operations::seal::{CapPlacement, SealMesh};
use crate::operations::stitch::StitchContours;

/// Parameters controlling contour-to-surface conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionParams {
    /// Two points of one loop closer than this are a keyhole pinch.
    pub keyhole_epsilon: f64,
    /// Points at most this many positions apart are never a pinch.
    pub minimum_index_separation: usize,
    /// Distance between adjacent planes. Inferred from the input if unset.
    pub plane_spacing: Option<f64>,
    /// Spacing used when it is unset and the input has a single plane.
    pub fallback_spacing: f64,
    /// How exposed loops are capped.
    pub cap_placement: CapPlacement,
}

impl Default for ConversionParams {
    fn default() -> Self {
        Self {
            keyhole_epsilon: 0.1,
            minimum_index_separation: 2,
            plane_spacing: None,
            fallback_spacing: 0.01,
            cap_placement: CapPlacement::Offset,
        }
    }
}

impl ConversionParams {
    /// Sets the keyhole pinch distance.
    #[must_use]
    pub fn with_keyhole_epsilon(mut self, epsilon: f64) -> Self {
        self.keyhole_epsilon = epsilon;
        self
    }

    /// Sets the minimum index separation of a keyhole pinch.
    #[must_use]
    pub fn with_minimum_index_separation(mut self, separation: usize) -> Self {
        self.minimum_index_separation = separation;
        self
    }

    /// Fixes the plane spacing instead of inferring it.
    #[must_use]
    pub fn with_plane_spacing(mut self, spacing: f64) -> Self {
        self.plane_spacing = Some(spacing);
        self
    }

    /// Sets the single-plane fallback spacing.
    #[must_use]
    pub fn with_fallback_spacing(mut self, spacing: f64) -> Self {
        self.fallback_spacing = spacing;
        self
    }

    /// Sets the cap placement.
    #[must_use]
    pub fn with_cap_placement(mut self, placement: CapPlacement) -> Self {
        self.cap_placement = placement;
        self
    }

    /// Checks every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidParameter`] for a negative or non-finite
    /// epsilon, or a spacing that is not strictly positive and finite.
    pub fn validate(&self) -> std::result::Result<(), InputError> {
        if !self.keyhole_epsilon.is_finite() || self.keyhole_epsilon < 0.0 {
            return Err(InputError::InvalidParameter {
                name: "keyhole_epsilon",
                value: self.keyhole_epsilon,
                reason: "must be finite and non-negative",
            });
        }
        if let Some(spacing) = self.plane_spacing {
            check_spacing("plane_spacing", spacing)?;
        }
        check_spacing("fallback_spacing", self.fallback_spacing)
    }
}

fn check_spacing(name: &'static str, value: f64) -> std::result::Result<(), InputError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(InputError::InvalidParameter {
            name,
            value,
            reason: "must be finite and positive",
        })
    }
}

/// Counters collected over one conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Normalized lines entering the pipeline.
    pub lines: usize,
    /// Distinct z-planes.
    pub planes: usize,
    /// Overlapping line pairs that were stitched.
    pub stitched_pairs: usize,
    /// Overlapping line pairs skipped because a branch was degenerate.
    pub skipped_branches: usize,
    /// Caps placed above loops.
    pub top_caps: usize,
    /// Caps placed below loops.
    pub bottom_caps: usize,
    /// Caps whose triangulation failed.
    pub failed_caps: usize,
    /// Triangles dropped for repeating a point id.
    pub rejected_triangles: usize,
    /// Triangles in the final mesh.
    pub triangles: usize,
}

/// Reconstructs a closed triangle surface from stacked planar contours.
///
/// Lines are normalized, grouped into planes, stitched to their overlapping
/// neighbours one plane pair at a time, and every side left exposed is
/// capped.
pub struct ContourToSurface {
    params: ConversionParams,
}

impl ContourToSurface {
    /// Creates a new `ContourToSurface` operation.
    #[must_use]
    pub fn new(params: ConversionParams) -> Self {
        Self { params }
    }

    /// Executes the conversion.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] for empty or inconsistent input or invalid
    /// parameters.
    pub fn execute(&self, contours: PlanarContours) -> Result<SurfaceMesh> {
        self.execute_with_stats(contours).map(|(mesh, _)| mesh)
    }

    /// Executes the conversion and also returns its counters.
    ///
    /// # Errors
    ///
    /// Same as [`ContourToSurface::execute`].
    pub fn execute_with_stats(
        &self,
        contours: PlanarContours,
    ) -> Result<(SurfaceMesh, ConversionStats)> {
        self.params.validate()?;
        let (mut store, raw) = contours.into_store()?;

        let lines = NormalizeLines::new(
            self.params.keyhole_epsilon,
            self.params.minimum_index_separation,
        )
        .execute(&mut store, &raw);
        let planes = GroupPlanes::new(&lines).execute(&store)?;
        let mut stats = ConversionStats {
            lines: lines.len(),
            planes: planes.len(),
            ..ConversionStats::default()
        };

        let mut flags = TriangulationFlags::new();
        let mut mesh = MeshBuilder::new();
        for pair in planes.windows(2) {
            stitch_planes(&store, &pair[0], &pair[1], &mut flags, &mut mesh, &mut stats)?;
        }

        let spacing = self
            .params
            .plane_spacing
            .or_else(|| infer_plane_spacing(&planes))
            .unwrap_or(self.params.fallback_spacing);
        let sealed = SealMesh::new(&planes, spacing, self.params.cap_placement).execute(
            &mut store,
            &flags,
            &mut mesh,
        )?;
        stats.top_caps = sealed.top_caps;
        stats.bottom_caps = sealed.bottom_caps;
        stats.failed_caps = sealed.failed;

        stats.rejected_triangles = mesh.rejected();
        let mesh = mesh.finish(store.into_points());
        stats.triangles = mesh.triangle_count();
        debug!(?stats, spacing, "contours converted to surface");
        Ok((mesh, stats))
    }
}

/// Stitches every overlapping pair of lines between two adjacent planes.
///
/// A pair is dropped when either side's branch toward the other has fewer
/// than two points, and the lines are then divided again among their
/// remaining partners. This repeats until every pair is stitchable, so each
/// point of a flagged line ends up inside a stitched branch.
fn stitch_planes(
    store: &ContourStore,
    lower: &Plane,
    upper: &Plane,
    flags: &mut TriangulationFlags,
    mesh: &mut MeshBuilder,
    stats: &mut ConversionStats,
) -> Result<()> {
    let mut table = FindOverlaps::new(lower, upper).execute(store)?;

    let branches = loop {
        let mut lower_branches: SecondaryMap<LineId, BranchAssignment> = SecondaryMap::new();
        let mut upper_branches: SecondaryMap<LineId, BranchAssignment> = SecondaryMap::new();
        let mut branches = Vec::with_capacity(table.pairs().len());
        let mut dropped = Vec::new();

        for &(low, high) in table.pairs() {
            let low_line = store.line(low)?;
            let high_line = store.line(high)?;
            let low_branch = assignment(store, &table, &mut lower_branches, low, true)?
                .branch_for(low_line, high);
            let high_branch = assignment(store, &table, &mut upper_branches, high, false)?
                .branch_for(high_line, low);

            if low_branch.len() <= 1 || high_branch.len() <= 1 {
                warn!(
                    lower = low_branch.len(),
                    upper = high_branch.len(),
                    z = lower.z,
                    "dropping degenerate branch pair"
                );
                dropped.push((low, high));
            } else {
                branches.push((low, high, low_branch, high_branch));
            }
        }

        if dropped.is_empty() {
            break branches;
        }
        stats.skipped_branches += dropped.len();
        table.retain(|pair| !dropped.contains(pair));
    };

    for (low, high, low_branch, high_branch) in branches {
        flags.mark_above(low);
        flags.mark_below(high);
        let emitted = StitchContours::new(&low_branch, &high_branch).execute(store, mesh);
        trace!(emitted, z = lower.z, "stitched branch pair");
        stats.stitched_pairs += 1;
    }
    Ok(())
}

/// Returns the cached branch assignment of a line, classifying it on first
/// use.
fn assignment<'m>(
    store: &ContourStore,
    table: &OverlapTable,
    cache: &'m mut SecondaryMap<LineId, BranchAssignment>,
    id: LineId,
    is_lower: bool,
) -> Result<&'m BranchAssignment> {
    if !cache.contains_key(id) {
        let partners = if is_lower {
            table.partners_of_lower(id)
        } else {
            table.partners_of_upper(id)
        };
        let classified = DivideBranch::new(partners).classify(store, store.line(id)?)?;
        cache.insert(id, classified);
    }
    cache
        .get(id)
        .ok_or_else(|| crate::error::ContourError::LineNotFound.into())
}
