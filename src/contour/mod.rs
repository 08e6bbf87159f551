pub mod input;
pub mod line;
pub mod plane;

pub use input::PlanarContours;
pub use line::{ContourLine, LineId};
pub use plane::Plane;

use slotmap::{SecondaryMap, SlotMap};

use crate::error::ContourError;
use crate::math::bounds::Aabb;
use crate::math::Point3;

/// Central arena that owns the point pool and all contour lines.
///
/// Points are referenced by `u32` index and never removed, so ids stay
/// stable for the lifetime of the store. Lines are referenced by typed
/// generational keys.
#[derive(Debug, Default)]
pub struct ContourStore {
    points: Vec<Point3>,
    lines: SlotMap<LineId, ContourLine>,
}

impl ContourStore {
    /// Creates a new, empty contour store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store owning the given points and no lines.
    #[must_use]
    pub fn with_points(points: Vec<Point3>) -> Self {
        Self {
            points,
            lines: SlotMap::with_key(),
        }
    }

    // --- Point operations ---

    /// Appends a point to the pool and returns its id.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_point(&mut self, point: Point3) -> u32 {
        self.points.push(point);
        (self.points.len() - 1) as u32
    }

    /// Returns the point with the given id, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`ContourError::PointNotFound`] if the id is past the pool.
    pub fn get_point(&self, id: u32) -> Result<&Point3, ContourError> {
        self.points
            .get(id as usize)
            .ok_or(ContourError::PointNotFound(id))
    }

    /// Returns the point with the given id.
    ///
    /// Ids reach the store only through validated input or
    /// [`ContourStore::add_point`], so an unknown id panics.
    #[must_use]
    pub(crate) fn point(&self, id: u32) -> &Point3 {
        &self.points[id as usize]
    }

    /// The whole point pool.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Resolves a sequence of ids to positions.
    #[must_use]
    pub fn resolve(&self, ids: &[u32]) -> Vec<Point3> {
        ids.iter().map(|&id| *self.point(id)).collect()
    }

    /// Consumes the store, returning its point pool.
    #[must_use]
    pub fn into_points(self) -> Vec<Point3> {
        self.points
    }

    // --- Line operations ---

    /// Inserts a line and returns its ID.
    pub fn add_line(&mut self, line: ContourLine) -> LineId {
        self.lines.insert(line)
    }

    /// Returns a reference to the line, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`ContourError::LineNotFound`] if the id is not in the store.
    pub fn line(&self, id: LineId) -> Result<&ContourLine, ContourError> {
        self.lines.get(id).ok_or(ContourError::LineNotFound)
    }

    /// Iterates over all lines in insertion order.
    pub fn lines(&self) -> impl Iterator<Item = (LineId, &ContourLine)> {
        self.lines.iter()
    }

    /// Number of lines in the store.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Bounding box of a line's points.
    ///
    /// # Errors
    ///
    /// Returns [`ContourError::LineNotFound`] for an unknown id, or
    /// [`ContourError::Degenerate`] if the line has no points.
    pub fn line_bounds(&self, id: LineId) -> Result<Aabb, ContourError> {
        let line = self.line(id)?;
        Aabb::from_points(line.points.iter().map(|&p| self.point(p)))
            .ok_or_else(|| ContourError::Degenerate("line has no points".into()))
    }

    /// The z-value of a line, taken as the minimum z of its points.
    ///
    /// # Errors
    ///
    /// Same as [`ContourStore::line_bounds`].
    pub fn line_z(&self, id: LineId) -> Result<f64, ContourError> {
        Ok(self.line_bounds(id)?.min.z)
    }
}

/// Per-line record of which neighbouring planes a line was stitched to.
///
/// Lines left unmarked in a direction have an exposed boundary there and get
/// sealed with a cap.
#[derive(Debug, Default, Clone)]
pub struct TriangulationFlags {
    above: SecondaryMap<LineId, bool>,
    below: SecondaryMap<LineId, bool>,
}

impl TriangulationFlags {
    /// Creates an empty flag set; every line starts untriangulated.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a line as stitched to the plane above it.
    pub fn mark_above(&mut self, id: LineId) {
        self.above.insert(id, true);
    }

    /// Marks a line as stitched to the plane below it.
    pub fn mark_below(&mut self, id: LineId) {
        self.below.insert(id, true);
    }

    /// Returns `true` if the line was stitched to the plane above.
    #[must_use]
    pub fn is_above(&self, id: LineId) -> bool {
        self.above.get(id).copied().unwrap_or(false)
    }

    /// Returns `true` if the line was stitched to the plane below.
    #[must_use]
    pub fn is_below(&self, id: LineId) -> bool {
        self.below.get(id).copied().unwrap_or(false)
    }
}
