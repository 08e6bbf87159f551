use crate::contour::{ContourLine, ContourStore};
use crate::math::polygon_2d::is_clockwise;

/// Reorders a loop so that it winds counter-clockwise when viewed from +z.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeWinding;

impl NormalizeWinding {
    /// Creates a new `NormalizeWinding` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the normalization, returning the line reversed if it was
    /// clockwise and unchanged otherwise.
    #[must_use]
    pub fn execute(&self, store: &ContourStore, line: &ContourLine) -> ContourLine {
        if is_clockwise(&store.resolve(&line.points)) {
            line.reversed()
        } else {
            line.clone()
        }
    }
}
