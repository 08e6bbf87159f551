use super::LineId;

/// A z-value plus the ordered lines lying on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// The shared z-coordinate of every line on the plane.
    pub z: f64,
    /// Lines on the plane, in input order.
    pub lines: Vec<LineId>,
}

impl Plane {
    /// Creates a plane at `z` holding `lines`.
    #[must_use]
    pub fn new(z: f64, lines: Vec<LineId>) -> Self {
        Self { z, lines }
    }
}
