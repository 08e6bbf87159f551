slotmap::new_key_type! {
    /// Unique identifier for a contour line in the contour store.
    pub struct LineId;
}

/// An ordered sequence of point ids describing one planar loop or a branch
/// fragment of one.
///
/// A line is closed when its first id is repeated as its last id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContourLine {
    /// Point ids into the store's point pool.
    pub points: Vec<u32>,
}

impl ContourLine {
    /// Creates a line from point ids.
    #[must_use]
    pub fn new(points: Vec<u32>) -> Self {
        Self { points }
    }

    /// Number of ids in the line, counting a repeated closing id.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the line has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns `true` if the first id is repeated as the last id.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.points.len() >= 2 && self.points.first() == self.points.last()
    }

    /// Returns the line closed by repeating its first id, if not already.
    #[must_use]
    pub fn closed(mut self) -> Self {
        if let Some(&first) = self.points.first() {
            if self.points.last() != Some(&first) {
                self.points.push(first);
            }
        }
        self
    }

    /// Returns the line with its point order inverted.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            points: self.points.iter().rev().copied().collect(),
        }
    }

    /// The point ids without the repeated closing id.
    #[must_use]
    pub fn distinct_points(&self) -> &[u32] {
        if self.is_closed() {
            &self.points[..self.points.len() - 1]
        } else {
            &self.points
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_detection() {
        assert!(ContourLine::new(vec![0, 1, 2, 0]).is_closed());
        assert!(!ContourLine::new(vec![0, 1, 2]).is_closed());
        assert!(!ContourLine::new(vec![0]).is_closed());
    }

    #[test]
    fn closing_appends_first_once() {
        let line = ContourLine::new(vec![3, 4, 5]).closed();
        assert_eq!(line.points, vec![3, 4, 5, 3]);
        assert_eq!(line.clone().closed(), line);
    }

    #[test]
    fn reversal_keeps_closing_id() {
        let line = ContourLine::new(vec![0, 1, 2, 3, 0]);
        assert_eq!(line.reversed().points, vec![0, 3, 2, 1, 0]);
    }

    #[test]
    fn distinct_points_drop_closing_id() {
        assert_eq!(ContourLine::new(vec![0, 1, 2, 0]).distinct_points(), &[0, 1, 2]);
        assert_eq!(ContourLine::new(vec![0, 1, 2]).distinct_points(), &[0, 1, 2]);
    }
}
