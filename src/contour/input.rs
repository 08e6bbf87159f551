use super::{ContourLine, ContourStore};
use crate::error::InputError;
use crate::math::Point3;

/// Source contours: a flat point array plus per-line point-index lists.
///
/// Lines are expected to be planar and ordered by non-decreasing z. A line
/// whose last index differs from its first is treated as closed anyway.
#[derive(Debug, Clone, Default)]
pub struct PlanarContours {
    /// Point positions.
    pub points: Vec<Point3>,
    /// Each line as indices into `points`.
    pub lines: Vec<Vec<u32>>,
}

impl PlanarContours {
    /// Creates an empty contour set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a loop given by its positions and returns its line index.
    ///
    /// The loop is stored closed: its first index is repeated at the end.
    #[allow(clippy::cast_possible_truncation)]
    pub fn push_loop(&mut self, points: impl IntoIterator<Item = Point3>) -> usize {
        let start = self.points.len();
        self.points.extend(points);
        let mut ids: Vec<u32> = (start..self.points.len()).map(|i| i as u32).collect();
        if let Some(&first) = ids.first() {
            ids.push(first);
        }
        self.lines.push(ids);
        self.lines.len() - 1
    }

    /// Checks that the input is non-empty, finite and internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Empty`] if there are no points or no lines,
    /// [`InputError::NonFinitePoint`] for NaN or infinite coordinates, and
    /// [`InputError::PointIndexOutOfRange`] for dangling indices.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.points.is_empty() {
            return Err(InputError::Empty("points"));
        }
        if self.lines.is_empty() {
            return Err(InputError::Empty("lines"));
        }
        if let Some(bad) = self
            .points
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return Err(InputError::NonFinitePoint(bad));
        }
        let count = self.points.len();
        for (line, ids) in self.lines.iter().enumerate() {
            if let Some(&index) = ids.iter().find(|&&id| id as usize >= count) {
                return Err(InputError::PointIndexOutOfRange { line, index, count });
            }
        }
        Ok(())
    }

    /// Validates the input and moves it into a fresh store.
    ///
    /// Returns the store (owning the points, but no lines yet) together with
    /// the raw lines, closed where needed.
    ///
    /// # Errors
    ///
    /// Same as [`PlanarContours::validate`].
    pub fn into_store(self) -> Result<(ContourStore, Vec<ContourLine>), InputError> {
        self.validate()?;
        let lines = self
            .lines
            .into_iter()
            .map(|ids| ContourLine::new(ids).closed())
            .collect();
        Ok((ContourStore::with_points(self.points), lines))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square(z: f64) -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, z),
            Point3::new(1.0, 0.0, z),
            Point3::new(1.0, 1.0, z),
            Point3::new(0.0, 1.0, z),
        ]
    }

    #[test]
    fn push_loop_closes() {
        let mut input = PlanarContours::new();
        input.push_loop(square(0.0));
        let second = input.push_loop(square(1.0));
        assert_eq!(second, 1);
        assert_eq!(input.lines[0], vec![0, 1, 2, 3, 0]);
        assert_eq!(input.lines[1], vec![4, 5, 6, 7, 4]);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn empty_is_rejected() {
        assert!(matches!(PlanarContours::new().validate(), Err(InputError::Empty("points"))));
        let input = PlanarContours {
            points: square(0.0),
            lines: vec![],
        };
        assert!(matches!(input.validate(), Err(InputError::Empty("lines"))));
    }

    #[test]
    fn dangling_index_is_rejected() {
        let input = PlanarContours {
            points: square(0.0),
            lines: vec![vec![0, 1, 9]],
        };
        assert!(matches!(
            input.validate(),
            Err(InputError::PointIndexOutOfRange { line: 0, index: 9, count: 4 })
        ));
    }

    #[test]
    fn non_finite_is_rejected() {
        let mut points = square(0.0);
        points[2].y = f64::NAN;
        let input = PlanarContours {
            points,
            lines: vec![vec![0, 1, 2, 3]],
        };
        assert!(matches!(input.validate(), Err(InputError::NonFinitePoint(2))));
    }

    #[test]
    fn open_lines_are_closed_on_import() {
        let input = PlanarContours {
            points: square(0.0),
            lines: vec![vec![0, 1, 2, 3]],
        };
        let (store, lines) = input.into_store().unwrap();
        assert_eq!(store.points().len(), 4);
        assert_eq!(lines[0].points, vec![0, 1, 2, 3, 0]);
    }
}
