mod keyhole;
mod winding;

pub use keyhole::FixKeyholes;
pub use winding::NormalizeWinding;

use tracing::{debug, warn};

use crate::contour::{ContourLine, ContourStore, LineId};

/// Turns raw source loops into the store's normalized lines.
///
/// Each loop is split at keyholes and every piece is wound
/// counter-clockwise before it is inserted. Loops with fewer than two points
/// are dropped with a warning.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeLines {
    keyholes: FixKeyholes,
    winding: NormalizeWinding,
}

impl NormalizeLines {
    /// Creates a new `NormalizeLines` operation.
    #[must_use]
    pub fn new(keyhole_epsilon: f64, minimum_index_separation: usize) -> Self {
        Self {
            keyholes: FixKeyholes::new(keyhole_epsilon, minimum_index_separation),
            winding: NormalizeWinding::new(),
        }
    }

    /// Executes the normalization, inserting the resulting lines into the
    /// store and returning their ids in input order.
    pub fn execute(&self, store: &mut ContourStore, raw: &[ContourLine]) -> Vec<LineId> {
        let mut ids = Vec::with_capacity(raw.len());
        let mut split = 0usize;

        for (index, line) in raw.iter().enumerate() {
            if line.distinct_points().len() < 2 {
                warn!(line = index, points = line.len(), "dropping degenerate contour line");
                continue;
            }

            let pieces = self.keyholes.execute(store, line);
            if pieces.len() > 1 {
                split += 1;
            }

            for piece in pieces {
                if piece.distinct_points().len() < 2 {
                    warn!(line = index, "dropping degenerate keyhole fragment");
                    continue;
                }
                let piece = self.winding.execute(store, &piece);
                ids.push(store.add_line(piece));
            }
        }

        debug!(input = raw.len(), output = ids.len(), split, "normalized contour lines");
        ids
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::contour::PlanarContours;
    use crate::math::polygon_2d::is_clockwise;
    use crate::math::Point3;

    #[test]
    fn degenerate_lines_are_dropped() {
        let mut input = PlanarContours::new();
        input.push_loop([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ]);
        input.lines.push(vec![0]);
        let (mut store, raw) = input.into_store().unwrap();

        let ids = NormalizeLines::new(0.1, 2).execute(&mut store, &raw);
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn repeated_single_point_is_dropped() {
        let mut input = PlanarContours::new();
        input.push_loop([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ]);
        input.lines.push(vec![1, 1]);
        let (mut store, raw) = input.into_store().unwrap();
        assert_eq!(raw[1].len(), 2);

        let ids = NormalizeLines::new(0.1, 2).execute(&mut store, &raw);
        assert_eq!(ids.len(), 1);
        assert_eq!(store.line_count(), 1);
    }

    #[test]
    fn all_lines_become_counter_clockwise() {
        let mut input = PlanarContours::new();
        input.push_loop([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ]);
        input.push_loop([
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ]);
        let (mut store, raw) = input.into_store().unwrap();

        let ids = NormalizeLines::new(0.1, 2).execute(&mut store, &raw);
        assert_eq!(ids.len(), 2);
        for id in ids {
            let line = store.line(id).unwrap();
            assert!(line.is_closed());
            assert!(!is_clockwise(&store.resolve(&line.points)));
        }
    }
}
