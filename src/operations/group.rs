use crate::contour::{ContourStore, LineId, Plane};
use crate::error::Result;

/// Partitions lines into planes of identical z, in ascending z order.
///
/// Lines are stably sorted by z first, so input that is already ordered keeps
/// its line order within each plane.
pub struct GroupPlanes<'a> {
    lines: &'a [LineId],
}

impl<'a> GroupPlanes<'a> {
    /// Creates a new `GroupPlanes` operation over the given lines.
    #[must_use]
    pub fn new(lines: &'a [LineId]) -> Self {
        Self { lines }
    }

    /// Executes the grouping.
    ///
    /// # Errors
    ///
    /// Returns an error if a line is missing from the store or has no points.
    #[allow(clippy::float_cmp)]
    pub fn execute(&self, store: &ContourStore) -> Result<Vec<Plane>> {
        let mut keyed = Vec::with_capacity(self.lines.len());
        for &id in self.lines {
            keyed.push((store.line_z(id)?, id));
        }
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut planes: Vec<Plane> = Vec::new();
        for (z, id) in keyed {
            match planes.last_mut() {
                Some(plane) if plane.z == z => plane.lines.push(id),
                _ => planes.push(Plane::new(z, vec![id])),
            }
        }
        Ok(planes)
    }
}

/// Smallest positive z-gap between consecutive planes, if any.
#[must_use]
pub fn infer_plane_spacing(planes: &[Plane]) -> Option<f64> {
    planes
        .windows(2)
        .map(|pair| pair[1].z - pair[0].z)
        .filter(|gap| *gap > 0.0)
        .min_by(f64::total_cmp)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::contour::ContourLine;
    use crate::math::Point3;

    fn add_square(store: &mut ContourStore, x: f64, z: f64) -> LineId {
        let ids: Vec<u32> = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
            .iter()
            .map(|&(dx, dy)| store.add_point(Point3::new(x + dx, dy, z)))
            .collect();
        store.add_line(ContourLine::new(ids).closed())
    }

    #[test]
    fn groups_consecutive_equal_z() {
        let mut store = ContourStore::new();
        let a = add_square(&mut store, 0.0, 0.0);
        let b = add_square(&mut store, 5.0, 0.0);
        let c = add_square(&mut store, 0.0, 1.0);
        let planes = GroupPlanes::new(&[a, b, c]).execute(&store).unwrap();
        assert_eq!(planes.len(), 2);
        assert_eq!(planes[0].lines, vec![a, b]);
        assert_eq!(planes[1].lines, vec![c]);
        assert!((planes[1].z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unsorted_input_is_sorted_stably() {
        let mut store = ContourStore::new();
        let high = add_square(&mut store, 0.0, 2.0);
        let low1 = add_square(&mut store, 0.0, 0.0);
        let low2 = add_square(&mut store, 3.0, 0.0);
        let planes = GroupPlanes::new(&[high, low1, low2]).execute(&store).unwrap();
        assert_eq!(planes.len(), 2);
        assert_eq!(planes[0].lines, vec![low1, low2]);
        assert_eq!(planes[1].lines, vec![high]);
    }

    #[test]
    fn spacing_is_smallest_gap() {
        let mut store = ContourStore::new();
        let ids = [
            add_square(&mut store, 0.0, 0.0),
            add_square(&mut store, 0.0, 2.0),
            add_square(&mut store, 0.0, 2.5),
        ];
        let planes = GroupPlanes::new(&ids).execute(&store).unwrap();
        assert!((infer_plane_spacing(&planes).unwrap() - 0.5).abs() < 1e-12);
        assert!(infer_plane_spacing(&planes[..1]).is_none());
    }
}
