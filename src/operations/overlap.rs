use slotmap::SecondaryMap;

use crate::contour::{ContourStore, LineId, Plane};
use crate::error::Result;

/// Overlap adjacency between the lines of two consecutive planes.
#[derive(Debug, Default, Clone)]
pub struct OverlapTable {
    lower: SecondaryMap<LineId, Vec<LineId>>,
    upper: SecondaryMap<LineId, Vec<LineId>>,
    pairs: Vec<(LineId, LineId)>,
}

impl OverlapTable {
    /// Upper-plane lines overlapping a lower-plane line, in plane order.
    #[must_use]
    pub fn partners_of_lower(&self, id: LineId) -> &[LineId] {
        self.lower.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Lower-plane lines overlapping an upper-plane line, in plane order.
    #[must_use]
    pub fn partners_of_upper(&self, id: LineId) -> &[LineId] {
        self.upper.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every overlapping `(lower, upper)` pair, ordered by lower line and then
    /// by upper line.
    #[must_use]
    pub fn pairs(&self) -> &[(LineId, LineId)] {
        &self.pairs
    }

    /// Keeps only the pairs for which `keep` returns `true`, rebuilding the
    /// partner lists to match.
    pub fn retain(&mut self, mut keep: impl FnMut(&(LineId, LineId)) -> bool) {
        let pairs = std::mem::take(&mut self.pairs);
        *self = Self::default();
        for pair in pairs.into_iter().filter(|pair| keep(pair)) {
            self.insert(pair.0, pair.1);
        }
    }

    fn insert(&mut self, lower: LineId, upper: LineId) {
        push_partner(&mut self.lower, lower, upper);
        push_partner(&mut self.upper, upper, lower);
        self.pairs.push((lower, upper));
    }
}

fn push_partner(map: &mut SecondaryMap<LineId, Vec<LineId>>, key: LineId, partner: LineId) {
    if let Some(list) = map.get_mut(key) {
        list.push(partner);
    } else {
        map.insert(key, vec![partner]);
    }
}

/// Finds which lines of two adjacent planes may be stitched together.
///
/// Two lines overlap when their XY bounding boxes intersect. This is a cheap
/// necessary condition for real overlap, not a sufficient one.
pub struct FindOverlaps<'a> {
    lower: &'a Plane,
    upper: &'a Plane,
}

impl<'a> FindOverlaps<'a> {
    /// Creates a new `FindOverlaps` query between two planes.
    #[must_use]
    pub fn new(lower: &'a Plane, upper: &'a Plane) -> Self {
        Self { lower, upper }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if a plane refers to a missing or empty line.
    pub fn execute(&self, store: &ContourStore) -> Result<OverlapTable> {
        let mut upper_bounds = Vec::with_capacity(self.upper.lines.len());
        for &id in &self.upper.lines {
            upper_bounds.push((id, store.line_bounds(id)?));
        }

        let mut table = OverlapTable::default();
        for &lower in &self.lower.lines {
            let bounds = store.line_bounds(lower)?;
            for (upper, upper_box) in &upper_bounds {
                if bounds.overlaps_xy(upper_box) {
                    table.insert(lower, *upper);
                }
            }
        }
        Ok(table)
    }
}
