use crate::contour::{ContourLine, ContourStore};
use crate::math::Point3;

/// Splits a self-touching ("keyhole") loop into independent loops.
///
/// Two points pinch when they lie closer than `epsilon` while being more than
/// `minimum_separation` positions apart along the loop. A loop without pinches
/// is returned unchanged.
#[derive(Debug, Clone, Copy)]
pub struct FixKeyholes {
    epsilon: f64,
    minimum_separation: usize,
}

impl FixKeyholes {
    /// Creates a new `FixKeyholes` operation.
    #[must_use]
    pub fn new(epsilon: f64, minimum_separation: usize) -> Self {
        Self {
            epsilon,
            minimum_separation,
        }
    }

    /// Executes the split, returning one or more closed lines.
    ///
    /// Sub-loops come out in the order they were opened during the walk, the
    /// outermost first.
    #[must_use]
    pub fn execute(&self, store: &ContourStore, line: &ContourLine) -> Vec<ContourLine> {
        let positions = store.resolve(&line.points);
        let partners = self.pinch_partners(&positions, line.is_closed());
        if partners.iter().all(Option::is_none) {
            return vec![line.clone()];
        }

        // Layer arena in creation order plus a stack of open layers.
        let mut layers: Vec<Vec<u32>> = vec![Vec::new()];
        let mut open: Vec<usize> = vec![0];
        let mut in_channel = false;

        for (i, &id) in line.points.iter().enumerate() {
            let current = open[open.len() - 1];
            match partners[i] {
                None => {
                    layers[current].push(id);
                    in_channel = false;
                }
                Some(_) if in_channel => {}
                Some(partner) if partner > i => {
                    layers[current].push(id);
                    layers.push(Vec::new());
                    open.push(layers.len() - 1);
                    in_channel = true;
                }
                Some(_) if open.len() > 1 => {
                    layers[current].push(id);
                    open.pop();
                    in_channel = true;
                }
                // A pinch end with no layer to close; keep it as a plain point.
                Some(_) => {
                    layers[current].push(id);
                    in_channel = false;
                }
            }
        }

        layers
            .into_iter()
            .filter(|ids| !ids.is_empty())
            .map(|ids| ContourLine::new(ids).closed())
            .collect()
    }

    /// Returns `true` if the loop holds at least one pinch.
    #[must_use]
    pub fn has_keyhole(&self, store: &ContourStore, line: &ContourLine) -> bool {
        let positions = store.resolve(&line.points);
        self.pinch_partners(&positions, line.is_closed())
            .iter()
            .any(Option::is_some)
    }

    /// For each position, the position it pinches against, if any.
    ///
    /// When a point pinches against several others the last pair found wins.
    fn pinch_partners(&self, points: &[Point3], closed: bool) -> Vec<Option<usize>> {
        let n = points.len();
        let mut partners = vec![None; n];
        if n < 2 {
            return partners;
        }
        let cycle = if closed { n - 1 } else { n };
        let epsilon_sq = self.epsilon * self.epsilon;

        for i in 0..n {
            for j in (i + 1)..n {
                let forward = j - i;
                let separation = forward.min(cycle.saturating_sub(forward));
                if separation <= self.minimum_separation {
                    continue;
                }
                if (points[i] - points[j]).norm_squared() < epsilon_sq {
                    partners[i] = Some(j);
                    partners[j] = Some(i);
                }
            }
        }
        partners
    }
}
