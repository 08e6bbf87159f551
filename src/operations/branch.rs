use crate::contour::{ContourLine, ContourStore, LineId};
use crate::error::Result;
use crate::math::nearest::nearest_point;
use crate::math::Point3;

/// For each point of a line, the index (into the partner list) of the
/// overlap partner it lies closest to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchAssignment {
    partners: Vec<LineId>,
    owners: Vec<usize>,
}

impl BranchAssignment {
    /// The partner each point was assigned to, by position in the line.
    #[must_use]
    pub fn owners(&self) -> &[usize] {
        &self.owners
    }

    /// Extracts the branch of `line` attributed to `target`.
    ///
    /// Points owned by `target` are kept in line order; after every run of
    /// owned points the next point is kept as well so the branch reaches
    /// across the seam. A branch cut from a closed line is closed again.
    /// Returns an empty line if `target` is not a partner.
    #[must_use]
    pub fn branch_for(&self, line: &ContourLine, target: LineId) -> ContourLine {
        let Some(owner) = self.partners.iter().position(|&p| p == target) else {
            return ContourLine::default();
        };

        let mut points = Vec::new();
        let mut previous_owned = false;
        for (&id, &point_owner) in line.points.iter().zip(&self.owners) {
            if point_owner == owner {
                points.push(id);
                previous_owned = true;
            } else {
                if previous_owned {
                    points.push(id);
                }
                previous_owned = false;
            }
        }

        let branch = ContourLine::new(points);
        if branch.len() > 1 && line.is_closed() {
            branch.closed()
        } else {
            branch
        }
    }
}

/// Splits a line into branches, one per overlap partner on the neighbouring
/// plane.
///
/// Every point goes to the partner whose nearest point is closest to it
/// (squared Euclidean distance, brute force). When two partners are equally
/// close the one listed first wins.
pub struct DivideBranch<'a> {
    partners: &'a [LineId],
}

impl<'a> DivideBranch<'a> {
    /// Creates a new `DivideBranch` operation over a line's overlap partners.
    #[must_use]
    pub fn new(partners: &'a [LineId]) -> Self {
        Self { partners }
    }

    /// Assigns every point of `line` to its closest partner.
    ///
    /// A single partner owns the whole line without any distance checks.
    ///
    /// # Errors
    ///
    /// Returns an error if a partner line is missing from the store.
    pub fn classify(&self, store: &ContourStore, line: &ContourLine) -> Result<BranchAssignment> {
        if self.partners.len() <= 1 {
            return Ok(BranchAssignment {
                partners: self.partners.to_vec(),
                owners: vec![0; line.len()],
            });
        }

        let mut partner_points: Vec<Vec<Point3>> = Vec::with_capacity(self.partners.len());
        for &id in self.partners {
            partner_points.push(store.resolve(&store.line(id)?.points));
        }

        let owners = line
            .points
            .iter()
            .map(|&id| closest_partner(store.point(id), &partner_points))
            .collect();

        Ok(BranchAssignment {
            partners: self.partners.to_vec(),
            owners,
        })
    }

    /// Extracts the branch of `line` attributed to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if a partner line is missing from the store.
    pub fn execute(&self, store: &ContourStore, line: &ContourLine, target: LineId) -> Result<ContourLine> {
        Ok(self.classify(store, line)?.branch_for(line, target))
    }
}

fn closest_partner(point: &Point3, partner_points: &[Vec<Point3>]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, points) in partner_points.iter().enumerate() {
        if let Some((_, distance)) = nearest_point(point, points) {
            if distance < best_distance {
                best_distance = distance;
                best = index;
            }
        }
    }
    best
}
