use nalgebra::DMatrix;
use tracing::{trace, warn};

use crate::contour::{ContourLine, ContourStore};
use crate::math::nearest::nearest_point;
use crate::math::Point3;
use crate::mesh::MeshBuilder;

/// The step taken to reach a cell of the correspondence table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Advance along the upper sequence (column - 1 to column).
    FromLeft,
    /// Advance along the lower sequence (row - 1 to row).
    FromUp,
}

/// Dynamic-programming table aligning two point sequences.
///
/// Rows follow the lower sequence, columns the upper sequence, both in
/// traversal order (see [`StitchContours::correspond`]).
#[derive(Debug, Clone)]
pub struct CorrespondenceTable {
    /// Minimum accumulated squared distance of a monotone path to each cell.
    pub score: DMatrix<f64>,
    /// The move that produced each cell's score.
    pub moves: DMatrix<Move>,
    /// Traversal order of the lower sequence, as positions in its line.
    pub lower_order: Vec<usize>,
    /// Traversal order of the upper sequence, as positions in its line.
    pub upper_order: Vec<usize>,
}

/// Stitches two point sequences on adjacent planes into a triangle strip.
///
/// This is a shortest-path alignment in the spirit of Fuchs, Kedem and
/// Uselton: cell `(i, j)` holds the cheapest monotone path from `(0, 0)`
/// pairing lower point `i` with upper point `j`, and the backtracked path
/// emits one triangle per step. A move is forced whenever one side's
/// nearest neighbour is the previous point on the other side, which keeps
/// the strip aligned with true nearest correspondence.
///
/// The lower sequence must lie below the upper one; emitted triangles then
/// face outward for counter-clockwise loops.
pub struct StitchContours<'a> {
    lower: &'a ContourLine,
    upper: &'a ContourLine,
}

impl<'a> StitchContours<'a> {
    /// Creates a new `StitchContours` operation.
    #[must_use]
    pub fn new(lower: &'a ContourLine, upper: &'a ContourLine) -> Self {
        Self { lower, upper }
    }

    /// Builds the correspondence table, or `None` if either sequence has
    /// fewer than two points.
    ///
    /// The lower sequence is walked from its first point. The upper walk
    /// starts at the upper point nearest to that first point. A closed
    /// sequence skips its repeated closing id while wrapping, so the walk
    /// visits every distinct point and returns to its start.
    #[must_use]
    pub fn correspond(&self, store: &ContourStore) -> Option<CorrespondenceTable> {
        let m = self.lower.len();
        let n = self.upper.len();
        if m < 2 || n < 2 {
            return None;
        }

        let lower_pts = store.resolve(&self.lower.points);
        let upper_pts = store.resolve(&self.upper.points);

        // Nearest point ids across the two sequences.
        let nearest_upper: Vec<usize> = lower_pts
            .iter()
            .map(|p| nearest_point(p, &upper_pts).map_or(0, |(i, _)| i))
            .collect();
        let nearest_lower: Vec<usize> = upper_pts
            .iter()
            .map(|p| nearest_point(p, &lower_pts).map_or(0, |(i, _)| i))
            .collect();

        let lower_order = traversal(0, m, self.lower.is_closed());
        let upper_order = traversal(nearest_upper[0], n, self.upper.is_closed());

        let lower_id = |row: usize| self.lower.points[lower_order[row]];
        let upper_id = |col: usize| self.upper.points[upper_order[col]];
        let cost = |row: usize, col: usize| {
            let a: &Point3 = &lower_pts[lower_order[row]];
            let b: &Point3 = &upper_pts[upper_order[col]];
            (a - b).norm_squared()
        };

        let mut score = DMatrix::<f64>::zeros(m, n);
        let mut moves = DMatrix::from_element(m, n, Move::FromLeft);

        score[(0, 0)] = cost(0, 0);
        for col in 1..n {
            score[(0, col)] = score[(0, col - 1)] + cost(0, col);
        }
        for row in 1..m {
            score[(row, 0)] = score[(row - 1, 0)] + cost(row, 0);
            moves[(row, 0)] = Move::FromUp;
        }

        for row in 1..m {
            let nearest_to_lower = self.upper.points[nearest_upper[lower_order[row]]];
            let previous_lower = lower_id(row - 1);
            for col in 1..n {
                let nearest_to_upper = self.lower.points[nearest_lower[upper_order[col]]];
                let previous_upper = upper_id(col - 1);

                let step = if nearest_to_lower == previous_upper {
                    Move::FromLeft
                } else if nearest_to_upper == previous_lower {
                    Move::FromUp
                } else if score[(row, col - 1)] <= score[(row - 1, col)] {
                    Move::FromLeft
                } else {
                    Move::FromUp
                };

                let base = match step {
                    Move::FromLeft => score[(row, col - 1)],
                    Move::FromUp => score[(row - 1, col)],
                };
                score[(row, col)] = base + cost(row, col);
                moves[(row, col)] = step;
            }
        }

        Some(CorrespondenceTable {
            score,
            moves,
            lower_order,
            upper_order,
        })
    }

    /// Executes the stitching, appending the strip to `mesh`.
    ///
    /// Returns the number of triangles emitted. Degenerate input emits
    /// nothing.
    pub fn execute(&self, store: &ContourStore, mesh: &mut MeshBuilder) -> usize {
        let Some(table) = self.correspond(store) else {
            warn!(
                lower = self.lower.len(),
                upper = self.upper.len(),
                "skipping stitch of degenerate sequence"
            );
            return 0;
        };

        let lower_id = |row: usize| self.lower.points[table.lower_order[row]];
        let upper_id = |col: usize| self.upper.points[table.upper_order[col]];

        let mut row = table.lower_order.len() - 1;
        let mut col = table.upper_order.len() - 1;
        let mut emitted = 0;

        while row > 0 || col > 0 {
            match table.moves[(row, col)] {
                Move::FromLeft => {
                    if mesh.push_triangle(lower_id(row), upper_id(col), upper_id(col - 1)) {
                        emitted += 1;
                    }
                    col -= 1;
                }
                Move::FromUp => {
                    if mesh.push_triangle(lower_id(row), upper_id(col), lower_id(row - 1)) {
                        emitted += 1;
                    }
                    row -= 1;
                }
            }
        }

        trace!(
            lower = self.lower.len(),
            upper = self.upper.len(),
            emitted,
            "stitched contour pair"
        );
        emitted
    }
}

/// Positions visited when walking `len` entries from `start`.
///
/// An open sequence wraps from its last position to `0`; a closed one wraps
/// to `1`, skipping the repeated closing id.
fn traversal(start: usize, len: usize, closed: bool) -> Vec<usize> {
    let mut order = Vec::with_capacity(len);
    let mut current = start;
    for _ in 0..len {
        order.push(current);
        current = next_location(current, len, closed);
    }
    order
}

fn next_location(current: usize, len: usize, closed: bool) -> usize {
    if current + 1 == len {
        usize::from(closed)
    } else {
        current + 1
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn add_loop(store: &mut ContourStore, corners: &[(f64, f64)], z: f64) -> ContourLine {
        let ids: Vec<u32> = corners
            .iter()
            .map(|&(x, y)| store.add_point(Point3::new(x, y, z)))
            .collect();
        ContourLine::new(ids).closed()
    }

    fn unit_square() -> [(f64, f64); 4] {
        [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
    }

    fn edge_uses(triangles: &[[u32; 3]]) -> HashMap<(u32, u32), usize> {
        let mut uses = HashMap::new();
        for t in triangles {
            for k in 0..3 {
                let (a, b) = (t[k], t[(k + 1) % 3]);
                *uses.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        uses
    }

    #[test]
    fn traversal_of_closed_loop_skips_closing_id() {
        assert_eq!(traversal(0, 5, true), vec![0, 1, 2, 3, 4]);
        assert_eq!(traversal(2, 5, true), vec![2, 3, 4, 1, 2]);
    }

    #[test]
    fn traversal_of_open_chain_wraps_to_start() {
        assert_eq!(traversal(0, 4, false), vec![0, 1, 2, 3]);
        assert_eq!(traversal(2, 4, false), vec![2, 3, 0, 1]);
    }

    #[test]
    fn congruent_squares_give_eight_triangles() {
        let mut store = ContourStore::new();
        let lower = add_loop(&mut store, &unit_square(), 0.0);
        let upper = add_loop(&mut store, &unit_square(), 1.0);
        let mut mesh = MeshBuilder::new();

        let emitted = StitchContours::new(&lower, &upper).execute(&store, &mut mesh);
        assert_eq!(emitted, 8);
        assert_eq!(mesh.len(), 8);
    }

    #[test]
    fn band_is_closed_tube() {
        let mut store = ContourStore::new();
        let lower = add_loop(&mut store, &unit_square(), 0.0);
        let upper = add_loop(&mut store, &[(0.2, 0.1), (0.9, 0.2), (0.8, 0.9), (0.5, 1.1), (0.1, 0.8)], 1.0);
        let mut mesh = MeshBuilder::new();
        StitchContours::new(&lower, &upper).execute(&store, &mut mesh);

        // Loop edges are used once, every connecting edge twice.
        let uses = edge_uses(mesh.triangles());
        let loop_edges: Vec<(u32, u32)> = lower
            .points
            .windows(2)
            .chain(upper.points.windows(2))
            .map(|w| (w[0].min(w[1]), w[0].max(w[1])))
            .collect();
        for (edge, count) in &uses {
            if loop_edges.contains(edge) {
                assert_eq!(*count, 1, "loop edge {edge:?}");
            } else {
                assert_eq!(*count, 2, "connecting edge {edge:?}");
            }
        }
        assert_eq!(mesh.len(), 4 + 5);
    }

    #[test]
    fn upper_walk_starts_at_nearest_point() {
        let mut store = ContourStore::new();
        let lower = add_loop(&mut store, &unit_square(), 0.0);
        // Same square, rotated so its third point sits above lower[0].
        let upper = add_loop(&mut store, &[(1.0, 1.0), (0.0, 1.0), (0.0, 0.0), (1.0, 0.0)], 1.0);
        let table = StitchContours::new(&lower, &upper).correspond(&store).unwrap();
        assert_eq!(table.upper_order, vec![2, 3, 4, 1, 2]);
        assert_eq!(table.lower_order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn aligned_squares_stitch_along_diagonal() {
        let mut store = ContourStore::new();
        let lower = add_loop(&mut store, &unit_square(), 0.0);
        let upper = add_loop(&mut store, &unit_square(), 1.0);
        let table = StitchContours::new(&lower, &upper).correspond(&store).unwrap();

        // Vertical pairs cost 1 and side diagonals 2; the path zigzags
        // along the table diagonal: five vertical pairs plus four diagonals.
        assert_eq!(table.score.nrows(), 5);
        assert_eq!(table.score.ncols(), 5);
        assert!((table.score[(0, 0)] - 1.0).abs() < 1e-12);
        assert!((table.score[(4, 4)] - 13.0).abs() < 1e-12);
        assert_eq!(table.moves[(4, 4)], Move::FromLeft);
        assert_eq!(table.moves[(4, 3)], Move::FromUp);
        assert_eq!(table.moves[(1, 0)], Move::FromUp);
    }

    #[test]
    fn strip_faces_outward() {
        let mut store = ContourStore::new();
        let lower = add_loop(&mut store, &unit_square(), 0.0);
        let upper = add_loop(&mut store, &unit_square(), 1.0);
        let mut mesh = MeshBuilder::new();
        StitchContours::new(&lower, &upper).execute(&store, &mut mesh);

        let centre = Point3::new(0.5, 0.5, 0.5);
        for t in mesh.triangles() {
            let [a, b, c] = (*t).map(|id| *store.point(id));
            let normal = (b - a).cross(&(c - a));
            let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);
            assert!(normal.dot(&(centroid - centre)) > 0.0, "inward triangle {t:?}");
        }
    }

    #[test]
    fn degenerate_sequence_emits_nothing() {
        let mut store = ContourStore::new();
        let lower = add_loop(&mut store, &unit_square(), 0.0);
        let single = ContourLine::new(vec![store.add_point(Point3::new(0.5, 0.5, 1.0))]);
        let mut mesh = MeshBuilder::new();
        assert_eq!(StitchContours::new(&lower, &single).execute(&store, &mut mesh), 0);
        assert!(mesh.is_empty());
    }

    #[test]
    fn open_chains_give_m_plus_n_minus_two() {
        let mut store = ContourStore::new();
        let lower: Vec<u32> = (0..4).map(|i| store.add_point(Point3::new(f64::from(i), 0.0, 0.0))).collect();
        let upper: Vec<u32> = (0..3).map(|i| store.add_point(Point3::new(f64::from(i), 0.0, 1.0))).collect();
        let lower = ContourLine::new(lower);
        let upper = ContourLine::new(upper);
        let mut mesh = MeshBuilder::new();
        assert_eq!(StitchContours::new(&lower, &upper).execute(&store, &mut mesh), 4 + 3 - 2);
    }
}
