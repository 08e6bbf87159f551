use super::{Point2, TOLERANCE};

/// Parametric 2D segment-segment intersection.
///
/// Given segments `a0 -> a1` and `b0 -> b1`, returns `(t, u)` such that
/// `a0 + t * (a1 - a0) == b0 + u * (b1 - b0)`, or `None` if parallel.
/// The parameters are not clamped.
#[must_use]
pub fn segment_params_2d(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> Option<(f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;

    let cross = da.x * db.y - da.y * db.x;
    if cross.abs() < TOLERANCE {
        return None;
    }

    let dx = b0.x - a0.x;
    let dy = b0.y - a0.y;
    let t = (dx * db.y - dy * db.x) / cross;
    let u = (dx * da.y - dy * da.x) / cross;
    Some((t, u))
}

/// Returns `true` if segment `a0 -> a1` crosses edge `b0 -> b1`.
///
/// The edge is treated as half-open (`b1` excluded) so that a segment passing
/// exactly through a shared vertex of two consecutive edges is counted once.
/// Parallel segments never cross.
#[must_use]
pub fn segments_cross_2d(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    match segment_params_2d(a0, a1, b0, b1) {
        Some((t, u)) => (0.0..=1.0).contains(&t) && (0.0..1.0).contains(&u),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn perpendicular_segments_cross() {
        assert!(segments_cross_2d(&p(0.0, 0.0), &p(2.0, 2.0), &p(0.0, 2.0), &p(2.0, 0.0)));
    }

    #[test]
    fn disjoint_segments_do_not_cross() {
        assert!(!segments_cross_2d(&p(0.0, 0.0), &p(1.0, 0.0), &p(2.0, -1.0), &p(2.0, 1.0)));
    }

    #[test]
    fn parallel_segments_do_not_cross() {
        assert!(!segments_cross_2d(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0), &p(1.0, 1.0)));
        assert!(segment_params_2d(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0), &p(1.0, 1.0)).is_none());
    }

    #[test]
    fn shared_vertex_is_counted_once() {
        // Ray through (1, 0), the joint of edges (0,0)->(1,0) and (1,0)->(1,1).
        let a0 = p(2.0, -1.0);
        let a1 = p(0.0, 1.0);
        let first = segments_cross_2d(&a0, &a1, &p(0.0, 0.0), &p(1.0, 0.0));
        let second = segments_cross_2d(&a0, &a1, &p(1.0, 0.0), &p(1.0, 1.0));
        assert!(!first);
        assert!(second);
    }

    #[test]
    fn params_locate_intersection() {
        let (t, u) = segment_params_2d(&p(0.0, 0.0), &p(4.0, 0.0), &p(1.0, -1.0), &p(1.0, 1.0)).unwrap_or_default();
        assert!((t - 0.25).abs() < TOLERANCE);
        assert!((u - 0.5).abs() < TOLERANCE);
    }
}
