use super::intersect_2d::segments_cross_2d;
use super::{Point2, Point3};

/// Returns twice the signed area of a polygon in the XY plane, with the sign
/// convention of the trapezoid form of the shoelace formula.
///
/// Positive for clockwise, negative for counter-clockwise. The polygon may be
/// given with or without its first point repeated at the end.
#[must_use]
pub fn twice_signed_area(points: &[Point3]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        sum += (b.x - a.x) * (b.y + a.y);
    }
    sum
}

/// Returns `true` if the polygon winds clockwise when viewed from +z.
#[must_use]
pub fn is_clockwise(points: &[Point3]) -> bool {
    twice_signed_area(points) > 0.0
}

/// Returns the centroid of a triangle projected to the XY plane.
#[must_use]
pub fn triangle_centroid_2d(a: &Point3, b: &Point3, c: &Point3) -> Point2 {
    Point2::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
}

/// Ray-casting point-in-polygon test in the XY plane.
///
/// A segment is cast from a point strictly outside the ring's bounding box to
/// `point`, and the ring edges it crosses are counted; an odd count means
/// inside. A `point` equal to a ring vertex is treated as inside. The ring may
/// be given with or without its closing point.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn point_in_ring(point: &Point2, ring: &[Point3]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in ring {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    // Irrational-ish slope keeps the ray off axis-aligned vertex rows.
    let margin = 1.0 + (max_x - min_x) + (max_y - min_y);
    let origin = Point2::new(min_x - margin, min_y - margin * 0.618_033_988_7);

    let mut crossings = 0usize;
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        if a.x == b.x && a.y == b.y {
            continue;
        }
        if (point.x == a.x && point.y == a.y) || (point.x == b.x && point.y == b.y) {
            return true;
        }
        if segments_cross_2d(&origin, point, &Point2::new(a.x, a.y), &Point2::new(b.x, b.y)) {
            crossings += 1;
        }
    }

    crossings % 2 == 1
}
