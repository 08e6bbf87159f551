use super::Point3;

/// Brute-force nearest point search by squared Euclidean distance.
///
/// Returns the position within `candidates` of the closest point together with
/// its squared distance, or `None` if `candidates` is empty. On ties the first
/// candidate wins.
#[must_use]
pub fn nearest_point<'a>(
    target: &Point3,
    candidates: impl IntoIterator<Item = &'a Point3>,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in candidates.into_iter().enumerate() {
        let d = (target - p).norm_squared();
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best
}
