//! Barycentric placement of category means inside the chart triangle.
//! Useful sits at the top, Usable bottom-left, Used bottom-right.

use crate::scoring::CategoryMeans;

const HEIGHT: f64 = 0.866_025_403_784_438_6; // sqrt(3) / 2

pub const TOP: (f64, f64) = (0.5, HEIGHT);
pub const LEFT: (f64, f64) = (0.0, 0.0);
pub const RIGHT: (f64, f64) = (1.0, 0.0);

/// Equal-split point; every perfectly balanced solution lands here
pub const CENTROID: (f64, f64) = (0.5, HEIGHT / 3.0);

/// Largest marker radius, in chart units
pub const MAX_RADIUS: f64 = 0.06;
const MIN_RADIUS: f64 = 0.008;

/// Chart position of a solution, or `None` when all its means are zero
pub fn position(means: &CategoryMeans) -> Option<(f64, f64)> {
    let total = means.total();
    if total <= 0.0 {
        return None;
    }

    let (a, b, c) = (means.useful / total, means.usable / total, means.used / total);
    Some((
        a * TOP.0 + b * LEFT.0 + c * RIGHT.0,
        a * TOP.1 + b * LEFT.1 + c * RIGHT.1,
    ))
}

/// Marker radius proportional to size, the largest solution getting `MAX_RADIUS`
pub fn marker_radius(size: f64, max_size: f64) -> f64 {
    if max_size <= 0.0 || !size.is_finite() {
        return MIN_RADIUS;
    }
    (MAX_RADIUS * size / max_size).clamp(MIN_RADIUS, MAX_RADIUS)
}

/// Evenly spaced points between two ends, for dotted guide lines
pub fn dotted(from: (f64, f64), to: (f64, f64), dots: usize) -> Vec<(f64, f64)> {
    if dots < 2 {
        return vec![from];
    }
    (0..dots)
        .map(|i| {
            let t = i as f64 / (dots - 1) as f64;
            (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t)
        })
        .collect()
}
