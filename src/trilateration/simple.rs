//! Closed-form circle-circle trilateration
//!
//! Produces a cheap, non-iterative position estimate used as the initial
//! guess of the Gauss-Newton refinements. With more than two anchors the
//! estimate is the average of the pairwise solutions over cyclically
//! adjacent anchors, not a least-squares optimum.

use nalgebra::Vector2;

/// Intersections of the circles centred on `p1` and `p2` with radii `r1`
/// and `r2`.
///
/// When the circles do not intersect (inconsistent ranges, coincident
/// centres) the acos argument is clamped into [-1, 1], which degrades to
/// the nearest feasible geometry instead of failing. The returned pair is
/// ordered so that the first solution has x >= 0 whenever possible; with
/// no third anchor to disambiguate, callers fall back on that ordering.
fn circle_intersections(
    p1: &Vector2<f64>,
    p2: &Vector2<f64>,
    r1: f64,
    r2: f64,
) -> [Vector2<f64>; 2] {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;

    let base = (dx * dx + dy * dy).sqrt();
    let theta = dy.atan2(dx);

    let mut cos_alpha = (base * base + r1 * r1 - r2 * r2) / (2.0 * base * r1);
    if !cos_alpha.is_finite() {
        cos_alpha = 1.0;
    }
    let alpha = cos_alpha.clamp(-1.0, 1.0).acos();

    let mut solutions = [
        Vector2::new(
            p1.x + r1 * (theta + alpha).cos(),
            p1.y + r1 * (theta + alpha).sin(),
        ),
        Vector2::new(
            p1.x + r1 * (theta - alpha).cos(),
            p1.y + r1 * (theta - alpha).sin(),
        ),
    ];

    if solutions[0].x < 0.0 {
        solutions.swap(0, 1);
    }

    solutions
}

/// Solve one anchor pair and disambiguate using the residuals against every
/// other available anchor.
fn locate_pair(
    anchor_positions: &[Vector2<f64>],
    ranges: &[f64],
    available: &[usize],
    i: usize,
    j: usize,
) -> Vector2<f64> {
    let solutions = circle_intersections(
        &anchor_positions[available[i]],
        &anchor_positions[available[j]],
        ranges[available[i]],
        ranges[available[j]],
    );

    let mut errors = [0.0; 2];
    for (k, &anchor_index) in available.iter().enumerate() {
        if k == i || k == j {
            continue;
        }
        for (error, solution) in errors.iter_mut().zip(&solutions) {
            *error +=
                ((anchor_positions[anchor_index] - solution).norm() - ranges[anchor_index]).abs();
        }
    }

    if errors[0] <= errors[1] {
        solutions[0]
    } else {
        solutions[1]
    }
}

/// Analytic position estimate from the subset of anchors listed in
/// `available`. `ranges` is indexed like `anchor_positions`; entries
/// outside `available` are ignored.
///
/// Needs at least two available anchors.
pub fn locate_available(
    anchor_positions: &[Vector2<f64>],
    ranges: &[f64],
    available: &[usize],
) -> Vector2<f64> {
    debug_assert!(available.len() >= 2);
    debug_assert!(anchor_positions.len() == ranges.len());

    if available.len() == 2 {
        return locate_pair(anchor_positions, ranges, available, 0, 1);
    }

    let mut solution = Vector2::zeros();
    for i in 0..available.len() {
        let j = (i + 1) % available.len();
        solution += locate_pair(anchor_positions, ranges, available, i, j);
    }
    solution / available.len() as f64
}

/// Analytic position estimate using every anchor
pub fn locate(anchor_positions: &[Vector2<f64>], ranges: &[f64]) -> Vector2<f64> {
    let available: Vec<usize> = (0..anchor_positions.len()).collect();
    locate_available(anchor_positions, ranges, &available)
}
