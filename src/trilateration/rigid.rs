//! 2D rigid transform fit between two point sets

use nalgebra::{Matrix2, Vector2, SVD};

/// Find the rotation and translation minimizing the squared distance
/// between `rotation * model + translation` and `observed`, by SVD of the
/// cross-covariance (Kabsch). Reflections are folded back into proper
/// rotations.
///
/// Both slices must have the same length, at least 2.
pub fn find_rigid_transform(
    model: &[Vector2<f64>],
    observed: &[Vector2<f64>],
) -> (Matrix2<f64>, Vector2<f64>) {
    debug_assert!(model.len() == observed.len());
    debug_assert!(model.len() >= 2);

    let count = model.len() as f64;
    let model_centroid: Vector2<f64> = model.iter().sum::<Vector2<f64>>() / count;
    let observed_centroid: Vector2<f64> = observed.iter().sum::<Vector2<f64>>() / count;

    let mut cross_covariance = Matrix2::zeros();
    for (m, o) in model.iter().zip(observed) {
        cross_covariance += (m - model_centroid) * (o - observed_centroid).transpose();
    }

    let svd = SVD::new(cross_covariance, true, true);
    let u = svd.u.unwrap_or_else(Matrix2::identity);
    let v_t = svd.v_t.unwrap_or_else(Matrix2::identity);

    let mut rotation = v_t.transpose() * u.transpose();
    if rotation.determinant() < 0.0 {
        let mut v = v_t.transpose();
        let flipped = -v.column(1).clone_owned();
        v.set_column(1, &flipped);
        rotation = v * u.transpose();
    }

    let translation = observed_centroid - rotation * model_centroid;
    (rotation, translation)
}

/// Extract the yaw angle of a 2D rotation matrix
pub fn rotation_to_angle(rotation: &Matrix2<f64>) -> f64 {
    rotation[(1, 0)].atan2(rotation[(0, 0)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn transform(points: &[Vector2<f64>], angle: f64, t: Vector2<f64>) -> Vec<Vector2<f64>> {
        let rotation = Matrix2::new(angle.cos(), -angle.sin(), angle.sin(), angle.cos());
        points.iter().map(|p| rotation * p + t).collect()
    }

    #[test]
    fn recovers_known_rotation_and_translation() {
        let model = vec![
            Vector2::new(0.0, -0.3),
            Vector2::new(0.0, 0.3),
            Vector2::new(0.44, 0.0),
        ];
        let angle = 0.7;
        let t = Vector2::new(3.0, -2.0);
        let observed = transform(&model, angle, t);

        let (rotation, translation) = find_rigid_transform(&model, &observed);
        assert_abs_diff_eq!(rotation_to_angle(&rotation), angle, epsilon = 1e-9);
        assert_abs_diff_eq!(translation.x, t.x, epsilon = 1e-9);
        assert_abs_diff_eq!(translation.y, t.y, epsilon = 1e-9);
    }

    #[test]
    fn two_points_are_enough_for_a_2d_fit() {
        let model = vec![Vector2::new(-0.5, 0.0), Vector2::new(0.5, 0.0)];
        let angle = -2.1;
        let t = Vector2::new(-1.0, 4.0);
        let observed = transform(&model, angle, t);

        let (rotation, translation) = find_rigid_transform(&model, &observed);
        assert_abs_diff_eq!(rotation_to_angle(&rotation), angle, epsilon = 1e-9);
        assert_abs_diff_eq!(translation.x, t.x, epsilon = 1e-9);
        assert_abs_diff_eq!(translation.y, t.y, epsilon = 1e-9);
    }
}
