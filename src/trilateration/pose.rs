//! Iterative 2D pose estimation between two tag constellations
//!
//! Estimates the planar pose (x, y, yaw) of a rigid body carrying several
//! target tags, observed from a body carrying several reference tags,
//! using the matrix of inter-tag ranges.

use nalgebra::{DMatrix, DVector, Vector2, Vector3};

use crate::trilateration::least_squares::GaussNewton;
use crate::trilateration::rigid::{find_rigid_transform, rotation_to_angle};
use crate::trilateration::simple;
use crate::trilateration::RangeArray;

const MINIMAL_NUMBER_OF_RANGES: usize = 2;

/// Estimates the pose of the target constellation expressed in the
/// reference constellation frame. Tag layouts are fixed at construction,
/// in their respective body frames; only horizontal projections
/// participate.
///
/// Usage per estimation cycle: [`init`](Self::init) with the fresh range
/// array, then [`estimate`](Self::estimate); the accessors are only
/// meaningful after a converged estimate.
#[derive(Debug, Clone)]
pub struct PoseEstimator {
    target_tag_positions: Vec<Vector2<f64>>,
    reference_tag_positions: Vec<Vector2<f64>>,
    ranges: Vec<Vec<f64>>,
    available: Vec<Vec<usize>>,
    solver: GaussNewton,
    estimate: DVector<f64>,
    covariance: DMatrix<f64>,
}

impl PoseEstimator {
    pub fn new(
        target_tag_positions: &[Vector3<f64>],
        reference_tag_positions: &[Vector3<f64>],
    ) -> Self {
        Self {
            target_tag_positions: target_tag_positions.iter().map(|p| p.xy()).collect(),
            reference_tag_positions: reference_tag_positions.iter().map(|p| p.xy()).collect(),
            ranges: vec![vec![0.0; reference_tag_positions.len()]; target_tag_positions.len()],
            available: vec![Vec::with_capacity(reference_tag_positions.len()); target_tag_positions.len()],
            solver: GaussNewton::new(3),
            estimate: DVector::zeros(3),
            covariance: DMatrix::zeros(3, 3),
        }
    }

    /// Load a fresh range array and check that every target tag can be
    /// located on its own: each row needs either every reference tag or at
    /// least three of them. Returns false when the estimation cycle must
    /// be skipped.
    pub fn init(&mut self, ranges: &RangeArray) -> bool {
        if ranges.len() != self.target_tag_positions.len() {
            return false;
        }

        let mut data_size = 0;
        for (i, row) in ranges.iter().enumerate() {
            if row.len() != self.reference_tag_positions.len() {
                return false;
            }

            self.available[i].clear();
            for (j, range) in row.iter().enumerate() {
                if let Some(value) = range {
                    self.available[i].push(j);
                    self.ranges[i][j] = *value;
                }
            }

            if self.available[i].len() < MINIMAL_NUMBER_OF_RANGES {
                return false;
            }
            if self.available[i].len() != self.reference_tag_positions.len()
                && self.available[i].len() <= MINIMAL_NUMBER_OF_RANGES
            {
                return false;
            }

            data_size += self.available[i].len();
        }

        self.solver.set_data_size(data_size);
        true
    }

    /// Refine the analytic guess by Gauss-Newton until the step norm falls
    /// under `epsilon`. The guess locates each target tag independently and
    /// fits a rigid transform through the located points.
    pub fn estimate(&mut self, max_iterations: usize, epsilon: f64) -> bool {
        let located: Vec<Vector2<f64>> = (0..self.target_tag_positions.len())
            .map(|i| {
                simple::locate_available(
                    &self.reference_tag_positions,
                    &self.ranges[i],
                    &self.available[i],
                )
            })
            .collect();

        let (rotation, translation) = find_rigid_transform(&self.target_tag_positions, &located);
        self.estimate[0] = translation.x;
        self.estimate[1] = translation.y;
        self.estimate[2] = rotation_to_angle(&rotation);

        let target_tag_positions = &self.target_tag_positions;
        let reference_tag_positions = &self.reference_tag_positions;
        let ranges = &self.ranges;
        let available = &self.available;

        let converged = self.solver.iterate(
            &mut self.estimate,
            max_iterations,
            epsilon,
            |estimate, jacobian, residuals| {
                let (sin_yaw, cos_yaw) = estimate[2].sin_cos();

                let mut n = 0;
                for (i, target) in target_tag_positions.iter().enumerate() {
                    for &j in &available[i] {
                        let reference = &reference_tag_positions[j];
                        let alpha = estimate[0] + target.x * cos_yaw - target.y * sin_yaw
                            - reference.x;
                        let gamma = estimate[1] + target.x * sin_yaw + target.y * cos_yaw
                            - reference.y;
                        let predicted = (alpha * alpha + gamma * gamma).sqrt().max(1e-12);

                        jacobian[(n, 0)] = alpha / predicted;
                        jacobian[(n, 1)] = gamma / predicted;
                        jacobian[(n, 2)] = (alpha * (-target.x * sin_yaw - target.y * cos_yaw)
                            + gamma * (target.x * cos_yaw - target.y * sin_yaw))
                            / predicted;
                        residuals[n] = predicted - ranges[i][j];
                        n += 1;
                    }
                }
            },
        );

        if converged {
            if let Some(covariance) = self.solver.covariance() {
                self.covariance = covariance;
                return true;
            }
        }
        false
    }

    /// Translation part of the last converged pose estimate
    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.estimate[0], self.estimate[1])
    }

    /// Yaw part of the last converged pose estimate, in radians
    pub fn orientation(&self) -> f64 {
        self.estimate[2]
    }

    /// Covariance of the last converged (x, y, yaw) estimate
    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.covariance
    }
}
