//! Iterative 2D position estimation from a sparse range set

use nalgebra::{DMatrix, DVector, Vector2, Vector3};

use crate::trilateration::least_squares::GaussNewton;
use crate::trilateration::simple;
use crate::trilateration::RangeVector;

const MINIMAL_NUMBER_OF_RANGES: usize = 2;

/// Estimates the 2D position of a single tag from ranges to anchors at
/// known positions. Anchor geometry is fixed at construction; only the
/// horizontal projection of the anchor positions participates.
///
/// Usage per estimation cycle: [`init`](Self::init) with the fresh range
/// set, then [`estimate`](Self::estimate); the accessors are only
/// meaningful after a converged estimate.
#[derive(Debug, Clone)]
pub struct PositionEstimator {
    anchor_positions: Vec<Vector2<f64>>,
    ranges: Vec<f64>,
    available: Vec<usize>,
    solver: GaussNewton,
    estimate: DVector<f64>,
    covariance: DMatrix<f64>,
}

impl PositionEstimator {
    pub fn new(anchor_positions: &[Vector3<f64>]) -> Self {
        Self {
            anchor_positions: anchor_positions.iter().map(|p| p.xy()).collect(),
            ranges: vec![0.0; anchor_positions.len()],
            available: Vec::with_capacity(anchor_positions.len()),
            solver: GaussNewton::new(2),
            estimate: DVector::zeros(2),
            covariance: DMatrix::zeros(2, 2),
        }
    }

    /// Load a fresh range set and check that the geometry is sufficient:
    /// either every anchor answered, or at least three did. Returns false
    /// when the estimation cycle must be skipped.
    pub fn init(&mut self, ranges: &RangeVector) -> bool {
        if self.ranges.is_empty() || ranges.len() != self.ranges.len() {
            return false;
        }

        self.available.clear();
        for (n, range) in ranges.iter().enumerate() {
            if let Some(value) = range {
                self.available.push(n);
                self.ranges[n] = *value;
            }
        }

        if self.available.len() < MINIMAL_NUMBER_OF_RANGES {
            return false;
        }

        if self.available.len() == self.ranges.len()
            || self.available.len() > MINIMAL_NUMBER_OF_RANGES
        {
            self.solver.set_data_size(self.available.len());
            true
        } else {
            false
        }
    }

    /// Refine the analytic guess by Gauss-Newton until the step norm falls
    /// under `epsilon`. On failure the internal estimate is not a valid
    /// answer and must not be read.
    pub fn estimate(&mut self, max_iterations: usize, epsilon: f64) -> bool {
        let guess = simple::locate_available(&self.anchor_positions, &self.ranges, &self.available);
        self.estimate[0] = guess.x;
        self.estimate[1] = guess.y;

        let anchor_positions = &self.anchor_positions;
        let ranges = &self.ranges;
        let available = &self.available;

        let converged = self.solver.iterate(
            &mut self.estimate,
            max_iterations,
            epsilon,
            |estimate, jacobian, residuals| {
                for (n, &range_index) in available.iter().enumerate() {
                    let dx = estimate[0] - anchor_positions[range_index].x;
                    let dy = estimate[1] - anchor_positions[range_index].y;
                    let predicted = (dx * dx + dy * dy).sqrt().max(1e-12);

                    jacobian[(n, 0)] = dx / predicted;
                    jacobian[(n, 1)] = dy / predicted;
                    residuals[n] = predicted - ranges[range_index];
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

    /// Last converged position estimate
    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.estimate[0], self.estimate[1])
    }

    /// Covariance of the last converged estimate
    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.covariance
    }
}
