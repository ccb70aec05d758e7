//! Gauss-Newton driver for the range-based estimators
//!
//! Holds the Jacobian and residual buffers, solves the normal equations for
//! one step, and runs the damped-free iteration loop shared by the position
//! and pose estimators.

use nalgebra::{DMatrix, DVector};

/// Gauss-Newton iteration machinery over preallocated Jacobian/residual
/// buffers. The estimate dimension is fixed at construction; the data
/// dimension changes from one estimation cycle to the next as range
/// availability changes.
#[derive(Debug, Clone)]
pub struct GaussNewton {
    estimate_size: usize,
    jacobian: DMatrix<f64>,
    residuals: DVector<f64>,
}

impl GaussNewton {
    pub fn new(estimate_size: usize) -> Self {
        Self {
            estimate_size,
            jacobian: DMatrix::zeros(0, estimate_size),
            residuals: DVector::zeros(0),
        }
    }

    /// Resize the buffers for a new batch of observations
    pub fn set_data_size(&mut self, data_size: usize) {
        self.jacobian = DMatrix::zeros(data_size, self.estimate_size);
        self.residuals = DVector::zeros(data_size);
    }

    pub fn data_size(&self) -> usize {
        self.residuals.len()
    }

    /// Iterate `estimate` to convergence. `linearize` fills the Jacobian
    /// and residual buffers for the current estimate; each step solves the
    /// normal equations and applies the full update. Returns true when the
    /// step norm falls under `epsilon` within the iteration budget, false
    /// on budget exhaustion or on a singular normal matrix. Never panics:
    /// non-convergence is an outcome the caller must check.
    pub fn iterate<F>(
        &mut self,
        estimate: &mut DVector<f64>,
        max_iterations: usize,
        epsilon: f64,
        mut linearize: F,
    ) -> bool
    where
        F: FnMut(&DVector<f64>, &mut DMatrix<f64>, &mut DVector<f64>),
    {
        for _ in 0..max_iterations {
            linearize(estimate, &mut self.jacobian, &mut self.residuals);

            let normal = self.jacobian.transpose() * &self.jacobian;
            let rhs = self.jacobian.transpose() * &self.residuals;
            let step = match normal.cholesky() {
                Some(decomposition) => decomposition.solve(&rhs),
                None => return false,
            };

            *estimate -= &step;
            if step.norm() < epsilon {
                return true;
            }
        }
        false
    }

    /// Covariance of the converged estimate, `(J^T J)^-1` evaluated at the
    /// last linearization point. Meaningless unless the preceding
    /// [`iterate`](Self::iterate) call returned true.
    pub fn covariance(&self) -> Option<DMatrix<f64>> {
        (self.jacobian.transpose() * &self.jacobian).try_inverse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // fit y = a*x + b through three exact points; converges in one step
    #[test]
    fn linear_problem_converges_in_one_step() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [1.0, 3.0, 5.0];

        let mut solver = GaussNewton::new(2);
        solver.set_data_size(xs.len());

        let mut estimate = DVector::from_column_slice(&[0.0, 0.0]);
        let converged = solver.iterate(&mut estimate, 5, 1e-9, |est, jacobian, residuals| {
            for (n, (&x, &y)) in xs.iter().zip(&ys).enumerate() {
                jacobian[(n, 0)] = x;
                jacobian[(n, 1)] = 1.0;
                residuals[n] = est[0] * x + est[1] - y;
            }
        });

        assert!(converged);
        assert_abs_diff_eq!(estimate[0], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(estimate[1], 1.0, epsilon = 1e-9);
        assert!(solver.covariance().is_some());
    }

    #[test]
    fn singular_normal_matrix_reports_failure() {
        let mut solver = GaussNewton::new(2);
        solver.set_data_size(2);

        let mut estimate = DVector::from_column_slice(&[0.0, 0.0]);
        let converged = solver.iterate(&mut estimate, 5, 1e-9, |_, jacobian, residuals| {
            // both columns identical: rank deficient
            for n in 0..2 {
                jacobian[(n, 0)] = 1.0;
                jacobian[(n, 1)] = 1.0;
                residuals[n] = 1.0;
            }
        });

        assert!(!converged);
    }
}
