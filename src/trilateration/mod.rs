//! 2D trilateration: analytic solvers and iterative refinement

pub mod least_squares;
pub mod pose;
pub mod position;
pub mod rigid;
pub mod simple;

pub use least_squares::GaussNewton;
pub use pose::PoseEstimator;
pub use position::PositionEstimator;
pub use simple::{locate, locate_available};

/// Sparse range set for position estimation: one optional range per anchor
pub type RangeVector = Vec<Option<f64>>;

/// Sparse range set for pose estimation: target tags x reference tags
pub type RangeArray = Vec<RangeVector>;
