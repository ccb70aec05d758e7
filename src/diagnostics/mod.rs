//! Per-transceiver reliability monitoring and health reporting

pub mod average;
pub mod checkup;
pub mod transceivers;

pub use average::RollingAverage;
pub use checkup::{DiagnosticReport, DiagnosticStatus, ReliabilityCheckup};
pub use transceivers::TransceiversDiagnostics;
