//! UWB Real-Time Location System
//!
//! Coordinates two-way ranging exchanges between ultra-wideband transceivers
//! and turns the measured distances into 2D position and pose estimates with
//! covariance. Polling is timer driven and round robin, optionally restricted
//! to the responders reachable from the platform's last known position, with
//! per-transceiver reliability diagnostics.

pub mod config;
pub mod core;
pub mod diagnostics;
pub mod scheduling;
pub mod transceiver;
pub mod trilateration;

// Re-export commonly used types
pub use config::{ConfigError, ConfigResult, RtlsConfig, TransceiverConfig};
pub use core::{RangingResult, TransceiverPairIds, TransceiverPairNames};
pub use diagnostics::{DiagnosticReport, DiagnosticStatus, TransceiversDiagnostics};
pub use scheduling::{
    CoordinationScheduler, GeoreferencedScheduler, PollPolicy, SchedulerError, SchedulerResult,
    SimpleScheduler,
};
pub use transceiver::{
    ranging_status, RangingStatus, TransceiverEuid, TransceiverPhy, TransceiverRole,
    TransceiversPairIdsMapping,
};
pub use trilateration::{PoseEstimator, PositionEstimator, RangeArray, RangeVector};
