//! Fixed parameters shared by the coordination and diagnostics layers

use std::time::Duration;

/// Rolling reliability average below this value classifies a transceiver
/// as unreliable
pub const LOW_RELIABILITY_THRESHOLD: f64 = 0.3;

/// Rolling reliability average above this value classifies a transceiver
/// as reliable
pub const HIGH_RELIABILITY_THRESHOLD: f64 = 0.8;

/// Reliability sample recorded for a successful ranging exchange
pub const SUCCESSFUL_RANGING_RELIABILITY: f64 = 1.0;

/// Reliability sample recorded for a failed ranging exchange. A single
/// failure must not crater the rolling average, hence 1/3 instead of 0.
pub const FAILED_RANGING_RELIABILITY: f64 = 1.0 / 3.0;

/// Smallest usable reliability window, in samples
pub const MINIMAL_RELIABILITY_WINDOW: usize = 4;

/// Margin subtracted from the polling period to obtain the ranging timeout,
/// so two requests are never outstanding at the same time
pub const POLL_TIMEOUT_GUARD: Duration = Duration::from_millis(1);

/// A robot position older than this is ignored when selecting reachable
/// responders
pub const ROBOT_POSITION_MAX_AGE: Duration = Duration::from_secs(1);
