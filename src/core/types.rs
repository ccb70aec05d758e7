//! Core data types for the ranging coordination system

/// Identifies one directed ranging exchange between an initiator and a
/// responder. Both indexes are 0-based positions in their role-homogeneous
/// lists; the two index spaces are never shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransceiverPairIds {
    pub initiator: usize,
    pub responder: usize,
}

/// Names of the two transceivers involved in a ranging exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransceiverPairNames {
    pub initiator: String,
    pub responder: String,
}

/// Outcome of one two-way ranging exchange as reported by the radio driver.
///
/// A default-constructed result (zero range, zero power levels) denotes a
/// failed exchange where the responder never answered.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RangingResult {
    /// Measured distance in meters
    pub range: f64,
    /// Received power of the first signal path, in driver units
    pub first_path_rx_power_level: u8,
    /// Total received power, in driver units
    pub total_rx_power_level: u8,
}

impl RangingResult {
    pub fn new(range: f64, first_path_rx_power_level: u8, total_rx_power_level: u8) -> Self {
        Self {
            range,
            first_path_rx_power_level,
            total_rx_power_level,
        }
    }

    /// True when the exchange produced no measurement at all
    pub fn is_empty(&self) -> bool {
        self.range == 0.0
            && self.first_path_rx_power_level == 0
            && self.total_rx_power_level == 0
    }
}
