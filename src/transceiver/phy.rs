//! Physical layer description of a UWB transceiver

use serde::{Deserialize, Serialize};

/// Radio parameters of a transceiver. Two transceivers can only range
/// against each other when their PHY descriptions are equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransceiverPhy {
    /// Centre frequency in Hz
    pub centre_frequency: f64,
    /// Data rate in bit/s
    pub data_rate: f64,
    /// Bandwidth in Hz
    pub bandwidth: f64,
    /// Pulse repetition frequency in MHz
    pub prf: i32,
    /// Minimal measurable range in meters
    pub minimal_range: f64,
    /// Maximal measurable range in meters
    pub maximal_range: f64,
    /// Largest user payload carried by a ranging frame, in bytes
    pub user_payload_maximal_length: i32,
}
