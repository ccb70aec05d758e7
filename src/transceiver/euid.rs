//! Extended unique identifier of a transceiver

use serde::{Deserialize, Serialize};

/// Network-wide identifier of a transceiver, made of the personal area
/// network id and the device id inside that network. The derived ordering
/// (pan_id first, then id) lets the EUID key ordered maps.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TransceiverEuid {
    pub pan_id: u16,
    pub id: u16,
}

impl TransceiverEuid {
    pub fn new(pan_id: u16, id: u16) -> Self {
        Self { pan_id, id }
    }
}
