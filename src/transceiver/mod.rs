//! Transceiver descriptions and ranging collaborator contracts

pub mod euid;
pub mod noise;
pub mod pairing;
pub mod phy;
pub mod role;
pub mod status;

pub use euid::TransceiverEuid;
pub use noise::{RangeNoise, RangeRandomNoise};
pub use pairing::{MappingError, MappingResult, TransceiversPairIdsMapping};
pub use phy::TransceiverPhy;
pub use role::TransceiverRole;
pub use status::{ranging_status, RangingStatus};
