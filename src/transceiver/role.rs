//! Transceiver role within a ranging exchange

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role a transceiver plays in a ranging exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransceiverRole {
    /// Originates ranging exchanges, mounted on the mobile platform
    Initiator,
    /// Answers ranging exchanges, fixed or mobile anchor
    Responder,
    /// Passively listens to exchanges without taking part
    Listener,
    /// Not configured for any role
    None,
}

impl fmt::Display for TransceiverRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransceiverRole::Initiator => "initiator",
            TransceiverRole::Responder => "responder",
            TransceiverRole::Listener => "listener",
            TransceiverRole::None => "none",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TransceiverRole {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initiator" => Ok(TransceiverRole::Initiator),
            "responder" => Ok(TransceiverRole::Responder),
            "listener" => Ok(TransceiverRole::Listener),
            "none" => Ok(TransceiverRole::None),
            _ => Err(UnknownRoleError {
                role: s.to_string(),
            }),
        }
    }
}

/// Error returned when parsing an unrecognized role name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRoleError {
    pub role: String,
}

impl fmt::Display for UnknownRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown transceiver role: {}", self.role)
    }
}

impl std::error::Error for UnknownRoleError {}
