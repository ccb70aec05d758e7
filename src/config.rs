//! Network configuration loading and validation

use std::fmt;
use std::fs;
use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::transceiver::{TransceiverEuid, TransceiverRole};

/// Configuration loading or validation failure
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Parameter value outside its valid domain
    InvalidParameter { parameter: String, reason: String },
    /// Two transceivers share the same name
    DuplicateName { name: String },
    /// Configuration file could not be read or written
    Io { message: String },
    /// Configuration content could not be parsed or serialized
    Serialization { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidParameter { parameter, reason } => {
                write!(f, "invalid parameter '{}': {}", parameter, reason)
            }
            ConfigError::DuplicateName { name } => {
                write!(f, "duplicate transceiver name '{}'", name)
            }
            ConfigError::Io { message } => write!(f, "configuration i/o error: {}", message),
            ConfigError::Serialization { message } => {
                write!(f, "configuration format error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// One transceiver of the ranging network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransceiverConfig {
    /// Unique name, used as the diagnostics key
    pub name: String,
    /// Role in the ranging exchanges
    pub role: TransceiverRole,
    /// Extended unique identifier on the air interface
    pub euid: TransceiverEuid,
    /// Mounting position in meters. Body frame for initiators, estimation
    /// frame for responders.
    pub position: [f64; 3],
}

impl TransceiverConfig {
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.position[0], self.position[1], self.position[2])
    }
}

/// Full ranging network configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RtlsConfig {
    /// Poll emissions per second (Hz)
    pub poll_rate: f64,
    /// Largest distance at which a ranging exchange can succeed (meters)
    pub maximal_ranging_distance: f64,
    /// Measured ranges below this are rejected as implausible (meters)
    pub minimal_range: f64,
    /// Measured ranges above this are rejected as implausible (meters)
    pub maximal_range: f64,
    /// Largest tolerated gap between total and first-path received power,
    /// in driver units. Larger gaps indicate multipath reception.
    pub rx_power_rejection_threshold: u8,
    /// All transceivers taking part in the network
    pub transceivers: Vec<TransceiverConfig>,
}

impl Default for RtlsConfig {
    fn default() -> Self {
        Self {
            poll_rate: 20.0,
            maximal_ranging_distance: 20.0,
            minimal_range: 0.5,
            maximal_range: 20.0,
            rx_power_rejection_threshold: 20,
            transceivers: Vec::new(),
        }
    }
}

impl RtlsConfig {
    /// Load from a JSON file and validate
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            message: format!("{}: {}", path.as_ref().display(), e),
        })?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::Serialization {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Write to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialization {
                message: e.to_string(),
            })?;
        fs::write(&path, content).map_err(|e| ConfigError::Io {
            message: format!("{}: {}", path.as_ref().display(), e),
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.poll_rate.is_finite() && self.poll_rate > 0.0) {
            return Err(ConfigError::InvalidParameter {
                parameter: "poll_rate".to_string(),
                reason: format!("{} Hz is not a positive rate", self.poll_rate),
            });
        }
        if self.maximal_ranging_distance <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "maximal_ranging_distance".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.minimal_range < 0.0 || self.minimal_range >= self.maximal_range {
            return Err(ConfigError::InvalidParameter {
                parameter: "minimal_range".to_string(),
                reason: format!(
                    "range window [{}, {}] is empty or negative",
                    self.minimal_range, self.maximal_range
                ),
            });
        }

        let mut names: Vec<&str> = self
            .transceivers
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        names.sort_unstable();
        for window in names.windows(2) {
            if window[0] == window[1] {
                return Err(ConfigError::DuplicateName {
                    name: window[0].to_string(),
                });
            }
        }

        Ok(())
    }

    fn role_filtered<T>(
        &self,
        role: TransceiverRole,
        select: impl Fn(&TransceiverConfig) -> T,
    ) -> Vec<T> {
        self.transceivers
            .iter()
            .filter(|t| t.role == role)
            .map(select)
            .collect()
    }

    pub fn initiators_names(&self) -> Vec<String> {
        self.role_filtered(TransceiverRole::Initiator, |t| t.name.clone())
    }

    pub fn responders_names(&self) -> Vec<String> {
        self.role_filtered(TransceiverRole::Responder, |t| t.name.clone())
    }

    pub fn initiator_positions(&self) -> Vec<Vector3<f64>> {
        self.role_filtered(TransceiverRole::Initiator, |t| t.position())
    }

    pub fn responder_positions(&self) -> Vec<Vector3<f64>> {
        self.role_filtered(TransceiverRole::Responder, |t| t.position())
    }
}
