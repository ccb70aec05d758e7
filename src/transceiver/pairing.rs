//! Bidirectional mapping between transceiver names and poll indexes

use std::fmt;

use crate::core::{TransceiverPairIds, TransceiverPairNames};

/// Error type for name/index lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// The given name is not registered for the role
    UnknownName { name: String },
    /// The given index is outside the registered population
    IndexOutOfRange { index: usize, population: usize },
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingError::UnknownName { name } => {
                write!(f, "unknown transceiver name: {}", name)
            }
            MappingError::IndexOutOfRange { index, population } => {
                write!(
                    f,
                    "transceiver index {} out of range (population {})",
                    index, population
                )
            }
        }
    }
}

impl std::error::Error for MappingError {}

/// Result type for mapping operations
pub type MappingResult<T> = Result<T, MappingError>;

/// Immutable name-to-index mapping established once at configuration time.
/// Initiators and responders are indexed separately.
#[derive(Debug, Clone, Default)]
pub struct TransceiversPairIdsMapping {
    initiators_names: Vec<String>,
    responders_names: Vec<String>,
}

impl TransceiversPairIdsMapping {
    pub fn new(initiators_names: Vec<String>, responders_names: Vec<String>) -> Self {
        Self {
            initiators_names,
            responders_names,
        }
    }

    /// Resolve a pair of transceiver names into poll indexes
    pub fn pair_ids(&self, names: &TransceiverPairNames) -> MappingResult<TransceiverPairIds> {
        Ok(TransceiverPairIds {
            initiator: Self::find_index(&self.initiators_names, &names.initiator)?,
            responder: Self::find_index(&self.responders_names, &names.responder)?,
        })
    }

    /// Resolve a pair of poll indexes into transceiver names
    pub fn pair_names(&self, ids: &TransceiverPairIds) -> MappingResult<TransceiverPairNames> {
        Ok(TransceiverPairNames {
            initiator: Self::find_name(&self.initiators_names, ids.initiator)?,
            responder: Self::find_name(&self.responders_names, ids.responder)?,
        })
    }

    pub fn initiators_names(&self) -> &[String] {
        &self.initiators_names
    }

    pub fn responders_names(&self) -> &[String] {
        &self.responders_names
    }

    fn find_index(names: &[String], name: &str) -> MappingResult<usize> {
        names
            .iter()
            .position(|candidate| candidate == name)
            .ok_or_else(|| MappingError::UnknownName {
                name: name.to_string(),
            })
    }

    fn find_name(names: &[String], index: usize) -> MappingResult<String> {
        names
            .get(index)
            .cloned()
            .ok_or(MappingError::IndexOutOfRange {
                index,
                population: names.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> TransceiversPairIdsMapping {
        TransceiversPairIdsMapping::new(
            vec!["initiator0".to_string(), "initiator1".to_string()],
            vec![
                "responder0".to_string(),
                "responder1".to_string(),
                "responder2".to_string(),
            ],
        )
    }

    #[test]
    fn names_and_ids_round_trip() {
        let mapping = mapping();
        let names = TransceiverPairNames {
            initiator: "initiator1".to_string(),
            responder: "responder2".to_string(),
        };

        let ids = mapping.pair_ids(&names).unwrap();
        assert_eq!(
            ids,
            TransceiverPairIds {
                initiator: 1,
                responder: 2
            }
        );
        assert_eq!(mapping.pair_names(&ids).unwrap(), names);
    }

    #[test]
    fn unknown_name_fails() {
        let names = TransceiverPairNames {
            initiator: "initiator7".to_string(),
            responder: "responder0".to_string(),
        };
        assert_eq!(
            mapping().pair_ids(&names),
            Err(MappingError::UnknownName {
                name: "initiator7".to_string()
            })
        );
    }

    #[test]
    fn out_of_range_index_fails() {
        let ids = TransceiverPairIds {
            initiator: 0,
            responder: 3,
        };
        assert_eq!(
            mapping().pair_names(&ids),
            Err(MappingError::IndexOutOfRange {
                index: 3,
                population: 3
            })
        );
    }
}
