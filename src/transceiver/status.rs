//! Plausibility and signal quality classification of ranging results

use crate::core::RangingResult;

/// Classification of a raw ranging result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangingStatus {
    /// Measurement is plausible and usable for localization
    Available,
    /// A measurement was produced but is implausible or too weak
    Unavailable,
    /// The exchange failed, no measurement was produced
    Failed,
}

/// Classify a ranging result against range plausibility bounds and a
/// received-power rejection threshold.
///
/// A large gap between total received power and first path power is the
/// signature of a reflected path, so such measurements are rejected.
pub fn ranging_status(
    result: &RangingResult,
    minimal_range: f64,
    maximal_range: f64,
    rx_power_rejection_threshold: u8,
) -> RangingStatus {
    if result.is_empty() {
        return RangingStatus::Failed;
    }

    if result.range < minimal_range || result.range > maximal_range {
        return RangingStatus::Unavailable;
    }

    let power_gap = result
        .total_rx_power_level
        .saturating_sub(result.first_path_rx_power_level);
    if power_gap > rx_power_rejection_threshold {
        return RangingStatus::Unavailable;
    }

    RangingStatus::Available
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(result: &RangingResult) -> RangingStatus {
        ranging_status(result, 0.5, 20.0, 20)
    }

    #[test]
    fn empty_result_is_failed() {
        assert_eq!(status(&RangingResult::default()), RangingStatus::Failed);
    }

    #[test]
    fn range_below_minimal_is_unavailable() {
        let result = RangingResult::new(0.2, 8, 10);
        assert_eq!(status(&result), RangingStatus::Unavailable);
    }

    #[test]
    fn range_above_maximal_is_unavailable() {
        let result = RangingResult::new(22.0, 8, 10);
        assert_eq!(status(&result), RangingStatus::Unavailable);
    }

    #[test]
    fn weak_first_path_is_unavailable() {
        let result = RangingResult::new(10.0, 5, 30);
        assert_eq!(status(&result), RangingStatus::Unavailable);
    }

    #[test]
    fn plausible_result_is_available() {
        let result = RangingResult::new(10.0, 28, 30);
        assert_eq!(status(&result), RangingStatus::Available);
    }
}
