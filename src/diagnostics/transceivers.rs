//! Reliability monitoring banks for initiators and responders

use crate::core::{
    RangingResult, FAILED_RANGING_RELIABILITY, HIGH_RELIABILITY_THRESHOLD,
    LOW_RELIABILITY_THRESHOLD, MINIMAL_RELIABILITY_WINDOW, SUCCESSFUL_RANGING_RELIABILITY,
};
use crate::diagnostics::{DiagnosticReport, ReliabilityCheckup, RollingAverage};

#[derive(Debug)]
struct ReliabilityMonitor {
    average: RollingAverage,
    checkup: ReliabilityCheckup,
}

impl ReliabilityMonitor {
    fn new(name: &str, window_size: usize) -> Self {
        Self {
            average: RollingAverage::new(window_size),
            checkup: ReliabilityCheckup::new(
                name,
                LOW_RELIABILITY_THRESHOLD,
                HIGH_RELIABILITY_THRESHOLD,
            ),
        }
    }

    fn update(&mut self, reliability: f64) {
        self.average.update(reliability);
        self.checkup.evaluate(self.average.average());
    }
}

/// One reliability monitor per transceiver, one bank per role. Feedback for
/// a ranging exchange updates the initiator and the responder monitors
/// together with the same sample.
#[derive(Debug)]
pub struct TransceiversDiagnostics {
    initiators: Vec<ReliabilityMonitor>,
    responders: Vec<ReliabilityMonitor>,
}

impl TransceiversDiagnostics {
    /// The window covers roughly two full polling rounds of the population,
    /// so one round of misses degrades but does not saturate the average.
    pub fn new(poll_rate: f64, initiators_names: &[String], responders_names: &[String]) -> Self {
        Self {
            initiators: Self::monitors(poll_rate, initiators_names),
            responders: Self::monitors(poll_rate, responders_names),
        }
    }

    fn monitors(poll_rate: f64, names: &[String]) -> Vec<ReliabilityMonitor> {
        let window_size =
            ((2.0 * poll_rate) as usize / names.len().max(1)).max(MINIMAL_RELIABILITY_WINDOW);
        names
            .iter()
            .map(|name| ReliabilityMonitor::new(name, window_size))
            .collect()
    }

    /// Record the outcome of one ranging exchange. A non-empty result
    /// counts as a success for both transceivers of the pair.
    pub fn update(
        &mut self,
        initiator_index: usize,
        responder_index: usize,
        result: &RangingResult,
    ) {
        let reliability = if result.is_empty() {
            FAILED_RANGING_RELIABILITY
        } else {
            SUCCESSFUL_RANGING_RELIABILITY
        };
        self.initiators[initiator_index].update(reliability);
        self.responders[responder_index].update(reliability);
    }

    pub fn initiator_report(&self, initiator_index: usize) -> &DiagnosticReport {
        self.initiators[initiator_index].checkup.report()
    }

    pub fn responder_report(&self, responder_index: usize) -> &DiagnosticReport {
        self.responders[responder_index].checkup.report()
    }

    pub fn number_of_initiators(&self) -> usize {
        self.initiators.len()
    }

    pub fn number_of_responders(&self) -> usize {
        self.responders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticStatus;

    fn names(prefix: &str, count: usize) -> Vec<String> {
        (0..count).map(|i| format!("{}{}", prefix, i)).collect()
    }

    fn diagnostics() -> TransceiversDiagnostics {
        TransceiversDiagnostics::new(20.0, &names("initiator", 2), &names("responder", 2))
    }

    #[test]
    fn reports_are_stale_before_any_feedback() {
        let diagnostics = diagnostics();
        assert_eq!(
            diagnostics.initiator_report(0).status,
            DiagnosticStatus::Stale
        );
        assert_eq!(diagnostics.initiator_report(0).info["initiator0"], "");
        assert_eq!(diagnostics.responder_report(1).info["responder1"], "");
    }

    #[test]
    fn steady_success_reports_high_reliability() {
        let mut diagnostics = diagnostics();
        let success = RangingResult::new(7.5, 28, 30);
        for _ in 0..40 {
            diagnostics.update(0, 1, &success);
        }
        assert_eq!(diagnostics.initiator_report(0).status, DiagnosticStatus::Ok);
        assert_eq!(diagnostics.responder_report(1).status, DiagnosticStatus::Ok);
        assert_eq!(diagnostics.initiator_report(0).info["initiator0"], "1.000");
    }

    #[test]
    fn steady_failure_settles_to_one_third_and_degrades() {
        let mut diagnostics = diagnostics();
        for _ in 0..40 {
            diagnostics.update(1, 0, &RangingResult::default());
        }
        // 1/3 sits just above the error threshold: pure failure degrades the
        // classification without saturating it
        assert_eq!(
            diagnostics.initiator_report(1).status,
            DiagnosticStatus::Warn
        );
        assert_eq!(
            diagnostics.responder_report(0).status,
            DiagnosticStatus::Warn
        );
        assert_eq!(diagnostics.initiator_report(1).info["initiator1"], "0.333");
    }

    #[test]
    fn untouched_transceivers_stay_stale() {
        let mut diagnostics = diagnostics();
        diagnostics.update(0, 0, &RangingResult::new(3.0, 25, 27));
        assert_eq!(
            diagnostics.initiator_report(1).status,
            DiagnosticStatus::Stale
        );
        assert_eq!(
            diagnostics.responder_report(1).status,
            DiagnosticStatus::Stale
        );
    }
}
