//! Two-threshold reliability classification and report aggregation

use std::collections::BTreeMap;
use std::fmt;

/// Severity of a diagnostic entry, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum DiagnosticStatus {
    /// No evaluation has happened yet
    #[default]
    Stale,
    Ok,
    Warn,
    Error,
}

impl fmt::Display for DiagnosticStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticStatus::Stale => "STALE",
            DiagnosticStatus::Ok => "OK",
            DiagnosticStatus::Warn => "WARN",
            DiagnosticStatus::Error => "ERROR",
        };
        write!(f, "{}", name)
    }
}

/// Aggregated health report: one overall status plus one info entry per
/// monitored transceiver. Merging keeps the worst status and unions the
/// info entries, so aggregation order does not matter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosticReport {
    pub status: DiagnosticStatus,
    pub messages: Vec<String>,
    pub info: BTreeMap<String, String>,
}

impl DiagnosticReport {
    pub fn merge(&mut self, other: &DiagnosticReport) {
        self.status = self.status.max(other.status);
        self.messages.extend(other.messages.iter().cloned());
        self.info
            .extend(other.info.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

/// Classifies a rolling reliability average against two fixed thresholds.
/// Averages inside the band between the thresholds report as uncertain,
/// which keeps single borderline samples from flapping the classification.
#[derive(Debug, Clone)]
pub struct ReliabilityCheckup {
    name: String,
    low_threshold: f64,
    high_threshold: f64,
    report: DiagnosticReport,
}

impl ReliabilityCheckup {
    pub fn new(name: &str, low_threshold: f64, high_threshold: f64) -> Self {
        let mut report = DiagnosticReport::default();
        report.info.insert(name.to_string(), String::new());
        Self {
            name: name.to_string(),
            low_threshold,
            high_threshold,
            report,
        }
    }

    /// Re-classify from the current rolling average
    pub fn evaluate(&mut self, average: f64) -> DiagnosticStatus {
        let (status, verdict) = if average < self.low_threshold {
            (DiagnosticStatus::Error, "too low")
        } else if average < self.high_threshold {
            (DiagnosticStatus::Warn, "uncertain")
        } else {
            (DiagnosticStatus::Ok, "high")
        };

        self.report.status = status;
        self.report.messages = vec![format!("{} reliability is {}.", self.name, verdict)];
        self.report
            .info
            .insert(self.name.clone(), format!("{:.3}", average));
        status
    }

    pub fn report(&self) -> &DiagnosticReport {
        &self.report
    }
}
