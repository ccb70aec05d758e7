//! Timer-driven coordination of ranging exchanges
//!
//! One scheduler shell hosts a poll policy, the periodic timer and the
//! reliability diagnostics. The policy decides which pair is ranged on
//! each tick; the shell emits the request, ingests feedback and aggregates
//! the health report.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use nalgebra::Vector3;
use parking_lot::Mutex;

use crate::core::{RangingResult, TransceiverPairIds, POLL_TIMEOUT_GUARD};
use crate::diagnostics::{DiagnosticReport, TransceiversDiagnostics};
use crate::scheduling::georeferenced::GeoreferencedPolicy;
use crate::scheduling::policy::{PollPolicy, RoundRobinPolicy};
use crate::scheduling::timer::PeriodicTimer;

/// Construction-time configuration failures
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerError {
    /// A role has no registered transceivers
    EmptyPopulation { role: &'static str },
    /// The poll rate is zero, negative or not finite
    InvalidPollRate { poll_rate: f64 },
    /// Names and positions of a role do not line up
    PositionCountMismatch {
        role: &'static str,
        names: usize,
        positions: usize,
    },
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::EmptyPopulation { role } => {
                write!(f, "no {} transceivers registered", role)
            }
            SchedulerError::InvalidPollRate { poll_rate } => {
                write!(f, "invalid poll rate {} Hz", poll_rate)
            }
            SchedulerError::PositionCountMismatch {
                role,
                names,
                positions,
            } => write!(
                f,
                "{} names ({}) and positions ({}) do not match",
                role, names, positions
            ),
        }
    }
}

impl std::error::Error for SchedulerError {}

pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Periodic ranging coordinator parameterized by its poll policy.
///
/// [`start`](Self::start) spawns the timer thread; every tick asks the
/// policy for a pair and hands it to the ranging request callback together
/// with the exchange timeout. Results come back through
/// [`feedback`](Self::feedback) from the radio driver's context.
pub struct CoordinationScheduler<P: PollPolicy> {
    policy: Arc<P>,
    diagnostics: Arc<Mutex<TransceiversDiagnostics>>,
    poll_period: Duration,
    timer: Option<PeriodicTimer>,
}

/// Round-robin scheduler over the full pair grid
pub type SimpleScheduler = CoordinationScheduler<RoundRobinPolicy>;

/// Scheduler restricting responders to those reachable from the platform
pub type GeoreferencedScheduler = CoordinationScheduler<GeoreferencedPolicy>;

fn check_poll_rate(poll_rate: f64) -> SchedulerResult<Duration> {
    if poll_rate.is_finite() && poll_rate > 0.0 {
        Ok(Duration::from_secs_f64(1.0 / poll_rate))
    } else {
        Err(SchedulerError::InvalidPollRate { poll_rate })
    }
}

fn check_population(role: &'static str, names: &[String]) -> SchedulerResult<()> {
    if names.is_empty() {
        Err(SchedulerError::EmptyPopulation { role })
    } else {
        Ok(())
    }
}

fn check_positions(
    role: &'static str,
    names: &[String],
    positions: &[Vector3<f64>],
) -> SchedulerResult<()> {
    if names.len() == positions.len() {
        Ok(())
    } else {
        Err(SchedulerError::PositionCountMismatch {
            role,
            names: names.len(),
            positions: positions.len(),
        })
    }
}

impl<P: PollPolicy> CoordinationScheduler<P> {
    fn with_policy(
        poll_rate: f64,
        initiators_names: &[String],
        responders_names: &[String],
        policy: P,
    ) -> SchedulerResult<Self> {
        let poll_period = check_poll_rate(poll_rate)?;
        check_population("initiator", initiators_names)?;
        check_population("responder", responders_names)?;

        Ok(Self {
            policy: Arc::new(policy),
            diagnostics: Arc::new(Mutex::new(TransceiversDiagnostics::new(
                poll_rate,
                initiators_names,
                responders_names,
            ))),
            poll_period,
            timer: None,
        })
    }

    /// Duration between two poll emissions
    pub fn poll_period(&self) -> Duration {
        self.poll_period
    }

    /// Timeout handed to the ranging executor with each request. One guard
    /// margin short of the period, so requests never overlap.
    pub fn ranging_timeout(&self) -> Duration {
        self.poll_period.saturating_sub(POLL_TIMEOUT_GUARD)
    }

    /// The poll policy, for direct cursor access in tests and for the
    /// georeferenced position feed.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Record the outcome of a ranging exchange into the reliability
    /// monitors of both involved transceivers. Callable from any thread.
    pub fn feedback(&self, pair: TransceiverPairIds, result: &RangingResult) {
        self.diagnostics
            .lock()
            .update(pair.initiator, pair.responder, result);
    }

    /// Aggregate health report over every initiator and every responder
    /// currently in the rotation.
    pub fn report(&self) -> DiagnosticReport {
        let diagnostics = self.diagnostics.lock();
        let mut report = DiagnosticReport::default();
        for initiator in 0..diagnostics.number_of_initiators() {
            report.merge(diagnostics.initiator_report(initiator));
        }
        for responder in self.policy.reported_responders() {
            report.merge(diagnostics.responder_report(responder));
        }
        report
    }

    /// Start emitting ranging requests. Each tick hands the selected pair
    /// and the exchange timeout to `on_ranging_request` on the timer
    /// thread. Restarting a running scheduler is a no-op.
    pub fn start<F>(&mut self, mut on_ranging_request: F)
    where
        F: FnMut(TransceiverPairIds, Duration) + Send + 'static,
    {
        if self.timer.is_some() {
            return;
        }

        let policy = Arc::clone(&self.policy);
        let timeout = self.ranging_timeout();
        self.timer = Some(PeriodicTimer::start(self.poll_period, move || {
            match policy.next_pair() {
                Some(pair) => on_ranging_request(pair, timeout),
                None => warn!("poll skipped, not enough reachable responders"),
            }
        }));
        info!(
            "ranging coordination started, period {:?}",
            self.poll_period
        );
    }

    /// Stop polling. Joins the timer thread; no ranging request is emitted
    /// after this returns.
    pub fn stop(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.stop();
            info!("ranging coordination stopped");
        }
    }
}

impl SimpleScheduler {
    pub fn new(
        poll_rate: f64,
        initiators_names: &[String],
        responders_names: &[String],
    ) -> SchedulerResult<Self> {
        check_population("initiator", initiators_names)?;
        check_population("responder", responders_names)?;
        Self::with_policy(
            poll_rate,
            initiators_names,
            responders_names,
            RoundRobinPolicy::new(initiators_names.len(), responders_names.len()),
        )
    }
}

impl GeoreferencedScheduler {
    pub fn new(
        poll_rate: f64,
        initiators_names: &[String],
        initiator_positions: &[Vector3<f64>],
        responders_names: &[String],
        responder_positions: &[Vector3<f64>],
        maximal_ranging_distance: f64,
    ) -> SchedulerResult<Self> {
        check_population("initiator", initiators_names)?;
        check_population("responder", responders_names)?;
        check_positions("initiator", initiators_names, initiator_positions)?;
        check_positions("responder", responders_names, responder_positions)?;
        Self::with_policy(
            poll_rate,
            initiators_names,
            responders_names,
            GeoreferencedPolicy::new(
                initiator_positions,
                responder_positions,
                maximal_ranging_distance,
            ),
        )
    }

    /// Feed the platform's latest position. Takes effect at the next poll
    /// cycle boundary.
    pub fn update_robot_position(&self, position: Vector3<f64>) {
        self.policy.update_robot_position(position);
    }

    /// Responder indices currently in the rotation
    pub fn selected_responders(&self) -> Vec<usize> {
        self.policy.selected_responders()
    }
}

impl<P: PollPolicy> Drop for CoordinationScheduler<P> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticStatus;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn names(prefix: &str, count: usize) -> Vec<String> {
        (0..count).map(|n| format!("{}{}", prefix, n)).collect()
    }

    fn simple() -> SimpleScheduler {
        SimpleScheduler::new(20.0, &names("initiator", 2), &names("responder", 3))
            .expect("valid configuration")
    }

    #[test]
    fn empty_populations_are_rejected() {
        assert_eq!(
            SimpleScheduler::new(20.0, &[], &names("responder", 3)).err(),
            Some(SchedulerError::EmptyPopulation { role: "initiator" })
        );
        assert_eq!(
            SimpleScheduler::new(20.0, &names("initiator", 2), &[]).err(),
            Some(SchedulerError::EmptyPopulation { role: "responder" })
        );
    }

    #[test]
    fn non_positive_poll_rate_is_rejected() {
        assert!(matches!(
            SimpleScheduler::new(0.0, &names("initiator", 1), &names("responder", 2)),
            Err(SchedulerError::InvalidPollRate { .. })
        ));
    }

    #[test]
    fn mismatched_positions_are_rejected() {
        let result = GeoreferencedScheduler::new(
            20.0,
            &names("initiator", 2),
            &[Vector3::new(1.0, 0.5, 2.0)],
            &names("responder", 2),
            &[Vector3::zeros(), Vector3::zeros()],
            20.0,
        );
        assert_eq!(
            result.err(),
            Some(SchedulerError::PositionCountMismatch {
                role: "initiator",
                names: 2,
                positions: 1
            })
        );
    }

    #[test]
    fn timeout_is_one_guard_margin_under_the_period() {
        let scheduler = simple();
        assert_eq!(
            scheduler.ranging_timeout(),
            scheduler.poll_period() - POLL_TIMEOUT_GUARD
        );
    }

    #[test]
    fn policy_drives_the_round_robin_sequence() {
        let scheduler = simple();
        let sequence: Vec<(usize, usize)> = (0..7)
            .map(|_| {
                let pair = scheduler.policy().next_pair().unwrap();
                (pair.initiator, pair.responder)
            })
            .collect();
        assert_eq!(
            sequence,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2), (0, 0)]
        );
    }

    #[test]
    fn feedback_shapes_the_aggregated_report() {
        let scheduler = simple();
        let success = RangingResult::new(5.0, 27, 29);
        for _ in 0..20 {
            scheduler.feedback(
                TransceiverPairIds {
                    initiator: 0,
                    responder: 1,
                },
                &success,
            );
        }

        let report = scheduler.report();
        assert_eq!(report.status, DiagnosticStatus::Ok);
        assert_eq!(report.info["initiator0"], "1.000");
        assert_eq!(report.info["responder1"], "1.000");
        // untouched transceivers still appear, with no value yet
        assert_eq!(report.info["initiator1"], "");
        assert_eq!(report.info["responder0"], "");
        assert_eq!(report.info.len(), 5);
    }

    #[test]
    fn georeferenced_report_covers_only_selected_responders() {
        let scheduler = GeoreferencedScheduler::new(
            30.0,
            &names("initiator", 2),
            &[Vector3::new(1.0, 0.5, 2.0), Vector3::new(-1.0, -0.5, 2.0)],
            &names("responder", 3),
            &[
                Vector3::new(-10.0, 0.0, 2.0),
                Vector3::new(0.0, 0.0, 2.0),
                Vector3::new(10.0, 0.0, 2.0),
            ],
            20.0,
        )
        .expect("valid configuration");

        scheduler.update_robot_position(Vector3::new(13.0, 0.0, 0.0));
        scheduler.policy().next_pair();
        assert_eq!(scheduler.selected_responders(), vec![1, 2]);

        let report = scheduler.report();
        assert!(report.info.contains_key("responder1"));
        assert!(report.info.contains_key("responder2"));
        assert!(!report.info.contains_key("responder0"));
    }

    #[test]
    fn started_scheduler_emits_requests_then_goes_silent_on_stop() {
        let mut scheduler = SimpleScheduler::new(
            100.0,
            &names("initiator", 1),
            &names("responder", 2),
        )
        .expect("valid configuration");

        let emissions = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&emissions);
        scheduler.start(move |_pair, timeout| {
            assert!(timeout < Duration::from_millis(10));
            counter.fetch_add(1, Ordering::SeqCst);
        });

        std::thread::sleep(Duration::from_millis(120));
        scheduler.stop();

        let emitted = emissions.load(Ordering::SeqCst);
        assert!(emitted >= 6, "only {} emissions", emitted);

        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(emissions.load(Ordering::SeqCst), emitted);
    }
}
