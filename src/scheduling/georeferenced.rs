//! Spatially filtered poll ordering
//!
//! Restricts the responder rotation to the responders reachable from the
//! platform's last known position. Reselection happens only at full
//! poll-cycle boundaries so cursor bounds stay valid mid-cycle.

use std::time::Instant;

use log::debug;
use nalgebra::Vector3;
use parking_lot::Mutex;

use crate::core::{TransceiverPairIds, ROBOT_POSITION_MAX_AGE};
use crate::scheduling::policy::PollPolicy;
use crate::scheduling::reachability::ReachabilityIndex;

const MINIMAL_SELECTED_RESPONDERS: usize = 2;

struct GeoreferencedState {
    initiator_poll_index: usize,
    selected_responder_poll_index: usize,
    selected_responder_indexes: Vec<usize>,
    reachability: ReachabilityIndex,
    robot_position: Option<Vector3<f64>>,
    robot_position_stamp: Option<Instant>,
}

impl GeoreferencedState {
    /// Refresh the selected responder set. A recent robot position narrows
    /// the set to the reachable responders; a stale or absent position
    /// falls back on the full population.
    fn reselect(&mut self) {
        let fresh = self
            .robot_position_stamp
            .map(|stamp| stamp.elapsed() < ROBOT_POSITION_MAX_AGE)
            .unwrap_or(false);

        let selected = match (fresh, &self.robot_position) {
            (true, Some(position)) => self.reachability.find(position).to_vec(),
            _ => (0..self.reachability.number_of_points()).collect(),
        };

        if selected != self.selected_responder_indexes {
            debug!("selected responders changed to {:?}", selected);
            self.selected_responder_indexes = selected;
        }
    }
}

/// Round robin over the initiators and the currently reachable responders.
///
/// The selected-responder cursor cycles fastest; when both cursors wrap to
/// zero a full poll cycle has elapsed and the selected set is recomputed.
/// With fewer than two reachable responders no pair is emitted.
pub struct GeoreferencedPolicy {
    number_of_initiators: usize,
    state: Mutex<GeoreferencedState>,
}

impl GeoreferencedPolicy {
    /// The search radius is conservative: the farthest initiator offset
    /// from the platform origin plus the maximal ranging distance, so a
    /// responder reachable by any initiator is never filtered out.
    pub fn new(
        initiator_positions: &[Vector3<f64>],
        responder_positions: &[Vector3<f64>],
        maximal_ranging_distance: f64,
    ) -> Self {
        let initiator_reach = initiator_positions
            .iter()
            .map(|position| position.norm())
            .fold(0.0, f64::max);

        Self {
            number_of_initiators: initiator_positions.len(),
            state: Mutex::new(GeoreferencedState {
                initiator_poll_index: initiator_positions.len() - 1,
                selected_responder_poll_index: responder_positions.len() - 1,
                selected_responder_indexes: (0..responder_positions.len()).collect(),
                reachability: ReachabilityIndex::new(
                    responder_positions,
                    initiator_reach + maximal_ranging_distance,
                ),
                robot_position: None,
                robot_position_stamp: None,
            }),
        }
    }

    /// Record a fresh platform position. Takes effect at the next poll
    /// cycle boundary. Safe to call concurrently with the timer thread.
    pub fn update_robot_position(&self, position: Vector3<f64>) {
        let mut state = self.state.lock();
        state.robot_position = Some(position);
        state.robot_position_stamp = Some(Instant::now());
    }

    /// Responder indices currently in the rotation. Stable between poll
    /// cycle boundaries.
    pub fn selected_responders(&self) -> Vec<usize> {
        self.state.lock().selected_responder_indexes.clone()
    }
}

impl PollPolicy for GeoreferencedPolicy {
    fn next_pair(&self) -> Option<TransceiverPairIds> {
        let mut state = self.state.lock();

        state.selected_responder_poll_index += 1;
        if state.selected_responder_poll_index >= state.selected_responder_indexes.len() {
            state.selected_responder_poll_index = 0;
            state.initiator_poll_index =
                (state.initiator_poll_index + 1) % self.number_of_initiators;
            if state.initiator_poll_index == 0 {
                state.reselect();
            }
        }

        if state.selected_responder_indexes.len() < MINIMAL_SELECTED_RESPONDERS {
            return None;
        }

        Some(TransceiverPairIds {
            initiator: state.initiator_poll_index,
            responder: state.selected_responder_indexes[state.selected_responder_poll_index],
        })
    }

    fn reported_responders(&self) -> Vec<usize> {
        self.selected_responders()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initiators() -> Vec<Vector3<f64>> {
        vec![Vector3::new(1.0, 0.5, 2.0), Vector3::new(-1.0, -0.5, 2.0)]
    }

    fn responders() -> Vec<Vector3<f64>> {
        vec![
            Vector3::new(-10.0, 0.0, 2.0),
            Vector3::new(0.0, 0.0, 2.0),
            Vector3::new(10.0, 0.0, 2.0),
        ]
    }

    fn pairs(policy: &GeoreferencedPolicy, count: usize) -> Vec<Option<(usize, usize)>> {
        (0..count)
            .map(|_| {
                policy
                    .next_pair()
                    .map(|pair| (pair.initiator, pair.responder))
            })
            .collect()
    }

    #[test]
    fn without_a_position_the_full_population_is_polled() {
        let policy = GeoreferencedPolicy::new(&initiators(), &responders(), 20.0);
        let sequence = pairs(&policy, 13);
        assert_eq!(
            &sequence[6..13],
            &[
                Some((0, 0)),
                Some((0, 1)),
                Some((0, 2)),
                Some((1, 0)),
                Some((1, 1)),
                Some((1, 2)),
                Some((0, 0)),
            ]
        );
    }

    #[test]
    fn reselection_waits_for_the_cycle_boundary() {
        let policy = GeoreferencedPolicy::new(&initiators(), &responders(), 20.0);
        for _ in 0..8 {
            policy.next_pair();
        }
        // mid-cycle: the update must not disturb the running rotation
        policy.update_robot_position(Vector3::new(13.0, 0.0, 0.0));
        assert_eq!(policy.selected_responders(), vec![0, 1, 2]);

        // drive to the next cycle boundary
        for _ in 8..12 {
            policy.next_pair();
        }
        let pair = policy.next_pair().unwrap();
        assert_eq!(policy.selected_responders(), vec![1, 2]);
        assert_eq!((pair.initiator, pair.responder), (0, 1));
    }

    #[test]
    fn narrowed_rotation_only_visits_reachable_responders() {
        let policy = GeoreferencedPolicy::new(&initiators(), &responders(), 20.0);
        policy.update_robot_position(Vector3::new(13.0, 0.0, 0.0));

        let sequence: Vec<(usize, usize)> =
            pairs(&policy, 9).into_iter().flatten().collect();
        assert_eq!(
            sequence,
            vec![
                (0, 1),
                (0, 2),
                (1, 1),
                (1, 2),
                (0, 1),
                (0, 2),
                (1, 1),
                (1, 2),
                (0, 1),
            ]
        );
    }

    #[test]
    fn a_single_reachable_responder_suspends_polling() {
        let policy = GeoreferencedPolicy::new(&initiators(), &responders(), 20.0);
        policy.update_robot_position(Vector3::new(23.0, 0.0, 0.0));

        assert_eq!(policy.next_pair(), None);
        assert_eq!(policy.selected_responders(), vec![2]);
    }

    #[test]
    fn selected_set_is_stable_between_queries() {
        let policy = GeoreferencedPolicy::new(&initiators(), &responders(), 20.0);
        policy.next_pair();
        let first = policy.selected_responders();
        assert_eq!(policy.selected_responders(), first);
        assert_eq!(policy.selected_responders(), first);
    }
}
