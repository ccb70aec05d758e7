//! Poll-ordering policies for the coordination scheduler
//!
//! The scheduler shell is generic over a policy deciding which pair is
//! ranged on each timer tick. Policies use interior mutability because one
//! instance is shared between the timer thread and caller threads.

use parking_lot::Mutex;

use crate::core::TransceiverPairIds;

/// Decides, once per timer tick, which initiator and responder are ranged
/// next. Returning `None` skips the tick.
pub trait PollPolicy: Send + Sync + 'static {
    /// Advance the poll cursors and return the pair to range this tick
    fn next_pair(&self) -> Option<TransceiverPairIds>;

    /// Responder indices that belong in the current diagnostic report
    fn reported_responders(&self) -> Vec<usize>;
}

struct PollCursor {
    initiator: usize,
    responder: usize,
}

/// Fair round robin over every (initiator, responder) pair, responder
/// cycling fastest. The cursor starts on the last pair so the first tick
/// emits pair (0, 0).
pub struct RoundRobinPolicy {
    number_of_initiators: usize,
    number_of_responders: usize,
    cursor: Mutex<PollCursor>,
}

impl RoundRobinPolicy {
    /// Both populations must be non-empty; the scheduler constructor
    /// enforces this.
    pub fn new(number_of_initiators: usize, number_of_responders: usize) -> Self {
        Self {
            number_of_initiators,
            number_of_responders,
            cursor: Mutex::new(PollCursor {
                initiator: number_of_initiators - 1,
                responder: number_of_responders - 1,
            }),
        }
    }
}

impl PollPolicy for RoundRobinPolicy {
    fn next_pair(&self) -> Option<TransceiverPairIds> {
        let mut cursor = self.cursor.lock();

        cursor.responder += 1;
        if cursor.responder == self.number_of_responders {
            cursor.responder = 0;
            cursor.initiator = (cursor.initiator + 1) % self.number_of_initiators;
        }

        Some(TransceiverPairIds {
            initiator: cursor.initiator,
            responder: cursor.responder,
        })
    }

    fn reported_responders(&self) -> Vec<usize> {
        (0..self.number_of_responders).collect()
    }
}
