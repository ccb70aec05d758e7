//! Periodic timer thread with a deterministic stop contract
//!
//! The timer schedules callbacks against absolute deadlines so period drift
//! does not accumulate. Stopping joins the worker thread before returning,
//! so no callback can fire once [`PeriodicTimer::stop`] has returned.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

struct TimerShared {
    stopped: Mutex<bool>,
    wakeup: Condvar,
}

/// Runs a callback at a fixed period on a dedicated thread.
///
/// Deadlines are absolute: each tick is scheduled at `previous + period`.
/// When a callback overruns its period, the next tick fires immediately and
/// the deadline is then realigned forward by whole periods, so a long
/// callback produces one late tick rather than a catch-up burst.
pub struct PeriodicTimer {
    shared: Arc<TimerShared>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicTimer {
    /// Spawn the timer thread. The first callback fires one period after
    /// this call returns.
    pub fn start<F>(period: Duration, mut callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let shared = Arc::new(TimerShared {
            stopped: Mutex::new(false),
            wakeup: Condvar::new(),
        });

        let thread_shared = Arc::clone(&shared);
        let handle = std::thread::spawn(move || {
            let mut next = Instant::now() + period;
            loop {
                {
                    let mut stopped = thread_shared.stopped.lock();
                    while !*stopped {
                        if thread_shared.wakeup.wait_until(&mut stopped, next).timed_out() {
                            break;
                        }
                    }
                    if *stopped {
                        return;
                    }
                }

                callback();

                next += period;
                let now = Instant::now();
                if now > next + period {
                    // more than a full period behind: realign instead of
                    // firing a burst of stale ticks
                    while next <= now {
                        next += period;
                    }
                }
            }
        });

        Self {
            shared,
            handle: Some(handle),
        }
    }

    /// Stop the timer and join the worker thread. Once this returns the
    /// callback will never run again. Idempotent.
    pub fn stop(&mut self) {
        *self.shared.stopped.lock() = true;
        self.shared.wakeup.notify_all();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for PeriodicTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
