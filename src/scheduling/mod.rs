//! Timer-driven ranging coordination

pub mod georeferenced;
pub mod policy;
pub mod reachability;
pub mod scheduler;
pub mod timer;

pub use georeferenced::GeoreferencedPolicy;
pub use policy::{PollPolicy, RoundRobinPolicy};
pub use reachability::ReachabilityIndex;
pub use scheduler::{
    CoordinationScheduler, GeoreferencedScheduler, SchedulerError, SchedulerResult,
    SimpleScheduler,
};
pub use timer::PeriodicTimer;
