//! Core types and constants for the ranging coordination system

pub mod constants;
pub mod types;

pub use constants::*;
pub use types::*;
