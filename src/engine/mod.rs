//! Discrete-time simulation of a two server queue where the second server
//! sleeps while the occupancy is below [K].

pub mod controller;
pub mod params;
pub mod random;
pub mod stepper;

pub use controller::{RunController, VisitCounts};
pub use params::SimParams;
pub use random::{CyclicSource, RandomSource, UniformSource};
pub use stepper::{step, Occupancy};

/// Number of occupancy states, `0..=MAX_OCCUPANCY`.
pub const NUM_STATES: usize = 11;

/// The blocking state.
pub const MAX_OCCUPANCY: usize = NUM_STATES - 1;

/// Transitions simulated per block.
pub const STEP: usize = 1000;

/// Transitions simulated per run.
pub const MAX: usize = 1_000_000;

pub const NUM_BLOCKS: usize = MAX / STEP;

/// Occupancy at which server B wakes up.
pub const K: usize = 6;

/// First block considered to be in steady state.
pub const CUTOFF: usize = 400;
