use ndarray::ArrayViewMut1;

use super::{params::SimParams, random::UniformSource, MAX_OCCUPANCY, NUM_STATES, STEP};

/// Number of customers in the system, always within `0..=MAX_OCCUPANCY`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Occupancy(usize);

impl Occupancy {
    pub fn value(&self) -> usize {
        self.0
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }

    fn arrive(&mut self) {
        debug_assert!(self.0 < MAX_OCCUPANCY);
        self.0 += 1;
    }

    fn depart(&mut self) {
        debug_assert!(self.0 > 0);
        self.0 -= 1;
    }
}

/// Runs [STEP] transitions from `occupancy`, counting in `visits` the state
/// each transition lands in.
///
/// An empty system can only receive an arrival. A full system turns an
/// arrival draw into a departure.
pub fn step<R: UniformSource + ?Sized>(
    params: &SimParams,
    occupancy: &mut Occupancy,
    source: &mut R,
    mut visits: ArrayViewMut1<u64>,
    is_final_block: bool,
) {
    debug_assert_eq!(visits.len(), NUM_STATES);
    visits.fill(0);

    for _ in 0..STEP {
        let state = occupancy.value();
        // No draw is consumed from the empty state.
        let arrival = state == 0
            || (source.next_uniform() < params.arrival_threshold(state)
                && state < MAX_OCCUPANCY);
        if arrival {
            occupancy.arrive();
        } else {
            occupancy.depart();
        }
        visits[occupancy.value()] += 1;
    }

    if is_final_block {
        occupancy.reset();
    }
}
