use ndarray::{s, Array, Array1, ArrayView1};

use crate::{
    engine::{SimParams, VisitCounts, MAX_OCCUPANCY, NUM_STATES},
    error::{Result, SimError},
};

/// Visit totals per state over all blocks accumulated so far.
#[derive(Debug, Clone)]
pub struct CumulativeState {
    totals: Array1<u64>,
    grand_total: u64,
}

impl CumulativeState {
    pub fn zeros() -> Self {
        Self {
            totals: Array::zeros(NUM_STATES),
            grand_total: 0,
        }
    }

    pub fn accumulate(&mut self, block: ArrayView1<u64>) {
        self.totals += &block;
        self.grand_total += block.sum();
    }

    /// Empirical state distribution.
    pub fn probabilities(&self) -> Result<Array1<f64>> {
        if self.grand_total == 0 {
            return Err(SimError::Aggregation(
                "no transitions recorded, state probabilities are undefined".into(),
            ));
        }
        let total = self.grand_total as f64;
        Ok(self.totals.mapv(|count| count as f64 / total))
    }
}

/// Mean occupancy of a state distribution.
pub fn expected_occupancy(probabilities: &Array1<f64>) -> f64 {
    let states = Array::from_iter((0..NUM_STATES).map(|state| state as f64));
    probabilities.dot(&states)
}

/// Estimates after each block, computed from all blocks up to and including it.
#[derive(Debug, Clone)]
pub struct RunningEstimates {
    pub averages: Array1<f64>,
    /// Probability of the blocking state.
    pub blocking: Array1<f64>,
}

impl RunningEstimates {
    pub fn from_counts(counts: &VisitCounts) -> Result<Self> {
        let num_blocks = counts.num_blocks();
        let mut averages = Array::zeros(num_blocks);
        let mut blocking = Array::zeros(num_blocks);
        let mut cumulative = CumulativeState::zeros();

        for (index, block) in counts.blocks().enumerate() {
            cumulative.accumulate(block);
            let probabilities = cumulative.probabilities()?;
            averages[index] = expected_occupancy(&probabilities);
            blocking[index] = probabilities[MAX_OCCUPANCY];
        }
        Ok(Self { averages, blocking })
    }
}

/// Estimates averaged over the blocks from a cutoff to the end of the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteadyState {
    pub average: f64,
    pub blocking_probability: f64,
    /// Number of blocks averaged.
    pub window: usize,
}

impl SteadyState {
    pub fn from_estimates(estimates: &RunningEstimates, cutoff: usize) -> Result<Self> {
        let num_blocks = estimates.averages.len();
        if cutoff >= num_blocks {
            return Err(SimError::Aggregation(format!(
                "cutoff {cutoff} leaves no blocks out of {num_blocks}"
            )));
        }
        let window = num_blocks - cutoff;
        let average = estimates.averages.slice(s![cutoff..]).sum() / window as f64;
        let blocking_probability = estimates.blocking.slice(s![cutoff..]).sum() / window as f64;
        Ok(Self {
            average,
            blocking_probability,
            window,
        })
    }

    /// Accepted arrivals per unit of time; arrivals are lost in the blocking state.
    pub fn throughput(&self, params: &SimParams) -> f64 {
        params.arrival_rate() * (1.0 - self.blocking_probability)
    }
}
