use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis};
use tracing::debug;

use super::{
    params::SimParams,
    random::UniformSource,
    stepper::{step, Occupancy},
    NUM_BLOCKS, NUM_STATES,
};
use crate::{
    analyzer::{Aggregation, ResultRow},
    error::{Result, SimError},
};

/// Visit counts of a run, one row of [NUM_STATES] counters per block.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitCounts {
    counts: Array2<u64>,
}

impl VisitCounts {
    /// Zeroed table for `num_blocks` blocks. Reports allocation failure
    /// instead of aborting.
    pub fn allocate(num_blocks: usize) -> Result<Self> {
        let len = num_blocks.saturating_mul(NUM_STATES);
        let mut storage: Vec<u64> = Vec::new();
        storage
            .try_reserve_exact(len)
            .map_err(|source| SimError::Allocation {
                blocks: num_blocks,
                source,
            })?;
        storage.resize(len, 0);
        let counts = Array2::from_shape_vec((num_blocks, NUM_STATES), storage)
            .map_err(|e| SimError::Aggregation(format!("visit table shape: {e}")))?;
        Ok(Self { counts })
    }

    pub fn from_array(counts: Array2<u64>) -> Result<Self> {
        if counts.ncols() != NUM_STATES {
            return Err(SimError::Aggregation(format!(
                "expected {NUM_STATES} states per block, got {}",
                counts.ncols()
            )));
        }
        Ok(Self { counts })
    }

    pub fn num_blocks(&self) -> usize {
        self.counts.nrows()
    }

    pub fn block(&self, index: usize) -> ArrayView1<u64> {
        self.counts.row(index)
    }

    pub fn blocks(&self) -> impl Iterator<Item = ArrayView1<'_, u64>> + '_ {
        self.counts.axis_iter(Axis(0))
    }

    fn blocks_mut(&mut self) -> impl Iterator<Item = ArrayViewMut1<'_, u64>> + '_ {
        self.counts.axis_iter_mut(Axis(0))
    }
}

/// Runs simulations one after the other, keeping the occupancy between the
/// blocks of a run and clearing it between runs.
pub struct RunController<S> {
    source: S,
    occupancy: Occupancy,
}

impl<S: UniformSource> RunController<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            occupancy: Occupancy::default(),
        }
    }

    pub fn occupancy(&self) -> Occupancy {
        self.occupancy
    }

    /// Simulates [NUM_BLOCKS] blocks and hands the table to `strategy`, which
    /// both computes and emits the result.
    pub fn run(&mut self, params: &SimParams, strategy: &dyn Aggregation) -> Result<ResultRow> {
        self.occupancy.reset();
        params.check_stable()?;

        let mut counts = VisitCounts::allocate(NUM_BLOCKS)?;
        for (index, block) in counts.blocks_mut().enumerate() {
            step(
                params,
                &mut self.occupancy,
                &mut self.source,
                block,
                index + 1 == NUM_BLOCKS,
            );
        }
        debug!(
            arrival_rate = params.arrival_rate(),
            server_a_rate = params.server_a_rate(),
            server_b_rate = params.server_b_rate(),
            blocks = counts.num_blocks(),
            "simulated run"
        );

        let row = strategy.aggregate(&counts, params)?;
        strategy.emit(&row)?;
        Ok(row)
    }
}
