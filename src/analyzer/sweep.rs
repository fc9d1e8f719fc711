use std::path::Path;

use tracing::debug;

use super::{Aggregation, ResultRow, ResultSink, RunningEstimates, SinkMode, SteadyState};
use crate::{
    engine::{SimParams, VisitCounts, CUTOFF},
    error::Result,
};

pub const ARRIVAL_SWEEP_FILE: &str = "var_arr.pdata";
pub const DEPARTURE_SWEEP_FILE: &str = "var_dep.pdata";

fn steady_state(counts: &VisitCounts, params: &SimParams, cutoff: usize) -> Result<SteadyState> {
    let estimates = RunningEstimates::from_counts(counts)?;
    let steady = SteadyState::from_estimates(&estimates, cutoff)?;
    debug!(
        arrival_rate = params.arrival_rate(),
        average = steady.average,
        blocking = steady.blocking_probability,
        window = steady.window,
        "steady state"
    );
    Ok(steady)
}

/// One (λ, mean occupancy, throughput) point per run.
pub struct ArrivalSweep {
    sink: ResultSink,
    cutoff: usize,
}

impl ArrivalSweep {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            sink: ResultSink::new(
                output_dir.join(ARRIVAL_SWEEP_FILE),
                SinkMode::Append,
                "arrival_rate\taverage\tthroughput",
            ),
            cutoff: CUTOFF,
        }
    }

    pub fn with_cutoff(mut self, cutoff: usize) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn sink(&self) -> &ResultSink {
        &self.sink
    }
}

impl Aggregation for ArrivalSweep {
    fn aggregate(&self, counts: &VisitCounts, params: &SimParams) -> Result<ResultRow> {
        let steady = steady_state(counts, params, self.cutoff)?;
        Ok(ResultRow::ArrivalSweep {
            arrival_rate: params.arrival_rate(),
            average: steady.average,
            throughput: steady.throughput(params),
        })
    }

    fn emit(&self, row: &ResultRow) -> Result<()> {
        self.sink.emit(row)
    }
}

/// One (μa, μb, mean occupancy, throughput) point per run.
pub struct DepartureSweep {
    sink: ResultSink,
    cutoff: usize,
}

impl DepartureSweep {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            sink: ResultSink::new(
                output_dir.join(DEPARTURE_SWEEP_FILE),
                SinkMode::Append,
                "server_a_rate\tserver_b_rate\taverage\tthroughput",
            ),
            cutoff: CUTOFF,
        }
    }

    pub fn with_cutoff(mut self, cutoff: usize) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn sink(&self) -> &ResultSink {
        &self.sink
    }
}

impl Aggregation for DepartureSweep {
    fn aggregate(&self, counts: &VisitCounts, params: &SimParams) -> Result<ResultRow> {
        let steady = steady_state(counts, params, self.cutoff)?;
        Ok(ResultRow::DepartureSweep {
            server_a_rate: params.server_a_rate(),
            server_b_rate: params.server_b_rate(),
            average: steady.average,
            throughput: steady.throughput(params),
        })
    }

    fn emit(&self, row: &ResultRow) -> Result<()> {
        self.sink.emit(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MAX_OCCUPANCY, NUM_BLOCKS, NUM_STATES, STEP};
    use crate::error::SimError;
    use ndarray::Array2;

    /// Blocks before `switch` sit in state 0, later ones in the blocking state.
    fn two_phase(switch: usize) -> VisitCounts {
        let mut table = Array2::zeros((NUM_BLOCKS, NUM_STATES));
        for block in 0..NUM_BLOCKS {
            let state = if block < switch { 0 } else { MAX_OCCUPANCY };
            table[[block, state]] = STEP as u64;
        }
        VisitCounts::from_array(table).unwrap()
    }

    #[test]
    fn arrival_sweep_ignores_blocks_before_cutoff() {
        let dir = tempfile::tempdir().unwrap();
        let strategy = ArrivalSweep::new(dir.path());
        let params = SimParams::new(4.0, 3.0, 5.0).unwrap();

        // Always blocked: nothing gets through.
        let row = strategy.aggregate(&two_phase(0), &params).unwrap();
        assert_eq!(
            row,
            ResultRow::ArrivalSweep {
                arrival_rate: 4.0,
                average: 10.0,
                throughput: 0.0,
            }
        );

        let row = strategy.aggregate(&two_phase(NUM_BLOCKS), &params).unwrap();
        assert_eq!(
            row,
            ResultRow::ArrivalSweep {
                arrival_rate: 4.0,
                average: 0.0,
                throughput: 4.0,
            }
        );
    }

    #[test]
    fn departure_sweep_reports_both_rates() {
        let dir = tempfile::tempdir().unwrap();
        let strategy = DepartureSweep::new(dir.path()).with_cutoff(NUM_BLOCKS - 1);
        let params = SimParams::new(8.0, 3.0, 6.0).unwrap();

        // Last block: half of all transitions were in state 10.
        let row = strategy.aggregate(&two_phase(NUM_BLOCKS / 2), &params).unwrap();
        let ResultRow::DepartureSweep {
            server_a_rate,
            server_b_rate,
            average,
            throughput,
        } = row
        else {
            panic!("expected a departure sweep row");
        };
        assert_eq!((server_a_rate, server_b_rate), (3.0, 6.0));
        assert!((average - 5.0).abs() < 1e-12);
        assert!((throughput - 4.0).abs() < 1e-12);
    }

    #[test]
    fn cutoff_beyond_run_fails() {
        let dir = tempfile::tempdir().unwrap();
        let strategy = ArrivalSweep::new(dir.path()).with_cutoff(NUM_BLOCKS);
        let params = SimParams::new(4.0, 3.0, 5.0).unwrap();
        assert!(matches!(
            strategy.aggregate(&two_phase(0), &params),
            Err(SimError::Aggregation(_))
        ));
    }

    #[test]
    fn sweep_rows_accumulate_in_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let strategy = ArrivalSweep::new(dir.path());
        strategy.sink().reset().unwrap();
        for rate in [1.0, 2.0, 3.0] {
            let params = SimParams::new(rate, 5.0, 8.0).unwrap();
            let row = strategy.aggregate(&two_phase(0), &params).unwrap();
            strategy.emit(&row).unwrap();
        }
        let content = std::fs::read_to_string(strategy.sink().path()).unwrap();
        let data: Vec<&str> = content.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(data.len(), 3);
        assert!(data[2].starts_with("3.000000"));
    }
}
