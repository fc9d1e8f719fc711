use std::path::Path;

use super::{Aggregation, ResultRow, ResultSink, RunningEstimates, SinkMode};
use crate::{
    engine::{SimParams, VisitCounts},
    error::Result,
};

pub const AVERAGES_FILE: &str = "averages.pdata";

/// Running mean occupancy after every block, to see where the chain settles.
pub struct AverageOccupancy {
    sink: ResultSink,
}

impl AverageOccupancy {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            sink: ResultSink::new(
                output_dir.join(AVERAGES_FILE),
                SinkMode::Truncate,
                "block_index\taverage",
            ),
        }
    }

    pub fn sink(&self) -> &ResultSink {
        &self.sink
    }
}

impl Aggregation for AverageOccupancy {
    fn aggregate(&self, counts: &VisitCounts, _: &SimParams) -> Result<ResultRow> {
        let estimates = RunningEstimates::from_counts(counts)?;
        Ok(ResultRow::Convergence {
            averages: estimates.averages,
        })
    }

    fn emit(&self, row: &ResultRow) -> Result<()> {
        self.sink.emit(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NUM_STATES;
    use ndarray::Array2;
    use std::fs;

    #[test]
    fn one_line_per_block() {
        let dir = tempfile::tempdir().unwrap();
        let strategy = AverageOccupancy::new(dir.path());
        let mut table = Array2::zeros((3, NUM_STATES));
        table[[0, 1]] = 4;
        table[[1, 3]] = 4;
        table[[2, 5]] = 8;
        let counts = VisitCounts::from_array(table).unwrap();
        let params = SimParams::new(1.0, 1.0, 1.0).unwrap();

        let row = strategy.aggregate(&counts, &params).unwrap();
        strategy.emit(&row).unwrap();

        let content = fs::read_to_string(dir.path().join(AVERAGES_FILE)).unwrap();
        assert_eq!(
            content,
            "# block_index\taverage\n0\t 1.000000\n1\t 2.000000\n2\t 3.500000\n"
        );
    }
}
