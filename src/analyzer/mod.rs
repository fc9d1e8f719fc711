mod average;
mod sink;
mod state_stats;
mod sweep;

use std::io::{self, Write};

use itertools::enumerate;
use ndarray::Array1;

use crate::{
    engine::{SimParams, VisitCounts},
    error::Result,
};

pub use average::{AverageOccupancy, AVERAGES_FILE};
pub use sink::{ResultSink, SinkMode};
pub use state_stats::{CumulativeState, RunningEstimates, SteadyState};
pub use sweep::{ArrivalSweep, DepartureSweep, ARRIVAL_SWEEP_FILE, DEPARTURE_SWEEP_FILE};

/// Turns the visit counts of a finished run into a [ResultRow] and records it.
pub trait Aggregation {
    fn aggregate(&self, counts: &VisitCounts, params: &SimParams) -> Result<ResultRow>;

    /// Writes the row to wherever this aggregation keeps its results.
    fn emit(&self, row: &ResultRow) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultRow {
    /// Running mean occupancy after each block.
    Convergence { averages: Array1<f64> },
    ArrivalSweep {
        arrival_rate: f64,
        average: f64,
        throughput: f64,
    },
    DepartureSweep {
        server_a_rate: f64,
        server_b_rate: f64,
        average: f64,
        throughput: f64,
    },
}

impl ResultRow {
    /// Tab separated data lines, one per point.
    pub fn write_lines<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self {
            ResultRow::Convergence { averages } => {
                for (block, average) in enumerate(averages) {
                    writeln!(out, "{}\t {:.6}", block, average)?;
                }
            }
            ResultRow::ArrivalSweep {
                arrival_rate,
                average,
                throughput,
            } => writeln!(out, "{:.6}\t {:.6}\t {:.6}", arrival_rate, average, throughput)?,
            ResultRow::DepartureSweep {
                server_a_rate,
                server_b_rate,
                average,
                throughput,
            } => writeln!(
                out,
                "{:.6}\t {:.6}\t {:.6}\t {:.6}",
                server_a_rate, server_b_rate, average, throughput
            )?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn render(row: &ResultRow) -> String {
        let mut out = Vec::new();
        row.write_lines(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn convergence_lines_are_indexed() {
        let row = ResultRow::Convergence {
            averages: array![1.5, 2.25],
        };
        assert_eq!(render(&row), "0\t 1.500000\n1\t 2.250000\n");
    }

    #[test]
    fn sweep_lines() {
        let row = ResultRow::ArrivalSweep {
            arrival_rate: 4.0,
            average: 2.5,
            throughput: 3.75,
        };
        assert_eq!(render(&row), "4.000000\t 2.500000\t 3.750000\n");

        let row = ResultRow::DepartureSweep {
            server_a_rate: 3.0,
            server_b_rate: 6.0,
            average: 5.0,
            throughput: 7.5,
        };
        assert_eq!(render(&row), "3.000000\t 6.000000\t 5.000000\t 7.500000\n");
    }
}
