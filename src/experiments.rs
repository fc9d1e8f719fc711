//! The three standard experiments: one convergence run, a sweep over the
//! arrival rate and a sweep over both departure rates.

use std::{fs, path::Path};

use indicatif::ProgressBar;
use tracing::info;

use crate::{
    analyzer::{Aggregation, ArrivalSweep, AverageOccupancy, DepartureSweep, ResultRow},
    engine::{RunController, UniformSource},
    error::{Result, SimError},
    parser::{ExperimentConfig, RatesConfig},
};

/// Rows produced by [run_experiments], in run order.
#[derive(Debug, Clone)]
pub struct ExperimentReport {
    pub convergence: ResultRow,
    pub arrival_sweep: Vec<ResultRow>,
    pub departure_sweep: Vec<ResultRow>,
}

fn labelled_run<S: UniformSource>(
    controller: &mut RunController<S>,
    label: String,
    rates: RatesConfig,
    strategy: &dyn Aggregation,
) -> Result<ResultRow> {
    rates
        .params()
        .and_then(|params| controller.run(&params, strategy))
        .map_err(|e| e.in_run(label))
}

/// Runs every experiment of `config`, writing data files into its output
/// directory. Stops at the first failing run.
pub fn run_experiments<S: UniformSource>(
    config: &ExperimentConfig,
    controller: &mut RunController<S>,
) -> Result<ExperimentReport> {
    config.validate()?;
    let output_dir = Path::new(&config.output);
    fs::create_dir_all(output_dir).map_err(|source| SimError::Sink {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let convergence = labelled_run(
        controller,
        String::from("Sim 1"),
        config.average,
        &AverageOccupancy::new(output_dir),
    )?;
    if let ResultRow::Convergence { averages } = &convergence {
        info!(
            blocks = averages.len(),
            last_average = averages.iter().next_back().copied().unwrap_or_default(),
            "convergence run done"
        );
    }

    let arrival_rates = config.arrival_sweep.arrival_rates.values()?;
    let server_a_rates = config.departure_sweep.server_a_rates.values()?;
    let server_b_rates = config.departure_sweep.server_b_rates.values()?;
    let bar = ProgressBar::new(
        (arrival_rates.len() + server_a_rates.len() * server_b_rates.len()) as u64,
    );

    let strategy = ArrivalSweep::new(output_dir).with_cutoff(config.cutoff);
    strategy.sink().reset()?;
    let sweep = &config.arrival_sweep;
    let mut arrival_rows = Vec::with_capacity(arrival_rates.len());
    for arrival_rate in arrival_rates {
        let row = labelled_run(
            controller,
            format!("Sim 2-{}", arrival_rate),
            RatesConfig {
                arrival_rate,
                server_a_rate: sweep.server_a_rate,
                server_b_rate: sweep.server_b_rate,
            },
            &strategy,
        )?;
        arrival_rows.push(row);
        bar.inc(1);
    }
    info!(runs = arrival_rows.len(), "arrival rate sweep done");

    let strategy = DepartureSweep::new(output_dir).with_cutoff(config.cutoff);
    strategy.sink().reset()?;
    let arrival_rate = config.departure_sweep.arrival_rate;
    let mut departure_rows = Vec::with_capacity(server_a_rates.len() * server_b_rates.len());
    for &server_a_rate in &server_a_rates {
        for &server_b_rate in &server_b_rates {
            let row = labelled_run(
                controller,
                format!("Sim 3-{}/{}", server_a_rate, server_b_rate),
                RatesConfig {
                    arrival_rate,
                    server_a_rate,
                    server_b_rate,
                },
                &strategy,
            )?;
            departure_rows.push(row);
            bar.inc(1);
        }
    }
    bar.finish_and_clear();
    info!(runs = departure_rows.len(), "departure rates sweep done");

    Ok(ExperimentReport {
        convergence,
        arrival_sweep: arrival_rows,
        departure_sweep: departure_rows,
    })
}
