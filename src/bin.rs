use clap::Parser;
use std::{path::PathBuf, process::ExitCode};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use queueflow::{
    engine::{RandomSource, RunController},
    experiments::run_experiments,
    parser::{parse_config, ExperimentConfig},
    plot::{Gnuplot, PlotScript},
    Result,
};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Path to the Yaml configuration file, defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the output folder
    #[arg(short, long)]
    pub output: Option<String>,

    /// Seed of the random generator
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Only write the data files, do not call gnuplot
    #[arg(long)]
    pub no_plot: bool,
}

fn load_config(args: &Arguments) -> Result<ExperimentConfig> {
    let mut config = match &args.config {
        Some(path) => parse_config(path)?,
        None => ExperimentConfig::default(),
    };
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.no_plot {
        config.plot = false;
    }
    Ok(config)
}

fn run(args: &Arguments) -> Result<()> {
    let config = load_config(args)?;
    let source = match config.seed {
        Some(seed) => RandomSource::new(seed),
        None => RandomSource::from_entropy(),
    };
    info!(seed = source.seed(), output = %config.output, "starting experiments");

    let mut controller = RunController::new(source);
    let report = run_experiments(&config, &mut controller)?;
    for row in report.arrival_sweep.iter().chain(&report.departure_sweep) {
        info!(?row, "steady state");
    }

    if config.plot {
        Gnuplot::new(&config.output).render(&PlotScript::for_experiments(&config))?;
    } else {
        warn!(output = %config.output, "plotting disabled, only data files were written");
    }
    Ok(())
}

pub fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,queueflow=info")),
        )
        .init();

    let args = Arguments::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
