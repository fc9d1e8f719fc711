use std::fs;

use queueflow::{
    analyzer::ResultRow,
    engine::{RandomSource, RunController, NUM_BLOCKS},
    experiments::run_experiments,
    parser::{ExperimentConfig, RateRange},
    SimError,
};

fn data_lines(path: &std::path::Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(String::from)
        .collect()
}

fn config_in(dir: &tempfile::TempDir) -> ExperimentConfig {
    ExperimentConfig {
        output: dir.path().to_string_lossy().into_owned(),
        seed: Some(11),
        plot: false,
        ..ExperimentConfig::default()
    }
}

#[test]
fn default_experiments_fill_all_data_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let mut controller = RunController::new(RandomSource::new(11));

    let report = run_experiments(&config, &mut controller).unwrap();

    assert_eq!(data_lines(&dir.path().join("averages.pdata")).len(), NUM_BLOCKS);
    assert_eq!(data_lines(&dir.path().join("var_arr.pdata")).len(), 12);
    assert_eq!(data_lines(&dir.path().join("var_dep.pdata")).len(), 9);
    assert_eq!(report.arrival_sweep.len(), 12);
    assert_eq!(report.departure_sweep.len(), 9);

    for row in &report.arrival_sweep {
        let ResultRow::ArrivalSweep {
            arrival_rate,
            average,
            throughput,
        } = *row
        else {
            panic!("expected arrival sweep rows");
        };
        assert!(average > 0.0 && average < 10.0);
        assert!(throughput > 0.0 && throughput <= arrival_rate);
    }
}

#[test]
fn second_invocation_replaces_sweep_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let mut controller = RunController::new(RandomSource::new(11));

    run_experiments(&config, &mut controller).unwrap();
    run_experiments(&config, &mut controller).unwrap();

    assert_eq!(data_lines(&dir.path().join("var_arr.pdata")).len(), 12);
    assert_eq!(data_lines(&dir.path().join("var_dep.pdata")).len(), 9);
}

#[test]
fn unstable_sweep_halts_at_first_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(&dir);
    // μa + μb = 13, so λ = 14 is the first unstable run.
    config.arrival_sweep.arrival_rates = RateRange {
        start: 12.0,
        end: 15.0,
        step: 1.0,
    };
    let mut controller = RunController::new(RandomSource::new(5));

    let err = run_experiments(&config, &mut controller).unwrap_err();
    assert!(err.to_string().starts_with("Sim 2-14: "));
    assert!(matches!(err.root(), SimError::UnstableConfiguration { .. }));

    // Rows of the stable runs are kept, the departure sweep never ran.
    assert_eq!(data_lines(&dir.path().join("var_arr.pdata")).len(), 2);
    assert!(!dir.path().join("var_dep.pdata").exists());
}
