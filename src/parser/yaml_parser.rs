use std::{fs, path::Path};

use serde::Deserialize;

use crate::{
    engine::SimParams,
    error::{Result, SimError},
};

/// Upper bound on the number of runs one range may expand to.
pub const MAX_RANGE_VALUES: usize = 1_000_000;

/// Inclusive range of rates, `start, start + step, ..., end`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RateRange {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl RateRange {
    pub fn values(&self) -> Result<Vec<f64>> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "range step must be positive, got {}",
                self.step
            )));
        }
        if !(self.start.is_finite() && self.end.is_finite()) || self.end < self.start {
            return Err(SimError::InvalidConfig(format!(
                "empty rate range {}..={}",
                self.start, self.end
            )));
        }
        // Tolerance so that e.g. 6..=12 step 3 keeps 12 despite rounding.
        let span = ((self.end - self.start) / self.step + 1e-9).floor();
        if !span.is_finite() || span >= MAX_RANGE_VALUES as f64 {
            return Err(SimError::InvalidConfig(format!(
                "rate range {}..={} step {} has more than {MAX_RANGE_VALUES} values",
                self.start, self.end, self.step
            )));
        }
        let count = span as usize + 1;
        Ok((0..count)
            .map(|i| self.start + i as f64 * self.step)
            .collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RatesConfig {
    pub arrival_rate: f64,
    pub server_a_rate: f64,
    pub server_b_rate: f64,
}

impl RatesConfig {
    pub fn params(&self) -> Result<SimParams> {
        SimParams::new(self.arrival_rate, self.server_a_rate, self.server_b_rate)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArrivalSweepConfig {
    pub arrival_rates: RateRange,
    pub server_a_rate: f64,
    pub server_b_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DepartureSweepConfig {
    pub arrival_rate: f64,
    pub server_a_rates: RateRange,
    pub server_b_rates: RateRange,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Directory receiving the data files and the figures.
    pub output: String,
    /// Fixed seed; a fresh one is drawn when absent.
    pub seed: Option<u64>,
    pub plot: bool,
    /// First block counted as steady state by the sweeps.
    pub cutoff: usize,
    pub average: RatesConfig,
    pub arrival_sweep: ArrivalSweepConfig,
    pub departure_sweep: DepartureSweepConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            output: String::from("."),
            seed: None,
            plot: true,
            cutoff: crate::engine::CUTOFF,
            average: RatesConfig {
                arrival_rate: 4.0,
                server_a_rate: 3.0,
                server_b_rate: 5.0,
            },
            arrival_sweep: ArrivalSweepConfig {
                arrival_rates: RateRange {
                    start: 1.0,
                    end: 12.0,
                    step: 1.0,
                },
                server_a_rate: 5.0,
                server_b_rate: 8.0,
            },
            departure_sweep: DepartureSweepConfig {
                arrival_rate: 8.0,
                server_a_rates: RateRange {
                    start: 3.0,
                    end: 5.0,
                    step: 1.0,
                },
                server_b_rates: RateRange {
                    start: 6.0,
                    end: 12.0,
                    step: 3.0,
                },
            },
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cutoff >= crate::engine::NUM_BLOCKS {
            return Err(SimError::InvalidConfig(format!(
                "cutoff {} must be below {} blocks",
                self.cutoff,
                crate::engine::NUM_BLOCKS
            )));
        }
        self.arrival_sweep.arrival_rates.values()?;
        self.departure_sweep.server_a_rates.values()?;
        self.departure_sweep.server_b_rates.values()?;
        Ok(())
    }
}

pub fn parse_str(doc: &str) -> Result<ExperimentConfig> {
    let config: ExperimentConfig = serde_yaml::from_str(doc)?;
    config.validate()?;
    Ok(config)
}

pub fn parse_config(path: &Path) -> Result<ExperimentConfig> {
    let doc = fs::read_to_string(path).map_err(|source| SimError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&doc)
}
