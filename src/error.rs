use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    /// ρ > 1: the chain has no steady state, nothing is simulated.
    #[error("arrival rate {arrival_rate} is greater than total departure rate {total_departure_rate}")]
    UnstableConfiguration {
        arrival_rate: f64,
        total_departure_rate: f64,
    },

    #[error("{name} must be a finite positive number, got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    #[error("could not allocate visit count table for {blocks} blocks: {source}")]
    Allocation {
        blocks: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("aggregation failed: {0}")]
    Aggregation(String),

    #[error("could not write results to {}: {source}", path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read configuration {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("gnuplot failed: {0}")]
    Plot(String),

    #[error("{label}: {source}")]
    Experiment {
        label: String,
        #[source]
        source: Box<SimError>,
    },
}

impl SimError {
    /// Attaches the run label used by the driver when reporting a failure.
    pub fn in_run(self, label: impl Into<String>) -> Self {
        SimError::Experiment {
            label: label.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping experiment labels.
    pub fn root(&self) -> &SimError {
        match self {
            SimError::Experiment { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_prefixed_and_unwrapped() {
        let err = SimError::Aggregation("zero transitions".into()).in_run("Sim 2-3");
        assert_eq!(err.to_string(), "Sim 2-3: aggregation failed: zero transitions");
        assert!(matches!(err.root(), SimError::Aggregation(_)));
    }
}
