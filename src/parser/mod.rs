pub mod yaml_parser;

pub use yaml_parser::{parse_config, ExperimentConfig, RateRange, RatesConfig};
