pub mod analyzer;
pub mod engine;
pub mod error;
pub mod experiments;
pub mod parser;
pub mod plot;

pub use error::{Result, SimError};
