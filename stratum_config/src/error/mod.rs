//! Error types produced by the configuration loader.

mod constructors;
mod types;

#[cfg(test)]
mod tests;

pub use types::StratumError;

/// Result alias used throughout the crate.
pub type StratumResult<T> = Result<T, StratumError>;
