//! Test helpers shared across the `stratum_config` workspace.
//!
//! - [`env`] serialises environment mutation and restores prior values, so
//!   tests exercising prefixed environment sources stay hermetic.
//! - [`jail`] runs a test inside a `figment::Jail` temporary directory that
//!   is also the working directory, pre-populated with configuration files.

pub mod env;
pub mod jail;
