//! Savings-toward-mortgage simulation library
//!
//! This crate simulates, month by month, the finances of one or more
//! co-borrowers saving toward a home purchase and then servicing a
//! mortgage. It models:
//! - Per-borrower BSU accounts (capped yearly contributions, 20% tax
//!   rebate, lifetime balance ceiling, forced dissolution at the age limit)
//! - Pooled regular savings and rent during the saving phase
//! - A one-shot transition to a mortgage plus top loan, with the BSU
//!   balance optionally kept as loan security
//! - A debt pay-down waterfall and monthly interest costs net of the
//!   mortgage-interest deduction
//!
//! The single entry point is [`simulation::simulate`], which folds the
//! engine over a monthly date sequence and returns aligned time series of
//! cumulative cost, outstanding debt, and net wealth:
//!
//! ```
//! use boligsim_core::config::SimulationConfig;
//! use boligsim_core::simulation::simulate;
//!
//! let config = SimulationConfig::example();
//! let result = simulate(120, &config).unwrap();
//! assert_eq!(result.dates.len(), 120);
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod date_math;
pub mod engine;
pub mod error;
pub mod model;
pub mod simulation;

#[cfg(test)]
mod tests;

pub use config::{RunVariables, SimulationConfig, StartValues};
pub use engine::{SavingsEngine, monthly_rate_from_yearly};
pub use error::{Result, SimulationError};
pub use model::{Person, SimulationResult};
pub use simulation::simulate;
