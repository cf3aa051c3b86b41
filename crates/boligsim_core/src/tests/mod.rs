//! Integration tests for the savings/mortgage engine
//!
//! Tests are organized by topic:
//! - `engine` - individual engine operations (rates, fills, liquidation,
//!   mortgage origination, the pay-down waterfall)
//! - `rollover` - annual tax-year rollover and the age threshold
//! - `simulation` - end-to-end runs through `simulate`

mod simulation;

use jiff::civil::date;

use crate::config::{RunVariables, SimulationConfig, StartValues};
use crate::model::Person;

/// One borrower, no account balances or room, zero rates everywhere, no
/// starting deposit. A blank slate for debt arithmetic tests.
pub fn single_person_config() -> SimulationConfig {
    let mut start = StartValues::new(
        vec![Person::new(
            "p1",
            date(1990, 1, 1),
            1200.0,
            0.0,
            0.0,
            0.0,
            0.0,
        )],
        date(2019, 3, 20),
        1000.0,
        50_000.0,
        0.0,
        0.0,
    );
    start.deposit = 0.0;
    start.account_interest_percentage = 0.0;

    let mut variables = RunVariables::from_start_values(&start, date(2019, 3, 20));
    variables.liquidate_bsu = true;
    variables.liquidate_bsu2 = true;
    SimulationConfig::new(start, variables)
}

/// Two borrowers with BSU savings, the default 3.6% account rate, and a
/// mortgage two years out.
pub fn couple_config() -> SimulationConfig {
    let start = StartValues::new(
        vec![
            Person::new("p1", date(1990, 1, 1), 1000.0, 1000.0, 500.0, 1000.0, 1500.0),
            Person::new("p2", date(1990, 1, 1), 1200.0, 1000.0, 1000.0, 0.0, 0.0),
        ],
        date(2019, 3, 20),
        1000.0,
        200_000.0,
        10.0,
        1.0,
    );
    let variables = RunVariables::from_start_values(&start, date(2021, 3, 20));
    SimulationConfig::new(start, variables)
}

pub fn assert_close(actual: f64, expected: f64, context: &str) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "{context}: expected {expected}, got {actual}"
    );
}
