//! Simulation configuration.
//!
//! Two layers, both read-only for the duration of a run: [`StartValues`]
//! describes the situation at the start date (borrowers, rent, rates),
//! while [`RunVariables`] carries the inputs an interactive caller edits
//! between runs (housing budgets, mortgage date, liquidation choices).
//! [`SimulationConfig`] bundles both for [`crate::simulation::simulate`].

use jiff::civil::Date;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::Person;

/// Yearly BSU account interest used when the caller does not override it.
pub const DEFAULT_ACCOUNT_INTEREST_PERCENTAGE: f64 = 3.6;

/// Fixed facts at the simulation start date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartValues {
    pub persons: Vec<Person>,
    pub simulation_start_date: Date,
    /// Monthly rent paid during the saving phase.
    pub rent: f64,
    /// Pooled liquid savings at the start date.
    pub deposit: f64,
    /// Yearly BSU account interest, percent.
    pub account_interest_percentage: f64,
    /// Target property value.
    pub mortgage_goal: f64,
    pub top_loan_interest_percentage: f64,
    pub mortgage_interest_percentage: f64,
}

impl StartValues {
    /// The deposit is derived as three months of rent (the refundable
    /// rental deposit that becomes spendable at purchase).
    pub fn new(
        persons: Vec<Person>,
        simulation_start_date: Date,
        rent: f64,
        mortgage_goal: f64,
        top_loan_interest_percentage: f64,
        mortgage_interest_percentage: f64,
    ) -> Self {
        Self {
            persons,
            simulation_start_date,
            rent,
            deposit: 3.0 * rent,
            account_interest_percentage: DEFAULT_ACCOUNT_INTEREST_PERCENTAGE,
            mortgage_goal,
            top_loan_interest_percentage,
            mortgage_interest_percentage,
        }
    }
}

/// Per-run inputs, editable between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunVariables {
    /// Monthly housing budget per borrower; borrowers missing from the map
    /// fall back to their configured `housing_money`.
    pub housing_money: FxHashMap<String, f64>,
    /// Date of the saving-to-mortgage transition.
    pub mortgage_date: Date,
    pub mortgage_goal: f64,
    pub top_loan_interest_percentage: f64,
    pub mortgage_interest_percentage: f64,
    /// Cash out the BSU accounts at mortgage start instead of keeping them
    /// as loan security.
    pub liquidate_bsu: bool,
    pub liquidate_bsu2: bool,
}

impl RunVariables {
    /// Run variables matching the start values, with the mortgage starting
    /// at `mortgage_date` and both accounts kept as security.
    pub fn from_start_values(start: &StartValues, mortgage_date: Date) -> Self {
        Self {
            housing_money: start
                .persons
                .iter()
                .map(|p| (p.name.clone(), p.housing_money))
                .collect(),
            mortgage_date,
            mortgage_goal: start.mortgage_goal,
            top_loan_interest_percentage: start.top_loan_interest_percentage,
            mortgage_interest_percentage: start.mortgage_interest_percentage,
            liquidate_bsu: false,
            liquidate_bsu2: false,
        }
    }
}

/// Everything needed for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub start_values: StartValues,
    pub variables: RunVariables,
}

impl SimulationConfig {
    pub fn new(start_values: StartValues, variables: RunVariables) -> Self {
        Self {
            start_values,
            variables,
        }
    }

    /// Two-borrower example scenario: rent 1000, goal 200 000, 10% top
    /// loan, 1% mortgage, purchase two years in.
    pub fn example() -> Self {
        let start = StartValues::new(
            vec![
                Person::new("p1", jiff::civil::date(1990, 1, 1), 1000.0, 1000.0, 500.0, 1000.0, 1500.0),
                Person::new("p2", jiff::civil::date(1990, 1, 1), 1200.0, 1000.0, 1000.0, 0.0, 0.0),
            ],
            jiff::civil::date(2019, 3, 20),
            1000.0,
            200_000.0,
            10.0,
            1.0,
        );
        let variables = RunVariables::from_start_values(&start, jiff::civil::date(2021, 3, 20));
        Self::new(start, variables)
    }
}
