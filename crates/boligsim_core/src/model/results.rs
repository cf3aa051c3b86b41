//! Output of a simulation run.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Complete results from a single simulation run.
///
/// All four series are aligned with `dates` and share its length; index 0
/// is the start date with zero cost, zero debt, and the starting wealth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub dates: Vec<Date>,
    /// Running total of money spent on rent and loan interest, net of
    /// account interest and tax rebates (offset at each January).
    pub cumulative_cost: Vec<f64>,
    /// Mortgage plus top loan outstanding after each month.
    pub total_debt: Vec<f64>,
    /// Savings plus account balances, plus home equity once the mortgage
    /// has started.
    pub wealth: Vec<f64>,
    /// Top loan issued at mortgage start; zero if the horizon never
    /// reached the mortgage date.
    pub initial_top_loan: f64,
}

impl SimulationResult {
    pub fn final_cost(&self) -> f64 {
        self.cumulative_cost.last().copied().unwrap_or(0.0)
    }

    pub fn final_debt(&self) -> f64 {
        self.total_debt.last().copied().unwrap_or(0.0)
    }

    pub fn final_wealth(&self) -> f64 {
        self.wealth.last().copied().unwrap_or(0.0)
    }

    /// Index of the first month with the debt fully paid off, if the
    /// mortgage both started and was retired within the horizon.
    pub fn debt_free_index(&self) -> Option<usize> {
        let start = self.total_debt.iter().position(|&d| d > 0.0)?;
        self.total_debt[start..]
            .iter()
            .position(|&d| d == 0.0)
            .map(|i| start + i)
    }
}
