//! The month-by-month orchestration loop.

use crate::config::SimulationConfig;
use crate::date_math::month_sequence;
use crate::engine::SavingsEngine;
use crate::error::Result;
use crate::model::SimulationResult;

/// Run one full simulation over `month_count` months.
///
/// Single-threaded and deterministic: the same configuration always
/// produces the same trajectory. `month_count` must be positive; the
/// output series include the start date, so they all have `month_count`
/// entries.
pub fn simulate(month_count: usize, config: &SimulationConfig) -> Result<SimulationResult> {
    assert!(month_count > 0, "month_count must be positive");

    let start_date = config.start_values.simulation_start_date;
    let mortgage_date = config.variables.mortgage_date;
    let pop_bsu = config.variables.liquidate_bsu;
    let pop_bsu2 = config.variables.liquidate_bsu2;

    let mut engine = SavingsEngine::new(config);

    let mut dates = vec![start_date];
    let mut cumulative_cost = vec![0.0];
    let mut total_debt = vec![0.0];
    let mut wealth = vec![engine.total_wealth()];
    let mut initial_top_loan = 0.0;

    // Interest accrued since the last January rollover; the first tax year
    // is partial, so seed it with the closed form.
    let mut account_interest_this_year =
        engine.several_months_account_interest(start_date.month() as i32);

    for pay_date in month_sequence(start_date, month_count)? {
        let mut budgets = engine.monthly_budgets();
        let repaying = pay_date >= mortgage_date;

        let cost = engine.monthly_cost(repaying, &mut budgets);
        dates.push(pay_date);
        let last_cost = cumulative_cost.last().copied().unwrap_or(0.0);
        cumulative_cost.push(last_cost + cost);

        if pay_date.month() == 1 {
            // New tax year: realize the accrued interest and the rebate as
            // an offset against the cost recorded this month, and hand
            // each borrower their rebate to spend.
            let rebates = engine.annual_rollover();
            let rebate_total: f64 = rebates.values().sum();
            if let Some(entry) = cumulative_cost.last_mut() {
                *entry -= account_interest_this_year + rebate_total;
            }
            account_interest_this_year = 0.0;
            for (name, rebate) in rebates {
                if let Some(money) = budgets.get_mut(&name) {
                    *money += rebate;
                }
            }
        } else {
            account_interest_this_year = engine.monthly_account_interest(account_interest_this_year);
        }

        for name in engine.persons_past_age_limit(pay_date) {
            let freed = engine.force_liquidate(&name);
            if let Some(money) = budgets.get_mut(&name) {
                *money += freed;
            }
        }

        if !repaying {
            engine.top_up_accounts(&mut budgets);
            engine.deposit_savings(budgets.values().sum());
            total_debt.push(0.0);
        } else {
            if !engine.started_mortgage() {
                engine.start_mortgage(pop_bsu, pop_bsu2);
                initial_top_loan = engine.top_loan();
            }
            if !(pop_bsu && pop_bsu2) {
                engine.top_up_accounts(&mut budgets);
            }
            engine.pay_down_debt(&budgets);
            total_debt.push(engine.total_debt());
        }

        wealth.push(engine.total_wealth());
    }

    Ok(SimulationResult {
        dates,
        cumulative_cost,
        total_debt,
        wealth,
        initial_top_loan,
    })
}
