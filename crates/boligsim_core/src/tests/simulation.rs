//! End-to-end runs through `simulate`.

use jiff::civil::date;

use super::{assert_close, couple_config, single_person_config};
use crate::config::{RunVariables, SimulationConfig, StartValues};
use crate::engine::{INTEREST_DEDUCTION_FACTOR, monthly_rate_from_yearly};
use crate::error::SimulationError;
use crate::model::Person;
use crate::simulation::simulate;

#[test]
fn test_series_are_aligned() {
    let config = couple_config();
    let result = simulate(60, &config).unwrap();

    assert_eq!(result.dates.len(), 60);
    assert_eq!(result.cumulative_cost.len(), 60);
    assert_eq!(result.total_debt.len(), 60);
    assert_eq!(result.wealth.len(), 60);

    assert_eq!(result.dates[0], date(2019, 3, 20));
    assert!(result.dates.windows(2).all(|w| w[0] < w[1]));
    assert!(result.dates.iter().all(|d| d.day() == 20));

    assert_eq!(result.cumulative_cost[0], 0.0);
    assert_eq!(result.total_debt[0], 0.0);
    // deposit 3000 + account balances 3500
    assert_close(result.wealth[0], 6500.0, "starting wealth");
}

#[test]
fn test_invalid_start_date_is_rejected() {
    let mut config = couple_config();
    config.start_values.simulation_start_date = date(2019, 3, 29);
    let err = simulate(12, &config).unwrap_err();
    assert_eq!(err, SimulationError::InvalidStartDate(date(2019, 3, 29)));
}

/// One borrower, zero rates, zero savings, mortgage from day one:
/// 42_500 mortgage + 7_500 top loan, paid off at 1_200/month.
#[test]
fn test_immediate_mortgage_pays_off() {
    let config = single_person_config();
    let result = simulate(44, &config).unwrap();

    assert_close(result.initial_top_loan, 7_500.0, "top loan at origination");
    assert_close(result.total_debt[1], 50_000.0 - 1_200.0, "first payment");

    // Zero rates, no accounts: no cost ever accrues
    assert!(result.cumulative_cost.iter().all(|&c| c.abs() < 1e-9));

    // 6 payments into the top loan, the 7th spills 900 into the mortgage,
    // then 34 full payments and a final partial one
    assert_close(result.total_debt[7], 41_600.0, "top loan retired");
    assert_close(result.total_debt[41], 800.0, "last 800 outstanding");
    assert_eq!(result.debt_free_index(), Some(42));
    assert_eq!(result.final_debt(), 0.0);

    // The 400 surplus of the final payment vanishes: wealth is exactly the
    // property at payoff, and only then do savings resume
    assert_close(result.wealth[42], 50_000.0, "payoff surplus dropped");
    assert_close(result.wealth[43], 51_200.0, "savings resume after payoff");
}

/// Documents the final-payoff edge of the waterfall: money beyond an
/// exact mortgage payoff is not credited to savings.
#[test]
fn test_surplus_beyond_payoff_is_dropped() {
    let config = single_person_config();
    let result = simulate(44, &config).unwrap();

    // Total paid in: 43 months * 1200 = 51_600. Debt was 50_000, savings
    // after payoff hold only 1_200: the 400 difference went nowhere.
    let paid_in = 43.0 * 1_200.0;
    assert_close(
        paid_in - 50_000.0 - (result.final_wealth() - 50_000.0),
        400.0,
        "unaccounted remainder",
    );
}

/// Two borrowers, mid-year start, mortgage six months out, nonzero account
/// rate: the January entry of the cost series is offset by exactly the
/// year's accrued account interest plus the tax rebate, with the mortgage
/// already running.
#[test]
fn test_january_offsets_interest_and_rebate() {
    let start = StartValues::new(
        vec![
            Person::new("p1", date(1992, 1, 1), 1000.0, 1000.0, 0.0, 5000.0, 0.0),
            Person::new("p2", date(1992, 1, 1), 1000.0, 0.0, 0.0, 0.0, 0.0),
        ],
        date(2019, 6, 15),
        1000.0,
        200_000.0,
        10.0,
        1.0,
    );
    let variables = RunVariables::from_start_values(&start, date(2019, 12, 15));
    let config = SimulationConfig::new(start, variables);

    let result = simulate(10, &config).unwrap();

    // Replay the pre-purchase bookkeeping. Saving months Jul-Nov: p1's 500
    // leftover fills the BSU, p2's 500 goes to savings. December: the
    // origination month still costs nothing (debt is issued after the cost
    // call), p1's full 1000 tops the kept BSU up to 4500, and the savings
    // of 3000 + 5 * 500 are spent on the purchase.
    // security = 3500, so max_loan = 170_000 + 3_500
    assert_close(result.initial_top_loan, 21_000.0, "top loan at origination");
    assert_close(
        result.cumulative_cost[5] - result.cumulative_cost[4],
        1000.0,
        "saving month costs the rent",
    );
    assert_close(
        result.cumulative_cost[6] - result.cumulative_cost[5],
        0.0,
        "origination month costs nothing yet",
    );

    // Interest bookkeeping: seeded for the six months of the partial first
    // tax year, then one month per pay date on the pooled balance as it
    // grows by 500/month deposits (Jul-Nov) and December's full 1000.
    let r = monthly_rate_from_yearly(3.6);
    let mut interest = 1000.0 * ((1.0 + r).powi(6) - 1.0);
    for month in 0..6 {
        let pooled = 1000.0 + 500.0 * month as f64;
        interest += (pooled + interest) * r;
    }
    // Deposits of 5 * 500 + 1000 against 5000 of room: rebate on 3500
    let rebate = 0.2 * 3500.0;
    // January's own cost is loan interest on the post-December debt
    let jan_cost = (173_500.0 * monthly_rate_from_yearly(1.0)
        + 20_000.0 * monthly_rate_from_yearly(10.0))
        * INTEREST_DEDUCTION_FACTOR;

    assert_eq!(result.dates[7], date(2020, 1, 15));
    let jan_increment = result.cumulative_cost[7] - result.cumulative_cost[6];
    assert_close(jan_increment, jan_cost - interest - rebate, "january offset");
}

/// A BSU kept as security keeps filling from leftovers after origination,
/// and only the post-top-up remainder reaches the debt.
#[test]
fn test_kept_bsu_fills_after_origination() {
    let mut start = StartValues::new(
        vec![Person::new(
            "p1",
            date(1990, 1, 1),
            1200.0,
            2000.0,
            0.0,
            3000.0,
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
    variables.liquidate_bsu = false;
    variables.liquidate_bsu2 = true;
    let config = SimulationConfig::new(start, variables);

    let result = simulate(6, &config).unwrap();

    // The kept balance lifts the lending limit: max_loan = 42_500 + 2_000
    assert_close(result.initial_top_loan, 5_500.0, "uncovered remainder");

    // Months 1-2: the whole 1200 fits into the BSU room, nothing reaches
    // the debt. Wealth (balance + equity) shows the deposits landing.
    assert_close(result.total_debt[1], 50_000.0, "no pay-down while room lasts");
    assert_close(result.total_debt[2], 50_000.0, "no pay-down while room lasts");
    assert_close(result.wealth[1], 3_200.0, "bsu fills after origination");
    assert_close(result.wealth[2], 4_400.0, "bsu keeps filling");

    // Month 3: 600 of room left, so 600 of the 1200 spills onto the top
    // loan. No money vanishes: wealth is the full 5_000 plus 600 equity.
    assert_close(result.total_debt[3], 49_400.0, "post-top-up remainder pays down");
    assert_close(result.wealth[3], 5_600.0, "deposit plus equity");
}

/// Past 34 * 365 days of age the accounts are dissolved: interest and
/// rebates stop offsetting the cost from the next January on.
#[test]
fn test_age_limit_stops_account_offsets() {
    let start = StartValues::new(
        vec![Person::new(
            "p1",
            date(1990, 1, 1),
            1500.0,
            5000.0,
            0.0,
            0.0,
            0.0,
        )],
        date(2023, 10, 20),
        1000.0,
        200_000.0,
        10.0,
        1.0,
    );
    // Mortgage far beyond the horizon; the run stays in the saving phase
    let variables = RunVariables::from_start_values(&start, date(2030, 1, 20));
    let config = SimulationConfig::new(start, variables);

    let result = simulate(17, &config).unwrap();

    // 2024-01-20 (the liquidation month) still realizes 2023's interest
    assert_eq!(result.dates[3], date(2024, 1, 20));
    assert!(result.cumulative_cost[3] - result.cumulative_cost[2] < 1000.0);

    // By 2025-01-20 the accounts are gone: nothing offsets the rent
    assert_eq!(result.dates[15], date(2025, 1, 20));
    assert_close(
        result.cumulative_cost[15] - result.cumulative_cost[14],
        1000.0,
        "no offset after forced liquidation",
    );

    // The freed balance (compounded once at the 2024 rollover) moved to
    // regular savings, so wealth keeps it plus every month's leftover
    assert_close(
        result.final_wealth(),
        3000.0 + 5000.0 * 1.036 + 16.0 * 500.0,
        "wealth preserved across liquidation",
    );
}

#[test]
fn test_saving_phase_has_no_debt() {
    let config = couple_config();
    let result = simulate(24, &config).unwrap();
    // Mortgage date is two years out; the horizon ends the month before
    assert!(result.total_debt.iter().all(|&d| d == 0.0));
    assert_eq!(result.initial_top_loan, 0.0);
}

#[test]
fn test_example_round_trips_through_serde() {
    let config = SimulationConfig::example();
    let json = serde_json::to_string(&config).unwrap();
    let back: SimulationConfig = serde_json::from_str(&json).unwrap();
    let a = simulate(48, &config).unwrap();
    let b = simulate(48, &back).unwrap();
    assert_eq!(a.cumulative_cost, b.cumulative_cost);
    assert_eq!(a.total_debt, b.total_debt);
}
