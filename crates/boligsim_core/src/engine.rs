//! The savings/mortgage engine.
//!
//! [`SavingsEngine`] owns all mutable state for one run: the borrowers'
//! BSU accounts, the pooled regular savings, and (after the phase
//! transition) the mortgage and top-loan balances. The orchestrator in
//! [`crate::simulation`] calls one operation at a time; each operation
//! returns that month's delta and mutates the engine in place.
//!
//! Money is plain `f64` in currency units. All rate conversions use exact
//! monthly compounding, never the `p/1200` approximation.

use rustc_hash::FxHashMap;

use crate::config::SimulationConfig;
use crate::date_math::days_between;
use crate::model::PersonState;

/// Yearly BSU contribution cap.
pub const ANNUAL_CONTRIBUTION_CAP: f64 = 25_000.0;
/// Lifetime BSU balance ceiling; yearly room shrinks as the balance
/// approaches it.
pub const ACCOUNT_BALANCE_CAP: f64 = 300_000.0;
/// Tax rebate rate on money actually contributed during a tax year.
pub const TAX_REBATE_RATE: f64 = 0.2;
/// Fraction of loan interest surviving the mortgage-interest deduction.
pub const INTEREST_DEDUCTION_FACTOR: f64 = 0.78;
/// Banks lend at most this fraction of the property value (plus BSU
/// security).
pub const LOAN_TO_VALUE_LIMIT: f64 = 0.85;
/// BSU accounts must be dissolved past this age. Defined in days, not
/// calendar years; downstream numbers depend on the day count.
pub const ACCOUNT_AGE_LIMIT_DAYS: i32 = 34 * 365;

/// Exact yearly-percent to monthly-rate conversion:
/// `(1 + p/100)^(1/12) - 1`.
pub fn monthly_rate_from_yearly(yearly_percentage: f64) -> f64 {
    (1.0 + yearly_percentage / 100.0).powf(1.0 / 12.0) - 1.0
}

/// Mutable state for one simulation run.
///
/// Two phases: saving (initial) and repaying (terminal). The transition
/// fires exactly once, via [`SavingsEngine::start_mortgage`].
#[derive(Debug, Clone)]
pub struct SavingsEngine {
    property_value: f64,
    rent: f64,

    mortgage: f64,
    top_loan: f64,
    regular_savings: f64,

    persons: FxHashMap<String, PersonState>,
    total_housing_money: f64,

    // Monthly rates
    account_rate: f64,
    mortgage_rate: f64,
    top_loan_rate: f64,

    started_mortgage: bool,
}

impl SavingsEngine {
    /// Build run state from configuration. The engine copies everything it
    /// needs and never touches the caller's configuration again.
    pub fn new(config: &SimulationConfig) -> Self {
        let start = &config.start_values;
        let vars = &config.variables;

        let persons: FxHashMap<String, PersonState> = start
            .persons
            .iter()
            .map(|person| {
                let housing_money = vars
                    .housing_money
                    .get(&person.name)
                    .copied()
                    .unwrap_or(person.housing_money);
                (
                    person.name.clone(),
                    PersonState::from_person(person, housing_money),
                )
            })
            .collect();
        let total_housing_money = persons.values().map(|p| p.housing_money).sum();

        Self {
            property_value: vars.mortgage_goal,
            rent: start.rent,
            mortgage: 0.0,
            top_loan: 0.0,
            regular_savings: start.deposit,
            persons,
            total_housing_money,
            account_rate: monthly_rate_from_yearly(start.account_interest_percentage),
            mortgage_rate: monthly_rate_from_yearly(vars.mortgage_interest_percentage),
            top_loan_rate: monthly_rate_from_yearly(vars.top_loan_interest_percentage),
            started_mortgage: false,
        }
    }

    pub fn started_mortgage(&self) -> bool {
        self.started_mortgage
    }

    pub fn mortgage(&self) -> f64 {
        self.mortgage
    }

    pub fn top_loan(&self) -> f64 {
        self.top_loan
    }

    pub fn regular_savings(&self) -> f64 {
        self.regular_savings
    }

    pub fn total_debt(&self) -> f64 {
        self.mortgage + self.top_loan
    }

    pub fn person(&self, name: &str) -> Option<&PersonState> {
        self.persons.get(name)
    }

    /// Sum of all BSU and BSU2 balances across borrowers.
    pub fn pooled_account_balance(&self) -> f64 {
        self.persons.values().map(|p| p.account_balance()).sum()
    }

    /// Sum of BSU (account 1) balances only; the security calculation in
    /// [`SavingsEngine::start_mortgage`] ignores BSU2.
    fn pooled_bsu_balance(&self) -> f64 {
        self.persons.values().map(|p| p.bsu.balance).sum()
    }

    /// Fresh per-borrower budget map for one month.
    pub fn monthly_budgets(&self) -> FxHashMap<String, f64> {
        self.persons
            .iter()
            .map(|(name, person)| (name.clone(), person.housing_money))
            .collect()
    }

    /// One month of account interest on top of `interest_so_far`.
    /// Accrued interest earns interest within the tax year before being
    /// realized at the January rollover.
    pub fn monthly_account_interest(&self, interest_so_far: f64) -> f64 {
        interest_so_far + (self.pooled_account_balance() + interest_so_far) * self.account_rate
    }

    /// Closed-form account interest over `months` months from zero accrued
    /// interest. Used once, to seed the partial tax year containing the
    /// start date.
    pub fn several_months_account_interest(&self, months: i32) -> f64 {
        self.pooled_account_balance() * ((1.0 + self.account_rate).powi(months) - 1.0)
    }

    /// Compute this month's housing cost and deduct it from each
    /// borrower's budget. Saving phase: rent, split evenly. Repaying
    /// phase: post-deduction loan interest, split pro rata by configured
    /// housing money.
    pub fn monthly_cost(&self, repaying: bool, budgets: &mut FxHashMap<String, f64>) -> f64 {
        if repaying {
            let cost = (self.mortgage * self.mortgage_rate + self.top_loan * self.top_loan_rate)
                * INTEREST_DEDUCTION_FACTOR;
            for (name, money) in budgets.iter_mut() {
                let share = self.persons[name.as_str()].housing_money / self.total_housing_money;
                *money -= cost * share;
            }
            cost
        } else {
            let share = self.rent / budgets.len() as f64;
            for money in budgets.values_mut() {
                *money -= share;
            }
            self.rent
        }
    }

    /// Move each borrower's leftover money into their BSU accounts,
    /// account 1 first, capped by the remaining yearly room. Liquidated
    /// accounts are skipped.
    pub fn top_up_accounts(&mut self, budgets: &mut FxHashMap<String, f64>) {
        for (name, money) in budgets.iter_mut() {
            let Some(person) = self.persons.get_mut(name) else {
                continue;
            };
            if person.bsu.active && person.bsu.room_left > 0.0 {
                *money = person.bsu.fill(*money);
            }
            if person.bsu2.active && person.bsu2.room_left > 0.0 {
                *money = person.bsu2.fill(*money);
            }
        }
    }

    /// Park leftover money in the pooled regular savings (saving phase).
    pub fn deposit_savings(&mut self, amount: f64) {
        self.regular_savings += amount;
    }

    /// Turn the regular savings plus the requested account subset into
    /// spendable cash. Liquidated accounts are retired permanently;
    /// non-requested accounts stay untouched as loan security.
    pub fn liquidate_accounts(&mut self, pop_bsu: bool, pop_bsu2: bool) -> f64 {
        let mut cash = self.regular_savings;
        self.regular_savings = 0.0;
        for person in self.persons.values_mut() {
            if pop_bsu {
                cash += person.bsu.liquidate();
            }
            if pop_bsu2 {
                cash += person.bsu2.liquidate();
            }
        }
        cash
    }

    /// Originate the mortgage and top loan. Fires exactly once per run.
    ///
    /// The lending limit is 85% of the property value, plus the pooled BSU
    /// balance when it is kept as security. BSU2 never adds borrowing
    /// capacity, even when kept.
    pub fn start_mortgage(&mut self, pop_bsu: bool, pop_bsu2: bool) {
        assert!(!self.started_mortgage, "mortgage already started");

        let security = if pop_bsu { 0.0 } else { self.pooled_bsu_balance() };
        let max_loan = self.property_value * LOAN_TO_VALUE_LIMIT + security;
        let spendable = self.liquidate_accounts(pop_bsu, pop_bsu2);

        self.mortgage = (self.property_value - spendable).min(max_loan);
        self.top_loan = (self.property_value - spendable - max_loan).max(0.0);
        self.started_mortgage = true;
    }

    /// Apply the borrowers' combined leftover money to the debt waterfall:
    /// top loan first, then the mortgage, then regular savings once both
    /// are gone. When a payment exactly clears the mortgage with money to
    /// spare, the surplus is not credited anywhere.
    pub fn pay_down_debt(&mut self, budgets: &FxHashMap<String, f64>) {
        let combined: f64 = budgets.values().sum();
        if self.top_loan > combined {
            self.top_loan -= combined;
        } else if self.top_loan > 0.0 {
            // combined covers the top loan; the remainder reduces the
            // mortgage (top_loan - combined is <= 0)
            self.mortgage += self.top_loan - combined;
            self.top_loan = 0.0;
        } else if self.mortgage > combined {
            self.mortgage -= combined;
        } else if self.mortgage > 0.0 {
            self.mortgage = 0.0;
        } else {
            self.regular_savings += combined;
        }
    }

    /// Start a new tax year: pay out the rebate on last year's BSU
    /// contributions, compound the account balances by twelve months in
    /// one step, and reset the contribution room against the lifetime
    /// balance cap.
    ///
    /// Returns the rebate per borrower; only borrowers with a nonzero BSU
    /// balance earn one. BSU2 compounds and resets but never rebates.
    pub fn annual_rollover(&mut self) -> FxHashMap<String, f64> {
        let year_factor = (1.0 + self.account_rate).powi(12);
        let mut rebates = FxHashMap::default();

        for (name, person) in self.persons.iter_mut() {
            if person.bsu.balance > 0.0 {
                let contributed = person.bsu_ceiling - person.bsu.room_left;
                rebates.insert(name.clone(), TAX_REBATE_RATE * contributed);
            }
            if person.bsu.active {
                person.bsu.balance *= year_factor;
                person.bsu.room_left =
                    ANNUAL_CONTRIBUTION_CAP.min((ACCOUNT_BALANCE_CAP - person.bsu.balance).max(0.0));
                person.bsu_ceiling = person.bsu.room_left;
            }
            if person.bsu2.active {
                person.bsu2.balance *= year_factor;
                person.bsu2.room_left =
                    ANNUAL_CONTRIBUTION_CAP.min((ACCOUNT_BALANCE_CAP - person.bsu2.balance).max(0.0));
            }
        }

        rebates
    }

    /// Borrowers past the account age limit who still hold an open
    /// account, as of `date`.
    pub fn persons_past_age_limit(&self, date: jiff::civil::Date) -> Vec<String> {
        self.persons
            .iter()
            .filter(|(_, person)| {
                person.has_active_account()
                    && days_between(person.birth_date, date) > ACCOUNT_AGE_LIMIT_DAYS
            })
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Dissolve both of a borrower's accounts unconditionally and return
    /// the freed cash. Panics on an unknown borrower; the caller feeds it
    /// names from [`SavingsEngine::persons_past_age_limit`].
    pub fn force_liquidate(&mut self, name: &str) -> f64 {
        let person = self
            .persons
            .get_mut(name)
            .unwrap_or_else(|| panic!("unknown borrower: {name}"));
        person.bsu.liquidate() + person.bsu2.liquidate()
    }

    /// Net wealth: savings and account balances, plus home equity once the
    /// mortgage has started.
    pub fn total_wealth(&self) -> f64 {
        let mut wealth = self.regular_savings + self.pooled_account_balance();
        if self.started_mortgage {
            wealth += self.property_value - self.mortgage - self.top_loan;
        }
        wealth
    }
}
