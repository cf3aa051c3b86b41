//! Borrowers and their tax-advantaged savings accounts.
//!
//! Each borrower holds two independent BSU accounts (the Norwegian
//! "boligsparing for ungdom" scheme): capped yearly contributions, a tax
//! rebate on money actually deposited, and a lifetime balance ceiling.
//! Account 1 is the primary BSU; account 2 mirrors it but earns no rebate
//! and never counts toward mortgage security.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// A borrower as configured by the caller. Immutable for the duration of a
/// run; the engine works on a private [`PersonState`] copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Unique key within a run.
    pub name: String,
    pub birth_date: Date,
    /// Monthly budget allocated toward rent/mortgage/savings.
    pub housing_money: f64,
    pub bsu_balance: f64,
    pub bsu2_balance: f64,
    /// Contribution room left in the current tax year.
    pub bsu_room_left: f64,
    pub bsu2_room_left: f64,
}

impl Person {
    pub fn new(
        name: impl Into<String>,
        birth_date: Date,
        housing_money: f64,
        bsu_balance: f64,
        bsu2_balance: f64,
        bsu_room_left: f64,
        bsu2_room_left: f64,
    ) -> Self {
        Self {
            name: name.into(),
            birth_date,
            housing_money,
            bsu_balance,
            bsu2_balance,
            bsu_room_left,
            bsu2_room_left,
        }
    }
}

/// One tax-advantaged account: balance, remaining yearly contribution room,
/// and whether the account still exists. A liquidated account never
/// reactivates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsAccount {
    pub balance: f64,
    pub room_left: f64,
    pub active: bool,
}

impl SavingsAccount {
    pub fn new(balance: f64, room_left: f64) -> Self {
        Self {
            balance,
            room_left,
            active: true,
        }
    }

    /// Greedily deposit `leftover` into the account, capped by the
    /// remaining contribution room. Returns the money that did not fit.
    ///
    /// Conserves `balance + room_left + leftover`, and exhausts at least
    /// one of room or leftover.
    pub fn fill(&mut self, leftover: f64) -> f64 {
        if self.room_left > leftover {
            self.balance += leftover;
            self.room_left -= leftover;
            0.0
        } else {
            self.balance += self.room_left;
            let remaining = leftover - self.room_left;
            self.room_left = 0.0;
            remaining
        }
    }

    /// Empty the account and retire it permanently. Returns the freed cash.
    pub fn liquidate(&mut self) -> f64 {
        let freed = self.balance;
        self.balance = 0.0;
        self.room_left = 0.0;
        self.active = false;
        freed
    }
}

/// Engine-private mutable state for one borrower.
#[derive(Debug, Clone)]
pub struct PersonState {
    pub birth_date: Date,
    /// This run's monthly contribution (a run variable may override the
    /// configured value).
    pub housing_money: f64,
    pub bsu: SavingsAccount,
    pub bsu2: SavingsAccount,
    /// BSU contribution room at the start of the current tax year; the
    /// January rebate is computed against this ceiling.
    pub bsu_ceiling: f64,
}

impl PersonState {
    pub fn from_person(person: &Person, housing_money: f64) -> Self {
        Self {
            birth_date: person.birth_date,
            housing_money,
            bsu: SavingsAccount::new(person.bsu_balance, person.bsu_room_left),
            bsu2: SavingsAccount::new(person.bsu2_balance, person.bsu2_room_left),
            bsu_ceiling: person.bsu_room_left,
        }
    }

    pub fn account_balance(&self) -> f64 {
        self.bsu.balance + self.bsu2.balance
    }

    pub fn has_active_account(&self) -> bool {
        self.bsu.active || self.bsu2.active
    }
}
