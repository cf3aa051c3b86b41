//! Calendar arithmetic for the simulation loop.
//!
//! Two concerns live here: O(1) day-difference calculations via Rata Die
//! day-numbering (used for the age threshold, which is defined in days, not
//! calendar years), and the monthly pay-date sequence that drives a run.

use jiff::civil::Date;

use crate::error::{Result, SimulationError};

/// Convert a civil date to a Rata Die day number (days since 0001-01-01).
///
/// Proleptic Gregorian algorithm; O(1) with no `jiff::Span` involved.
#[inline]
fn rata_die(d: Date) -> i32 {
    let y = d.year() as i32;
    let m = d.month() as i32;
    let day = d.day() as i32;

    // Shift March = month 1 so Feb (end of "year") is month 12
    let a = (14 - m) / 12;
    let y2 = y - a;
    let m2 = m + 12 * a - 3;

    day + (153 * m2 + 2) / 5 + 365 * y2 + y2 / 4 - y2 / 100 + y2 / 400 - 306
}

/// Number of days between two dates (d2 - d1). Positive when `d2 > d1`.
#[inline]
pub fn days_between(d1: Date, d2: Date) -> i32 {
    rata_die(d2) - rata_die(d1)
}

/// Build the pay-date sequence for a run: `count - 1` successive monthly
/// dates starting one month after `start`, preserving the day-of-month.
///
/// Fails if `start.day() > 28`, since such a day does not exist in every
/// month.
pub fn month_sequence(start: Date, count: usize) -> Result<MonthSequence> {
    if start.day() > 28 {
        return Err(SimulationError::InvalidStartDate(start));
    }
    Ok(MonthSequence {
        start,
        offset: 1,
        count,
    })
}

/// Lazy, finite iterator over monthly pay dates. See [`month_sequence`].
#[derive(Debug, Clone)]
pub struct MonthSequence {
    start: Date,
    offset: usize,
    count: usize,
}

impl Iterator for MonthSequence {
    type Item = Date;

    fn next(&mut self) -> Option<Date> {
        if self.offset >= self.count {
            return None;
        }
        let months = self.start.month() as i32 + self.offset as i32 - 1;
        let year = self.start.year() as i32 + months / 12;
        let month = months % 12 + 1;
        self.offset += 1;
        Some(jiff::civil::date(
            year as i16,
            month as i8,
            self.start.day(),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count.saturating_sub(self.offset);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MonthSequence {}
