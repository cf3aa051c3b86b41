use std::fmt;

use jiff::civil::Date;

/// Errors surfaced by the simulation entry point.
///
/// Configuration validation (missing fields, non-numeric input) belongs to
/// the caller; the engine assumes well-typed numeric inputs. Contract
/// violations such as starting a mortgage twice are assertions, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// The start date's day-of-month is greater than 28 and cannot be
    /// advanced by whole calendar months (there is no February 30).
    InvalidStartDate(Date),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidStartDate(date) => write!(
                f,
                "start date {date} cannot be advanced by whole months (day-of-month > 28)"
            ),
        }
    }
}

impl std::error::Error for SimulationError {}

pub type Result<T> = std::result::Result<T, SimulationError>;
