mod person;
mod results;

pub use person::{Person, PersonState, SavingsAccount};
pub use results::SimulationResult;
