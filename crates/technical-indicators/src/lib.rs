pub mod correlation;
pub mod indicators;

#[cfg(test)]
mod indicators_tests;

pub use correlation::*;
pub use indicators::*;
