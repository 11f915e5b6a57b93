//! Game domain types.

pub mod checkers;
