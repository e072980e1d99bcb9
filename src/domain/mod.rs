//! Domain layer - quoting, routing and settlement of option exercises

pub mod allowance;
pub mod fee;
pub mod flash_loan;
pub mod quote;
pub mod route;
pub mod settlement;
