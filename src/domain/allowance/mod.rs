//! Allowance domain

mod allowance_manager;

pub use allowance_manager::ensure_allowance;
