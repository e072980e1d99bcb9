//! Shared components - common types, errors, config, and utilities

pub mod config;
pub mod constants;
pub mod errors;
pub mod logging;
pub mod types;
pub mod utils;
pub mod validation;
