//! Fee and admin domain

mod fee_config;

pub use fee_config::{FeeConfig, FeeSplit};
