//! Fixed-point and fee constants

/// Denominator of every bps quantity
pub const MAX_BPS: u64 = 10_000;

/// Hard cap on the settlement fee (1%)
pub const MAX_FEE_BPS: u64 = 100;

/// Fee charged when a config does not set one (0.25%)
pub const DEFAULT_FEE_BPS: u64 = 25;
