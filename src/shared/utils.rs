//! Integer bps arithmetic
//!
//! All products are taken in u128 and narrowed back to u64 with a checked
//! conversion, so no intermediate can wrap.

use crate::shared::constants::MAX_BPS;
use crate::shared::errors::{HelperError, HelperResult};

/// floor(a * b / denominator)
pub fn mul_div(a: u64, b: u64, denominator: u64) -> HelperResult<u64> {
    if denominator == 0 {
        return Err(HelperError::MathOverflow);
    }
    let value = (a as u128)
        .checked_mul(b as u128)
        .ok_or(HelperError::MathOverflow)?
        / denominator as u128;
    u64::try_from(value).map_err(|_| HelperError::MathOverflow)
}

/// ceil(a * b / denominator)
pub fn mul_div_ceil(a: u64, b: u64, denominator: u64) -> HelperResult<u64> {
    if denominator == 0 {
        return Err(HelperError::MathOverflow);
    }
    let product = (a as u128)
        .checked_mul(b as u128)
        .ok_or(HelperError::MathOverflow)?;
    let value = product.div_ceil(denominator as u128);
    u64::try_from(value).map_err(|_| HelperError::MathOverflow)
}

/// The `bps` share of `amount`, rounded down
pub fn bps_of(amount: u64, bps: u64) -> HelperResult<u64> {
    mul_div(amount, bps, MAX_BPS)
}

/// `amount` reduced by `bps`, rounded down
pub fn less_bps(amount: u64, bps: u64) -> HelperResult<u64> {
    let keep = MAX_BPS
        .checked_sub(bps)
        .ok_or(HelperError::SlippageBoundsExceeded(bps))?;
    mul_div(amount, keep, MAX_BPS)
}

/// `amount` grown by `bps`, rounded up
pub fn plus_bps(amount: u64, bps: u64) -> HelperResult<u64> {
    let grow = MAX_BPS.checked_add(bps).ok_or(HelperError::MathOverflow)?;
    mul_div_ceil(amount, grow, MAX_BPS)
}

pub fn checked_add(a: u64, b: u64) -> HelperResult<u64> {
    a.checked_add(b).ok_or(HelperError::MathOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_rounding() {
        assert_eq!(mul_div(10, 3, 4).unwrap(), 7);
        assert_eq!(mul_div_ceil(10, 3, 4).unwrap(), 8);
        assert_eq!(mul_div_ceil(8, 1, 4).unwrap(), 2);
    }

    #[test]
    fn test_mul_div_uses_wide_intermediate() {
        // u64::MAX * 10_000 overflows u64 but not u128
        assert_eq!(mul_div(u64::MAX, 10_000, 10_000).unwrap(), u64::MAX);
        assert_eq!(mul_div(u64::MAX, 2, 1), Err(HelperError::MathOverflow));
        assert_eq!(mul_div(1, 1, 0), Err(HelperError::MathOverflow));
    }

    #[test]
    fn test_bps_helpers() {
        assert_eq!(bps_of(1_000_000, 25).unwrap(), 2_500);
        assert_eq!(less_bps(1_000_000, 800).unwrap(), 920_000);
        assert_eq!(plus_bps(1_000_000, 50).unwrap(), 1_005_000);
        assert_eq!(plus_bps(3, 1).unwrap(), 4);
        assert_eq!(
            less_bps(1, 10_001),
            Err(HelperError::SlippageBoundsExceeded(10_001))
        );
    }
}
