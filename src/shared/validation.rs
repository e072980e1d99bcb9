//! Parameter checks shared by the quote and settlement paths

use crate::shared::constants::MAX_BPS;
use crate::shared::errors::{HelperError, HelperResult};

/// Validates that an amount is greater than zero
pub fn validate_amount(amount: u64) -> HelperResult<()> {
    if amount == 0 {
        return Err(HelperError::ZeroAmount);
    }
    Ok(())
}

/// Validates a slippage tolerance is strictly below 100%
pub fn validate_slippage(slippage_bps: u64) -> HelperResult<()> {
    if slippage_bps >= MAX_BPS {
        return Err(HelperError::SlippageBoundsExceeded(slippage_bps));
    }
    Ok(())
}

/// Validates a share or discount is strictly below 100%
pub fn validate_percent(percent_bps: u64) -> HelperResult<()> {
    if percent_bps >= MAX_BPS {
        return Err(HelperError::PercentOutOfRange(percent_bps));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(validate_amount(0), Err(HelperError::ZeroAmount));
        assert!(validate_amount(1).is_ok());
        assert!(validate_slippage(9_999).is_ok());
        assert_eq!(
            validate_slippage(10_000),
            Err(HelperError::SlippageBoundsExceeded(10_000))
        );
        assert!(validate_percent(0).is_ok());
        assert_eq!(
            validate_percent(10_000),
            Err(HelperError::PercentOutOfRange(10_000))
        );
    }
}
