//! Pool curves used by the simulated router

use solana_sdk::pubkey::Pubkey;

use crate::shared::constants::MAX_BPS;
use crate::shared::errors::{HelperError, HelperResult};
use crate::shared::types::PoolKind;

/// Locked on first deposit so a pool can never be drained to zero supply
pub const MINIMUM_LIQUIDITY: u64 = 1_000;

/// Pool identity: sorted token pair plus curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolKey {
    pub token0: Pubkey,
    pub token1: Pubkey,
    pub kind: PoolKind,
}

impl PoolKey {
    pub fn new(token_a: Pubkey, token_b: Pubkey, kind: PoolKind) -> Self {
        if token_a <= token_b {
            Self {
                token0: token_a,
                token1: token_b,
                kind,
            }
        } else {
            Self {
                token0: token_b,
                token1: token_a,
                kind,
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimPool {
    pub address: Pubkey,
    pub lp_token: Pubkey,
    pub key: PoolKey,
    pub fee_bps: u64,
}

impl SimPool {
    /// Output for `amount_in` given the reserves on each side
    pub fn amount_out(
        &self,
        amount_in: u64,
        reserve_in: u64,
        reserve_out: u64,
    ) -> HelperResult<u64> {
        if amount_in == 0 {
            return Err(HelperError::ZeroAmount);
        }
        if reserve_in == 0 || reserve_out == 0 {
            return Err(HelperError::InsufficientLiquidity);
        }
        let after_fee = amount_in as u128 * (MAX_BPS - self.fee_bps) as u128;
        let out = match self.key.kind {
            PoolKind::Volatile => {
                let numerator = after_fee * reserve_out as u128;
                let denominator = reserve_in as u128 * MAX_BPS as u128 + after_fee;
                numerator / denominator
            }
            // pegged pair: constant sum less the fee
            PoolKind::Stable => after_fee / MAX_BPS as u128,
        };
        if out >= reserve_out as u128 {
            return Err(HelperError::InsufficientLiquidity);
        }
        Ok(out as u64)
    }

    /// Input required for `amount_out`, rounded up
    pub fn amount_in(
        &self,
        amount_out: u64,
        reserve_in: u64,
        reserve_out: u64,
    ) -> HelperResult<u64> {
        if amount_out == 0 {
            return Err(HelperError::InvalidAmount);
        }
        if reserve_in == 0 || amount_out >= reserve_out {
            return Err(HelperError::InsufficientLiquidity);
        }
        let fee_keep = (MAX_BPS - self.fee_bps) as u128;
        let amount_in = match self.key.kind {
            PoolKind::Volatile => {
                let numerator = reserve_in as u128 * amount_out as u128 * MAX_BPS as u128;
                let denominator = (reserve_out - amount_out) as u128 * fee_keep;
                numerator / denominator + 1
            }
            PoolKind::Stable => (amount_out as u128 * MAX_BPS as u128).div_ceil(fee_keep),
        };
        u64::try_from(amount_in).map_err(|_| HelperError::MathOverflow)
    }

    /// Value of `amount` of the `reserve_in` side at the marginal price
    pub fn spot_value(&self, amount: u64, reserve_in: u64, reserve_out: u64) -> HelperResult<u128> {
        match self.key.kind {
            PoolKind::Volatile => {
                if reserve_in == 0 {
                    return Err(HelperError::InsufficientLiquidity);
                }
                Ok(amount as u128 * reserve_out as u128 / reserve_in as u128)
            }
            PoolKind::Stable => Ok(amount as u128),
        }
    }
}

/// Amounts actually deposited and LP minted for a deposit request
pub fn liquidity_for_deposit(
    amount_a_desired: u64,
    amount_b_desired: u64,
    reserve_a: u64,
    reserve_b: u64,
    total_supply: u64,
) -> HelperResult<(u64, u64, u64)> {
    if total_supply == 0 {
        let root = isqrt(amount_a_desired as u128 * amount_b_desired as u128) as u64;
        let liquidity = root
            .checked_sub(MINIMUM_LIQUIDITY)
            .ok_or(HelperError::InsufficientLiquidity)?;
        return Ok((amount_a_desired, amount_b_desired, liquidity));
    }
    if reserve_a == 0 || reserve_b == 0 {
        return Err(HelperError::InsufficientLiquidity);
    }
    let b_optimal = (amount_a_desired as u128 * reserve_b as u128 / reserve_a as u128) as u64;
    let (amount_a, amount_b) = if b_optimal <= amount_b_desired {
        (amount_a_desired, b_optimal)
    } else {
        let a_optimal = (amount_b_desired as u128 * reserve_a as u128 / reserve_b as u128) as u64;
        (a_optimal, amount_b_desired)
    };
    let by_a = amount_a as u128 * total_supply as u128 / reserve_a as u128;
    let by_b = amount_b as u128 * total_supply as u128 / reserve_b as u128;
    let liquidity = u64::try_from(by_a.min(by_b)).map_err(|_| HelperError::MathOverflow)?;
    if liquidity == 0 {
        return Err(HelperError::InsufficientLiquidity);
    }
    Ok((amount_a, amount_b, liquidity))
}

fn isqrt(value: u128) -> u128 {
    if value < 2 {
        return value;
    }
    let mut x = value;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + value / x) / 2;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(kind: PoolKind, fee_bps: u64) -> SimPool {
        SimPool {
            address: Pubkey::new_unique(),
            lp_token: Pubkey::new_unique(),
            key: PoolKey::new(Pubkey::new_unique(), Pubkey::new_unique(), kind),
            fee_bps,
        }
    }

    #[test]
    fn test_volatile_in_covers_out() {
        let pool = pool(PoolKind::Volatile, 30);
        let out = pool.amount_out(1_000_000, 50_000_000, 80_000_000).unwrap();
        let needed = pool.amount_in(out, 50_000_000, 80_000_000).unwrap();
        assert!(needed <= 1_000_000);
        assert!(pool.amount_out(needed, 50_000_000, 80_000_000).unwrap() >= out);
    }

    #[test]
    fn test_stable_is_fee_only() {
        let pool = pool(PoolKind::Stable, 5);
        assert_eq!(pool.amount_out(10_000, 1_000_000, 1_000_000).unwrap(), 9_995);
        assert_eq!(pool.amount_in(9_995, 1_000_000, 1_000_000).unwrap(), 10_000);
        assert_eq!(
            pool.amount_out(2_000_000, 1_000_000, 1_000_000),
            Err(HelperError::InsufficientLiquidity)
        );
    }

    #[test]
    fn test_first_deposit_locks_minimum() {
        let (a, b, minted) = liquidity_for_deposit(1_000_000, 4_000_000, 0, 0, 0).unwrap();
        assert_eq!((a, b), (1_000_000, 4_000_000));
        assert_eq!(minted, 2_000_000 - MINIMUM_LIQUIDITY);
    }

    #[test]
    fn test_deposit_is_balanced() {
        let (a, b, minted) =
            liquidity_for_deposit(100, 1_000, 1_000, 2_000, 500).unwrap();
        assert_eq!((a, b), (100, 200));
        assert_eq!(minted, 50);
    }
}
