//! Common types used across the helper

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::shared::errors::{HelperError, HelperResult};

/// Pool curve a hop is routed through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolKind {
    Volatile,
    Stable,
}

impl PoolKind {
    pub fn from_stable(stable: bool) -> Self {
        if stable {
            PoolKind::Stable
        } else {
            PoolKind::Volatile
        }
    }

    pub fn is_stable(&self) -> bool {
        matches!(self, PoolKind::Stable)
    }
}

/// One swap leg between two tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hop {
    pub token_in: Pubkey,
    pub token_out: Pubkey,
    pub kind: PoolKind,
}

impl Hop {
    pub fn new(token_in: Pubkey, token_out: Pubkey, kind: PoolKind) -> Self {
        Self {
            token_in,
            token_out,
            kind,
        }
    }

    pub fn volatile(token_in: Pubkey, token_out: Pubkey) -> Self {
        Self::new(token_in, token_out, PoolKind::Volatile)
    }

    pub fn stable(token_in: Pubkey, token_out: Pubkey) -> Self {
        Self::new(token_in, token_out, PoolKind::Stable)
    }
}

/// Ordered hop list, immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Route {
    hops: Vec<Hop>,
}

impl Route {
    pub fn new(hops: Vec<Hop>) -> Self {
        Self { hops }
    }

    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn token_in(&self) -> Option<Pubkey> {
        self.hops.first().map(|hop| hop.token_in)
    }

    pub fn token_out(&self) -> Option<Pubkey> {
        self.hops.last().map(|hop| hop.token_out)
    }

    /// Checks the route is non-empty and every hop starts where the previous
    /// one ended.
    pub fn validate(&self) -> HelperResult<()> {
        if self.hops.is_empty() {
            return Err(HelperError::PathTooShort);
        }
        for (index, pair) in self.hops.windows(2).enumerate() {
            if pair[0].token_out != pair[1].token_in {
                return Err(HelperError::InvalidRoute(format!(
                    "hop {} ends at {} but hop {} starts at {}",
                    index,
                    pair[0].token_out,
                    index + 1,
                    pair[1].token_in
                )));
            }
        }
        Ok(())
    }

    /// Validates the route and checks it connects `from` to `to`.
    pub fn validate_between(&self, from: &Pubkey, to: &Pubkey) -> HelperResult<()> {
        self.validate()?;
        if self.token_in().as_ref() != Some(from) || self.token_out().as_ref() != Some(to) {
            return Err(HelperError::InvalidRoute(format!(
                "route must go from {} to {}",
                from, to
            )));
        }
        Ok(())
    }
}

impl From<Vec<Hop>> for Route {
    fn from(hops: Vec<Hop>) -> Self {
        Self::new(hops)
    }
}

/// Parameters of a plain exercise, built per call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseRequest {
    pub option_amount: u64,
    pub discount_bps: u64,
    pub profit_slippage_bps: u64,
    pub swap_slippage_bps: u64,
    pub receive_underlying: bool,
}

/// Parameters of an exercise that mints a liquidity position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LpExerciseRequest {
    pub option_amount: u64,
    pub discount_bps: u64,
    pub profit_slippage_bps: u64,
    pub swap_slippage_bps: u64,
    pub percent_to_lp_bps: u64,
}

/// Quote for the profit and underlying exercise paths.
///
/// `cost` is in the payment token; the two profit fields are in whichever
/// token the quoted path pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteResult {
    pub cost: u64,
    pub expected_profit: u64,
    pub real_profit: u64,
}

/// Quote for the LP exercise path, an estimate rather than a bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LpQuote {
    pub profit_slippage: u64,
    pub lp_amount_out: u64,
    pub pair_asset_out: u64,
}

impl LpQuote {
    /// Smallest paired-asset surplus a settlement may return
    pub fn min_pair_asset_out(&self) -> u64 {
        self.pair_asset_out.saturating_sub(self.profit_slippage)
    }
}

/// What a settled exercise paid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseOutcome {
    pub profit_token: Pubkey,
    pub profit: u64,
    pub fee: u64,
    pub payment_dust: u64,
}

/// What a settled LP exercise paid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LpExerciseOutcome {
    pub lp_token: Pubkey,
    pub lp_amount: u64,
    pub pair_asset_out: u64,
    pub fee: u64,
}
