//! TOML configuration for the exercise helper

use anyhow::{Context, Result};
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::{fs, path::Path, str::FromStr};

use crate::shared::constants::DEFAULT_FEE_BPS;
use crate::shared::errors::{HelperError, HelperResult};
use crate::shared::types::{Hop, PoolKind, Route};

fn default_fee_bps() -> u64 {
    DEFAULT_FEE_BPS
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeeCfg {
    pub recipient: String,
    #[serde(default = "default_fee_bps")]
    pub fee_bps: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HopCfg {
    pub token_in: String,
    pub token_out: String,
    #[serde(default)]
    pub stable: bool,
}

/// Sell route for one option token, underlying first
#[derive(Debug, Clone, Deserialize)]
pub struct MarketCfg {
    pub option_token: String,
    pub route: Vec<HopCfg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HelperConfig {
    pub owner: String,
    pub fee: FeeCfg,
    #[serde(default)]
    pub markets: Vec<MarketCfg>,
}

impl HelperConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())
            .with_context(|| format!("read {}", path.as_ref().display()))?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).context("parse helper config")?;
        Ok(cfg)
    }

    pub fn owner(&self) -> HelperResult<Pubkey> {
        parse_pubkey("owner", &self.owner)
    }

    pub fn fee_recipient(&self) -> HelperResult<Pubkey> {
        parse_pubkey("fee.recipient", &self.fee.recipient)
    }

    /// Option token and route of every market, each route checked for
    /// continuity
    pub fn routes(&self) -> HelperResult<Vec<(Pubkey, Route)>> {
        self.markets
            .iter()
            .map(|market| {
                let option = parse_pubkey("markets.option_token", &market.option_token)?;
                let hops = market
                    .route
                    .iter()
                    .map(|hop| {
                        Ok(Hop::new(
                            parse_pubkey("route.token_in", &hop.token_in)?,
                            parse_pubkey("route.token_out", &hop.token_out)?,
                            PoolKind::from_stable(hop.stable),
                        ))
                    })
                    .collect::<HelperResult<Vec<_>>>()?;
                let route = Route::new(hops);
                route
                    .validate()
                    .map_err(|e| HelperError::Config(format!("market {}: {}", option, e)))?;
                Ok((option, route))
            })
            .collect()
    }
}

fn parse_pubkey(field: &str, value: &str) -> HelperResult<Pubkey> {
    Pubkey::from_str(value)
        .map_err(|e| HelperError::Config(format!("{}: invalid address {:?}: {}", field, value, e)))
}
