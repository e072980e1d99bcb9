//! Owner-controlled settlement fee

use solana_sdk::pubkey::Pubkey;
use tracing::info;

use crate::shared::constants::{DEFAULT_FEE_BPS, MAX_FEE_BPS};
use crate::shared::errors::{HelperError, HelperResult};
use crate::shared::utils::bps_of;

/// A disbursed amount split between the fee recipient and the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    pub fee: u64,
    pub net: u64,
}

/// Fee rate, its recipient, and the one address allowed to change them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeConfig {
    owner: Pubkey,
    recipient: Pubkey,
    fee_bps: u64,
}

impl FeeConfig {
    pub fn new(owner: Pubkey, recipient: Pubkey, fee_bps: u64) -> HelperResult<Self> {
        check_fee(fee_bps)?;
        Ok(Self {
            owner,
            recipient,
            fee_bps,
        })
    }

    pub fn with_default_fee(owner: Pubkey, recipient: Pubkey) -> Self {
        Self {
            owner,
            recipient,
            fee_bps: DEFAULT_FEE_BPS,
        }
    }

    pub fn owner(&self) -> Pubkey {
        self.owner
    }

    pub fn recipient(&self) -> Pubkey {
        self.recipient
    }

    pub fn fee_bps(&self) -> u64 {
        self.fee_bps
    }

    pub fn ensure_owner(&self, caller: &Pubkey) -> HelperResult<()> {
        if *caller != self.owner {
            return Err(HelperError::NotOwner(*caller));
        }
        Ok(())
    }

    /// Replaces recipient and rate together; neither changes on failure.
    pub fn set_fee(&mut self, caller: &Pubkey, recipient: Pubkey, fee_bps: u64) -> HelperResult<()> {
        self.ensure_owner(caller)?;
        check_fee(fee_bps)?;
        self.recipient = recipient;
        self.fee_bps = fee_bps;
        info!(recipient = %recipient, fee_bps, "fee updated");
        Ok(())
    }

    pub fn transfer_ownership(&mut self, caller: &Pubkey, new_owner: Pubkey) -> HelperResult<()> {
        self.ensure_owner(caller)?;
        info!(previous = %self.owner, owner = %new_owner, "ownership transferred");
        self.owner = new_owner;
        Ok(())
    }

    pub fn split(&self, amount: u64) -> HelperResult<FeeSplit> {
        let fee = bps_of(amount, self.fee_bps)?;
        Ok(FeeSplit {
            fee,
            net: amount - fee,
        })
    }
}

fn check_fee(fee_bps: u64) -> HelperResult<()> {
    if fee_bps > MAX_FEE_BPS {
        return Err(HelperError::FeeTooHigh(fee_bps));
    }
    Ok(())
}
