//! Loan parameters carried through the lender's `user_data`

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;

use crate::shared::errors::{HelperError, HelperResult};

/// Plain exercise: strike is paid from the loan, underlying is sold or kept
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct ExercisePayload {
    pub option: [u8; 32],
    pub amount: u64,
    pub strike: u64,
    pub discount_bps: u64,
    pub swap_slippage_bps: u64,
    pub receive_underlying: bool,
}

/// LP exercise: one leg minted to `recipient` as liquidity, one leg sold
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct LpPayload {
    pub option: [u8; 32],
    pub recipient: [u8; 32],
    pub lp_amount: u64,
    pub lp_payment: u64,
    pub dump_amount: u64,
    pub dump_cost: u64,
    pub discount_bps: u64,
    pub swap_slippage_bps: u64,
}

#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub enum FlashLoanPayload {
    Exercise(ExercisePayload),
    Lp(LpPayload),
}

impl FlashLoanPayload {
    pub fn option(&self) -> Pubkey {
        match self {
            FlashLoanPayload::Exercise(p) => Pubkey::new_from_array(p.option),
            FlashLoanPayload::Lp(p) => Pubkey::new_from_array(p.option),
        }
    }

    pub fn encode(&self) -> HelperResult<Vec<u8>> {
        self.try_to_vec()
            .map_err(|e| HelperError::InvalidPayload(e.to_string()))
    }

    pub fn decode(data: &[u8]) -> HelperResult<Self> {
        Self::try_from_slice(data).map_err(|e| HelperError::InvalidPayload(e.to_string()))
    }
}
