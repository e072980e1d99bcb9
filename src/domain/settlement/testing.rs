//! Market fixture shared by the settlement and service tests

use solana_sdk::pubkey::Pubkey;

use super::ExerciseHelper;
use crate::infrastructure::chain::{SimulatedChain, TokenLedger};
use crate::shared::types::{Hop, PoolKind, Route};

pub struct Market {
    pub chain: SimulatedChain,
    pub helper: ExerciseHelper,
    pub owner: Pubkey,
    pub fee_recipient: Pubkey,
    pub caller: Pubkey,
    pub option: Pubkey,
    pub underlying: Pubkey,
    pub payment: Pubkey,
    pub lp_token: Pubkey,
}

/// Underlying and payment trade 1:1 in a volatile pool; the option's own
/// discount is 30%.
pub fn market() -> Market {
    let mut chain = SimulatedChain::new();
    let (option, underlying, payment) =
        (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
    let provider = Pubkey::new_unique();
    chain
        .create_pool(
            PoolKind::Volatile,
            underlying,
            payment,
            1_000_000_000,
            1_000_000_000,
            30,
            &provider,
        )
        .unwrap();
    let info = chain
        .create_option(option, underlying, payment, PoolKind::Volatile, 3_000, 500_000_000)
        .unwrap();
    chain.fund_lender(&payment, 10_000_000_000).unwrap();

    let owner = Pubkey::new_unique();
    let fee_recipient = Pubkey::new_unique();
    let mut helper = ExerciseHelper::new(Pubkey::new_unique(), owner, fee_recipient);
    helper
        .set_route(
            &chain,
            &owner,
            option,
            Route::new(vec![Hop::volatile(underlying, payment)]),
        )
        .unwrap();

    Market {
        chain,
        helper,
        owner,
        fee_recipient,
        caller: Pubkey::new_unique(),
        option,
        underlying,
        payment,
        lp_token: info.lp_token,
    }
}

impl Market {
    /// Gives the caller `amount` option tokens and lets the helper pull them
    pub fn fund_caller(&mut self, amount: u64) {
        self.chain.mint(&self.option, &self.caller, amount).unwrap();
        let helper = self.helper.address();
        self.chain
            .approve(&self.option, &self.caller, &helper, u64::MAX)
            .unwrap();
    }

    pub fn helper_balances(&self) -> [u64; 4] {
        let helper = self.helper.address();
        [self.option, self.underlying, self.payment, self.lp_token]
            .map(|token| self.chain.balance_of(&token, &helper))
    }

    pub fn caller_balance(&self, token: &Pubkey) -> u64 {
        self.chain.balance_of(token, &self.caller)
    }
}
