//! Capabilities the helper consumes from the chain it runs on.
//!
//! Every call that would carry an implicit `msg.sender` on-chain takes the
//! acting address explicitly (`sender`, `owner`, `spender`).

use solana_sdk::pubkey::Pubkey;

use crate::shared::errors::HelperResult;
use crate::shared::types::{Hop, PoolKind, Route};

/// Fungible token balances and approvals
pub trait TokenLedger {
    fn balance_of(&self, token: &Pubkey, owner: &Pubkey) -> u64;

    fn allowance(&self, token: &Pubkey, owner: &Pubkey, spender: &Pubkey) -> u64;

    fn approve(
        &mut self,
        token: &Pubkey,
        owner: &Pubkey,
        spender: &Pubkey,
        amount: u64,
    ) -> HelperResult<()>;

    fn transfer(&mut self, token: &Pubkey, from: &Pubkey, to: &Pubkey, amount: u64)
        -> HelperResult<()>;

    fn transfer_from(
        &mut self,
        token: &Pubkey,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> HelperResult<()>;

    /// Current block timestamp, used as the deadline for nested calls
    fn timestamp(&self) -> u64;
}

/// Static description of a discount option token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionInfo {
    pub underlying: Pubkey,
    pub payment_token: Pubkey,
    /// LP token of the underlying/payment pair minted by `exercise_to_lp`
    pub lp_token: Pubkey,
    pub pair_kind: PoolKind,
    /// Discount applied by a plain exercise
    pub discount_bps: u64,
}

/// Arguments shared by both exercise flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseParams {
    pub amount: u64,
    pub max_payment: u64,
    pub recipient: Pubkey,
    pub discount_bps: u64,
    pub deadline: u64,
}

/// Payment split of an LP exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LpPayment {
    pub payment: u64,
    pub payment_for_liquidity: u64,
}

impl LpPayment {
    pub fn total(&self) -> HelperResult<u64> {
        crate::shared::utils::checked_add(self.payment, self.payment_for_liquidity)
    }
}

/// Result of `OptionToken::exercise_to_lp`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LpReceipt {
    pub payment_used: u64,
    pub payment_used_for_liquidity: u64,
    pub lp_amount: u64,
}

/// Discount option contracts, addressed by their token
pub trait OptionToken {
    fn option_info(&self, option: &Pubkey) -> HelperResult<OptionInfo>;

    fn quote_strike_cost(&self, option: &Pubkey, amount: u64, discount_bps: u64)
        -> HelperResult<u64>;

    fn quote_exercise_lp(
        &self,
        option: &Pubkey,
        amount: u64,
        discount_bps: u64,
    ) -> HelperResult<LpPayment>;

    /// Burns `params.amount` option tokens from `sender`, pulls the strike
    /// payment from `sender` and sends underlying to `params.recipient`.
    /// Returns the underlying delivered.
    fn exercise(
        &mut self,
        option: &Pubkey,
        sender: &Pubkey,
        params: ExerciseParams,
    ) -> HelperResult<u64>;

    /// Like `exercise`, but pairs the underlying with more payment token and
    /// mints the LP position to `params.recipient`.
    fn exercise_to_lp(
        &mut self,
        option: &Pubkey,
        sender: &Pubkey,
        params: ExerciseParams,
    ) -> HelperResult<LpReceipt>;
}

/// Amounts an add-liquidity call would use and mint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityQuote {
    pub amount_a: u64,
    pub amount_b: u64,
    pub liquidity: u64,
}

/// AMM router over volatile and stable pools
pub trait SwapRouter {
    fn router_address(&self) -> Pubkey;

    /// Output of a single hop for `amount_in`
    fn get_amount_out(&self, amount_in: u64, hop: &Hop) -> HelperResult<u64>;

    /// Input a single hop needs to produce `amount_out`
    fn get_amount_in(&self, amount_out: u64, hop: &Hop) -> HelperResult<u64>;

    fn quote_add_liquidity(
        &self,
        token_a: &Pubkey,
        token_b: &Pubkey,
        kind: PoolKind,
        amount_a_desired: u64,
        amount_b_desired: u64,
    ) -> HelperResult<LiquidityQuote>;

    /// Pulls `amount_in` from `sender` (router must be approved) and sends the
    /// final output to `recipient`. Returns per-hop amounts.
    #[allow(clippy::too_many_arguments)]
    fn swap_exact_tokens_for_tokens(
        &mut self,
        sender: &Pubkey,
        amount_in: u64,
        min_out: u64,
        route: &Route,
        recipient: &Pubkey,
        deadline: u64,
    ) -> HelperResult<Vec<u64>>;
}

/// Callback side of a flash loan
pub trait FlashLoanReceiver<C: ?Sized> {
    fn receive_flash_loan(
        &self,
        chain: &mut C,
        caller: &Pubkey,
        tokens: &[Pubkey],
        amounts: &[u64],
        fee_amounts: &[u64],
        user_data: &[u8],
    ) -> HelperResult<()>;
}

/// Uncollateralized single-transaction lender
pub trait FlashLender {
    fn flash_loan_provider(&self) -> Pubkey;

    /// Fee the lender charges on top of `amount`
    fn flash_fee(&self, token: &Pubkey, amount: u64) -> HelperResult<u64>;

    /// Sends `amounts` to `recipient`, invokes `receiver`, and fails unless
    /// every amount plus its fee is back with the lender afterwards.
    fn flash_loan(
        &mut self,
        recipient: &Pubkey,
        receiver: &dyn FlashLoanReceiver<Self>,
        tokens: &[Pubkey],
        amounts: &[u64],
        user_data: &[u8],
    ) -> HelperResult<()>;
}

/// Revert-on-error execution of a unit of work
pub trait Transactional {
    fn transact<T, F>(&mut self, f: F) -> HelperResult<T>
    where
        F: FnOnce(&mut Self) -> HelperResult<T>;
}

/// Everything the settlement engine needs from its host
pub trait Chain: TokenLedger + OptionToken + SwapRouter + FlashLender {}

impl<T> Chain for T where T: TokenLedger + OptionToken + SwapRouter + FlashLender {}
