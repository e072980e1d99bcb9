//! In-memory chain implementing every capability the helper consumes.
//! A test host: compiled for this crate's tests and behind the `sim` feature.
//!
//! Balances live in one ledger; pools, option treasuries and the flash lender
//! hold their inventory as ordinary balances, so token totals are conserved
//! across every call. `transact` snapshots the whole state and restores it
//! when the unit of work fails, which is how a reverted transaction behaves.

use std::collections::HashMap;

use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use super::sim_pool::{liquidity_for_deposit, PoolKey, SimPool, MINIMUM_LIQUIDITY};
use super::traits::{
    ExerciseParams, FlashLender, FlashLoanReceiver, LiquidityQuote, LpPayment, LpReceipt,
    OptionInfo, OptionToken, SwapRouter, TokenLedger, Transactional,
};
use crate::shared::constants::MAX_BPS;
use crate::shared::errors::{HelperError, HelperResult};
use crate::shared::types::{Hop, PoolKind, Route};
use crate::shared::utils::{checked_add, mul_div_ceil};

#[derive(Debug, Clone)]
struct SimOption {
    info: OptionInfo,
    treasury: Pubkey,
}

/// Approval issued through `TokenLedger::approve`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalRecord {
    pub token: Pubkey,
    pub owner: Pubkey,
    pub spender: Pubkey,
    pub amount: u64,
}

#[derive(Debug, Clone)]
pub struct SimulatedChain {
    balances: HashMap<(Pubkey, Pubkey), u64>,
    allowances: HashMap<(Pubkey, Pubkey, Pubkey), u64>,
    supplies: HashMap<Pubkey, u64>,
    approvals: Vec<ApprovalRecord>,
    pools: HashMap<PoolKey, SimPool>,
    options: HashMap<Pubkey, SimOption>,
    router: Pubkey,
    lender: Pubkey,
    lender_fee_bps: u64,
    timestamp: u64,
}

impl Default for SimulatedChain {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedChain {
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
            allowances: HashMap::new(),
            supplies: HashMap::new(),
            approvals: Vec::new(),
            pools: HashMap::new(),
            options: HashMap::new(),
            router: Pubkey::new_unique(),
            lender: Pubkey::new_unique(),
            lender_fee_bps: 0,
            timestamp: 1_700_000_000,
        }
    }

    pub fn lender(&self) -> Pubkey {
        self.lender
    }

    pub fn set_lender_fee_bps(&mut self, fee_bps: u64) {
        self.lender_fee_bps = fee_bps;
    }

    pub fn advance_time(&mut self, seconds: u64) {
        self.timestamp = self.timestamp.saturating_add(seconds);
    }

    pub fn approvals(&self) -> &[ApprovalRecord] {
        &self.approvals
    }

    pub fn total_supply(&self, token: &Pubkey) -> u64 {
        self.supplies.get(token).copied().unwrap_or(0)
    }

    pub fn mint(&mut self, token: &Pubkey, to: &Pubkey, amount: u64) -> HelperResult<()> {
        let supply = self.total_supply(token);
        self.supplies.insert(*token, checked_add(supply, amount)?);
        self.credit(token, to, amount)
    }

    fn credit(&mut self, token: &Pubkey, owner: &Pubkey, amount: u64) -> HelperResult<()> {
        let balance = checked_add(self.balance_of(token, owner), amount)?;
        self.balances.insert((*token, *owner), balance);
        Ok(())
    }

    fn burn(&mut self, token: &Pubkey, from: &Pubkey, amount: u64) -> HelperResult<()> {
        self.debit(token, from, amount)?;
        if let Some(supply) = self.supplies.get_mut(token) {
            *supply = supply.saturating_sub(amount);
        }
        Ok(())
    }

    /// Seeds the flash lender with `amount` of `token`
    pub fn fund_lender(&mut self, token: &Pubkey, amount: u64) -> HelperResult<()> {
        let lender = self.lender;
        self.mint(token, &lender, amount)
    }

    /// Creates a pool seeded with the given reserves. The initial LP goes to
    /// `provider`. Returns the LP token.
    #[allow(clippy::too_many_arguments)]
    pub fn create_pool(
        &mut self,
        kind: PoolKind,
        token_a: Pubkey,
        token_b: Pubkey,
        amount_a: u64,
        amount_b: u64,
        fee_bps: u64,
        provider: &Pubkey,
    ) -> HelperResult<Pubkey> {
        let key = PoolKey::new(token_a, token_b, kind);
        let pool = SimPool {
            address: Pubkey::new_unique(),
            lp_token: Pubkey::new_unique(),
            key,
            fee_bps,
        };
        let (_, _, liquidity) = liquidity_for_deposit(amount_a, amount_b, 0, 0, 0)?;
        self.mint(&token_a, &pool.address, amount_a)?;
        self.mint(&token_b, &pool.address, amount_b)?;
        self.mint(&pool.lp_token, &Pubkey::default(), MINIMUM_LIQUIDITY)?;
        self.mint(&pool.lp_token, provider, liquidity)?;
        let lp_token = pool.lp_token;
        self.pools.insert(key, pool);
        Ok(lp_token)
    }

    /// Registers a discount option over an existing underlying/payment pool,
    /// funding its treasury with `underlying_reserve`.
    pub fn create_option(
        &mut self,
        option: Pubkey,
        underlying: Pubkey,
        payment_token: Pubkey,
        pair_kind: PoolKind,
        discount_bps: u64,
        underlying_reserve: u64,
    ) -> HelperResult<OptionInfo> {
        let pool = self.pool(&underlying, &payment_token, pair_kind)?;
        let info = OptionInfo {
            underlying,
            payment_token,
            lp_token: pool.lp_token,
            pair_kind,
            discount_bps,
        };
        self.mint(&underlying, &option, underlying_reserve)?;
        self.options.insert(
            option,
            SimOption {
                info,
                treasury: Pubkey::new_unique(),
            },
        );
        Ok(info)
    }

    /// Strike payments collected by an option
    pub fn option_treasury(&self, option: &Pubkey) -> HelperResult<Pubkey> {
        self.options
            .get(option)
            .map(|o| o.treasury)
            .ok_or(HelperError::UnknownOption(*option))
    }

    pub fn reserves(&self, token_in: &Pubkey, token_out: &Pubkey, kind: PoolKind) -> HelperResult<(u64, u64)> {
        let pool = self.pool(token_in, token_out, kind)?;
        Ok((
            self.balance_of(token_in, &pool.address),
            self.balance_of(token_out, &pool.address),
        ))
    }

    fn pool(&self, token_a: &Pubkey, token_b: &Pubkey, kind: PoolKind) -> HelperResult<SimPool> {
        self.pools
            .get(&PoolKey::new(*token_a, *token_b, kind))
            .cloned()
            .ok_or(HelperError::UnknownPool(*token_a, *token_b))
    }

    fn option(&self, option: &Pubkey) -> HelperResult<SimOption> {
        self.options
            .get(option)
            .cloned()
            .ok_or(HelperError::UnknownOption(*option))
    }

    fn debit(&mut self, token: &Pubkey, owner: &Pubkey, amount: u64) -> HelperResult<()> {
        let available = self.balance_of(token, owner);
        if available < amount {
            return Err(HelperError::InsufficientBalance {
                token: *token,
                available,
                required: amount,
            });
        }
        self.balances.insert((*token, *owner), available - amount);
        Ok(())
    }

    fn spend_allowance(
        &mut self,
        token: &Pubkey,
        owner: &Pubkey,
        spender: &Pubkey,
        amount: u64,
    ) -> HelperResult<()> {
        if owner == spender {
            return Ok(());
        }
        let available = self.allowance(token, owner, spender);
        if available < amount {
            return Err(HelperError::InsufficientAllowance {
                token: *token,
                available,
                required: amount,
            });
        }
        // unlimited approvals are never drawn down
        if available != u64::MAX {
            self.allowances
                .insert((*token, *owner, *spender), available - amount);
        }
        Ok(())
    }

    fn check_deadline(&self, deadline: u64) -> HelperResult<()> {
        if deadline < self.timestamp {
            return Err(HelperError::DeadlineExpired);
        }
        Ok(())
    }

    /// Value of `amount` underlying in payment token at the pool's spot price
    fn spot_payment(&self, info: &OptionInfo, amount: u64) -> HelperResult<u128> {
        let pool = self.pool(&info.underlying, &info.payment_token, info.pair_kind)?;
        let (reserve_u, reserve_p) =
            self.reserves(&info.underlying, &info.payment_token, info.pair_kind)?;
        pool.spot_value(amount, reserve_u, reserve_p)
    }

    fn strike_cost(&self, info: &OptionInfo, amount: u64, discount_bps: u64) -> HelperResult<u64> {
        if discount_bps >= MAX_BPS {
            return Err(HelperError::PercentOutOfRange(discount_bps));
        }
        let spot = self.spot_payment(info, amount)?;
        let cost = (spot * discount_bps as u128).div_ceil(MAX_BPS as u128);
        u64::try_from(cost).map_err(|_| HelperError::MathOverflow)
    }

    fn add_liquidity(
        &mut self,
        info: &OptionInfo,
        funder_u: &Pubkey,
        funder_p: &Pubkey,
        amount_u: u64,
        amount_p: u64,
        recipient: &Pubkey,
    ) -> HelperResult<u64> {
        let pool = self.pool(&info.underlying, &info.payment_token, info.pair_kind)?;
        let (reserve_u, reserve_p) =
            self.reserves(&info.underlying, &info.payment_token, info.pair_kind)?;
        let (used_u, used_p, liquidity) = liquidity_for_deposit(
            amount_u,
            amount_p,
            reserve_u,
            reserve_p,
            self.total_supply(&pool.lp_token),
        )?;
        self.transfer(&info.underlying, funder_u, &pool.address, used_u)?;
        self.transfer(&info.payment_token, funder_p, &pool.address, used_p)?;
        self.mint(&pool.lp_token, recipient, liquidity)?;
        Ok(liquidity)
    }
}

impl TokenLedger for SimulatedChain {
    fn balance_of(&self, token: &Pubkey, owner: &Pubkey) -> u64 {
        self.balances.get(&(*token, *owner)).copied().unwrap_or(0)
    }

    fn allowance(&self, token: &Pubkey, owner: &Pubkey, spender: &Pubkey) -> u64 {
        self.allowances
            .get(&(*token, *owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn approve(
        &mut self,
        token: &Pubkey,
        owner: &Pubkey,
        spender: &Pubkey,
        amount: u64,
    ) -> HelperResult<()> {
        self.allowances.insert((*token, *owner, *spender), amount);
        self.approvals.push(ApprovalRecord {
            token: *token,
            owner: *owner,
            spender: *spender,
            amount,
        });
        Ok(())
    }

    fn transfer(
        &mut self,
        token: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> HelperResult<()> {
        self.debit(token, from, amount)?;
        self.credit(token, to, amount)
    }

    fn transfer_from(
        &mut self,
        token: &Pubkey,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> HelperResult<()> {
        self.spend_allowance(token, from, spender, amount)?;
        self.transfer(token, from, to, amount)
    }

    fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

impl OptionToken for SimulatedChain {
    fn option_info(&self, option: &Pubkey) -> HelperResult<OptionInfo> {
        Ok(self.option(option)?.info)
    }

    fn quote_strike_cost(
        &self,
        option: &Pubkey,
        amount: u64,
        discount_bps: u64,
    ) -> HelperResult<u64> {
        let info = self.option(option)?.info;
        self.strike_cost(&info, amount, discount_bps)
    }

    fn quote_exercise_lp(
        &self,
        option: &Pubkey,
        amount: u64,
        discount_bps: u64,
    ) -> HelperResult<LpPayment> {
        let info = self.option(option)?.info;
        let payment = self.strike_cost(&info, amount, discount_bps)?;
        let balanced = self.spot_payment(&info, amount)?;
        let payment_for_liquidity =
            u64::try_from(balanced + 1).map_err(|_| HelperError::MathOverflow)?;
        Ok(LpPayment {
            payment,
            payment_for_liquidity,
        })
    }

    fn exercise(
        &mut self,
        option: &Pubkey,
        sender: &Pubkey,
        params: ExerciseParams,
    ) -> HelperResult<u64> {
        self.check_deadline(params.deadline)?;
        let SimOption { info, treasury } = self.option(option)?;
        let cost = self.strike_cost(&info, params.amount, params.discount_bps)?;
        if cost > params.max_payment {
            return Err(HelperError::StrikeCostTooHigh {
                cost,
                max_cost: params.max_payment,
            });
        }
        self.burn(option, sender, params.amount)?;
        self.transfer_from(&info.payment_token, option, sender, &treasury, cost)?;
        self.transfer(&info.underlying, option, &params.recipient, params.amount)?;
        debug!(option = %option, amount = params.amount, cost, "option exercised");
        Ok(params.amount)
    }

    fn exercise_to_lp(
        &mut self,
        option: &Pubkey,
        sender: &Pubkey,
        params: ExerciseParams,
    ) -> HelperResult<LpReceipt> {
        self.check_deadline(params.deadline)?;
        let SimOption { info, treasury } = self.option(option)?;
        let quoted = self.quote_exercise_lp(option, params.amount, params.discount_bps)?;
        let total = quoted.total()?;
        if total > params.max_payment {
            return Err(HelperError::StrikeCostTooHigh {
                cost: total,
                max_cost: params.max_payment,
            });
        }
        self.burn(option, sender, params.amount)?;
        self.transfer_from(&info.payment_token, option, sender, &treasury, quoted.payment)?;
        // pull the pairing leg into the option first, then deposit from there
        self.transfer_from(
            &info.payment_token,
            option,
            sender,
            option,
            quoted.payment_for_liquidity,
        )?;
        let held = self.balance_of(&info.payment_token, option);
        let lp_amount = self.add_liquidity(
            &info,
            option,
            option,
            params.amount,
            quoted.payment_for_liquidity,
            &params.recipient,
        )?;
        let used_for_liquidity = held - self.balance_of(&info.payment_token, option);
        let unused = quoted.payment_for_liquidity - used_for_liquidity;
        if unused > 0 {
            self.transfer(&info.payment_token, option, sender, unused)?;
        }
        Ok(LpReceipt {
            payment_used: quoted.payment,
            payment_used_for_liquidity: used_for_liquidity,
            lp_amount,
        })
    }
}

impl SwapRouter for SimulatedChain {
    fn router_address(&self) -> Pubkey {
        self.router
    }

    fn get_amount_out(&self, amount_in: u64, hop: &Hop) -> HelperResult<u64> {
        let pool = self.pool(&hop.token_in, &hop.token_out, hop.kind)?;
        let (reserve_in, reserve_out) = self.reserves(&hop.token_in, &hop.token_out, hop.kind)?;
        pool.amount_out(amount_in, reserve_in, reserve_out)
    }

    fn get_amount_in(&self, amount_out: u64, hop: &Hop) -> HelperResult<u64> {
        let pool = self.pool(&hop.token_in, &hop.token_out, hop.kind)?;
        let (reserve_in, reserve_out) = self.reserves(&hop.token_in, &hop.token_out, hop.kind)?;
        pool.amount_in(amount_out, reserve_in, reserve_out)
    }

    fn quote_add_liquidity(
        &self,
        token_a: &Pubkey,
        token_b: &Pubkey,
        kind: PoolKind,
        amount_a_desired: u64,
        amount_b_desired: u64,
    ) -> HelperResult<LiquidityQuote> {
        let pool = self.pool(token_a, token_b, kind)?;
        let (reserve_a, reserve_b) = self.reserves(token_a, token_b, kind)?;
        let (amount_a, amount_b, liquidity) = liquidity_for_deposit(
            amount_a_desired,
            amount_b_desired,
            reserve_a,
            reserve_b,
            self.total_supply(&pool.lp_token),
        )?;
        Ok(LiquidityQuote {
            amount_a,
            amount_b,
            liquidity,
        })
    }

    fn swap_exact_tokens_for_tokens(
        &mut self,
        sender: &Pubkey,
        amount_in: u64,
        min_out: u64,
        route: &Route,
        recipient: &Pubkey,
        deadline: u64,
    ) -> HelperResult<Vec<u64>> {
        self.check_deadline(deadline)?;
        route.validate()?;
        let mut amounts = Vec::with_capacity(route.len() + 1);
        amounts.push(amount_in);
        let mut current = amount_in;
        for hop in route.hops() {
            current = self.get_amount_out(current, hop)?;
            amounts.push(current);
        }
        if current < min_out {
            return Err(HelperError::InsufficientOutputAmount {
                amount_out: current,
                min_out,
            });
        }

        let router = self.router;
        let first = route.hops()[0];
        let first_pool = self.pool(&first.token_in, &first.token_out, first.kind)?;
        self.transfer_from(&first.token_in, &router, sender, &first_pool.address, amount_in)?;
        for (index, hop) in route.hops().iter().enumerate() {
            let pool = self.pool(&hop.token_in, &hop.token_out, hop.kind)?;
            let to = match route.hops().get(index + 1) {
                Some(next) => self.pool(&next.token_in, &next.token_out, next.kind)?.address,
                None => *recipient,
            };
            self.transfer(&hop.token_out, &pool.address, &to, amounts[index + 1])?;
        }
        Ok(amounts)
    }
}

impl FlashLender for SimulatedChain {
    fn flash_loan_provider(&self) -> Pubkey {
        self.lender
    }

    fn flash_fee(&self, _token: &Pubkey, amount: u64) -> HelperResult<u64> {
        mul_div_ceil(amount, self.lender_fee_bps, MAX_BPS)
    }

    fn flash_loan(
        &mut self,
        recipient: &Pubkey,
        receiver: &dyn FlashLoanReceiver<Self>,
        tokens: &[Pubkey],
        amounts: &[u64],
        user_data: &[u8],
    ) -> HelperResult<()> {
        if tokens.len() != amounts.len() {
            return Err(HelperError::InvalidPayload(
                "tokens and amounts differ in length".to_string(),
            ));
        }
        let lender = self.lender;
        let mut before = Vec::with_capacity(tokens.len());
        let mut fees = Vec::with_capacity(tokens.len());
        for (token, amount) in tokens.iter().zip(amounts) {
            let balance = self.balance_of(token, &lender);
            if balance < *amount {
                return Err(HelperError::InsufficientLiquidity);
            }
            before.push(balance);
            fees.push(self.flash_fee(token, *amount)?);
            self.transfer(token, &lender, recipient, *amount)?;
        }

        receiver.receive_flash_loan(self, &lender, tokens, amounts, &fees, user_data)?;

        for ((token, balance), fee) in tokens.iter().zip(before).zip(fees) {
            if self.balance_of(token, &lender) < checked_add(balance, fee)? {
                return Err(HelperError::FlashLoanNotRepaid);
            }
        }
        Ok(())
    }
}

impl Transactional for SimulatedChain {
    fn transact<T, F>(&mut self, f: F) -> HelperResult<T>
    where
        F: FnOnce(&mut Self) -> HelperResult<T>,
    {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tokens {
        underlying: Pubkey,
        payment: Pubkey,
        option: Pubkey,
    }

    fn setup() -> (SimulatedChain, Tokens, Pubkey) {
        let mut chain = SimulatedChain::new();
        let tokens = Tokens {
            underlying: Pubkey::new_unique(),
            payment: Pubkey::new_unique(),
            option: Pubkey::new_unique(),
        };
        let provider = Pubkey::new_unique();
        chain
            .create_pool(
                PoolKind::Volatile,
                tokens.underlying,
                tokens.payment,
                1_000_000_000,
                500_000_000,
                30,
                &provider,
            )
            .unwrap();
        chain
            .create_option(
                tokens.option,
                tokens.underlying,
                tokens.payment,
                PoolKind::Volatile,
                5_000,
                10_000_000,
            )
            .unwrap();
        (chain, tokens, provider)
    }

    #[test]
    fn test_strike_cost_tracks_spot_and_discount() {
        let (chain, tokens, _) = setup();
        // spot is 0.5 payment per underlying; half of that at 5_000 bps
        assert_eq!(
            chain.quote_strike_cost(&tokens.option, 1_000, 5_000).unwrap(),
            250
        );
        assert_eq!(
            chain.quote_strike_cost(&tokens.option, 1_000, 6_000).unwrap(),
            300
        );
    }

    #[test]
    fn test_exercise_burns_and_pays() {
        let (mut chain, tokens, _) = setup();
        let holder = Pubkey::new_unique();
        chain.mint(&tokens.option, &holder, 1_000).unwrap();
        chain.mint(&tokens.payment, &holder, 1_000).unwrap();
        chain
            .approve(&tokens.payment, &holder, &tokens.option, u64::MAX)
            .unwrap();
        let deadline = chain.timestamp();
        let received = chain
            .exercise(
                &tokens.option,
                &holder,
                ExerciseParams {
                    amount: 1_000,
                    max_payment: 250,
                    recipient: holder,
                    discount_bps: 5_000,
                    deadline,
                },
            )
            .unwrap();
        assert_eq!(received, 1_000);
        assert_eq!(chain.balance_of(&tokens.option, &holder), 0);
        assert_eq!(chain.balance_of(&tokens.payment, &holder), 750);
        assert_eq!(chain.balance_of(&tokens.underlying, &holder), 1_000);
        let treasury = chain.option_treasury(&tokens.option).unwrap();
        assert_eq!(chain.balance_of(&tokens.payment, &treasury), 250);
    }

    #[test]
    fn test_exercise_respects_max_payment_and_deadline() {
        let (mut chain, tokens, _) = setup();
        let holder = Pubkey::new_unique();
        chain.mint(&tokens.option, &holder, 1_000).unwrap();
        let deadline = chain.timestamp();
        let params = ExerciseParams {
            amount: 1_000,
            max_payment: 249,
            recipient: holder,
            discount_bps: 5_000,
            deadline,
        };
        assert_eq!(
            chain.exercise(&tokens.option, &holder, params),
            Err(HelperError::StrikeCostTooHigh {
                cost: 250,
                max_cost: 249
            })
        );
        chain.advance_time(1);
        assert_eq!(
            chain.exercise(&tokens.option, &holder, params),
            Err(HelperError::DeadlineExpired)
        );
    }

    #[test]
    fn test_swap_moves_reserves_and_checks_min_out() {
        let (mut chain, tokens, _) = setup();
        let trader = Pubkey::new_unique();
        chain.mint(&tokens.underlying, &trader, 1_000_000).unwrap();
        let router = chain.router_address();
        chain
            .approve(&tokens.underlying, &trader, &router, u64::MAX)
            .unwrap();
        let route = Route::new(vec![Hop::volatile(tokens.underlying, tokens.payment)]);
        let deadline = chain.timestamp();
        let quoted = chain
            .get_amount_out(1_000_000, &route.hops()[0])
            .unwrap();
        assert!(matches!(
            chain.swap_exact_tokens_for_tokens(&trader, 1_000_000, quoted + 1, &route, &trader, deadline),
            Err(HelperError::InsufficientOutputAmount { .. })
        ));
        let amounts = chain
            .swap_exact_tokens_for_tokens(&trader, 1_000_000, quoted, &route, &trader, deadline)
            .unwrap();
        assert_eq!(amounts, vec![1_000_000, quoted]);
        assert_eq!(chain.balance_of(&tokens.payment, &trader), quoted);
        assert_eq!(
            chain
                .reserves(&tokens.underlying, &tokens.payment, PoolKind::Volatile)
                .unwrap(),
            (1_001_000_000, 500_000_000 - quoted)
        );
    }

    #[test]
    fn test_transact_reverts_on_error() {
        let (mut chain, tokens, _) = setup();
        let holder = Pubkey::new_unique();
        chain.mint(&tokens.payment, &holder, 100).unwrap();
        let sink = Pubkey::new_unique();
        let result: HelperResult<()> = chain.transact(|c| {
            c.transfer(&tokens.payment, &holder, &sink, 60)?;
            c.transfer(&tokens.payment, &holder, &sink, 60)
        });
        assert!(matches!(result, Err(HelperError::InsufficientBalance { .. })));
        assert_eq!(chain.balance_of(&tokens.payment, &holder), 100);
        assert_eq!(chain.balance_of(&tokens.payment, &sink), 0);
    }

    #[test]
    fn test_mint_past_supply_overflows() {
        let (mut chain, tokens, _) = setup();
        let holder = Pubkey::new_unique();
        let supply = chain.total_supply(&tokens.payment);
        chain.mint(&tokens.payment, &holder, u64::MAX - supply).unwrap();
        assert_eq!(
            chain.mint(&tokens.payment, &holder, 1),
            Err(HelperError::MathOverflow)
        );
        assert_eq!(chain.total_supply(&tokens.payment), u64::MAX);
        assert_eq!(chain.balance_of(&tokens.payment, &holder), u64::MAX - supply);
        assert_eq!(
            chain.fund_lender(&tokens.payment, 1),
            Err(HelperError::MathOverflow)
        );
    }

    #[test]
    fn test_unlimited_allowance_is_not_drawn_down() {
        let (mut chain, tokens, _) = setup();
        let owner = Pubkey::new_unique();
        let spender = Pubkey::new_unique();
        chain.mint(&tokens.payment, &owner, 100).unwrap();
        chain.approve(&tokens.payment, &owner, &spender, u64::MAX).unwrap();
        chain
            .transfer_from(&tokens.payment, &spender, &owner, &spender, 40)
            .unwrap();
        assert_eq!(chain.allowance(&tokens.payment, &owner, &spender), u64::MAX);
        chain.approve(&tokens.payment, &owner, &spender, 50).unwrap();
        chain
            .transfer_from(&tokens.payment, &spender, &owner, &spender, 40)
            .unwrap();
        assert_eq!(chain.allowance(&tokens.payment, &owner, &spender), 10);
    }
}
