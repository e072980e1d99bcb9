//! Read-only quoting for the three exercise paths.
//!
//! Nothing here mutates the chain, so every function can be called any number
//! of times between settlements without drift.

use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::domain::route::RouteCalculator;
use crate::infrastructure::chain::{Chain, LpPayment};
use crate::shared::errors::{HelperError, HelperResult};
use crate::shared::types::{LpQuote, QuoteResult, Route};
use crate::shared::utils::{bps_of, checked_add, less_bps};
use crate::shared::validation::{validate_amount, validate_percent, validate_slippage};

/// Strike payment plus the lender's fee for borrowing it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrikeQuote {
    pub strike: u64,
    pub flash_fee: u64,
}

impl StrikeQuote {
    /// Payment token owed to the lender once the strike is paid
    pub fn cost(&self) -> HelperResult<u64> {
        checked_add(self.strike, self.flash_fee)
    }
}

/// Everything an LP settlement needs, computed once up front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LpPlan {
    /// Option tokens exercised into the liquidity position
    pub lp_amount: u64,
    /// Option tokens exercised and sold on the route
    pub dump_amount: u64,
    /// Strike for the dumped portion at the option's own discount
    pub dump_cost: u64,
    pub lp_payment: LpPayment,
    pub flash_fee: u64,
    /// Payment token borrowed from the lender
    pub borrow: u64,
    pub quote: LpQuote,
}

impl LpPlan {
    pub fn repayment(&self) -> HelperResult<u64> {
        checked_add(self.borrow, self.flash_fee)
    }
}

pub struct QuoteEngine;

impl QuoteEngine {
    /// Strike for `amount` at `discount_bps` and the fee to borrow it
    pub fn strike_quote<C: Chain>(
        chain: &C,
        option: &Pubkey,
        payment_token: &Pubkey,
        amount: u64,
        discount_bps: u64,
    ) -> HelperResult<StrikeQuote> {
        validate_percent(discount_bps)?;
        let strike = chain.quote_strike_cost(option, amount, discount_bps)?;
        let flash_fee = chain.flash_fee(payment_token, strike)?;
        Ok(StrikeQuote { strike, flash_fee })
    }

    /// Exercise, sell every underlying unit on `route`, keep the payment token.
    pub fn quote_exercise_profit<C: Chain>(
        chain: &C,
        option: &Pubkey,
        route: &Route,
        amount: u64,
        discount_bps: u64,
        profit_slippage_bps: u64,
    ) -> HelperResult<QuoteResult> {
        validate_amount(amount)?;
        validate_slippage(profit_slippage_bps)?;
        let info = chain.option_info(option)?;
        route.validate_between(&info.underlying, &info.payment_token)?;

        let cost = Self::strike_quote(chain, option, &info.payment_token, amount, discount_bps)?
            .cost()?;
        let gross = RouteCalculator::output_of(chain, route, amount)?;
        if cost >= gross {
            return Err(HelperError::CostExceedsProfit {
                cost,
                proceeds: gross,
            });
        }
        let real_profit = less_bps(gross, profit_slippage_bps)?.saturating_sub(cost);

        debug!(option = %option, amount, cost, gross, real_profit, "profit quote");
        Ok(QuoteResult {
            cost,
            expected_profit: gross - cost,
            real_profit,
        })
    }

    /// Exercise, sell just enough underlying to repay, keep the rest.
    ///
    /// Profits are in underlying units; `cost` stays in the payment token.
    pub fn quote_exercise_to_underlying<C: Chain>(
        chain: &C,
        option: &Pubkey,
        route: &Route,
        amount: u64,
        discount_bps: u64,
        profit_slippage_bps: u64,
    ) -> HelperResult<QuoteResult> {
        validate_amount(amount)?;
        validate_slippage(profit_slippage_bps)?;
        let info = chain.option_info(option)?;
        route.validate_between(&info.underlying, &info.payment_token)?;

        let cost = Self::strike_quote(chain, option, &info.payment_token, amount, discount_bps)?
            .cost()?;
        let needed = RouteCalculator::input_for(chain, route, cost)?;
        if needed >= amount {
            return Err(HelperError::CostExceedsProfit {
                cost: needed,
                proceeds: amount,
            });
        }
        let real_profit = less_bps(amount, profit_slippage_bps)?.saturating_sub(needed);

        debug!(option = %option, amount, cost, needed, real_profit, "underlying quote");
        Ok(QuoteResult {
            cost,
            expected_profit: amount - needed,
            real_profit,
        })
    }

    pub fn quote_exercise_lp<C: Chain>(
        chain: &C,
        option: &Pubkey,
        route: &Route,
        amount: u64,
        profit_slippage_bps: u64,
        percent_to_lp_bps: u64,
        discount_bps: u64,
    ) -> HelperResult<LpQuote> {
        Ok(Self::plan_lp(
            chain,
            option,
            route,
            amount,
            profit_slippage_bps,
            percent_to_lp_bps,
            discount_bps,
        )?
        .quote)
    }

    /// Splits `amount` into an LP leg and a dump leg and prices both.
    ///
    /// The dump leg is sold on `route` and its proceeds must cover the whole
    /// loan: its own strike, the LP strike and pairing payment, and the
    /// lender's fee. What is left is the paired-asset surplus.
    pub fn plan_lp<C: Chain>(
        chain: &C,
        option: &Pubkey,
        route: &Route,
        amount: u64,
        profit_slippage_bps: u64,
        percent_to_lp_bps: u64,
        discount_bps: u64,
    ) -> HelperResult<LpPlan> {
        validate_amount(amount)?;
        validate_slippage(profit_slippage_bps)?;
        validate_percent(percent_to_lp_bps)?;
        validate_percent(discount_bps)?;
        let info = chain.option_info(option)?;
        route.validate_between(&info.underlying, &info.payment_token)?;

        let lp_amount = bps_of(amount, percent_to_lp_bps)?;
        let dump_amount = amount - lp_amount;

        let dump_cost = chain.quote_strike_cost(option, dump_amount, info.discount_bps)?;
        let lp_payment = if lp_amount > 0 {
            chain.quote_exercise_lp(option, lp_amount, discount_bps)?
        } else {
            LpPayment {
                payment: 0,
                payment_for_liquidity: 0,
            }
        };
        let borrow = checked_add(dump_cost, lp_payment.total()?)?;
        let flash_fee = chain.flash_fee(&info.payment_token, borrow)?;
        let repayment = checked_add(borrow, flash_fee)?;

        let dump_out = RouteCalculator::output_of(chain, route, dump_amount)?;
        if dump_out <= dump_cost {
            return Err(HelperError::CostExceedsProfit {
                cost: dump_cost,
                proceeds: dump_out,
            });
        }
        if dump_out < repayment {
            return Err(HelperError::InsufficientPairedAsset);
        }

        let lp_amount_out = if lp_amount > 0 {
            chain
                .quote_add_liquidity(
                    &info.underlying,
                    &info.payment_token,
                    info.pair_kind,
                    lp_amount,
                    lp_payment.payment_for_liquidity,
                )?
                .liquidity
        } else {
            0
        };
        let quote = LpQuote {
            profit_slippage: bps_of(dump_out, profit_slippage_bps)?,
            lp_amount_out,
            pair_asset_out: dump_out - repayment,
        };

        debug!(
            option = %option,
            lp_amount,
            dump_amount,
            borrow,
            dump_out,
            lp_amount_out,
            "lp quote"
        );
        Ok(LpPlan {
            lp_amount,
            dump_amount,
            dump_cost,
            lp_payment,
            flash_fee,
            borrow,
            quote,
        })
    }
}
