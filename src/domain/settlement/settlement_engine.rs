//! Public entry points of the exercise helper

use std::collections::HashMap;

use solana_sdk::pubkey::Pubkey;
use tracing::{debug, info};

use crate::domain::fee::{FeeConfig, FeeSplit};
use crate::domain::flash_loan::{
    ExercisePayload, FlashLoanContext, FlashLoanOrchestrator, FlashLoanPayload, LoanState,
    LoanTerms, LpPayload,
};
use crate::domain::quote::{LpPlan, QuoteEngine};
use crate::domain::route::RouteCalculator;
use crate::infrastructure::chain::{Chain, FlashLoanReceiver, OptionToken};
use crate::shared::config::HelperConfig;
use crate::shared::errors::{HelperError, HelperResult};
use crate::shared::types::{
    ExerciseOutcome, ExerciseRequest, LpExerciseOutcome, LpExerciseRequest, LpQuote,
    QuoteResult, Route,
};
use crate::shared::validation::{validate_amount, validate_percent, validate_slippage};

/// Flash-loan backed exerciser for discount options.
///
/// Holds no tokens between calls. Each entry point pulls the caller's option
/// tokens, borrows the strike from the lender, settles inside the lender's
/// callback, pays out, and checks nothing was left behind.
#[derive(Debug)]
pub struct ExerciseHelper {
    address: Pubkey,
    fees: FeeConfig,
    routes: HashMap<Pubkey, Route>,
    flash: FlashLoanContext,
}

impl ExerciseHelper {
    /// New helper at `address` charging the default fee
    pub fn new(address: Pubkey, owner: Pubkey, fee_recipient: Pubkey) -> Self {
        Self {
            address,
            fees: FeeConfig::with_default_fee(owner, fee_recipient),
            routes: HashMap::new(),
            flash: FlashLoanContext::new(),
        }
    }

    /// Builds a helper from a parsed config. Routes are checked for
    /// continuity here; their endpoints are checked against the option when
    /// registered through `set_route`.
    pub fn from_config(address: Pubkey, config: &HelperConfig) -> HelperResult<Self> {
        let fees = FeeConfig::new(config.owner()?, config.fee_recipient()?, config.fee.fee_bps)?;
        let routes = config.routes()?.into_iter().collect();
        Ok(Self {
            address,
            fees,
            routes,
            flash: FlashLoanContext::new(),
        })
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn fee_config(&self) -> &FeeConfig {
        &self.fees
    }

    pub fn loan_state(&self) -> LoanState {
        self.flash.state()
    }

    /// Sell route registered for `option`
    pub fn route(&self, option: &Pubkey) -> HelperResult<&Route> {
        self.routes
            .get(option)
            .ok_or(HelperError::UnsupportedOption(*option))
    }

    pub fn set_fee(&mut self, caller: &Pubkey, recipient: Pubkey, fee_bps: u64) -> HelperResult<()> {
        self.fees.set_fee(caller, recipient, fee_bps)
    }

    pub fn transfer_ownership(&mut self, caller: &Pubkey, new_owner: Pubkey) -> HelperResult<()> {
        self.fees.transfer_ownership(caller, new_owner)
    }

    /// Registers or replaces the route used to sell `option`'s underlying
    /// into its payment token.
    pub fn set_route<C: OptionToken>(
        &mut self,
        chain: &C,
        caller: &Pubkey,
        option: Pubkey,
        route: Route,
    ) -> HelperResult<()> {
        self.fees.ensure_owner(caller)?;
        let info = chain.option_info(&option)?;
        route.validate_between(&info.underlying, &info.payment_token)?;
        info!(option = %option, hops = route.len(), "route registered");
        self.routes.insert(option, route);
        Ok(())
    }

    pub fn get_amounts_out<C: Chain>(
        &self,
        chain: &C,
        amount_in: u64,
        route: &Route,
    ) -> HelperResult<Vec<u64>> {
        RouteCalculator::amounts_out(chain, route, amount_in)
    }

    pub fn get_amounts_in<C: Chain>(
        &self,
        chain: &C,
        amount_out: u64,
        route: &Route,
    ) -> HelperResult<Vec<u64>> {
        RouteCalculator::amounts_in(chain, route, amount_out)
    }

    pub fn quote_exercise_profit<C: Chain>(
        &self,
        chain: &C,
        option: &Pubkey,
        amount: u64,
        discount_bps: u64,
        profit_slippage_bps: u64,
    ) -> HelperResult<QuoteResult> {
        QuoteEngine::quote_exercise_profit(
            chain,
            option,
            self.route(option)?,
            amount,
            discount_bps,
            profit_slippage_bps,
        )
    }

    pub fn quote_exercise_to_underlying<C: Chain>(
        &self,
        chain: &C,
        option: &Pubkey,
        amount: u64,
        discount_bps: u64,
        profit_slippage_bps: u64,
    ) -> HelperResult<QuoteResult> {
        QuoteEngine::quote_exercise_to_underlying(
            chain,
            option,
            self.route(option)?,
            amount,
            discount_bps,
            profit_slippage_bps,
        )
    }

    pub fn quote_exercise_lp<C: Chain>(
        &self,
        chain: &C,
        option: &Pubkey,
        amount: u64,
        profit_slippage_bps: u64,
        percent_to_lp_bps: u64,
        discount_bps: u64,
    ) -> HelperResult<LpQuote> {
        QuoteEngine::quote_exercise_lp(
            chain,
            option,
            self.route(option)?,
            amount,
            profit_slippage_bps,
            percent_to_lp_bps,
            discount_bps,
        )
    }

    /// Exercises `request.option_amount` of the caller's options and pays out
    /// the profit, in the payment token or in underlying.
    ///
    /// Realized profit before the fee is never below the quote's
    /// `real_profit` for the same parameters.
    pub fn exercise<C: Chain>(
        &self,
        chain: &mut C,
        caller: &Pubkey,
        option: &Pubkey,
        request: &ExerciseRequest,
    ) -> HelperResult<ExerciseOutcome> {
        validate_amount(request.option_amount)?;
        validate_slippage(request.profit_slippage_bps)?;
        validate_slippage(request.swap_slippage_bps)?;
        let info = chain.option_info(option)?;
        let quote = if request.receive_underlying {
            self.quote_exercise_to_underlying(
                chain,
                option,
                request.option_amount,
                request.discount_bps,
                request.profit_slippage_bps,
            )?
        } else {
            self.quote_exercise_profit(
                chain,
                option,
                request.option_amount,
                request.discount_bps,
                request.profit_slippage_bps,
            )?
        };
        let strike = QuoteEngine::strike_quote(
            chain,
            option,
            &info.payment_token,
            request.option_amount,
            request.discount_bps,
        )?;

        chain.transfer_from(option, &self.address, caller, &self.address, request.option_amount)?;
        let payload = FlashLoanPayload::Exercise(ExercisePayload {
            option: option.to_bytes(),
            amount: request.option_amount,
            strike: strike.strike,
            discount_bps: request.discount_bps,
            swap_slippage_bps: request.swap_slippage_bps,
            receive_underlying: request.receive_underlying,
        })
        .encode()?;
        self.borrow(chain, &info.payment_token, strike.strike, &payload)?;

        let profit_token = if request.receive_underlying {
            info.underlying
        } else {
            info.payment_token
        };
        let profit = chain.balance_of(&profit_token, &self.address);
        if profit < quote.real_profit {
            return Err(HelperError::ProfitSlippageExceeded {
                realized: profit,
                minimum: quote.real_profit,
            });
        }
        let split = self.disburse(chain, caller, &profit_token, profit)?;

        let payment_dust = if request.receive_underlying {
            let dust = chain.balance_of(&info.payment_token, &self.address);
            self.disburse(chain, caller, &info.payment_token, dust)?;
            dust
        } else {
            0
        };

        self.ensure_no_residue(chain, &[*option, info.underlying, info.payment_token])?;
        info!(
            option = %option,
            caller = %caller,
            amount = request.option_amount,
            profit,
            fee = split.fee,
            receive_underlying = request.receive_underlying,
            "exercise settled"
        );
        Ok(ExerciseOutcome {
            profit_token,
            profit,
            fee: split.fee,
            payment_dust,
        })
    }

    /// Exercises part of the caller's options into a liquidity position
    /// minted to the caller and sells the rest to fund it. The paired-asset
    /// surplus is paid out after the fee.
    pub fn exercise_to_lp<C: Chain>(
        &self,
        chain: &mut C,
        caller: &Pubkey,
        option: &Pubkey,
        request: &LpExerciseRequest,
    ) -> HelperResult<LpExerciseOutcome> {
        validate_amount(request.option_amount)?;
        validate_slippage(request.profit_slippage_bps)?;
        validate_slippage(request.swap_slippage_bps)?;
        validate_percent(request.percent_to_lp_bps)?;
        let plan = QuoteEngine::plan_lp(
            chain,
            option,
            self.route(option)?,
            request.option_amount,
            request.profit_slippage_bps,
            request.percent_to_lp_bps,
            request.discount_bps,
        )?;
        self.settle_lp(chain, caller, option, request, &plan)
    }

    /// Pulls the options and settles an LP exercise against `plan`. The
    /// surplus is checked against the plan's quote, not the current pool.
    fn settle_lp<C: Chain>(
        &self,
        chain: &mut C,
        caller: &Pubkey,
        option: &Pubkey,
        request: &LpExerciseRequest,
        plan: &LpPlan,
    ) -> HelperResult<LpExerciseOutcome> {
        let info = chain.option_info(option)?;
        chain.transfer_from(option, &self.address, caller, &self.address, request.option_amount)?;
        let lp_before = chain.balance_of(&info.lp_token, caller);
        let payload = FlashLoanPayload::Lp(LpPayload {
            option: option.to_bytes(),
            recipient: caller.to_bytes(),
            lp_amount: plan.lp_amount,
            lp_payment: plan.lp_payment.total()?,
            dump_amount: plan.dump_amount,
            dump_cost: plan.dump_cost,
            discount_bps: request.discount_bps,
            swap_slippage_bps: request.swap_slippage_bps,
        })
        .encode()?;
        self.borrow(chain, &info.payment_token, plan.borrow, &payload)?;

        let surplus = chain.balance_of(&info.payment_token, &self.address);
        let minimum = plan.quote.min_pair_asset_out();
        if surplus < minimum {
            return Err(HelperError::ProfitSlippageExceeded {
                realized: surplus,
                minimum,
            });
        }
        let split = self.disburse(chain, caller, &info.payment_token, surplus)?;
        let lp_amount = chain
            .balance_of(&info.lp_token, caller)
            .saturating_sub(lp_before);

        self.ensure_no_residue(
            chain,
            &[*option, info.underlying, info.payment_token, info.lp_token],
        )?;
        info!(
            option = %option,
            caller = %caller,
            amount = request.option_amount,
            lp_amount,
            pair_asset_out = surplus,
            fee = split.fee,
            "lp exercise settled"
        );
        Ok(LpExerciseOutcome {
            lp_token: info.lp_token,
            lp_amount,
            pair_asset_out: surplus,
            fee: split.fee,
        })
    }

    /// Opens the loan window and hands control to the lender
    fn borrow<C: Chain>(
        &self,
        chain: &mut C,
        token: &Pubkey,
        amount: u64,
        payload: &[u8],
    ) -> HelperResult<()> {
        let _guard = self.flash.begin(chain.flash_loan_provider())?;
        debug!(token = %token, amount, "requesting flash loan");
        chain.flash_loan(&self.address, self, &[*token], &[amount], payload)
    }

    /// Sends `amount` of `token` to the caller less the fee
    fn disburse<C: Chain>(
        &self,
        chain: &mut C,
        caller: &Pubkey,
        token: &Pubkey,
        amount: u64,
    ) -> HelperResult<FeeSplit> {
        let split = self.fees.split(amount)?;
        if split.fee > 0 {
            chain.transfer(token, &self.address, &self.fees.recipient(), split.fee)?;
        }
        if split.net > 0 {
            chain.transfer(token, &self.address, caller, split.net)?;
        }
        Ok(split)
    }

    fn ensure_no_residue<C: Chain>(&self, chain: &C, tokens: &[Pubkey]) -> HelperResult<()> {
        for token in tokens {
            let amount = chain.balance_of(token, &self.address);
            if amount > 0 {
                return Err(HelperError::ResidualBalance {
                    token: *token,
                    amount,
                });
            }
        }
        Ok(())
    }
}

impl<C: Chain> FlashLoanReceiver<C> for ExerciseHelper {
    fn receive_flash_loan(
        &self,
        chain: &mut C,
        caller: &Pubkey,
        tokens: &[Pubkey],
        amounts: &[u64],
        fee_amounts: &[u64],
        user_data: &[u8],
    ) -> HelperResult<()> {
        self.flash.enter_callback(caller)?;
        let loan = LoanTerms::single(tokens, amounts, fee_amounts)?;
        let payload = FlashLoanPayload::decode(user_data)?;
        let route = self.route(&payload.option())?;
        match &payload {
            FlashLoanPayload::Exercise(p) => {
                FlashLoanOrchestrator::run_exercise(chain, &self.address, route, p, &loan)?
            }
            FlashLoanPayload::Lp(p) => {
                FlashLoanOrchestrator::run_lp_exercise(chain, &self.address, route, p, &loan)?
            }
        }
        self.flash.begin_repayment()?;
        FlashLoanOrchestrator::repay(chain, &self.address, caller, &loan)
    }
}
