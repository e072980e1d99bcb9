//! What happens while the borrowed payment token is in hand

use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use super::payload::{ExercisePayload, LpPayload};
use crate::domain::allowance::ensure_allowance;
use crate::domain::route::RouteCalculator;
use crate::infrastructure::chain::{Chain, ExerciseParams};
use crate::shared::errors::{HelperError, HelperResult};
use crate::shared::types::Route;
use crate::shared::utils::{checked_add, less_bps, plus_bps};

/// The single token loan a callback was handed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanTerms {
    pub token: Pubkey,
    pub amount: u64,
    pub fee: u64,
}

impl LoanTerms {
    /// Reads a one-token loan out of the callback arguments
    pub fn single(tokens: &[Pubkey], amounts: &[u64], fees: &[u64]) -> HelperResult<Self> {
        match (tokens, amounts, fees) {
            ([token], [amount], [fee]) => Ok(Self {
                token: *token,
                amount: *amount,
                fee: *fee,
            }),
            _ => Err(HelperError::InvalidPayload(format!(
                "expected one borrowed token, got {} tokens, {} amounts, {} fees",
                tokens.len(),
                amounts.len(),
                fees.len()
            ))),
        }
    }

    pub fn repayment(&self) -> HelperResult<u64> {
        checked_add(self.amount, self.fee)
    }
}

pub struct FlashLoanOrchestrator;

impl FlashLoanOrchestrator {
    /// Exercises with the borrowed strike and converts enough underlying to
    /// cover repayment. Fails `CostExceedsProfit` when the route can no longer
    /// repay the loan.
    pub fn run_exercise<C: Chain>(
        chain: &mut C,
        helper: &Pubkey,
        route: &Route,
        payload: &ExercisePayload,
        loan: &LoanTerms,
    ) -> HelperResult<()> {
        let option = Pubkey::new_from_array(payload.option);
        let info = chain.option_info(&option)?;
        check_loan_token(loan, &info.payment_token)?;
        let repayment = loan.repayment()?;
        let deadline = chain.timestamp();

        ensure_allowance(chain, &info.payment_token, helper, &option, payload.strike)?;
        let received = chain.exercise(
            &option,
            helper,
            ExerciseParams {
                amount: payload.amount,
                max_payment: payload.strike,
                recipient: *helper,
                discount_bps: payload.discount_bps,
                deadline,
            },
        )?;

        let router = chain.router_address();
        if payload.receive_underlying {
            let held = chain.balance_of(&info.payment_token, helper);
            let shortfall = repayment.saturating_sub(held);
            if shortfall > 0 {
                let needed = RouteCalculator::input_for(chain, route, shortfall)?;
                if needed > received {
                    return Err(HelperError::CostExceedsProfit {
                        cost: needed,
                        proceeds: received,
                    });
                }
                let sell = plus_bps(needed, payload.swap_slippage_bps)?.min(received);
                ensure_allowance(chain, &info.underlying, helper, &router, sell)?;
                chain.swap_exact_tokens_for_tokens(helper, sell, shortfall, route, helper, deadline)?;
                debug!(sold = sell, needed, "sold underlying for repayment");
            }
        } else {
            let quoted = RouteCalculator::output_of(chain, route, received)?;
            if quoted < repayment {
                return Err(HelperError::CostExceedsProfit {
                    cost: repayment,
                    proceeds: quoted,
                });
            }
            let min_out = less_bps(quoted, payload.swap_slippage_bps)?;
            ensure_allowance(chain, &info.underlying, helper, &router, received)?;
            chain.swap_exact_tokens_for_tokens(helper, received, min_out, route, helper, deadline)?;
            debug!(sold = received, quoted, min_out, "sold underlying");
        }

        let proceeds = chain.balance_of(&info.payment_token, helper);
        if proceeds < repayment {
            return Err(HelperError::CostExceedsProfit {
                cost: repayment,
                proceeds,
            });
        }
        Ok(())
    }

    /// Mints the LP leg straight to the recipient, then exercises and sells
    /// the dump leg. The sale has to fund the whole loan.
    pub fn run_lp_exercise<C: Chain>(
        chain: &mut C,
        helper: &Pubkey,
        route: &Route,
        payload: &LpPayload,
        loan: &LoanTerms,
    ) -> HelperResult<()> {
        let option = Pubkey::new_from_array(payload.option);
        let info = chain.option_info(&option)?;
        check_loan_token(loan, &info.payment_token)?;
        let repayment = loan.repayment()?;
        let deadline = chain.timestamp();

        ensure_allowance(chain, &info.payment_token, helper, &option, loan.amount)?;
        if payload.lp_amount > 0 {
            let receipt = chain.exercise_to_lp(
                &option,
                helper,
                ExerciseParams {
                    amount: payload.lp_amount,
                    max_payment: payload.lp_payment,
                    recipient: Pubkey::new_from_array(payload.recipient),
                    discount_bps: payload.discount_bps,
                    deadline,
                },
            )?;
            debug!(
                lp_amount = receipt.lp_amount,
                payment_used = receipt.payment_used,
                payment_used_for_liquidity = receipt.payment_used_for_liquidity,
                "exercised into liquidity"
            );
        }

        let received = chain.exercise(
            &option,
            helper,
            ExerciseParams {
                amount: payload.dump_amount,
                max_payment: payload.dump_cost,
                recipient: *helper,
                discount_bps: info.discount_bps,
                deadline,
            },
        )?;
        let quoted = RouteCalculator::output_of(chain, route, received)?;
        let min_out = less_bps(quoted, payload.swap_slippage_bps)?;
        let router = chain.router_address();
        ensure_allowance(chain, &info.underlying, helper, &router, received)?;
        chain.swap_exact_tokens_for_tokens(helper, received, min_out, route, helper, deadline)?;

        if chain.balance_of(&info.payment_token, helper) < repayment {
            return Err(HelperError::InsufficientPairedAsset);
        }
        Ok(())
    }

    /// Sends principal plus fee back to the lender
    pub fn repay<C: Chain>(
        chain: &mut C,
        helper: &Pubkey,
        lender: &Pubkey,
        loan: &LoanTerms,
    ) -> HelperResult<()> {
        let repayment = loan.repayment()?;
        chain.transfer(&loan.token, helper, lender, repayment)?;
        debug!(token = %loan.token, repayment, "flash loan repaid");
        Ok(())
    }
}

fn check_loan_token(loan: &LoanTerms, payment_token: &Pubkey) -> HelperResult<()> {
    if loan.token != *payment_token {
        return Err(HelperError::InvalidPayload(format!(
            "borrowed {} but the option is paid in {}",
            loan.token, payment_token
        )));
    }
    Ok(())
}
