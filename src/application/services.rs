//! Application services and use cases

use solana_sdk::pubkey::Pubkey;
use tracing::{info, warn};

use crate::domain::settlement::ExerciseHelper;
use crate::infrastructure::chain::{Chain, Transactional};
use crate::shared::errors::HelperResult;
use crate::shared::types::{
    ExerciseOutcome, ExerciseRequest, LpExerciseOutcome, LpExerciseRequest, LpQuote,
    QuoteResult, Route,
};

/// Runs helper entry points as atomic transactions on a chain.
///
/// A failed settlement leaves the chain exactly as it was before the call.
pub struct ExerciseService<C> {
    helper: ExerciseHelper,
    chain: C,
}

impl<C: Chain + Transactional> ExerciseService<C> {
    pub fn new(helper: ExerciseHelper, chain: C) -> Self {
        Self { helper, chain }
    }

    pub fn helper(&self) -> &ExerciseHelper {
        &self.helper
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    pub fn chain_mut(&mut self) -> &mut C {
        &mut self.chain
    }

    pub fn into_parts(self) -> (ExerciseHelper, C) {
        (self.helper, self.chain)
    }

    pub fn exercise(
        &mut self,
        caller: &Pubkey,
        option: &Pubkey,
        request: &ExerciseRequest,
    ) -> HelperResult<ExerciseOutcome> {
        let helper = &self.helper;
        let result = self
            .chain
            .transact(|chain| helper.exercise(chain, caller, option, request));
        match &result {
            Ok(outcome) => info!(
                caller = %caller,
                option = %option,
                profit = outcome.profit,
                fee = outcome.fee,
                "exercise accepted"
            ),
            Err(e) => warn!(caller = %caller, option = %option, error = %e, "exercise rejected"),
        }
        result
    }

    pub fn exercise_to_lp(
        &mut self,
        caller: &Pubkey,
        option: &Pubkey,
        request: &LpExerciseRequest,
    ) -> HelperResult<LpExerciseOutcome> {
        let helper = &self.helper;
        let result = self
            .chain
            .transact(|chain| helper.exercise_to_lp(chain, caller, option, request));
        match &result {
            Ok(outcome) => info!(
                caller = %caller,
                option = %option,
                lp_amount = outcome.lp_amount,
                pair_asset_out = outcome.pair_asset_out,
                "lp exercise accepted"
            ),
            Err(e) => warn!(caller = %caller, option = %option, error = %e, "lp exercise rejected"),
        }
        result
    }

    pub fn quote_exercise_profit(
        &self,
        option: &Pubkey,
        amount: u64,
        discount_bps: u64,
        profit_slippage_bps: u64,
    ) -> HelperResult<QuoteResult> {
        self.helper
            .quote_exercise_profit(&self.chain, option, amount, discount_bps, profit_slippage_bps)
    }

    pub fn quote_exercise_to_underlying(
        &self,
        option: &Pubkey,
        amount: u64,
        discount_bps: u64,
        profit_slippage_bps: u64,
    ) -> HelperResult<QuoteResult> {
        self.helper.quote_exercise_to_underlying(
            &self.chain,
            option,
            amount,
            discount_bps,
            profit_slippage_bps,
        )
    }

    pub fn quote_exercise_lp(
        &self,
        option: &Pubkey,
        amount: u64,
        profit_slippage_bps: u64,
        percent_to_lp_bps: u64,
        discount_bps: u64,
    ) -> HelperResult<LpQuote> {
        self.helper.quote_exercise_lp(
            &self.chain,
            option,
            amount,
            profit_slippage_bps,
            percent_to_lp_bps,
            discount_bps,
        )
    }

    pub fn set_fee(&mut self, caller: &Pubkey, recipient: Pubkey, fee_bps: u64) -> HelperResult<()> {
        self.helper.set_fee(caller, recipient, fee_bps)
    }

    pub fn set_route(&mut self, caller: &Pubkey, option: Pubkey, route: Route) -> HelperResult<()> {
        self.helper.set_route(&self.chain, caller, option, route)
    }

    pub fn transfer_ownership(&mut self, caller: &Pubkey, new_owner: Pubkey) -> HelperResult<()> {
        self.helper.transfer_ownership(caller, new_owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settlement::testing::market;
    use crate::infrastructure::chain::{SimulatedChain, TokenLedger};
    use crate::shared::config::HelperConfig;
    use crate::shared::errors::HelperError;
    use crate::shared::logging::init_logging;

    fn request(amount: u64) -> ExerciseRequest {
        ExerciseRequest {
            option_amount: amount,
            discount_bps: 35,
            profit_slippage_bps: 800,
            swap_slippage_bps: 50,
            receive_underlying: false,
        }
    }

    fn service() -> (ExerciseService<SimulatedChain>, Pubkey, Pubkey, Pubkey) {
        let mut m = market();
        m.fund_caller(10_000);
        let (caller, option, payment) = (m.caller, m.option, m.payment);
        (ExerciseService::new(m.helper, m.chain), caller, option, payment)
    }

    #[test]
    fn test_accepted_exercise_pays_caller() {
        let _ = init_logging("debug");
        let (mut service, caller, option, payment) = service();
        let quote = service.quote_exercise_profit(&option, 1_000, 35, 800).unwrap();
        let outcome = service.exercise(&caller, &option, &request(1_000)).unwrap();
        assert!(outcome.profit >= quote.real_profit);
        assert_eq!(
            service.chain().balance_of(&payment, &caller),
            outcome.profit - outcome.fee
        );
        assert_eq!(service.chain().balance_of(&option, &caller), 9_000);
    }

    #[test]
    fn test_rejected_exercise_leaves_no_trace() {
        let (mut service, caller, option, payment) = service();
        let approvals = service.chain().approvals().len();
        // more options than the caller holds: fails after nothing was moved
        let result = service.exercise(&caller, &option, &request(20_000));
        assert!(matches!(result, Err(HelperError::InsufficientBalance { .. })));
        assert_eq!(service.chain().balance_of(&option, &caller), 10_000);
        assert_eq!(service.chain().balance_of(&payment, &caller), 0);
        assert_eq!(service.chain().approvals().len(), approvals);
    }

    #[test]
    fn test_lp_quote_and_admin_through_service() {
        let (mut service, caller, option, _) = service();
        assert!(service.quote_exercise_lp(&option, 10_000, 500, 2_000, 2_000).is_ok());
        assert!(service.quote_exercise_to_underlying(&option, 10_000, 35, 800).is_ok());
        assert_eq!(
            service.set_fee(&caller, caller, 10),
            Err(HelperError::NotOwner(caller))
        );
        let owner = service.helper().fee_config().owner();
        service.transfer_ownership(&owner, caller).unwrap();
        service.set_fee(&caller, caller, 10).unwrap();
        assert_eq!(service.helper().fee_config().fee_bps(), 10);
    }

    #[test]
    fn test_helper_from_config() {
        let mut m = market();
        let helper_address = Pubkey::new_unique();
        let toml = format!(
            r#"
owner = "{owner}"

[fee]
recipient = "{recipient}"
fee_bps = 30

[[markets]]
option_token = "{option}"
route = [{{ token_in = "{underlying}", token_out = "{payment}" }}]
"#,
            owner = m.owner,
            recipient = m.fee_recipient,
            option = m.option,
            underlying = m.underlying,
            payment = m.payment,
        );
        let config = HelperConfig::from_toml_str(&toml).unwrap();
        let helper = ExerciseHelper::from_config(helper_address, &config).unwrap();
        assert_eq!(helper.fee_config().fee_bps(), 30);

        m.chain.mint(&m.option, &m.caller, 1_000).unwrap();
        m.chain
            .approve(&m.option, &m.caller, &helper_address, u64::MAX)
            .unwrap();
        let (caller, option) = (m.caller, m.option);
        let mut service = ExerciseService::new(helper, m.chain);
        let outcome = service.exercise(&caller, &option, &request(1_000)).unwrap();
        assert_eq!(outcome.fee, outcome.profit * 30 / 10_000);
    }

    #[test]
    fn test_config_fee_cap() {
        let key = Pubkey::new_unique();
        let toml = format!("owner = \"{key}\"\n[fee]\nrecipient = \"{key}\"\nfee_bps = 101\n");
        let config = HelperConfig::from_toml_str(&toml).unwrap();
        assert_eq!(
            ExerciseHelper::from_config(Pubkey::new_unique(), &config).err(),
            Some(HelperError::FeeTooHigh(101))
        );
    }
}
