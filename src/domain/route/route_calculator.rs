//! Forward and backward amount solvers over a hop list

use tracing::debug;

use crate::infrastructure::chain::SwapRouter;
use crate::shared::errors::{HelperError, HelperResult};
use crate::shared::types::Route;

/// Walks a route against the router's per-hop quotes.
///
/// Both directions return one amount per token on the path, so the result
/// always has `route.len() + 1` entries: `[amount_in, .., amount_out]`.
pub struct RouteCalculator;

impl RouteCalculator {
    /// Amounts received along `route` when spending exactly `amount_in`
    pub fn amounts_out<R: SwapRouter + ?Sized>(
        router: &R,
        route: &Route,
        amount_in: u64,
    ) -> HelperResult<Vec<u64>> {
        route.validate()?;
        if amount_in == 0 {
            return Err(HelperError::ZeroAmount);
        }
        let mut amounts = Vec::with_capacity(route.len() + 1);
        amounts.push(amount_in);
        let mut current = amount_in;
        for hop in route.hops() {
            current = router.get_amount_out(current, hop)?;
            amounts.push(current);
        }
        debug!(hops = route.len(), amount_in, amount_out = current, "amounts out");
        Ok(amounts)
    }

    /// Inputs needed along `route` to receive exactly `amount_out`
    pub fn amounts_in<R: SwapRouter + ?Sized>(
        router: &R,
        route: &Route,
        amount_out: u64,
    ) -> HelperResult<Vec<u64>> {
        if amount_out == 0 {
            return Err(HelperError::InvalidAmount);
        }
        route.validate()?;
        let mut amounts = vec![0u64; route.len() + 1];
        amounts[route.len()] = amount_out;
        for (index, hop) in route.hops().iter().enumerate().rev() {
            amounts[index] = router.get_amount_in(amounts[index + 1], hop)?;
        }
        debug!(hops = route.len(), amount_in = amounts[0], amount_out, "amounts in");
        Ok(amounts)
    }

    /// Final output of `amounts_out`
    pub fn output_of<R: SwapRouter + ?Sized>(
        router: &R,
        route: &Route,
        amount_in: u64,
    ) -> HelperResult<u64> {
        let amounts = Self::amounts_out(router, route, amount_in)?;
        Ok(amounts[amounts.len() - 1])
    }

    /// First input of `amounts_in`
    pub fn input_for<R: SwapRouter + ?Sized>(
        router: &R,
        route: &Route,
        amount_out: u64,
    ) -> HelperResult<u64> {
        Ok(Self::amounts_in(router, route, amount_out)?[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::chain::SimulatedChain;
    use crate::shared::types::{Hop, PoolKind};
    use solana_sdk::pubkey::Pubkey;

    fn three_token_chain() -> (SimulatedChain, Route) {
        let mut chain = SimulatedChain::new();
        let (a, b, c) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let provider = Pubkey::new_unique();
        chain
            .create_pool(PoolKind::Volatile, a, b, 2_000_000_000, 1_000_000_000, 30, &provider)
            .unwrap();
        chain
            .create_pool(PoolKind::Stable, b, c, 5_000_000_000, 5_000_000_000, 5, &provider)
            .unwrap();
        (chain, Route::new(vec![Hop::volatile(a, b), Hop::stable(b, c)]))
    }

    #[test]
    fn test_amounts_out_walks_every_hop() {
        let (chain, route) = three_token_chain();
        let amounts = RouteCalculator::amounts_out(&chain, &route, 10_000_000).unwrap();
        assert_eq!(amounts.len(), 3);
        assert_eq!(amounts[0], 10_000_000);
        assert_eq!(
            amounts[1],
            chain.get_amount_out(10_000_000, &route.hops()[0]).unwrap()
        );
        assert_eq!(
            amounts[2],
            chain.get_amount_out(amounts[1], &route.hops()[1]).unwrap()
        );
    }

    #[test]
    fn test_amounts_in_back_solves_target() {
        let (chain, route) = three_token_chain();
        let amounts = RouteCalculator::amounts_in(&chain, &route, 4_000_000).unwrap();
        assert_eq!(amounts.len(), 3);
        assert_eq!(amounts[2], 4_000_000);
        // spending the solved input must reach the target
        let forward = RouteCalculator::output_of(&chain, &route, amounts[0]).unwrap();
        assert!(forward >= 4_000_000);
    }

    #[test]
    fn test_rejects_degenerate_requests() {
        let (chain, route) = three_token_chain();
        assert_eq!(
            RouteCalculator::amounts_in(&chain, &route, 0),
            Err(HelperError::InvalidAmount)
        );
        assert_eq!(
            RouteCalculator::amounts_out(&chain, &route, 0),
            Err(HelperError::ZeroAmount)
        );
        assert_eq!(
            RouteCalculator::amounts_in(&chain, &Route::default(), 1),
            Err(HelperError::PathTooShort)
        );
        assert_eq!(
            RouteCalculator::amounts_out(&chain, &Route::default(), 1),
            Err(HelperError::PathTooShort)
        );
    }
}
