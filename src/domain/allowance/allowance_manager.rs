//! Lazy unlimited approvals

use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::infrastructure::chain::TokenLedger;
use crate::shared::errors::HelperResult;

/// Makes sure `spender` may pull at least `min_amount` of `token` from
/// `owner`. Approves the maximum when the current allowance falls short and
/// does nothing otherwise. Returns whether an approval was issued.
pub fn ensure_allowance<L: TokenLedger + ?Sized>(
    ledger: &mut L,
    token: &Pubkey,
    owner: &Pubkey,
    spender: &Pubkey,
    min_amount: u64,
) -> HelperResult<bool> {
    let current = ledger.allowance(token, owner, spender);
    if current >= min_amount {
        return Ok(false);
    }
    ledger.approve(token, owner, spender, u64::MAX)?;
    debug!(token = %token, spender = %spender, previous = current, "approved unlimited allowance");
    Ok(true)
}
