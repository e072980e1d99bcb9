//! Single-slot flash-loan state machine.
//!
//! The state lives in `Cell`s so the engine can hand itself to the lender as
//! a shared receiver while the guard returned by `begin` is still alive.

use std::cell::Cell;

use solana_sdk::pubkey::Pubkey;

use crate::shared::errors::{HelperError, HelperResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanState {
    Idle,
    Borrowing,
    Executing,
    Repaying,
}

#[derive(Debug)]
pub struct FlashLoanContext {
    state: Cell<LoanState>,
    lender: Cell<Option<Pubkey>>,
}

impl Default for FlashLoanContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashLoanContext {
    pub fn new() -> Self {
        Self {
            state: Cell::new(LoanState::Idle),
            lender: Cell::new(None),
        }
    }

    pub fn state(&self) -> LoanState {
        self.state.get()
    }

    pub fn is_idle(&self) -> bool {
        self.state.get() == LoanState::Idle
    }

    /// Idle -> Borrowing. The returned guard puts the context back to `Idle`
    /// when dropped, whatever happened in between.
    pub fn begin(&self, lender: Pubkey) -> HelperResult<LoanGuard<'_>> {
        if !self.is_idle() {
            return Err(HelperError::ReentrantFlashLoan);
        }
        self.lender.set(Some(lender));
        self.state.set(LoanState::Borrowing);
        Ok(LoanGuard { context: self })
    }

    /// Borrowing -> Executing, on the lender's callback
    pub fn enter_callback(&self, caller: &Pubkey) -> HelperResult<()> {
        let state = self.state.get();
        if state == LoanState::Idle {
            return Err(HelperError::NoFlashLoanInProgress);
        }
        if self.lender.get() != Some(*caller) {
            return Err(HelperError::UnauthorizedCaller(*caller));
        }
        if state != LoanState::Borrowing {
            return Err(HelperError::ReentrantFlashLoan);
        }
        self.state.set(LoanState::Executing);
        Ok(())
    }

    /// Executing -> Repaying
    pub fn begin_repayment(&self) -> HelperResult<()> {
        if self.state.get() != LoanState::Executing {
            return Err(HelperError::NoFlashLoanInProgress);
        }
        self.state.set(LoanState::Repaying);
        Ok(())
    }

    fn reset(&self) {
        self.lender.set(None);
        self.state.set(LoanState::Idle);
    }
}

/// Scoped cleanup for one loan
#[derive(Debug)]
pub struct LoanGuard<'a> {
    context: &'a FlashLoanContext,
}

impl Drop for LoanGuard<'_> {
    fn drop(&mut self) {
        self.context.reset();
    }
}
