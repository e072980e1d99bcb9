//! Flash-loan domain - borrow window state, payload and callback work

mod flash_loan_context;
mod orchestrator;
mod payload;

pub use flash_loan_context::{FlashLoanContext, LoanGuard, LoanState};
pub use orchestrator::{FlashLoanOrchestrator, LoanTerms};
pub use payload::{ExercisePayload, FlashLoanPayload, LpPayload};
