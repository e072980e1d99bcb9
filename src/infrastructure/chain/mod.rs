//! Chain capabilities consumed by the helper, and an in-memory test host

#[cfg(any(test, feature = "sim"))]
pub mod sim_pool;
#[cfg(any(test, feature = "sim"))]
pub mod simulated_chain;
pub mod traits;

#[cfg(any(test, feature = "sim"))]
pub use simulated_chain::{ApprovalRecord, SimulatedChain};
pub use traits::{
    Chain, ExerciseParams, FlashLender, FlashLoanReceiver, LiquidityQuote, LpPayment, LpReceipt,
    OptionInfo, OptionToken, SwapRouter, TokenLedger, Transactional,
};
