//! Error handling for the exercise helper

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Every condition that aborts a quote or a settlement.
///
/// The first block mirrors the named failures of the settlement engine; the
/// rest are raised by the consumed capabilities (ledger, router, option,
/// lender) and bubble up unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HelperError {
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Slippage must be less than 10,000 bps: {0}")]
    SlippageBoundsExceeded(u64),

    #[error("Percent must be less than 10,000 bps: {0}")]
    PercentOutOfRange(u64),

    #[error("need more of the paired asset, decrease percent-to-LP or discount")]
    InsufficientPairedAsset,

    #[error("Profit slippage exceeded: realized {realized}, minimum {minimum}")]
    ProfitSlippageExceeded { realized: u64, minimum: u64 },

    #[error("Cost exceeds profit: cost {cost}, proceeds {proceeds}")]
    CostExceedsProfit { cost: u64, proceeds: u64 },

    #[error("Unauthorized flash loan callback from {0}")]
    UnauthorizedCaller(Pubkey),

    #[error("No flash loan in progress")]
    NoFlashLoanInProgress,

    #[error("Fee too high: {0} bps, max 100 bps")]
    FeeTooHigh(u64),

    #[error("Path too short")]
    PathTooShort,

    #[error("Invalid amount: requested output is zero")]
    InvalidAmount,

    #[error("Math operation overflow")]
    MathOverflow,

    #[error("Caller {0} is not the owner")]
    NotOwner(Pubkey),

    #[error("No route registered for option {0}")]
    UnsupportedOption(Pubkey),

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Flash loan already in progress")]
    ReentrantFlashLoan,

    #[error("Residual balance of {amount} left for token {token}")]
    ResidualBalance { token: Pubkey, amount: u64 },

    #[error("Insufficient balance of {token}: have {available}, need {required}")]
    InsufficientBalance {
        token: Pubkey,
        available: u64,
        required: u64,
    },

    #[error("Insufficient allowance of {token}: have {available}, need {required}")]
    InsufficientAllowance {
        token: Pubkey,
        available: u64,
        required: u64,
    },

    #[error("Insufficient output amount: got {amount_out}, minimum {min_out}")]
    InsufficientOutputAmount { amount_out: u64, min_out: u64 },

    #[error("Excessive input amount: need {amount_in}, maximum {max_in}")]
    ExcessiveInputAmount { amount_in: u64, max_in: u64 },

    #[error("Insufficient liquidity in pool")]
    InsufficientLiquidity,

    #[error("Strike cost {cost} above maximum {max_cost}")]
    StrikeCostTooHigh { cost: u64, max_cost: u64 },

    #[error("Deadline expired")]
    DeadlineExpired,

    #[error("Flash loan not repaid")]
    FlashLoanNotRepaid,

    #[error("Unknown token: {0}")]
    UnknownToken(Pubkey),

    #[error("Unknown pool: {0} -> {1}")]
    UnknownPool(Pubkey, Pubkey),

    #[error("Unknown option: {0}")]
    UnknownOption(Pubkey),

    #[error("Invalid flash loan payload: {0}")]
    InvalidPayload(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type HelperResult<T> = Result<T, HelperError>;
