use coffer_types::Amount;

/// Errors produced by ledger operations.
///
/// All variants are synchronous and caller-facing; none is retryable by
/// the engine itself. A rejected operation has mutated nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("deposit of {amount} is below the minimum of {minimum}")]
    BelowMinimum { amount: Amount, minimum: Amount },

    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Amount,
        available: Amount,
    },

    #[error("account has never deposited")]
    UnknownAccount,

    #[error("custody transfer failed: {0}")]
    TransferFailed(String),

    #[error("amount arithmetic overflowed")]
    AmountOverflow,

    #[error("ledger lock poisoned")]
    LockPoisoned,
}
