use coffer_types::{AccountId, Amount};

use crate::account::{DepositInfo, InterestRate, LedgerStats};
use crate::error::LedgerError;

/// Write boundary for ledger mutations.
///
/// Every mutating operation realizes pending interest into principal
/// before touching the balance, is atomic (all-or-nothing), and runs
/// fully serialized relative to every other operation.
pub trait LedgerWrite: Send + Sync {
    /// Deposit `amount` into the caller's account, creating the account
    /// record on first deposit. Returns the new principal.
    fn deposit(&self, account: AccountId, amount: Amount) -> Result<Amount, LedgerError>;

    /// Withdraw `amount` from the caller's post-accrual balance.
    /// Returns the remaining principal.
    fn withdraw(&self, account: AccountId, amount: Amount) -> Result<Amount, LedgerError>;

    /// Withdraw the entire post-accrual balance. Returns the amount
    /// withdrawn.
    fn withdraw_all(&self, account: AccountId) -> Result<Amount, LedgerError>;
}

/// Read boundary for ledger queries. Queries never mutate state.
pub trait LedgerRead: Send + Sync {
    /// Pending interest as of now; exactly what the next mutation would
    /// realize. Zero for unknown accounts.
    fn calculate_interest(&self, account: &AccountId) -> Result<Amount, LedgerError>;

    /// Current realized principal, excluding pending interest. Zero for
    /// unknown accounts.
    fn balance_of(&self, account: &AccountId) -> Result<Amount, LedgerError>;

    /// Full per-account snapshot. Zeroed (with `exists == false`) for
    /// unknown accounts.
    fn deposit_info(&self, account: &AccountId) -> Result<DepositInfo, LedgerError>;

    /// Ledger-wide aggregates plus the custodied total for drift checks.
    fn stats(&self) -> Result<LedgerStats, LedgerError>;

    /// The fixed interest rate pair.
    fn interest_rate(&self) -> InterestRate;
}
