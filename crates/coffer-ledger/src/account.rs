use coffer_types::Amount;
use serde::{Deserialize, Serialize};

/// Per-account ledger record.
///
/// Records are created lazily on first deposit and never deleted;
/// `exists` stays `true` even after the principal returns to zero, so
/// the ledger can distinguish "zero balance, known user" from "unknown
/// user". The lifetime totals are informational and only ever grow.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Current realized balance, excluding not-yet-realized interest.
    pub principal: Amount,
    /// Unix seconds of the last operation that touched this account.
    pub last_accrual: u64,
    /// Lifetime sum of deposits.
    pub total_deposited: Amount,
    /// Lifetime sum of withdrawals, interest included.
    pub total_withdrawn: Amount,
    /// Whether this account has ever deposited.
    pub exists: bool,
}

/// Read-only snapshot of one account, as returned by
/// [`LedgerRead::deposit_info`](crate::traits::LedgerRead::deposit_info).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositInfo {
    pub principal: Amount,
    /// Interest accrued since `last_accrual` but not yet realized.
    pub pending_interest: Amount,
    pub total_deposited: Amount,
    pub total_withdrawn: Amount,
    pub last_accrual: u64,
    pub exists: bool,
}

/// Ledger-wide aggregates.
///
/// `custodied` is read from the custody collaborator and must equal
/// `total_supply` at all times; a mismatch indicates drift.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub custodied: Amount,
    pub total_users: u64,
    pub total_supply: Amount,
}

/// The fixed interest rate as a numerator/denominator pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestRate {
    pub rate: u128,
    pub precision: u128,
}
