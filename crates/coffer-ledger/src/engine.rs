use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use coffer_types::{AccountId, Amount};
use tracing::{debug, info};

use crate::account::{AccountRecord, DepositInfo, InterestRate, LedgerStats};
use crate::clock::{Clock, SystemClock};
use crate::config::LedgerConfig;
use crate::custody::{Custodian, InMemoryVault};
use crate::error::LedgerError;
use crate::events::{EventSink, LedgerEvent, MemorySink};
use crate::interest::pending_interest;
use crate::traits::{LedgerRead, LedgerWrite};

/// Single-ledger custodial accounting engine.
///
/// Owns the account table and the global aggregates. Every mutating
/// operation realizes pending interest before touching principal,
/// computes its full effect, invokes the custody primitive, and only
/// then commits — a rejected operation leaves the ledger byte-for-byte
/// unchanged. The write lock is held across compute, custody call, and
/// commit, so operations are fully serialized and no reader observes a
/// half-applied state.
pub struct CofferLedger {
    pub(crate) config: LedgerConfig,
    clock: Arc<dyn Clock>,
    custodian: Arc<dyn Custodian>,
    events: Arc<dyn EventSink>,
    pub(crate) inner: RwLock<LedgerState>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct LedgerState {
    pub(crate) accounts: HashMap<AccountId, AccountRecord>,
    pub(crate) total_users: u64,
    pub(crate) total_supply: Amount,
    /// Clock high-water mark; operations never see time regress.
    pub(crate) last_clock: u64,
}

impl CofferLedger {
    /// Engine with wall clock, a fresh in-memory vault, and a memory
    /// event sink.
    pub fn new(config: LedgerConfig) -> Self {
        Self::with_collaborators(
            config,
            Arc::new(SystemClock),
            Arc::new(InMemoryVault::new()),
            Arc::new(MemorySink::new()),
        )
    }

    /// Engine with explicit collaborators.
    pub fn with_collaborators(
        config: LedgerConfig,
        clock: Arc<dyn Clock>,
        custodian: Arc<dyn Custodian>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            config,
            clock,
            custodian,
            events,
            inner: RwLock::new(LedgerState::default()),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.inner.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.inner.write().map_err(|_| LedgerError::LockPoisoned)
    }

    fn now_for(&self, state: &LedgerState) -> u64 {
        self.clock.now().max(state.last_clock)
    }
}

impl Default for CofferLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl LedgerWrite for CofferLedger {
    fn deposit(&self, account: AccountId, amount: Amount) -> Result<Amount, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if amount < self.config.min_deposit {
            return Err(LedgerError::BelowMinimum {
                amount,
                minimum: self.config.min_deposit,
            });
        }

        let mut state = self.write()?;
        let now = self.now_for(&state);
        let record = state.accounts.get(&account).cloned().unwrap_or_default();
        let pending =
            pending_interest(record.principal, record.last_accrual, now, &self.config)?;

        let new_principal = record
            .principal
            .checked_add(pending)
            .and_then(|p| p.checked_add(amount))
            .ok_or(LedgerError::AmountOverflow)?;
        let new_supply = state
            .total_supply
            .checked_add(pending)
            .and_then(|s| s.checked_add(amount))
            .ok_or(LedgerError::AmountOverflow)?;
        let total_deposited = record
            .total_deposited
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;

        // Realized interest is funded into custody together with the
        // deposited value, in one atomic call.
        self.custodian
            .receive(pending + amount)
            .map_err(|e| LedgerError::TransferFailed(e.to_string()))?;

        if !record.exists {
            state.total_users += 1;
        }
        state.accounts.insert(
            account,
            AccountRecord {
                principal: new_principal,
                last_accrual: now,
                total_deposited,
                total_withdrawn: record.total_withdrawn,
                exists: true,
            },
        );
        state.total_supply = new_supply;
        state.last_clock = now;

        if pending > 0 {
            debug!(account = %account, amount = pending, "interest realized");
            self.events.emit(&LedgerEvent::InterestAccrued {
                account,
                amount: pending,
            });
        }
        info!(account = %account, amount, new_balance = new_principal, "deposit");
        self.events.emit(&LedgerEvent::Deposited {
            account,
            amount,
            new_balance: new_principal,
        });

        Ok(new_principal)
    }

    fn withdraw(&self, account: AccountId, amount: Amount) -> Result<Amount, LedgerError> {
        let (_, new_principal) = self.settle_withdrawal(account, Some(amount))?;
        Ok(new_principal)
    }

    fn withdraw_all(&self, account: AccountId) -> Result<Amount, LedgerError> {
        let (withdrawn, _) = self.settle_withdrawal(account, None)?;
        Ok(withdrawn)
    }
}

impl CofferLedger {
    /// Common withdrawal path. `request` of `None` means the entire
    /// post-accrual balance. Returns `(withdrawn, new_principal)`.
    fn settle_withdrawal(
        &self,
        account: AccountId,
        request: Option<Amount>,
    ) -> Result<(Amount, Amount), LedgerError> {
        let mut state = self.write()?;
        let record = state
            .accounts
            .get(&account)
            .filter(|r| r.exists)
            .cloned()
            .ok_or(LedgerError::UnknownAccount)?;
        if request == Some(0) {
            return Err(LedgerError::InvalidAmount);
        }

        let now = self.now_for(&state);
        let pending =
            pending_interest(record.principal, record.last_accrual, now, &self.config)?;
        let available = record
            .principal
            .checked_add(pending)
            .ok_or(LedgerError::AmountOverflow)?;
        let amount = match request {
            Some(amount) => amount,
            // Draining an empty balance is a meaningless withdrawal.
            None if available == 0 => return Err(LedgerError::InvalidAmount),
            None => available,
        };
        if amount > available {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available,
            });
        }

        let new_principal = available - amount;
        let new_supply = state
            .total_supply
            .checked_add(pending)
            .and_then(|s| s.checked_sub(amount))
            .ok_or(LedgerError::AmountOverflow)?;
        let total_withdrawn = record
            .total_withdrawn
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;

        // The payout draws on custody only for the part not covered by
        // the interest realized in this same operation; the remainder
        // is funded by the interest source directly. Netting the two
        // movements into one custody call keeps failure atomic: a
        // rejected transfer strands nothing, and the net outflow never
        // exceeds the account's principal, so custody always covers it.
        let outflow = amount.saturating_sub(pending);
        let inflow = pending.saturating_sub(amount);
        if outflow > 0 {
            self.custodian
                .transfer(&account, outflow)
                .map_err(|e| LedgerError::TransferFailed(e.to_string()))?;
        } else if inflow > 0 {
            self.custodian
                .receive(inflow)
                .map_err(|e| LedgerError::TransferFailed(e.to_string()))?;
        }

        state.accounts.insert(
            account,
            AccountRecord {
                principal: new_principal,
                last_accrual: now,
                total_deposited: record.total_deposited,
                total_withdrawn,
                exists: true,
            },
        );
        state.total_supply = new_supply;
        state.last_clock = now;

        if pending > 0 {
            debug!(account = %account, amount = pending, "interest realized");
            self.events.emit(&LedgerEvent::InterestAccrued {
                account,
                amount: pending,
            });
        }
        info!(account = %account, amount, new_balance = new_principal, "withdraw");
        self.events.emit(&LedgerEvent::Withdrawn {
            account,
            amount,
            new_balance: new_principal,
        });

        Ok((amount, new_principal))
    }
}

impl LedgerRead for CofferLedger {
    fn calculate_interest(&self, account: &AccountId) -> Result<Amount, LedgerError> {
        let state = self.read()?;
        let Some(record) = state.accounts.get(account).filter(|r| r.exists) else {
            return Ok(0);
        };
        let now = self.now_for(&state);
        pending_interest(record.principal, record.last_accrual, now, &self.config)
    }

    fn balance_of(&self, account: &AccountId) -> Result<Amount, LedgerError> {
        let state = self.read()?;
        Ok(state
            .accounts
            .get(account)
            .map(|r| r.principal)
            .unwrap_or(0))
    }

    fn deposit_info(&self, account: &AccountId) -> Result<DepositInfo, LedgerError> {
        let state = self.read()?;
        let record = state.accounts.get(account).cloned().unwrap_or_default();
        let pending = if record.exists {
            let now = self.now_for(&state);
            pending_interest(record.principal, record.last_accrual, now, &self.config)?
        } else {
            0
        };
        Ok(DepositInfo {
            principal: record.principal,
            pending_interest: pending,
            total_deposited: record.total_deposited,
            total_withdrawn: record.total_withdrawn,
            last_accrual: record.last_accrual,
            exists: record.exists,
        })
    }

    fn stats(&self) -> Result<LedgerStats, LedgerError> {
        let state = self.read()?;
        Ok(LedgerStats {
            custodied: self.custodian.custodied(),
            total_users: state.total_users,
            total_supply: state.total_supply,
        })
    }

    fn interest_rate(&self) -> InterestRate {
        InterestRate {
            rate: self.config.interest_rate,
            precision: self.config.rate_precision,
        }
    }
}
