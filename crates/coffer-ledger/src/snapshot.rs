use std::collections::HashMap;
use std::sync::Arc;

use coffer_types::{AccountId, Amount};
use serde::{Deserialize, Serialize};

use crate::account::AccountRecord;
use crate::clock::{Clock, SystemClock};
use crate::config::LedgerConfig;
use crate::custody::{Custodian, InMemoryVault};
use crate::engine::{CofferLedger, LedgerState};
use crate::error::LedgerError;
use crate::events::{EventSink, MemorySink};

/// Serializable capture of the entire ledger.
///
/// This is the engine's face toward the durable store: hosts persist a
/// snapshot after each operation and rebuild the engine from it on
/// startup. Restoring assumes custody of exactly `total_supply`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub config: LedgerConfig,
    pub accounts: HashMap<AccountId, AccountRecord>,
    pub total_users: u64,
    pub total_supply: Amount,
    pub last_clock: u64,
}

impl CofferLedger {
    /// Capture the full ledger state.
    pub fn snapshot(&self) -> Result<LedgerSnapshot, LedgerError> {
        let state = self.inner.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(LedgerSnapshot {
            config: self.config.clone(),
            accounts: state.accounts.clone(),
            total_users: state.total_users,
            total_supply: state.total_supply,
            last_clock: state.last_clock,
        })
    }

    /// Rebuild an engine from a snapshot with the wall clock, a vault
    /// holding the snapshot's supply, and a memory event sink.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        let vault = InMemoryVault::with_balance(snapshot.total_supply);
        Self::from_snapshot_with(
            snapshot,
            Arc::new(SystemClock),
            Arc::new(vault),
            Arc::new(MemorySink::new()),
        )
    }

    /// Rebuild an engine from a snapshot with explicit collaborators.
    /// The custodian must already hold the snapshot's `total_supply`.
    pub fn from_snapshot_with(
        snapshot: LedgerSnapshot,
        clock: Arc<dyn Clock>,
        custodian: Arc<dyn Custodian>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let engine = Self::with_collaborators(snapshot.config, clock, custodian, events);
        {
            let mut state = engine.inner.write().expect("fresh lock cannot be poisoned");
            *state = LedgerState {
                accounts: snapshot.accounts,
                total_users: snapshot.total_users,
                total_supply: snapshot.total_supply,
                last_clock: snapshot.last_clock,
            };
        }
        engine
    }
}

#[cfg(test)]
mod tests {
    use coffer_types::UNIT;

    use crate::clock::ManualClock;
    use crate::interest::SECONDS_PER_YEAR;
    use crate::traits::{LedgerRead, LedgerWrite};

    use super::*;

    #[test]
    fn snapshot_restores_accounts_and_aggregates() {
        let clock = Arc::new(ManualClock::new(1_700_000_000));
        let ledger = CofferLedger::with_collaborators(
            LedgerConfig::default(),
            clock.clone(),
            Arc::new(InMemoryVault::new()),
            Arc::new(MemorySink::new()),
        );
        let a = AccountId::from_raw([1; 32]);
        let b = AccountId::from_raw([2; 32]);

        ledger.deposit(a, UNIT).unwrap();
        ledger.deposit(b, 10 * UNIT).unwrap();
        ledger.withdraw(b, 4 * UNIT).unwrap();

        let snapshot = ledger.snapshot().unwrap();
        let restored = CofferLedger::from_snapshot_with(
            snapshot,
            clock.clone(),
            Arc::new(InMemoryVault::with_balance(7 * UNIT)),
            Arc::new(MemorySink::new()),
        );

        assert_eq!(
            restored.deposit_info(&a).unwrap(),
            ledger.deposit_info(&a).unwrap()
        );
        assert_eq!(restored.stats().unwrap(), ledger.stats().unwrap());

        // The restored engine keeps operating and accruing.
        clock.advance(SECONDS_PER_YEAR);
        assert_eq!(
            restored.calculate_interest(&a).unwrap(),
            UNIT * 5 / 10_000
        );
        restored.deposit(a, UNIT).unwrap();
        assert_eq!(restored.stats().unwrap().total_users, 2);
    }

    #[test]
    fn snapshot_json_roundtrip() {
        let ledger = CofferLedger::default();
        let a = AccountId::from_raw([7; 32]);
        ledger.deposit(a, UNIT).unwrap();

        let snapshot = ledger.snapshot().unwrap();
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: LedgerSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, parsed);
    }
}
