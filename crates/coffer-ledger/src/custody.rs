use std::sync::RwLock;

use coffer_types::{AccountId, Amount};

/// Error from the external custody primitive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustodyError {
    #[error("custody rejected the operation: {0}")]
    Rejected(String),
}

/// External value-custody primitive.
///
/// All implementations must satisfy these invariants:
/// - `receive` and `transfer` are atomic: they either fully complete
///   or have no effect. No partial movement of value is observable.
/// - `custodied()` is the exact total currently held, equal to the sum
///   of received amounts minus the sum of transferred amounts.
/// - The custodian never interprets account identifiers; routing the
///   transferred value to the caller is its concern alone.
///
/// The engine updates no ledger state until `transfer` has returned
/// `Ok`, so a failing custodian can never strand the ledger in a
/// half-applied operation.
pub trait Custodian: Send + Sync {
    /// Take custody of `amount`. Called once per successful deposit.
    fn receive(&self, amount: Amount) -> Result<(), CustodyError>;

    /// Release `amount` from custody to the given account's owner.
    fn transfer(&self, account: &AccountId, amount: Amount) -> Result<(), CustodyError>;

    /// Total value currently under custody.
    fn custodied(&self) -> Amount;
}

/// In-memory custodian for tests, local demos, and embedding.
#[derive(Debug, Default)]
pub struct InMemoryVault {
    held: RwLock<Amount>,
}

impl InMemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing custodied balance (snapshot restore).
    pub fn with_balance(held: Amount) -> Self {
        Self {
            held: RwLock::new(held),
        }
    }
}

impl Custodian for InMemoryVault {
    fn receive(&self, amount: Amount) -> Result<(), CustodyError> {
        let mut held = self
            .held
            .write()
            .map_err(|_| CustodyError::Rejected("vault lock poisoned".into()))?;
        *held = held
            .checked_add(amount)
            .ok_or_else(|| CustodyError::Rejected("vault balance overflow".into()))?;
        Ok(())
    }

    fn transfer(&self, _account: &AccountId, amount: Amount) -> Result<(), CustodyError> {
        let mut held = self
            .held
            .write()
            .map_err(|_| CustodyError::Rejected("vault lock poisoned".into()))?;
        *held = held
            .checked_sub(amount)
            .ok_or_else(|| CustodyError::Rejected("vault underfunded".into()))?;
        Ok(())
    }

    fn custodied(&self) -> Amount {
        self.held.read().map(|held| *held).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receive_then_transfer_balances_out() {
        let vault = InMemoryVault::new();
        let account = AccountId::ephemeral();

        vault.receive(100).unwrap();
        vault.receive(50).unwrap();
        assert_eq!(vault.custodied(), 150);

        vault.transfer(&account, 120).unwrap();
        assert_eq!(vault.custodied(), 30);
    }

    #[test]
    fn transfer_beyond_custody_is_rejected() {
        let vault = InMemoryVault::with_balance(10);
        let account = AccountId::ephemeral();

        let error = vault.transfer(&account, 11).unwrap_err();
        assert_eq!(error, CustodyError::Rejected("vault underfunded".into()));
        // Nothing moved.
        assert_eq!(vault.custodied(), 10);
    }
}
